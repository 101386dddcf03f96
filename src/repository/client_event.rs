use std::collections::{HashMap, HashSet};

use diesel::prelude::*;

use crate::domain::admin::Admin;
use crate::domain::client_event::{ClientEvent, NewClientEvent};
use crate::models::admin::Admin as DbAdmin;
use crate::models::client_event::{
    ClientEvent as DbClientEvent, NewClientEvent as DbNewClientEvent,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ClientEventListQuery, ClientEventReader, ClientEventWriter, DieselRepository,
};

impl ClientEventReader for DieselRepository {
    fn list_client_events(
        &self,
        query: ClientEventListQuery,
    ) -> RepositoryResult<(usize, Vec<(ClientEvent, Admin)>)> {
        use crate::schema::{admins, client_events};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = client_events::table
                .filter(client_events::client_id.eq(query.client_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(event_type) = &query.event_type {
                items = items.filter(client_events::event_type.eq(event_type.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder()
            .order(client_events::created_at.desc())
            .then_order_by(client_events::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }
        let db_events = items.load::<DbClientEvent>(&mut conn)?;

        let admin_ids: HashSet<i32> = db_events.iter().map(|event| event.admin_id).collect();
        let admins: HashMap<i32, DbAdmin> = admins::table
            .filter(admins::id.eq_any(admin_ids))
            .load::<DbAdmin>(&mut conn)?
            .into_iter()
            .map(|admin| (admin.id, admin))
            .collect();

        let events = db_events
            .into_iter()
            .filter_map(|event| {
                let admin = admins.get(&event.admin_id)?.clone();
                Some((event, admin))
            })
            .map(|(event, admin)| {
                let event = ClientEvent::try_from(event).map_err(RepositoryError::from)?;
                let admin = Admin::try_from(admin).map_err(RepositoryError::from)?;
                Ok((event, admin))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, events))
    }
}

impl ClientEventWriter for DieselRepository {
    fn create_client_event(&self, client_event: &NewClientEvent) -> RepositoryResult<ClientEvent> {
        use crate::schema::client_events;

        let mut conn = self.conn()?;
        let db_new_event: DbNewClientEvent = client_event.into();

        let db_event = diesel::insert_into(client_events::table)
            .values(&db_new_event)
            .get_result::<DbClientEvent>(&mut conn)?;

        ClientEvent::try_from(db_event).map_err(RepositoryError::from)
    }
}
