use chrono::Utc;
use diesel::prelude::*;

use crate::domain::client::{Client, NewClient};
use crate::domain::stage::ReturnStage;
use crate::domain::types::{ClientId, HubId};
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateArchived, UpdateReturnStage,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientListQuery, ClientReader, ClientWriter, DieselRepository};

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId, hub_id: HubId) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_client = clients::table
            .filter(clients::id.eq(id.get()))
            .filter(clients::hub_id.eq(hub_id.get()))
            .first::<DbClient>(&mut conn)
            .optional()?;

        match db_client {
            Some(db_client) => Ok(Some(
                Client::try_from(db_client).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = clients::table
                .filter(clients::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(archived) = query.archived {
                items = items.filter(clients::archived.eq(archived));
            }
            if let Some(term) = query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|term| !term.is_empty())
            {
                let pattern = format!("%{term}%");
                items = items.filter(
                    clients::name
                        .like(pattern.clone())
                        .or(clients::email.like(pattern)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder()
            .order(clients::name.asc())
            .then_order_by(clients::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let clients = items
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(|db_client| Client::try_from(db_client).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_new_client: DbNewClient = new_client.into();

        let db_client = diesel::insert_into(clients::table)
            .values(&db_new_client)
            .get_result::<DbClient>(&mut conn)?;

        Client::try_from(db_client).map_err(RepositoryError::from)
    }

    fn update_return_stage(
        &self,
        id: ClientId,
        hub_id: HubId,
        stage: ReturnStage,
    ) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let changes = UpdateReturnStage::new(stage, Utc::now().naive_utc());

        let db_client = diesel::update(
            clients::table
                .filter(clients::id.eq(id.get()))
                .filter(clients::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbClient>(&mut conn)?;

        Client::try_from(db_client).map_err(RepositoryError::from)
    }

    fn set_client_archived(
        &self,
        id: ClientId,
        hub_id: HubId,
        archived: bool,
    ) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let changes = UpdateArchived {
            archived,
            updated_at: Utc::now().naive_utc(),
        };

        let db_client = diesel::update(
            clients::table
                .filter(clients::id.eq(id.get()))
                .filter(clients::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbClient>(&mut conn)?;

        Client::try_from(db_client).map_err(RepositoryError::from)
    }
}
