//! Read-time aggregation of the sibling subsystems' counts.

use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;

use crate::domain::client::Client;
use crate::domain::progress::AttentionSignals;
use crate::domain::types::{ClientId, HubId};
use crate::models::client::Client as DbClient;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AttentionReader, DieselRepository};

const PENDING: &str = "pending";

impl AttentionReader for DieselRepository {
    fn unread_message_count(&self, client_id: ClientId) -> RepositoryResult<usize> {
        use crate::schema::messages;

        let mut conn = self.conn()?;
        let count = messages::table
            .filter(messages::client_id.eq(client_id.get()))
            .filter(messages::from_client.eq(true))
            .filter(messages::is_read.eq(false))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count as usize)
    }

    fn pending_document_count(&self, client_id: ClientId) -> RepositoryResult<usize> {
        use crate::schema::documents;

        let mut conn = self.conn()?;
        let count = documents::table
            .filter(documents::client_id.eq(client_id.get()))
            .filter(documents::status.eq(PENDING))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count as usize)
    }

    fn pending_signature_count(&self, client_id: ClientId) -> RepositoryResult<usize> {
        use crate::schema::signature_requests;

        let mut conn = self.conn()?;
        let count = signature_requests::table
            .filter(signature_requests::client_id.eq(client_id.get()))
            .filter(signature_requests::status.eq(PENDING))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count as usize)
    }

    fn list_attention_signals(
        &self,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(Client, AttentionSignals)>> {
        use crate::schema::{clients, documents, messages, signature_requests};

        let mut conn = self.conn()?;

        let db_clients = clients::table
            .filter(clients::hub_id.eq(hub_id.get()))
            .filter(clients::archived.eq(false))
            .order(clients::name.asc())
            .load::<DbClient>(&mut conn)?;
        let client_ids: Vec<i32> = db_clients.iter().map(|client| client.id).collect();

        let unread: HashMap<i32, i64> = messages::table
            .filter(messages::client_id.eq_any(&client_ids))
            .filter(messages::from_client.eq(true))
            .filter(messages::is_read.eq(false))
            .group_by(messages::client_id)
            .select((messages::client_id, count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        let documents: HashMap<i32, i64> = documents::table
            .filter(documents::client_id.eq_any(&client_ids))
            .filter(documents::status.eq(PENDING))
            .group_by(documents::client_id)
            .select((documents::client_id, count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        let signatures: HashMap<i32, i64> = signature_requests::table
            .filter(signature_requests::client_id.eq_any(&client_ids))
            .filter(signature_requests::status.eq(PENDING))
            .group_by(signature_requests::client_id)
            .select((signature_requests::client_id, count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        let count = |counts: &HashMap<i32, i64>, id: i32| {
            counts.get(&id).copied().unwrap_or_default() as usize
        };

        let mut flagged = db_clients
            .into_iter()
            .map(|db_client| {
                let signals = AttentionSignals::new(
                    count(&unread, db_client.id),
                    count(&documents, db_client.id),
                    count(&signatures, db_client.id),
                );
                let client = Client::try_from(db_client).map_err(RepositoryError::from)?;
                Ok((client, signals))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        flagged.retain(|(_, signals)| signals.needs_attention());
        flagged.sort_by_key(|(_, signals)| {
            std::cmp::Reverse(
                signals.unread_messages + signals.pending_documents + signals.pending_signatures,
            )
        });

        Ok(flagged)
    }
}
