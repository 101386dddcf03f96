//! Diesel models for the client audit trail.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client_event::{
    ClientEvent as DomainClientEvent, NewClientEvent as DomainNewClientEvent,
};
use crate::domain::types::{AdminId, ClientEventId, ClientId, TypeConstraintError};
use crate::models::admin::Admin;
use crate::models::client::Client;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
#[diesel(belongs_to(Admin, foreign_key = admin_id))]
#[diesel(table_name = crate::schema::client_events)]
pub struct ClientEvent {
    pub id: i32,
    pub client_id: i32,
    pub admin_id: i32,
    pub event_type: String,
    pub event_data: String, // JSON text
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::client_events)]
pub struct NewClientEvent {
    pub client_id: i32,
    pub admin_id: i32,
    pub event_type: String,
    pub event_data: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ClientEvent> for DomainClientEvent {
    type Error = TypeConstraintError;

    fn try_from(event: ClientEvent) -> Result<Self, Self::Error> {
        let event_data = serde_json::from_str(&event.event_data).unwrap_or_default();

        Ok(Self {
            id: ClientEventId::try_from(event.id)?,
            client_id: ClientId::try_from(event.client_id)?,
            admin_id: AdminId::try_from(event.admin_id)?,
            event_type: event.event_type.into(),
            event_data,
            created_at: event.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewClientEvent> for NewClientEvent {
    fn from(event: &'a DomainNewClientEvent) -> Self {
        Self {
            client_id: event.client_id.get(),
            admin_id: event.admin_id.get(),
            event_type: event.event_type.to_string(),
            event_data: event.event_data.to_string(),
            created_at: event.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::domain::client_event::ClientEventType;

    #[test]
    fn new_event_serializes_payload() {
        let domain = DomainNewClientEvent::return_stage_changed(
            ClientId::new(1).expect("valid id"),
            AdminId::new(2).expect("valid id"),
            None,
            "filing",
        );
        let new = NewClientEvent::from(&domain);
        assert_eq!(new.event_type, "StageChanged");
        let payload: serde_json::Value =
            serde_json::from_str(&new.event_data).expect("valid json");
        assert_eq!(payload, json!({ "from": null, "to": "filing" }));
    }

    #[test]
    fn malformed_payload_reads_as_null() {
        let db = ClientEvent {
            id: 1,
            client_id: 1,
            admin_id: 1,
            event_type: "Archived".to_string(),
            event_data: "not json".to_string(),
            created_at: Utc::now().naive_utc(),
        };
        let domain = DomainClientEvent::try_from(db).expect("valid event");
        assert_eq!(domain.event_type, ClientEventType::Archived);
        assert!(domain.event_data.is_null());
    }
}
