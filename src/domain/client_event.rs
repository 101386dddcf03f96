//! Audit trail of admin actions on a client.

use std::fmt::Display;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::stage::stage_label;
use crate::domain::types::{AdminId, ClientEventId, ClientId, ClientProductId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientEvent {
    pub id: ClientEventId,
    pub client_id: ClientId,
    pub admin_id: AdminId,
    pub event_type: ClientEventType,
    pub event_data: Value,
    pub created_at: NaiveDateTime,
}

impl ClientEvent {
    /// Human readable summary used by the client history list.
    pub fn summary(&self) -> String {
        match self.event_type {
            ClientEventType::StageChanged => {
                let from = self.event_data["from"].as_str().map(stage_label);
                let to = self.event_data["to"].as_str().map(stage_label);
                match (from, to) {
                    (Some(from), Some(to)) => format!("{from} → {to}"),
                    (None, Some(to)) => format!("Moved to {to}"),
                    _ => "Stage changed".to_string(),
                }
            }
            ClientEventType::ProductAssigned => format!(
                "Assigned {}",
                self.event_data["name"].as_str().unwrap_or("product")
            ),
            ClientEventType::Archived => "Archived".to_string(),
            ClientEventType::Restored => "Restored".to_string(),
            ClientEventType::Other(ref kind) => kind.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum ClientEventType {
    StageChanged,
    ProductAssigned,
    Archived,
    Restored,
    Other(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClientEvent {
    pub client_id: ClientId,
    pub admin_id: AdminId,
    pub event_type: ClientEventType,
    pub event_data: Value,
    pub created_at: NaiveDateTime,
}

impl NewClientEvent {
    #[must_use]
    pub fn new(
        client_id: ClientId,
        admin_id: AdminId,
        event_type: ClientEventType,
        event_data: Value,
    ) -> Self {
        Self {
            client_id,
            admin_id,
            event_type,
            event_data,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Records a move of the legacy pipeline pointer.
    #[must_use]
    pub fn return_stage_changed(
        client_id: ClientId,
        admin_id: AdminId,
        from: Option<&str>,
        to: &str,
    ) -> Self {
        Self::new(
            client_id,
            admin_id,
            ClientEventType::StageChanged,
            json!({ "from": from, "to": to }),
        )
    }

    /// Records a move of a client product's pointer.
    #[must_use]
    pub fn product_stage_changed(
        client_id: ClientId,
        admin_id: AdminId,
        client_product_id: ClientProductId,
        from: Option<&str>,
        to: &str,
    ) -> Self {
        Self::new(
            client_id,
            admin_id,
            ClientEventType::StageChanged,
            json!({
                "client_product_id": client_product_id.get(),
                "from": from,
                "to": to,
            }),
        )
    }
}

impl Display for ClientEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientEventType::StageChanged => write!(f, "StageChanged"),
            ClientEventType::ProductAssigned => write!(f, "ProductAssigned"),
            ClientEventType::Archived => write!(f, "Archived"),
            ClientEventType::Restored => write!(f, "Restored"),
            ClientEventType::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ClientEventType {
    fn from(s: &str) -> Self {
        match s {
            "StageChanged" => ClientEventType::StageChanged,
            "ProductAssigned" => ClientEventType::ProductAssigned,
            "Archived" => ClientEventType::Archived,
            "Restored" => ClientEventType::Restored,
            _ => ClientEventType::Other(s.to_string()),
        }
    }
}

impl From<String> for ClientEventType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}
