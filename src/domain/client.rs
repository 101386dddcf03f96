use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::progress::return_progress_percent;
use crate::domain::stage::ReturnStage;
use crate::domain::types::{ClientEmail, ClientId, ClientName, HubId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub hub_id: HubId,
    pub name: ClientName,
    pub email: Option<ClientEmail>,
    /// Legacy pipeline pointer; `None` until an admin records a stage.
    pub return_stage: Option<ReturnStage>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    /// Stage reported to readers; absence reads as the initial stage.
    pub fn current_stage(&self) -> ReturnStage {
        self.return_stage.unwrap_or_default()
    }

    pub fn progress_percent(&self) -> u8 {
        return_progress_percent(self.current_stage())
    }

    pub fn is_complete(&self) -> bool {
        self.current_stage() == ReturnStage::terminal()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub hub_id: HubId,
    pub name: ClientName,
    pub email: Option<ClientEmail>,
}

impl NewClient {
    #[must_use]
    pub fn new(hub_id: HubId, name: ClientName, email: Option<ClientEmail>) -> Self {
        Self {
            hub_id,
            name,
            email,
        }
    }
}
