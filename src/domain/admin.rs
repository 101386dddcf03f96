use serde::{Deserialize, Serialize};

use crate::domain::types::{AdminEmail, AdminId, AdminName, HubId, TypeConstraintError};

/// Staff member who moves clients through the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Admin {
    pub id: AdminId,
    pub hub_id: HubId,
    pub name: AdminName,
    pub email: AdminEmail,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewAdmin {
    pub hub_id: HubId,
    pub name: AdminName,
    pub email: AdminEmail,
}

impl NewAdmin {
    #[must_use]
    pub fn new(hub_id: HubId, name: AdminName, email: AdminEmail) -> Self {
        Self {
            hub_id,
            name,
            email,
        }
    }

    pub fn try_new(hub_id: i32, name: String, email: String) -> Result<Self, TypeConstraintError> {
        Ok(Self::new(
            HubId::new(hub_id)?,
            AdminName::new(name)?,
            AdminEmail::new(email)?,
        ))
    }
}
