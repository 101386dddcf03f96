use serde::Deserialize;
use validator::Validate;

use crate::domain::client::NewClient;
use crate::domain::types::{ClientEmail, ClientName, HubId, TypeConstraintError};

#[derive(Deserialize, Validate)]
/// Form data for onboarding a client.
pub struct AddClientForm {
    #[validate(length(min = 1))]
    pub name: String,
    /// Optional; an empty field means no email.
    #[serde(default)]
    pub email: String,
}

/// Validated onboarding data.
pub struct AddClientPayload {
    pub name: ClientName,
    pub email: Option<ClientEmail>,
}

impl TryFrom<AddClientForm> for AddClientPayload {
    type Error = TypeConstraintError;

    fn try_from(form: AddClientForm) -> Result<Self, Self::Error> {
        let email = match form.email.trim() {
            "" => None,
            email => Some(ClientEmail::new(email)?),
        };
        Ok(Self {
            name: ClientName::new(form.name)?,
            email,
        })
    }
}

impl AddClientPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewClient {
        NewClient::new(hub_id, self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_email_is_dropped() {
        let payload = AddClientPayload::try_from(AddClientForm {
            name: " Jane ".to_string(),
            email: "  ".to_string(),
        })
        .expect("valid form");
        assert_eq!(payload.name.as_str(), "Jane");
        assert!(payload.email.is_none());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let result = AddClientPayload::try_from(AddClientForm {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
        });
        assert!(matches!(result, Err(TypeConstraintError::InvalidEmail)));
    }
}
