use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{Client as DomainClient, NewClient as DomainNewClient};
use crate::domain::stage::ReturnStage;
use crate::domain::types::{ClientEmail, ClientId, ClientName, HubId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub return_stage: Option<String>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`]. New clients carry no recorded stage.
pub struct NewClient<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Single-row write of the legacy pipeline pointer.
pub struct UpdateReturnStage<'a> {
    pub return_stage: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
pub struct UpdateArchived {
    pub archived: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::try_from(client.id)?,
            hub_id: HubId::try_from(client.hub_id)?,
            name: ClientName::new(client.name)?,
            email: client.email.map(ClientEmail::new).transpose()?,
            return_stage: client
                .return_stage
                .as_deref()
                .map(ReturnStage::try_from)
                .transpose()?,
            archived: client.archived,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            hub_id: client.hub_id.get(),
            name: client.name.as_str(),
            email: client.email.as_ref().map(ClientEmail::as_str),
        }
    }
}

impl UpdateReturnStage<'_> {
    #[must_use]
    pub fn new(stage: ReturnStage, updated_at: NaiveDateTime) -> Self {
        Self {
            return_stage: stage.as_str(),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn db_client(return_stage: Option<&str>) -> Client {
        let now = Utc::now().naive_utc();
        Client {
            id: 1,
            hub_id: 2,
            name: "Jane Doe".to_string(),
            email: Some("jane@example.com".to_string()),
            return_stage: return_stage.map(str::to_string),
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn from_domain_new_creates_newclient() {
        let domain = DomainNewClient::new(
            HubId::new(1).expect("valid hub id"),
            ClientName::new("John").expect("valid name"),
            ClientEmail::new("john@example.com").ok(),
        );
        let new: NewClient = (&domain).into();
        assert_eq!(new.hub_id, 1);
        assert_eq!(new.name, "John");
        assert_eq!(new.email, Some("john@example.com"));
    }

    #[test]
    fn client_into_domain_parses_stage() {
        let domain = DomainClient::try_from(db_client(Some("quality_review")))
            .expect("valid client");
        assert_eq!(domain.id.get(), 1);
        assert_eq!(domain.hub_id.get(), 2);
        assert_eq!(domain.return_stage, Some(ReturnStage::QualityReview));

        let domain = DomainClient::try_from(db_client(None)).expect("valid client");
        assert_eq!(domain.return_stage, None);
    }

    #[test]
    fn unknown_stored_stage_is_rejected() {
        let result = DomainClient::try_from(db_client(Some("submitted")));
        assert_eq!(
            result.err(),
            Some(TypeConstraintError::UnknownStage("submitted".to_string()))
        );
    }
}
