//! Diesel models for admins acting on the pipeline.

use diesel::prelude::*;

use crate::domain::admin::{Admin as DomainAdmin, NewAdmin as DomainNewAdmin};
use crate::domain::types::{AdminEmail, AdminId, AdminName, HubId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::admins)]
pub struct Admin {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::admins)]
pub struct NewAdmin<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: &'a str,
}

impl TryFrom<Admin> for DomainAdmin {
    type Error = TypeConstraintError;

    fn try_from(admin: Admin) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AdminId::try_from(admin.id)?,
            hub_id: HubId::try_from(admin.hub_id)?,
            name: AdminName::new(admin.name)?,
            email: AdminEmail::new(admin.email)?,
        })
    }
}

impl<'a> From<&'a DomainNewAdmin> for NewAdmin<'a> {
    fn from(admin: &'a DomainNewAdmin) -> Self {
        Self {
            hub_id: admin.hub_id.get(),
            name: admin.name.as_str(),
            email: admin.email.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_domain_newadmin() {
        let domain = DomainNewAdmin::try_new(1, "Alice".into(), "alice@example.com".into())
            .expect("valid admin");
        let new: NewAdmin = (&domain).into();
        assert_eq!(new.hub_id, 1);
        assert_eq!(new.name, "Alice");
        assert_eq!(new.email, "alice@example.com");
    }

    #[test]
    fn from_admin_into_domain() {
        let db = Admin {
            id: 1,
            hub_id: 2,
            name: "Bob".into(),
            email: "b@c.d".into(),
        };
        let domain = DomainAdmin::try_from(db).expect("valid admin");
        assert_eq!(domain.id.get(), 1);
        assert_eq!(domain.email.as_str(), "b@c.d");
    }
}
