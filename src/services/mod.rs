//! Business workflows shared by the HTML routes and the JSON API.

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::domain::admin::{Admin, NewAdmin};
use crate::domain::types::HubId;
use crate::repository::AdminWriter;

pub mod api;
pub mod attention;
pub mod board;
pub mod client;
pub mod errors;
pub mod main;
pub mod pipeline;
pub mod products;

pub use errors::{ServiceError, ServiceResult};

/// Fails with [`ServiceError::Unauthorized`] unless the user holds `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub(crate) fn user_hub(user: &AuthenticatedUser) -> ServiceResult<HubId> {
    Ok(HubId::new(user.hub_id)?)
}

/// Upserts the authenticated user as the admin recorded on audit events.
pub(crate) fn acting_admin<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Admin>
where
    R: AdminWriter + ?Sized,
{
    let name = if user.name.trim().is_empty() {
        user.email.clone()
    } else {
        user.name.clone()
    };
    let new_admin = NewAdmin::try_new(user.hub_id, name, user.email.clone())?;

    repo.create_or_update_admin(&new_admin).map_err(|err| {
        log::error!("Failed to record acting admin: {err}");
        ServiceError::from(err)
    })
}
