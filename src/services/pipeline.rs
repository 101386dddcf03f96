//! Transition API: reads and moves the current-stage pointers.
//!
//! Moves may go forward or backward. Moving a record to the stage it already
//! holds writes nothing. Every real move is one single-row update followed by
//! a `StageChanged` audit event naming the acting admin. Concurrent moves of
//! the same record are last-write-wins.

use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::client::Client;
use crate::domain::client_event::NewClientEvent;
use crate::domain::product::ClientProduct;
use crate::domain::stage::{ReturnStage, Stage};
use crate::domain::types::{ClientId, ClientProductId, HubId, ProductId, StageId};
use crate::repository::{
    AdminWriter, ClientEventWriter, ClientProductReader, ClientProductWriter, ClientReader,
    ClientWriter, ProductReader,
};
use crate::services::{ServiceError, ServiceResult, acting_admin, ensure_role, user_hub};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Stage list of a product, in registry order.
pub fn list_product_stages<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Vec<Stage>>
where
    R: ProductReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user_hub(user)?;

    let product = repo
        .get_product_by_id(ProductId::new(product_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(product.stages)
}

/// Current legacy stage of a client; an unrecorded stage reads as the first.
pub fn get_return_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<ReturnStage>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user_hub(user)?;

    let client = find_client(repo, ClientId::new(client_id)?, hub_id)?;
    Ok(client.current_stage())
}

/// Moves a client along the legacy pipeline.
///
/// Fails with [`ServiceError::InvalidStage`] when `stage` is not one of the
/// fixed pipeline values; the stored state is untouched in that case.
pub fn set_return_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
    stage: &str,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + AdminWriter + ClientEventWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user_hub(user)?;

    let client = find_client(repo, ClientId::new(client_id)?, hub_id)?;
    let target: ReturnStage = stage.parse()?;

    if client.current_stage() == target {
        return Ok(client);
    }

    let admin = acting_admin(repo, user)?;

    let updated = repo
        .update_return_stage(client.id, hub_id, target)
        .map_err(|err| {
            log::error!("Failed to move client {} to {target}: {err}", client.id);
            ServiceError::from(err)
        })?;

    log::info!(
        "Admin {} moved client {} from {} to {target}",
        admin.id,
        client.id,
        client.current_stage()
    );

    let event = NewClientEvent::return_stage_changed(
        client.id,
        admin.id,
        client.return_stage.map(ReturnStage::as_str),
        target.as_str(),
    );
    if let Err(err) = repo.create_client_event(&event) {
        log::error!("Failed to record stage change of client {}: {err}", client.id);
    }

    Ok(updated)
}

/// Current stage of a client product, `None` when the pointer is unset.
pub fn get_product_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_product_id: i32,
) -> ServiceResult<Option<Stage>>
where
    R: ClientProductReader + ProductReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user_hub(user)?;

    let item = find_client_product(repo, ClientProductId::new(client_product_id)?, hub_id)?;
    let stages = repo.list_stages(item.product_id)?;

    Ok(item.current_stage(&stages).cloned())
}

/// Moves a client product to `stage_id`.
///
/// The stage must belong to the client product's own product, otherwise the
/// call fails with [`ServiceError::InvalidStage`] and nothing is written.
pub fn set_product_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_product_id: i32,
    stage_id: i32,
) -> ServiceResult<ClientProduct>
where
    R: ClientProductReader
        + ClientProductWriter
        + ProductReader
        + AdminWriter
        + ClientEventWriter
        + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user_hub(user)?;

    let item = find_client_product(repo, ClientProductId::new(client_product_id)?, hub_id)?;
    let stages = repo.list_stages(item.product_id)?;

    let target = StageId::new(stage_id)
        .ok()
        .and_then(|id| stages.iter().find(|stage| stage.id == id))
        .ok_or_else(|| ServiceError::InvalidStage(stage_id.to_string()))?;

    if item.current_stage_id == Some(target.id) {
        return Ok(item);
    }

    let admin = acting_admin(repo, user)?;

    let updated = repo
        .update_client_product_stage(item.id, target.id)
        .map_err(|err| {
            log::error!(
                "Failed to move client product {} to stage {}: {err}",
                item.id,
                target.id
            );
            ServiceError::from(err)
        })?;

    let from = item.current_stage(&stages).map(|stage| stage.slug.as_str());
    log::info!(
        "Admin {} moved client product {} from {} to {}",
        admin.id,
        item.id,
        from.unwrap_or("-"),
        target.slug
    );

    let event = NewClientEvent::product_stage_changed(
        item.client_id,
        admin.id,
        item.id,
        from,
        target.slug.as_str(),
    );
    if let Err(err) = repo.create_client_event(&event) {
        log::error!(
            "Failed to record stage change of client product {}: {err}",
            item.id
        );
    }

    Ok(updated)
}

fn find_client<R>(repo: &R, client_id: ClientId, hub_id: HubId) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    repo.get_client_by_id(client_id, hub_id)?
        .ok_or(ServiceError::NotFound)
}

fn find_client_product<R>(
    repo: &R,
    client_product_id: ClientProductId,
    hub_id: HubId,
) -> ServiceResult<ClientProduct>
where
    R: ClientProductReader + ?Sized,
{
    repo.get_client_product_by_id(client_product_id, hub_id)?
        .ok_or(ServiceError::NotFound)
}
