//! Client detail page and the admin actions offered on it.

use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;
use validator::Validate;

use crate::domain::client::Client;
use crate::domain::client_event::{ClientEventType, NewClientEvent};
use crate::domain::product::{ClientProduct, NewClientProduct};
use crate::domain::types::{ClientId, ClientProductName, HubId, ProductId};
use crate::dto::client::{ClientPageData, ClientProductView, EventView, StageOption};
use crate::forms::client::{ArchiveClientForm, AssignProductForm};
use crate::repository::{
    AdminWriter, AttentionReader, ClientEventListQuery, ClientEventReader, ClientEventWriter,
    ClientProductReader, ClientProductWriter, ClientReader, ClientWriter, ProductReader,
};
use crate::services::attention::client_signals;
use crate::services::{ServiceError, ServiceResult, acting_admin, ensure_role, user_hub};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

const HISTORY_LIMIT: usize = 50;

fn find_client<R>(repo: &R, client_id: ClientId, hub_id: HubId) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    repo.get_client_by_id(client_id, hub_id)
        .map_err(|err| {
            log::error!("Failed to get client {client_id}: {err}");
            ServiceError::from(err)
        })?
        .ok_or(ServiceError::NotFound)
}

fn record_event<R>(repo: &R, event: &NewClientEvent)
where
    R: ClientEventWriter + ?Sized,
{
    if let Err(err) = repo.create_client_event(event) {
        log::error!(
            "Failed to record {} event of client {}: {err}",
            event.event_type,
            event.client_id
        );
    }
}

/// Loads everything the client page renders.
pub fn load_client_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<ClientPageData>
where
    R: ClientReader
        + ProductReader
        + ClientProductReader
        + ClientEventReader
        + AttentionReader
        + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user_hub(user)?;

    let client = find_client(repo, ClientId::new(client_id)?, hub_id)?;

    let catalog = repo.list_products(hub_id)?;
    let items = repo.list_client_products(client.id)?;

    let products = items
        .into_iter()
        .filter_map(|item| {
            let product = catalog.iter().find(|product| product.id == item.product_id);
            if product.is_none() {
                log::warn!("Client product {} refers to a missing product", item.id);
            }
            product.map(|product| ClientProductView::new(item, product))
        })
        .collect::<Vec<_>>();

    let available_products = catalog
        .iter()
        .filter(|product| product.is_active)
        .filter(|product| {
            !products
                .iter()
                .any(|view| view.item.product_id == product.id)
        })
        .cloned()
        .collect();

    let signals = client_signals(repo, client.id)?;

    let (total_events, events) = repo
        .list_client_events(ClientEventListQuery::new(client.id).paginate(1, HISTORY_LIMIT))
        .map_err(|err| {
            log::error!("Failed to list events of client {}: {err}", client.id);
            ServiceError::from(err)
        })?;

    Ok(ClientPageData {
        stages: StageOption::for_returns(client.current_stage()),
        client: client.into(),
        products,
        available_products,
        signals,
        events: events.into_iter().map(EventView::from).collect(),
        total_events,
    })
}

/// Archives or restores a client. The stage pointer is left untouched.
pub fn archive_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ArchiveClientForm,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + AdminWriter + ClientEventWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user_hub(user)?;

    let client = find_client(repo, ClientId::new(form.client_id)?, hub_id)?;
    if client.archived == form.archived {
        return Ok(client);
    }

    let admin = acting_admin(repo, user)?;
    let updated = repo
        .set_client_archived(client.id, hub_id, form.archived)
        .map_err(|err| {
            log::error!("Failed to archive client {}: {err}", client.id);
            ServiceError::from(err)
        })?;

    let event_type = if form.archived {
        ClientEventType::Archived
    } else {
        ClientEventType::Restored
    };
    record_event(
        repo,
        &NewClientEvent::new(client.id, admin.id, event_type, json!({})),
    );

    Ok(updated)
}

/// Creates a client product positioned at the product's first stage.
pub fn assign_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AssignProductForm,
) -> ServiceResult<ClientProduct>
where
    R: ClientReader
        + ProductReader
        + ClientProductWriter
        + AdminWriter
        + ClientEventWriter
        + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid product assignment".to_string()));
    }

    let hub_id = user_hub(user)?;
    let client = find_client(repo, ClientId::new(form.client_id)?, hub_id)?;
    let product = repo
        .get_product_by_id(ProductId::new(form.product_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    if !product.is_active {
        return Err(ServiceError::Form(format!(
            "Product {} is not active",
            product.name
        )));
    }

    let name = ClientProductName::new(form.name)?;
    let new_item = NewClientProduct::for_product(client.id, &product, name);

    let admin = acting_admin(repo, user)?;
    let created = repo.create_client_product(&new_item).map_err(|err| {
        log::error!("Failed to assign product {} to client {}: {err}", product.id, client.id);
        ServiceError::from(err)
    })?;

    record_event(
        repo,
        &NewClientEvent::new(
            client.id,
            admin.id,
            ClientEventType::ProductAssigned,
            json!({
                "client_product_id": created.id.get(),
                "product_id": product.id.get(),
                "name": created.name.as_str(),
            }),
        ),
    );

    Ok(created)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::client_event::ClientEvent;
    use crate::domain::product::Product;
    use crate::domain::progress::AttentionSignals;
    use crate::domain::stage::{ReturnStage, Stage};
    use crate::domain::types::{
        ClientEventId, ClientProductId, DisplayLocation, ProductName, StageColor, StageId,
        StageName, StageSlug,
    };
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, admin, admin_user, client, viewer_user};

    fn stage(id: i32, product_id: i32, slug: &str, sort_order: i32) -> Stage {
        Stage {
            id: StageId::new(id).expect("valid id"),
            product_id: ProductId::new(product_id).expect("valid id"),
            name: StageName::new(slug).expect("valid name"),
            slug: StageSlug::new(slug).expect("valid slug"),
            color: StageColor::default(),
            sort_order,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn product(id: i32, is_active: bool) -> Product {
        Product {
            id: ProductId::new(id).expect("valid id"),
            hub_id: HubId::new(HUB).expect("valid hub"),
            name: ProductName::new(format!("Product {id}")).expect("valid name"),
            display_location: DisplayLocation::new("dashboard").expect("valid location"),
            is_active,
            created_at: Utc::now().naive_utc(),
            stages: vec![
                stage(id * 10 + 1, id, "intake", 0),
                stage(id * 10 + 2, id, "done", 1),
            ],
        }
    }

    fn client_product(id: i32, product_id: i32, stage_id: Option<i32>) -> ClientProduct {
        let now = Utc::now().naive_utc();
        ClientProduct {
            id: ClientProductId::new(id).expect("valid id"),
            client_id: ClientId::new(1).expect("valid id"),
            product_id: ProductId::new(product_id).expect("valid id"),
            current_stage_id: stage_id.and_then(|id| StageId::new(id).ok()),
            name: ClientProductName::new("2024 Return").expect("valid name"),
            created_at: now,
            updated_at: now,
        }
    }

    fn echo_event(repo: &mut MockRepository) {
        repo.expect_create_client_event().returning(|event| {
            Ok(ClientEvent {
                id: ClientEventId::new(1).expect("valid id"),
                client_id: event.client_id,
                admin_id: event.admin_id,
                event_type: event.event_type.clone(),
                event_data: event.event_data.clone(),
                created_at: event.created_at,
            })
        });
    }

    #[test]
    fn client_page_combines_products_signals_and_history() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_, _| Ok(Some(client(1, "Alice", Some(ReturnStage::Filing)))));
        repo.expect_list_products()
            .returning(|_| Ok(vec![product(1, true), product(2, true), product(3, false)]));
        repo.expect_list_client_products()
            .returning(|_| Ok(vec![client_product(5, 1, Some(12))]));
        repo.expect_unread_message_count().returning(|_| Ok(2));
        repo.expect_pending_document_count().returning(|_| Ok(0));
        repo.expect_pending_signature_count().returning(|_| Ok(1));
        repo.expect_list_client_events().returning(|_| Ok((0, Vec::new())));

        let data = load_client_page(&repo, &viewer_user(), 1).expect("page");

        assert_eq!(data.client.progress, 89);
        assert_eq!(data.stages.iter().filter(|s| s.selected).count(), 1);
        assert_eq!(data.products.len(), 1);
        assert_eq!(data.products[0].progress, 100);
        assert!(data.products[0].complete);
        let available: Vec<_> = data.available_products.iter().map(|p| p.id.get()).collect();
        assert_eq!(available, vec![2]);
        assert_eq!(data.signals, AttentionSignals::new(2, 0, 1));
    }

    #[test]
    fn missing_client_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_, _| Ok(None));

        let result = load_client_page(&repo, &viewer_user(), 9);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn archiving_keeps_stage_and_records_event() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_, _| Ok(Some(client(1, "Alice", Some(ReturnStage::Filed)))));
        repo.expect_create_or_update_admin().returning(|_| Ok(admin()));
        repo.expect_set_client_archived()
            .withf(|id, _, archived| id.get() == 1 && *archived)
            .times(1)
            .returning(|_, _, _| {
                let mut archived = client(1, "Alice", Some(ReturnStage::Filed));
                archived.archived = true;
                Ok(archived)
            });
        repo.expect_create_client_event()
            .withf(|event| event.event_type == ClientEventType::Archived)
            .times(1)
            .returning(|event| {
                Ok(ClientEvent {
                    id: ClientEventId::new(1).expect("valid id"),
                    client_id: event.client_id,
                    admin_id: event.admin_id,
                    event_type: event.event_type.clone(),
                    event_data: event.event_data.clone(),
                    created_at: event.created_at,
                })
            });

        let form = ArchiveClientForm {
            client_id: 1,
            archived: true,
        };
        let updated = archive_client(&repo, &admin_user(), form).expect("archived");
        assert!(updated.archived);
        assert_eq!(updated.return_stage, Some(ReturnStage::Filed));
    }

    #[test]
    fn archiving_twice_writes_nothing() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_, _| {
            let mut archived = client(1, "Alice", None);
            archived.archived = true;
            Ok(Some(archived))
        });
        repo.expect_set_client_archived().times(0);
        repo.expect_create_client_event().times(0);

        let form = ArchiveClientForm {
            client_id: 1,
            archived: true,
        };
        assert!(archive_client(&repo, &admin_user(), form).is_ok());
    }

    #[test]
    fn assigned_product_starts_at_first_stage() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_, _| Ok(Some(client(1, "Alice", None))));
        repo.expect_get_product_by_id()
            .returning(|id, _| Ok(Some(product(id.get(), true))));
        repo.expect_create_or_update_admin().returning(|_| Ok(admin()));
        repo.expect_create_client_product()
            .withf(|new_item| new_item.current_stage_id == StageId::new(21).ok())
            .times(1)
            .returning(|new_item| {
                Ok(client_product(
                    8,
                    new_item.product_id.get(),
                    new_item.current_stage_id.map(StageId::get),
                ))
            });
        echo_event(&mut repo);

        let form = AssignProductForm {
            client_id: 1,
            product_id: 2,
            name: "2024 Return".to_string(),
        };
        let created = assign_product(&repo, &admin_user(), form).expect("assigned");
        assert_eq!(created.current_stage_id, StageId::new(21).ok());
    }

    #[test]
    fn inactive_product_cannot_be_assigned() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_, _| Ok(Some(client(1, "Alice", None))));
        repo.expect_get_product_by_id()
            .returning(|id, _| Ok(Some(product(id.get(), false))));
        repo.expect_create_client_product().times(0);

        let form = AssignProductForm {
            client_id: 1,
            product_id: 3,
            name: "2024 Return".to_string(),
        };
        let result = assign_product(&repo, &admin_user(), form);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
