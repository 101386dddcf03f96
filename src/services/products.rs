//! Product catalog management.

use pushkind_common::domain::auth::AuthenticatedUser;
use validator::Validate;

use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::dto::products::ProductsPageData;
use crate::forms::products::{AddProductForm, AddProductPayload, ProductActiveForm};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role, user_hub};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

pub fn load_products_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user_hub(user)?;

    let products = repo.list_products(hub_id).map_err(|err| {
        log::error!("Failed to list products: {err}");
        ServiceError::from(err)
    })?;

    Ok(ProductsPageData { products })
}

/// Defines a product and its ordered stages in one write.
pub fn add_product<R>(repo: &R, user: &AuthenticatedUser, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid product form".to_string()));
    }

    let hub_id = user_hub(user)?;
    let new_product = AddProductPayload::try_from(form)
        .and_then(|payload| payload.into_domain(hub_id))
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&new_product).map_err(|err| {
        log::error!("Failed to add product: {err}");
        ServiceError::from(err)
    })
}

/// Inactive products stay on existing clients but cannot be assigned.
pub fn set_product_active<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProductActiveForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user_hub(user)?;

    repo.set_product_active(ProductId::new(form.product_id)?, hub_id, form.is_active)
        .map_err(|err| {
            log::error!("Failed to update product {}: {err}", form.product_id);
            ServiceError::from(err)
        })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::stage::Stage;
    use crate::domain::types::{DisplayLocation, HubId, ProductName, StageId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, admin_user, viewer_user};

    fn created(new_product: &crate::domain::product::NewProduct) -> Product {
        let now = Utc::now().naive_utc();
        Product {
            id: ProductId::new(1).expect("valid id"),
            hub_id: HubId::new(HUB).expect("valid hub"),
            name: new_product.name.clone(),
            display_location: new_product.display_location.clone(),
            is_active: true,
            created_at: now,
            stages: new_product
                .stages
                .iter()
                .enumerate()
                .map(|(index, stage)| Stage {
                    id: StageId::new(index as i32 + 1).expect("valid id"),
                    product_id: ProductId::new(1).expect("valid id"),
                    name: stage.name.clone(),
                    slug: stage.slug.clone(),
                    color: stage.color.clone(),
                    sort_order: stage.sort_order,
                    created_at: now,
                })
                .collect(),
        }
    }

    #[test]
    fn product_is_created_with_ordered_stages() {
        let mut repo = MockRepository::new();
        repo.expect_create_product()
            .withf(|new_product| new_product.stages.len() == 3)
            .times(1)
            .returning(|new_product| Ok(created(new_product)));

        let form = AddProductForm {
            name: "Bookkeeping".to_string(),
            display_location: "dashboard".to_string(),
            stages: "Intake\nReconciliation\nDone".to_string(),
        };
        let product = add_product(&repo, &admin_user(), form).expect("created");

        let slugs: Vec<_> = product.stages.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["intake", "reconciliation", "done"]);
        assert_eq!(product.first_stage().map(|s| s.sort_order), Some(0));
    }

    #[test]
    fn duplicate_stage_names_are_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_product().times(0);

        let form = AddProductForm {
            name: "Bookkeeping".to_string(),
            display_location: "dashboard".to_string(),
            stages: "Intake\nintake".to_string(),
        };
        let result = add_product(&repo, &admin_user(), form);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn viewers_cannot_toggle_products() {
        let repo = MockRepository::new();
        let form = ProductActiveForm {
            product_id: 1,
            is_active: false,
        };
        let result = set_product_active(&repo, &viewer_user(), form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn unknown_product_toggle_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_set_product_active()
            .returning(|_, _, _| Err(RepositoryError::NotFound));
        let form = ProductActiveForm {
            product_id: 4,
            is_active: false,
        };
        let result = set_product_active(&repo, &admin_user(), form);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn products_page_lists_catalog() {
        let mut repo = MockRepository::new();
        let new_product = crate::domain::product::NewProduct::try_new(
            HubId::new(HUB).expect("valid hub"),
            ProductName::new("Payroll").expect("valid name"),
            DisplayLocation::new("dashboard").expect("valid location"),
            Vec::new(),
        )
        .expect("valid product");
        let catalog = vec![created(&new_product)];
        repo.expect_list_products()
            .returning(move |_| Ok(catalog.clone()));

        let data = load_products_page(&repo, &viewer_user()).expect("page");
        assert_eq!(data.products[0].name.as_str(), "Payroll");
    }
}
