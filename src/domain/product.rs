//! Products own an ordered list of stages that client products move through.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::progress::{is_complete, progress_percent};
use crate::domain::stage::{NewStage, Stage, stage_index};
use crate::domain::types::{
    ClientId, ClientProductId, ClientProductName, DisplayLocation, HubId, ProductId, ProductName,
    StageId, TypeConstraintError,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub hub_id: HubId,
    pub name: ProductName,
    pub display_location: DisplayLocation,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    /// Stages in registry order (see [`crate::domain::stage::sort_stages`]).
    pub stages: Vec<Stage>,
}

impl Product {
    pub fn first_stage(&self) -> Option<&Stage> {
        self.stages.first()
    }

    pub fn stage(&self, stage_id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.id == stage_id)
    }
}

/// Product definition with its stages. Slugs and sort orders are unique.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub hub_id: HubId,
    pub name: ProductName,
    pub display_location: DisplayLocation,
    pub stages: Vec<NewStage>,
}

impl NewProduct {
    pub fn try_new(
        hub_id: HubId,
        name: ProductName,
        display_location: DisplayLocation,
        stages: Vec<NewStage>,
    ) -> Result<Self, TypeConstraintError> {
        let mut slugs = HashSet::new();
        let mut orders = HashSet::new();
        for stage in &stages {
            if !slugs.insert(stage.slug.as_str()) {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "duplicate stage slug `{}`",
                    stage.slug
                )));
            }
            if !orders.insert(stage.sort_order) {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "duplicate stage sort order {}",
                    stage.sort_order
                )));
            }
        }

        Ok(Self {
            hub_id,
            name,
            display_location,
            stages,
        })
    }
}

/// A client's instance of a product and its pointer into the product stages.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientProduct {
    pub id: ClientProductId,
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub current_stage_id: Option<StageId>,
    pub name: ClientProductName,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ClientProduct {
    /// Resolves the pointer against the product's stage list.
    pub fn current_stage<'a>(&self, stages: &'a [Stage]) -> Option<&'a Stage> {
        let current = self.current_stage_id?;
        stage_index(stages, &current).map(|index| &stages[index])
    }

    pub fn progress_percent(&self, stages: &[Stage]) -> u8 {
        progress_percent(stages, self.current_stage_id.as_ref())
    }

    pub fn is_complete(&self, stages: &[Stage]) -> bool {
        is_complete(stages, self.current_stage_id.as_ref())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClientProduct {
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub current_stage_id: Option<StageId>,
    pub name: ClientProductName,
}

impl NewClientProduct {
    /// Instance of `product` for a client, pointing at the product's first stage.
    #[must_use]
    pub fn for_product(client_id: ClientId, product: &Product, name: ClientProductName) -> Self {
        Self {
            client_id,
            product_id: product.id,
            current_stage_id: product.first_stage().map(|stage| stage.id),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{StageColor, StageName, StageSlug};

    fn stage(id: i32, slug: &str, sort_order: i32) -> Stage {
        Stage {
            id: StageId::new(id).expect("valid stage id"),
            product_id: ProductId::new(1).expect("valid product id"),
            name: StageName::new(slug).expect("valid name"),
            slug: StageSlug::new(slug).expect("valid slug"),
            color: StageColor::default(),
            sort_order,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn product(stages: Vec<Stage>) -> Product {
        Product {
            id: ProductId::new(1).expect("valid product id"),
            hub_id: HubId::new(1).expect("valid hub id"),
            name: ProductName::new("Individual Return").expect("valid name"),
            display_location: DisplayLocation::new("dashboard").expect("valid location"),
            is_active: true,
            created_at: Utc::now().naive_utc(),
            stages,
        }
    }

    #[test]
    fn rejects_duplicate_slugs_and_orders() {
        let hub_id = HubId::new(1).expect("valid hub id");
        let name = ProductName::new("Bookkeeping").expect("valid name");
        let location = DisplayLocation::new("dashboard").expect("valid location");

        let duplicate_slug = vec![
            NewStage::from_name("Intake", 0).expect("valid stage"),
            NewStage::from_name("intake", 1).expect("valid stage"),
        ];
        assert!(
            NewProduct::try_new(hub_id, name.clone(), location.clone(), duplicate_slug).is_err()
        );

        let duplicate_order = vec![
            NewStage::from_name("Intake", 0).expect("valid stage"),
            NewStage::from_name("Done", 0).expect("valid stage"),
        ];
        assert!(
            NewProduct::try_new(hub_id, name.clone(), location.clone(), duplicate_order).is_err()
        );

        let valid = vec![
            NewStage::from_name("Intake", 0).expect("valid stage"),
            NewStage::from_name("Done", 1).expect("valid stage"),
        ];
        assert!(NewProduct::try_new(hub_id, name, location, valid).is_ok());
    }

    #[test]
    fn new_instance_points_at_first_stage() {
        let product = product(vec![stage(4, "intake", 0), stage(5, "done", 1)]);
        let client_id = ClientId::new(3).expect("valid client id");
        let name = ClientProductName::new("2024 Return").expect("valid name");

        let instance = NewClientProduct::for_product(client_id, &product, name.clone());
        assert_eq!(instance.current_stage_id, StageId::new(4).ok());

        let empty = product_without_stages();
        let instance = NewClientProduct::for_product(client_id, &empty, name);
        assert_eq!(instance.current_stage_id, None);
    }

    fn product_without_stages() -> Product {
        product(Vec::new())
    }

    #[test]
    fn client_product_projects_progress() {
        let stages = vec![stage(1, "intake", 0), stage(2, "review", 1), stage(3, "done", 2)];
        let now = Utc::now().naive_utc();
        let mut instance = ClientProduct {
            id: ClientProductId::new(1).expect("valid id"),
            client_id: ClientId::new(1).expect("valid id"),
            product_id: ProductId::new(1).expect("valid id"),
            current_stage_id: StageId::new(2).ok(),
            name: ClientProductName::new("Return").expect("valid name"),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(instance.progress_percent(&stages), 67);
        assert_eq!(
            instance.current_stage(&stages).map(|s| s.slug.as_str()),
            Some("review")
        );
        assert!(!instance.is_complete(&stages));

        instance.current_stage_id = StageId::new(3).ok();
        assert!(instance.is_complete(&stages));

        instance.current_stage_id = None;
        assert_eq!(instance.progress_percent(&stages), 0);
        assert!(instance.current_stage(&stages).is_none());
    }
}
