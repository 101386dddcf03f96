use serde::Deserialize;
use validator::Validate;

use crate::domain::product::NewProduct;
use crate::domain::stage::NewStage;
use crate::domain::types::{DisplayLocation, HubId, ProductName, TypeConstraintError};

#[derive(Deserialize, Validate)]
/// Product definition; `stages` holds one stage name per line, in order.
pub struct AddProductForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default = "default_display_location")]
    pub display_location: String,
    #[serde(default)]
    pub stages: String,
}

fn default_display_location() -> String {
    "dashboard".to_string()
}

#[derive(Deserialize)]
pub struct ProductActiveForm {
    pub product_id: i32,
    #[serde(default)]
    pub is_active: bool,
}

/// Validated product definition.
pub struct AddProductPayload {
    pub name: ProductName,
    pub display_location: DisplayLocation,
    pub stages: Vec<NewStage>,
}

impl TryFrom<AddProductForm> for AddProductPayload {
    type Error = TypeConstraintError;

    fn try_from(form: AddProductForm) -> Result<Self, Self::Error> {
        let stages = form
            .stages
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| NewStage::from_name(line, index as i32))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: ProductName::new(form.name)?,
            display_location: DisplayLocation::new(form.display_location)?,
            stages,
        })
    }
}

impl AddProductPayload {
    pub fn into_domain(self, hub_id: HubId) -> Result<NewProduct, TypeConstraintError> {
        NewProduct::try_new(hub_id, self.name, self.display_location, self.stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(stages: &str) -> AddProductForm {
        AddProductForm {
            name: "Bookkeeping".to_string(),
            display_location: default_display_location(),
            stages: stages.to_string(),
        }
    }

    #[test]
    fn stages_follow_line_order() {
        let payload =
            AddProductPayload::try_from(form("Intake\n\n  Bank Verification \nDone")).expect("valid");
        let slugs: Vec<_> = payload.stages.iter().map(|s| s.slug.as_str()).collect();
        let orders: Vec<_> = payload.stages.iter().map(|s| s.sort_order).collect();
        assert_eq!(slugs, ["intake", "bank_verification", "done"]);
        assert_eq!(orders, [0, 1, 2]);
    }

    #[test]
    fn duplicate_stage_names_are_rejected() {
        let payload = AddProductPayload::try_from(form("Review\nreview")).expect("parsed");
        let hub_id = HubId::new(1).expect("valid hub id");
        assert!(payload.into_domain(hub_id).is_err());
    }
}
