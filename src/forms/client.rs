use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
/// Manual selection of a client's legacy stage.
pub struct SetStageForm {
    pub client_id: i32,
    #[validate(length(min = 1))]
    pub stage: String,
}

#[derive(Deserialize)]
/// Toggles the archived flag. Stage is left as is.
pub struct ArchiveClientForm {
    pub client_id: i32,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Deserialize, Validate)]
/// Assigns a product to a client.
pub struct AssignProductForm {
    pub client_id: i32,
    pub product_id: i32,
    /// Label of the instance, e.g. "2024 Individual Return".
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Deserialize)]
/// Manual selection of a client product's stage.
pub struct SetProductStageForm {
    pub client_id: i32,
    pub client_product_id: i32,
    pub stage_id: i32,
}
