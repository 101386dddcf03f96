//! Diesel models for products, their stages and client product instances.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    ClientProduct as DomainClientProduct, NewClientProduct as DomainNewClientProduct,
    Product as DomainProduct,
};
use crate::domain::stage::{NewStage as DomainNewStage, Stage as DomainStage, sort_stages};
use crate::domain::types::{
    ClientId, ClientProductId, ClientProductName, DisplayLocation, HubId, ProductId, ProductName,
    StageColor, StageId, StageName, StageSlug, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub display_location: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub display_location: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Product, foreign_key = product_id))]
#[diesel(table_name = crate::schema::stages)]
pub struct Stage {
    pub id: i32,
    pub product_id: i32,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stages)]
pub struct NewStage<'a> {
    pub product_id: i32,
    pub name: &'a str,
    pub slug: &'a str,
    pub color: &'a str,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Product, foreign_key = product_id))]
#[diesel(table_name = crate::schema::client_products)]
pub struct ClientProduct {
    pub id: i32,
    pub client_id: i32,
    pub product_id: i32,
    pub current_stage_id: Option<i32>,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::client_products)]
pub struct NewClientProduct<'a> {
    pub client_id: i32,
    pub product_id: i32,
    pub current_stage_id: Option<i32>,
    pub name: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::client_products)]
/// Single-row write of a client product's pointer.
pub struct UpdateClientProductStage {
    pub current_stage_id: i32,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Stage> for DomainStage {
    type Error = TypeConstraintError;

    fn try_from(stage: Stage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: StageId::try_from(stage.id)?,
            product_id: ProductId::try_from(stage.product_id)?,
            name: StageName::new(stage.name)?,
            slug: StageSlug::new(stage.slug)?,
            color: StageColor::new(stage.color)?,
            sort_order: stage.sort_order,
            created_at: stage.created_at,
        })
    }
}

/// Assembles a product with its stages in registry order.
pub fn product_with_stages(
    product: Product,
    stages: Vec<Stage>,
) -> Result<DomainProduct, TypeConstraintError> {
    let mut stages = stages
        .into_iter()
        .map(DomainStage::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    sort_stages(&mut stages);

    Ok(DomainProduct {
        id: ProductId::try_from(product.id)?,
        hub_id: HubId::try_from(product.hub_id)?,
        name: ProductName::new(product.name)?,
        display_location: DisplayLocation::new(product.display_location)?,
        is_active: product.is_active,
        created_at: product.created_at,
        stages,
    })
}

impl TryFrom<ClientProduct> for DomainClientProduct {
    type Error = TypeConstraintError;

    fn try_from(item: ClientProduct) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientProductId::try_from(item.id)?,
            client_id: ClientId::try_from(item.client_id)?,
            product_id: ProductId::try_from(item.product_id)?,
            current_stage_id: item.current_stage_id.map(StageId::try_from).transpose()?,
            name: ClientProductName::new(item.name)?,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

impl<'a> NewStage<'a> {
    pub fn new(product_id: i32, stage: &'a DomainNewStage) -> Self {
        Self {
            product_id,
            name: stage.name.as_str(),
            slug: stage.slug.as_str(),
            color: stage.color.as_str(),
            sort_order: stage.sort_order,
        }
    }
}

impl<'a> From<&'a DomainNewClientProduct> for NewClientProduct<'a> {
    fn from(item: &'a DomainNewClientProduct) -> Self {
        Self {
            client_id: item.client_id.get(),
            product_id: item.product_id.get(),
            current_stage_id: item.current_stage_id.map(StageId::get),
            name: item.name.as_str(),
        }
    }
}
