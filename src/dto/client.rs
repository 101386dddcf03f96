//! DTOs shaped for the client detail template.

use serde::Serialize;

use crate::domain::admin::Admin;
use crate::domain::client_event::ClientEvent;
use crate::domain::product::{ClientProduct, Product};
use crate::domain::progress::AttentionSignals;
use crate::domain::stage::{ReturnStage, Stage};
use crate::dto::main::ClientRow;

/// Entry of a stage picker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StageOption {
    pub key: String,
    pub label: String,
    pub color: String,
    pub selected: bool,
}

impl StageOption {
    pub fn for_returns(current: ReturnStage) -> Vec<Self> {
        ReturnStage::ALL
            .into_iter()
            .map(|stage| Self {
                key: stage.as_str().to_string(),
                label: stage.label().to_string(),
                color: stage.color().to_string(),
                selected: stage == current,
            })
            .collect()
    }

    pub fn for_product(stages: &[Stage], item: &ClientProduct) -> Vec<Self> {
        stages
            .iter()
            .map(|stage| Self {
                key: stage.id.to_string(),
                label: stage.name.to_string(),
                color: stage.color.to_string(),
                selected: item.current_stage_id == Some(stage.id),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientProductView {
    pub item: ClientProduct,
    pub product_name: String,
    pub stages: Vec<StageOption>,
    pub current_label: Option<String>,
    pub progress: u8,
    pub complete: bool,
}

impl ClientProductView {
    pub fn new(item: ClientProduct, product: &Product) -> Self {
        Self {
            product_name: product.name.to_string(),
            stages: StageOption::for_product(&product.stages, &item),
            current_label: item
                .current_stage(&product.stages)
                .map(|stage| stage.name.to_string()),
            progress: item.progress_percent(&product.stages),
            complete: item.is_complete(&product.stages),
            item,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub event: ClientEvent,
    pub admin: Admin,
    pub summary: String,
}

impl From<(ClientEvent, Admin)> for EventView {
    fn from((event, admin): (ClientEvent, Admin)) -> Self {
        Self {
            summary: event.summary(),
            event,
            admin,
        }
    }
}

/// Aggregated data required to render the client details page.
pub struct ClientPageData {
    pub client: ClientRow,
    pub stages: Vec<StageOption>,
    pub products: Vec<ClientProductView>,
    /// Active products the client can still be assigned.
    pub available_products: Vec<Product>,
    pub signals: AttentionSignals,
    pub events: Vec<EventView>,
    pub total_events: usize,
}
