//! DTOs exposed by the JSON API.

use serde::{Deserialize, Serialize};

use crate::domain::board::{Board, DropZone};
use crate::dto::main::ClientRow;

/// Query parameters accepted by `GET /api/v1/clients`.
#[derive(Debug, Default, Deserialize)]
pub struct ClientsQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub archived: Option<bool>,
}

/// Result payload returned by [`crate::services::api::list_clients`].
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    /// Total number of clients matching the filter.
    pub total: usize,
    pub clients: Vec<ClientRow>,
}

/// Query parameters accepted by `GET /api/v1/board`.
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// Product whose stages are shown; the returns pipeline when absent.
    pub product: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnStageUpdate {
    pub stage: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductStageUpdate {
    pub stage_id: i32,
}

/// Body of `POST /api/v1/board/drop`.
#[derive(Debug, Deserialize)]
pub struct DropRequest {
    pub product: Option<i32>,
    pub card_id: i32,
    pub over: DropZone,
}

#[derive(Debug, Serialize)]
pub struct DropResponse {
    pub moved: bool,
    pub board: Board,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Authoritative board to render after a failed drop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            board: None,
        }
    }
}
