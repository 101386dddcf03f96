//! Kanban board: clients grouped into one column per stage.
//!
//! The board is a plain value. Drag and drop is reduced to
//! [`resolve_drop_target`] and [`Board::move_card`], so the gesture handling
//! can be exercised without any UI event plumbing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::product::{ClientProduct, Product};
use crate::domain::progress::{progress_percent, return_progress_percent};
use crate::domain::stage::ReturnStage;
use crate::domain::types::{ClientName, ProductId};

/// Which pipeline a board shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "product_id", rename_all = "snake_case")]
pub enum BoardScope {
    /// Legacy per-client return pipeline; column keys are stage slugs.
    Returns,
    /// A product's stages; column keys are stage ids.
    Product(ProductId),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStage {
    pub key: String,
    pub label: String,
    pub color: String,
}

impl PartialEq<str> for BoardStage {
    fn eq(&self, other: &str) -> bool {
        self.key == other
    }
}

/// A card is either a client (returns board) or a client product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCard {
    pub id: i32,
    pub client_id: i32,
    pub name: String,
    pub stage_key: String,
    pub progress: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub scope: BoardScope,
    pub stages: Vec<BoardStage>,
    pub columns: BTreeMap<String, Vec<BoardCard>>,
}

/// Element the pointer was released over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DropZone {
    Card(i32),
    Column(String),
    Outside,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerRelease {
    pub card_id: i32,
    pub over: DropZone,
}

/// Transition the board applied locally and still owes to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingMove {
    pub card_id: i32,
    pub from: String,
    pub to: String,
}

impl Board {
    /// Empty board with one column per stage.
    pub fn new(scope: BoardScope, stages: Vec<BoardStage>) -> Self {
        let columns = stages
            .iter()
            .map(|stage| (stage.key.clone(), Vec::new()))
            .collect();
        Self {
            scope,
            stages,
            columns,
        }
    }

    /// Board of the legacy pipeline. Archived clients are skipped.
    pub fn for_returns(clients: &[Client]) -> Self {
        let stages = ReturnStage::ALL
            .iter()
            .map(|stage| BoardStage {
                key: stage.as_str().to_string(),
                label: stage.label().to_string(),
                color: stage.color().to_string(),
            })
            .collect();
        let mut board = Self::new(BoardScope::Returns, stages);

        for client in clients.iter().filter(|client| !client.archived) {
            board.place(BoardCard {
                id: client.id.get(),
                client_id: client.id.get(),
                name: client.name.to_string(),
                stage_key: client.current_stage().as_str().to_string(),
                progress: client.progress_percent(),
            });
        }
        board
    }

    /// Board of a product's stages. Instances with no pointer land in the
    /// first column.
    pub fn for_product(product: &Product, items: &[(ClientProduct, ClientName)]) -> Self {
        let stages = product
            .stages
            .iter()
            .map(|stage| BoardStage {
                key: stage.id.to_string(),
                label: stage.name.to_string(),
                color: stage.color.to_string(),
            })
            .collect();
        let mut board = Self::new(BoardScope::Product(product.id), stages);

        let Some(first) = product.first_stage() else {
            return board;
        };
        for (instance, client_name) in items {
            let stage = instance.current_stage(&product.stages).unwrap_or(first);
            board.place(BoardCard {
                id: instance.id.get(),
                client_id: instance.client_id.get(),
                name: format!("{client_name} · {}", instance.name),
                stage_key: stage.id.to_string(),
                progress: instance.progress_percent(&product.stages),
            });
        }
        board
    }

    pub fn has_column(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    pub fn column(&self, key: &str) -> &[BoardCard] {
        self.columns.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn card(&self, card_id: i32) -> Option<&BoardCard> {
        self.columns
            .values()
            .flat_map(|cards| cards.iter())
            .find(|card| card.id == card_id)
    }

    /// Moves a card to `target` in the local view.
    ///
    /// Returns the move the caller must confirm with the server, or `None`
    /// when nothing changed: unknown card, unknown column or a drop onto the
    /// card's current stage.
    pub fn move_card(&mut self, card_id: i32, target: &str) -> Option<PendingMove> {
        if !self.has_column(target) {
            return None;
        }
        let from = self.card(card_id)?.stage_key.clone();
        if from == target {
            return None;
        }

        let cards = self.columns.get_mut(&from)?;
        let position = cards.iter().position(|card| card.id == card_id)?;
        let mut card = cards.remove(position);
        card.stage_key = target.to_string();
        card.progress = match self.scope {
            BoardScope::Returns => target
                .parse::<ReturnStage>()
                .map(return_progress_percent)
                .unwrap_or_default(),
            BoardScope::Product(_) => progress_percent(&self.stages, Some(target)),
        };
        self.columns
            .entry(target.to_string())
            .or_default()
            .push(card);

        Some(PendingMove {
            card_id,
            from,
            to: target.to_string(),
        })
    }

    fn place(&mut self, card: BoardCard) {
        self.columns
            .entry(card.stage_key.clone())
            .or_default()
            .push(card);
    }
}

/// Stage key a drop lands on.
///
/// A release over a card takes that card's stage, a release over a column
/// takes the column's stage, anything else cancels the drag.
pub fn resolve_drop_target(board: &Board, over: &DropZone) -> Option<String> {
    match over {
        DropZone::Card(card_id) => board.card(*card_id).map(|card| card.stage_key.clone()),
        DropZone::Column(key) if board.has_column(key) => Some(key.clone()),
        DropZone::Column(_) | DropZone::Outside => None,
    }
}
