use serde::Deserialize;

use crate::domain::board::{DropZone, PointerRelease};

#[derive(Deserialize)]
/// Drop submitted without JavaScript: a card and the column picked for it.
pub struct MoveCardForm {
    pub product: Option<i32>,
    pub card_id: i32,
    pub target: String,
}

impl From<&MoveCardForm> for PointerRelease {
    fn from(form: &MoveCardForm) -> Self {
        PointerRelease {
            card_id: form.card_id,
            over: DropZone::Column(form.target.clone()),
        }
    }
}
