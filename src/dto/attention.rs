use serde::Serialize;

use crate::domain::progress::AttentionSignals;
use crate::dto::main::ClientRow;

/// Row of the "needs attention" triage list.
#[derive(Debug, Clone, Serialize)]
pub struct AttentionRow {
    pub client: ClientRow,
    pub signals: AttentionSignals,
}

pub struct AttentionPageData {
    pub rows: Vec<AttentionRow>,
}
