use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::stage::ReturnStage;
use crate::pagination::Paginated;

/// Query parameters accepted by the index page.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    /// Show archived clients instead of active ones.
    #[serde(default)]
    pub archived: bool,
}

/// Client with its legacy pipeline projection.
#[derive(Debug, Clone, Serialize)]
pub struct ClientRow {
    pub client: Client,
    pub stage: ReturnStage,
    pub stage_label: &'static str,
    pub stage_color: &'static str,
    pub progress: u8,
    pub complete: bool,
}

impl From<Client> for ClientRow {
    fn from(client: Client) -> Self {
        let stage = client.current_stage();
        Self {
            stage,
            stage_label: stage.label(),
            stage_color: stage.color(),
            progress: client.progress_percent(),
            complete: client.is_complete(),
            client,
        }
    }
}

/// Data required to render the main index template.
pub struct IndexPageData {
    pub clients: Paginated<ClientRow>,
    pub search_query: Option<String>,
    pub show_archived: bool,
}
