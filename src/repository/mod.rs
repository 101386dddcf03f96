//! Storage seams of the portal and their Diesel implementation.

use crate::db::{DbConnection, DbPool};
use crate::domain::admin::{Admin, NewAdmin};
use crate::domain::client::{Client, NewClient};
use crate::domain::client_event::{ClientEvent, ClientEventType, NewClientEvent};
use crate::domain::product::{ClientProduct, NewClientProduct, NewProduct, Product};
use crate::domain::progress::AttentionSignals;
use crate::domain::stage::{ReturnStage, Stage};
use crate::domain::types::{
    ClientId, ClientName, ClientProductId, HubId, ProductId, StageId,
};
use crate::repository::errors::RepositoryResult;

pub mod admin;
pub mod attention;
pub mod client;
pub mod client_event;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod product;

/// Diesel backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Rows to skip. Pages past the addressable range clamp to `i64::MAX`
    /// and read as empty.
    pub fn offset(&self) -> i64 {
        let skipped = self.page.saturating_sub(1).saturating_mul(self.per_page);
        i64::try_from(skipped).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    /// `None` lists both archived and active clients.
    pub archived: Option<bool>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            archived: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientEventListQuery {
    pub client_id: ClientId,
    pub event_type: Option<ClientEventType>,
    pub pagination: Option<Pagination>,
}

impl ClientEventListQuery {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            event_type: None,
            pagination: None,
        }
    }

    pub fn event_type(mut self, event_type: ClientEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Client directory reads, always scoped to a hub.
pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId, hub_id: HubId) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    /// Writes the legacy pointer and stamps `updated_at` in one statement.
    fn update_return_stage(
        &self,
        id: ClientId,
        hub_id: HubId,
        stage: ReturnStage,
    ) -> RepositoryResult<Client>;
    fn set_client_archived(
        &self,
        id: ClientId,
        hub_id: HubId,
        archived: bool,
    ) -> RepositoryResult<Client>;
}

pub trait ProductReader {
    fn get_product_by_id(&self, id: ProductId, hub_id: HubId) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, hub_id: HubId) -> RepositoryResult<Vec<Product>>;
    /// Stages of a product ascending by sort order, ties by creation order.
    fn list_stages(&self, product_id: ProductId) -> RepositoryResult<Vec<Stage>>;
}

pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn set_product_active(
        &self,
        id: ProductId,
        hub_id: HubId,
        is_active: bool,
    ) -> RepositoryResult<Product>;
}

pub trait ClientProductReader {
    fn get_client_product_by_id(
        &self,
        id: ClientProductId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<ClientProduct>>;
    fn list_client_products(&self, client_id: ClientId) -> RepositoryResult<Vec<ClientProduct>>;
    /// Instances of a product held by the hub's non-archived clients.
    fn list_product_cards(
        &self,
        product_id: ProductId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(ClientProduct, ClientName)>>;
}

pub trait ClientProductWriter {
    fn create_client_product(
        &self,
        new_client_product: &NewClientProduct,
    ) -> RepositoryResult<ClientProduct>;
    /// Writes the product pointer and stamps `updated_at` in one statement.
    fn update_client_product_stage(
        &self,
        id: ClientProductId,
        stage_id: StageId,
    ) -> RepositoryResult<ClientProduct>;
}

pub trait AdminWriter {
    fn create_or_update_admin(&self, new_admin: &NewAdmin) -> RepositoryResult<Admin>;
}

pub trait ClientEventReader {
    fn list_client_events(
        &self,
        query: ClientEventListQuery,
    ) -> RepositoryResult<(usize, Vec<(ClientEvent, Admin)>)>;
}

pub trait ClientEventWriter {
    fn create_client_event(&self, client_event: &NewClientEvent) -> RepositoryResult<ClientEvent>;
}

/// Counts owned by the messages, documents and signatures subsystems.
pub trait AttentionReader {
    fn unread_message_count(&self, client_id: ClientId) -> RepositoryResult<usize>;
    fn pending_document_count(&self, client_id: ClientId) -> RepositoryResult<usize>;
    fn pending_signature_count(&self, client_id: ClientId) -> RepositoryResult<usize>;
    /// Non-archived clients of the hub with their signals, busiest first.
    fn list_attention_signals(
        &self,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(Client, AttentionSignals)>>;
}
