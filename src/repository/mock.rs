//! Mock repository used to isolate services in tests.

use mockall::mock;

use crate::domain::admin::{Admin, NewAdmin};
use crate::domain::client::{Client, NewClient};
use crate::domain::client_event::{ClientEvent, NewClientEvent};
use crate::domain::product::{ClientProduct, NewClientProduct, NewProduct, Product};
use crate::domain::progress::AttentionSignals;
use crate::domain::stage::{ReturnStage, Stage};
use crate::domain::types::{ClientId, ClientName, ClientProductId, HubId, ProductId, StageId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AdminWriter, AttentionReader, ClientEventListQuery, ClientEventReader, ClientEventWriter,
    ClientListQuery, ClientProductReader, ClientProductWriter, ClientReader, ClientWriter,
    ProductReader, ProductWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId, hub_id: HubId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
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

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: ProductId, hub_id: HubId) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, hub_id: HubId) -> RepositoryResult<Vec<Product>>;
        fn list_stages(&self, product_id: ProductId) -> RepositoryResult<Vec<Stage>>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn set_product_active(
            &self,
            id: ProductId,
            hub_id: HubId,
            is_active: bool,
        ) -> RepositoryResult<Product>;
    }

    impl ClientProductReader for Repository {
        fn get_client_product_by_id(
            &self,
            id: ClientProductId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<ClientProduct>>;
        fn list_client_products(&self, client_id: ClientId) -> RepositoryResult<Vec<ClientProduct>>;
        fn list_product_cards(
            &self,
            product_id: ProductId,
            hub_id: HubId,
        ) -> RepositoryResult<Vec<(ClientProduct, ClientName)>>;
    }

    impl ClientProductWriter for Repository {
        fn create_client_product(
            &self,
            new_client_product: &NewClientProduct,
        ) -> RepositoryResult<ClientProduct>;
        fn update_client_product_stage(
            &self,
            id: ClientProductId,
            stage_id: StageId,
        ) -> RepositoryResult<ClientProduct>;
    }

    impl AdminWriter for Repository {
        fn create_or_update_admin(&self, new_admin: &NewAdmin) -> RepositoryResult<Admin>;
    }

    impl ClientEventReader for Repository {
        fn list_client_events(
            &self,
            query: ClientEventListQuery,
        ) -> RepositoryResult<(usize, Vec<(ClientEvent, Admin)>)>;
    }

    impl ClientEventWriter for Repository {
        fn create_client_event(&self, client_event: &NewClientEvent) -> RepositoryResult<ClientEvent>;
    }

    impl AttentionReader for Repository {
        fn unread_message_count(&self, client_id: ClientId) -> RepositoryResult<usize>;
        fn pending_document_count(&self, client_id: ClientId) -> RepositoryResult<usize>;
        fn pending_signature_count(&self, client_id: ClientId) -> RepositoryResult<usize>;
        fn list_attention_signals(
            &self,
            hub_id: HubId,
        ) -> RepositoryResult<Vec<(Client, AttentionSignals)>>;
    }
}
