use chrono::Utc;
use diesel::prelude::*;

use crate::domain::product::{ClientProduct, NewClientProduct, NewProduct, Product};
use crate::domain::stage::{Stage, sort_stages};
use crate::domain::types::{ClientId, ClientName, ClientProductId, HubId, ProductId, StageId};
use crate::models::product::{
    ClientProduct as DbClientProduct, NewClientProduct as DbNewClientProduct,
    NewProduct as DbNewProduct, NewStage as DbNewStage, Product as DbProduct, Stage as DbStage,
    UpdateClientProductStage, product_with_stages,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ClientProductReader, ClientProductWriter, DieselRepository, ProductReader, ProductWriter,
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: ProductId, hub_id: HubId) -> RepositoryResult<Option<Product>> {
        use crate::schema::{products, stages};

        let mut conn = self.conn()?;
        let Some(db_product) = products::table
            .filter(products::id.eq(id.get()))
            .filter(products::hub_id.eq(hub_id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let db_stages = stages::table
            .filter(stages::product_id.eq(db_product.id))
            .load::<DbStage>(&mut conn)?;

        let product = product_with_stages(db_product, db_stages).map_err(RepositoryError::from)?;
        Ok(Some(product))
    }

    fn list_products(&self, hub_id: HubId) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_products = products::table
            .filter(products::hub_id.eq(hub_id.get()))
            .order(products::name.asc())
            .load::<DbProduct>(&mut conn)?;

        let db_stages = DbStage::belonging_to(&db_products)
            .load::<DbStage>(&mut conn)?
            .grouped_by(&db_products);

        db_products
            .into_iter()
            .zip(db_stages)
            .map(|(product, stages)| {
                product_with_stages(product, stages).map_err(RepositoryError::from)
            })
            .collect()
    }

    fn list_stages(&self, product_id: ProductId) -> RepositoryResult<Vec<Stage>> {
        use crate::schema::stages;

        let mut conn = self.conn()?;
        let mut stages = stages::table
            .filter(stages::product_id.eq(product_id.get()))
            .load::<DbStage>(&mut conn)?
            .into_iter()
            .map(|db_stage| Stage::try_from(db_stage).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;
        sort_stages(&mut stages);

        Ok(stages)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::{products, stages};

        let mut conn = self.conn()?;

        let (db_product, db_stages) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let db_product = diesel::insert_into(products::table)
                    .values(&DbNewProduct {
                        hub_id: new_product.hub_id.get(),
                        name: new_product.name.as_str(),
                        display_location: new_product.display_location.as_str(),
                    })
                    .get_result::<DbProduct>(conn)?;

                let db_new_stages = new_product
                    .stages
                    .iter()
                    .map(|stage| DbNewStage::new(db_product.id, stage))
                    .collect::<Vec<_>>();
                if !db_new_stages.is_empty() {
                    diesel::insert_into(stages::table)
                        .values(&db_new_stages)
                        .execute(conn)?;
                }

                let db_stages = stages::table
                    .filter(stages::product_id.eq(db_product.id))
                    .load::<DbStage>(conn)?;

                Ok((db_product, db_stages))
            })?;

        product_with_stages(db_product, db_stages).map_err(RepositoryError::from)
    }

    fn set_product_active(
        &self,
        id: ProductId,
        hub_id: HubId,
        is_active: bool,
    ) -> RepositoryResult<Product> {
        use crate::schema::{products, stages};

        let mut conn = self.conn()?;
        let db_product = diesel::update(
            products::table
                .filter(products::id.eq(id.get()))
                .filter(products::hub_id.eq(hub_id.get())),
        )
        .set(products::is_active.eq(is_active))
        .get_result::<DbProduct>(&mut conn)?;

        let db_stages = stages::table
            .filter(stages::product_id.eq(db_product.id))
            .load::<DbStage>(&mut conn)?;

        product_with_stages(db_product, db_stages).map_err(RepositoryError::from)
    }
}

impl ClientProductReader for DieselRepository {
    fn get_client_product_by_id(
        &self,
        id: ClientProductId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<ClientProduct>> {
        use crate::schema::{client_products, clients};

        let mut conn = self.conn()?;
        let db_item = client_products::table
            .inner_join(clients::table)
            .filter(client_products::id.eq(id.get()))
            .filter(clients::hub_id.eq(hub_id.get()))
            .select(DbClientProduct::as_select())
            .first::<DbClientProduct>(&mut conn)
            .optional()?;

        match db_item {
            Some(db_item) => Ok(Some(
                ClientProduct::try_from(db_item).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_client_products(&self, client_id: ClientId) -> RepositoryResult<Vec<ClientProduct>> {
        use crate::schema::client_products;

        let mut conn = self.conn()?;
        client_products::table
            .filter(client_products::client_id.eq(client_id.get()))
            .order(client_products::created_at.desc())
            .load::<DbClientProduct>(&mut conn)?
            .into_iter()
            .map(|db_item| ClientProduct::try_from(db_item).map_err(RepositoryError::from))
            .collect()
    }

    fn list_product_cards(
        &self,
        product_id: ProductId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(ClientProduct, ClientName)>> {
        use crate::schema::{client_products, clients};

        let mut conn = self.conn()?;
        let rows = client_products::table
            .inner_join(clients::table)
            .filter(client_products::product_id.eq(product_id.get()))
            .filter(clients::hub_id.eq(hub_id.get()))
            .filter(clients::archived.eq(false))
            .order((clients::name.asc(), client_products::id.asc()))
            .select((DbClientProduct::as_select(), clients::name))
            .load::<(DbClientProduct, String)>(&mut conn)?;

        rows.into_iter()
            .map(|(db_item, name)| {
                let item = ClientProduct::try_from(db_item).map_err(RepositoryError::from)?;
                let name = ClientName::new(name).map_err(RepositoryError::from)?;
                Ok((item, name))
            })
            .collect()
    }
}

impl ClientProductWriter for DieselRepository {
    fn create_client_product(
        &self,
        new_client_product: &NewClientProduct,
    ) -> RepositoryResult<ClientProduct> {
        use crate::schema::client_products;

        let mut conn = self.conn()?;
        let db_new: DbNewClientProduct = new_client_product.into();

        let db_item = diesel::insert_into(client_products::table)
            .values(&db_new)
            .get_result::<DbClientProduct>(&mut conn)?;

        ClientProduct::try_from(db_item).map_err(RepositoryError::from)
    }

    fn update_client_product_stage(
        &self,
        id: ClientProductId,
        stage_id: StageId,
    ) -> RepositoryResult<ClientProduct> {
        use crate::schema::client_products;

        let mut conn = self.conn()?;
        let changes = UpdateClientProductStage {
            current_stage_id: stage_id.get(),
            updated_at: Utc::now().naive_utc(),
        };

        let db_item = diesel::update(client_products::table.find(id.get()))
            .set(&changes)
            .get_result::<DbClientProduct>(&mut conn)?;

        ClientProduct::try_from(db_item).map_err(RepositoryError::from)
    }
}
