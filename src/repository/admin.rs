use diesel::{prelude::*, upsert::excluded};

use crate::domain::admin::{Admin, NewAdmin};
use crate::models::admin::{Admin as DbAdmin, NewAdmin as DbNewAdmin};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AdminWriter, DieselRepository};

impl AdminWriter for DieselRepository {
    fn create_or_update_admin(&self, new_admin: &NewAdmin) -> RepositoryResult<Admin> {
        use crate::schema::admins;

        let mut conn = self.conn()?;
        let db_new_admin: DbNewAdmin = new_admin.into();

        let db_admin = diesel::insert_into(admins::table)
            .values(&db_new_admin)
            .on_conflict((admins::email, admins::hub_id))
            .do_update()
            .set(admins::name.eq(excluded(admins::name)))
            .get_result::<DbAdmin>(&mut conn)?;

        Admin::try_from(db_admin).map_err(RepositoryError::from)
    }
}
