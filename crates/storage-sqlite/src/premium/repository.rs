use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::info;
use std::sync::Arc;

use fintrack_core::premium::{NewOrder, Order, Premium, PremiumRepositoryTrait};
use fintrack_core::Result;

use super::model::{OrderDB, PremiumDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{orders, premiums};

pub struct PremiumRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PremiumRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PremiumRepositoryTrait for PremiumRepository {
    fn get_by_user(&self, user_id: &str) -> Result<Option<Premium>> {
        let mut conn = get_connection(&self.pool)?;
        let premium = premiums::table
            .filter(premiums::user_id.eq(user_id))
            .select(PremiumDB::as_select())
            .first::<PremiumDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(premium.map(Premium::from))
    }

    async fn activate(&self, user_id: &str, order: NewOrder) -> Result<(Premium, Order)> {
        let order_db = OrderDB::new(user_id, order);
        let now = order_db.created_at;
        let premium_db = PremiumDB {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<(Premium, Order)> {
                let order = diesel::insert_into(orders::table)
                    .values(&order_db)
                    .returning(OrderDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                let premium = diesel::insert_into(premiums::table)
                    .values(&premium_db)
                    .on_conflict(premiums::user_id)
                    .do_update()
                    .set((premiums::active.eq(true), premiums::updated_at.eq(now)))
                    .returning(PremiumDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                info!("Premium activated for user {}", premium.user_id);
                Ok((premium.into(), order.into()))
            })
            .await
    }
}
