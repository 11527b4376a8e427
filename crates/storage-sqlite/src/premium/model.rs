use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::premium::{NewOrder, Order, Premium};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::premiums)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PremiumDB {
    pub id: String,
    pub user_id: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<PremiumDB> for Premium {
    fn from(db: PremiumDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            active: db.active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderDB {
    pub id: String,
    pub user_id: String,
    pub total: i64,
    pub payment_id: String,
    pub order_id: String,
    pub created_at: NaiveDateTime,
}

impl From<OrderDB> for Order {
    fn from(db: OrderDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            total: db.total,
            payment_id: db.payment_id,
            order_id: db.order_id,
            created_at: db.created_at,
        }
    }
}

impl OrderDB {
    pub fn new(user_id: &str, order: NewOrder) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            total: order.total,
            payment_id: order.payment_id,
            order_id: order.order_id,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
