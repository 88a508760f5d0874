use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::domain::errors::StoreError;
use crate::domain::order::{Delivery, Item, Order, Payment};
use crate::domain::ports::OrderRepository;
use crate::schema::{delivery, items, orders, payment};

use super::models::{DeliveryRow, ItemRow, NewItemRow, OrderRow, PaymentRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for StoreError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => StoreError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                StoreError::Unavailable(info.message().to_string())
            }
            other => StoreError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Loads the sub-records of an order whose `orders` row is already in hand.
fn assemble(conn: &mut PgConnection, row: OrderRow) -> Result<Order, StoreError> {
    let uid = row.order_uid.clone();

    let delivery = delivery::table
        .filter(delivery::order_uid.eq(uid.as_str()))
        .select(DeliveryRow::as_select())
        .first(conn)
        .optional()?
        .map(Delivery::from)
        .unwrap_or_else(|| {
            log::warn!("Delivery info not found for order {}", uid);
            Delivery::default()
        });

    let payment = payment::table
        .filter(payment::order_uid.eq(uid.as_str()))
        .select(PaymentRow::as_select())
        .first(conn)
        .optional()?
        .map(Payment::from)
        .unwrap_or_else(|| {
            log::warn!("Payment info not found for order {}", uid);
            Payment::default()
        });

    let items = items::table
        .filter(items::order_uid.eq(uid.as_str()))
        .order(items::id.asc())
        .select(ItemRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Item::from)
        .collect();

    Ok(row.into_order(delivery, payment, items))
}

impl OrderRepository for DieselOrderRepository {
    fn persist(&self, order: &Order) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, StoreError, _>(|conn| {
            // Any failed insert returns early and rolls back all four tables.
            diesel::insert_into(orders::table)
                .values(&OrderRow::from(order))
                .execute(conn)?;

            diesel::insert_into(delivery::table)
                .values(&DeliveryRow::new(&order.order_uid, &order.delivery))
                .execute(conn)?;

            diesel::insert_into(payment::table)
                .values(&PaymentRow::new(&order.order_uid, &order.payment))
                .execute(conn)?;

            if !order.items.is_empty() {
                let rows: Vec<NewItemRow<'_>> = order
                    .items
                    .iter()
                    .map(|item| NewItemRow::new(&order.order_uid, item))
                    .collect();
                diesel::insert_into(items::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(())
        })?;

        log::info!("Order {} persisted", order.order_uid);
        Ok(())
    }

    fn fetch(&self, order_uid: &str) -> Result<Order, StoreError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .filter(orders::order_uid.eq(order_uid))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(StoreError::NotFound)?;

        assemble(&mut conn, row)
    }

    fn recent(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.get()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = orders::table
            .select(OrderRow::as_select())
            .order(orders::date_created.desc())
            .limit(limit)
            .load(&mut conn)?;

        rows.into_iter()
            .rev()
            .map(|row| assemble(&mut conn, row))
            .collect()
    }
}
