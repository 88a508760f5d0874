use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::order::{Delivery, Item, Order, Payment};
use crate::schema::{delivery, items, orders, payment};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub order_uid: String,
    pub track_number: String,
    pub entry: String,
    pub locale: String,
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    pub shardkey: String,
    pub sm_id: i32,
    pub date_created: DateTime<Utc>,
    pub oof_shard: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = delivery)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryRow {
    pub order_uid: String,
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
    pub email: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = payment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub order_uid: String,
    pub transaction: String,
    pub request_id: String,
    pub currency: String,
    pub provider: String,
    pub amount: i32,
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i32,
    pub goods_total: i32,
    pub custom_fee: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub id: i64,
    pub order_uid: String,
    pub chrt_id: i64,
    pub track_number: String,
    pub price: i32,
    pub rid: String,
    pub name: String,
    pub sale: i32,
    pub size: String,
    pub total_price: i32,
    pub nm_id: i64,
    pub brand: String,
    pub status: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow<'a> {
    pub order_uid: &'a str,
    pub chrt_id: i64,
    pub track_number: &'a str,
    pub price: i32,
    pub rid: &'a str,
    pub name: &'a str,
    pub sale: i32,
    pub size: &'a str,
    pub total_price: i32,
    pub nm_id: i64,
    pub brand: &'a str,
    pub status: i32,
}

// ── Aggregate <-> row mapping ────────────────────────────────────────────────

impl From<&Order> for OrderRow {
    fn from(o: &Order) -> Self {
        Self {
            order_uid: o.order_uid.clone(),
            track_number: o.track_number.clone(),
            entry: o.entry.clone(),
            locale: o.locale.clone(),
            internal_signature: o.internal_signature.clone(),
            customer_id: o.customer_id.clone(),
            delivery_service: o.delivery_service.clone(),
            shardkey: o.shardkey.clone(),
            sm_id: o.sm_id,
            date_created: o.date_created,
            oof_shard: o.oof_shard.clone(),
        }
    }
}

impl DeliveryRow {
    pub fn new(order_uid: &str, d: &Delivery) -> Self {
        Self {
            order_uid: order_uid.to_string(),
            name: d.name.clone(),
            phone: d.phone.clone(),
            zip: d.zip.clone(),
            city: d.city.clone(),
            address: d.address.clone(),
            region: d.region.clone(),
            email: d.email.clone(),
        }
    }
}

impl From<DeliveryRow> for Delivery {
    fn from(r: DeliveryRow) -> Self {
        Self {
            name: r.name,
            phone: r.phone,
            zip: r.zip,
            city: r.city,
            address: r.address,
            region: r.region,
            email: r.email,
        }
    }
}

impl PaymentRow {
    pub fn new(order_uid: &str, p: &Payment) -> Self {
        Self {
            order_uid: order_uid.to_string(),
            transaction: p.transaction.clone(),
            request_id: p.request_id.clone(),
            currency: p.currency.clone(),
            provider: p.provider.clone(),
            amount: p.amount,
            payment_dt: p.payment_dt,
            bank: p.bank.clone(),
            delivery_cost: p.delivery_cost,
            goods_total: p.goods_total,
            custom_fee: p.custom_fee,
        }
    }
}

impl From<PaymentRow> for Payment {
    fn from(r: PaymentRow) -> Self {
        Self {
            transaction: r.transaction,
            request_id: r.request_id,
            currency: r.currency,
            provider: r.provider,
            amount: r.amount,
            payment_dt: r.payment_dt,
            bank: r.bank,
            delivery_cost: r.delivery_cost,
            goods_total: r.goods_total,
            custom_fee: r.custom_fee,
        }
    }
}

impl<'a> NewItemRow<'a> {
    pub fn new(order_uid: &'a str, i: &'a Item) -> Self {
        Self {
            order_uid,
            chrt_id: i.chrt_id,
            track_number: &i.track_number,
            price: i.price,
            rid: &i.rid,
            name: &i.name,
            sale: i.sale,
            size: &i.size,
            total_price: i.total_price,
            nm_id: i.nm_id,
            brand: &i.brand,
            status: i.status,
        }
    }
}

impl From<ItemRow> for Item {
    fn from(r: ItemRow) -> Self {
        Self {
            chrt_id: r.chrt_id,
            track_number: r.track_number,
            price: r.price,
            rid: r.rid,
            name: r.name,
            sale: r.sale,
            size: r.size,
            total_price: r.total_price,
            nm_id: r.nm_id,
            brand: r.brand,
            status: r.status,
        }
    }
}

impl OrderRow {
    pub fn into_order(self, delivery: Delivery, payment: Payment, items: Vec<Item>) -> Order {
        Order {
            order_uid: self.order_uid,
            track_number: self.track_number,
            entry: self.entry,
            delivery,
            payment,
            items,
            locale: self.locale,
            internal_signature: self.internal_signature,
            customer_id: self.customer_id,
            delivery_service: self.delivery_service,
            shardkey: self.shardkey,
            sm_id: self.sm_id,
            date_created: self.date_created,
            oof_shard: self.oof_shard,
        }
    }
}
