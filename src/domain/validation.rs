//! Semantic checks run on a decoded order before anything is written.
//!
//! Every check short-circuits: the first violated constraint is reported and
//! the rest are not evaluated.

use super::errors::ValidationError;
use super::order::{Delivery, Item, Order, Payment};

const ITEM_STATUSES: [i32; 3] = [200, 400, 404];
const ITEM_TRACK_NUMBER_LEN: usize = 13;
const ITEM_RID_LEN: usize = 19;

type Check = Result<(), ValidationError>;

fn non_empty(field: &str, value: &str) -> Check {
    if value.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

fn exact_len(field: &str, value: &str, len: usize) -> Check {
    let actual = value.chars().count();
    if actual != len {
        return Err(ValidationError::new(
            field,
            format!("expected {len} characters, got {actual} ({value:?})"),
        ));
    }
    Ok(())
}

fn longer_than_one(field: &str, value: &str) -> Check {
    if value.chars().count() <= 1 {
        return Err(ValidationError::new(
            field,
            format!("expected more than 1 character, got {value:?}"),
        ));
    }
    Ok(())
}

fn positive<T>(field: &str, value: T) -> Check
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ValidationError::new(
            field,
            format!("must be greater than 0, got {value}"),
        ));
    }
    Ok(())
}

pub fn validate_order(order: &Order) -> Check {
    non_empty("order_uid", &order.order_uid)?;
    non_empty("track_number", &order.track_number)?;
    non_empty("entry", &order.entry)?;
    exact_len("locale", &order.locale, 2)?;
    non_empty("customer_id", &order.customer_id)?;
    non_empty("delivery_service", &order.delivery_service)?;
    non_empty("shardkey", &order.shardkey)?;
    non_empty("oof_shard", &order.oof_shard)?;
    if order.sm_id < 0 {
        return Err(ValidationError::new(
            "sm_id",
            format!("must not be negative, got {}", order.sm_id),
        ));
    }

    validate_delivery(&order.delivery)?;
    validate_payment(&order.payment)?;

    for (idx, item) in order.items.iter().enumerate() {
        validate_item(item).map_err(|e| ValidationError {
            field: format!("items[{idx}].{}", e.field),
            message: e.message,
        })?;
    }
    Ok(())
}

pub fn validate_delivery(d: &Delivery) -> Check {
    non_empty("delivery.name", &d.name)?;
    if !d.phone.starts_with('+') {
        return Err(ValidationError::new(
            "delivery.phone",
            format!("must start with '+', got {:?}", d.phone),
        ));
    }
    longer_than_one("delivery.zip", &d.zip)?;
    longer_than_one("delivery.city", &d.city)?;
    longer_than_one("delivery.address", &d.address)?;
    longer_than_one("delivery.region", &d.region)?;
    if !d.email.contains('@') {
        return Err(ValidationError::new(
            "delivery.email",
            format!("must contain '@', got {:?}", d.email),
        ));
    }
    Ok(())
}

pub fn validate_payment(p: &Payment) -> Check {
    non_empty("payment.transaction", &p.transaction)?;
    exact_len("payment.currency", &p.currency, 3)?;
    non_empty("payment.provider", &p.provider)?;
    positive("payment.amount", p.amount)?;
    positive("payment.payment_dt", p.payment_dt)?;
    non_empty("payment.bank", &p.bank)?;
    positive("payment.delivery_cost", p.delivery_cost)?;
    positive("payment.goods_total", p.goods_total)?;
    positive("payment.custom_fee", p.custom_fee)?;
    Ok(())
}

/// Field paths are relative to the item; [`validate_order`] prefixes them.
pub fn validate_item(i: &Item) -> Check {
    positive("chrt_id", i.chrt_id)?;
    exact_len("track_number", &i.track_number, ITEM_TRACK_NUMBER_LEN)?;
    positive("price", i.price)?;
    exact_len("rid", &i.rid, ITEM_RID_LEN)?;
    non_empty("name", &i.name)?;
    if !(0..=100).contains(&i.sale) {
        return Err(ValidationError::new(
            "sale",
            format!("expected 0-100, got {}", i.sale),
        ));
    }
    non_empty("size", &i.size)?;
    positive("total_price", i.total_price)?;
    positive("nm_id", i.nm_id)?;
    non_empty("brand", &i.brand)?;
    if !ITEM_STATUSES.contains(&i.status) {
        return Err(ValidationError::new(
            "status",
            format!("expected one of 200, 400, 404, got {}", i.status),
        ));
    }
    Ok(())
}
