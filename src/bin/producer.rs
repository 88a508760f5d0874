//! Publishes fabricated orders to the orders topic.
//!
//! Usage: `producer [COUNT] [INTERVAL_MS]` (defaults: 152 orders, no pause).
//! Reads `KAFKA_BROKERS` and `KAFKA_TOPIC` from the environment or `.env`.

use std::env;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use dotenvy::dotenv;
use order_ingest::domain::order::{Delivery, Item, Order, Payment};
use rand::distr::{Alphanumeric, SampleString};
use rand::seq::IndexedRandom;
use rand::Rng;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use uuid::Uuid;

const DEFAULT_COUNT: usize = 152;
const ITEMS_PER_ORDER: usize = 3;

fn pick<R: Rng>(rng: &mut R, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

fn word<R: Rng>(rng: &mut R, len: usize) -> String {
    Alphanumeric.sample_string(rng, len)
}

fn fake_item<R: Rng>(rng: &mut R) -> Item {
    let price = rng.random_range(100..100_000);
    let sale = *[10, 20, 30, 40, 50].choose(rng).unwrap_or(&10);
    Item {
        chrt_id: rng.random_range(1..10_000),
        track_number: word(rng, 13).to_uppercase(),
        price,
        rid: word(rng, 19),
        name: word(rng, 8),
        sale,
        size: word(rng, 2),
        total_price: price * (100 - sale) / 100,
        nm_id: rng.random_range(1..1_000),
        brand: word(rng, 6),
        status: *[200, 400, 404].choose(rng).unwrap_or(&200),
    }
}

fn fake_order<R: Rng>(rng: &mut R) -> Order {
    let order_uid = Uuid::new_v4().simple().to_string();
    let items: Vec<Item> = (0..ITEMS_PER_ORDER).map(|_| fake_item(rng)).collect();
    let goods_total = items.iter().map(|i| i.total_price).sum();

    Order {
        track_number: word(rng, 13).to_uppercase(),
        entry: pick(rng, &["WBIL", "WBOL", "WBUL", "WBAL", "WBEL"]),
        delivery: Delivery {
            name: format!("{} {}", word(rng, 6), word(rng, 8)),
            phone: format!("+7{:010}", rng.random_range(0..10_000_000_000u64)),
            zip: format!("{:06}", rng.random_range(0..1_000_000)),
            city: word(rng, 7),
            address: format!("{} street {}", word(rng, 6), rng.random_range(1..200)),
            region: word(rng, 6),
            email: format!("{}@example.com", word(rng, 8).to_lowercase()),
        },
        payment: Payment {
            transaction: order_uid.clone(),
            request_id: String::new(),
            currency: pick(rng, &["USD", "EUR", "RUB", "KZT"]),
            provider: pick(rng, &["wbpay", "alfabank", "sber", "tbank", "vtb"]),
            amount: goods_total + 1,
            payment_dt: Utc::now().timestamp(),
            bank: pick(rng, &["alpha", "sber", "vtb"]),
            delivery_cost: rng.random_range(1..5_000),
            goods_total,
            custom_fee: rng.random_range(1..100),
        },
        items,
        locale: pick(rng, &["en", "ru", "kz", "by"]),
        internal_signature: pick(rng, &["", "identifier"]),
        customer_id: word(rng, 10).to_lowercase(),
        delivery_service: pick(rng, &["Russian Post", "BoxBerry", "CDEK", "5POST", "Avito"]),
        shardkey: rng.random_range(1..=5).to_string(),
        sm_id: *[1, 52, 4, 23, 76].choose(rng).unwrap_or(&1),
        date_created: Utc::now().trunc_subsecs(0),
        oof_shard: rng.random_range(1..=5).to_string(),
        order_uid,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = env::args().skip(1);
    let count: usize = args.next().map(|a| a.parse()).transpose()?.unwrap_or(DEFAULT_COUNT);
    let interval = Duration::from_millis(args.next().map(|a| a.parse()).transpose()?.unwrap_or(0));

    let brokers = env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());
    let topic = env::var("KAFKA_TOPIC").unwrap_or_else(|_| "orders".to_string());

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("message.timeout.ms", "5000")
        .create()?;

    let orders: Vec<Order> = {
        let mut rng = rand::rng();
        (0..count).map(|_| fake_order(&mut rng)).collect()
    };

    for order in &orders {
        let payload = serde_json::to_string(order)?;
        let record = FutureRecord::to(&topic)
            .key(&order.order_uid)
            .payload(&payload);
        match producer.send(record, Duration::from_secs(5)).await {
            Ok(_) => log::info!("Sent order: {}", order.order_uid),
            Err((e, _)) => log::error!("Failed to send order {}: {}", order.order_uid, e),
        }
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }

    log::info!("Producer finished: {} orders to {} on {}", orders.len(), topic, brokers);
    Ok(())
}

#[cfg(test)]
mod tests {
    use order_ingest::domain::validation::validate_order;

    use super::*;

    #[test]
    fn fabricated_orders_pass_validation() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let order = fake_order(&mut rng);
            assert_eq!(validate_order(&order), Ok(()), "{order:?}");
        }
    }
}
