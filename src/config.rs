use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub group_id: String,
    pub topic: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub kafka: KafkaConfig,
    pub cache_capacity: NonZeroUsize,
    pub cache_warm_limit: usize,
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cache_capacity: usize = parse(&lookup, "CACHE_CAPACITY", 100)?;
        let cache_capacity = NonZeroUsize::new(cache_capacity).ok_or(ConfigError::Invalid {
            key: "CACHE_CAPACITY",
            value: "0".to_string(),
        })?;

        Ok(Self {
            database_url,
            host: or("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT", 8080)?,
            kafka: KafkaConfig {
                brokers: or("KAFKA_BROKERS", "localhost:9092"),
                group_id: or("KAFKA_GROUP_ID", "order-ingest"),
                topic: or("KAFKA_TOPIC", "orders"),
            },
            cache_capacity,
            cache_warm_limit: parse(&lookup, "CACHE_WARM_LIMIT", cache_capacity.get())?,
            static_dir: PathBuf::from(or("STATIC_DIR", "./front")),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = config_from(&[("DATABASE_URL", "postgres://localhost/orders")])
            .expect("valid config");

        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.kafka.topic, "orders");
        assert_eq!(cfg.kafka.group_id, "order-ingest");
        assert_eq!(cfg.cache_capacity.get(), 100);
        assert_eq!(cfg.cache_warm_limit, 100);
        assert_eq!(cfg.static_dir, PathBuf::from("./front"));
    }

    #[test]
    fn warm_limit_follows_capacity_unless_set() {
        let cfg = config_from(&[("DATABASE_URL", "x"), ("CACHE_CAPACITY", "5")])
            .expect("valid config");
        assert_eq!(cfg.cache_warm_limit, 5);

        let cfg = config_from(&[
            ("DATABASE_URL", "x"),
            ("CACHE_CAPACITY", "5"),
            ("CACHE_WARM_LIMIT", "2"),
        ])
        .expect("valid config");
        assert_eq!(cfg.cache_warm_limit, 2);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(matches!(
            config_from(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            config_from(&[("DATABASE_URL", "x"), ("CACHE_CAPACITY", "0")]),
            Err(ConfigError::Invalid { key: "CACHE_CAPACITY", .. })
        ));
    }

    #[test]
    fn malformed_port_is_rejected() {
        let err = config_from(&[("DATABASE_URL", "x"), ("PORT", "eighty")])
            .expect_err("port must be numeric");
        assert_eq!(err.to_string(), "PORT has an invalid value \"eighty\"");
    }
}
