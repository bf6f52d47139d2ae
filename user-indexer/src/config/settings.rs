//! Indexer settings read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use user_indexer_repository::opensearch::DEFAULT_INDEX_NAME;

use crate::IndexingError;

/// Default Kafka broker address.
const DEFAULT_KAFKA_BROKERS: &str = "localhost:9092";

/// Default Kafka consumer group ID.
const DEFAULT_KAFKA_GROUP_ID: &str = "indexer";

/// Default interval between the client's internal offset commits.
const DEFAULT_COMMIT_INTERVAL_MS: u64 = 100;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default number of users per bulk request.
const DEFAULT_BULK_SIZE: usize = 100;

/// Default capacity of the channel between intake and loader.
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Settings for one indexer process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    /// Comma-separated Kafka bootstrap servers.
    pub kafka_brokers: String,
    /// Topic carrying user records.
    pub kafka_topic: String,
    /// Consumer group the indexer joins.
    pub kafka_group_id: String,
    /// Interval of the Kafka client's background offset commits.
    pub commit_interval: Duration,
    /// OpenSearch node URLs.
    pub opensearch_urls: Vec<String>,
    /// Target index for user documents.
    pub index_name: String,
    /// Number of users per bulk request.
    pub bulk_size: usize,
    /// Capacity of the handoff channel between intake and loader.
    pub channel_capacity: usize,
}

impl IndexerConfig {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KAFKA_BROKERS`: Comma-separated broker list (default: localhost:9092)
    /// - `KAFKA_TOPIC`: Topic to consume (required)
    /// - `KAFKA_GROUP_ID`: Consumer group ID (default: indexer)
    /// - `KAFKA_COMMIT_INTERVAL_MS`: Offset commit interval in milliseconds (default: 100)
    /// - `OPENSEARCH_URLS`: Comma-separated OpenSearch URLs (default: http://localhost:9200)
    /// - `INDEX_NAME`: Target index (default: users)
    /// - `BULK_SIZE`: Users per bulk request (default: 100)
    /// - `CHANNEL_CAPACITY`: Handoff channel capacity (default: 1024)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kafka_brokers = split_list(
            &lookup("KAFKA_BROKERS").unwrap_or_else(|| DEFAULT_KAFKA_BROKERS.to_string()),
        );
        if kafka_brokers.is_empty() {
            return Err(IndexingError::config("KAFKA_BROKERS must not be empty"));
        }

        let kafka_topic = lookup("KAFKA_TOPIC")
            .map(|topic| topic.trim().to_string())
            .filter(|topic| !topic.is_empty())
            .ok_or_else(|| IndexingError::config("KAFKA_TOPIC must be set"))?;

        let kafka_group_id =
            lookup("KAFKA_GROUP_ID").unwrap_or_else(|| DEFAULT_KAFKA_GROUP_ID.to_string());

        let commit_interval_ms: u64 = parse_positive(
            &lookup,
            "KAFKA_COMMIT_INTERVAL_MS",
            DEFAULT_COMMIT_INTERVAL_MS,
        )?;

        let opensearch_urls = split_list(
            &lookup("OPENSEARCH_URLS").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
        );
        if opensearch_urls.is_empty() {
            return Err(IndexingError::config("OPENSEARCH_URLS must not be empty"));
        }

        let index_name = lookup("INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string());

        let bulk_size = parse_positive(&lookup, "BULK_SIZE", DEFAULT_BULK_SIZE)?;
        let channel_capacity = parse_positive(&lookup, "CHANNEL_CAPACITY", DEFAULT_CHANNEL_CAPACITY)?;

        Ok(Self {
            kafka_brokers: kafka_brokers.join(","),
            kafka_topic,
            kafka_group_id,
            commit_interval: Duration::from_millis(commit_interval_ms),
            opensearch_urls,
            index_name,
            bulk_size,
            channel_capacity,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a strictly positive number, falling back to `default` when the key is unset.
fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T, IndexingError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|_| IndexingError::config(format!("{} must be a number, got '{}'", key, raw)))?;

    if value <= T::default() {
        return Err(IndexingError::config(format!(
            "{} must be greater than zero",
            key
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = IndexerConfig::from_lookup(lookup_from(&[("KAFKA_TOPIC", "users")])).unwrap();

        assert_eq!(config.kafka_brokers, "localhost:9092");
        assert_eq!(config.kafka_topic, "users");
        assert_eq!(config.kafka_group_id, "indexer");
        assert_eq!(config.commit_interval, Duration::from_millis(100));
        assert_eq!(config.opensearch_urls, vec!["http://localhost:9200"]);
        assert_eq!(config.index_name, "users");
        assert_eq!(config.bulk_size, 100);
        assert_eq!(config.channel_capacity, 1024);
    }

    #[test]
    fn test_overrides() {
        let config = IndexerConfig::from_lookup(lookup_from(&[
            ("KAFKA_BROKERS", "kafka-1:9092, kafka-2:9092"),
            ("KAFKA_TOPIC", "people"),
            ("KAFKA_GROUP_ID", "people-indexer"),
            ("KAFKA_COMMIT_INTERVAL_MS", "250"),
            ("OPENSEARCH_URLS", "http://search-1:9200,http://search-2:9200"),
            ("INDEX_NAME", "people"),
            ("BULK_SIZE", "500"),
            ("CHANNEL_CAPACITY", "64"),
        ]))
        .unwrap();

        assert_eq!(config.kafka_brokers, "kafka-1:9092,kafka-2:9092");
        assert_eq!(config.kafka_group_id, "people-indexer");
        assert_eq!(config.commit_interval, Duration::from_millis(250));
        assert_eq!(config.opensearch_urls.len(), 2);
        assert_eq!(config.index_name, "people");
        assert_eq!(config.bulk_size, 500);
        assert_eq!(config.channel_capacity, 64);
    }

    #[test]
    fn test_missing_topic() {
        let result = IndexerConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result.unwrap_err(), IndexingError::ConfigError(_)));

        let result = IndexerConfig::from_lookup(lookup_from(&[("KAFKA_TOPIC", "  ")]));
        assert!(matches!(result.unwrap_err(), IndexingError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_numbers() {
        for (key, value) in [
            ("BULK_SIZE", "lots"),
            ("BULK_SIZE", "0"),
            ("CHANNEL_CAPACITY", "-1"),
            ("KAFKA_COMMIT_INTERVAL_MS", "0"),
        ] {
            let result =
                IndexerConfig::from_lookup(lookup_from(&[("KAFKA_TOPIC", "users"), (key, value)]));
            assert!(
                matches!(result, Err(IndexingError::ConfigError(_))),
                "Expected ConfigError for {}={}",
                key,
                value
            );
        }
    }

    #[test]
    fn test_empty_url_list() {
        let result = IndexerConfig::from_lookup(lookup_from(&[
            ("KAFKA_TOPIC", "users"),
            ("OPENSEARCH_URLS", " , "),
        ]));
        assert!(matches!(result.unwrap_err(), IndexingError::ConfigError(_)));
    }
}
