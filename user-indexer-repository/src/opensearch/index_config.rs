//! OpenSearch index settings and mappings for the users index.

use serde_json::{json, Value};

/// The default name of the users index.
pub const DEFAULT_INDEX_NAME: &str = "users";

/// Get the index settings and mappings for the users index.
///
/// The configuration includes:
/// - **Keyword fields**: identifiers and exact-match attributes (`pnum`, `email`, `zip`, `gender`)
/// - **Text fields with a raw keyword**: names and address fields for full-text and exact lookups
/// - **Date field**: `dob`, absent for users with an unknown date of birth
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
pub fn get_index_settings() -> Value {
    let text_with_raw = json!({
        "type": "text",
        "fields": {
            "raw": {
                "type": "keyword"
            }
        }
    });

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "pnum": {
                    "type": "long"
                },
                "nickname": text_with_raw,
                "email": {
                    "type": "keyword"
                },
                "first_name": text_with_raw,
                "last_name": text_with_raw,
                "street": {
                    "type": "text"
                },
                "city": text_with_raw,
                "zip": {
                    "type": "keyword"
                },
                "state": text_with_raw,
                "country": text_with_raw,
                "gender": {
                    "type": "keyword"
                },
                "dob": {
                    "type": "date",
                    "format": "yyyy-MM-dd"
                }
            }
        }
    })
}
