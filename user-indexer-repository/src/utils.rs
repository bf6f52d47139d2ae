//! Utility functions for the user indexer repository.

use serde_json::Value;
use url::Url;

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationResult, BatchOperationSummary, IndexDocumentRequest};

/// Parse and validate a list of search node URLs.
///
/// # Arguments
///
/// * `urls` - Node URLs as strings, e.g. `["http://localhost:9200"]`
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - Parsed URLs, in the given order
/// * `Err(SearchIndexError)` - If the list is empty or any URL is invalid
///
/// # Example
///
/// ```
/// use user_indexer_repository::parse_node_urls;
///
/// let urls = parse_node_urls(&["http://localhost:9200".to_string()]).expect("valid URL");
/// assert_eq!(urls[0].port(), Some(9200));
/// ```
pub fn parse_node_urls(urls: &[String]) -> Result<Vec<Url>, SearchIndexError> {
    if urls.is_empty() {
        return Err(SearchIndexError::validation(
            "At least one search node URL must be provided",
        ));
    }

    urls.iter()
        .map(|raw| {
            Url::parse(raw.trim())
                .map_err(|e| SearchIndexError::validation(format!("Invalid URL '{}': {}", raw, e)))
        })
        .collect()
}

/// Build a `BatchOperationSummary` from a `_bulk` response body.
///
/// Each entry of `items` is matched with the request at the same position. An item counts
/// as failed when it carries an `error` object or a non-2xx `status`.
pub fn summarize_bulk_response(
    requests: &[IndexDocumentRequest],
    body: &Value,
) -> Result<BatchOperationSummary, SearchIndexError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response has no items array"))?;

    if items.len() != requests.len() {
        return Err(SearchIndexError::parse(format!(
            "Bulk response has {} items for {} requests",
            items.len(),
            requests.len()
        )));
    }

    let mut results = Vec::with_capacity(items.len());
    let mut succeeded = 0;
    let mut failed = 0;

    for (request, item) in requests.iter().zip(items) {
        // Each item is keyed by its action name, e.g. {"index": {...}}
        let outcome = item
            .as_object()
            .and_then(|action| action.values().next())
            .ok_or_else(|| SearchIndexError::parse("Malformed bulk response item"))?;

        let status = outcome.get("status").and_then(Value::as_u64).unwrap_or(0);
        let error = outcome.get("error").map(|e| match e.get("reason") {
            Some(Value::String(reason)) => reason.clone(),
            _ => e.to_string(),
        });
        let success = error.is_none() && (200..300).contains(&status);

        if success {
            succeeded += 1;
        } else {
            failed += 1;
        }

        results.push(BatchOperationResult {
            document_id: request.document_id.clone(),
            success,
            error: if success {
                None
            } else {
                Some(error.unwrap_or_else(|| format!("status {}", status)))
            },
        });
    }

    Ok(BatchOperationSummary {
        total: requests.len(),
        succeeded,
        failed,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn requests(ids: &[&str]) -> Vec<IndexDocumentRequest> {
        ids.iter()
            .map(|id| IndexDocumentRequest::new(*id, json!({ "pnum": id })))
            .collect()
    }

    #[test]
    fn test_parse_node_urls() {
        let urls = parse_node_urls(&[
            "http://localhost:9200".to_string(),
            " http://search-2:9200 ".to_string(),
        ])
        .unwrap();

        assert_eq!(urls.len(), 2);
        assert_eq!(urls[1].host_str(), Some("search-2"));
    }

    #[test]
    fn test_parse_node_urls_empty() {
        let result = parse_node_urls(&[]);
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::ValidationError(_)
        ));
    }

    #[test]
    fn test_parse_node_urls_invalid() {
        let result = parse_node_urls(&["not a url".to_string()]);
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::ValidationError(_)
        ));
    }

    #[test]
    fn test_summarize_all_succeeded() {
        let reqs = requests(&["1", "2"]);
        let body = json!({
            "took": 3,
            "errors": false,
            "items": [
                { "index": { "_index": "users", "_id": "1", "status": 201, "result": "created" } },
                { "index": { "_index": "users", "_id": "2", "status": 200, "result": "updated" } }
            ]
        });

        let summary = summarize_bulk_response(&reqs, &body).unwrap();

        assert_eq!(summary, BatchOperationSummary::all_succeeded(&reqs));
    }

    #[test]
    fn test_summarize_item_failure() {
        let reqs = requests(&["1", "2"]);
        let body = json!({
            "took": 3,
            "errors": true,
            "items": [
                { "index": { "_id": "1", "status": 201 } },
                { "index": {
                    "_id": "2",
                    "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [dob]" }
                } }
            ]
        });

        let summary = summarize_bulk_response(&reqs, &body).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        let failure = summary.failures().next().unwrap();
        assert_eq!(failure.document_id, "2");
        assert_eq!(failure.error.as_deref(), Some("failed to parse field [dob]"));
    }

    #[test]
    fn test_summarize_missing_items() {
        let reqs = requests(&["1"]);
        let result = summarize_bulk_response(&reqs, &json!({ "errors": false }));
        assert!(matches!(result.unwrap_err(), SearchIndexError::ParseError(_)));
    }

    #[test]
    fn test_summarize_item_count_mismatch() {
        let reqs = requests(&["1", "2"]);
        let body = json!({ "items": [ { "index": { "_id": "1", "status": 201 } } ] });
        let result = summarize_bulk_response(&reqs, &body);
        assert!(matches!(result.unwrap_err(), SearchIndexError::ParseError(_)));
    }
}
