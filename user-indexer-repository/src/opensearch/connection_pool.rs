//! Connection pool spreading requests over every configured OpenSearch node.

use opensearch::http::transport::{Connection, ConnectionPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

use crate::errors::SearchIndexError;

/// Round-robin pool over a fixed list of nodes.
///
/// Clones share the cursor, so the transport and any copy of it keep rotating together.
#[derive(Debug, Clone)]
pub struct RoundRobinConnectionPool {
    connections: Arc<Vec<Connection>>,
    cursor: Arc<AtomicUsize>,
}

impl RoundRobinConnectionPool {
    /// Create a pool over `nodes`.
    ///
    /// # Returns
    ///
    /// * `Ok(RoundRobinConnectionPool)` - A pool holding one connection per node
    /// * `Err(SearchIndexError)` - If `nodes` is empty
    pub fn new(nodes: Vec<Url>) -> Result<Self, SearchIndexError> {
        if nodes.is_empty() {
            return Err(SearchIndexError::validation(
                "At least one OpenSearch URL is required",
            ));
        }

        Ok(Self {
            connections: Arc::new(nodes.into_iter().map(Connection::new).collect()),
            cursor: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Number of nodes in the pool.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl ConnectionPool for RoundRobinConnectionPool {
    fn next(&self) -> Connection {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        self.connections[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(raw: &[&str]) -> Vec<Url> {
        raw.iter().map(|u| Url::parse(u).unwrap()).collect()
    }

    #[test]
    fn test_rejects_empty_node_list() {
        assert!(matches!(
            RoundRobinConnectionPool::new(vec![]),
            Err(SearchIndexError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rotates_over_every_node() {
        let pool =
            RoundRobinConnectionPool::new(urls(&["http://node-a:9200", "http://node-b:9200"]))
                .unwrap();
        assert_eq!(pool.len(), 2);

        let picked: Vec<String> = (0..4).map(|_| format!("{:?}", pool.next())).collect();

        assert!(picked[0].contains("node-a"));
        assert!(picked[1].contains("node-b"));
        assert!(picked[2].contains("node-a"));
        assert!(picked[3].contains("node-b"));
    }

    #[test]
    fn test_clones_share_the_cursor() {
        let pool =
            RoundRobinConnectionPool::new(urls(&["http://node-a:9200", "http://node-b:9200"]))
                .unwrap();
        let copy = pool.clone();

        assert!(format!("{:?}", pool.next()).contains("node-a"));
        assert!(format!("{:?}", copy.next()).contains("node-b"));
    }
}
