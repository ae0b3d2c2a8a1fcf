//! Cache key derivation
//!
//! Keys identify the logical resource being fetched and are independent of
//! transport-level rewriting: a proxied and a direct fetch of the same URL
//! share one cache entry. GraphQL keys additionally mix in the query text and
//! the variables so distinct queries against one endpoint never collide.

use sha2::{Digest, Sha256};

/// Deterministic cache key for a plain URL fetch
pub fn cache_key(url: &str) -> String {
    digest(url.as_bytes())
}

/// Deterministic cache key for a GraphQL request
///
/// Variables are encoded through `serde_json::Value`, whose object keys are
/// ordered, so the same variables always hash identically regardless of how
/// the caller constructed them.
pub fn graphql_cache_key(url: &str, query: &str, variables: &serde_json::Value) -> String {
    let variables_json = variables.to_string();
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    hasher.update(query.as_bytes());
    hasher.update(b"\n");
    hasher.update(variables_json.as_bytes());
    hex::encode(hasher.finalize())
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_key_is_stable() {
        assert_eq!(
            cache_key("https://example.com/api?q=1"),
            cache_key("https://example.com/api?q=1")
        );
    }

    #[test]
    fn test_cache_key_distinguishes_urls() {
        assert_ne!(
            cache_key("https://example.com/api?q=1"),
            cache_key("https://example.com/api?q=2")
        );
    }

    #[test]
    fn test_cache_key_is_filesystem_safe() {
        let key = cache_key("https://example.com/api?q=1&x=%20");
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_graphql_key_varies_with_query_and_variables() {
        let url = "https://api.example.com/graphql";
        let base = graphql_cache_key(url, "query A { a }", &json!({"id": 1}));

        assert_ne!(
            base,
            graphql_cache_key(url, "query B { b }", &json!({"id": 1}))
        );
        assert_ne!(
            base,
            graphql_cache_key(url, "query A { a }", &json!({"id": 2}))
        );
        assert_eq!(
            base,
            graphql_cache_key(url, "query A { a }", &json!({"id": 1}))
        );
    }

    #[test]
    fn test_graphql_key_variable_order_does_not_matter() {
        let url = "https://api.example.com/graphql";
        let query = "query Stop($id: String!, $n: Int!) { stop(id: $id) }";
        // serde_json::Value orders object keys, so these are the same value
        let a = json!({"id": "x", "n": 5});
        let b = json!({"n": 5, "id": "x"});
        assert_eq!(
            graphql_cache_key(url, query, &a),
            graphql_cache_key(url, query, &b)
        );
    }

    #[test]
    fn test_graphql_key_differs_from_plain_key() {
        let url = "https://api.example.com/graphql";
        assert_ne!(
            cache_key(url),
            graphql_cache_key(url, "query { x }", &json!({}))
        );
    }
}
