//! Fetch error taxonomy
//!
//! Transport and protocol failures are normalized into a small set of kinds
//! so widgets can map them to user-visible messages without inspecting the
//! underlying HTTP machinery. The client never retries; callers re-invoke if
//! they want another attempt.

use thiserror::Error;

/// Errors produced by the fetch client
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response arrived within the request timeout
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS, TLS, refused, reset)
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered HTTP 404
    #[error("resource not found (HTTP 404)")]
    NotFound,

    /// The endpoint answered with a 5xx status
    #[error("server error (HTTP {0})")]
    Server(u16),

    /// Any other non-2xx status
    #[error("unexpected HTTP status {0}")]
    Http(u16),

    /// HTTP succeeded but the GraphQL body carried an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQL(String),

    /// The response body was not valid JSON
    #[error("invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Anything that does not fit the categories above
    #[error("request failed: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Short advisory message suitable for direct display in a widget
    ///
    /// These are never fatal to the hosting application; timeouts and network
    /// failures all resolve to the same "check your connection" class.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Timeout | FetchError::Network(_) => {
                "Could not reach the service. Check your internet connection."
            }
            FetchError::NotFound => "The requested data was not found.",
            FetchError::Server(_) => "The service is temporarily unavailable. Try again later.",
            FetchError::Http(_) | FetchError::Unknown(_) => {
                "Something went wrong while loading data."
            }
            FetchError::GraphQL(_) | FetchError::InvalidBody(_) => {
                "The service returned an unexpected response."
            }
        }
    }

    /// Normalizes an HTTP status into the matching error kind
    ///
    /// Returns `None` for 2xx statuses.
    pub(crate) fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            404 => Some(FetchError::NotFound),
            500..=599 => Some(FetchError::Server(status)),
            other => Some(FetchError::Http(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_success_range() {
        assert!(FetchError::from_status(200).is_none());
        assert!(FetchError::from_status(204).is_none());
        assert!(FetchError::from_status(299).is_none());
    }

    #[test]
    fn test_from_status_not_found() {
        assert!(matches!(
            FetchError::from_status(404),
            Some(FetchError::NotFound)
        ));
    }

    #[test]
    fn test_from_status_server_errors() {
        assert!(matches!(
            FetchError::from_status(500),
            Some(FetchError::Server(500))
        ));
        assert!(matches!(
            FetchError::from_status(503),
            Some(FetchError::Server(503))
        ));
    }

    #[test]
    fn test_from_status_other_statuses() {
        assert!(matches!(
            FetchError::from_status(401),
            Some(FetchError::Http(401))
        ));
        assert!(matches!(
            FetchError::from_status(302),
            Some(FetchError::Http(302))
        ));
    }

    #[test]
    fn test_user_messages_are_advisory() {
        let errors = [
            FetchError::Timeout,
            FetchError::Network("reset".to_string()),
            FetchError::NotFound,
            FetchError::Server(502),
            FetchError::Http(418),
            FetchError::GraphQL("bad field".to_string()),
            FetchError::Unknown("?".to_string()),
        ];
        for error in errors {
            assert!(!error.user_message().is_empty());
        }
    }

    #[test]
    fn test_timeout_and_network_share_connection_message() {
        assert_eq!(
            FetchError::Timeout.user_message(),
            FetchError::Network("down".to_string()).user_message()
        );
    }
}
