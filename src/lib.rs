//! localboard core library
//!
//! The engine behind a personal local-information dashboard: a persistent
//! key-value store for settings and cached responses, a TTL response cache
//! with fail-open reads, a rate-limited fetch client for JSON and GraphQL
//! endpoints, and the column-grid layout engine the dashboard arranges its
//! widgets with. Widget rendering is the embedder's concern.

pub mod cache;
pub mod fetch;
pub mod layout;
pub mod sources;
pub mod store;
