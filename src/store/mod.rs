//! Persistent key-value store
//!
//! This module provides a thin JSON-file-backed key-value store used for user
//! preferences (theme, location, bus stop selection), the serialized dashboard
//! layout, and cached API responses. Values are serialized transparently with
//! serde; every key maps to one file in an XDG-style data directory.

mod kv;
mod prefs;

pub use kv::{KvStore, StoreError};
pub use prefs::{Location, Preferences, StopSelection, Theme};
