//! Typed preference access over the key-value store
//!
//! The dashboard persists a handful of user settings under fixed, namespaced
//! keys. This module gives each of them a typed save/load pair so callers
//! never deal with raw keys or untyped JSON.

use serde::{Deserialize, Serialize};

use super::{KvStore, StoreError};
use crate::layout::Layout;

/// Store key for the selected color theme
const KEY_THEME: &str = "theme";
/// Store key for the last-known location
const KEY_LOCATION: &str = "location";
/// Store key for the selected bus stop
const KEY_BUS_STOP: &str = "bus_stop";
/// Store key for the serialized dashboard layout
const KEY_LAYOUT: &str = "layout";

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the host environment's preference
    Auto,
}

/// A geographic location the dashboard centers its widgets on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// Display name, e.g. a town or district
    pub name: String,
}

/// The bus stop the departures widget monitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopSelection {
    /// Provider-specific stop identifier
    pub stop_id: String,
    /// Display name of the stop
    pub name: String,
}

/// Typed facade over the store for dashboard settings
#[derive(Debug, Clone)]
pub struct Preferences {
    store: KvStore,
}

impl Preferences {
    /// Wraps the given store
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.store.save(KEY_THEME, &theme)
    }

    pub fn load_theme(&self) -> Result<Option<Theme>, StoreError> {
        self.store.load(KEY_THEME)
    }

    pub fn save_location(&self, location: &Location) -> Result<(), StoreError> {
        self.store.save(KEY_LOCATION, location)
    }

    pub fn load_location(&self) -> Result<Option<Location>, StoreError> {
        self.store.load(KEY_LOCATION)
    }

    pub fn save_bus_stop(&self, stop: &StopSelection) -> Result<(), StoreError> {
        self.store.save(KEY_BUS_STOP, stop)
    }

    pub fn load_bus_stop(&self) -> Result<Option<StopSelection>, StoreError> {
        self.store.load(KEY_BUS_STOP)
    }

    /// Persists the layout; called after every layout mutation
    pub fn save_layout(&self, layout: &Layout) -> Result<(), StoreError> {
        self.store.save(KEY_LAYOUT, layout)
    }

    /// Loads the raw persisted layout value, if any
    ///
    /// The result is intentionally untyped: callers are expected to pass it
    /// through [`Layout::normalize`], which repairs malformed or legacy data.
    pub fn load_layout_raw(&self) -> Result<Option<serde_json::Value>, StoreError> {
        self.store.load(KEY_LAYOUT)
    }
}
