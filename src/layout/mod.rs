//! Dashboard grid layout engine
//!
//! The dashboard arranges widgets into four percentage-sized columns, each
//! holding up to two widget slots. This module owns that model: loading and
//! repairing persisted layouts, toggling column/widget visibility, moving
//! widgets between slots, and redistributing column widths so the enabled
//! columns always sum to exactly 100%.
//!
//! All operations are synchronous pure transformations: given a valid
//! [`Layout`], no operation can produce an invalid one. Malformed persisted
//! data is repaired once, up front, by [`Layout::normalize`].

mod model;
mod ops;
mod widths;

pub use model::{Column, Layout, COLUMN_COUNT, MIN_ENABLED_WIDTH, SLOTS_PER_COLUMN, WIDTH_STEP};
pub use ops::{perform_drop, toggle_column_enabled, toggle_widget_hidden};
pub use widths::{on_slider_input, redistribute_widths};
