//! Layout and column data model with normalization
//!
//! Persisted layouts can be malformed or written by older versions, so the
//! model is loaded through [`Layout::normalize`], which repairs any input into
//! a layout satisfying the invariants:
//!
//! - exactly [`COLUMN_COUNT`] columns
//! - enabled column widths sum to exactly 100
//! - every width is a non-negative multiple of [`WIDTH_STEP`]
//! - an enabled column's width is never below [`MIN_ENABLED_WIDTH`]
//! - a disabled column's width is 0
//! - each widget id appears in at most one slot

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::widths::{floor_to_step, round_to_step, settle_widths};

/// Number of columns in the grid; the layout always has exactly this many
pub const COLUMN_COUNT: usize = 4;
/// Widget slots per column
pub const SLOTS_PER_COLUMN: usize = 2;
/// Granularity of column widths, in percent
pub const WIDTH_STEP: u32 = 5;
/// Minimum width of an enabled column, in percent
pub const MIN_ENABLED_WIDTH: u32 = 15;
/// Current layout schema version
pub const LAYOUT_VERSION: u32 = 1;

/// One grid column holding up to two widget slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Stable column identifier
    pub id: String,
    /// Whether the column occupies space in the grid
    pub enabled: bool,
    /// Width in percent; multiple of [`WIDTH_STEP`], 0 when disabled
    pub width: u32,
    /// Widget slots, positional; `None` is an empty slot
    pub slots: [Option<String>; SLOTS_PER_COLUMN],
    /// Width remembered when the column was disabled, for re-enabling
    pub previous_width: Option<u32>,
}

impl Column {
    /// Returns true if the column has at least one occupied slot and every
    /// occupied slot's widget is hidden per the given map
    pub fn all_widgets_hidden(&self, hidden: &BTreeMap<String, bool>) -> bool {
        let mut occupied = 0;
        for slot in self.slots.iter().flatten() {
            occupied += 1;
            if !hidden.get(slot).copied().unwrap_or(false) {
                return false;
            }
        }
        occupied > 0
    }
}

/// The persisted arrangement of widgets into four percentage-sized columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Schema version of the persisted form
    pub version: u32,
    /// Ordered columns; always exactly [`COLUMN_COUNT`] of them
    pub columns: Vec<Column>,
    /// Widget visibility; absent means visible
    pub hidden_widgets: BTreeMap<String, bool>,
}

/// Permissive mirror of [`Layout`] used to read possibly-corrupt persisted
/// data; every field is optional and legacy camelCase names are accepted.
#[derive(Debug, Deserialize)]
struct RawLayout {
    #[serde(default)]
    columns: Option<Vec<RawColumn>>,
    #[serde(default, alias = "hiddenWidgets")]
    hidden_widgets: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default, alias = "slots")]
    widgets: Option<Vec<Option<String>>>,
    #[serde(default, alias = "previousWidth")]
    previous_width: Option<u32>,
}

impl Layout {
    /// The documented default layout used on first run and whenever a
    /// persisted layout is beyond repair
    pub fn default_layout() -> Self {
        let widths = [25, 20, 30, 25];
        let slots: [[Option<&str>; SLOTS_PER_COLUMN]; COLUMN_COUNT] = [
            [Some("buses"), Some("trash")],
            [Some("weather"), Some("energy")],
            [Some("events"), Some("news")],
            [Some("police"), None],
        ];
        let columns = widths
            .iter()
            .zip(slots.iter())
            .enumerate()
            .map(|(i, (&width, slot_row))| Column {
                id: format!("col-{}", i + 1),
                enabled: true,
                width,
                slots: [
                    slot_row[0].map(str::to_string),
                    slot_row[1].map(str::to_string),
                ],
                previous_width: None,
            })
            .collect();

        Self {
            version: LAYOUT_VERSION,
            columns,
            hidden_widgets: BTreeMap::new(),
        }
    }

    /// Repairs a possibly malformed or legacy persisted layout
    ///
    /// Repair policy:
    /// - unparseable input or a wrong column count discards the input entirely
    ///   and substitutes [`Layout::default_layout`]
    /// - widths are rounded to the step; disabled columns are forced to 0
    /// - duplicate widget ids are dropped, first occurrence wins
    /// - if enabled widths total 0, the width is split equally with the
    ///   minimum-width floor, topping off any shortfall one step at a time
    ///   round-robin
    /// - otherwise widths are rescaled proportionally to sum to 100, with the
    ///   rounding remainder assigned to the last enabled column
    ///
    /// Normalization is idempotent: a valid layout passes through unchanged.
    pub fn normalize(raw: serde_json::Value) -> Self {
        let parsed: RawLayout = match serde_json::from_value(raw) {
            Ok(parsed) => parsed,
            Err(_) => return Self::default_layout(),
        };
        let raw_columns = match parsed.columns {
            Some(cols) if cols.len() == COLUMN_COUNT => cols,
            _ => return Self::default_layout(),
        };

        let mut seen_widgets: HashSet<String> = HashSet::new();
        let mut columns: Vec<Column> = Vec::with_capacity(COLUMN_COUNT);
        for (i, raw_col) in raw_columns.into_iter().enumerate() {
            let enabled = raw_col.enabled.unwrap_or(true);
            let stored = round_to_step(raw_col.width.unwrap_or(0).min(100));
            let width = if enabled { stored } else { 0 };
            let previous_width = raw_col
                .previous_width
                .map(|w| round_to_step(w.min(100)))
                .or((!enabled && stored > 0).then_some(stored));

            let mut slots: [Option<String>; SLOTS_PER_COLUMN] = [None, None];
            if let Some(widgets) = raw_col.widgets {
                for (slot, widget) in widgets.into_iter().take(SLOTS_PER_COLUMN).enumerate() {
                    if let Some(id) = widget {
                        if seen_widgets.insert(id.clone()) {
                            slots[slot] = Some(id);
                        }
                    }
                }
            }

            columns.push(Column {
                id: raw_col.id.unwrap_or_else(|| format!("col-{}", i + 1)),
                enabled,
                width,
                slots,
                previous_width,
            });
        }

        rebalance_from_stored(&mut columns);

        let hidden_widgets = parsed
            .hidden_widgets
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, hidden)| *hidden)
            .collect();

        Self {
            version: LAYOUT_VERSION,
            columns,
            hidden_widgets,
        }
    }

    /// Checks every layout invariant; used by tests and debug assertions
    pub fn is_valid(&self) -> bool {
        if self.columns.len() != COLUMN_COUNT {
            return false;
        }
        let mut seen = HashSet::new();
        let mut enabled_total = 0;
        let mut any_enabled = false;
        for column in &self.columns {
            if column.width % WIDTH_STEP != 0 || column.width > 100 {
                return false;
            }
            if column.enabled {
                any_enabled = true;
                enabled_total += column.width;
                if column.width < MIN_ENABLED_WIDTH {
                    return false;
                }
            } else if column.width != 0 {
                return false;
            }
            for slot in column.slots.iter().flatten() {
                if !seen.insert(slot.as_str()) {
                    return false;
                }
            }
        }
        !any_enabled || enabled_total == 100
    }

    /// Returns the index of the column holding the given widget, if any
    pub fn column_of(&self, widget_id: &str) -> Option<usize> {
        self.columns.iter().position(|column| {
            column
                .slots
                .iter()
                .flatten()
                .any(|slot| slot == widget_id)
        })
    }

    /// Returns true if the widget is currently marked hidden
    pub fn is_widget_hidden(&self, widget_id: &str) -> bool {
        self.hidden_widgets
            .get(widget_id)
            .copied()
            .unwrap_or(false)
    }
}

/// Brings stored enabled widths to a valid sum-100 configuration
fn rebalance_from_stored(columns: &mut [Column]) {
    let enabled: Vec<usize> = (0..columns.len()).filter(|&i| columns[i].enabled).collect();
    if enabled.is_empty() {
        return;
    }

    let total: u32 = enabled.iter().map(|&i| columns[i].width).sum();
    if total == 0 {
        // Equal split with floor, then top off one step at a time round-robin
        let share = floor_to_step(100 / enabled.len() as u32).max(MIN_ENABLED_WIDTH);
        for &i in &enabled {
            columns[i].width = share;
        }
        let mut sum: u32 = share * enabled.len() as u32;
        let mut cursor = 0;
        while sum < 100 {
            columns[enabled[cursor % enabled.len()]].width += WIDTH_STEP;
            sum += WIDTH_STEP;
            cursor += 1;
        }
    } else if total != 100 {
        // Proportional rescale; the rounding remainder lands on the last
        // enabled column so repeated loads don't drift
        let mut assigned = 0;
        for &i in &enabled[..enabled.len() - 1] {
            let scaled = round_to_step(columns[i].width * 100 / total);
            columns[i].width = scaled;
            assigned += scaled;
        }
        let last = *enabled.last().unwrap_or(&0);
        columns[last].width = 100u32.saturating_sub(assigned);
    }

    settle_widths(columns);
}
