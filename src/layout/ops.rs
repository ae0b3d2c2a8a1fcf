//! Layout mutations: column toggling, widget visibility, drag-and-drop
//!
//! These are the operations a layout-owning container routes user interaction
//! through. Each one is a total function: given a valid layout it produces a
//! valid layout, feeding any width changes through the redistribution
//! machinery in [`super::widths`].

use super::model::{Column, Layout, SLOTS_PER_COLUMN};
use super::widths::{distribute_to, redistribute_widths, settle_widths};

/// Toggles whether a column occupies space in the grid
///
/// Disabling remembers the current width as `previous_width`, zeroes the
/// column, and hands its width to the remaining enabled columns. Enabling
/// restores `previous_width`, or an equal share of 100 over the now-enabled
/// columns (rounded down) when no width was remembered, taking that width
/// back from the siblings. Out-of-range indices are no-ops.
pub fn toggle_column_enabled(columns: &mut [Column], index: usize) {
    if index >= columns.len() {
        return;
    }

    if columns[index].enabled {
        let freed = columns[index].width;
        if freed > 0 {
            columns[index].previous_width = Some(freed);
        }
        columns[index].enabled = false;
        columns[index].width = 0;

        let recipients: Vec<usize> = (0..columns.len())
            .filter(|&i| i != index && columns[i].enabled)
            .collect();
        if !recipients.is_empty() {
            distribute_to(columns, freed, &recipients);
            settle_widths(columns);
        }
    } else {
        columns[index].enabled = true;
        columns[index].width = 0;
        let enabled_count = columns.iter().filter(|c| c.enabled).count() as u32;
        let restore = columns[index]
            .previous_width
            .unwrap_or(100 / enabled_count);
        redistribute_widths(columns, index, restore);
    }
}

/// Flips a widget's visibility, cascading into column enablement
///
/// Hiding the last visible widget of a column auto-disables that column so it
/// never occupies space with nothing visible in it; revealing a widget in a
/// column whose widgets were all hidden auto-re-enables it with the usual
/// width-restore rule.
pub fn toggle_widget_hidden(layout: &mut Layout, widget_id: &str) {
    let column_index = layout.column_of(widget_id);
    let was_all_hidden = column_index
        .map(|i| layout.columns[i].all_widgets_hidden(&layout.hidden_widgets));

    if layout.is_widget_hidden(widget_id) {
        layout.hidden_widgets.remove(widget_id);
    } else {
        layout.hidden_widgets.insert(widget_id.to_string(), true);
    }

    let Some(index) = column_index else { return };
    let now_all_hidden = layout.columns[index].all_widgets_hidden(&layout.hidden_widgets);

    if now_all_hidden && layout.columns[index].enabled {
        toggle_column_enabled(&mut layout.columns, index);
    } else if !now_all_hidden && was_all_hidden == Some(true) && !layout.columns[index].enabled {
        toggle_column_enabled(&mut layout.columns, index);
    }
}

/// Moves a widget from one slot to another
///
/// Swaps when the target slot is occupied; plain move (source slot vacated,
/// no sibling shift) when it is empty. Drops onto the same slot, onto a
/// disabled column, out of range, or from an empty source slot are rejected.
/// Returns whether the layout changed.
pub fn perform_drop(
    layout: &mut Layout,
    source: (usize, usize),
    target: (usize, usize),
) -> bool {
    let (source_col, source_slot) = source;
    let (target_col, target_slot) = target;

    if source == target
        || source_col >= layout.columns.len()
        || target_col >= layout.columns.len()
        || source_slot >= SLOTS_PER_COLUMN
        || target_slot >= SLOTS_PER_COLUMN
    {
        return false;
    }
    if !layout.columns[target_col].enabled {
        return false;
    }
    if layout.columns[source_col].slots[source_slot].is_none() {
        return false;
    }

    if source_col == target_col {
        layout.columns[source_col].slots.swap(source_slot, target_slot);
    } else {
        let (low, high) = (source_col.min(target_col), source_col.max(target_col));
        let (head, tail) = layout.columns.split_at_mut(high);
        let (first, second) = (&mut head[low], &mut tail[0]);
        if source_col < target_col {
            std::mem::swap(&mut first.slots[source_slot], &mut second.slots[target_slot]);
        } else {
            std::mem::swap(&mut second.slots[source_slot], &mut first.slots[target_slot]);
        }
    }
    true
}

impl Layout {
    /// Slider interaction entry point; see [`redistribute_widths`]
    pub fn set_column_width(&mut self, index: usize, requested: u32) {
        redistribute_widths(&mut self.columns, index, requested);
    }

    /// Eye-icon interaction entry point; see [`toggle_column_enabled`]
    pub fn toggle_column(&mut self, index: usize) {
        toggle_column_enabled(&mut self.columns, index);
    }

    /// Widget visibility entry point; see [`toggle_widget_hidden`]
    pub fn toggle_widget(&mut self, widget_id: &str) {
        toggle_widget_hidden(self, widget_id);
    }

    /// Drag-and-drop entry point; see [`perform_drop`]
    pub fn move_widget(&mut self, source: (usize, usize), target: (usize, usize)) -> bool {
        perform_drop(self, source, target)
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::{Layout, MIN_ENABLED_WIDTH, WIDTH_STEP};

    fn assert_valid(layout: &Layout) {
        assert!(layout.is_valid(), "layout should stay valid: {:?}", layout);
    }

    #[test]
    fn test_disable_remembers_width_and_rebalances() {
        let mut layout = Layout::default_layout();
        layout.toggle_column(2);

        assert!(!layout.columns[2].enabled);
        assert_eq!(layout.columns[2].width, 0);
        assert_eq!(layout.columns[2].previous_width, Some(30));
        assert_valid(&layout);
    }

    #[test]
    fn test_enable_restores_previous_width() {
        let mut layout = Layout::default_layout();
        layout.toggle_column(2);
        layout.toggle_column(2);

        assert!(layout.columns[2].enabled);
        assert_eq!(layout.columns[2].width, 30);
        assert_valid(&layout);
    }

    #[test]
    fn test_enable_without_memory_takes_equal_share() {
        let mut layout = Layout::default_layout();
        layout.toggle_column(3);
        layout.columns[3].previous_width = None;
        layout.toggle_column(3);

        // Equal share of 100 over 4 enabled columns
        assert_eq!(layout.columns[3].width, 25);
        assert_valid(&layout);
    }

    #[test]
    fn test_disable_all_then_reenable_one() {
        let mut layout = Layout::default_layout();
        for i in 0..layout.columns.len() {
            layout.toggle_column(i);
        }
        for column in &layout.columns {
            assert!(!column.enabled);
            assert_eq!(column.width, 0);
        }

        layout.toggle_column(1);
        assert!(layout.columns[1].enabled);
        assert_eq!(layout.columns[1].width, 100);
        assert_valid(&layout);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut layout = Layout::default_layout();
        let before = layout.clone();
        layout.toggle_column(42);
        assert_eq!(layout, before);
    }

    #[test]
    fn test_hiding_all_widgets_disables_column() {
        let mut layout = Layout::default_layout();
        // Column 3 holds only "police"
        layout.toggle_widget("police");

        assert!(layout.is_widget_hidden("police"));
        assert!(!layout.columns[3].enabled);
        assert_eq!(layout.columns[3].previous_width, Some(25));
        assert_valid(&layout);
    }

    #[test]
    fn test_revealing_widget_reenables_column() {
        let mut layout = Layout::default_layout();
        layout.toggle_widget("police");
        assert!(!layout.columns[3].enabled);

        layout.toggle_widget("police");
        assert!(!layout.is_widget_hidden("police"));
        assert!(layout.columns[3].enabled);
        assert_eq!(layout.columns[3].width, 25);
        assert_valid(&layout);
    }

    #[test]
    fn test_hiding_one_of_two_widgets_keeps_column_enabled() {
        let mut layout = Layout::default_layout();
        // Column 0 holds "buses" and "trash"
        layout.toggle_widget("buses");

        assert!(layout.is_widget_hidden("buses"));
        assert!(layout.columns[0].enabled);
        assert_valid(&layout);

        layout.toggle_widget("trash");
        assert!(!layout.columns[0].enabled);
        assert_valid(&layout);
    }

    #[test]
    fn test_toggle_unplaced_widget_only_flips_map() {
        let mut layout = Layout::default_layout();
        let columns_before = layout.columns.clone();

        layout.toggle_widget("not-on-the-board");
        assert!(layout.is_widget_hidden("not-on-the-board"));
        assert_eq!(layout.columns, columns_before);
    }

    #[test]
    fn test_drop_onto_occupied_slot_swaps() {
        let mut layout = Layout::default_layout();
        // buses at (0,0), weather at (1,0)
        assert!(layout.move_widget((0, 0), (1, 0)));

        assert_eq!(layout.columns[0].slots[0].as_deref(), Some("weather"));
        assert_eq!(layout.columns[1].slots[0].as_deref(), Some("buses"));
        // Other slots untouched
        assert_eq!(layout.columns[0].slots[1].as_deref(), Some("trash"));
        assert_eq!(layout.columns[1].slots[1].as_deref(), Some("energy"));
        assert_valid(&layout);
    }

    #[test]
    fn test_drop_onto_empty_slot_moves_and_vacates() {
        let mut layout = Layout::default_layout();
        // (3,1) is empty in the default layout
        assert!(layout.move_widget((0, 0), (3, 1)));

        assert_eq!(layout.columns[3].slots[1].as_deref(), Some("buses"));
        assert_eq!(layout.columns[0].slots[0], None);
        // The sibling slot does not shift
        assert_eq!(layout.columns[0].slots[1].as_deref(), Some("trash"));
        assert_valid(&layout);
    }

    #[test]
    fn test_drop_within_column_swaps_slots() {
        let mut layout = Layout::default_layout();
        assert!(layout.move_widget((0, 0), (0, 1)));

        assert_eq!(layout.columns[0].slots[0].as_deref(), Some("trash"));
        assert_eq!(layout.columns[0].slots[1].as_deref(), Some("buses"));
    }

    #[test]
    fn test_drop_rejections() {
        let mut layout = Layout::default_layout();
        let before = layout.clone();

        // Same slot
        assert!(!layout.move_widget((0, 0), (0, 0)));
        // Disabled target column
        layout.toggle_column(2);
        assert!(!layout.move_widget((0, 0), (2, 0)));
        // Empty source slot
        assert!(!layout.move_widget((3, 1), (0, 0)));
        // Out of range
        assert!(!layout.move_widget((9, 0), (0, 0)));
        assert!(!layout.move_widget((0, 3), (0, 0)));

        layout.toggle_column(2);
        assert_eq!(layout.columns[0].slots, before.columns[0].slots);
        assert_valid(&layout);
    }

    #[test]
    fn test_mixed_operation_sequence_keeps_invariants() {
        let mut layout = Layout::default_layout();
        layout.set_column_width(0, 40);
        layout.toggle_column(1);
        layout.toggle_widget("news");
        layout.move_widget((2, 0), (3, 1));
        layout.toggle_column(1);
        layout.set_column_width(3, 15);
        layout.toggle_widget("news");

        assert_valid(&layout);
        for column in &layout.columns {
            assert_eq!(column.width % WIDTH_STEP, 0);
            if column.enabled {
                assert!(column.width >= MIN_ENABLED_WIDTH);
            }
        }
    }
}
