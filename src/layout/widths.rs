//! Column width redistribution
//!
//! Widths move in integer steps of 5 percent with a 15 percent floor for
//! enabled columns, so proportional adjustment cannot land on an exact total
//! of 100 in one pass. Every public operation here therefore runs a bounded
//! correction loop after the proportional pass; the invariant on exit is that
//! enabled widths sum to exactly 100, each at least the floor and a multiple
//! of the step.

use super::model::{Column, MIN_ENABLED_WIDTH, WIDTH_STEP};

/// Upper bound on correction passes in [`settle_widths`]
const MAX_SETTLE_PASSES: usize = 3;

/// Rounds to the nearest width step
pub(crate) fn round_to_step(width: u32) -> u32 {
    let rem = width % WIDTH_STEP;
    if rem * 2 >= WIDTH_STEP {
        width + (WIDTH_STEP - rem)
    } else {
        width - rem
    }
}

/// Rounds down to the width step
pub(crate) fn floor_to_step(width: u32) -> u32 {
    width - width % WIDTH_STEP
}

/// Clamps a requested width to the step grid, floor, and 100 ceiling
fn clamp_requested(width: u32) -> u32 {
    round_to_step(width.min(100)).max(MIN_ENABLED_WIDTH)
}

fn enabled_indices(columns: &[Column], exclude: usize) -> Vec<usize> {
    (0..columns.len())
        .filter(|&i| i != exclude && columns[i].enabled)
        .collect()
}

/// Takes up to `amount` width from the given columns, proportionally to their
/// current widths and processing larger columns first so rounding does not
/// drive small columns into the floor early. Returns the amount collected.
fn collect_from(columns: &mut [Column], amount: u32, donors: &[usize]) -> u32 {
    let slack: u32 = donors
        .iter()
        .map(|&i| columns[i].width.saturating_sub(MIN_ENABLED_WIDTH))
        .sum();
    let take_total = amount.min(slack);
    if take_total == 0 {
        return 0;
    }

    let donor_sum: u32 = donors.iter().map(|&i| columns[i].width).sum();
    let mut order: Vec<usize> = donors.to_vec();
    order.sort_by_key(|&i| std::cmp::Reverse(columns[i].width));

    let mut remaining = take_total;
    for &i in &order {
        let ideal = take_total * columns[i].width / donor_sum;
        let reduction = floor_to_step(ideal)
            .min(columns[i].width.saturating_sub(MIN_ENABLED_WIDTH))
            .min(remaining);
        columns[i].width -= reduction;
        remaining -= reduction;
    }

    // Greedy second pass for the rounding remainder, one step at a time from
    // whichever donor currently sits furthest above the floor
    while remaining > 0 {
        let next = donors
            .iter()
            .copied()
            .filter(|&i| columns[i].width > MIN_ENABLED_WIDTH)
            .max_by_key(|&i| columns[i].width);
        match next {
            Some(i) => {
                let step = WIDTH_STEP
                    .min(remaining)
                    .min(columns[i].width - MIN_ENABLED_WIDTH);
                columns[i].width -= step;
                remaining -= step;
            }
            None => break,
        }
    }

    take_total - remaining
}

/// Distributes `amount` width onto the given columns proportionally to their
/// current widths, capping each at 100. Returns any amount that could not be
/// placed (only possible when every recipient is already at 100).
pub(crate) fn distribute_to(columns: &mut [Column], amount: u32, recipients: &[usize]) -> u32 {
    if recipients.is_empty() || amount == 0 {
        return amount;
    }

    let recipient_sum: u32 = recipients.iter().map(|&i| columns[i].width).sum();
    let mut order: Vec<usize> = recipients.to_vec();
    order.sort_by_key(|&i| std::cmp::Reverse(columns[i].width));

    let mut remaining = amount;
    for &i in &order {
        let ideal = if recipient_sum == 0 {
            amount / recipients.len() as u32
        } else {
            amount * columns[i].width / recipient_sum
        };
        let addition = floor_to_step(ideal)
            .min(100u32.saturating_sub(columns[i].width))
            .min(remaining);
        columns[i].width += addition;
        remaining -= addition;
    }

    // Greedy second pass to columns with remaining headroom
    while remaining > 0 {
        let next = recipients
            .iter()
            .copied()
            .filter(|&i| columns[i].width < 100)
            .max_by_key(|&i| columns[i].width);
        match next {
            Some(i) => {
                let step = WIDTH_STEP.min(remaining).min(100 - columns[i].width);
                columns[i].width += step;
                remaining -= step;
            }
            None => break,
        }
    }

    remaining
}

/// Bounded correction loop pinning the enabled total at exactly 100
///
/// Re-enforces the step grid and the enabled floor, then absorbs any residual
/// in the single largest enabled column, retrying up to [`MAX_SETTLE_PASSES`]
/// times when the floor enforcement perturbs the total again.
pub(crate) fn settle_widths(columns: &mut [Column]) {
    for column in columns.iter_mut() {
        if !column.enabled {
            column.width = 0;
        }
    }

    let enabled: Vec<usize> = (0..columns.len()).filter(|&i| columns[i].enabled).collect();
    if enabled.is_empty() {
        return;
    }

    for _ in 0..MAX_SETTLE_PASSES {
        for &i in &enabled {
            columns[i].width = round_to_step(columns[i].width.min(100)).max(MIN_ENABLED_WIDTH);
        }

        let total: u32 = enabled.iter().map(|&i| columns[i].width).sum();
        if total == 100 {
            return;
        }

        if total < 100 {
            if let Some(&largest) = enabled.iter().max_by_key(|&&i| columns[i].width) {
                columns[largest].width = (columns[largest].width + (100 - total)).min(100);
            }
        } else {
            let excess = total - 100;
            if let Some(&largest) = enabled.iter().max_by_key(|&&i| columns[i].width) {
                let reducible = columns[largest].width.saturating_sub(MIN_ENABLED_WIDTH);
                columns[largest].width -= excess.min(reducible);
            }
        }
    }
}

/// Changes one column's width, proportionally adjusting its enabled siblings
/// so the enabled total stays at exactly 100
///
/// Growing the target takes width from the other enabled columns, larger
/// columns first, never below the floor; the target may end up short of
/// `desired` when the siblings have no more slack to give. Shrinking the
/// target hands the freed width to the siblings, capped at 100 each.
/// Out-of-range or disabled targets are no-ops.
pub fn redistribute_widths(columns: &mut [Column], target: usize, desired: u32) {
    if target >= columns.len() || !columns[target].enabled {
        return;
    }

    let desired = clamp_requested(desired);
    let current = columns[target].width;
    let others = enabled_indices(columns, target);
    if others.is_empty() {
        columns[target].width = 100;
        return;
    }
    if desired == current {
        return;
    }

    if desired > current {
        let collected = collect_from(columns, desired - current, &others);
        columns[target].width = current + collected;
    } else {
        columns[target].width = desired;
        let leftover = distribute_to(columns, current - desired, &others);
        // Nowhere to put the remainder; keep it on the target
        columns[target].width += leftover;
    }

    settle_widths(columns);
}

/// Slider handler: clamps the requested width and redistributes the
/// difference across the sibling columns
pub fn on_slider_input(columns: &mut [Column], target: usize, requested: u32) {
    redistribute_widths(columns, target, requested);
}
