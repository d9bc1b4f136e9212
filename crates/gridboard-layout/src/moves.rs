use gridboard_core::{WidgetKey, WidthMap, GRID_COLUMNS, MIN_WIDGET_COLUMNS};

use crate::rows::{calculate_optimal_layout_for_row, Row};

// ──────────────────────────────────────────────
// Reordering
// ──────────────────────────────────────────────

/// Remove `key` and re-insert it at `insert_index`. The index refers to the
/// order before removal, so it shifts down by one when the widget came from
/// an earlier position. Unknown keys leave the order unchanged.
pub fn move_widget_in_array(widgets: &[WidgetKey], key: &str, insert_index: usize) -> Vec<WidgetKey> {
    let mut out = widgets.to_vec();
    let Some(from) = out.iter().position(|k| k == key) else {
        return out;
    };

    let moved = out.remove(from);
    let target = if from < insert_index {
        insert_index - 1
    } else {
        insert_index
    };
    out.insert(target.min(out.len()), moved);
    out
}

// ──────────────────────────────────────────────
// Row lookup
// ──────────────────────────────────────────────

pub fn find_row_containing_widget<'a>(rows: &'a [Row], key: &str, widgets: &[WidgetKey]) -> Option<&'a Row> {
    let index = widgets.iter().position(|k| k == key)?;
    rows.iter().find(|row| row.spans(index))
}

/// Row index an insertion point belongs to when the caller did not name one:
/// the row spanning the index, or the last row when appending at the very end.
pub(crate) fn row_index_for_insert(rows: &[Row], insert_index: usize) -> Option<usize> {
    rows.iter()
        .position(|row| row.spans(insert_index))
        .or_else(|| rows.len().checked_sub(1).filter(|&last| rows[last].end + 1 == insert_index))
}

// ──────────────────────────────────────────────
// Row rebalancing
// ──────────────────────────────────────────────

/// Re-optimize the row a widget just left. Leaves widths alone if there is no
/// such row or nothing remains in it.
pub fn resize_row_after_removal(row: Option<&Row>, removed: &str, widths: &WidthMap) -> WidthMap {
    let Some(row) = row else {
        return widths.clone();
    };

    let remaining: Vec<WidgetKey> = row.widgets.iter().filter(|k| *k != removed).cloned().collect();
    if remaining.is_empty() {
        return widths.clone();
    }
    calculate_optimal_layout_for_row(&remaining, widths)
}

/// Re-optimize a row that `added` is joining at flat position `insert_index`.
/// Any earlier occurrence of `added` in the row is dropped first, which makes
/// this usable for reordering inside a row too.
pub fn resize_row_after_addition(
    row: Option<&Row>,
    added: &str,
    insert_index: usize,
    widths: &WidthMap,
) -> WidthMap {
    let Some(row) = row else {
        return widths.clone();
    };

    let mut members: Vec<WidgetKey> = row.widgets.iter().filter(|k| *k != added).cloned().collect();
    let offset = insert_index.saturating_sub(row.start).min(members.len());
    members.insert(offset, added.to_string());
    calculate_optimal_layout_for_row(&members, widths)
}

// ──────────────────────────────────────────────
// Resize preconditions
// ──────────────────────────────────────────────

/// Whether the widget at `index` closes its row. Row boundaries are re-derived
/// by walking widths from the start of the order.
pub fn is_last_widget_in_row(index: usize, widgets: &[WidgetKey], widths: &WidthMap) -> bool {
    if index + 1 >= widgets.len() {
        return true;
    }

    let mut row_total: u8 = 0;
    for key in &widgets[..=index] {
        let width = widths.get(key).columns();
        if row_total + width > GRID_COLUMNS {
            row_total = width;
        } else {
            row_total += width;
        }
    }

    let next = widths.get(&widgets[index + 1]).columns();
    row_total + next > GRID_COLUMNS
}

/// Two widgets can share a resize handle when they sit next to each other in
/// the same row and one of them has room to shrink while the other can grow.
pub fn can_resize_between_widgets(left: &str, right: &str, widths: &WidthMap, widgets: &[WidgetKey]) -> bool {
    let Some(left_index) = widgets.iter().position(|k| k == left) else {
        return false;
    };
    let Some(right_index) = widgets.iter().position(|k| k == right) else {
        return false;
    };

    if right_index != left_index + 1 {
        return false;
    }
    if is_last_widget_in_row(left_index, widgets, widths) {
        return false;
    }

    let left_width = widths.get(left).columns();
    let right_width = widths.get(right).columns();
    (left_width > MIN_WIDGET_COLUMNS && right_width < GRID_COLUMNS)
        || (right_width > MIN_WIDGET_COLUMNS && left_width < GRID_COLUMNS)
}
