// Column arithmetic for resizing two neighbouring widgets.
// Everything works on signed column counts so intermediate values may leave
// the discrete set; only validated results are turned back into widths.

use gridboard_core::{WidgetWidth, GRID_COLUMNS, MIN_WIDGET_COLUMNS};

/// Nearest allowed width. On an exact tie the narrower size wins.
pub fn snap_to_discrete_size(columns: i32) -> WidgetWidth {
    WidgetWidth::ALL
        .into_iter()
        .min_by_key(|w| (i32::from(w.columns()) - columns).abs())
        .unwrap_or_default()
}

/// Push any discrepancy from 12 onto the right widget; the left one is the anchor.
pub fn adjust_to_total_columns(left: i32, right: i32) -> (i32, i32) {
    let total = i32::from(GRID_COLUMNS);
    if left + right != total {
        (left, right + (total - (left + right)))
    } else {
        (left, right)
    }
}

/// Both sides at least the minimum width and together exactly one row.
pub fn is_valid_resize(left: i32, right: i32) -> bool {
    let min = i32::from(MIN_WIDGET_COLUMNS);
    left >= min && right >= min && left + right == i32::from(GRID_COLUMNS)
}

/// Candidate widths after moving the shared border by `delta_columns`.
/// The result always sums to 12 but may still fail [`is_valid_resize`].
pub fn calculate_target_widths(
    start_left: WidgetWidth,
    start_right: WidgetWidth,
    delta_columns: i32,
) -> (i32, i32) {
    let left = snap_to_discrete_size(i32::from(start_left.columns()) + delta_columns);
    let right = snap_to_discrete_size(i32::from(start_right.columns()) - delta_columns);
    adjust_to_total_columns(i32::from(left.columns()), i32::from(right.columns()))
}

/// Turn a candidate into widths, or `None` if it breaks the minimum or the row total.
pub fn validate_resize(left: i32, right: i32) -> Option<(WidgetWidth, WidgetWidth)> {
    if !is_valid_resize(left, right) {
        return None;
    }
    let left = WidgetWidth::from_columns(u8::try_from(left).ok()?)?;
    let right = WidgetWidth::from_columns(u8::try_from(right).ok()?)?;
    Some((left, right))
}
