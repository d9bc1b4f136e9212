// Grid layout engine for the dashboard.
// Packs an ordered widget list into rows of 12 columns, rebalances rows after
// moves/adds/deletes, and derives drop-zone geometry during a drag.

mod drop_zone;
mod moves;
mod resize;
mod rows;

use gridboard_core::{
    DragState, DropTarget, DropZone, GeometrySource, LayoutEntry, PersistedLayout, Rect, WidgetKey,
    WidgetWidth, WidthMap, GRID_COLUMNS,
};

pub use drop_zone::{calculate_drop_zones, HORIZONTAL_ZONE_HEIGHT, VERTICAL_ZONE_WIDTH};
pub use moves::{
    can_resize_between_widgets, find_row_containing_widget, is_last_widget_in_row, move_widget_in_array,
    resize_row_after_addition, resize_row_after_removal,
};
pub use resize::{
    adjust_to_total_columns, calculate_target_widths, is_valid_resize, snap_to_discrete_size, validate_resize,
};
pub use rows::{calculate_optimal_layout_for_row, calculate_widget_rows, Row};

// ──────────────────────────────────────────────
// GridMetrics
// ──────────────────────────────────────────────

/// Pixel sizes used when laying rows out into rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub row_height: f32,
    /// Space between neighbouring widgets and between rows.
    pub gutter: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            row_height: 240.0,
            gutter: 16.0,
        }
    }
}

// ──────────────────────────────────────────────
// GridLayout
// ──────────────────────────────────────────────

/// Widget order plus width map. Rows are never stored; they are re-derived
/// from these two on every query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLayout {
    widgets: Vec<WidgetKey>,
    widths: WidthMap,
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(widgets: Vec<WidgetKey>, widths: WidthMap) -> Self {
        Self { widgets, widths }
    }

    /// Rebuild a layout from its persisted form. Stored widths are snapped into
    /// the discrete set; a repeated uid keeps its first position.
    pub fn apply_homepage_layout(layout: &PersistedLayout) -> Self {
        let mut widgets: Vec<WidgetKey> = Vec::with_capacity(layout.widgets.len());
        let mut widths = WidthMap::new();
        for entry in &layout.widgets {
            if widths.contains(&entry.uid) {
                log::warn!("ignoring duplicate widget {} in stored layout", entry.uid);
                continue;
            }
            widths.set(entry.uid.clone(), snap_to_discrete_size(i32::from(entry.width)));
            widgets.push(entry.uid.clone());
        }
        Self { widgets, widths }
    }

    /// The `{ uid, width }` list in current order.
    pub fn to_persisted(&self) -> PersistedLayout {
        PersistedLayout {
            widgets: self
                .widgets
                .iter()
                .map(|key| LayoutEntry {
                    uid: key.clone(),
                    width: self.widths.get(key).columns(),
                })
                .collect(),
        }
    }

    pub fn widgets(&self) -> &[WidgetKey] {
        &self.widgets
    }

    pub fn widths(&self) -> &WidthMap {
        &self.widths
    }

    pub fn width_of(&self, key: &str) -> WidgetWidth {
        self.widths.get(key)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn rows(&self) -> Vec<Row> {
        calculate_widget_rows(&self.widgets, &self.widths)
    }

    /// Position and key of a widget, or `None` if it is not on the grid.
    pub fn find_widget(&self, key: &str) -> Option<(usize, &WidgetKey)> {
        self.widgets.iter().enumerate().find(|(_, k)| *k == key)
    }

    pub fn can_resize(&self, left: &str, right: &str) -> bool {
        can_resize_between_widgets(left, right, &self.widths, &self.widgets)
    }

    /// Move a widget to the insertion point described by `target`.
    ///
    /// A horizontal drop puts the widget full-width into a row of its own and
    /// only rebalances the row it left. A vertical drop inside the same row
    /// keeps all widths; a vertical drop into another row rebalances both rows.
    /// Returns false (and changes nothing) for an unknown key.
    pub fn move_widget(&mut self, key: &str, target: DropTarget) -> bool {
        if self.find_widget(key).is_none() {
            log::debug!("move_widget: unknown widget {key}");
            return false;
        }

        let rows = self.rows();
        let source_index = rows.iter().position(|row| row.contains(key));
        let source_row = source_index.map(|i| &rows[i]);
        let widgets = move_widget_in_array(&self.widgets, key, target.insert_index);

        let widths = if target.horizontal_drop {
            let mut widths = resize_row_after_removal(source_row, key, &self.widths);
            widths.set(key, WidgetWidth::Full);
            widths
        } else {
            let target_index = target
                .target_row
                .filter(|&i| i < rows.len())
                .or_else(|| moves::row_index_for_insert(&rows, target.insert_index));

            if target_index.is_some() && target_index == source_index {
                self.widths.clone()
            } else {
                let widths = resize_row_after_removal(source_row, key, &self.widths);
                resize_row_after_addition(target_index.map(|i| &rows[i]), key, target.insert_index, &widths)
            }
        };

        log::debug!(
            "move_widget: {key} -> {} ({})",
            target.insert_index,
            if target.horizontal_drop { "new row" } else { "within row" }
        );
        self.widgets = widgets;
        self.widths = widths;
        true
    }

    /// Remove a widget and its width entry, then rebalance the row it was in.
    pub fn delete_widget(&mut self, key: &str) -> bool {
        if self.find_widget(key).is_none() {
            return false;
        }

        let rows = self.rows();
        let row = find_row_containing_widget(&rows, key, &self.widgets);
        let mut widths = resize_row_after_removal(row, key, &self.widths);
        widths.remove(key);

        self.widgets.retain(|k| k != key);
        self.widths = widths;
        true
    }

    /// Append a widget as a new full-width row. Does nothing if it is already present.
    pub fn add_widget(&mut self, key: &str) -> bool {
        if self.find_widget(key).is_some() {
            return false;
        }
        self.widgets.push(key.to_string());
        self.widths.set(key, WidgetWidth::Full);
        true
    }

    /// Apply the widths of a two-widget resize. Rejected unless the pair is a
    /// valid resize (both at least the minimum, summing to a full row).
    pub fn resize_pair(&mut self, left: &str, right: &str, left_width: WidgetWidth, right_width: WidgetWidth) -> bool {
        if self.find_widget(left).is_none() || self.find_widget(right).is_none() {
            return false;
        }
        if !is_valid_resize(i32::from(left_width.columns()), i32::from(right_width.columns())) {
            log::debug!("resize_pair: rejected {left}={left_width:?} {right}={right_width:?}");
            return false;
        }
        self.widths.set(left, left_width);
        self.widths.set(right, right_width);
        true
    }

    /// Lay rows out inside `container`: every row is `row_height` tall, widgets
    /// get `columns / 12` of the width minus the gutter.
    pub fn compute_rects(&self, container: Rect, metrics: &GridMetrics) -> Vec<(WidgetKey, Rect)> {
        let column = container.width / f32::from(GRID_COLUMNS);
        let mut out = Vec::with_capacity(self.widgets.len());

        for (row_index, row) in self.rows().iter().enumerate() {
            let y = container.y + row_index as f32 * (metrics.row_height + metrics.gutter);
            let mut offset: u8 = 0;
            for key in &row.widgets {
                let columns = self.widths.get(key).columns();
                let x = container.x + f32::from(offset) * column + metrics.gutter / 2.0;
                let width = (f32::from(columns) * column - metrics.gutter).max(0.0);
                out.push((key.clone(), Rect::new(x, y, width, metrics.row_height)));
                offset += columns;
            }
        }
        out
    }

    pub fn drop_zones(&self, drag: &DragState, geometry: &dyn GeometrySource) -> Vec<DropZone> {
        calculate_drop_zones(&self.rows(), self.widgets.len(), drag, geometry)
    }
}
