use gridboard_core::{WidgetKey, WidgetWidth, WidthMap, GRID_COLUMNS, MAX_WIDGETS_PER_ROW};

// ──────────────────────────────────────────────
// Row: derived run of widgets
// ──────────────────────────────────────────────

/// A run of consecutive widgets whose widths fit into one row.
/// `start` and `end` are inclusive indices into the full widget order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub widgets: Vec<WidgetKey>,
    pub start: usize,
    pub end: usize,
    pub total_width: u8,
}

impl Row {
    fn starting_with(key: &WidgetKey, index: usize, width: u8) -> Self {
        Self {
            widgets: vec![key.clone()],
            start: index,
            end: index,
            total_width: width,
        }
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.widgets.iter().any(|k| k == key)
    }

    /// Whether the flat index `index` falls inside this row.
    pub fn spans(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// No further widget can join this row.
    pub fn is_full(&self) -> bool {
        self.widgets.len() >= MAX_WIDGETS_PER_ROW
    }
}

// ──────────────────────────────────────────────
// Row packer
// ──────────────────────────────────────────────

/// Greedy left-to-right packing: a row closes as soon as the next widget
/// would push its total past 12 columns. Widgets are never split.
pub fn calculate_widget_rows(widgets: &[WidgetKey], widths: &WidthMap) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut current: Option<Row> = None;

    for (index, key) in widgets.iter().enumerate() {
        let width = widths.get(key).columns();
        let fits = current
            .as_ref()
            .is_some_and(|row| row.total_width + width <= GRID_COLUMNS);

        if fits {
            if let Some(row) = current.as_mut() {
                row.widgets.push(key.clone());
                row.end = index;
                row.total_width += width;
            }
        } else {
            rows.extend(current.take());
            current = Some(Row::starting_with(key, index, width));
        }
    }

    rows.extend(current);
    rows
}

// ──────────────────────────────────────────────
// Row optimizer
// ──────────────────────────────────────────────

/// Canonical widths for a row, by member count:
/// - 1 widget fills the row
/// - 3 widgets split it 4/4/4
/// - 2 widgets keep their widths if they already sum to 12, otherwise 6/6
///
/// Rows of any other size are returned unchanged and left for the packer to reflow.
pub fn calculate_optimal_layout_for_row(row_widgets: &[WidgetKey], current: &WidthMap) -> WidthMap {
    let mut widths = current.clone();

    match row_widgets {
        [only] => widths.set(only.clone(), WidgetWidth::Full),
        [a, b] => {
            let sum = current.get(a).columns() + current.get(b).columns();
            if sum != GRID_COLUMNS {
                widths.set(a.clone(), WidgetWidth::Half);
                widths.set(b.clone(), WidgetWidth::Half);
            }
        }
        [_, _, _] => {
            for key in row_widgets {
                widths.set(key.clone(), WidgetWidth::Third);
            }
        }
        _ => {}
    }

    widths
}
