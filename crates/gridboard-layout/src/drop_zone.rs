// Drop-zone geometry: turns rows plus measured widget rectangles into the
// insertion targets shown while a widget is being dragged.
//
// Vertical zones sit in the gaps inside a row (before, between, after its
// widgets). Horizontal zones sit between rows and insert the widget as a new
// full-width row. All rects are relative to the grid container.

use gridboard_core::{DragState, DropZone, DropZoneKind, GeometrySource, Rect};

use crate::rows::Row;

/// Width of a vertical (within-row) zone.
pub const VERTICAL_ZONE_WIDTH: f32 = 20.0;

/// Height of a horizontal (between-row) zone.
pub const HORIZONTAL_ZONE_HEIGHT: f32 = 20.0;

/// Measured geometry of one row, in container space.
struct MeasuredRow<'a> {
    row: &'a Row,
    bounds: Rect,
    members: Vec<Rect>,
}

/// Compute every drop zone for the current rows.
///
/// Returns an empty list when the container or any widget has not been
/// measured yet; the next recomputation picks the layout up once it renders.
pub fn calculate_drop_zones(
    rows: &[Row],
    total_widgets: usize,
    drag: &DragState,
    geometry: &dyn GeometrySource,
) -> Vec<DropZone> {
    let Some(container) = geometry.container_rect() else {
        log::debug!("drop zones: container not measured yet");
        return Vec::new();
    };
    let Some(measured) = measure_rows(rows, &container, geometry) else {
        return Vec::new();
    };

    let dragged_index = drag
        .dragged()
        .and_then(|key| rows.iter().flat_map(|r| r.widgets.iter()).position(|k| k == key));
    let origin_row = dragged_index.and_then(|i| rows.iter().position(|r| r.spans(i)));

    let mut zones = Vec::new();
    let multi_row = measured.len() > 1;

    if multi_row {
        let first = &measured[0];
        zones.push(horizontal_zone(
            first.row.start,
            Some(0),
            first.bounds.y - HORIZONTAL_ZONE_HEIGHT / 2.0,
            &container,
            drag,
            dragged_index,
            origin_row.map(|o| &measured[o]),
        ));
    }

    for (row_index, current) in measured.iter().enumerate() {
        let from_this_row = origin_row == Some(row_index);
        let from_another_row = drag.is_dragging() && !from_this_row;
        let accepts = from_this_row || (from_another_row && !current.row.is_full());

        if drag.is_dragging() && accepts {
            vertical_zones(current, row_index, &container, dragged_index, from_this_row, &mut zones);
        }

        if !multi_row {
            continue;
        }

        let zone = match measured.get(row_index + 1) {
            Some(next) => horizontal_zone(
                next.row.start,
                Some(row_index + 1),
                (current.bounds.bottom() + next.bounds.y) / 2.0 - HORIZONTAL_ZONE_HEIGHT / 2.0,
                &container,
                drag,
                dragged_index,
                origin_row.map(|o| &measured[o]),
            ),
            None => horizontal_zone(
                total_widgets,
                Some(row_index + 1),
                current.bounds.bottom(),
                &container,
                drag,
                dragged_index,
                origin_row.map(|o| &measured[o]),
            ),
        };
        zones.push(zone);
    }

    zones
}

fn measure_rows<'a>(
    rows: &'a [Row],
    container: &Rect,
    geometry: &dyn GeometrySource,
) -> Option<Vec<MeasuredRow<'a>>> {
    let mut measured = Vec::with_capacity(rows.len());
    for row in rows {
        let mut members = Vec::with_capacity(row.len());
        for key in &row.widgets {
            let Some(rect) = geometry.widget_rect(key) else {
                log::debug!("drop zones: widget {key} not measured yet");
                return None;
            };
            members.push(rect.relative_to(container));
        }
        let (first, rest) = members.split_first()?;
        let bounds = rest.iter().fold(*first, |acc, r| acc.union(r));
        measured.push(MeasuredRow { row, bounds, members });
    }
    Some(measured)
}

/// One zone per gap: before the first widget, between each pair, after the last.
fn vertical_zones(
    measured: &MeasuredRow<'_>,
    row_index: usize,
    container: &Rect,
    dragged_index: Option<usize>,
    from_this_row: bool,
    out: &mut Vec<DropZone>,
) {
    let members = &measured.members;
    let start = measured.row.start;

    for gap in 0..=members.len() {
        let center = match gap {
            0 => members[0].x,
            g if g == members.len() => members[g - 1].right(),
            g => (members[g - 1].right() + members[g].x) / 2.0,
        };
        let insert_index = start + gap;

        // Dropping a widget right next to where it already is changes nothing.
        let noop = from_this_row
            && dragged_index.is_some_and(|d| insert_index == d || insert_index == d + 1);

        out.push(DropZone {
            insert_index,
            rect: Rect::new(
                clamp_span(center - VERTICAL_ZONE_WIDTH / 2.0, VERTICAL_ZONE_WIDTH, container.width),
                measured.bounds.y,
                VERTICAL_ZONE_WIDTH,
                measured.bounds.height,
            ),
            kind: DropZoneKind::Vertical,
            visible: !noop,
            target_row: Some(row_index),
            horizontal_drop: false,
        });
    }
}

fn horizontal_zone(
    insert_index: usize,
    target_row: Option<usize>,
    top: f32,
    container: &Rect,
    drag: &DragState,
    dragged_index: Option<usize>,
    origin: Option<&MeasuredRow<'_>>,
) -> DropZone {
    // A widget alone in its row gains nothing from becoming a new row in place.
    let noop = match (origin, dragged_index) {
        (Some(origin), Some(d)) => origin.row.len() == 1 && (insert_index == d || insert_index == d + 1),
        _ => false,
    };

    DropZone {
        insert_index,
        rect: Rect::new(0.0, top.max(0.0), container.width, HORIZONTAL_ZONE_HEIGHT),
        kind: DropZoneKind::Horizontal,
        visible: drag.is_dragging() && !noop,
        target_row,
        horizontal_drop: true,
    }
}

/// Keep a span of `len` starting at `start` inside `[0, limit]`.
fn clamp_span(start: f32, len: f32, limit: f32) -> f32 {
    start.min(limit - len).max(0.0)
}
