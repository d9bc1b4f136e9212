// Inter-widget resize controller.
// Tracks a pointer drag on the handle between two neighbouring widgets,
// converts horizontal movement into column deltas, and emits a commit each
// time the snapped widths change.

mod schedule;

use std::time::{Duration, Instant};

use gridboard_core::{GeometrySource, Rect, WidgetKey, WidgetWidth, GRID_COLUMNS};
use gridboard_layout::{calculate_target_widths, validate_resize, GridLayout};

pub use schedule::{Debounce, Throttle};

// ──────────────────────────────────────────────
// Configuration
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeConfig {
    /// Minimum time between processed pointer moves.
    pub throttle: Duration,
    /// Movements smaller than this many columns are ignored.
    pub dead_zone: f32,
    /// Two widgets whose tops differ by more than this are on different rows.
    pub row_tolerance: f32,
    /// Width of the drag handle drawn between the widgets.
    pub handle_width: f32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(16),
            dead_zone: 0.25,
            row_tolerance: 10.0,
            handle_width: 8.0,
        }
    }
}

// ──────────────────────────────────────────────
// State machine
// ──────────────────────────────────────────────

/// Snapshot taken when the pointer goes down, plus what has been shown and
/// committed since.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub left: WidgetKey,
    pub right: WidgetKey,
    pub start_x: f32,
    pub start_widths: (WidgetWidth, WidgetWidth),
    /// Pixels per column unit, measured from the container at gesture start.
    pub column_px: f32,
    pub last_committed: (WidgetWidth, WidgetWidth),
    /// Widths shown by the live indicator.
    pub preview: (WidgetWidth, WidgetWidth),
    /// Latest pointer position that arrived while throttled.
    pending_x: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(ResizeSession),
}

/// Emitted when a gesture settles on new widths for the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeCommit {
    pub left: WidgetKey,
    pub right: WidgetKey,
    pub left_width: WidgetWidth,
    pub right_width: WidgetWidth,
}

/// Where the candidate snap positions of a pair are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RowIndicator {
    /// The pair's combined rectangle, relative to the container.
    pub rect: Rect,
    /// x offsets (container space) the shared border can snap to.
    pub snap_positions: Vec<f32>,
}

pub struct ResizeController {
    state: ResizeState,
    throttle: Throttle,
    config: ResizeConfig,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::with_config(ResizeConfig::default())
    }

    pub fn with_config(config: ResizeConfig) -> Self {
        Self {
            state: ResizeState::Idle,
            throttle: Throttle::new(config.throttle),
            config,
        }
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging(_))
    }

    /// Pointer down on the handle between `left` and `right`.
    /// Refuses to start unless the pair can be resized and both widgets and
    /// the container are measured on the same row.
    pub fn begin(
        &mut self,
        left: &str,
        right: &str,
        pointer_x: f32,
        layout: &GridLayout,
        geometry: &dyn GeometrySource,
    ) -> bool {
        if !self.pair_is_resizable(left, right, layout, geometry) {
            log::debug!("resize: {left}/{right} not resizable");
            return false;
        }
        let Some(container) = geometry.container_rect() else {
            return false;
        };
        let column_px = container.width / f32::from(GRID_COLUMNS);
        if column_px <= 0.0 {
            return false;
        }

        let start_widths = (layout.width_of(left), layout.width_of(right));
        self.state = ResizeState::Dragging(ResizeSession {
            left: left.to_string(),
            right: right.to_string(),
            start_x: pointer_x,
            start_widths,
            column_px,
            last_committed: start_widths,
            preview: start_widths,
            pending_x: None,
        });
        self.throttle.reset();
        log::debug!("resize: begin {left}/{right} at x={pointer_x}");
        true
    }

    /// Pointer move. Throttled: a move arriving too soon is held and replayed by [`tick`](Self::tick).
    pub fn update(
        &mut self,
        pointer_x: f32,
        now: Instant,
        layout: &GridLayout,
        geometry: &dyn GeometrySource,
    ) -> Option<ResizeCommit> {
        let ResizeState::Dragging(session) = &mut self.state else {
            return None;
        };
        if !self.throttle.try_fire(now) {
            session.pending_x = Some(pointer_x);
            return None;
        }
        session.pending_x = None;
        self.process(pointer_x, layout, geometry)
    }

    /// Replay a move held back by the throttle once its interval has passed.
    pub fn tick(&mut self, now: Instant, layout: &GridLayout, geometry: &dyn GeometrySource) -> Option<ResizeCommit> {
        let ResizeState::Dragging(session) = &mut self.state else {
            return None;
        };
        let pending = session.pending_x?;
        if !self.throttle.try_fire(now) {
            return None;
        }
        session.pending_x = None;
        self.process(pending, layout, geometry)
    }

    /// Pointer up. Always returns to idle; returns whether a gesture was active.
    pub fn end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if let ResizeState::Dragging(session) = &self.state {
            log::debug!("resize: end {}/{}", session.left, session.right);
        }
        self.state = ResizeState::Idle;
        self.throttle.reset();
        was_dragging
    }

    /// Widths to show for a pair: the live preview while that pair is being
    /// dragged, otherwise the committed widths from the layout.
    pub fn current_resize_values(&self, left: &str, right: &str, layout: &GridLayout) -> (WidgetWidth, WidgetWidth) {
        match &self.state {
            ResizeState::Dragging(session) if session.left == left && session.right == right => session.preview,
            _ => (layout.width_of(left), layout.width_of(right)),
        }
    }

    /// Rectangle of the drag handle between the pair, in container space.
    /// `None` if either side is unmeasured or the two sit on different rows.
    pub fn handle_rect(&self, left: &str, right: &str, geometry: &dyn GeometrySource) -> Option<Rect> {
        let (container, l, r) = self.measure_pair(left, right, geometry)?;
        let l = l.relative_to(&container);
        let r = r.relative_to(&container);
        let center = (l.right() + r.x) / 2.0;
        let top = l.y.min(r.y);
        let bottom = l.bottom().max(r.bottom());
        Some(Rect::new(
            center - self.config.handle_width / 2.0,
            top,
            self.config.handle_width,
            bottom - top,
        ))
    }

    /// The pair's full extent plus the x offsets its border can snap to.
    pub fn row_indicator(&self, left: &str, right: &str, geometry: &dyn GeometrySource) -> Option<RowIndicator> {
        let (container, l, r) = self.measure_pair(left, right, geometry)?;
        let rect = l.union(&r).relative_to(&container);
        let column_px = container.width / f32::from(GRID_COLUMNS);

        let snap_positions = WidgetWidth::ALL
            .into_iter()
            .filter(|w| validate_resize(i32::from(w.columns()), i32::from(GRID_COLUMNS - w.columns())).is_some())
            .map(|w| rect.x + f32::from(w.columns()) * column_px)
            .collect();

        Some(RowIndicator { rect, snap_positions })
    }

    // ── Internals ───────────────────────────────

    fn process(&mut self, pointer_x: f32, layout: &GridLayout, geometry: &dyn GeometrySource) -> Option<ResizeCommit> {
        let (left, right) = match &self.state {
            ResizeState::Dragging(session) => (session.left.clone(), session.right.clone()),
            ResizeState::Idle => return None,
        };
        let resizable = self.pair_is_resizable(&left, &right, layout, geometry);

        let ResizeState::Dragging(session) = &mut self.state else {
            return None;
        };

        let columns = (pointer_x - session.start_x) / session.column_px;
        // Dead zone applies to the raw delta; anything under half a column
        // that passes it rounds back to the start widths.
        if columns.abs() < self.config.dead_zone {
            return None;
        }
        let delta = columns.round() as i32;
        let (l, r) = calculate_target_widths(session.start_widths.0, session.start_widths.1, delta);

        let Some(candidate) = validate_resize(l, r).filter(|_| resizable) else {
            log::trace!("resize: rejected candidate {l}/{r}");
            return None;
        };

        if candidate != session.preview {
            session.preview = candidate;
        }
        if candidate == session.last_committed {
            return None;
        }
        session.last_committed = candidate;

        log::debug!("resize: commit {left}={:?} {right}={:?}", candidate.0, candidate.1);
        Some(ResizeCommit {
            left,
            right,
            left_width: candidate.0,
            right_width: candidate.1,
        })
    }

    fn pair_is_resizable(&self, left: &str, right: &str, layout: &GridLayout, geometry: &dyn GeometrySource) -> bool {
        layout.can_resize(left, right) && self.measure_pair(left, right, geometry).is_some()
    }

    /// Container, left and right rects, if all are measured and the pair shares a row.
    fn measure_pair(&self, left: &str, right: &str, geometry: &dyn GeometrySource) -> Option<(Rect, Rect, Rect)> {
        let container = geometry.container_rect()?;
        let l = geometry.widget_rect(left)?;
        let r = geometry.widget_rect(right)?;
        if (l.y - r.y).abs() > self.config.row_tolerance {
            return None;
        }
        Some((container, l, r))
    }
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new()
    }
}
