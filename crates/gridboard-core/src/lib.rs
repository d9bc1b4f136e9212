// Core types and collaborator traits shared by the gridboard crates.
// The layout engine, the resize controller and the dashboard all speak in
// these types; nothing here knows how widgets are rendered.

mod error;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use error::{StoreError, WidthError};

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Smallest rect covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Translate into the coordinate space whose origin is `origin`'s top-left corner.
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

/// The `uid` of a widget. The engine only ever moves and sizes these.
pub type WidgetKey = String;

// ──────────────────────────────────────────────
// Column widths
// ──────────────────────────────────────────────

/// Number of column units in a full row.
pub const GRID_COLUMNS: u8 = 12;

/// Narrowest width a widget may take.
pub const MIN_WIDGET_COLUMNS: u8 = 4;

/// With a minimum of 4 out of 12 columns, no row holds more than three widgets.
pub const MAX_WIDGETS_PER_ROW: usize = 3;

/// Width of a widget in twelfths of a row. Only these four sizes exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WidgetWidth {
    Third,
    #[default]
    Half,
    TwoThirds,
    Full,
}

impl WidgetWidth {
    /// All widths in ascending order. Snapping walks this list, so ties go to the narrower size.
    pub const ALL: [WidgetWidth; 4] = [
        WidgetWidth::Third,
        WidgetWidth::Half,
        WidgetWidth::TwoThirds,
        WidgetWidth::Full,
    ];

    pub const fn columns(self) -> u8 {
        match self {
            WidgetWidth::Third => 4,
            WidgetWidth::Half => 6,
            WidgetWidth::TwoThirds => 8,
            WidgetWidth::Full => 12,
        }
    }

    pub fn from_columns(columns: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.columns() == columns)
    }
}

impl TryFrom<u8> for WidgetWidth {
    type Error = WidthError;

    fn try_from(columns: u8) -> Result<Self, Self::Error> {
        Self::from_columns(columns).ok_or(WidthError::OutOfRange(columns))
    }
}

impl From<WidgetWidth> for u8 {
    fn from(width: WidgetWidth) -> u8 {
        width.columns()
    }
}

/// Widget key → width. Keys without an entry are treated as [`WidgetWidth::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidthMap {
    entries: HashMap<WidgetKey, WidgetWidth>,
}

impl WidthMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> WidgetWidth {
        self.entries.get(key).copied().unwrap_or_default()
    }

    /// The stored entry, without falling back to the default.
    pub fn entry(&self, key: &str) -> Option<WidgetWidth> {
        self.entries.get(key).copied()
    }

    pub fn set(&mut self, key: impl Into<WidgetKey>, width: WidgetWidth) {
        self.entries.insert(key.into(), width);
    }

    pub fn remove(&mut self, key: &str) -> Option<WidgetWidth> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WidgetKey, WidgetWidth)> {
        self.entries.iter().map(|(k, w)| (k, *w))
    }

    /// Entries sorted by key, for stable hashing and display.
    pub fn sorted(&self) -> Vec<(&WidgetKey, WidgetWidth)> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

impl<K: Into<WidgetKey>> FromIterator<(K, WidgetWidth)> for WidthMap {
    fn from_iter<I: IntoIterator<Item = (K, WidgetWidth)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, w)| (k.into(), w)).collect(),
        }
    }
}

// ──────────────────────────────────────────────
// Drag & drop types
// ──────────────────────────────────────────────

/// Whether a widget is currently being dragged for reordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { widget: WidgetKey },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn dragged(&self) -> Option<&str> {
        match self {
            DragState::Dragging { widget } => Some(widget),
            DragState::Idle => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZoneKind {
    /// Insert within a row, between two widgets or at a row edge.
    Vertical,
    /// Insert as a new row between two rows.
    Horizontal,
}

/// A positioned insertion target shown while dragging.
/// `rect` is in the coordinate space of the grid container.
#[derive(Debug, Clone, PartialEq)]
pub struct DropZone {
    pub insert_index: usize,
    pub rect: Rect,
    pub kind: DropZoneKind,
    pub visible: bool,
    pub target_row: Option<usize>,
    pub horizontal_drop: bool,
}

impl DropZone {
    /// The insertion payload handed to a move when the widget is released here.
    pub fn target(&self) -> DropTarget {
        DropTarget {
            insert_index: self.insert_index,
            horizontal_drop: self.horizontal_drop,
            target_row: self.target_row,
        }
    }
}

/// Where a dragged widget should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub insert_index: usize,
    /// Place the widget full-width in a new row of its own.
    pub horizontal_drop: bool,
    pub target_row: Option<usize>,
}

impl DropTarget {
    pub fn within_row(insert_index: usize, target_row: usize) -> Self {
        Self {
            insert_index,
            horizontal_drop: false,
            target_row: Some(target_row),
        }
    }

    pub fn new_row(insert_index: usize) -> Self {
        Self {
            insert_index,
            horizontal_drop: true,
            target_row: None,
        }
    }
}

// ──────────────────────────────────────────────
// Persisted layout
// ──────────────────────────────────────────────

/// One widget in the persisted layout. `width` is stored raw and snapped on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub uid: WidgetKey,
    pub width: u8,
}

/// The only durable artifact: widgets in display order with their widths.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedLayout {
    pub widgets: Vec<LayoutEntry>,
}

/// Display metadata for a widget. Opaque to the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetMeta {
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

// ──────────────────────────────────────────────
// Trait: GeometrySource
// ──────────────────────────────────────────────

/// Synchronous access to rendered rectangles.
/// Returns `None` for anything that has not been laid out yet.
pub trait GeometrySource {
    fn widget_rect(&self, key: &str) -> Option<Rect>;
    fn container_rect(&self) -> Option<Rect>;
}

/// A geometry source backed by a fixed set of measurements.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    pub container: Option<Rect>,
    pub widgets: HashMap<WidgetKey, Rect>,
}

impl StaticGeometry {
    pub fn new(container: Rect) -> Self {
        Self {
            container: Some(container),
            widgets: HashMap::new(),
        }
    }

    pub fn with_widgets<I, K>(container: Rect, widgets: I) -> Self
    where
        I: IntoIterator<Item = (K, Rect)>,
        K: Into<WidgetKey>,
    {
        Self {
            container: Some(container),
            widgets: widgets.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<WidgetKey>, rect: Rect) {
        self.widgets.insert(key.into(), rect);
    }
}

impl GeometrySource for StaticGeometry {
    fn widget_rect(&self, key: &str) -> Option<Rect> {
        self.widgets.get(key).copied()
    }

    fn container_rect(&self) -> Option<Rect> {
        self.container
    }
}

// ──────────────────────────────────────────────
// Trait: LayoutStore
// ──────────────────────────────────────────────

/// Remote or local persistence for the layout. Saves run off the interaction thread.
pub trait LayoutStore: Send {
    fn save(&mut self, layout: &PersistedLayout) -> Result<(), StoreError>;
    fn load(&mut self) -> Result<Option<PersistedLayout>, StoreError>;
}

// ──────────────────────────────────────────────
// Trait: WidgetRegistry
// ──────────────────────────────────────────────

/// Resolves a widget key to its display metadata.
pub trait WidgetRegistry {
    fn lookup(&self, key: &str) -> Option<WidgetMeta>;

    fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}
