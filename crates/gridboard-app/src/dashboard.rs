// Layout orchestrator: owns the widget order, width map and drag state for
// the lifetime of a dashboard. Every mutation commits locally first and then
// queues a save; a failed save only produces a notification.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use gridboard_core::{
    DragState, DropTarget, DropZone, GeometrySource, LayoutStore, Rect, StoreError, WidgetKey, WidgetRegistry,
    WidgetWidth,
};
use gridboard_input::{Debounce, ResizeController, RowIndicator};
use gridboard_layout::{GridLayout, Row};

use crate::notification::Notification;
use crate::persist::PersistWorker;
use crate::registry::retain_known;
use crate::settings::GridboardSettings;

/// Drop zones from the last computation and the state they were derived from.
struct ZoneCache {
    key: u64,
    zones: Vec<DropZone>,
}

pub struct Dashboard {
    layout: GridLayout,
    drag: DragState,
    resize: ResizeController,
    persist_debounce: Debounce,
    geometry_settle: Debounce,
    /// Bumped whenever the rendering surface has settled after a resize.
    geometry_epoch: u64,
    zone_cache: Option<ZoneCache>,
    worker: PersistWorker,
    notifications: Vec<Notification>,
}

impl Dashboard {
    pub fn new(
        layout: GridLayout,
        store: Box<dyn LayoutStore>,
        settings: &GridboardSettings,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            layout,
            drag: DragState::Idle,
            resize: ResizeController::with_config(settings.resize_config()),
            persist_debounce: Debounce::new(settings.persist_debounce()),
            geometry_settle: Debounce::new(settings.geometry_settle()),
            geometry_epoch: 0,
            zone_cache: None,
            worker: PersistWorker::spawn(store)?,
            notifications: Vec::new(),
        })
    }

    /// Restore the saved layout from `store`, keeping only widgets the
    /// registry still knows. A load failure starts from an empty grid.
    pub fn load(
        mut store: Box<dyn LayoutStore>,
        registry: &dyn WidgetRegistry,
        settings: &GridboardSettings,
    ) -> Result<Self, StoreError> {
        let mut notifications = Vec::new();
        let layout = match store.load() {
            Ok(Some(stored)) => {
                let known = retain_known(&stored, registry);
                let dropped = stored.widgets.len() - known.widgets.len();
                if dropped > 0 {
                    notifications.push(Notification::info(format!(
                        "{dropped} widget(s) are no longer available and were removed from the dashboard"
                    )));
                }
                GridLayout::apply_homepage_layout(&known)
            }
            Ok(None) => GridLayout::new(),
            Err(e) => {
                log::error!("Failed to load layout: {}", e);
                notifications.push(Notification::warning(format!("Could not load the saved layout: {e}")));
                GridLayout::new()
            }
        };

        let mut dashboard = Self::new(layout, store, settings)?;
        dashboard.notifications = notifications;
        Ok(dashboard)
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn rows(&self) -> Vec<Row> {
        self.layout.rows()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn find_widget(&self, key: &str) -> Option<(usize, &WidgetKey)> {
        self.layout.find_widget(key)
    }

    // ── Mutations ───────────────────────────────

    pub fn move_widget(&mut self, key: &str, target: DropTarget) -> bool {
        let changed = self.layout.move_widget(key, target);
        if changed {
            self.commit("move");
        }
        changed
    }

    pub fn delete_widget(&mut self, key: &str) -> bool {
        let changed = self.layout.delete_widget(key);
        if changed {
            self.commit("delete");
        }
        changed
    }

    pub fn add_widget(&mut self, key: &str) -> bool {
        let changed = self.layout.add_widget(key);
        if changed {
            self.commit("add");
        }
        changed
    }

    pub fn handle_widget_resize(
        &mut self,
        left: &str,
        right: &str,
        left_width: WidgetWidth,
        right_width: WidgetWidth,
    ) -> bool {
        let changed = self.layout.resize_pair(left, right, left_width, right_width);
        if changed {
            self.commit("resize");
        }
        changed
    }

    fn commit(&mut self, what: &str) {
        log::info!("layout {what}: {} widgets in {} rows", self.layout.len(), self.layout.rows().len());
        if self.persist_debounce.window().is_zero() {
            self.submit_save();
        } else {
            self.persist_debounce.schedule(Instant::now());
        }
    }

    // ── Drag state ──────────────────────────────

    pub fn handle_drag_start(&mut self, key: &str) {
        log::debug!("drag start: {key}");
        self.drag = DragState::Dragging { widget: key.to_string() };
    }

    pub fn handle_drag_end(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Drop zones for the current state, recomputed only when the order,
    /// widths, drag state or settled geometry changed since the last call.
    pub fn drop_zones(&mut self, geometry: &dyn GeometrySource) -> &[DropZone] {
        let key = self.zone_cache_key();
        let fresh = self.zone_cache.as_ref().is_some_and(|cache| cache.key == key);

        if !fresh {
            let zones = self.layout.drop_zones(&self.drag, geometry);
            // Nothing measured yet: do not remember the empty answer.
            self.zone_cache = if zones.is_empty() {
                None
            } else {
                Some(ZoneCache { key, zones })
            };
        }

        self.zone_cache
            .as_ref()
            .map(|cache| cache.zones.as_slice())
            .unwrap_or_default()
    }

    fn zone_cache_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.layout.widgets().hash(&mut hasher);
        for (key, width) in self.layout.widths().sorted() {
            key.hash(&mut hasher);
            width.hash(&mut hasher);
        }
        self.drag.hash(&mut hasher);
        self.geometry_epoch.hash(&mut hasher);
        hasher.finish()
    }

    /// The rendering surface changed size; geometry is re-measured once it settles.
    pub fn notify_surface_resized(&mut self, now: Instant) {
        self.geometry_settle.schedule(now);
    }

    /// A tracked widget element changed size.
    pub fn notify_element_resized(&mut self, key: &str, now: Instant) {
        if self.layout.find_widget(key).is_some() {
            self.geometry_settle.schedule(now);
        }
    }

    // ── Resize gesture ──────────────────────────

    pub fn begin_resize(&mut self, left: &str, right: &str, pointer_x: f32, geometry: &dyn GeometrySource) -> bool {
        self.resize.begin(left, right, pointer_x, &self.layout, geometry)
    }

    /// Returns true when the move committed new widths.
    pub fn resize_pointer_move(&mut self, pointer_x: f32, now: Instant, geometry: &dyn GeometrySource) -> bool {
        match self.resize.update(pointer_x, now, &self.layout, geometry) {
            Some(c) => self.handle_widget_resize(&c.left, &c.right, c.left_width, c.right_width),
            None => false,
        }
    }

    pub fn end_resize(&mut self) {
        self.resize.end();
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_dragging()
    }

    pub fn resize_preview(&self, left: &str, right: &str) -> (WidgetWidth, WidgetWidth) {
        self.resize.current_resize_values(left, right, &self.layout)
    }

    pub fn resize_handle(&self, left: &str, right: &str, geometry: &dyn GeometrySource) -> Option<Rect> {
        self.resize.handle_rect(left, right, geometry)
    }

    pub fn resize_row_indicator(&self, left: &str, right: &str, geometry: &dyn GeometrySource) -> Option<RowIndicator> {
        self.resize.row_indicator(left, right, geometry)
    }

    // ── Timers & persistence ────────────────────

    /// Drive timers: replay a throttled resize move, settle geometry, flush a
    /// debounced save, and collect finished saves.
    pub fn tick(&mut self, now: Instant, geometry: &dyn GeometrySource) {
        if let Some(c) = self.resize.tick(now, &self.layout, geometry) {
            self.handle_widget_resize(&c.left, &c.right, c.left_width, c.right_width);
        }
        if self.geometry_settle.poll(now) {
            self.geometry_epoch += 1;
            log::debug!("geometry settled (epoch {})", self.geometry_epoch);
        }
        if self.persist_debounce.poll(now) {
            self.submit_save();
        }
        self.poll();
    }

    /// Save now if a debounced save is waiting.
    pub fn flush(&mut self) {
        if self.persist_debounce.is_pending() {
            self.persist_debounce.cancel();
            self.submit_save();
        }
    }

    pub fn has_pending_save(&self) -> bool {
        self.persist_debounce.is_pending() || self.worker.in_flight() > 0
    }

    fn submit_save(&mut self) {
        if !self.worker.submit(self.layout.to_persisted()) {
            self.notifications
                .push(Notification::warning("Layout changes could not be queued for saving"));
        }
    }

    /// Collect finished saves without blocking.
    pub fn poll(&mut self) {
        let results = self.worker.poll();
        self.record(results);
    }

    /// Block until all queued saves finish or `timeout` passes. Returns true if none are left.
    pub fn wait_for_persistence(&mut self, timeout: Duration) -> bool {
        let results = self.worker.wait(timeout);
        self.record(results);
        self.worker.in_flight() == 0
    }

    fn record(&mut self, results: Vec<Result<(), StoreError>>) {
        for result in results {
            match result {
                Ok(()) => log::debug!("layout saved"),
                Err(e) => {
                    log::error!("Failed to save layout: {}", e);
                    self.notifications
                        .push(Notification::warning(format!("Layout changes may not have been saved: {e}")));
                }
            }
        }
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        // Hand a waiting save to the worker; the worker's own drop joins it.
        self.flush();
    }
}
