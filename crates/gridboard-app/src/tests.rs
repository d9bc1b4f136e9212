#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use crate::{CatalogRegistry, Dashboard, GridboardSettings, NotificationLevel};
    use gridboard_core::{
        DragState, DropTarget, LayoutEntry, LayoutStore, PersistedLayout, Rect, StaticGeometry, StoreError,
        WidgetWidth,
    };
    use gridboard_layout::{GridLayout, GridMetrics};

    use WidgetWidth::{Full, Half, Third, TwoThirds};

    const WAIT: Duration = Duration::from_secs(2);
    const CONTAINER: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 1200.0,
        height: 800.0,
    };

    /// Records every save; optionally starts with a stored layout.
    #[derive(Clone, Default)]
    struct MemoryStore {
        saved: Arc<Mutex<Vec<PersistedLayout>>>,
        stored: Option<PersistedLayout>,
    }

    impl LayoutStore for MemoryStore {
        fn save(&mut self, layout: &PersistedLayout) -> Result<(), StoreError> {
            self.saved.lock().unwrap().push(layout.clone());
            Ok(())
        }

        fn load(&mut self) -> Result<Option<PersistedLayout>, StoreError> {
            Ok(self.stored.clone())
        }
    }

    struct OfflineStore;

    impl LayoutStore for OfflineStore {
        fn save(&mut self, _: &PersistedLayout) -> Result<(), StoreError> {
            Err(StoreError::rejected("service unavailable"))
        }

        fn load(&mut self) -> Result<Option<PersistedLayout>, StoreError> {
            Err(std::io::Error::other("connection refused").into())
        }
    }

    fn entry(uid: &str, width: u8) -> LayoutEntry {
        LayoutEntry { uid: uid.into(), width }
    }

    /// "a" and "b" share the first row, "c" fills the second.
    fn sample_layout() -> GridLayout {
        GridLayout::from_parts(
            vec!["a".into(), "b".into(), "c".into()],
            [("a", Half), ("b", Half), ("c", Full)].into_iter().collect(),
        )
    }

    fn geometry_for(layout: &GridLayout) -> StaticGeometry {
        let metrics = GridMetrics {
            row_height: 100.0,
            gutter: 0.0,
        };
        StaticGeometry::with_widgets(CONTAINER, layout.compute_rects(CONTAINER, &metrics))
    }

    fn dashboard_with(store: MemoryStore, settings: &GridboardSettings) -> Dashboard {
        Dashboard::new(sample_layout(), Box::new(store), settings).unwrap()
    }

    // ── Mutations & persistence ─────────────────

    #[test]
    fn move_commits_locally_and_saves_after_debounce() {
        let store = MemoryStore::default();
        let saved = store.saved.clone();
        let mut dashboard = dashboard_with(store, &GridboardSettings::default());
        let geometry = geometry_for(dashboard.layout());

        assert!(dashboard.move_widget("b", DropTarget::new_row(3)));
        assert_eq!(dashboard.layout().widgets(), ["a", "c", "b"]);
        assert_eq!(dashboard.layout().width_of("a"), Full);
        assert_eq!(dashboard.layout().width_of("c"), Full);
        assert_eq!(dashboard.layout().width_of("b"), Full);
        assert!(dashboard.has_pending_save());

        // Still inside the quiet period.
        dashboard.tick(Instant::now(), &geometry);
        assert!(saved.lock().unwrap().is_empty());

        dashboard.tick(Instant::now() + Duration::from_secs(1), &geometry);
        assert!(dashboard.wait_for_persistence(WAIT));

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(
            saved[0].widgets,
            vec![entry("a", 12), entry("c", 12), entry("b", 12)]
        );
    }

    #[test]
    fn rapid_changes_coalesce_into_one_save() {
        let store = MemoryStore::default();
        let saved = store.saved.clone();
        let mut dashboard = dashboard_with(store, &GridboardSettings::default());

        assert!(dashboard.add_widget("d"));
        assert!(dashboard.delete_widget("c"));
        dashboard.flush();
        assert!(dashboard.wait_for_persistence(WAIT));

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(
            saved[0].widgets,
            vec![entry("a", 6), entry("b", 6), entry("d", 12)]
        );
    }

    #[test]
    fn dropping_dashboard_saves_pending_change() {
        let store = MemoryStore::default();
        let saved = store.saved.clone();
        let mut dashboard = dashboard_with(store, &GridboardSettings::default());

        assert!(dashboard.delete_widget("c"));
        assert!(dashboard.has_pending_save());
        drop(dashboard);

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].widgets, vec![entry("a", 6), entry("b", 6)]);
    }

    #[test]
    fn dropping_idle_dashboard_saves_nothing() {
        let store = MemoryStore::default();
        let saved = store.saved.clone();
        drop(dashboard_with(store, &GridboardSettings::default()));
        assert!(saved.lock().unwrap().is_empty());
    }

    #[test]
    fn zero_debounce_saves_immediately() {
        let store = MemoryStore::default();
        let saved = store.saved.clone();
        let settings = GridboardSettings {
            persist_debounce_ms: 0,
            ..GridboardSettings::default()
        };
        let mut dashboard = dashboard_with(store, &settings);

        assert!(dashboard.handle_widget_resize("a", "b", TwoThirds, Third));
        assert!(dashboard.wait_for_persistence(WAIT));
        assert_eq!(saved.lock().unwrap().len(), 1);
    }

    #[test]
    fn unknown_widget_is_a_noop() {
        let mut dashboard = dashboard_with(MemoryStore::default(), &GridboardSettings::default());

        assert!(!dashboard.delete_widget("zzz"));
        assert!(!dashboard.move_widget("zzz", DropTarget::within_row(0, 0)));
        assert!(!dashboard.add_widget("a"));
        assert!(!dashboard.handle_widget_resize("b", "zzz", Third, TwoThirds));
        assert!(!dashboard.handle_widget_resize("a", "b", Full, Third));
        assert!(!dashboard.has_pending_save());
        assert_eq!(dashboard.layout(), &sample_layout());
    }

    #[test]
    fn failed_save_keeps_local_state_and_notifies() {
        let mut dashboard = Dashboard::new(sample_layout(), Box::new(OfflineStore), &GridboardSettings::default())
            .unwrap();

        assert!(dashboard.delete_widget("a"));
        dashboard.flush();
        assert!(dashboard.wait_for_persistence(WAIT));

        assert!(dashboard.find_widget("a").is_none());
        assert_eq!(dashboard.layout().widgets(), ["b", "c"]);

        let notifications = dashboard.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Warning);
        assert!(notifications[0].message.starts_with("Layout changes may not have been saved"));
        assert!(notifications[0].message.contains("service unavailable"));
        assert!(dashboard.take_notifications().is_empty());
    }

    // ── Loading ─────────────────────────────────

    #[test]
    fn load_drops_unknown_widgets_and_snaps_widths() {
        let store = MemoryStore {
            stored: Some(PersistedLayout {
                widgets: vec![entry("todos", 5), entry("retired", 6), entry("pipelines", 8)],
            }),
            ..MemoryStore::default()
        };
        let settings = GridboardSettings::default();
        let registry = CatalogRegistry::from_settings(&settings);

        let mut dashboard = Dashboard::load(Box::new(store), &registry, &settings).unwrap();

        assert_eq!(dashboard.layout().widgets(), ["todos", "pipelines"]);
        assert_eq!(dashboard.layout().width_of("todos"), Third);
        assert_eq!(dashboard.layout().width_of("pipelines"), TwoThirds);

        let notifications = dashboard.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Info);
    }

    #[test]
    fn load_without_stored_layout_is_empty() {
        let settings = GridboardSettings::default();
        let registry = CatalogRegistry::from_settings(&settings);
        let mut dashboard = Dashboard::load(Box::new(MemoryStore::default()), &registry, &settings).unwrap();

        assert!(dashboard.layout().is_empty());
        assert!(dashboard.take_notifications().is_empty());
    }

    #[test]
    fn load_failure_starts_empty_with_warning() {
        let settings = GridboardSettings::default();
        let registry = CatalogRegistry::from_settings(&settings);
        let mut dashboard = Dashboard::load(Box::new(OfflineStore), &registry, &settings).unwrap();

        assert!(dashboard.rows().is_empty());
        let notifications = dashboard.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Warning);
    }

    // ── Drag & drop zones ───────────────────────

    #[test]
    fn drag_start_and_end() {
        let mut dashboard = dashboard_with(MemoryStore::default(), &GridboardSettings::default());

        dashboard.handle_drag_start("c");
        assert_eq!(dashboard.drag_state().dragged(), Some("c"));
        dashboard.handle_drag_end();
        assert_eq!(dashboard.drag_state(), &DragState::Idle);
    }

    #[test]
    fn drop_zones_match_layout_engine() {
        let mut dashboard = dashboard_with(MemoryStore::default(), &GridboardSettings::default());
        let geometry = geometry_for(dashboard.layout());
        dashboard.handle_drag_start("c");

        let expected = dashboard.layout().drop_zones(dashboard.drag_state(), &geometry);
        assert!(!expected.is_empty());
        assert_eq!(dashboard.drop_zones(&geometry), expected.as_slice());
    }

    #[test]
    fn drop_zones_are_reused_until_geometry_settles() {
        let mut dashboard = dashboard_with(MemoryStore::default(), &GridboardSettings::default());
        let geometry = geometry_for(dashboard.layout());
        let unmeasured = StaticGeometry::default();
        let t0 = Instant::now();

        let first = dashboard.drop_zones(&geometry).to_vec();
        assert!(!first.is_empty());

        // Nothing the zones depend on changed: the cached answer comes back.
        assert_eq!(dashboard.drop_zones(&unmeasured), first.as_slice());

        dashboard.notify_surface_resized(t0);
        dashboard.tick(t0 + Duration::from_millis(10), &unmeasured);
        assert_eq!(dashboard.drop_zones(&unmeasured), first.as_slice());

        dashboard.tick(t0 + Duration::from_millis(500), &unmeasured);
        assert!(dashboard.drop_zones(&unmeasured).is_empty());
    }

    #[test]
    fn element_resize_refreshes_zones_after_settling() {
        let mut dashboard = dashboard_with(MemoryStore::default(), &GridboardSettings::default());
        let geometry = geometry_for(dashboard.layout());
        let unmeasured = StaticGeometry::default();
        let t0 = Instant::now();

        let first = dashboard.drop_zones(&geometry).to_vec();
        assert!(!first.is_empty());

        // Untracked widgets do not schedule a re-measure.
        dashboard.notify_element_resized("zzz", t0);
        dashboard.tick(t0 + Duration::from_millis(500), &unmeasured);
        assert_eq!(dashboard.drop_zones(&unmeasured), first.as_slice());

        dashboard.notify_element_resized("b", t0);
        dashboard.tick(t0 + Duration::from_millis(10), &unmeasured);
        assert_eq!(dashboard.drop_zones(&unmeasured), first.as_slice());

        dashboard.tick(t0 + Duration::from_millis(500), &unmeasured);
        assert!(dashboard.drop_zones(&unmeasured).is_empty());
        assert_eq!(dashboard.drop_zones(&geometry), first.as_slice());
    }

    #[test]
    fn drop_zones_follow_drag_state() {
        let mut dashboard = dashboard_with(MemoryStore::default(), &GridboardSettings::default());
        let geometry = geometry_for(dashboard.layout());

        let idle = dashboard.drop_zones(&geometry).to_vec();
        dashboard.handle_drag_start("a");
        let dragging = dashboard.drop_zones(&geometry).to_vec();

        assert_ne!(idle, dragging);
        assert!(dragging.iter().any(|z| z.horizontal_drop && z.visible));
        assert!(idle.iter().all(|z| !z.horizontal_drop || !z.visible));
    }

    // ── Resize gesture ──────────────────────────

    #[test]
    fn resize_gesture_commits_through_dashboard() {
        let store = MemoryStore::default();
        let saved = store.saved.clone();
        let mut dashboard = dashboard_with(store, &GridboardSettings::default());
        let geometry = geometry_for(dashboard.layout());
        let t0 = Instant::now();

        assert!(dashboard.resize_handle("a", "b", &geometry).is_some());
        assert!(dashboard.resize_row_indicator("a", "b", &geometry).is_some());
        assert!(dashboard.begin_resize("a", "b", 600.0, &geometry));
        assert!(dashboard.is_resizing());

        assert!(dashboard.resize_pointer_move(800.0, t0, &geometry));
        assert_eq!(dashboard.layout().width_of("a"), TwoThirds);
        assert_eq!(dashboard.layout().width_of("b"), Third);
        assert_eq!(dashboard.resize_preview("a", "b"), (TwoThirds, Third));

        dashboard.end_resize();
        assert!(!dashboard.is_resizing());

        dashboard.flush();
        assert!(dashboard.wait_for_persistence(WAIT));
        assert_eq!(
            saved.lock().unwrap()[0].widgets,
            vec![entry("a", 8), entry("b", 4), entry("c", 12)]
        );
    }

    #[test]
    fn held_resize_move_is_applied_on_tick() {
        let mut dashboard = dashboard_with(MemoryStore::default(), &GridboardSettings::default());
        let geometry = geometry_for(dashboard.layout());
        let t0 = Instant::now();

        assert!(dashboard.begin_resize("a", "b", 600.0, &geometry));
        assert!(!dashboard.resize_pointer_move(610.0, t0, &geometry));
        assert!(!dashboard.resize_pointer_move(400.0, t0 + Duration::from_millis(4), &geometry));
        assert_eq!(dashboard.layout().width_of("a"), Half);

        dashboard.tick(t0 + Duration::from_millis(20), &geometry);
        assert_eq!(dashboard.layout().width_of("a"), Third);
        assert_eq!(dashboard.layout().width_of("b"), TwoThirds);
    }

    #[test]
    fn resize_across_rows_is_refused() {
        let mut dashboard = dashboard_with(MemoryStore::default(), &GridboardSettings::default());
        let geometry = geometry_for(dashboard.layout());
        assert!(!dashboard.begin_resize("b", "c", 1200.0, &geometry));
        assert!(!dashboard.resize_pointer_move(1000.0, Instant::now(), &geometry));
    }
}
