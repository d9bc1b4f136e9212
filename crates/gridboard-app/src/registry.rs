use std::collections::HashMap;

use gridboard_core::{PersistedLayout, WidgetKey, WidgetMeta, WidgetRegistry};

use crate::settings::{CatalogEntry, GridboardSettings};

/// Widget registry backed by the catalog in settings.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    entries: HashMap<WidgetKey, WidgetMeta>,
}

impl CatalogRegistry {
    pub fn new(catalog: &[CatalogEntry]) -> Self {
        Self {
            entries: catalog.iter().map(|e| (e.uid.clone(), e.meta.clone())).collect(),
        }
    }

    pub fn from_settings(settings: &GridboardSettings) -> Self {
        Self::new(&settings.catalog)
    }
}

impl WidgetRegistry for CatalogRegistry {
    fn lookup(&self, key: &str) -> Option<WidgetMeta> {
        self.entries.get(key).cloned()
    }
}

/// Drop entries the registry cannot resolve, e.g. widgets removed since the layout was saved.
pub fn retain_known(layout: &PersistedLayout, registry: &dyn WidgetRegistry) -> PersistedLayout {
    let widgets = layout
        .widgets
        .iter()
        .filter(|entry| {
            let known = registry.contains(&entry.uid);
            if !known {
                log::warn!("dropping unknown widget {} from stored layout", entry.uid);
            }
            known
        })
        .cloned()
        .collect();
    PersistedLayout { widgets }
}
