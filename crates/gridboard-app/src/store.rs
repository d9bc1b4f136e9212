// Layout persistence: the `{ widgets: [{ uid, width }] }` document on disk.

use std::io;
use std::path::{Path, PathBuf};

use gridboard_core::{LayoutStore, PersistedLayout, StoreError, WidgetWidth};

/// Stores the layout as pretty-printed JSON in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/gridboard/layout.json`
    pub fn default_path() -> Option<PathBuf> {
        let config_dir = dirs::config_dir()?;
        Some(config_dir.join("gridboard").join("layout.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Refuse layouts that carry widths outside {4, 6, 8, 12}.
fn check_widths(layout: &PersistedLayout) -> Result<(), StoreError> {
    match layout
        .widgets
        .iter()
        .find(|entry| WidgetWidth::from_columns(entry.width).is_none())
    {
        Some(entry) => Err(StoreError::rejected(format!(
            "widget {} has width {}",
            entry.uid, entry.width
        ))),
        None => Ok(()),
    }
}

impl LayoutStore for JsonFileStore {
    fn save(&mut self, layout: &PersistedLayout) -> Result<(), StoreError> {
        check_widths(layout)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(layout).map_err(|e| StoreError::encode(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        log::debug!("saved layout ({} widgets) to {}", layout.widgets.len(), self.path.display());
        Ok(())
    }

    fn load(&mut self) -> Result<Option<PersistedLayout>, StoreError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let layout = serde_json::from_str(&data).map_err(|e| StoreError::encode(e.to_string()))?;
        Ok(Some(layout))
    }
}
