// Settings persistence: global gridboard configuration stored next to the layout.
// Uses platform-native config dir: e.g. ~/Library/Application Support/gridboard/settings.json
// on macOS, ~/.config/gridboard/settings.json on Linux.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use gridboard_core::{WidgetKey, WidgetMeta};
use gridboard_input::ResizeConfig;
use gridboard_layout::GridMetrics;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridboardSettings {
    /// Quiet period after the last layout change before it is saved.
    #[serde(default = "default_persist_debounce_ms")]
    pub persist_debounce_ms: u64,
    #[serde(default = "default_resize_throttle_ms")]
    pub resize_throttle_ms: u64,
    /// How long the surface must stop resizing before geometry is re-measured.
    #[serde(default = "default_geometry_settle_ms")]
    pub geometry_settle_ms: u64,
    /// Overrides the default layout file location.
    #[serde(default)]
    pub layout_path: Option<PathBuf>,
    #[serde(default)]
    pub metrics: MetricsSettings,
    /// Widgets that may appear on the dashboard.
    #[serde(default = "default_catalog")]
    pub catalog: Vec<CatalogEntry>,
}

fn default_persist_debounce_ms() -> u64 {
    300
}

fn default_resize_throttle_ms() -> u64 {
    16
}

fn default_geometry_settle_ms() -> u64 {
    100
}

impl Default for GridboardSettings {
    fn default() -> Self {
        Self {
            persist_debounce_ms: default_persist_debounce_ms(),
            resize_throttle_ms: default_resize_throttle_ms(),
            geometry_settle_ms: default_geometry_settle_ms(),
            layout_path: None,
            metrics: MetricsSettings::default(),
            catalog: default_catalog(),
        }
    }
}

impl GridboardSettings {
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn geometry_settle(&self) -> Duration {
        Duration::from_millis(self.geometry_settle_ms)
    }

    pub fn resize_config(&self) -> ResizeConfig {
        ResizeConfig {
            throttle: Duration::from_millis(self.resize_throttle_ms),
            ..ResizeConfig::default()
        }
    }
}

/// Pixel sizes used when the CLI lays the grid out without a real surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsSettings {
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    #[serde(default = "default_gutter")]
    pub gutter: f32,
}

fn default_row_height() -> f32 {
    GridMetrics::default().row_height
}

fn default_gutter() -> f32 {
    GridMetrics::default().gutter
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            gutter: default_gutter(),
        }
    }
}

impl From<MetricsSettings> for GridMetrics {
    fn from(m: MetricsSettings) -> Self {
        GridMetrics {
            row_height: m.row_height,
            gutter: m.gutter,
        }
    }
}

/// A single known widget stored in settings.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub uid: WidgetKey,
    #[serde(flatten)]
    pub meta: WidgetMeta,
}

impl CatalogEntry {
    fn new(uid: &str, title: &str, icon: &str, link: &str) -> Self {
        Self {
            uid: uid.to_string(),
            meta: WidgetMeta {
                title: title.to_string(),
                icon: Some(icon.to_string()),
                link: Some(link.to_string()),
            },
        }
    }
}

fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("recent-activity", "Recent activity", "clock", "/activity"),
        CatalogEntry::new("assigned-issues", "Assigned issues", "issues", "/issues?assignee=me"),
        CatalogEntry::new("review-requests", "Review requests", "merge-request", "/reviews"),
        CatalogEntry::new("starred-projects", "Starred projects", "star", "/projects/starred"),
        CatalogEntry::new("todos", "To-do list", "todo", "/todos"),
        CatalogEntry::new("pipelines", "Pipeline status", "pipeline", "/pipelines"),
    ]
}

fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("gridboard").join("settings.json"))
}

pub fn load_settings() -> GridboardSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => GridboardSettings::default(),
    }
}

pub fn load_settings_from(path: &Path) -> GridboardSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                GridboardSettings::default()
            }
        },
        Err(_) => GridboardSettings::default(),
    }
}

pub fn save_settings(settings: &GridboardSettings) {
    let path = match settings_path() {
        Some(p) => p,
        None => {
            log::warn!("Cannot determine settings path");
            return;
        }
    };
    if let Err(e) = save_settings_to(&path, settings) {
        log::error!("Failed to write {}: {}", path.display(), e);
    }
}

pub fn save_settings_to(path: &Path, settings: &GridboardSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)
}
