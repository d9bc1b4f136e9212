// Gridboard application layer: the dashboard orchestrator plus the
// settings, storage and persistence plumbing it runs on.

pub mod dashboard;
pub mod notification;
pub mod persist;
pub mod registry;
pub mod settings;
pub mod store;

mod tests;

pub use dashboard::Dashboard;
pub use notification::{Notification, NotificationLevel};
pub use persist::PersistWorker;
pub use registry::{retain_known, CatalogRegistry};
pub use settings::{load_settings, load_settings_from, save_settings, save_settings_to, CatalogEntry, GridboardSettings};
pub use store::JsonFileStore;
