//! Per-API services.
//!
//! Services are lightweight handles around a [`Client`](crate::Client) clone and
//! are created on demand through the client accessors.
//!
//! | Service | Accessor | Base path |
//! |---------|----------|-----------|
//! | [`AdminService`] | `client.admins()` | `/api/admins` |
//! | [`CollectionService`] | `client.collections()` | `/api/collections` |
//! | [`RecordService`] | `client.collection("posts")` | `/api/collections/posts/records` |
//! | [`FileService`] | `client.files()` | `/api/files` |
//! | [`LogService`] | `client.logs()` | `/api/logs/requests` |
//! | [`SettingsService`] | `client.settings()` | `/api/settings` |
//! | [`HealthService`] | `client.health()` | `/api/health` |
//!
//! The admin, collection and record services dereference to [`CrudService`]
//! for the shared list/view/create/update/delete operations.

mod admin;
mod collection;
mod crud;
mod file;
mod health;
mod log;
mod record;
mod settings;

pub use admin::AdminService;
pub use collection::CollectionService;
pub use crud::{CrudService, DEFAULT_BATCH_SIZE, DEFAULT_PER_PAGE};
pub use file::FileService;
pub use health::HealthService;
pub use log::LogService;
pub use record::RecordService;
pub use settings::SettingsService;
