//! Plant watering tracker: schedule engine, plant store and reminders.

pub mod care;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notifications;
pub mod schedule;
pub mod store;

pub use error::{PlantError, Result};
pub use models::{PlantDraft, PlantEdit, PlantRecord, Timestamp};
pub use schedule::Urgency;
pub use store::PlantStore;
