//! Core library surface for the playground inventory application.
//!
//! The layers stack leaf-first: `db` owns the SQLite table, `service` applies
//! the issue/return rules on top of it, `report` turns grouped counts into
//! charts, and `ui` is the terminal shell that drives the other three.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod service;
pub mod ui;

pub use config::{AppConfig, Settings};
pub use db::EquipmentStore;
pub use error::{InventoryError, InventoryResult};

/// Domain types the other layers pass around.
pub use models::{Distribution, Equipment, EquipmentChanges, EquipmentDraft, Status, HOLDER_NONE};

pub use service::{Answers, Confirmation, InventoryService, Outcome, Prompter};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
