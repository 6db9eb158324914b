//! The project store.
//!
//! A project is one JSON blob in one storage slot. This module provides:
//!
//! - [`types`]: the canonical in-memory project record
//! - [`schema`]: the all-fields-present empty project
//! - [`migrate`]: the versioned migration chain for older blobs
//! - [`normalize`]: total conversion of any JSON into a canonical project
//! - [`ids`]: record and stable entity id generation
//! - [`merge`]: merging imported entity lists without duplicates
//! - [`slot`]: the storage slot abstraction
//! - [`serialization`]: load and save against a slot

pub mod ids;
pub mod merge;
pub mod migrate;
pub mod normalize;
pub mod schema;
pub mod serialization;
pub mod slot;
pub mod types;

pub use merge::{merge_project_entities, IncomingEntities, MergeSummary};
pub use migrate::migrate_mission_project;
pub use normalize::normalize_mission_project;
pub use schema::create_empty_mission_project;
pub use serialization::{load_mission_project, save_mission_project};
pub use slot::{FileSlot, MemorySlot, StorageSlot};
pub use types::{MissionProject, CURRENT_SCHEMA_VERSION, STORAGE_KEY};
