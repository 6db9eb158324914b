//! Load and save of the project blob.
//!
//! # Load
//! 1. Read the blob from the slot. Nothing stored yet → empty project.
//! 2. Parse it as JSON. A read or parse failure is logged and replaced by
//!    the empty project; load never fails.
//! 3. Migrate and normalize.
//!
//! # Save
//! 1. Normalize whatever the caller hands in.
//! 2. Stamp `meta.lastUpdated` and `schemaVersion`.
//! 3. Write the pretty-printed JSON to the slot and return the exact project
//!    written, so callers can keep it as their in-memory copy.

use serde_json::Value;

use super::normalize::normalize_mission_project;
use super::schema::create_empty_mission_project;
use super::slot::StorageSlot;
use super::types::{MissionProject, CURRENT_SCHEMA_VERSION};
use crate::error::AppError;

/// Load the project from `slot`, falling back to the empty project.
pub fn load_mission_project(slot: &dyn StorageSlot) -> MissionProject {
    let raw = match slot.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!(slot = %slot.location(), "no stored project; starting empty");
            return create_empty_mission_project();
        }
        Err(e) => {
            tracing::warn!(slot = %slot.location(), error = %e, "cannot read stored project");
            return create_empty_mission_project();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => normalize_mission_project(value),
        Err(e) => {
            tracing::warn!(slot = %slot.location(), error = %e, "stored project is not valid JSON");
            create_empty_mission_project()
        }
    }
}

/// Normalize, stamp and write `project` to `slot`.
///
/// Accepts anything project-shaped: a typed [`MissionProject`] is passed as
/// its JSON value. Returns the project exactly as written.
pub fn save_mission_project(
    slot: &dyn StorageSlot,
    project: Value,
) -> Result<MissionProject, AppError> {
    let mut project = normalize_mission_project(project);
    project.meta.last_updated = crate::time::now_rfc3339();
    project.schema_version = CURRENT_SCHEMA_VERSION.to_string();

    let json = serde_json::to_string_pretty(&project)
        .map_err(|e| AppError::StorageWrite(format!("cannot serialize project: {e}")))?;
    slot.write(&json)?;

    tracing::info!(
        slot = %slot.location(),
        mission = %project.mission.display_name(),
        "saved mission project"
    );
    Ok(project)
}
