//! Saved-mission archive commands.
//!
//! The archive is `meta.savedMissions` inside the one project blob; there is
//! no separate storage namespace. Entries are keyed by mission id.

use std::sync::RwLock;

use serde::Serialize;

use crate::error::AppError;
use crate::models::Mission;
use crate::project::MissionProject;

use super::{read_project, write_project};

/// One row of the archive listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMissionSummary {
    pub id: String,
    pub name: String,
    pub created_on: String,
    /// Whether this entry is the mission currently being edited.
    pub active: bool,
}

// ── save_to_archive ───────────────────────────────────────────────────────────

/// Snapshot the active mission into the archive, replacing any entry with
/// the same id.
pub fn save_to_archive_inner(
    project_lock: &RwLock<MissionProject>,
) -> Result<SavedMissionSummary, AppError> {
    let mut project = write_project(project_lock)?;
    let snapshot = project.mission.clone();
    let saved = &mut project.meta.saved_missions;
    match saved.iter_mut().find(|m| m.id == snapshot.id) {
        Some(existing) => *existing = snapshot.clone(),
        None => saved.push(snapshot.clone()),
    }
    tracing::info!(mission = %snapshot.id, archived = saved.len(), "mission archived");
    Ok(summary(&snapshot, &snapshot.id))
}

// ── list_saved_missions ───────────────────────────────────────────────────────

pub fn list_saved_missions_inner(
    project_lock: &RwLock<MissionProject>,
) -> Result<Vec<SavedMissionSummary>, AppError> {
    let project = read_project(project_lock)?;
    Ok(project
        .meta
        .saved_missions
        .iter()
        .map(|m| summary(m, &project.mission.id))
        .collect())
}

// ── load_saved_mission ────────────────────────────────────────────────────────

/// Replace the active mission with a copy of the archived one.
///
/// Later edits to the active mission do not touch the archive entry until it
/// is saved again.
pub fn load_saved_mission_inner(
    id: &str,
    project_lock: &RwLock<MissionProject>,
) -> Result<Mission, AppError> {
    let mut project = write_project(project_lock)?;
    let loaded = project
        .meta
        .saved_missions
        .iter()
        .find(|m| m.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("saved mission {id} not found")))?;
    project.mission = loaded.clone();
    project.sync_derived();
    Ok(loaded)
}

// ── delete_saved_mission ──────────────────────────────────────────────────────

/// Remove an archive entry. Deleting the entry of the active mission also
/// resets the active mission to a blank one.
pub fn delete_saved_mission_inner(
    id: &str,
    project_lock: &RwLock<MissionProject>,
) -> Result<Vec<SavedMissionSummary>, AppError> {
    let mut project = write_project(project_lock)?;
    let before = project.meta.saved_missions.len();
    project.meta.saved_missions.retain(|m| m.id != id);
    if project.meta.saved_missions.len() == before {
        return Err(AppError::NotFound(format!("saved mission {id} not found")));
    }
    if project.mission.id == id {
        project.mission = Mission::blank();
        project.sync_derived();
        tracing::info!(mission = %id, "active mission deleted from archive; started a blank mission");
    }
    let active = project.mission.id.clone();
    Ok(project
        .meta
        .saved_missions
        .iter()
        .map(|m| summary(m, &active))
        .collect())
}

fn summary(mission: &Mission, active_id: &str) -> SavedMissionSummary {
    SavedMissionSummary {
        id: mission.id.clone(),
        name: mission.display_name().to_string(),
        created_on: mission.mission_meta.created_on.clone(),
        active: mission.id == active_id,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
