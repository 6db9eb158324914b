//! Project lifecycle and state query commands.
//!
//! [`get_project_snapshot_inner`] returns a lightweight view of the current
//! project for a status line. It acquires only a read lock and is safe to call
//! concurrently with other read commands.

use std::path::Path;
use std::sync::RwLock;

use serde::Serialize;

use crate::analysis::{evaluate_feasibility, Feasibility};
use crate::error::AppError;
use crate::project::{
    create_empty_mission_project, load_mission_project, normalize_mission_project,
    save_mission_project, MissionProject, StorageSlot,
};

use super::{read_project, write_project};

/// Serializable summary of the current project.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub schema_version: String,
    pub mission_id: String,
    pub mission_name: String,
    pub classification_banner: String,
    /// Timestamp of the last save (today's date until first saved).
    pub last_updated: String,
    pub phases: usize,
    pub assets: usize,
    pub assignments: usize,
    pub saved_missions: usize,
    pub nodes: usize,
    pub platforms: usize,
    pub mesh_links: usize,
    pub kits: usize,
}

impl From<&MissionProject> for ProjectSnapshot {
    fn from(p: &MissionProject) -> Self {
        Self {
            schema_version: p.schema_version.clone(),
            mission_id: p.mission.id.clone(),
            mission_name: p.mission.display_name().to_string(),
            classification_banner: p.mission.mission_meta.classification_banner.clone(),
            last_updated: p.meta.last_updated.clone(),
            phases: p.mission.phases.len(),
            assets: p.mission.assets.len(),
            assignments: p.mission.assignments.len(),
            saved_missions: p.meta.saved_missions.len(),
            nodes: p.nodes.len(),
            platforms: p.platforms.len(),
            mesh_links: p.mesh_links.len(),
            kits: p.kits.len(),
        }
    }
}

// ── snapshot / get ────────────────────────────────────────────────────────────

pub fn get_project_snapshot_inner(
    project_lock: &RwLock<MissionProject>,
) -> Result<ProjectSnapshot, AppError> {
    let project = read_project(project_lock)?;
    Ok(ProjectSnapshot::from(&*project))
}

/// The full project (cloned to release the lock).
pub fn get_project_inner(project_lock: &RwLock<MissionProject>) -> Result<MissionProject, AppError> {
    Ok(read_project(project_lock)?.clone())
}

pub fn feasibility_inner(project_lock: &RwLock<MissionProject>) -> Result<Feasibility, AppError> {
    let project = read_project(project_lock)?;
    Ok(evaluate_feasibility(&project.mission))
}

// ── new_project ───────────────────────────────────────────────────────────────

/// Replace the active project with the empty project.
pub fn new_project_inner(
    project_lock: &RwLock<MissionProject>,
) -> Result<ProjectSnapshot, AppError> {
    let new_project = create_empty_mission_project();
    let snapshot = ProjectSnapshot::from(&new_project);
    *write_project(project_lock)? = new_project;
    Ok(snapshot)
}

// ── load_project / save_project ───────────────────────────────────────────────

/// Replace the active project with whatever `slot` holds.
///
/// Never fails on bad slot contents: those load as the empty project.
pub fn load_project_inner(
    project_lock: &RwLock<MissionProject>,
    slot: &dyn StorageSlot,
) -> Result<ProjectSnapshot, AppError> {
    let loaded = load_mission_project(slot);
    let snapshot = ProjectSnapshot::from(&loaded);
    *write_project(project_lock)? = loaded;
    Ok(snapshot)
}

/// Save the active project to `slot` and keep the written copy in memory.
pub fn save_project_inner(
    project_lock: &RwLock<MissionProject>,
    slot: &dyn StorageSlot,
) -> Result<ProjectSnapshot, AppError> {
    let mut project = write_project(project_lock)?;
    let written = save_mission_project(slot, project.to_value())?;
    let snapshot = ProjectSnapshot::from(&written);
    *project = written;
    Ok(snapshot)
}

// ── open_project_file ─────────────────────────────────────────────────────────

/// Replace the active project with a project file from disk.
///
/// The file may be any historical shape; it is migrated and normalized. An
/// unreadable or unparsable file leaves the active project untouched.
pub fn open_project_file_inner(
    path: &Path,
    project_lock: &RwLock<MissionProject>,
) -> Result<ProjectSnapshot, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound(format!("{} does not exist", path.display())));
    }
    let text = std::fs::read_to_string(path)?;
    let value = crate::import::parse_json(&text)?;
    let opened = normalize_mission_project(value);
    tracing::info!(path = %path.display(), mission = %opened.mission.display_name(), "opened project file");

    let snapshot = ProjectSnapshot::from(&opened);
    *write_project(project_lock)? = opened;
    Ok(snapshot)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
