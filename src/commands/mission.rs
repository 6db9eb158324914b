//! Editing commands for the active mission.
//!
//! Every handler write-locks the project, edits `project.mission` and then
//! re-derives the mirrored views (`meta` summary, `environment`, flattened
//! `constraints`), so the in-memory project is always save-ready.
//!
//! Dangling references are tolerated: removing an asset strips it from phase
//! usage lists but leaves assignments that name it alone.

use std::sync::RwLock;

use crate::error::AppError;
use crate::models::demo::{demo_assets, example_mission};
use crate::models::{Asset, AssetType, Assignment, Mission, MissionConstraints, MissionMeta, Phase};
use crate::project::ids::new_record_id;
use crate::project::MissionProject;

use super::write_project;

/// Run `edit` against the active mission, then re-derive the mirrored views.
fn with_mission<T>(
    project_lock: &RwLock<MissionProject>,
    edit: impl FnOnce(&mut Mission) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut project = write_project(project_lock)?;
    let out = edit(&mut project.mission)?;
    project.sync_derived();
    Ok(out)
}

fn phase_mut<'a>(mission: &'a mut Mission, id: &str) -> Result<&'a mut Phase, AppError> {
    mission
        .phases
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("phase {id} not found")))
}

fn asset_mut<'a>(mission: &'a mut Mission, id: &str) -> Result<&'a mut Asset, AppError> {
    mission
        .assets
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))
}

fn assignment_mut<'a>(mission: &'a mut Mission, id: &str) -> Result<&'a mut Assignment, AppError> {
    mission
        .assignments
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::NotFound(format!("assignment {id} not found")))
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

// ── Input types ───────────────────────────────────────────────────────────────

/// Partial update of [`MissionMeta`]; `None` leaves a field unchanged.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionMetaPatch {
    pub name: Option<String>,
    pub classification_banner: Option<String>,
    pub ao: Option<String>,
    pub unit_or_detachment: Option<String>,
    pub created_on: Option<String>,
    pub created_by: Option<String>,
    pub mission_type: Option<String>,
    pub duration_hours: Option<f64>,
    pub altitude_band: Option<String>,
    pub temperature_band: Option<String>,
}

/// Partial update of [`MissionConstraints`]. Success criteria have their
/// own commands.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintsPatch {
    pub time_window: Option<String>,
    pub environment: Option<String>,
    pub rf_constraints: Option<String>,
    pub logistics_constraints: Option<String>,
    pub max_sorties: Option<u32>,
    pub min_battery_reserve_pct: Option<f64>,
    pub requires_rf_coverage: Option<bool>,
    pub risk_notes: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhasePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_condition: Option<String>,
    pub end_condition: Option<String>,
    pub tasks: Option<Vec<String>>,
    pub emcon_considerations: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Fields of a new asset. The id is generated on add.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    pub name: String,
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub source_tool: Option<String>,
    #[serde(default)]
    pub role_tags: Vec<String>,
    #[serde(default)]
    pub owner_element: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub asset_type: Option<String>,
    pub source_tool: Option<String>,
    pub role_tags: Option<Vec<String>>,
    pub owner_element: Option<String>,
    pub notes: Option<String>,
    pub critical: Option<bool>,
    pub rf_band: Option<String>,
    pub battery_wh: Option<f64>,
    pub endurance_hours: Option<f64>,
    pub endurance_minutes: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentPatch {
    pub asset_id: Option<String>,
    pub phase_id: Option<String>,
    pub team: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
    pub critical: Option<bool>,
    pub requires_comms: Option<bool>,
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ── whole mission ─────────────────────────────────────────────────────────────

/// Replace the active mission with a blank one carrying the default phases.
pub fn new_mission_inner(project_lock: &RwLock<MissionProject>) -> Result<Mission, AppError> {
    with_mission(project_lock, |mission| {
        *mission = Mission::blank();
        Ok(mission.clone())
    })
}

/// Replace the active mission with the "Fjord Recon Lane" example.
pub fn load_example_mission_inner(
    project_lock: &RwLock<MissionProject>,
) -> Result<Mission, AppError> {
    with_mission(project_lock, |mission| {
        *mission = example_mission();
        Ok(mission.clone())
    })
}

pub fn update_meta_inner(
    patch: MissionMetaPatch,
    project_lock: &RwLock<MissionProject>,
) -> Result<MissionMeta, AppError> {
    with_mission(project_lock, |mission| {
        let mm = &mut mission.mission_meta;
        set(&mut mm.name, patch.name);
        set(&mut mm.classification_banner, patch.classification_banner);
        set(&mut mm.ao, patch.ao);
        set(&mut mm.unit_or_detachment, patch.unit_or_detachment);
        set(&mut mm.created_on, patch.created_on);
        set(&mut mm.created_by, patch.created_by);
        set(&mut mm.mission_type, patch.mission_type);
        set(&mut mm.duration_hours, patch.duration_hours.filter(|h| h.is_finite() && *h >= 0.0));
        set(&mut mm.altitude_band, patch.altitude_band);
        set(&mut mm.temperature_band, patch.temperature_band);
        Ok(mm.clone())
    })
}

pub fn update_constraints_inner(
    patch: ConstraintsPatch,
    project_lock: &RwLock<MissionProject>,
) -> Result<MissionConstraints, AppError> {
    with_mission(project_lock, |mission| {
        let c = &mut mission.constraints;
        set(&mut c.time_window, patch.time_window);
        set(&mut c.environment, patch.environment);
        set(&mut c.rf_constraints, patch.rf_constraints);
        set(&mut c.logistics_constraints, patch.logistics_constraints);
        if patch.max_sorties.is_some() {
            c.max_sorties = patch.max_sorties;
        }
        if let Some(pct) = patch.min_battery_reserve_pct.filter(|p| p.is_finite()) {
            c.min_battery_reserve_pct = Some(pct);
        }
        set(&mut c.requires_rf_coverage, patch.requires_rf_coverage);
        set(&mut c.risk_notes, patch.risk_notes);
        Ok(c.clone())
    })
}

// ── phases ────────────────────────────────────────────────────────────────────

pub fn add_phase_inner(
    name: Option<String>,
    project_lock: &RwLock<MissionProject>,
) -> Result<Phase, AppError> {
    with_mission(project_lock, |mission| {
        let name = name.filter(|n| !n.trim().is_empty());
        let phase = Phase {
            id: new_record_id("phase"),
            name: name.unwrap_or_else(|| "New Phase".to_string()),
            ..Phase::default()
        };
        mission.phases.push(phase.clone());
        Ok(phase)
    })
}

pub fn update_phase_inner(
    id: &str,
    patch: PhasePatch,
    project_lock: &RwLock<MissionProject>,
) -> Result<Phase, AppError> {
    with_mission(project_lock, |mission| {
        let phase = phase_mut(mission, id)?;
        set(&mut phase.name, patch.name);
        set(&mut phase.description, patch.description);
        set(&mut phase.start_condition, patch.start_condition);
        set(&mut phase.end_condition, patch.end_condition);
        set(
            &mut phase.tasks,
            patch
                .tasks
                .map(|tasks| tasks.into_iter().filter(|t| !t.trim().is_empty()).collect()),
        );
        set(&mut phase.emcon_considerations, patch.emcon_considerations);
        Ok(phase.clone())
    })
}

/// Move a phase one slot up or down. Moving past either end is a no-op.
/// Returns the phase ids in their new order.
pub fn move_phase_inner(
    id: &str,
    direction: MoveDirection,
    project_lock: &RwLock<MissionProject>,
) -> Result<Vec<String>, AppError> {
    with_mission(project_lock, |mission| {
        let idx = mission
            .phases
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("phase {id} not found")))?;
        let target = match direction {
            MoveDirection::Up => idx.checked_sub(1),
            MoveDirection::Down => Some(idx + 1).filter(|t| *t < mission.phases.len()),
        };
        if let Some(target) = target {
            mission.phases.swap(idx, target);
        }
        Ok(mission.phases.iter().map(|p| p.id.clone()).collect())
    })
}

pub fn delete_phase_inner(id: &str, project_lock: &RwLock<MissionProject>) -> Result<(), AppError> {
    with_mission(project_lock, |mission| {
        let before = mission.phases.len();
        mission.phases.retain(|p| p.id != id);
        if mission.phases.len() == before {
            return Err(AppError::NotFound(format!("phase {id} not found")));
        }
        Ok(())
    })
}

/// Mark `asset_id` as used (or unused) in `phase_id`.
pub fn set_phase_asset_inner(
    phase_id: &str,
    asset_id: &str,
    used: bool,
    project_lock: &RwLock<MissionProject>,
) -> Result<Phase, AppError> {
    with_mission(project_lock, |mission| {
        if used && mission.asset(asset_id).is_none() {
            return Err(AppError::NotFound(format!("asset {asset_id} not found")));
        }
        let phase = phase_mut(mission, phase_id)?;
        if used {
            if !phase.assets_used.iter().any(|a| a == asset_id) {
                phase.assets_used.push(asset_id.to_string());
            }
        } else {
            phase.assets_used.retain(|a| a != asset_id);
        }
        Ok(phase.clone())
    })
}

// ── assets ────────────────────────────────────────────────────────────────────

pub fn add_asset_inner(
    input: AssetInput,
    project_lock: &RwLock<MissionProject>,
) -> Result<Asset, AppError> {
    with_mission(project_lock, |mission| {
        let asset = Asset {
            id: new_record_id("asset"),
            name: input.name,
            asset_type: input
                .asset_type
                .map(|t| AssetType::parse(&t))
                .unwrap_or_default(),
            source_tool: input.source_tool.unwrap_or_else(|| "Manual".to_string()),
            role_tags: input.role_tags,
            owner_element: input.owner_element,
            notes: input.notes,
            ..Asset::default()
        };
        mission.assets.push(asset.clone());
        Ok(asset)
    })
}

pub fn edit_asset_inner(
    id: &str,
    patch: AssetPatch,
    project_lock: &RwLock<MissionProject>,
) -> Result<Asset, AppError> {
    with_mission(project_lock, |mission| {
        let asset = asset_mut(mission, id)?;
        set(&mut asset.name, patch.name.filter(|n| !n.is_empty()));
        set(&mut asset.asset_type, patch.asset_type.map(|t| AssetType::parse(&t)));
        set(&mut asset.source_tool, patch.source_tool);
        set(&mut asset.role_tags, patch.role_tags);
        set(&mut asset.owner_element, patch.owner_element);
        set(&mut asset.notes, patch.notes);
        set(&mut asset.critical, patch.critical);
        if patch.rf_band.is_some() {
            asset.rf_band = patch.rf_band.filter(|b| !b.is_empty());
        }
        for (slot, value) in [
            (&mut asset.battery_wh, patch.battery_wh),
            (&mut asset.endurance_hours, patch.endurance_hours),
            (&mut asset.endurance_minutes, patch.endurance_minutes),
            (&mut asset.lat, patch.lat),
            (&mut asset.lon, patch.lon),
        ] {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                *slot = Some(v);
            }
        }
        Ok(asset.clone())
    })
}

/// Copy an asset under a fresh id, suffixing its name with " (copy)".
pub fn duplicate_asset_inner(
    id: &str,
    project_lock: &RwLock<MissionProject>,
) -> Result<Asset, AppError> {
    with_mission(project_lock, |mission| {
        let original = mission
            .asset(id)
            .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))?;
        let copy = Asset {
            id: new_record_id("asset"),
            name: format!("{} (copy)", original.name),
            ..original.clone()
        };
        mission.assets.push(copy.clone());
        Ok(copy)
    })
}

/// Remove an asset and drop it from every phase's usage list.
pub fn remove_asset_inner(id: &str, project_lock: &RwLock<MissionProject>) -> Result<(), AppError> {
    with_mission(project_lock, |mission| {
        let before = mission.assets.len();
        mission.assets.retain(|a| a.id != id);
        if mission.assets.len() == before {
            return Err(AppError::NotFound(format!("asset {id} not found")));
        }
        for phase in &mut mission.phases {
            phase.assets_used.retain(|a| a != id);
        }
        Ok(())
    })
}

/// Append the demo asset set.
pub fn seed_demo_assets_inner(
    project_lock: &RwLock<MissionProject>,
) -> Result<Vec<Asset>, AppError> {
    with_mission(project_lock, |mission| {
        let seeded = demo_assets();
        mission.assets.extend(seeded.iter().cloned());
        Ok(seeded)
    })
}

// ── assignments ───────────────────────────────────────────────────────────────

/// Bind the first asset to the first phase as a new assignment.
///
/// Returns [`AppError::MissingSelection`] when the mission has no assets or
/// no phases yet.
pub fn add_assignment_inner(
    project_lock: &RwLock<MissionProject>,
) -> Result<Assignment, AppError> {
    with_mission(project_lock, |mission| {
        let (Some(asset), Some(phase)) = (mission.assets.first(), mission.phases.first()) else {
            return Err(AppError::MissingSelection(
                "add assets and phases before assigning roles".to_string(),
            ));
        };
        let assignment = Assignment {
            id: new_record_id("assign"),
            asset_id: asset.id.clone(),
            phase_id: phase.id.clone(),
            ..Assignment::default()
        };
        mission.assignments.push(assignment.clone());
        Ok(assignment)
    })
}

pub fn update_assignment_inner(
    id: &str,
    patch: AssignmentPatch,
    project_lock: &RwLock<MissionProject>,
) -> Result<Assignment, AppError> {
    with_mission(project_lock, |mission| {
        let assignment = assignment_mut(mission, id)?;
        set(&mut assignment.asset_id, patch.asset_id);
        set(&mut assignment.phase_id, patch.phase_id);
        set(&mut assignment.team, patch.team);
        set(&mut assignment.role, patch.role);
        set(&mut assignment.notes, patch.notes);
        set(&mut assignment.critical, patch.critical);
        set(&mut assignment.requires_comms, patch.requires_comms);
        Ok(assignment.clone())
    })
}

pub fn remove_assignment_inner(
    id: &str,
    project_lock: &RwLock<MissionProject>,
) -> Result<(), AppError> {
    with_mission(project_lock, |mission| {
        let before = mission.assignments.len();
        mission.assignments.retain(|a| a.id != id);
        if mission.assignments.len() == before {
            return Err(AppError::NotFound(format!("assignment {id} not found")));
        }
        Ok(())
    })
}

// ── success criteria ──────────────────────────────────────────────────────────

/// Append a success criterion. Blank text is ignored.
pub fn add_criterion_inner(
    text: &str,
    project_lock: &RwLock<MissionProject>,
) -> Result<Vec<String>, AppError> {
    with_mission(project_lock, |mission| {
        let text = text.trim();
        if !text.is_empty() {
            mission.constraints.success_criteria.push(text.to_string());
        }
        Ok(mission.constraints.success_criteria.clone())
    })
}

pub fn update_criterion_inner(
    index: usize,
    text: &str,
    project_lock: &RwLock<MissionProject>,
) -> Result<Vec<String>, AppError> {
    with_mission(project_lock, |mission| {
        let criteria = &mut mission.constraints.success_criteria;
        let entry = criteria
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("success criterion {index} not found")))?;
        *entry = text.to_string();
        Ok(criteria.clone())
    })
}

pub fn remove_criterion_inner(
    index: usize,
    project_lock: &RwLock<MissionProject>,
) -> Result<Vec<String>, AppError> {
    with_mission(project_lock, |mission| {
        let criteria = &mut mission.constraints.success_criteria;
        if index >= criteria.len() {
            return Err(AppError::NotFound(format!("success criterion {index} not found")));
        }
        criteria.remove(index);
        Ok(criteria.clone())
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
