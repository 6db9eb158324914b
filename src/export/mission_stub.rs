//! Minimal mission brief consumed by downstream viewers.

use serde::Serialize;

use crate::models::{AssetType, Assignment, Mission};

/// Version tag of the brief format.
pub const MISSION_STUB_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StubMeta {
    pub id: String,
    pub name: String,
    pub classification_banner: String,
    pub ao: String,
    pub unit: String,
    /// The mission's time-window constraint.
    pub time: String,
    pub created_by: String,
    pub created_on: String,
    pub mission_type: String,
    pub duration_hours: f64,
    pub altitude_band: String,
    pub temperature_band: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StubPhase {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_condition: String,
    pub end_condition: String,
    pub tasks: Vec<String>,
    /// Ids of the assets used in the phase.
    pub assets: Vec<String>,
    pub emcon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StubAsset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub source_tool: String,
    pub role_tags: Vec<String>,
    pub owner_element: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionStub {
    pub ceradon_mission_version: &'static str,
    pub mission_meta: StubMeta,
    pub phases: Vec<StubPhase>,
    pub assets: Vec<StubAsset>,
    pub assignments: Vec<Assignment>,
}

pub fn build_mission_stub(mission: &Mission) -> MissionStub {
    let mm = &mission.mission_meta;
    MissionStub {
        ceradon_mission_version: MISSION_STUB_VERSION,
        mission_meta: StubMeta {
            id: mission.id.clone(),
            name: mm.name.clone(),
            classification_banner: mm.classification_banner.clone(),
            ao: mm.ao.clone(),
            unit: mm.unit_or_detachment.clone(),
            time: mission.constraints.time_window.clone(),
            created_by: mm.created_by.clone(),
            created_on: mm.created_on.clone(),
            mission_type: mm.mission_type.clone(),
            duration_hours: mm.duration_hours,
            altitude_band: mm.altitude_band.clone(),
            temperature_band: mm.temperature_band.clone(),
        },
        phases: mission
            .phases
            .iter()
            .map(|p| StubPhase {
                id: p.id.clone(),
                name: p.name.clone(),
                description: p.description.clone(),
                start_condition: p.start_condition.clone(),
                end_condition: p.end_condition.clone(),
                tasks: p.tasks.clone(),
                assets: p.assets_used.clone(),
                emcon: p.emcon_considerations.clone(),
            })
            .collect(),
        assets: mission
            .assets
            .iter()
            .map(|a| StubAsset {
                id: a.id.clone(),
                name: a.name.clone(),
                asset_type: a.asset_type,
                source_tool: a.source_tool.clone(),
                role_tags: a.role_tags.clone(),
                owner_element: a.owner_element.clone(),
                notes: a.notes.clone(),
            })
            .collect(),
        assignments: mission.assignments.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo::example_mission;

    #[test]
    fn stub_carries_version_meta_and_phase_assets() {
        let mission = example_mission();
        let value = serde_json::to_value(build_mission_stub(&mission)).expect("serialize");
        assert_eq!(value["ceradonMissionVersion"], "1.0");
        assert_eq!(value["missionMeta"]["name"], "Fjord Recon Lane");
        assert_eq!(value["missionMeta"]["unit"], "Bravo Troop / Team Vantage");
        assert_eq!(value["missionMeta"]["time"], "H+0 to H+48");
        assert_eq!(value["phases"][1]["assets"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["phases"][0]["emcon"], "Low-power checks only");
        assert_eq!(value["assets"][1]["type"], "UXS");
        assert!(value["assets"][0].get("critical").is_none());
    }
}
