//! Demo content: the "Fjord Recon Lane" example mission and its asset set.

use super::asset::{Asset, AssetType};
use super::mission::{Mission, MissionConstraints, MissionMeta, Phase};
use crate::project::ids::new_record_id;

fn demo_asset(
    name: &str,
    asset_type: AssetType,
    source_tool: &str,
    role_tags: &[&str],
    owner: &str,
    notes: &str,
) -> Asset {
    Asset {
        id: new_record_id("asset"),
        name: name.to_string(),
        asset_type,
        source_tool: source_tool.to_string(),
        role_tags: role_tags.iter().map(|t| t.to_string()).collect(),
        owner_element: owner.to_string(),
        notes: notes.to_string(),
        ..Asset::default()
    }
}

/// Five representative assets, one per planning tool.
pub fn demo_assets() -> Vec<Asset> {
    vec![
        demo_asset(
            "Vantage CSI Node Alpha",
            AssetType::Node,
            "NodeArchitect",
            &["CSI", "recon", "through-wall"],
            "Team Vantage",
            "Primary CSI capture node",
        ),
        demo_asset(
            "FPV Relay Quad",
            AssetType::Uxs,
            "UxSArchitect",
            &["relay", "overwatch"],
            "Air det",
            "Loitering mesh overwatch",
        ),
        demo_asset(
            "Ground Mesh Relay",
            AssetType::MeshElement,
            "MeshArchitect",
            &["backbone", "mesh"],
            "Signal",
            "Drop-in relay with mast",
        ),
        demo_asset(
            "Resupply Mule UGV",
            AssetType::Uxs,
            "UxSArchitect",
            &["logistics", "hauler"],
            "Support",
            "Carries sustainment kit",
        ),
        demo_asset(
            "Light RF Kit",
            AssetType::Kit,
            "KitSmith",
            &["RF", "signals"],
            "Team Vantage",
            "Batteries, filters, SDRs",
        ),
    ]
}

fn demo_phase(
    id: &str,
    name: &str,
    description: &str,
    conditions: (&str, &str),
    tasks: &[&str],
    emcon: &str,
) -> Phase {
    Phase {
        start_condition: conditions.0.to_string(),
        end_condition: conditions.1.to_string(),
        tasks: tasks.iter().map(|t| t.to_string()).collect(),
        emcon_considerations: emcon.to_string(),
        ..Phase::new(id, name, description)
    }
}

/// A fully populated example mission.
///
/// Phase asset usage is seeded: the infil phase uses the first three assets,
/// every other phase the even-indexed ones.
pub fn example_mission() -> Mission {
    let mut mission = Mission::empty();
    mission.mission_meta = MissionMeta {
        name: "Fjord Recon Lane".to_string(),
        ao: "Nordic fjord complex, austere cold-weather".to_string(),
        unit_or_detachment: "Bravo Troop / Team Vantage".to_string(),
        created_by: "Planner X".to_string(),
        duration_hours: 48.0,
        altitude_band: "Low".to_string(),
        temperature_band: "Cold".to_string(),
        ..MissionMeta::default()
    };
    mission.phases = vec![
        demo_phase(
            "ORP",
            "ORP",
            "Stage at ORP, final pre-comms, kit check",
            ("H-2 established ORP", "Teams ready to step"),
            &["Final CSI node config", "Mesh relay power check", "Brief EMCON plan"],
            "Low-power checks only",
        ),
        demo_phase(
            "INFIL",
            "Infil",
            "Split infil along valley floor",
            ("Step off H-0", "Teams in position"),
            &["FPV relay overwatch", "Mule UGV hauls resupply kit"],
            "RF minimal, passive listening",
        ),
        demo_phase(
            "ON_STATION",
            "On-Station",
            "ISR and mesh soak",
            ("Teams set ORP overwatch", "Collection complete"),
            &[
                "Deploy Vantage CSI nodes",
                "Record CSI for pose tracking trial",
                "Logistics check every 2 hrs",
            ],
            "Directional links preferred",
        ),
        demo_phase(
            "EXFIL",
            "Exfil",
            "Recover nodes and depart",
            ("Call sign Vantage ready", "Back through ORP"),
            &["Recover CSI nodes", "Secure captures for offline pose inference"],
            "Burst mesh updates only",
        ),
    ];
    mission.assets = demo_assets();
    mission.constraints = MissionConstraints {
        time_window: "H+0 to H+48".to_string(),
        environment: "Cold-weather fjord, mixed rocky ridgeline".to_string(),
        rf_constraints: "Deep valley, multipath heavy; prefer elevated relays".to_string(),
        logistics_constraints: "UGV battery swap every 6 hrs".to_string(),
        success_criteria: vec![
            "No fratricide".to_string(),
            "ISR coverage of target bay".to_string(),
            "Recover all kit with CSI logs intact".to_string(),
        ],
        risk_notes: "EW sniffers possible; maintain EMCON discipline".to_string(),
        ..MissionConstraints::default()
    };

    let asset_ids: Vec<String> = mission.assets.iter().map(|a| a.id.clone()).collect();
    for (idx, phase) in mission.phases.iter_mut().enumerate() {
        phase.assets_used = asset_ids
            .iter()
            .enumerate()
            .filter(|(i, _)| if idx == 1 { *i < 3 } else { i % 2 == 0 })
            .map(|(_, id)| id.clone())
            .collect();
    }
    mission
}
