//! Feasibility figures derived from the active mission.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Mission;

/// Source tool whose assets count as sustainment.
const SUSTAINMENT_TOOL: &str = "KitSmith";

/// Endurance figures for one platform or UxS.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEndurance {
    pub asset_id: String,
    pub name: String,
    /// Single-sortie endurance in hours, if known.
    pub endurance_hours: Option<f64>,
    /// `ceil(duration / endurance)`, if endurance is known.
    pub implied_sorties: Option<u32>,
    /// Duration exceeds twice the single-sortie endurance.
    pub sustainment_needed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feasibility {
    pub duration_hours: f64,
    pub critical_platforms: usize,
    /// At least one asset came from the sustainment planner.
    pub sustainment_linked: bool,
    pub comms_risk: bool,
    pub platforms: Vec<PlatformEndurance>,
}

pub fn evaluate_feasibility(mission: &Mission) -> Feasibility {
    let duration = mission.mission_meta.duration_hours.max(0.0);
    let platforms: Vec<PlatformEndurance> = mission
        .assets
        .iter()
        .filter(|a| a.asset_type.is_platform())
        .map(|asset| {
            let endurance = asset.endurance();
            PlatformEndurance {
                asset_id: asset.id.clone(),
                name: asset.name.clone(),
                endurance_hours: endurance,
                implied_sorties: endurance.map(|e| (duration / e).ceil() as u32),
                sustainment_needed: endurance.is_some_and(|e| duration > e * 2.0),
            }
        })
        .collect();

    Feasibility {
        duration_hours: duration,
        critical_platforms: mission
            .assets
            .iter()
            .filter(|a| a.asset_type.is_platform() && a.critical)
            .count(),
        sustainment_linked: mission.assets.iter().any(|a| a.source_tool == SUSTAINMENT_TOOL),
        comms_risk: evaluate_comms_risk(mission),
        platforms,
    }
}

/// Whether the imported mesh puts comms-dependent work at risk.
///
/// No mesh imported means no risk can be assessed. Otherwise risk exists
/// when some assignment requires comms (or is critical) and either every
/// link is marginal/unlikely or some element hangs off a single link. A
/// mesh with no links counts as all-marginal.
pub fn evaluate_comms_risk(mission: &Mission) -> bool {
    let Some(mesh) = &mission.imports.mesh else {
        return false;
    };
    let needs_comms = mission
        .assignments
        .iter()
        .any(|a| a.requires_comms || a.critical);
    if !needs_comms {
        return false;
    }

    let all_marginal = mesh.links.iter().all(|l| l.is_marginal());
    let mut degree: HashMap<&str, usize> = HashMap::new();
    for link in &mesh.links {
        *degree.entry(link.from.as_str()).or_default() += 1;
        *degree.entry(link.to.as_str()).or_default() += 1;
    }
    let single_points = degree.values().filter(|d| **d == 1).count();

    all_marginal || single_points > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, AssetType, Assignment, MeshImport, MeshLink};

    fn platform(name: &str, hours: Option<f64>, minutes: Option<f64>) -> Asset {
        Asset {
            id: name.to_lowercase(),
            name: name.into(),
            asset_type: AssetType::Uxs,
            endurance_hours: hours,
            endurance_minutes: minutes,
            ..Asset::default()
        }
    }

    fn link(from: &str, to: &str, quality: &str) -> MeshLink {
        MeshLink {
            from: from.into(),
            to: to.into(),
            quality: quality.into(),
            ..MeshLink::default()
        }
    }

    fn mission_with_mesh(links: Vec<MeshLink>, requires_comms: bool) -> Mission {
        let mut mission = Mission::empty();
        mission.imports.mesh = Some(MeshImport {
            links,
            ..MeshImport::default()
        });
        mission.assignments.push(Assignment {
            requires_comms,
            ..Assignment::default()
        });
        mission
    }

    #[test]
    fn sorties_and_sustainment_warning() {
        let mut mission = Mission::empty();
        mission.mission_meta.duration_hours = 48.0;
        mission.assets = vec![
            platform("Quad", None, Some(30.0)),
            platform("Mule", Some(30.0), None),
            platform("Unknown", None, None),
            Asset {
                asset_type: AssetType::Node,
                ..Asset::default()
            },
        ];

        let f = evaluate_feasibility(&mission);
        assert_eq!(f.platforms.len(), 3);
        assert_eq!(f.platforms[0].endurance_hours, Some(0.5));
        assert_eq!(f.platforms[0].implied_sorties, Some(96));
        assert!(f.platforms[0].sustainment_needed);
        assert_eq!(f.platforms[1].implied_sorties, Some(2));
        assert!(!f.platforms[1].sustainment_needed);
        assert_eq!(f.platforms[2].implied_sorties, None);
    }

    #[test]
    fn critical_platforms_and_sustainment_link() {
        let mut mission = Mission::empty();
        let mut critical = platform("Quad", Some(1.0), None);
        critical.critical = true;
        mission.assets = vec![
            critical,
            Asset {
                asset_type: AssetType::Kit,
                source_tool: "KitSmith".into(),
                critical: true,
                ..Asset::default()
            },
        ];
        let f = evaluate_feasibility(&mission);
        assert_eq!(f.critical_platforms, 1);
        assert!(f.sustainment_linked);
    }

    #[test]
    fn comms_risk_requires_an_imported_mesh() {
        let mut mission = Mission::empty();
        mission.assignments.push(Assignment {
            requires_comms: true,
            ..Assignment::default()
        });
        assert!(!evaluate_comms_risk(&mission));
    }

    #[test]
    fn comms_risk_on_single_point_of_failure() {
        let mesh = vec![link("a", "b", "good"), link("b", "c", "good")];
        assert!(evaluate_comms_risk(&mission_with_mesh(mesh, true)));
    }

    #[test]
    fn comms_risk_when_every_link_is_marginal() {
        let ring = vec![
            link("a", "b", "Marginal"),
            link("b", "c", "unlikely"),
            link("c", "a", "marginal"),
        ];
        assert!(evaluate_comms_risk(&mission_with_mesh(ring, true)));
    }

    #[test]
    fn healthy_ring_is_acceptable() {
        let ring = vec![
            link("a", "b", "good"),
            link("b", "c", "marginal"),
            link("c", "a", "good"),
        ];
        assert!(!evaluate_comms_risk(&mission_with_mesh(ring, true)));
    }

    #[test]
    fn no_comms_dependency_means_no_risk() {
        let mesh = vec![link("a", "b", "unlikely")];
        assert!(!evaluate_comms_risk(&mission_with_mesh(mesh, false)));
    }
}
