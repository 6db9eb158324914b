//! Flattened "unit list" for an external situational-awareness viewer.

use serde::Serialize;

use crate::models::{Entity, EntityCategory};
use crate::project::MissionProject;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub display_name: String,
    pub role: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub rf_band: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub provenance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitLink {
    pub id: String,
    pub from: String,
    pub to: String,
    pub quality: String,
    pub band: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitList {
    pub units: Vec<Unit>,
    pub links: Vec<UnitLink>,
}

fn unit_kind(category: EntityCategory) -> &'static str {
    match category {
        EntityCategory::Node => "node",
        EntityCategory::Platform => "platform",
        EntityCategory::Kit => "kit",
        EntityCategory::MeshLink => "link",
    }
}

fn unit(entity: &Entity, category: EntityCategory) -> Unit {
    let display_name = if entity.name.is_empty() {
        entity.id.clone()
    } else {
        entity.name.clone()
    };
    Unit {
        id: entity.id.clone(),
        display_name,
        role: entity.role.clone(),
        lat: entity.lat,
        lon: entity.lon,
        rf_band: entity.rf_band.clone(),
        kind: unit_kind(category),
        provenance: entity.origin_tool.clone(),
    }
}

/// Project the nodes, platforms, kits and mesh links into the unit list.
pub fn build_unit_list(project: &MissionProject) -> UnitList {
    let units = [
        (EntityCategory::Node, &project.nodes),
        (EntityCategory::Platform, &project.platforms),
        (EntityCategory::Kit, &project.kits),
    ]
    .into_iter()
    .flat_map(|(category, list)| list.iter().map(move |e| unit(e, category)))
    .collect();

    let links = project
        .mesh_links
        .iter()
        .map(|l| UnitLink {
            id: l.id.clone(),
            from: l.from.clone(),
            to: l.to.clone(),
            quality: l.quality.clone(),
            band: l.band.clone(),
        })
        .collect();

    UnitList { units, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeshLink;
    use crate::project::create_empty_mission_project;

    #[test]
    fn unit_list_flattens_every_category() {
        let mut project = create_empty_mission_project();
        project.nodes.push(Entity {
            id: "n1".into(),
            origin_tool: "NodeArchitect".into(),
            rf_band: Some("UHF".into()),
            ..Entity::default()
        });
        project.kits.push(Entity {
            id: "k1".into(),
            name: "Light RF Kit".into(),
            origin_tool: "kit".into(),
            ..Entity::default()
        });
        project.mesh_links.push(MeshLink {
            id: "l1".into(),
            from: "n1".into(),
            to: "k1".into(),
            ..MeshLink::default()
        });

        let list = build_unit_list(&project);
        assert_eq!(list.units.len(), 2);
        assert_eq!(list.units[0].display_name, "n1", "falls back to id");
        assert_eq!(list.units[0].provenance, "NodeArchitect");
        assert_eq!(list.units[1].kind, "kit");
        assert_eq!(list.links[0].to, "k1");

        let value = serde_json::to_value(&list).expect("serialize");
        assert_eq!(value["units"][0]["rfBand"], "UHF");
        assert_eq!(value["units"][0]["type"], "node");
    }
}
