//! GeoJSON overlay of the project's located entities.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{Entity, EntityCategory, MeshLink};
use crate::project::MissionProject;

/// GeoJSON geometry. Coordinates are `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn feature(geometry: Geometry, properties: Map<String, Value>) -> Feature {
    Feature {
        kind: "Feature",
        geometry,
        properties,
    }
}

fn point_properties(entity: &Entity, category: EntityCategory) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("id".into(), Value::from(entity.id.as_str()));
    props.insert("name".into(), Value::from(entity.name.as_str()));
    props.insert("category".into(), Value::from(category.list_key()));
    props.insert("origin_tool".into(), Value::from(entity.origin_tool.as_str()));
    if let Some(role) = &entity.role {
        props.insert("role".into(), Value::from(role.as_str()));
    }
    if let Some(band) = &entity.rf_band {
        props.insert("rfBand".into(), Value::from(band.as_str()));
    }
    props
}

fn link_properties(link: &MeshLink) -> Map<String, Value> {
    let mut props = Map::new();
    for (key, value) in [
        ("id", &link.id),
        ("from", &link.from),
        ("to", &link.to),
        ("quality", &link.quality),
        ("band", &link.band),
        ("origin_tool", &link.origin_tool),
    ] {
        props.insert(key.into(), Value::from(value.as_str()));
    }
    props
}

/// Build the overlay: one `Point` per located node, platform or kit, and one
/// `LineString` per mesh link whose endpoints are both located. Anything
/// without coordinates is left out.
pub fn build_feature_collection(project: &MissionProject) -> FeatureCollection {
    let located = [
        (EntityCategory::Node, &project.nodes),
        (EntityCategory::Platform, &project.platforms),
        (EntityCategory::Kit, &project.kits),
    ];

    let mut features = Vec::new();
    let mut positions: HashMap<&str, [f64; 2]> = HashMap::new();
    for (category, list) in located {
        for entity in list.iter() {
            let Some((lat, lon)) = entity.position() else {
                continue;
            };
            if !entity.id.is_empty() {
                positions.entry(entity.id.as_str()).or_insert([lon, lat]);
            }
            features.push(feature(
                Geometry::Point {
                    coordinates: [lon, lat],
                },
                point_properties(entity, category),
            ));
        }
    }

    for link in &project.mesh_links {
        let (Some(from), Some(to)) = (
            positions.get(link.from.as_str()),
            positions.get(link.to.as_str()),
        ) else {
            continue;
        };
        features.push(feature(
            Geometry::LineString {
                coordinates: vec![*from, *to],
            },
            link_properties(link),
        ));
    }

    FeatureCollection {
        kind: "FeatureCollection",
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::create_empty_mission_project;

    fn located(id: &str, lat: f64, lon: f64) -> Entity {
        Entity {
            id: id.into(),
            name: id.to_uppercase(),
            origin_tool: "node".into(),
            lat: Some(lat),
            lon: Some(lon),
            ..Entity::default()
        }
    }

    fn link(from: &str, to: &str) -> MeshLink {
        MeshLink {
            id: format!("{from}-{to}"),
            from: from.into(),
            to: to.into(),
            ..MeshLink::default()
        }
    }

    #[test]
    fn points_use_lon_lat_order() {
        let mut project = create_empty_mission_project();
        project.nodes.push(located("n1", 60.0, 5.0));
        let fc = build_feature_collection(&project);
        let value = serde_json::to_value(&fc).expect("serialize");
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
        assert_eq!(value["features"][0]["geometry"]["coordinates"], serde_json::json!([5.0, 60.0]));
        assert_eq!(value["features"][0]["properties"]["category"], "nodes");
    }

    #[test]
    fn unlocated_entities_and_their_links_are_omitted() {
        let mut project = create_empty_mission_project();
        project.nodes.push(located("n1", 60.0, 5.0));
        project.platforms.push(located("p1", 61.0, 6.0));
        project.kits.push(Entity {
            id: "k1".into(),
            ..Entity::default()
        });
        project.mesh_links = vec![link("n1", "p1"), link("n1", "k1"), link("n1", "ghost")];

        let fc = build_feature_collection(&project);
        assert_eq!(fc.features.len(), 3);
        assert_eq!(
            fc.features[2].geometry,
            Geometry::LineString {
                coordinates: vec![[5.0, 60.0], [6.0, 61.0]]
            }
        );
    }

    #[test]
    fn empty_project_has_no_features() {
        assert!(build_feature_collection(&create_empty_mission_project()).is_empty());
    }
}
