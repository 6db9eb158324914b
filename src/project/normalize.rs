//! Canonicalization of arbitrary project-shaped JSON.

use serde_json::Value;

use super::ids::assign_missing_ids;
use super::migrate::{migrate_mission_project, schema_version_of};
use super::types::{
    Environment, MissionProject, ProjectMeta, CURRENT_SCHEMA_VERSION, PROJECT_ORIGIN_TOOL,
    SCHEMA_NAME,
};
use crate::coerce::{self, Coerce};
use crate::models::{EntityCategory, Mission, ProjectEntity};

/// Where each flat list may live, most preferred first. The first path that
/// yields at least one object wins.
const NODE_SOURCES: &[&str] = &["/nodes", "/mission/imports/nodes"];
const PLATFORM_SOURCES: &[&str] = &["/platforms", "/mission/imports/platforms"];
const KIT_SOURCES: &[&str] = &["/kits", "/mission/imports/kits"];
const MESH_LINK_SOURCES: &[&str] = &[
    "/mesh_links",
    "/mission/imports/mesh/links",
    "/mission/imports/mesh_links",
];

/// Turn any JSON value into a complete, canonical [`MissionProject`].
///
/// Never fails. `null`, scalars and other non-objects yield the empty
/// project; partial records are completed field by field. Unknown top-level
/// and mission-level keys are dropped, while flat-list entities keep their
/// foreign fields.
pub fn normalize_mission_project(raw: Value) -> MissionProject {
    let root = match migrate_mission_project(raw) {
        Value::Object(map) => Value::Object(map),
        Value::Null => Value::Object(Default::default()),
        other => {
            tracing::warn!(
                kind = json_kind(&other),
                "project payload is not an object; using empty project"
            );
            Value::Object(Default::default())
        }
    };

    let mut mission = Mission::coerce(coerce::field(&root, "mission").unwrap_or(&Value::Null));
    assign_missing_ids(EntityCategory::Node, &mut mission.imports.nodes);
    assign_missing_ids(EntityCategory::Platform, &mut mission.imports.platforms);
    assign_missing_ids(EntityCategory::Kit, &mut mission.imports.kits);
    if let Some(mesh) = mission.imports.mesh.as_mut() {
        assign_missing_ids(EntityCategory::MeshLink, &mut mesh.links);
    }

    let mut project = MissionProject {
        schema: SCHEMA_NAME.to_string(),
        schema_version: schema_version_of(&root)
            .unwrap_or_else(|| CURRENT_SCHEMA_VERSION.to_string()),
        origin_tool: PROJECT_ORIGIN_TOOL.to_string(),
        meta: ProjectMeta::coerce(coerce::field(&root, "meta").unwrap_or(&Value::Null)),
        mission,
        nodes: flat_list(&root, EntityCategory::Node, NODE_SOURCES),
        platforms: flat_list(&root, EntityCategory::Platform, PLATFORM_SOURCES),
        mesh_links: flat_list(&root, EntityCategory::MeshLink, MESH_LINK_SOURCES),
        kits: flat_list(&root, EntityCategory::Kit, KIT_SOURCES),
        environment: Environment::coerce(coerce::field(&root, "environment").unwrap_or(&Value::Null)),
        constraints: Vec::new(),
    };
    project.sync_derived();
    project
}

fn flat_list<T: Coerce + ProjectEntity>(
    root: &Value,
    category: EntityCategory,
    sources: &[&str],
) -> Vec<T> {
    let mut list: Vec<T> = sources
        .iter()
        .filter_map(|path| root.pointer(path).and_then(Value::as_array))
        .map(|items| coerce::objects::<T>(items))
        .find(|list| !list.is_empty())
        .unwrap_or_default();
    assign_missing_ids(category, &mut list);
    list
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
