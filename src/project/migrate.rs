//! Versioned migration of stored project blobs.
//!
//! Three historical shapes exist in the wild:
//!
//! 1. a bare mission record (`{ name, ao, phases, assets, ... }`) or a list
//!    of them, with no `schemaVersion`;
//! 2. a mission record carrying an `imports` block;
//! 3. the `1.x` envelope (`{ schemaVersion, meta, mission, nodes, ... }`)
//!    whose mission fields may still live at the mission or record level
//!    instead of under `missionMeta`/`constraints`.
//!
//! [`MIGRATIONS`] is an ordered chain. Each step declares which source
//! versions it accepts and which version it produces; steps are applied
//! until none matches. A record already at [`CURRENT_SCHEMA_VERSION`], or at
//! a version no step recognizes, passes through untouched.

use serde_json::{Map, Value};

use super::types::CURRENT_SCHEMA_VERSION;
use crate::models::{MissionConstraints, MissionMeta};

/// Version stamped on records wrapped into the envelope shape.
pub const ENVELOPE_VERSION: &str = "1.0.0";

/// Top-level keys that belong to the envelope, not to a flat mission.
const ENVELOPE_KEYS: [&str; 11] = [
    "schema",
    "schemaVersion",
    "origin_tool",
    "meta",
    "mission",
    "nodes",
    "platforms",
    "kits",
    "mesh",
    "mesh_links",
    "environment",
];

struct MigrationStep {
    name: &'static str,
    applies_to: fn(Option<&str>) -> bool,
    target: &'static str,
    apply: fn(Map<String, Value>) -> Map<String, Value>,
}

const MIGRATIONS: &[MigrationStep] = &[
    MigrationStep {
        name: "wrap unversioned mission record",
        applies_to: is_unversioned,
        target: ENVELOPE_VERSION,
        apply: wrap_flat_mission,
    },
    MigrationStep {
        name: "lift 1.x mission fields",
        applies_to: is_v1,
        target: CURRENT_SCHEMA_VERSION,
        apply: lift_v1,
    },
];

fn is_unversioned(version: Option<&str>) -> bool {
    version.is_none()
}

fn is_v1(version: Option<&str>) -> bool {
    version.is_some_and(|v| v == "1" || v.starts_with("1."))
}

/// The record's `schemaVersion` as text.
///
/// Numbers are stringified (`1` reads as `"1"`); empty strings and
/// non-scalar values count as absent.
pub fn schema_version_of(value: &Value) -> Option<String> {
    value.as_object().and_then(schema_version_of_map)
}

/// Whether `value` would be rewritten by [`migrate_mission_project`].
pub fn is_legacy(value: &Value) -> bool {
    let version = schema_version_of(value);
    MIGRATIONS
        .iter()
        .any(|step| (step.applies_to)(version.as_deref()))
}

/// Bring `raw` up to the current schema shape.
///
/// Objects run through the migration chain; a top-level array is read as the
/// oldest storage layout (a list of missions, the last one active). Any other
/// value is returned as-is for normalization to replace.
pub fn migrate_mission_project(raw: Value) -> Value {
    let mut root = match raw {
        Value::Object(map) => map,
        Value::Array(missions) => legacy_mission_list(missions),
        other => return other,
    };

    for _ in 0..=MIGRATIONS.len() {
        let version = schema_version_of_map(&root);
        let Some(step) = MIGRATIONS
            .iter()
            .find(|step| (step.applies_to)(version.as_deref()))
        else {
            break;
        };
        tracing::info!(
            step = step.name,
            from = version.as_deref().unwrap_or("none"),
            to = step.target,
            "migrating mission project"
        );
        root = (step.apply)(root);
        root.insert(
            "schemaVersion".to_string(),
            Value::String(step.target.to_string()),
        );
    }

    Value::Object(root)
}

fn schema_version_of_map(root: &Map<String, Value>) -> Option<String> {
    match root.get("schemaVersion")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `[mission, ...]` → envelope with the last mission active and every
/// mission archived.
fn legacy_mission_list(missions: Vec<Value>) -> Map<String, Value> {
    let missions: Vec<Value> = missions.into_iter().filter(Value::is_object).collect();
    let active = missions
        .last()
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    let mut meta = Map::new();
    meta.insert("savedMissions".to_string(), Value::Array(missions));

    let mut root = Map::new();
    root.insert("mission".to_string(), active);
    root.insert("meta".to_string(), Value::Object(meta));
    root
}

/// Move a flat mission record under `mission`, leaving envelope keys at the
/// root. Records that already carry a `mission` object are left alone.
fn wrap_flat_mission(root: Map<String, Value>) -> Map<String, Value> {
    if root.get("mission").is_some_and(Value::is_object) {
        return root;
    }
    let mut envelope = Map::new();
    let mut mission = Map::new();
    for (key, value) in root {
        if ENVELOPE_KEYS.contains(&key.as_str()) {
            envelope.insert(key, value);
        } else {
            mission.insert(key, value);
        }
    }
    envelope.insert("mission".to_string(), Value::Object(mission));
    envelope
}

/// Rebuild `missionMeta` and `constraints` from wherever 1.x records kept
/// them, and backfill `mission.imports` from the envelope lists.
fn lift_v1(mut root: Map<String, Value>) -> Map<String, Value> {
    let snapshot = Value::Object(root.clone());
    let empty = Value::Object(Map::new());
    let mission = snapshot
        .get("mission")
        .filter(|m| m.is_object())
        .unwrap_or(&empty);
    let meta = snapshot.get("meta").unwrap_or(&Value::Null);
    let root_constraints = snapshot
        .get("constraints")
        .filter(|c| c.is_object())
        .unwrap_or(&Value::Null);

    let mut lifted = lift_mission(mission, &[&snapshot, meta], &[root_constraints, &snapshot]);
    if !mission.get("imports").is_some_and(Value::is_object) {
        lifted.insert(
            "imports".to_string(),
            Value::Object(backfill_imports(&snapshot)),
        );
    }
    root.insert("mission".to_string(), Value::Object(lifted));

    if let Some(Value::Object(meta)) = root.get_mut("meta") {
        if let Some(Value::Array(saved)) = meta.get_mut("savedMissions") {
            for entry in saved.iter_mut().filter(|m| m.is_object()) {
                *entry = Value::Object(lift_mission(entry, &[], &[]));
            }
        }
    }
    root
}

/// Rebuild one mission's `missionMeta` and `constraints`.
///
/// Each field is looked up, most specific first, in the nested block, then
/// the mission itself, then `meta_fallbacks`/`constraint_fallbacks` in order.
/// Fields found nowhere are left for normalization to default.
fn lift_mission(
    mission: &Value,
    meta_fallbacks: &[&Value],
    constraint_fallbacks: &[&Value],
) -> Map<String, Value> {
    let mut out = mission.as_object().cloned().unwrap_or_default();

    let mut meta_sources: Vec<&Value> = Vec::new();
    meta_sources.extend(mission.get("missionMeta"));
    meta_sources.push(mission);
    meta_sources.extend_from_slice(meta_fallbacks);
    out.insert(
        "missionMeta".to_string(),
        Value::Object(pick_fields(&MissionMeta::FIELDS, &meta_sources)),
    );

    let mut constraint_sources: Vec<&Value> = Vec::new();
    constraint_sources.extend(mission.get("constraints"));
    constraint_sources.push(mission);
    constraint_sources.extend_from_slice(constraint_fallbacks);
    out.insert(
        "constraints".to_string(),
        Value::Object(pick_fields(&MissionConstraints::FIELDS, &constraint_sources)),
    );

    out
}

/// A value worth carrying forward: not `null`, not an empty string and not
/// an object (an object in a scalar slot is a different, newer field).
fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null | Value::Object(_) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn pick_fields(fields: &[&str], sources: &[&Value]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|field| {
            sources
                .iter()
                .filter_map(|source| source.get(*field))
                .find(|value| is_meaningful(value))
                .map(|value| (field.to_string(), value.clone()))
        })
        .collect()
}

/// `mission.imports` rebuilt from the envelope's top-level lists.
fn backfill_imports(root: &Value) -> Map<String, Value> {
    let mut imports = Map::new();
    for key in ["nodes", "platforms", "kits"] {
        if let Some(list) = root.get(key).filter(|v| v.is_array()) {
            imports.insert(key.to_string(), list.clone());
        }
    }
    if let Some(mesh) = root.get("mesh").filter(|v| v.is_object()) {
        imports.insert("mesh".to_string(), mesh.clone());
    } else if let Some(links) = root.get("mesh_links").filter(|v| v.is_array()) {
        let mut mesh = Map::new();
        mesh.insert("links".to_string(), links.clone());
        imports.insert("mesh".to_string(), Value::Object(mesh));
    }
    imports
}
