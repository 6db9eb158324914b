use std::path::PathBuf;

use mission_architect_lib::project::{
    create_empty_mission_project, load_mission_project, merge_project_entities,
    migrate_mission_project, normalize_mission_project, save_mission_project, FileSlot,
    IncomingEntities, MissionProject, StorageSlot, CURRENT_SCHEMA_VERSION,
};
use mission_architect_lib::models::Entity;
use serde_json::{json, Value};

fn fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let text =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read fixture {path:?}: {e}"));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("parse fixture {path:?}: {e}"))
}

fn renormalize(project: &MissionProject) -> MissionProject {
    normalize_mission_project(project.to_value())
}

const FIXTURES: [&str; 3] = [
    "legacy_flat_mission.json",
    "envelope_v1.json",
    "legacy_mission_list.json",
];

// ── migration of historical shapes ────────────────────────────────────────────

#[test]
fn flat_legacy_mission_is_lifted_into_the_envelope() {
    let project = normalize_mission_project(fixture("legacy_flat_mission.json"));

    assert_eq!(project.schema, "MissionProject");
    assert_eq!(project.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(project.mission.id, "mission-legacy1");

    let mm = &project.mission.mission_meta;
    assert_eq!(mm.name, "Ridge Overwatch");
    assert_eq!(mm.classification_banner, "UNCLASSIFIED // EXERCISE");
    assert_eq!(mm.duration_hours, 36.0);
    assert_eq!(mm.altitude_band, "Medium");
    assert_eq!(mm.temperature_band, "Temperate");

    let c = &project.mission.constraints;
    assert_eq!(c.time_window, "H+0 to H+36");
    assert_eq!(c.success_criteria.len(), 2);

    assert_eq!(project.meta.name, "Ridge Overwatch");
    assert_eq!(project.environment.ao, "North ridge");
}

#[test]
fn flat_legacy_imports_are_copied_to_the_flat_lists() {
    let project = normalize_mission_project(fixture("legacy_flat_mission.json"));
    assert_eq!(project.nodes.len(), 1);
    let node = &project.nodes[0];
    assert_eq!(node.name, "Ridge Node");
    assert_eq!(node.origin_tool, "NodeArchitect");
    assert!(node.id.starts_with("node-"), "generated id {}", node.id);
    assert!(project.platforms.is_empty());
    assert!(project.mission.imports.mesh.is_none());
}

#[test]
fn v1_envelope_prefers_nested_meta_and_backfills_imports() {
    let project = normalize_mission_project(fixture("envelope_v1.json"));

    let mm = &project.mission.mission_meta;
    assert_eq!(mm.name, "Valley Lane (nested)");
    assert_eq!(mm.ao, "Valley floor");
    assert_eq!(mm.duration_hours, 24.0);
    assert_eq!(mm.altitude_band, "High");

    assert_eq!(project.mission.constraints.rf_constraints, "Multipath heavy");
    assert_eq!(project.mission.constraints.max_sorties, Some(6));

    assert_eq!(project.mission.imports.nodes.len(), 1);
    let mesh = project.mission.imports.mesh.as_ref().expect("mesh backfilled");
    assert_eq!(mesh.links.len(), 1);

    assert_eq!(project.environment.weather, "Low cloud");
    assert_eq!(project.nodes[0].fields.get("mount"), Some(&json!("tripod")));
    assert!(project.mesh_links[0].id.starts_with("link-"));
    assert_eq!(project.mesh_links[0].origin_tool, "mission");
}

#[test]
fn v1_saved_missions_are_lifted_too() {
    let project = normalize_mission_project(fixture("envelope_v1.json"));
    let saved = &project.meta.saved_missions;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].mission_meta.name, "Old Valley Lane");
    assert_eq!(saved[0].constraints.rf_constraints, "Jamming expected");
}

#[test]
fn mission_list_keeps_last_mission_active_and_archives_all() {
    let project = normalize_mission_project(fixture("legacy_mission_list.json"));
    assert_eq!(project.mission.id, "mission-b");
    assert_eq!(project.mission.mission_meta.name, "Lane B");
    assert_eq!(project.meta.duration_hours, 12.0);

    let names: Vec<&str> = project
        .meta
        .saved_missions
        .iter()
        .map(|m| m.mission_meta.name.as_str())
        .collect();
    assert_eq!(names, ["Lane A", "Lane B"]);
}

#[test]
fn migration_is_idempotent_on_every_fixture() {
    for name in FIXTURES {
        let once = migrate_mission_project(fixture(name));
        let twice = migrate_mission_project(once.clone());
        assert_eq!(once, twice, "{name}");
    }
}

// ── normalization ─────────────────────────────────────────────────────────────

#[test]
fn normalization_is_idempotent_on_every_fixture() {
    for name in FIXTURES {
        let once = normalize_mission_project(fixture(name));
        assert_eq!(renormalize(&once), once, "{name}");
    }
}

#[test]
fn every_top_level_key_is_present_after_normalization() {
    for input in [Value::Null, json!([]), json!("x"), json!({ "nodes": "nope" })] {
        let value = normalize_mission_project(input).to_value();
        for key in [
            "schema",
            "schemaVersion",
            "origin_tool",
            "meta",
            "mission",
            "nodes",
            "platforms",
            "mesh_links",
            "kits",
            "environment",
            "constraints",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value["meta"]["savedMissions"].is_array());
    }
}

// ── load / save ───────────────────────────────────────────────────────────────

#[test]
fn save_then_load_round_trips_through_a_file_slot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let slot = FileSlot::new(dir.path().join("nested/ceradonMissionProject.json"));

    let saved = save_mission_project(&slot, fixture("envelope_v1.json")).expect("save");
    let loaded = load_mission_project(&slot);
    assert_eq!(loaded, saved);
    assert!(!slot.tmp_path().exists(), "temp file left behind");
}

#[test]
fn legacy_blob_in_the_slot_loads_migrated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let slot = FileSlot::new(dir.path().join("slot.json"));
    slot.write(&fixture("legacy_flat_mission.json").to_string())
        .expect("seed slot");

    let project = load_mission_project(&slot);
    assert_eq!(project.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(project.mission.mission_meta.name, "Ridge Overwatch");
}

#[test]
fn corrupt_slot_loads_as_the_empty_project() {
    let dir = tempfile::tempdir().expect("tempdir");
    let slot = FileSlot::new(dir.path().join("slot.json"));
    slot.write("{\"schema\": ").expect("seed slot");

    let project = load_mission_project(&slot);
    let empty = create_empty_mission_project();
    assert_eq!(project.mission.phases, empty.mission.phases);
    assert!(project.nodes.is_empty());
    assert_eq!(project.schema_version, CURRENT_SCHEMA_VERSION);
}

// ── merge ─────────────────────────────────────────────────────────────────────

#[test]
fn merge_updates_by_id_and_never_removes() {
    let mut project = normalize_mission_project(fixture("envelope_v1.json"));
    let incoming = IncomingEntities {
        nodes: vec![
            Entity {
                id: "n1".to_string(),
                rf_band: Some("5.8GHz".to_string()),
                ..Entity::default()
            },
            Entity {
                name: "Ridge Relay".to_string(),
                ..Entity::default()
            },
        ],
        ..IncomingEntities::default()
    };

    let summary = merge_project_entities(&mut project, incoming);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.added, 1);

    assert_eq!(project.nodes.len(), 2);
    let n1 = &project.nodes[0];
    assert_eq!(n1.name, "Valley Node", "unspecified fields survive");
    assert_eq!(n1.rf_band.as_deref(), Some("5.8GHz"));
    assert_eq!(project.nodes[1].origin_tool, "node");
    assert!(!project.nodes[1].id.is_empty());
    assert_eq!(project.mesh_links.len(), 1, "other lists untouched");
}
