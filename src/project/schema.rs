//! The canonical, all-fields-present empty project.

use super::types::{
    Environment, MissionProject, ProjectMeta, CURRENT_SCHEMA_VERSION, PROJECT_ORIGIN_TOOL,
    SCHEMA_NAME,
};
use crate::models::Mission;

/// Build a complete, zero-valued [`MissionProject`].
///
/// Every list is present and empty; the mission id is freshly generated and
/// the dates are today's. Used as the storage default and as the fallback
/// for every field normalization cannot recover.
pub fn create_empty_mission_project() -> MissionProject {
    let mut project = MissionProject {
        schema: SCHEMA_NAME.to_string(),
        schema_version: CURRENT_SCHEMA_VERSION.to_string(),
        origin_tool: PROJECT_ORIGIN_TOOL.to_string(),
        meta: ProjectMeta::default(),
        mission: Mission::empty(),
        nodes: Vec::new(),
        platforms: Vec::new(),
        mesh_links: Vec::new(),
        kits: Vec::new(),
        environment: Environment::default(),
        constraints: Vec::new(),
    };
    project.sync_derived();
    project
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_project_exposes_every_top_level_key() {
        let value = create_empty_mission_project().to_value();
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
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        for list in ["nodes", "platforms", "mesh_links", "kits", "constraints"] {
            assert_eq!(value[list], serde_json::json!([]), "{list} must be []");
        }
        assert_eq!(value["meta"]["savedMissions"], serde_json::json!([]));
    }

    #[test]
    fn empty_project_key_set_is_deterministic() {
        let a = create_empty_mission_project().to_value();
        let b = create_empty_mission_project().to_value();
        let keys = |v: &serde_json::Value| {
            v.as_object()
                .map(|o| o.keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default()
        };
        assert_eq!(keys(&a), keys(&b));
        assert_eq!(keys(&a["mission"]), keys(&b["mission"]));
        assert_ne!(a["mission"]["id"], b["mission"]["id"]);
    }

    #[test]
    fn empty_project_uses_current_schema() {
        let p = create_empty_mission_project();
        assert_eq!(p.schema, SCHEMA_NAME);
        assert_eq!(p.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(p.origin_tool, "mission");
        assert!(p.mission.phases.is_empty());
    }
}
