//! Import command handlers: pasted JSON and tool export files.
//!
//! Every handler parses completely before taking the write lock, so a
//! payload that fails to parse leaves the project untouched.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::Serialize;
use sha2::Digest as _;

use crate::error::AppError;
use crate::import::{apply_import, extract_entities, parse_import, parse_json, ImportKind, ImportReport};
use crate::project::{merge_project_entities, MergeSummary, MissionProject};

use super::write_project;

/// Result of a file import: the merge report plus the file's SHA-256.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileImportReport {
    pub path: String,
    pub checksum: String,
    #[serde(flatten)]
    pub report: ImportReport,
}

// ── import_text ───────────────────────────────────────────────────────────────

/// Import a payload pasted from `kind`'s tool.
pub fn import_text_inner(
    kind: ImportKind,
    text: &str,
    project_lock: &RwLock<MissionProject>,
) -> Result<ImportReport, AppError> {
    let data = parse_json(text)?;
    let batch = parse_import(kind, &data);
    let mut project = write_project(project_lock)?;
    Ok(apply_import(&mut project, batch))
}

// ── import_file ───────────────────────────────────────────────────────────────

/// Import a tool export file.
///
/// Reading, hashing and parsing run on the blocking thread pool; the project
/// lock is only taken once the payload is known to be valid.
pub async fn import_file_inner(
    kind: ImportKind,
    path: PathBuf,
    project_lock: &RwLock<MissionProject>,
) -> Result<FileImportReport, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound(format!("{} does not exist", path.display())));
    }

    let path_clone = path.clone();
    let blocking_result = tokio::task::spawn_blocking(move || {
        let bytes = std::fs::read(&path_clone)?;
        let digest = sha2::Sha256::digest(&bytes);
        let text = String::from_utf8(bytes)
            .map_err(|e| AppError::InvalidJson(format!("file is not UTF-8 text: {e}")))?;
        let data = parse_json(&text)?;
        Ok::<_, AppError>((parse_import(kind, &data), format!("{digest:x}")))
    })
    .await
    .map_err(|e| AppError::Io(format!("import task panicked: {e}")))?;

    let (batch, checksum) = blocking_result?;

    let report = {
        let mut project = write_project(project_lock)?;
        apply_import(&mut project, batch)
    };
    tracing::info!(path = %path.display(), %kind, checksum = %checksum, "imported file");

    Ok(FileImportReport {
        path: path.display().to_string(),
        checksum,
        report,
    })
}

// ── import_entities ───────────────────────────────────────────────────────────

/// Merge the flat entity lists of a project-shaped payload without touching
/// the mission's assets or import records.
pub fn import_entities_text_inner(
    text: &str,
    project_lock: &RwLock<MissionProject>,
) -> Result<MergeSummary, AppError> {
    let data = parse_json(text)?;
    let incoming = extract_entities(&data);
    let mut project = write_project(project_lock)?;
    Ok(merge_project_entities(&mut project, incoming))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    const NODE_PAYLOAD: &str = r#"{
        "nodes": [
            { "id": "n1", "name": "Relay North", "sourceId": "na-1", "lat": 60.1, "lon": 5.2 },
            { "id": "n2", "label": "Relay South", "sourceId": "na-2" }
        ]
    }"#;

    #[test]
    fn pasted_nodes_become_entities_and_assets() {
        let state = AppState::default();
        let report = import_text_inner(ImportKind::Node, NODE_PAYLOAD, &state.project).expect("import");
        assert_eq!(report.assets_added, 2);
        assert_eq!(report.entities.added, 2);

        let project = state.project.read().expect("read lock");
        assert_eq!(project.nodes.len(), 2);
        assert_eq!(project.nodes[1].name, "Relay South");
        assert_eq!(project.mission.imports.nodes.len(), 2);
        assert!(project.mission.assets.iter().all(|a| a.source_tool == "NodeArchitect"));
    }

    #[test]
    fn reimport_updates_entities_and_skips_known_assets() {
        let state = AppState::default();
        import_text_inner(ImportKind::Node, NODE_PAYLOAD, &state.project).expect("import");
        let report = import_text_inner(ImportKind::Node, NODE_PAYLOAD, &state.project).expect("reimport");
        assert_eq!(report.assets_added, 0);
        assert_eq!(report.assets_skipped, 2);
        assert_eq!(report.entities.updated, 2);
        assert_eq!(state.project.read().expect("read lock").nodes.len(), 2);
    }

    #[test]
    fn invalid_json_leaves_state_untouched() {
        let state = AppState::default();
        let before = state.project.read().expect("read lock").clone();
        assert!(matches!(
            import_text_inner(ImportKind::Kit, "{ kits: [", &state.project),
            Err(AppError::InvalidJson(_))
        ));
        assert!(matches!(
            import_text_inner(ImportKind::Kit, "   ", &state.project),
            Err(AppError::InvalidJson(_))
        ));
        assert_eq!(*state.project.read().expect("read lock"), before);
    }

    #[test]
    fn entity_merge_keeps_mission_untouched() {
        let state = AppState::default();
        let summary = import_entities_text_inner(
            r#"{ "platforms": [{ "name": "Hawk" }], "mesh_links": [{ "from": "a", "to": "b" }] }"#,
            &state.project,
        )
        .expect("merge");
        assert_eq!(summary.added, 2);
        let project = state.project.read().expect("read lock");
        assert!(project.mission.assets.is_empty());
        assert!(project.mission.imports.platforms.is_empty());
        assert_eq!(project.mesh_links[0].origin_tool, "mesh");
    }

    #[test]
    fn merging_the_same_payload_twice_adds_nothing() {
        let state = AppState::default();
        let payload = r#"{ "nodes": [{ "name": "Relay" }], "mesh": { "links": [{ "from": "a", "to": "b", "quality": "good" }] } }"#;
        let first = import_entities_text_inner(payload, &state.project).expect("merge");
        let again = import_entities_text_inner(payload, &state.project).expect("re-merge");

        assert_eq!(first, MergeSummary { added: 2, updated: 0 });
        assert_eq!(again, MergeSummary { added: 0, updated: 2 });
        let project = state.project.read().expect("read lock");
        assert_eq!(project.nodes.len(), 1);
        assert_eq!(project.mesh_links.len(), 1);
    }

    #[tokio::test]
    async fn file_import_reports_checksum() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kits.json");
        std::fs::write(&path, r#"[{ "name": "Med kit" }, { "name": "Spare batteries" }]"#)
            .expect("write");

        let state = AppState::default();
        let report = import_file_inner(ImportKind::Kit, path.clone(), &state.project)
            .await
            .expect("import");
        assert_eq!(report.checksum.len(), 64);
        assert_eq!(report.report.assets_added, 2);
        assert_eq!(state.project.read().expect("read lock").kits.len(), 2);
    }

    #[tokio::test]
    async fn file_import_of_broken_file_changes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mesh.json");
        std::fs::write(&path, "{ \"links\": ").expect("write");

        let state = AppState::default();
        let before = state.project.read().expect("read lock").clone();
        let result = import_file_inner(ImportKind::Mesh, path, &state.project).await;
        assert!(matches!(result, Err(AppError::InvalidJson(_))));
        assert_eq!(*state.project.read().expect("read lock"), before);
    }

    #[tokio::test]
    async fn file_import_of_missing_file_is_not_found() {
        let state = AppState::default();
        let result =
            import_file_inner(ImportKind::Node, PathBuf::from("/nonexistent/nodes.json"), &state.project).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
