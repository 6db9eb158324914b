//! Export command handlers.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::AppError;
use crate::export::{default_file_name, render_export, ExportFormat};
use crate::project::MissionProject;

use super::read_project;

/// Render the active project as `format`.
pub fn export_inner(
    format: ExportFormat,
    project_lock: &RwLock<MissionProject>,
) -> Result<String, AppError> {
    let project = read_project(project_lock)?;
    render_export(&project, format)
}

/// Render the active project as `format` and write it to disk.
///
/// `out` may be a file path or an existing directory; in the latter case the
/// file is named after the mission. Returns the path written.
pub fn export_to_file_inner(
    format: ExportFormat,
    out: &Path,
    project_lock: &RwLock<MissionProject>,
) -> Result<PathBuf, AppError> {
    let (payload, target) = {
        let project = read_project(project_lock)?;
        let target = if out.is_dir() {
            out.join(default_file_name(&project, format))
        } else {
            out.to_path_buf()
        };
        (render_export(&project, format)?, target)
    };

    std::fs::write(&target, payload)
        .map_err(|e| AppError::Export(format!("cannot write {}: {e}", target.display())))?;
    tracing::info!(path = %target.display(), %format, "export written");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::mission::load_example_mission_inner;
    use crate::state::AppState;

    #[test]
    fn mission_stub_carries_version_and_phases() {
        let state = AppState::default();
        load_example_mission_inner(&state.project).expect("example");
        let json = export_inner(ExportFormat::MissionStub, &state.project).expect("export");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["ceradonMissionVersion"], "1.0");
        assert_eq!(value["phases"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn export_into_directory_uses_mission_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::default();
        load_example_mission_inner(&state.project).expect("example");

        let written = export_to_file_inner(ExportFormat::UnitList, dir.path(), &state.project)
            .expect("export");
        assert_eq!(
            written.file_name().and_then(|n| n.to_str()),
            Some("Fjord_Recon_Lane-units.json")
        );
        let text = std::fs::read_to_string(&written).expect("read back");
        assert!(text.contains("\"units\""));
    }

    #[test]
    fn empty_geojson_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("overlay.geojson");
        let state = AppState::default();
        assert!(matches!(
            export_to_file_inner(ExportFormat::Geojson, &target, &state.project),
            Err(AppError::Export(_))
        ));
        assert!(!target.exists());
    }
}
