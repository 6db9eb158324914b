//! Export payloads derived from a project.
//!
//! - [`geojson`]: map overlay of located entities and the links between them
//! - [`unit_list`]: flattened unit list for a situational-awareness viewer
//! - [`mission_stub`]: minimal mission brief for downstream tools

pub mod geojson;
pub mod mission_stub;
pub mod unit_list;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;
use crate::project::MissionProject;

pub use geojson::{build_feature_collection, FeatureCollection, Geometry};
pub use mission_stub::{build_mission_stub, MissionStub};
pub use unit_list::{build_unit_list, UnitList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// The full project blob.
    Project,
    Geojson,
    UnitList,
    MissionStub,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Project,
        ExportFormat::Geojson,
        ExportFormat::UnitList,
        ExportFormat::MissionStub,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Project => "project",
            ExportFormat::Geojson => "geojson",
            ExportFormat::UnitList => "unit-list",
            ExportFormat::MissionStub => "mission-stub",
        }
    }

    fn file_suffix(self) -> &'static str {
        match self {
            ExportFormat::Project => ".json",
            ExportFormat::Geojson => "-overlay.geojson",
            ExportFormat::UnitList => "-units.json",
            ExportFormat::MissionStub => "-brief.json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| {
                AppError::Export(format!(
                    "unknown export format '{s}' (expected project, geojson, unit-list or mission-stub)"
                ))
            })
    }
}

fn pretty<T: Serialize>(payload: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(payload)
        .map_err(|e| AppError::Export(format!("cannot serialize export: {e}")))
}

/// Render `project` as `format`, pretty-printed.
///
/// A GeoJSON export with no located entity is an error: there is nothing
/// to draw.
pub fn render_export(project: &MissionProject, format: ExportFormat) -> Result<String, AppError> {
    match format {
        ExportFormat::Project => pretty(project),
        ExportFormat::Geojson => {
            let overlay = build_feature_collection(project);
            if overlay.is_empty() {
                return Err(AppError::Export(
                    "no entity coordinates available to export".to_string(),
                ));
            }
            pretty(&overlay)
        }
        ExportFormat::UnitList => pretty(&build_unit_list(project)),
        ExportFormat::MissionStub => pretty(&build_mission_stub(&project.mission)),
    }
}

/// Suggested download name, derived from the mission name.
pub fn default_file_name(project: &MissionProject, format: ExportFormat) -> String {
    let name = project.mission.mission_meta.name.trim();
    let stem: String = if name.is_empty() {
        "mission".to_string()
    } else {
        name.chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    };
    format!("{stem}{}", format.file_suffix())
}
