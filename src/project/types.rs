//! The persisted root record and its project-level parts.
//!
//! These types are the canonical in-memory shape. Anything read from storage
//! or an imported file reaches them only through
//! [`super::normalize::normalize_mission_project`], which guarantees every
//! field below is present and correctly typed.

use serde::Serialize;
use serde_json::Value;

use crate::coerce::{self, Coerce};
use crate::models::{
    mission::{DEFAULT_ALTITUDE_BAND, DEFAULT_TEMPERATURE_BAND},
    Entity, MeshLink, Mission, MissionConstraints,
};

/// Value of the `schema` discriminator on every project blob.
pub const SCHEMA_NAME: &str = "MissionProject";

/// Version written by [`super::serialization::save_mission_project`].
pub const CURRENT_SCHEMA_VERSION: &str = "2.0.0";

/// The single storage slot every project is written to.
pub const STORAGE_KEY: &str = "ceradonMissionProject";

/// Provenance label of the project envelope itself.
pub const PROJECT_ORIGIN_TOOL: &str = "mission";

/// Display/summary fields plus the saved-mission archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub name: String,
    pub duration_hours: f64,
    pub altitude_band: String,
    pub temperature_band: String,
    /// Named snapshots of previously saved missions, keyed by mission id.
    pub saved_missions: Vec<Mission>,
    pub last_updated: String,
}

impl Default for ProjectMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            duration_hours: 0.0,
            altitude_band: DEFAULT_ALTITUDE_BAND.to_string(),
            temperature_band: DEFAULT_TEMPERATURE_BAND.to_string(),
            saved_missions: Vec::new(),
            last_updated: crate::time::today(),
        }
    }
}

impl Coerce for ProjectMeta {
    fn coerce(value: &Value) -> Self {
        Self {
            name: coerce::text_or(value, "name", ""),
            duration_hours: coerce::number(value, "durationHours").unwrap_or(0.0),
            altitude_band: coerce::text_or(value, "altitudeBand", DEFAULT_ALTITUDE_BAND),
            temperature_band: coerce::text_or(value, "temperatureBand", DEFAULT_TEMPERATURE_BAND),
            saved_missions: coerce::list(value, "savedMissions"),
            last_updated: coerce::non_empty_text(value, "lastUpdated")
                .unwrap_or_else(crate::time::today),
        }
    }
}

/// Situational fields shared by the project's tools.
///
/// `ao` and the two bands mirror the active mission's metadata; `weather`
/// and `logistics_notes` are owned here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub ao: String,
    pub altitude_band: String,
    pub temperature_band: String,
    pub weather: String,
    pub logistics_notes: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ao: String::new(),
            altitude_band: DEFAULT_ALTITUDE_BAND.to_string(),
            temperature_band: DEFAULT_TEMPERATURE_BAND.to_string(),
            weather: String::new(),
            logistics_notes: String::new(),
        }
    }
}

impl Coerce for Environment {
    fn coerce(value: &Value) -> Self {
        Self {
            ao: coerce::text_or(value, "ao", ""),
            altitude_band: coerce::text_or(value, "altitudeBand", DEFAULT_ALTITUDE_BAND),
            temperature_band: coerce::text_or(value, "temperatureBand", DEFAULT_TEMPERATURE_BAND),
            weather: coerce::text_or(value, "weather", ""),
            logistics_notes: coerce::text_or(value, "logisticsNotes", ""),
        }
    }
}

/// One row of the flattened constraint view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub severity: String,
}

impl ConstraintEntry {
    fn new(id: String, kind: &str, description: String, severity: &str) -> Self {
        Self {
            id,
            kind: kind.to_string(),
            description,
            severity: severity.to_string(),
        }
    }
}

/// Flatten the mission's structured constraints into list rows.
///
/// Empty text fields produce no row; each success criterion gets its own.
pub fn derive_constraint_entries(c: &MissionConstraints) -> Vec<ConstraintEntry> {
    let mut entries = Vec::new();
    let text_fields = [
        ("time_window", &c.time_window, "medium"),
        ("environment", &c.environment, "low"),
        ("rf", &c.rf_constraints, "high"),
        ("logistics", &c.logistics_constraints, "medium"),
        ("risk", &c.risk_notes, "high"),
    ];
    for (kind, text, severity) in text_fields {
        if !text.trim().is_empty() {
            entries.push(ConstraintEntry::new(
                format!("constraint-{kind}"),
                kind,
                text.clone(),
                severity,
            ));
        }
    }
    if let Some(max) = c.max_sorties {
        entries.push(ConstraintEntry::new(
            "constraint-max_sorties".to_string(),
            "max_sorties",
            format!("Maximum {max} sorties"),
            "medium",
        ));
    }
    if let Some(pct) = c.min_battery_reserve_pct {
        entries.push(ConstraintEntry::new(
            "constraint-battery_reserve".to_string(),
            "battery_reserve",
            format!("Minimum battery reserve {pct}%"),
            "medium",
        ));
    }
    if c.requires_rf_coverage {
        entries.push(ConstraintEntry::new(
            "constraint-rf_coverage".to_string(),
            "rf_coverage",
            "RF coverage required across all phases".to_string(),
            "high",
        ));
    }
    for (i, criterion) in c.success_criteria.iter().enumerate() {
        entries.push(ConstraintEntry::new(
            format!("constraint-success-{}", i + 1),
            "success_criterion",
            criterion.clone(),
            "info",
        ));
    }
    entries
}

/// The persisted root record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionProject {
    pub schema: String,
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    pub origin_tool: String,
    pub meta: ProjectMeta,
    /// The active mission being edited.
    pub mission: Mission,
    pub nodes: Vec<Entity>,
    pub platforms: Vec<Entity>,
    pub mesh_links: Vec<MeshLink>,
    pub kits: Vec<Entity>,
    pub environment: Environment,
    /// Derived from `mission.constraints`; regenerated on every normalize.
    pub constraints: Vec<ConstraintEntry>,
}

impl MissionProject {
    /// Re-derive the views that mirror the active mission: the `meta`
    /// summary, the shared `environment` fields and the flattened
    /// `constraints` list.
    pub fn sync_derived(&mut self) {
        let mm = &self.mission.mission_meta;
        self.meta.name = mm.name.clone();
        self.meta.duration_hours = mm.duration_hours;
        self.meta.altitude_band = mm.altitude_band.clone();
        self.meta.temperature_band = mm.temperature_band.clone();
        self.environment.ao = mm.ao.clone();
        self.environment.altitude_band = mm.altitude_band.clone();
        self.environment.temperature_band = mm.temperature_band.clone();
        self.constraints = derive_constraint_entries(&self.mission.constraints);
    }

    pub fn to_value(&self) -> Value {
        // Every field is a plain string/number/map; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_entries_skip_blank_fields() {
        let c = MissionConstraints {
            rf_constraints: "Multipath heavy".to_string(),
            max_sorties: Some(4),
            success_criteria: vec!["No fratricide".to_string(), "Recover kit".to_string()],
            ..MissionConstraints::default()
        };
        let entries = derive_constraint_entries(&c);
        let kinds: Vec<&str> = entries.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(
            kinds,
            ["rf", "max_sorties", "success_criterion", "success_criterion"]
        );
        assert_eq!(entries[0].severity, "high");
        assert_eq!(entries[3].id, "constraint-success-2");
    }

    #[test]
    fn constraint_entry_serializes_type_key() {
        let c = MissionConstraints {
            time_window: "H+0 to H+48".to_string(),
            ..MissionConstraints::default()
        };
        let value = serde_json::to_value(&derive_constraint_entries(&c)[0]).unwrap();
        assert_eq!(value["type"], "time_window");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn project_meta_coerce_defaults_bands_and_archive() {
        let meta = ProjectMeta::coerce(&serde_json::json!({ "name": "Lane A", "savedMissions": null }));
        assert_eq!(meta.name, "Lane A");
        assert_eq!(meta.altitude_band, DEFAULT_ALTITUDE_BAND);
        assert!(meta.saved_missions.is_empty());
        assert!(!meta.last_updated.is_empty());
    }
}
