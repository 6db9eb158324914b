//! Mission planning record.
//!
//! A [`Mission`] is the unit the planner edits: metadata, an ordered phase
//! list, the asset inventory, role assignments, the raw payloads last
//! imported from each external tool, and the constraint fields. It maps to
//! the `mission` key (and each entry of `meta.savedMissions`) in the stored
//! project blob.

use serde::Serialize;
use serde_json::{Map, Value};

use super::asset::{Asset, Assignment};
use super::entity::{Entity, MeshLink};
use crate::coerce::{self, Coerce};
use crate::project::ids::new_record_id;

pub const DEFAULT_CLASSIFICATION_BANNER: &str = "UNCLASSIFIED // TRAINING USE";
pub const DEFAULT_MISSION_TYPE: &str = "Recon";
pub const DEFAULT_ALTITUDE_BAND: &str = "Surface";
pub const DEFAULT_TEMPERATURE_BAND: &str = "Temperate";

pub const ALTITUDE_BANDS: [&str; 5] = ["Surface", "Low", "Medium", "High", "Stratospheric"];
pub const TEMPERATURE_BANDS: [&str; 4] = ["Cold", "Temperate", "Hot", "Extreme"];

/// Descriptive header of a mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionMeta {
    pub name: String,
    pub classification_banner: String,
    /// Area of operations.
    pub ao: String,
    pub unit_or_detachment: String,
    /// `YYYY-MM-DD`.
    pub created_on: String,
    pub created_by: String,
    pub mission_type: String,
    pub duration_hours: f64,
    pub altitude_band: String,
    pub temperature_band: String,
}

impl MissionMeta {
    pub const FIELDS: [&'static str; 10] = [
        "name",
        "classificationBanner",
        "ao",
        "unitOrDetachment",
        "createdOn",
        "createdBy",
        "missionType",
        "durationHours",
        "altitudeBand",
        "temperatureBand",
    ];
}

impl Default for MissionMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            classification_banner: DEFAULT_CLASSIFICATION_BANNER.to_string(),
            ao: String::new(),
            unit_or_detachment: String::new(),
            created_on: crate::time::today(),
            created_by: String::new(),
            mission_type: DEFAULT_MISSION_TYPE.to_string(),
            duration_hours: 0.0,
            altitude_band: DEFAULT_ALTITUDE_BAND.to_string(),
            temperature_band: DEFAULT_TEMPERATURE_BAND.to_string(),
        }
    }
}

impl Coerce for MissionMeta {
    fn coerce(value: &Value) -> Self {
        Self {
            name: coerce::text_or(value, "name", ""),
            classification_banner: coerce::text_or(
                value,
                "classificationBanner",
                DEFAULT_CLASSIFICATION_BANNER,
            ),
            ao: coerce::text_or(value, "ao", ""),
            unit_or_detachment: coerce::text_or(value, "unitOrDetachment", ""),
            created_on: coerce::non_empty_text(value, "createdOn").unwrap_or_else(crate::time::today),
            created_by: coerce::text_or(value, "createdBy", ""),
            mission_type: coerce::text_or(value, "missionType", DEFAULT_MISSION_TYPE),
            duration_hours: coerce::number(value, "durationHours").unwrap_or(0.0),
            altitude_band: coerce::text_or(value, "altitudeBand", DEFAULT_ALTITUDE_BAND),
            temperature_band: coerce::text_or(value, "temperatureBand", DEFAULT_TEMPERATURE_BAND),
        }
    }
}

/// One step of the phased concept of operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_condition: String,
    pub end_condition: String,
    pub tasks: Vec<String>,
    pub emcon_considerations: String,
    /// Ids of the assets employed during this phase.
    pub assets_used: Vec<String>,
}

impl Phase {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            ..Self::default()
        }
    }
}

impl Coerce for Phase {
    fn coerce(value: &Value) -> Self {
        Self {
            id: coerce::text_or(value, "id", ""),
            name: coerce::text_or(value, "name", ""),
            description: coerce::text_or(value, "description", ""),
            start_condition: coerce::text_or(value, "startCondition", ""),
            end_condition: coerce::text_or(value, "endCondition", ""),
            tasks: coerce::strings(value, "tasks").unwrap_or_default(),
            emcon_considerations: coerce::text_or(value, "emconConsiderations", ""),
            assets_used: coerce::strings(value, "assetsUsed").unwrap_or_default(),
        }
    }
}

/// The four phases every blank mission starts with.
pub fn default_phases() -> Vec<Phase> {
    vec![
        Phase::new("ORP", "ORP", "Objective Rally Point setup"),
        Phase::new("INFIL", "Infil", "Movement to objective"),
        Phase::new("ON_STATION", "On-Station", "Operations on target"),
        Phase::new("EXFIL", "Exfil", "Withdraw and recover"),
    ]
}

/// Raw mesh-planning payload: its links plus whatever else the tool sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshImport {
    pub links: Vec<MeshLink>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Coerce for MeshImport {
    fn coerce(value: &Value) -> Self {
        Self {
            links: coerce::list(value, "links"),
            fields: coerce::extra_fields(value, &["links"]),
        }
    }
}

/// Last payload imported from each external tool category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissionImports {
    pub nodes: Vec<Entity>,
    pub platforms: Vec<Entity>,
    pub kits: Vec<Entity>,
    /// `null` until a mesh plan has been imported.
    pub mesh: Option<MeshImport>,
}

impl Coerce for MissionImports {
    fn coerce(value: &Value) -> Self {
        Self {
            nodes: coerce::list(value, "nodes"),
            platforms: coerce::list(value, "platforms"),
            kits: coerce::list(value, "kits"),
            mesh: coerce::field(value, "mesh")
                .filter(|m| m.is_object())
                .map(MeshImport::coerce),
        }
    }
}

/// Structured constraint fields of a mission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionConstraints {
    pub time_window: String,
    pub environment: String,
    pub rf_constraints: String,
    pub logistics_constraints: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sorties: Option<u32>,
    /// Minimum battery reserve, percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_battery_reserve_pct: Option<f64>,
    pub requires_rf_coverage: bool,
    pub success_criteria: Vec<String>,
    pub risk_notes: String,
}

impl MissionConstraints {
    pub const FIELDS: [&'static str; 9] = [
        "timeWindow",
        "environment",
        "rfConstraints",
        "logisticsConstraints",
        "maxSorties",
        "minBatteryReservePct",
        "requiresRfCoverage",
        "successCriteria",
        "riskNotes",
    ];
}

impl Coerce for MissionConstraints {
    fn coerce(value: &Value) -> Self {
        Self {
            time_window: coerce::text_or(value, "timeWindow", ""),
            environment: coerce::text_or(value, "environment", ""),
            rf_constraints: coerce::text_or(value, "rfConstraints", ""),
            logistics_constraints: coerce::text_or(value, "logisticsConstraints", ""),
            max_sorties: coerce::number(value, "maxSorties")
                .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
                .map(|n| n.round() as u32),
            min_battery_reserve_pct: coerce::number(value, "minBatteryReservePct"),
            requires_rf_coverage: coerce::flag(value, "requiresRfCoverage").unwrap_or(false),
            success_criteria: coerce::strings(value, "successCriteria").unwrap_or_default(),
            risk_notes: coerce::text_or(value, "riskNotes", ""),
        }
    }
}

/// A complete planning record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub mission_meta: MissionMeta,
    pub phases: Vec<Phase>,
    pub assets: Vec<Asset>,
    pub assignments: Vec<Assignment>,
    pub imports: MissionImports,
    pub constraints: MissionConstraints,
}

impl Mission {
    /// An empty mission with no phases (the schema default).
    pub fn empty() -> Self {
        Self {
            id: new_record_id("mission"),
            mission_meta: MissionMeta::default(),
            phases: Vec::new(),
            assets: Vec::new(),
            assignments: Vec::new(),
            imports: MissionImports::default(),
            constraints: MissionConstraints::default(),
        }
    }

    /// A fresh mission as offered by "new mission": empty, with the four
    /// default phases.
    pub fn blank() -> Self {
        Self {
            phases: default_phases(),
            ..Self::empty()
        }
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Display name, falling back to `"Untitled Mission"`.
    pub fn display_name(&self) -> &str {
        if self.mission_meta.name.is_empty() {
            "Untitled Mission"
        } else {
            &self.mission_meta.name
        }
    }
}

impl Default for Mission {
    fn default() -> Self {
        Self::empty()
    }
}

impl Coerce for Mission {
    fn coerce(value: &Value) -> Self {
        let meta = coerce::field(value, "missionMeta").unwrap_or(&Value::Null);
        let imports = coerce::field(value, "imports").unwrap_or(&Value::Null);
        let constraints = coerce::field(value, "constraints").unwrap_or(&Value::Null);
        Self {
            id: coerce::non_empty_text(value, "id").unwrap_or_else(|| new_record_id("mission")),
            mission_meta: MissionMeta::coerce(meta),
            phases: coerce::list(value, "phases"),
            assets: coerce::list(value, "assets"),
            assignments: coerce::list(value, "assignments"),
            imports: MissionImports::coerce(imports),
            constraints: MissionConstraints::coerce(constraints),
        }
    }
}
