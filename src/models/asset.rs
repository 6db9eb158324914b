//! Mission asset and role-assignment records.

use serde::Serialize;
use serde_json::Value;

use crate::coerce::{self, Coerce};

/// Equipment category of a mission asset.
///
/// Serialized in SCREAMING_SNAKE_CASE (`"MESH_ELEMENT"`); unknown strings
/// read back as [`AssetType::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Node,
    Uxs,
    Platform,
    MeshElement,
    Kit,
    #[default]
    Other,
}

impl AssetType {
    pub fn parse(s: &str) -> Self {
        let normalized = s
            .trim()
            .to_ascii_uppercase()
            .replace(|c: char| c == '-' || c == ' ', "_");
        match normalized.as_str() {
            "NODE" => Self::Node,
            "UXS" => Self::Uxs,
            "PLATFORM" => Self::Platform,
            "MESH_ELEMENT" | "MESH" => Self::MeshElement,
            "KIT" => Self::Kit,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "NODE",
            Self::Uxs => "UXS",
            Self::Platform => "PLATFORM",
            Self::MeshElement => "MESH_ELEMENT",
            Self::Kit => "KIT",
            Self::Other => "OTHER",
        }
    }

    /// Platforms and uncrewed systems fly sorties and carry endurance figures.
    pub fn is_platform(self) -> bool {
        matches!(self, Self::Platform | Self::Uxs)
    }
}

/// A piece of equipment available to the mission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Planning tool the asset came from (e.g. `"NodeArchitect"`, `"Manual"`).
    pub source_tool: String,
    /// Id of the record in the source tool, when imported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub role_tags: Vec<String>,
    pub owner_element: String,
    pub notes: String,
    pub critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rf_band: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_wh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endurance_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endurance_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl Asset {
    /// Single-sortie endurance in hours; minutes are converted when hours
    /// are not recorded. Zero is treated as unknown.
    pub fn endurance(&self) -> Option<f64> {
        self.endurance_hours
            .filter(|h| *h > 0.0)
            .or_else(|| {
                self.endurance_minutes
                    .filter(|m| *m > 0.0)
                    .map(|m| m / 60.0)
            })
    }
}

impl Coerce for Asset {
    fn coerce(value: &Value) -> Self {
        Self {
            id: coerce::text_or(value, "id", ""),
            name: coerce::text_or(value, "name", ""),
            asset_type: coerce::text(value, "type")
                .map(|t| AssetType::parse(&t))
                .unwrap_or_default(),
            source_tool: coerce::text_or(value, "sourceTool", ""),
            source_id: coerce::non_empty_text(value, "sourceId"),
            role_tags: coerce::strings(value, "roleTags").unwrap_or_default(),
            owner_element: coerce::text_or(value, "ownerElement", ""),
            notes: coerce::text_or(value, "notes", ""),
            critical: coerce::flag(value, "critical").unwrap_or(false),
            rf_band: coerce::non_empty_text(value, "rfBand"),
            battery_wh: coerce::number(value, "batteryWh"),
            endurance_hours: coerce::number(value, "enduranceHours"),
            endurance_minutes: coerce::number(value, "enduranceMinutes"),
            lat: coerce::number(value, "lat"),
            lon: coerce::number(value, "lon"),
        }
    }
}

/// Binding of an asset to a phase and an organizational element.
///
/// `asset_id`/`phase_id` are not validated; a dangling reference renders as
/// "Unknown" downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub asset_id: String,
    pub phase_id: String,
    pub team: String,
    pub role: String,
    pub notes: String,
    pub critical: bool,
    pub requires_comms: bool,
}

impl Coerce for Assignment {
    fn coerce(value: &Value) -> Self {
        Self {
            id: coerce::text_or(value, "id", ""),
            asset_id: coerce::text_or(value, "assetId", ""),
            phase_id: coerce::text_or(value, "phaseId", ""),
            team: coerce::text_or(value, "team", ""),
            role: coerce::text_or(value, "role", ""),
            notes: coerce::text_or(value, "notes", ""),
            critical: coerce::flag(value, "critical").unwrap_or(false),
            requires_comms: coerce::flag(value, "requiresComms").unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn asset_type_serializes_screaming_snake_case() {
        let value = serde_json::to_value(AssetType::MeshElement).expect("serialize");
        assert_eq!(value, "MESH_ELEMENT");
        assert_eq!(serde_json::to_value(AssetType::Uxs).unwrap(), "UXS");
    }

    #[test]
    fn asset_type_parse_is_forgiving() {
        assert_eq!(AssetType::parse("uxs"), AssetType::Uxs);
        assert_eq!(AssetType::parse("mesh-element"), AssetType::MeshElement);
        assert_eq!(AssetType::parse("submarine"), AssetType::Other);
    }

    #[test]
    fn asset_fields_are_camel_case() {
        let asset = Asset {
            id: "a1".to_string(),
            source_tool: "Manual".to_string(),
            endurance_hours: Some(2.0),
            ..Asset::default()
        };
        let value = serde_json::to_value(&asset).expect("serialize Asset");
        assert_eq!(value["sourceTool"], "Manual");
        assert_eq!(value["enduranceHours"], 2.0);
        assert_eq!(value["type"], "OTHER");
        assert!(value.get("sourceId").is_none());
    }

    #[test]
    fn endurance_prefers_hours_then_minutes() {
        let asset = Asset::coerce(&json!({ "enduranceMinutes": 90 }));
        assert_eq!(asset.endurance(), Some(1.5));
        let asset = Asset::coerce(&json!({ "enduranceHours": "3", "enduranceMinutes": 90 }));
        assert_eq!(asset.endurance(), Some(3.0));
        let asset = Asset::coerce(&json!({ "enduranceHours": 0 }));
        assert_eq!(asset.endurance(), None);
    }

    #[test]
    fn assignment_coerce_reads_flags() {
        let a = Assignment::coerce(&json!({
            "id": "as1", "assetId": "a1", "phaseId": "ORP",
            "critical": "true", "requiresComms": 1
        }));
        assert!(a.critical);
        assert!(a.requires_comms);
        assert_eq!(a.team, "");
    }
}
