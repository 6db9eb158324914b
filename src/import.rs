//! Adapter for JSON exported by the external planning tools.
//!
//! Foreign payloads disagree on where their records live (`nodes`,
//! `mission.imports.nodes`, `imports.nodes`, ...) and on field names
//! (`lat`/`latitude`, `rfBand`/`rf_band`/`band`, ...). Each category has an
//! ordered list of JSON pointers; the first one holding a non-empty array
//! wins. Records are then mapped onto the canonical entity and asset shapes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce;
use crate::error::AppError;
use crate::models::{Asset, AssetType, Entity, EntityCategory, MeshImport, MeshLink};
use crate::project::ids::new_record_id;
use crate::project::merge::adopt_merged_ids;
use crate::project::{merge_project_entities, IncomingEntities, MergeSummary, MissionProject};

const NODE_PATHS: &[&str] = &["/nodes", "/mission/imports/nodes", "/imports/nodes", "/mission/nodes"];
const PLATFORM_PATHS: &[&str] = &[
    "/platforms",
    "/mission/imports/platforms",
    "/imports/platforms",
    "/mission/platforms",
];
const UXS_PATHS: &[&str] = &[
    "/platforms",
    "/uxs",
    "/vehicles",
    "/mission/imports/platforms",
    "/imports/platforms",
    "/mission/platforms",
];
const KIT_PATHS: &[&str] = &["/kits", "/mission/imports/kits", "/imports/kits", "/mission/kits"];
const MESH_LINK_PATHS: &[&str] = &[
    "/mesh_links",
    "/mesh/links",
    "/links",
    "/mission/imports/mesh/links",
    "/imports/mesh/links",
    "/mission/mesh_links",
];
const MESH_ELEMENT_PATHS: &[&str] = &["/elements", "/mesh/elements", "/nodes", "/mesh/nodes"];

const ENTITY_KEYS: [&str; 16] = [
    "id",
    "name",
    "label",
    "callsign",
    "origin_tool",
    "sourceTool",
    "role",
    "roleTags",
    "rfBand",
    "rf_band",
    "band",
    "lat",
    "latitude",
    "lon",
    "lng",
    "longitude",
];
const LINK_KEYS: [&str; 10] = [
    "id", "from", "source", "to", "target", "quality", "linkQuality", "band", "rfBand", "origin_tool",
];

/// Which planning tool a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Node,
    Uxs,
    Platform,
    Mesh,
    Kit,
}

impl ImportKind {
    pub const ALL: [ImportKind; 5] = [
        ImportKind::Node,
        ImportKind::Uxs,
        ImportKind::Platform,
        ImportKind::Mesh,
        ImportKind::Kit,
    ];

    pub fn source_tool(self) -> &'static str {
        match self {
            ImportKind::Node => "NodeArchitect",
            ImportKind::Uxs => "UxSArchitect",
            ImportKind::Platform => "PlatformArchitect",
            ImportKind::Mesh => "MeshArchitect",
            ImportKind::Kit => "KitSmith",
        }
    }

    pub fn asset_type(self) -> AssetType {
        match self {
            ImportKind::Node => AssetType::Node,
            ImportKind::Uxs => AssetType::Uxs,
            ImportKind::Platform => AssetType::Platform,
            ImportKind::Mesh => AssetType::MeshElement,
            ImportKind::Kit => AssetType::Kit,
        }
    }

    /// Flat list the payload's entities are merged into.
    pub fn category(self) -> EntityCategory {
        match self {
            ImportKind::Node => EntityCategory::Node,
            ImportKind::Uxs | ImportKind::Platform => EntityCategory::Platform,
            ImportKind::Mesh => EntityCategory::MeshLink,
            ImportKind::Kit => EntityCategory::Kit,
        }
    }

    fn record_paths(self) -> &'static [&'static str] {
        match self {
            ImportKind::Node => NODE_PATHS,
            ImportKind::Uxs => UXS_PATHS,
            ImportKind::Platform => PLATFORM_PATHS,
            ImportKind::Mesh => MESH_ELEMENT_PATHS,
            ImportKind::Kit => KIT_PATHS,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ImportKind::Node => "node",
            ImportKind::Uxs => "uxs",
            ImportKind::Platform => "platform",
            ImportKind::Mesh => "mesh",
            ImportKind::Kit => "kit",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ImportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                AppError::InvalidJson(format!(
                    "unknown import kind '{s}' (expected node, uxs, platform, mesh or kit)"
                ))
            })
    }
}

/// Parse user-supplied text as JSON.
pub fn parse_json(text: &str) -> Result<Value, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::InvalidJson("nothing to import".to_string()));
    }
    serde_json::from_str(text).map_err(|e| AppError::InvalidJson(format!("invalid JSON: {e}")))
}

/// The first non-empty array found at any of `paths`, in order.
fn first_array<'a>(data: &'a Value, paths: &[&str]) -> Option<&'a [Value]> {
    paths
        .iter()
        .filter_map(|path| data.pointer(path).and_then(Value::as_array))
        .find(|items| !items.is_empty())
        .map(Vec::as_slice)
}

fn object_records<'a>(items: Option<&'a [Value]>) -> impl Iterator<Item = &'a Value> {
    items.unwrap_or_default().iter().filter(|v| v.is_object())
}

/// Map a foreign node/platform/kit record onto [`Entity`].
pub fn entity_from_foreign(value: &Value, default_origin: &str) -> Entity {
    let role = coerce::non_empty_text(value, "role").or_else(|| {
        coerce::strings(value, "roleTags")
            .filter(|tags| !tags.is_empty())
            .map(|tags| tags.join(", "))
    });
    Entity {
        id: coerce::text_or(value, "id", ""),
        name: coerce::first_text(value, &["name", "label", "callsign", "id"]).unwrap_or_default(),
        origin_tool: coerce::first_text(value, &["origin_tool", "sourceTool"])
            .unwrap_or_else(|| default_origin.to_string()),
        role,
        rf_band: coerce::first_text(value, &["rfBand", "rf_band", "band"]),
        lat: coerce::first_number(value, &["lat", "latitude"]),
        lon: coerce::first_number(value, &["lon", "lng", "longitude"]),
        fields: coerce::extra_fields(value, &ENTITY_KEYS),
    }
}

/// Map a foreign link record onto [`MeshLink`].
pub fn link_from_foreign(value: &Value, default_origin: &str) -> MeshLink {
    MeshLink {
        id: coerce::text_or(value, "id", ""),
        from: coerce::first_text(value, &["from", "source"]).unwrap_or_default(),
        to: coerce::first_text(value, &["to", "target"]).unwrap_or_default(),
        quality: coerce::first_text(value, &["quality", "linkQuality"]).unwrap_or_default(),
        band: coerce::first_text(value, &["band", "rfBand"]).unwrap_or_default(),
        origin_tool: coerce::non_empty_text(value, "origin_tool")
            .unwrap_or_else(|| default_origin.to_string()),
        fields: coerce::extra_fields(value, &LINK_KEYS),
    }
}

/// Map a foreign record onto a mission [`Asset`] of `kind`'s type.
///
/// The asset always gets a fresh id; the record's own id is kept as
/// `source_id` so re-imports can be recognized.
pub fn asset_from_foreign(value: &Value, kind: ImportKind) -> Asset {
    let positive = |n: &f64| *n > 0.0;
    Asset {
        id: new_record_id("asset"),
        name: coerce::first_text(value, &["name", "label", "callsign", "id"])
            .unwrap_or_else(|| format!("{} asset", kind.source_tool())),
        asset_type: kind.asset_type(),
        source_tool: kind.source_tool().to_string(),
        source_id: coerce::non_empty_text(value, "id"),
        role_tags: coerce::strings(value, "roleTags")
            .or_else(|| coerce::non_empty_text(value, "role").map(|r| vec![r]))
            .unwrap_or_default(),
        owner_element: coerce::first_text(value, &["owner", "ownerElement"]).unwrap_or_default(),
        notes: coerce::text_or(value, "notes", ""),
        critical: coerce::flag(value, "critical").unwrap_or(false),
        rf_band: coerce::first_text(value, &["rfBand", "rf_band", "band"]),
        battery_wh: coerce::first_number(value, &["batteryWh", "battery_wh"]).filter(positive),
        endurance_hours: coerce::first_number(value, &["enduranceHours", "endurance"]).filter(positive),
        endurance_minutes: coerce::number(value, "enduranceMinutes").filter(positive),
        lat: coerce::first_number(value, &["lat", "latitude"]),
        lon: coerce::first_number(value, &["lon", "lng", "longitude"]),
    }
}

/// Every entity a payload carries, across all four flat lists.
///
/// Used for whole-project imports, where no single tool is implied.
pub fn extract_entities(data: &Value) -> IncomingEntities {
    let entities = |paths: &[&str], origin: EntityCategory| -> Vec<Entity> {
        object_records(first_array(data, paths))
            .map(|v| entity_from_foreign(v, origin.default_origin()))
            .collect()
    };
    IncomingEntities {
        nodes: entities(NODE_PATHS, EntityCategory::Node),
        platforms: entities(PLATFORM_PATHS, EntityCategory::Platform),
        kits: entities(KIT_PATHS, EntityCategory::Kit),
        mesh_links: object_records(first_array(data, MESH_LINK_PATHS))
            .map(|v| link_from_foreign(v, EntityCategory::MeshLink.default_origin()))
            .collect(),
    }
}

/// A tool payload parsed into everything it contributes to a project.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub kind: ImportKind,
    pub entities: IncomingEntities,
    pub assets: Vec<Asset>,
    /// Mesh payloads only: the links plus the rest of the payload.
    pub mesh: Option<MeshImport>,
}

/// Parse a payload exported by `kind`'s tool.
///
/// A bare array is read as the tool's record list; otherwise the record
/// list is searched for along the kind's known paths.
pub fn parse_import(kind: ImportKind, data: &Value) -> ImportBatch {
    let records: Option<&[Value]> = match data {
        Value::Array(items) => Some(items.as_slice()),
        _ => first_array(data, kind.record_paths()),
    };
    let origin = kind.source_tool();
    let assets: Vec<Asset> = object_records(records)
        .map(|v| asset_from_foreign(v, kind))
        .collect();

    let mut entities = IncomingEntities::default();
    let mut mesh = None;
    match kind {
        ImportKind::Node => {
            entities.nodes = object_records(records).map(|v| entity_from_foreign(v, origin)).collect();
        }
        ImportKind::Uxs | ImportKind::Platform => {
            entities.platforms = object_records(records).map(|v| entity_from_foreign(v, origin)).collect();
        }
        ImportKind::Kit => {
            entities.kits = object_records(records).map(|v| entity_from_foreign(v, origin)).collect();
        }
        ImportKind::Mesh => {
            let links: Vec<MeshLink> = object_records(first_array(data, MESH_LINK_PATHS))
                .map(|v| link_from_foreign(v, origin))
                .collect();
            let mut fields = match data {
                Value::Object(map) => map.clone(),
                _ => Map::new(),
            };
            fields.remove("links");
            entities.mesh_links = links.clone();
            mesh = Some(MeshImport { links, fields });
        }
    }

    ImportBatch {
        kind,
        entities,
        assets,
        mesh,
    }
}

/// Outcome of applying an [`ImportBatch`] to a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub assets_added: usize,
    /// Records whose source id already appeared on a mission asset.
    pub assets_skipped: usize,
    pub entities: MergeSummary,
}

/// Record, merge and convert `batch` into `project`.
///
/// The payload is stored in `mission.imports` under its category, its
/// entities are merged into the flat lists, and its records become mission
/// assets unless an asset with the same source id already exists.
pub fn apply_import(project: &mut MissionProject, batch: ImportBatch) -> ImportReport {
    let ImportBatch {
        kind,
        entities,
        assets,
        mesh,
    } = batch;

    let recorded = entities.clone();
    let merged = merge_project_entities(project, entities);

    let MissionProject {
        mission,
        nodes,
        platforms,
        mesh_links,
        kits,
        ..
    } = &mut *project;
    let imports = &mut mission.imports;
    match kind {
        ImportKind::Node => {
            imports.nodes = recorded.nodes;
            adopt_merged_ids(EntityCategory::Node, &mut imports.nodes, nodes);
        }
        ImportKind::Uxs | ImportKind::Platform => {
            imports.platforms = recorded.platforms;
            adopt_merged_ids(EntityCategory::Platform, &mut imports.platforms, platforms);
        }
        ImportKind::Kit => {
            imports.kits = recorded.kits;
            adopt_merged_ids(EntityCategory::Kit, &mut imports.kits, kits);
        }
        ImportKind::Mesh => {
            imports.mesh = mesh.map(|mut m| {
                m.links = recorded.mesh_links;
                adopt_merged_ids(EntityCategory::MeshLink, &mut m.links, mesh_links);
                m
            });
        }
    }

    let mut report = ImportReport {
        entities: merged,
        ..ImportReport::default()
    };
    for asset in assets {
        let duplicate = asset.source_id.as_deref().is_some_and(|sid| {
            project
                .mission
                .assets
                .iter()
                .any(|a| a.source_id.as_deref() == Some(sid))
        });
        if duplicate {
            report.assets_skipped += 1;
        } else {
            project.mission.assets.push(asset);
            report.assets_added += 1;
        }
    }

    tracing::info!(
        kind = %kind,
        assets_added = report.assets_added,
        assets_skipped = report.assets_skipped,
        entities_added = report.entities.added,
        entities_updated = report.entities.updated,
        "applied import"
    );
    report
}
