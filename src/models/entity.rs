//! Equipment/element records shared across planning tools.
//!
//! [`Entity`] covers the project's flat `nodes`, `platforms` and `kits`
//! lists; [`MeshLink`] covers `mesh_links`. Both keep any foreign fields
//! they do not model in a flattened `fields` map so data produced by other
//! tools survives a load/save cycle untouched.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::{self, Coerce};

/// The four flat entity lists of a mission project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCategory {
    Node,
    Platform,
    MeshLink,
    Kit,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 4] = [
        EntityCategory::Node,
        EntityCategory::Platform,
        EntityCategory::MeshLink,
        EntityCategory::Kit,
    ];

    /// Key of the flat list in the persisted project.
    pub fn list_key(self) -> &'static str {
        match self {
            Self::Node => "nodes",
            Self::Platform => "platforms",
            Self::MeshLink => "mesh_links",
            Self::Kit => "kits",
        }
    }

    /// Provenance label applied by an import merge when the incoming record
    /// carries none.
    pub fn default_origin(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Platform => "platform",
            Self::MeshLink => "mesh",
            Self::Kit => "kit",
        }
    }

    /// Prefix used for generated ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Platform => "platform",
            Self::MeshLink => "link",
            Self::Kit => "kit",
        }
    }
}

/// Common surface of records living in the project's flat lists.
///
/// Id assignment, provenance defaulting and import merging are written once
/// against this trait.
pub trait ProjectEntity: Serialize {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    /// Secondary merge key used when the record has no id.
    fn merge_key(&self) -> Option<Cow<'_, str>>;
    fn origin_tool(&self) -> &str;
    fn set_origin_tool(&mut self, origin: String);
    /// Foreign fields not modelled by the typed record.
    fn fields(&self) -> &Map<String, Value>;
    /// Shallow-overwrite `self` with every field `incoming` actually carries.
    fn overlay(&mut self, incoming: Self);
}

/// A node, platform or kit record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Provenance label (which tool produced the record).
    pub origin_tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "rfBand", skip_serializing_if = "Option::is_none")]
    pub rf_band: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity {
    const KNOWN: [&'static str; 7] = ["id", "name", "origin_tool", "role", "rfBand", "lat", "lon"];

    /// `(lat, lon)` when both coordinates are known.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }
}

impl Coerce for Entity {
    fn coerce(value: &Value) -> Self {
        Self {
            id: coerce::text_or(value, "id", ""),
            name: coerce::text_or(value, "name", ""),
            origin_tool: coerce::text_or(value, "origin_tool", ""),
            role: coerce::non_empty_text(value, "role"),
            rf_band: coerce::non_empty_text(value, "rfBand"),
            lat: coerce::number(value, "lat"),
            lon: coerce::number(value, "lon"),
            fields: coerce::extra_fields(value, &Self::KNOWN),
        }
    }
}

impl ProjectEntity for Entity {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn merge_key(&self) -> Option<Cow<'_, str>> {
        Some(self.name.as_str())
            .filter(|n| !n.is_empty())
            .map(Cow::Borrowed)
    }

    fn origin_tool(&self) -> &str {
        &self.origin_tool
    }

    fn set_origin_tool(&mut self, origin: String) {
        self.origin_tool = origin;
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn overlay(&mut self, incoming: Self) {
        if !incoming.name.is_empty() {
            self.name = incoming.name;
        }
        if incoming.role.is_some() {
            self.role = incoming.role;
        }
        if incoming.rf_band.is_some() {
            self.rf_band = incoming.rf_band;
        }
        if incoming.lat.is_some() {
            self.lat = incoming.lat;
        }
        if incoming.lon.is_some() {
            self.lon = incoming.lon;
        }
        self.fields.extend(incoming.fields);
    }
}

/// An edge between two element ids with a link-quality/band annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshLink {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Free-text link quality, e.g. `"good"`, `"marginal"`, `"unlikely"`.
    pub quality: String,
    pub band: String,
    pub origin_tool: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MeshLink {
    const KNOWN: [&'static str; 6] = ["id", "from", "to", "quality", "band", "origin_tool"];

    /// Whether the link's quality marks it as unreliable.
    pub fn is_marginal(&self) -> bool {
        let quality = self.quality.to_ascii_lowercase();
        quality.contains("marginal") || quality.contains("unlikely")
    }
}

impl Coerce for MeshLink {
    fn coerce(value: &Value) -> Self {
        Self {
            id: coerce::text_or(value, "id", ""),
            from: coerce::text_or(value, "from", ""),
            to: coerce::text_or(value, "to", ""),
            quality: coerce::text_or(value, "quality", ""),
            band: coerce::text_or(value, "band", ""),
            origin_tool: coerce::text_or(value, "origin_tool", ""),
            fields: coerce::extra_fields(value, &Self::KNOWN),
        }
    }
}

impl ProjectEntity for MeshLink {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    /// The link's `name`, else its `from->to` endpoints.
    fn merge_key(&self) -> Option<Cow<'_, str>> {
        let name = self
            .fields
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty());
        match name {
            Some(n) => Some(Cow::Borrowed(n)),
            None if !self.from.is_empty() && !self.to.is_empty() => {
                Some(Cow::Owned(format!("{}->{}", self.from, self.to)))
            }
            None => None,
        }
    }

    fn origin_tool(&self) -> &str {
        &self.origin_tool
    }

    fn set_origin_tool(&mut self, origin: String) {
        self.origin_tool = origin;
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn overlay(&mut self, incoming: Self) {
        for (slot, value) in [
            (&mut self.from, incoming.from),
            (&mut self.to, incoming.to),
            (&mut self.quality, incoming.quality),
            (&mut self.band, incoming.band),
        ] {
            if !value.is_empty() {
                *slot = value;
            }
        }
        self.fields.extend(incoming.fields);
    }
}
