//! Id generation for project records.
//!
//! Records created by an edit get a random short id. Flat-list entities that
//! arrive without an id (older blobs, foreign tool exports) get an id derived
//! from their content instead, so normalizing the same input twice yields the
//! same ids.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{EntityCategory, ProjectEntity};

/// Origin label applied to flat-list entities with no provenance at all.
pub const DEFAULT_ORIGIN_TOOL: &str = "mission";

/// Random id of the form `<prefix>-xxxxxxx`.
pub fn new_record_id(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &raw[..7])
}

/// Deterministic id for an entity at `index` of the `category` list.
///
/// The digest covers the category, the position and the serialized record,
/// so two identical records at different positions still get distinct ids.
pub fn stable_entity_id<T: ProjectEntity>(
    category: EntityCategory,
    index: usize,
    entity: &T,
) -> String {
    let content = serde_json::to_string(entity).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(category.list_key().as_bytes());
    hasher.update((index as u64).to_le_bytes());
    hasher.update(content.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}-{}", category.id_prefix(), &digest[..10])
}

/// Fill in provenance and ids for every entity of `list` that lacks them.
///
/// `origin_tool` defaults to the legacy `sourceTool` field, then to
/// [`DEFAULT_ORIGIN_TOOL`]. Returns how many ids were generated.
pub fn assign_missing_ids<T: ProjectEntity>(category: EntityCategory, list: &mut [T]) -> usize {
    let mut generated = 0;
    for index in 0..list.len() {
        if list[index].origin_tool().is_empty() {
            let origin = list[index]
                .fields()
                .get("sourceTool")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_ORIGIN_TOOL)
                .to_string();
            list[index].set_origin_tool(origin);
        }
        if !list[index].id().is_empty() {
            continue;
        }
        let mut id = stable_entity_id(category, index, &list[index]);
        let mut salt = 1;
        while list.iter().any(|e| e.id() == id) {
            id = format!("{}-{salt}", stable_entity_id(category, index, &list[index]));
            salt += 1;
        }
        list[index].set_id(id);
        generated += 1;
    }
    if generated > 0 {
        tracing::debug!(
            list = category.list_key(),
            generated,
            "generated missing entity ids"
        );
    }
    generated
}
