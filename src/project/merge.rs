//! Merging externally sourced entity lists into a project.

use serde::Serialize;

use super::ids::assign_missing_ids;
use super::types::MissionProject;
use crate::models::{Entity, EntityCategory, MeshLink, ProjectEntity};

/// Entities parsed from an import payload, grouped by flat list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingEntities {
    pub nodes: Vec<Entity>,
    pub platforms: Vec<Entity>,
    pub mesh_links: Vec<MeshLink>,
    pub kits: Vec<Entity>,
}

impl IncomingEntities {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.platforms.is_empty()
            && self.mesh_links.is_empty()
            && self.kits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.platforms.len() + self.mesh_links.len() + self.kits.len()
    }
}

/// Copy each id-less record's id from the flat-list entity it merged into.
///
/// Records that match nothing in `merged` get a content-derived id.
pub fn adopt_merged_ids<T: ProjectEntity>(category: EntityCategory, records: &mut [T], merged: &[T]) {
    for record in records.iter_mut().filter(|r| r.id().is_empty()) {
        if let Some(entity) = merged.iter().find(|e| same_key(*e, record)) {
            record.set_id(entity.id().to_string());
        }
    }
    assign_missing_ids(category, records);
}

/// How many entities a merge appended and how many it updated in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
}

impl std::ops::AddAssign for MergeSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.added += rhs.added;
        self.updated += rhs.updated;
    }
}

/// Merge `incoming` into the project's flat lists.
///
/// Entities are matched by `id`, or by name when the incoming record has no
/// id. Unnamed mesh links match on their endpoints. A match is overlaid field by field; anything else is appended.
/// Existing entities absent from `incoming` are never removed.
pub fn merge_project_entities(
    project: &mut MissionProject,
    incoming: IncomingEntities,
) -> MergeSummary {
    let mut summary = MergeSummary::default();
    summary += merge_list(EntityCategory::Node, &mut project.nodes, incoming.nodes);
    summary += merge_list(EntityCategory::Platform, &mut project.platforms, incoming.platforms);
    summary += merge_list(EntityCategory::MeshLink, &mut project.mesh_links, incoming.mesh_links);
    summary += merge_list(EntityCategory::Kit, &mut project.kits, incoming.kits);
    tracing::debug!(
        added = summary.added,
        updated = summary.updated,
        "merged imported entities"
    );
    summary
}

fn merge_list<T: ProjectEntity>(
    category: EntityCategory,
    existing: &mut Vec<T>,
    incoming: Vec<T>,
) -> MergeSummary {
    let mut summary = MergeSummary::default();
    for mut item in incoming {
        let origin = if item.origin_tool().is_empty() {
            category.default_origin().to_string()
        } else {
            item.origin_tool().to_string()
        };
        item.set_origin_tool(origin.clone());

        match existing.iter_mut().find(|e| same_key(&**e, &item)) {
            Some(current) => {
                current.overlay(item);
                current.set_origin_tool(origin);
                summary.updated += 1;
            }
            None => {
                existing.push(item);
                summary.added += 1;
            }
        }
    }
    assign_missing_ids(category, existing);
    summary
}

fn same_key<T: ProjectEntity>(current: &T, incoming: &T) -> bool {
    if !incoming.id().is_empty() {
        return current.id() == incoming.id();
    }
    match (incoming.merge_key(), current.merge_key()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::schema::create_empty_mission_project;

    fn node(id: &str, name: &str, origin: &str) -> Entity {
        Entity {
            id: id.to_string(),
            name: name.to_string(),
            origin_tool: origin.to_string(),
            ..Entity::default()
        }
    }

    #[test]
    fn resupplied_id_updates_in_place() {
        let mut project = create_empty_mission_project();
        project.nodes.push(node("n1", "Old Relay", "node"));

        let summary = merge_project_entities(
            &mut project,
            IncomingEntities {
                nodes: vec![node("n1", "Relay", "")],
                ..IncomingEntities::default()
            },
        );

        assert_eq!(project.nodes.len(), 1);
        assert_eq!(project.nodes[0].id, "n1");
        assert_eq!(project.nodes[0].name, "Relay");
        assert_eq!(project.nodes[0].origin_tool, "node");
        assert_eq!(summary, MergeSummary { added: 0, updated: 1 });
    }

    #[test]
    fn new_id_appends_exactly_one() {
        let mut project = create_empty_mission_project();
        project.nodes.push(node("n1", "Relay", "node"));

        merge_project_entities(
            &mut project,
            IncomingEntities {
                nodes: vec![node("n2", "Relay 2", "NodeArchitect")],
                ..IncomingEntities::default()
            },
        );

        assert_eq!(project.nodes.len(), 2);
        assert_eq!(project.nodes[1].id, "n2");
        assert_eq!(project.nodes[1].origin_tool, "NodeArchitect");
    }

    #[test]
    fn id_less_items_match_by_name_and_keep_fields() {
        let mut project = create_empty_mission_project();
        let mut existing = node("k1", "Light RF Kit", "kit");
        existing.fields.insert("weight".into(), serde_json::json!(4));
        project.kits.push(existing);

        let mut incoming = node("", "Light RF Kit", "");
        incoming.rf_band = Some("UHF".into());
        merge_project_entities(
            &mut project,
            IncomingEntities {
                kits: vec![incoming],
                ..IncomingEntities::default()
            },
        );

        assert_eq!(project.kits.len(), 1);
        assert_eq!(project.kits[0].id, "k1");
        assert_eq!(project.kits[0].rf_band.as_deref(), Some("UHF"));
        assert_eq!(project.kits[0].fields["weight"], 4);
    }

    #[test]
    fn appended_items_without_id_get_one() {
        let mut project = create_empty_mission_project();
        merge_project_entities(
            &mut project,
            IncomingEntities {
                mesh_links: vec![MeshLink {
                    from: "a".into(),
                    to: "b".into(),
                    ..MeshLink::default()
                }],
                ..IncomingEntities::default()
            },
        );
        assert!(project.mesh_links[0].id.starts_with("link-"));
        assert_eq!(project.mesh_links[0].origin_tool, "mesh");
    }

    #[test]
    fn merge_never_removes_absent_entities() {
        let mut project = create_empty_mission_project();
        project.platforms.push(node("p1", "Quad", "platform"));
        merge_project_entities(&mut project, IncomingEntities::default());
        assert_eq!(project.platforms.len(), 1);
    }
}
