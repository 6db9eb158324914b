//! Application state owned by the host.
//!
//! [`AppState`] holds the single in-memory project and the storage slot it is
//! persisted to. Command handlers receive `&AppState` (or just the lock) and
//! never reach for globals.

use std::sync::RwLock;

use crate::project::{
    create_empty_mission_project, load_mission_project, MemorySlot, MissionProject, StorageSlot,
};

/// Root application state.
///
/// The project is wrapped in an [`RwLock`] so read-only commands (snapshot,
/// export, feasibility) do not block each other.
pub struct AppState {
    /// The active project, guarded for concurrent read access.
    pub project: RwLock<MissionProject>,
    /// Where the project is loaded from and saved to.
    pub slot: Box<dyn StorageSlot>,
}

impl AppState {
    /// Load the project stored in `slot` (or start empty) and own both.
    pub fn load(slot: Box<dyn StorageSlot>) -> Self {
        let project = load_mission_project(slot.as_ref());
        Self {
            project: RwLock::new(project),
            slot,
        }
    }

    pub fn with_project(project: MissionProject, slot: Box<dyn StorageSlot>) -> Self {
        Self {
            project: RwLock::new(project),
            slot,
        }
    }
}

impl Default for AppState {
    /// An empty project backed by an in-memory slot.
    fn default() -> Self {
        Self::with_project(create_empty_mission_project(), Box::new(MemorySlot::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_state_default_constructs_without_panic() {
        let state = AppState::default();
        let project = state.project.read().expect("read project lock");
        assert!(project.nodes.is_empty());
        assert_eq!(state.slot.location(), "memory");
    }

    #[test]
    fn load_reads_the_slot() {
        let slot = MemorySlot::with_contents(r#"{"name":"Lane A"}"#);
        let state = AppState::load(Box::new(slot));
        let project = state.project.read().expect("read project lock");
        assert_eq!(project.mission.mission_meta.name, "Lane A");
    }

    #[test]
    fn app_state_project_lock_allows_write() {
        let state = AppState::default();
        {
            let mut project = state.project.write().expect("write project lock");
            project.mission.mission_meta.name = "Test Mission".to_string();
        }
        let project = state.project.read().expect("read project lock");
        assert_eq!(project.mission.mission_meta.name, "Test Mission");
    }
}
