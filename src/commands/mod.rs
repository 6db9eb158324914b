//! UI-facing command handlers.
//!
//! Sub-modules are grouped by concern:
//! - [`project`]: snapshot, new / load / save / open of the whole project
//! - [`mission`]: editing the active mission
//! - [`archive`]: the saved-mission archive
//! - [`import`]: pasted and file imports from the planning tools
//! - [`export`]: rendering and writing export payloads
//!
//! Every handler is a plain function over `&RwLock<MissionProject>` (plus the
//! storage slot where persistence is involved), so it is testable without a
//! host. Handlers never persist on their own; the host saves after a
//! successful mutation.

pub mod archive;
pub mod export;
pub mod import;
pub mod mission;
pub mod project;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::AppError;
use crate::project::MissionProject;

pub(crate) fn read_project(
    lock: &RwLock<MissionProject>,
) -> Result<RwLockReadGuard<'_, MissionProject>, AppError> {
    lock.read()
        .map_err(|e| AppError::Io(format!("project lock poisoned: {e}")))
}

pub(crate) fn write_project(
    lock: &RwLock<MissionProject>,
) -> Result<RwLockWriteGuard<'_, MissionProject>, AppError> {
    lock.write()
        .map_err(|e| AppError::Io(format!("project lock poisoned: {e}")))
}
