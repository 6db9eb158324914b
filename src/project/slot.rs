//! The single storage slot a project lives in.
//!
//! There is exactly one slot per store. "Multiple missions" live inside the
//! project itself (`meta.savedMissions`), never as separate slots.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AppError;

/// One serialized blob, read and written whole.
pub trait StorageSlot: Send + Sync {
    /// The stored blob, or `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, AppError>;
    /// Replace the stored blob.
    fn write(&self, contents: &str) -> Result<(), AppError>;
    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// A slot backed by one file on disk.
///
/// Writes go to `<path>.tmp` in the same directory and are renamed over the
/// target, so a crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        self.path.with_file_name(format!("{file_name}.tmp"))
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, AppError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StorageRead(format!(
                "cannot read {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn write(&self, contents: &str) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::StorageWrite(format!("cannot create {}: {e}", dir.display()))
            })?;
        }

        let tmp_path = self.tmp_path();
        if let Err(e) = std::fs::write(&tmp_path, contents) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(AppError::StorageWrite(format!("cannot write temp file: {e}")));
        }

        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            AppError::StorageWrite(format!("rename to final path failed: {e}"))
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory slot, used as the default state and in tests.
#[derive(Debug, Default)]
pub struct MemorySlot {
    contents: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, AppError> {
        let guard = self
            .contents
            .lock()
            .map_err(|e| AppError::StorageRead(format!("slot lock poisoned: {e}")))?;
        Ok(guard.clone())
    }

    fn write(&self, contents: &str) -> Result<(), AppError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|e| AppError::StorageWrite(format!("slot lock poisoned: {e}")))?;
        *guard = Some(contents.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_slot_reads_none_before_first_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let slot = FileSlot::new(dir.path().join("project.json"));
        assert_eq!(slot.read().expect("read"), None);
    }

    #[test]
    fn file_slot_write_then_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let slot = FileSlot::new(dir.path().join("nested").join("project.json"));
        slot.write("{\"a\":1}").expect("write");
        assert_eq!(slot.read().expect("read").as_deref(), Some("{\"a\":1}"));
        assert!(!slot.tmp_path().exists(), "temp file must be renamed away");
    }

    #[test]
    fn file_slot_overwrites_previous_blob() {
        let dir = tempfile::tempdir().expect("tempdir");
        let slot = FileSlot::new(dir.path().join("project.json"));
        slot.write("first").expect("write");
        slot.write("second").expect("write");
        assert_eq!(slot.read().expect("read").as_deref(), Some("second"));
    }

    #[test]
    fn file_slot_read_of_directory_is_storage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let slot = FileSlot::new(dir.path());
        assert!(matches!(slot.read(), Err(AppError::StorageRead(_))));
    }

    #[test]
    fn memory_slot_round_trip() {
        let slot = MemorySlot::new();
        assert_eq!(slot.read().expect("read"), None);
        slot.write("blob").expect("write");
        assert_eq!(slot.read().expect("read").as_deref(), Some("blob"));
        assert_eq!(slot.location(), "memory");
    }
}
