//! Application-level error type returned by all command handlers.
//!
//! `AppError` is serialized to `{ kind, message }` JSON payloads, the same
//! shape the CLI prints to stderr on failure, so callers can pattern-match
//! on a stable `kind` string.

/// Top-level error returned by command handlers.
///
/// Serialized with serde's adjacently-tagged representation:
/// `{ "kind": "<variant>", "message": "<human-readable text>" }`
#[derive(Debug, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// The storage slot exists but could not be read.
    #[error("{0}")]
    StorageRead(String),

    /// The storage slot could not be written.
    #[error("{0}")]
    StorageWrite(String),

    /// User-supplied JSON (pasted text or an imported file) failed to parse.
    #[error("{0}")]
    InvalidJson(String),

    /// A generic I/O error; the inner [`std::io::Error`] is converted to a
    /// string at the system boundary so it remains serializable.
    #[error("{0}")]
    Io(String),

    /// A requested record (phase, asset, saved mission, ...) was not found.
    #[error("{0}")]
    NotFound(String),

    /// An action needs a selection the mission cannot provide yet
    /// (e.g. an assignment with no assets or phases defined).
    #[error("{0}")]
    MissingSelection(String),

    /// The configuration file could not be read or failed validation.
    #[error("{0}")]
    Config(String),

    /// An export payload could not be built or written.
    #[error("{0}")]
    Export(String),
}

impl From<std::io::Error> for AppError {
    /// Convert an [`std::io::Error`] into an [`AppError::Io`].
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    /// Convert a [`serde_json::Error`] into an [`AppError::InvalidJson`].
    ///
    /// Only parse paths use `?` on serde_json results; serialization failures
    /// are mapped explicitly at their call sites.
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidJson(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_serializes_to_kind_message() {
        let err = AppError::Io("disk full".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::Io");
        assert_eq!(value["kind"], "Io");
        assert_eq!(value["message"], "disk full");
    }

    #[test]
    fn storage_read_error_serializes_to_kind_message() {
        let err = AppError::StorageRead("permission denied".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::StorageRead");
        assert_eq!(value["kind"], "StorageRead");
        assert_eq!(value["message"], "permission denied");
    }

    #[test]
    fn missing_selection_serializes_to_kind_message() {
        let err = AppError::MissingSelection("add assets and phases first".to_string());
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["kind"], "MissingSelection");
        assert_eq!(value["message"], "add assets and phases first");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err = AppError::from(io_err);
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn from_json_error_produces_invalid_json_variant() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let app_err = AppError::from(json_err);
        assert!(matches!(app_err, AppError::InvalidJson(_)));
        let value = serde_json::to_value(&app_err).expect("serialize");
        assert_eq!(value["kind"], "InvalidJson");
    }

    #[test]
    fn app_error_display_is_human_readable() {
        assert_eq!(
            AppError::NotFound("phase INFIL not found".to_string()).to_string(),
            "phase INFIL not found"
        );
        assert_eq!(
            AppError::StorageWrite("write failed".to_string()).to_string(),
            "write failed"
        );
    }
}
