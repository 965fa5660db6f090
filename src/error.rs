//! Error handling for Triptych
//!
//! One crate-wide error enum. Variants group into broad classes
//! (validation, service, persistence, io, internal) so callers can
//! route failures to the right user-facing channel without matching
//! on every variant.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Triptych operations
pub type Result<T> = std::result::Result<T, TriptychError>;

/// Broad classification of an error, used by front ends to decide how
/// a failure is reported. Composition has no class here: the composer
/// is total and cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input or missing precondition. Nothing was attempted.
    Validation,
    /// The generation service misbehaved or was unreachable.
    Service,
    /// The project store misbehaved or was unreachable.
    Persistence,
    /// Local file system trouble (config, snapshots, export).
    Io,
    /// Bugs and poisoned state.
    Internal,
}

/// Main error type for Triptych operations
#[derive(Error, Debug)]
pub enum TriptychError {
    // Validation Errors
    #[error("Prompt is required")]
    EmptyPrompt,

    #[error("No API key configured for the generation service")]
    MissingCredential,

    #[error("Invalid generation target: {target}")]
    InvalidTarget { target: String },

    #[error("A generation request for the {target} buffer is already in flight")]
    GenerationPending { target: String },

    // Service Errors (generation provider)
    #[error("Generation service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("Generation request timed out after {timeout_ms}ms")]
    ServiceTimeout { timeout_ms: u64 },

    #[error("Generation service returned status {status}: {message}")]
    ServiceStatus { status: u16, message: String },

    #[error("Invalid response from generation service: {reason}")]
    InvalidServiceResponse { reason: String },

    #[error("Generation provider support not compiled. Build with --features gemini")]
    ProviderNotCompiled,

    // Persistence Errors (project store)
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    #[error("Project store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("Project store returned status {status}: {message}")]
    StoreStatus { status: u16, message: String },

    #[error("Invalid response from project store: {reason}")]
    InvalidStoreResponse { reason: String },

    #[error("Remote store support not compiled. Build with --features supabase")]
    StoreNotCompiled,

    #[error("No snapshot found for recovery")]
    NoSnapshotFound,

    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Generic Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TriptychError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TriptychError::EmptyPrompt => "EMPTY_PROMPT",
            TriptychError::MissingCredential => "MISSING_CREDENTIAL",
            TriptychError::InvalidTarget { .. } => "INVALID_TARGET",
            TriptychError::GenerationPending { .. } => "GENERATION_PENDING",
            TriptychError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            TriptychError::ServiceTimeout { .. } => "SERVICE_TIMEOUT",
            TriptychError::ServiceStatus { .. } => "SERVICE_STATUS",
            TriptychError::InvalidServiceResponse { .. } => "INVALID_SERVICE_RESPONSE",
            TriptychError::ProviderNotCompiled => "PROVIDER_NOT_COMPILED",
            TriptychError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            TriptychError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            TriptychError::StoreStatus { .. } => "STORE_STATUS",
            TriptychError::InvalidStoreResponse { .. } => "INVALID_STORE_RESPONSE",
            TriptychError::StoreNotCompiled => "STORE_NOT_COMPILED",
            TriptychError::NoSnapshotFound => "NO_SNAPSHOT_FOUND",
            TriptychError::FileReadError { .. } => "FILE_READ_ERROR",
            TriptychError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            TriptychError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            TriptychError::Io(_) => "IO_ERROR",
            TriptychError::Serialization(_) => "SERIALIZATION_ERROR",
            TriptychError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Classify this error for reporting purposes
    pub fn class(&self) -> ErrorClass {
        match self {
            TriptychError::EmptyPrompt
            | TriptychError::MissingCredential
            | TriptychError::InvalidTarget { .. }
            | TriptychError::GenerationPending { .. } => ErrorClass::Validation,

            TriptychError::ServiceUnavailable { .. }
            | TriptychError::ServiceTimeout { .. }
            | TriptychError::ServiceStatus { .. }
            | TriptychError::InvalidServiceResponse { .. }
            | TriptychError::ProviderNotCompiled => ErrorClass::Service,

            TriptychError::ProjectNotFound { .. }
            | TriptychError::StoreUnavailable { .. }
            | TriptychError::StoreStatus { .. }
            | TriptychError::InvalidStoreResponse { .. }
            | TriptychError::StoreNotCompiled
            | TriptychError::NoSnapshotFound => ErrorClass::Persistence,

            TriptychError::FileReadError { .. }
            | TriptychError::FileWriteError { .. }
            | TriptychError::DirectoryCreateError { .. }
            | TriptychError::Io(_) => ErrorClass::Io,

            TriptychError::Serialization(_) | TriptychError::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Check if this error is worth retrying or fixable by the user
    pub fn is_recoverable(&self) -> bool {
        match self {
            TriptychError::EmptyPrompt => true,
            TriptychError::MissingCredential => true,
            TriptychError::GenerationPending { .. } => true,
            TriptychError::ServiceUnavailable { .. } => true,
            TriptychError::ServiceTimeout { .. } => true,
            TriptychError::ServiceStatus { .. } => true,
            TriptychError::StoreUnavailable { .. } => true,
            TriptychError::StoreStatus { .. } => true,
            TriptychError::FileWriteError { .. } => true,
            _ => false,
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TriptychError::EmptyPrompt => vec![
                "Describe what you want the generator to produce",
                "Try one of the suggested prompts",
            ],
            TriptychError::MissingCredential => vec![
                "Set the key with 'triptych-cli set-key <KEY>'",
                "Or export TRIPTYCH_GEMINI_API_KEY in the environment",
            ],
            TriptychError::GenerationPending { .. } => vec![
                "Wait for the current generation to finish",
                "Each buffer accepts one generation request at a time",
            ],
            TriptychError::ServiceUnavailable { .. } => vec![
                "Check your network connection",
                "The provider may be down, try again shortly",
            ],
            TriptychError::ServiceTimeout { .. } => vec![
                "Try a shorter prompt",
                "Raise the timeout with TRIPTYCH_GEMINI_TIMEOUT_MS",
            ],
            TriptychError::ServiceStatus { .. } => vec![
                "Verify the API key is valid and has quota left",
                "Check the provider's status page",
            ],
            TriptychError::ProviderNotCompiled => vec![
                "Rebuild with 'cargo build --features gemini'",
                "Or use the mock provider for offline work",
            ],
            TriptychError::StoreUnavailable { .. } => vec![
                "Check your network connection",
                "Verify TRIPTYCH_STORE_URL points to the right host",
            ],
            TriptychError::StoreNotCompiled => vec![
                "Rebuild with 'cargo build --features supabase'",
                "Local snapshots keep working without the remote store",
            ],
            TriptychError::NoSnapshotFound => vec![
                "Snapshots are written once you start editing",
                "Check the snapshot directory passed to 'recover'",
            ],
            TriptychError::FileWriteError { .. } => vec![
                "Check the target directory exists and is writable",
                "Free up disk space if the volume is full",
            ],
            _ => vec![],
        }
    }

    /// Get a user-friendly message for this error
    pub fn friendly_message(&self) -> String {
        match self {
            TriptychError::MissingCredential => {
                "There's no API key configured yet. Run 'triptych-cli set-key <KEY>' \
                 once and generation will work from then on."
                    .to_string()
            }
            TriptychError::GenerationPending { target } => {
                format!(
                    "The {} buffer is still waiting on a previous generation. \
                     Give it a moment and try again.",
                    target
                )
            }
            TriptychError::ServiceTimeout { timeout_ms } => {
                format!(
                    "The generation service didn't answer within {}s. Your code was \
                     left untouched, so it's safe to just retry.",
                    timeout_ms / 1000
                )
            }
            TriptychError::InvalidServiceResponse { .. } => {
                "The generation service answered with something unexpected. Your code \
                 was left untouched."
                    .to_string()
            }
            TriptychError::ProjectNotFound { id } => {
                format!(
                    "I couldn't find a project with id '{}'. It may have been deleted \
                     from another session.",
                    id
                )
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TriptychError::MissingCredential;
        assert_eq!(err.error_code(), "MISSING_CREDENTIAL");

        let err = TriptychError::GenerationPending {
            target: "style".to_string(),
        };
        assert_eq!(err.error_code(), "GENERATION_PENDING");
    }

    #[test]
    fn test_error_classes() {
        assert_eq!(TriptychError::EmptyPrompt.class(), ErrorClass::Validation);
        assert_eq!(
            TriptychError::ServiceTimeout { timeout_ms: 1000 }.class(),
            ErrorClass::Service
        );
        assert_eq!(
            TriptychError::ProjectNotFound {
                id: "abc".to_string()
            }
            .class(),
            ErrorClass::Persistence
        );
        assert_eq!(
            TriptychError::Internal("oops".to_string()).class(),
            ErrorClass::Internal
        );
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = TriptychError::MissingCredential;
        assert!(!err.recovery_suggestions().is_empty());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_not_compiled_is_not_recoverable() {
        assert!(!TriptychError::ProviderNotCompiled.is_recoverable());
        assert!(!TriptychError::StoreNotCompiled.is_recoverable());
    }

    #[test]
    fn test_friendly_message_falls_back_to_display() {
        let err = TriptychError::EmptyPrompt;
        assert_eq!(err.friendly_message(), err.to_string());
    }
}
