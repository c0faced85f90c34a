use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::JobStatus;
use crate::platform::TransportError;

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown {software} version '{version}'{}", hint(.available))]
    UnknownVersion {
        software: String,
        version: String,
        available: Vec<String>,
    },

    #[error("cannot {operation} a job in state {actual}: requires {required}")]
    InvalidState {
        operation: &'static str,
        required: JobStatus,
        actual: JobStatus,
    },

    #[error("job already created with id {0}")]
    AlreadyCreated(String),

    #[error("job {id} already executed (status {status})")]
    AlreadyExecuted { id: String, status: JobStatus },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("file {} has not been uploaded", .0.display())]
    UnresolvedFile(PathBuf),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

/// A single failing field, e.g. `analyses[0].command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every structural problem found while validating a job, collected in one
/// pass so callers can fix them all at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// `Ok(())` when no field failed.
    pub fn check(errors: Vec<FieldError>) -> Result<(), ValidationError> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
