use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::forms::FieldError;

/// Closed set of submission failures, one rendering rule per kind.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Field-scoped validation failures; the submission never reached the
    /// network.
    #[error("{0}")]
    Validation(FieldErrors),

    /// The candidate identifier/email is taken, or the availability check
    /// itself failed (treated as taken, failing closed).
    #[error("{field} is already in use")]
    Conflict { field: &'static str },

    /// One upload failed, aborting the whole submission. Named after the
    /// offending file; stragglers are left to finish unobserved.
    #[error("Error uploading {file_name}")]
    Upload { file_id: Uuid, file_name: String },

    /// The record-create call failed. Already-uploaded objects stay
    /// orphaned in storage.
    #[error("Error creating {record}")]
    Create { record: &'static str },
}

impl SubmitError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        SubmitError::Validation(FieldErrors(errors))
    }
}

#[derive(Debug, Clone)]
pub struct FieldErrors(pub Vec<FieldError>);

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}
