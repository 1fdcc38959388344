use thiserror::Error;

/// A derived flag or counter disagrees with its defining predicate.
/// Indicates a cascade bug, never a caller mistake.
#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Invariant violation on {entity}: {detail}")]
    InvariantViolation { entity: String, detail: String },
}

impl CascadeError {
    pub fn violation(entity: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            entity: entity.into(),
            detail: detail.into(),
        }
    }
}
