use thiserror::Error;

use crate::types::internal::access::Action;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Permission denied: {action}")]
    PermissionDenied { action: Action },
}

impl AccessError {
    pub fn denied(action: Action) -> Self {
        Self::PermissionDenied { action }
    }
}
