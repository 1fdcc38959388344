use thiserror::Error;

/// Errors raised while loading settings at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required setting '{setting_name}' is missing")]
    MissingRequiredSetting { setting_name: String },

    #[error("Invalid setting '{setting_name}': {reason}")]
    InvalidSetting { setting_name: String, reason: String },

    #[error("Failed to parse setting '{setting_name}': {error}")]
    ParseError { setting_name: String, error: String },
}

impl ConfigError {
    pub fn missing(setting_name: &str) -> Self {
        Self::MissingRequiredSetting {
            setting_name: setting_name.to_string(),
        }
    }

    pub fn invalid(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(setting_name: &str, error: impl ToString) -> Self {
        Self::ParseError {
            setting_name: setting_name.to_string(),
            error: error.to_string(),
        }
    }
}
