use std::fmt;

use crate::config::EnvironmentProvider;
use crate::config::errors::ConfigError;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Application settings, loaded once at startup and shared read-only
#[derive(Clone)]
pub struct AppSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    jwt_secret: String,
    password_pepper: String,
    token_expiry_minutes: i64,
    page_limit_max: u64,
    verify_cascades: bool,
}

impl AppSettings {
    /// Load settings through an environment provider
    ///
    /// # Errors
    /// * `ConfigError::MissingRequiredSetting` - `JWT_SECRET` or `PASSWORD_PEPPER` unset
    /// * `ConfigError::InvalidSetting` / `ConfigError::ParseError` - malformed values
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://social.db?mode=rwc".to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::invalid("DATABASE_URL", "must not be empty"));
        }

        let server_host = env.get_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        if server_host.parse::<std::net::IpAddr>().is_err() && server_host != "localhost" {
            return Err(ConfigError::invalid("HOST", "must be an IP address or localhost"));
        }

        let server_port = parse_or("PORT", env.get_var("PORT"), 3000u16)?;
        if server_port == 0 {
            return Err(ConfigError::invalid("PORT", "must be between 1 and 65535"));
        }

        let jwt_secret = env
            .get_var("JWT_SECRET")
            .ok_or_else(|| ConfigError::missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::invalid(
                "JWT_SECRET",
                format!("must be at least {} characters", MIN_JWT_SECRET_LENGTH),
            ));
        }

        let password_pepper = env
            .get_var("PASSWORD_PEPPER")
            .ok_or_else(|| ConfigError::missing("PASSWORD_PEPPER"))?;
        if password_pepper.is_empty() {
            return Err(ConfigError::invalid("PASSWORD_PEPPER", "must not be empty"));
        }

        let token_expiry_minutes =
            parse_or("TOKEN_EXPIRY_MINUTES", env.get_var("TOKEN_EXPIRY_MINUTES"), 30i64)?;
        if token_expiry_minutes <= 0 {
            return Err(ConfigError::invalid("TOKEN_EXPIRY_MINUTES", "must be positive"));
        }

        let page_limit_max = parse_or("PAGE_LIMIT_MAX", env.get_var("PAGE_LIMIT_MAX"), 100u64)?;
        if page_limit_max == 0 {
            return Err(ConfigError::invalid("PAGE_LIMIT_MAX", "must be positive"));
        }

        let verify_cascades = parse_or("VERIFY_CASCADES", env.get_var("VERIFY_CASCADES"), true)?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            jwt_secret,
            password_pepper,
            token_expiry_minutes,
            page_limit_max,
            verify_cascades,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn token_expiry_minutes(&self) -> i64 {
        self.token_expiry_minutes
    }

    pub fn page_limit_max(&self) -> u64 {
        self.page_limit_max
    }

    pub fn verify_cascades(&self) -> bool {
        self.verify_cascades
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e| ConfigError::parse(name, e)),
        None => Ok(default),
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("token_expiry_minutes", &self.token_expiry_minutes)
            .field("page_limit_max", &self.page_limit_max)
            .field("verify_cascades", &self.verify_cascades)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnvironment;

    fn required() -> MapEnvironment {
        MapEnvironment::empty().with_vars(&[
            ("JWT_SECRET", "test-secret-key-minimum-32-characters-long"),
            ("PASSWORD_PEPPER", "test-pepper"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let settings = AppSettings::from_env_provider(&required()).unwrap();

        assert_eq!(settings.database_url(), "sqlite://social.db?mode=rwc");
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert_eq!(settings.token_expiry_minutes(), 30);
        assert_eq!(settings.page_limit_max(), 100);
        assert!(settings.verify_cascades());
    }

    #[test]
    fn test_overrides_applied() {
        let env = required().with_vars(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("TOKEN_EXPIRY_MINUTES", "5"),
            ("PAGE_LIMIT_MAX", "20"),
            ("VERIFY_CASCADES", "false"),
        ]);
        let settings = AppSettings::from_env_provider(&env).unwrap();

        assert_eq!(settings.database_url(), "sqlite::memory:");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.token_expiry_minutes(), 5);
        assert_eq!(settings.page_limit_max(), 20);
        assert!(!settings.verify_cascades());
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        let env = MapEnvironment::empty().with_var("PASSWORD_PEPPER", "pepper");
        let err = AppSettings::from_env_provider(&env).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingRequiredSetting { ref setting_name } if setting_name == "JWT_SECRET"
        ));
    }

    #[test]
    fn test_short_jwt_secret_fails() {
        let env = required().with_var("JWT_SECRET", "short");
        let err = AppSettings::from_env_provider(&env).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidSetting { .. }));
    }

    #[test]
    fn test_bad_port_fails() {
        let env = required().with_var("PORT", "not-a-port");
        assert!(matches!(
            AppSettings::from_env_provider(&env).unwrap_err(),
            ConfigError::ParseError { .. }
        ));

        let env = required().with_var("PORT", "0");
        assert!(matches!(
            AppSettings::from_env_provider(&env).unwrap_err(),
            ConfigError::InvalidSetting { .. }
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = AppSettings::from_env_provider(&required()).unwrap();
        let debug = format!("{:?}", settings);

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("test-secret-key"));
        assert!(!debug.contains("test-pepper"));
    }
}
