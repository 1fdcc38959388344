use std::collections::HashMap;

/// Source of environment variables for settings loading
///
/// Settings read through this trait so tests can supply values without
/// touching the process environment.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Environment backed by an in-memory map
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl EnvironmentProvider for MapEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
