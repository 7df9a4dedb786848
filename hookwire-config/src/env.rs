// Environment variable loading

use crate::Result;
use std::collections::HashMap;
use std::env;

/// Prefix of every Hookwire environment variable
pub const ENV_PREFIX: &str = "HOOKWIRE";

/// Environment variable loader
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Loader for `HOOKWIRE_*` variables
    pub fn hookwire() -> Self {
        Self::new(Some(ENV_PREFIX.to_string()))
    }

    /// Load every matching variable with the prefix stripped and the key
    /// lower-cased
    pub fn load(&self) -> Result<HashMap<String, String>> {
        Ok(self.filter(env::vars()))
    }

    /// Apply the prefix rules to arbitrary key/value pairs, such as the
    /// contents of a `.env` file
    pub fn filter<I, K, V>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = HashMap::new();

        for (key, value) in vars {
            let key = key.as_ref();
            match &self.prefix {
                Some(prefix) => {
                    if let Some(rest) = key.strip_prefix(prefix.as_str())
                        && let Some(rest) = rest.strip_prefix('_')
                    {
                        config.insert(rest.to_lowercase(), value.into());
                    }
                }
                None => {
                    config.insert(key.to_lowercase(), value.into());
                }
            }
        }

        config
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
