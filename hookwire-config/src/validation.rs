// Configuration validation

use crate::{ConfigError, Result};
use std::fmt::Display;
use std::path::Path;

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a path is not empty
    pub fn path_not_empty(value: &Path, field: &str) -> Result<()> {
        if value.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be an empty path",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a number is within range
    pub fn in_range<T: PartialOrd + Display>(value: T, min: T, max: T, field: &str) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                field, min, max, value
            )));
        }
        Ok(())
    }

    /// Validate that a value is in a list of allowed values
    pub fn one_of<T: PartialEq + Display>(value: &T, allowed: &[T], field: &str) -> Result<()> {
        if !allowed.contains(value) {
            let allowed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            return Err(ConfigError::ValidationError(format!(
                "{} must be one of {}, got {}",
                field,
                allowed.join(", "),
                value
            )));
        }
        Ok(())
    }
}
