//! # World Configuration
//!
//! Loaded once at startup from TOML:
//!
//! ```toml
//! capacity = 4096
//! identifier_policy = "recycle"   # or "monotonic"
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EcsError, EcsResult};

/// How the world hands out identifier indices after deletions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierPolicy {
    /// Deleted indices go back on a free list and are reused with a bumped
    /// generation.
    #[default]
    Recycle,
    /// Indices are handed out once, in increasing order. Deleted entities
    /// never come back; the world is exhausted after `capacity` creations.
    Monotonic,
}

/// Configuration of a [`World`](crate::World).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Maximum number of simultaneously allocated identifiers. Also the
    /// capacity of every component container.
    pub capacity: usize,
    /// Identifier reuse strategy.
    pub identifier_policy: IdentifierPolicy,
}

impl WorldConfig {
    /// Capacity used when none is configured.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a configuration with the given capacity and default policy.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the document does not parse or
    /// fails [`WorldConfig::validate`].
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|err| EcsError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the file cannot be read, does
    /// not parse, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> EcsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| {
            EcsError::InvalidConfig(format!("cannot read {}: {err}", path.display()))
        })?;

        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "world config loaded");
        Ok(config)
    }

    /// Checks the capacity bounds.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if `capacity` is zero or exceeds
    /// `u32::MAX`.
    pub fn validate(&self) -> EcsResult<()> {
        if self.capacity == 0 {
            return Err(EcsError::InvalidConfig(
                "capacity must be greater than zero".to_owned(),
            ));
        }
        if self.capacity > u32::MAX as usize {
            return Err(EcsError::InvalidConfig(format!(
                "capacity {} cannot exceed {}",
                self.capacity,
                u32::MAX
            )));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            identifier_policy: IdentifierPolicy::default(),
        }
    }
}
