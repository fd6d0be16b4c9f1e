//! # Core Error Types
//!
//! All errors that can occur in the storage core.
//!
//! Capacity, duplicate and missing-entry errors are caller contract
//! violations. The panicking operations (`add`, `remove`, `get`, ...) turn
//! them into a panic; the `try_*` twins hand them back as values.

use crate::ecs::EntityId;
use thiserror::Error;

/// Errors that can occur in the storage core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Identifier index is outside the configured capacity.
    #[error("entity index {index} exceeds capacity {capacity}")]
    CapacityExceeded {
        /// The rejected index.
        index: u32,
        /// The configured capacity.
        capacity: usize,
    },

    /// The entity already holds a component in this container.
    #[error("entity {entity} already has this component")]
    DuplicateComponent {
        /// The entity that was added twice.
        entity: EntityId,
    },

    /// The index slot is held by another generation of the same index.
    #[error("entity {entity} is stale, slot is held by {occupant}")]
    StaleEntity {
        /// The handle that was used.
        entity: EntityId,
        /// The handle currently stored under the same index.
        occupant: EntityId,
    },

    /// The handle refers to an entity that was deleted or never created.
    #[error("entity {entity} is not alive")]
    DeadEntity {
        /// The handle that was used.
        entity: EntityId,
    },

    /// The entity holds no component in this container.
    #[error("entity {entity} has no such component")]
    MissingComponent {
        /// The entity that was looked up.
        entity: EntityId,
    },

    /// A container failed its consistency self-check.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Every identifier the world can hand out is in use.
    #[error("entity capacity {capacity} exhausted")]
    EntitiesExhausted {
        /// The configured capacity.
        capacity: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations.
pub type EcsResult<T> = Result<T, EcsError>;

/// Logs a contract violation and aborts the current operation.
///
/// Used by the panicking forms of the container operations.
#[cold]
#[track_caller]
pub(crate) fn contract_violation(err: &EcsError) -> ! {
    tracing::error!(error = %err, "contract violation");
    panic!("contract violation: {err}");
}
