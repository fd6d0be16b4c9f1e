//! # TEKTONIK Core Engine
//!
//! Entity component storage built on fixed-capacity sparse sets:
//! - O(1) add, remove and lookup per component type
//! - Densely packed component values for iteration
//! - A closed, compile-time component list with no runtime type registry
//!
//! ## Architecture Rules
//!
//! 1. **No growth after creation** - Every container is pre-allocated
//! 2. **One authority over identifiers** - Only the [`World`] mints entities
//! 3. **Fail fast** - Contract violations panic; `try_*` forms return [`EcsError`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use tektonik_core::{Component, World};
//!
//! #[derive(Debug, PartialEq)]
//! struct Value { value: u32 }
//! impl Component for Value {}
//!
//! let mut world: World<(Value,)> = World::new(1024);
//! let entity = world.new_entity();
//! world.add_component(entity, Value { value: 1 });
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod harness;

pub use config::{IdentifierPolicy, WorldConfig};
pub use ecs::{
    Component, ComponentList, ComponentManager, ComponentQuery, ComponentStorage,
    EntityAllocator, EntityId, EntityQuery, EntitySet, SparseSet, World,
};
pub use error::{EcsError, EcsResult};
pub use harness::{check, register_core_scenarios, TestRegistry, TestReport};
