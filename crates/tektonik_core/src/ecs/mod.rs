//! # Entity Component System
//!
//! Sparse set storage with a compile-time closed component list.
//!
//! ## Design Philosophy
//!
//! - All storage is pre-allocated at world creation
//! - Components are stored in dense arrays for cache efficiency
//! - Entity IDs are simple indices with generation counters
//! - No dynamic dispatch and no type registry in the typed hot paths

mod allocator;
mod component;
mod entity;
mod manager;
mod query;
mod sparse_set;
mod world;

pub use allocator::EntityAllocator;
pub use component::{Component, ComponentList, ComponentQuery, ComponentStorage, Slot};
pub use entity::EntityId;
pub use manager::ComponentManager;
pub use query::{EntityQuery, EntityQueryIter};
pub use sparse_set::{EntitySet, SparseSet};
pub use world::World;
