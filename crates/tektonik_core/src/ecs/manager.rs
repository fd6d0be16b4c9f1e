//! # Component Manager
//!
//! Owns one [`SparseSet`] per declared component type and routes typed
//! operations to the right one.
//!
//! Every typed method carries an inferred slot parameter `I` (see
//! [`Slot`](super::Slot)). Callers that pass a value never name it; callers
//! that only name the type write `_`:
//!
//! ```rust,ignore
//! manager.add_component(entity, Value { value: 5 });
//! manager.remove_component::<Value, _>(entity);
//! for entity in manager.get_entities_with_components::<(Value,), _>() {
//!     let value = manager.get_component::<Value, _>(entity);
//! }
//! ```

use super::component::{Component, ComponentList, ComponentQuery, ComponentStorage};
use super::entity::EntityId;
use super::query::EntityQuery;
use super::sparse_set::SparseSet;
use crate::config::WorldConfig;
use crate::error::EcsResult;

/// Fixed set of component containers for the component list `L`.
///
/// `L` is a tuple of [`Component`] types, e.g. `(Name, Value)`. The list is
/// closed: using a type outside it is a compile error.
pub struct ComponentManager<L: ComponentList> {
    /// One sparse set per declared type.
    sets: L::Sets,
    /// Capacity shared by every set.
    capacity: usize,
}

impl<L: ComponentList> ComponentManager<L> {
    /// Number of declared component types.
    pub const COMPONENT_TYPE_COUNT: usize = L::COMPONENT_TYPE_COUNT;

    /// Creates every container with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        tracing::debug!(
            capacity,
            component_types = L::COMPONENT_TYPE_COUNT,
            "component manager created"
        );

        Self {
            sets: L::new_sets(capacity),
            capacity,
        }
    }

    /// Returns the capacity shared by every container.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Attaches `value` to `id`.
    ///
    /// # Panics
    ///
    /// Panics on a capacity, duplicate or stale-handle violation.
    #[inline]
    #[track_caller]
    pub fn add_component<C: Component, I>(&mut self, id: EntityId, value: C)
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set_mut().add(id, value);
    }

    /// Attaches `value` to `id`, reporting violations as errors.
    ///
    /// # Errors
    ///
    /// See [`SparseSet::try_add`].
    #[inline]
    pub fn try_add_component<C: Component, I>(&mut self, id: EntityId, value: C) -> EcsResult<()>
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set_mut().try_add(id, value)
    }

    /// Detaches and returns the `C` of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no `C`.
    #[inline]
    #[track_caller]
    pub fn remove_component<C: Component, I>(&mut self, id: EntityId) -> C
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set_mut().remove(id)
    }

    /// Detaches and returns the `C` of `id`.
    ///
    /// # Errors
    ///
    /// See [`SparseSet::try_remove`].
    #[inline]
    pub fn try_remove_component<C: Component, I>(&mut self, id: EntityId) -> EcsResult<C>
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set_mut().try_remove(id)
    }

    /// Gets the `C` of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no `C`.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn get_component<C: Component, I>(&self, id: EntityId) -> &C
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set().get(id)
    }

    /// Gets the `C` of `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no `C`.
    #[inline]
    #[track_caller]
    pub fn get_component_mut<C: Component, I>(&mut self, id: EntityId) -> &mut C
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set_mut().get_mut(id)
    }

    /// Gets the `C` of `id`.
    ///
    /// # Errors
    ///
    /// See [`SparseSet::try_get`].
    #[inline]
    pub fn try_get_component<C: Component, I>(&self, id: EntityId) -> EcsResult<&C>
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set().try_get(id)
    }

    /// Gets the `C` of `id` mutably.
    ///
    /// # Errors
    ///
    /// See [`SparseSet::try_get_mut`].
    #[inline]
    pub fn try_get_component_mut<C: Component, I>(&mut self, id: EntityId) -> EcsResult<&mut C>
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set_mut().try_get_mut(id)
    }

    /// Checks whether `id` has a `C`.
    #[inline]
    #[must_use]
    pub fn contains_component<C: Component, I>(&self, id: EntityId) -> bool
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set().contains(id)
    }

    /// The container of `C`.
    #[inline]
    #[must_use]
    pub fn sparse_set<C: Component, I>(&self) -> &SparseSet<C>
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set()
    }

    /// The container of `C`, mutably.
    #[inline]
    pub fn sparse_set_mut<C: Component, I>(&mut self) -> &mut SparseSet<C>
    where
        L::Sets: ComponentStorage<C, I>,
    {
        self.sets.sparse_set_mut()
    }

    /// Entities holding every component of the tuple `Q`.
    ///
    /// The smallest queried container drives the iteration. The query
    /// borrows the manager, so reads are allowed while iterating and
    /// mutations are not.
    #[must_use]
    pub fn get_entities_with_components<Q, I>(&self) -> EntityQuery<'_>
    where
        Q: ComponentQuery<L::Sets, I>,
    {
        EntityQuery::new(Q::entity_sets(&self.sets))
    }

    /// Removes `id` from every container that holds it.
    ///
    /// Containers that never held `id` are left alone. Returns the number of
    /// components removed.
    pub fn remove_all(&mut self, id: EntityId) -> usize {
        L::remove_all(&mut self.sets, id)
    }

    /// Drops every component stored under `index`, whatever generation
    /// attached it. Returns the number of components dropped.
    ///
    /// The world uses this when an index is retired or handed out again, so
    /// values written through a stale handle cannot outlive the index.
    pub fn evict_index(&mut self, index: u32) -> usize {
        L::evict_all(&mut self.sets, index)
    }

    /// Whether `id` holds any component at all.
    #[must_use]
    pub fn has_any_component(&self, id: EntityId) -> bool {
        L::contains_any(&self.sets, id)
    }

    /// Number of components stored per type, in declaration order.
    #[must_use]
    pub fn component_counts(&self) -> L::Counts {
        L::lens(&self.sets)
    }

    /// Drops every component of every type.
    pub fn clear(&mut self) {
        L::clear_all(&mut self.sets);
    }

    /// Runs the consistency self-check of every container.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn validate(&self) -> EcsResult<()> {
        L::validate_all(&self.sets)
    }

    /// Returns `true` if every container passes its self-check.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl<L: ComponentList> Default for ComponentManager<L> {
    fn default() -> Self {
        Self::new(WorldConfig::DEFAULT_CAPACITY)
    }
}
