//! # ECS World
//!
//! The central container for all entities and components.
//! Pre-allocates all memory at creation time.

use super::allocator::EntityAllocator;
use super::component::{Component, ComponentList, ComponentStorage};
use super::entity::EntityId;
use super::manager::ComponentManager;
use crate::config::{IdentifierPolicy, WorldConfig};
use crate::error::{contract_violation, EcsError, EcsResult};

/// The ECS World - sole authority over entity identifiers.
///
/// Owns the [`ComponentManager`] for the component list `L`. All memory is
/// pre-allocated at creation; the capacity cannot change afterwards.
///
/// An identifier moves through
/// `Unallocated -> Allocated (no components) -> Allocated (some) -> Deleted`.
/// Under [`IdentifierPolicy::Recycle`] a deleted index comes back with a new
/// generation, as a logically distinct entity with no components.
///
/// # Example
///
/// ```rust,ignore
/// let mut world: World<(Name, Value)> = World::new(1024);
///
/// let entity = world.new_entity();
/// world.add_component(entity, Value { value: 1 });
/// world.delete_entity(entity);
/// ```
pub struct World<L: ComponentList> {
    /// Identifier bookkeeping.
    allocator: EntityAllocator,
    /// Component storage, one sparse set per type.
    components: ComponentManager<L>,
}

impl<L: ComponentList> World<L> {
    /// Creates a new world with the specified entity capacity and the default
    /// identifier policy.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_config(&WorldConfig::with_capacity(capacity))
    }

    /// Creates a new world from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is zero or exceeds `u32::MAX`. A
    /// config obtained from [`WorldConfig::from_toml_str`] or
    /// [`WorldConfig::load`] is already validated.
    #[must_use]
    pub fn with_config(config: &WorldConfig) -> Self {
        tracing::debug!(
            capacity = config.capacity,
            policy = ?config.identifier_policy,
            "world created"
        );

        Self {
            allocator: EntityAllocator::new(config.capacity, config.identifier_policy),
            components: ComponentManager::new(config.capacity),
        }
    }

    /// Returns the maximum capacity of this world.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.allocator.capacity()
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.allocator.alive_count()
    }

    /// Returns the identifier reuse strategy.
    #[inline]
    #[must_use]
    pub const fn identifier_policy(&self) -> IdentifierPolicy {
        self.allocator.policy()
    }

    /// Creates an entity with no components attached.
    ///
    /// # Panics
    ///
    /// Panics if every identifier is in use.
    #[track_caller]
    pub fn new_entity(&mut self) -> EntityId {
        match self.try_new_entity() {
            Ok(id) => id,
            Err(err) => contract_violation(&err),
        }
    }

    /// Creates an entity with no components attached.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntitiesExhausted`](crate::EcsError::EntitiesExhausted)
    /// if every identifier is in use.
    pub fn try_new_entity(&mut self) -> EcsResult<EntityId> {
        let id = self.allocator.allocate()?;

        // Values attached through a stale handle may still sit on a recycled index
        let evicted = self.components.evict_index(id.index());
        if evicted > 0 {
            tracing::debug!(entity = %id, evicted, "stale components evicted");
        }

        tracing::trace!(entity = %id, "entity created");
        Ok(id)
    }

    /// Attaches `value` to the live entity `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not alive, or on any violation of
    /// [`ComponentManager::add_component`].
    #[track_caller]
    pub fn add_component<C: Component, I>(&mut self, id: EntityId, value: C)
    where
        L::Sets: ComponentStorage<C, I>,
    {
        if let Err(err) = self.try_add_component(id, value) {
            contract_violation(&err);
        }
    }

    /// Attaches `value` to the live entity `id`.
    ///
    /// Unlike the component manager, the world knows which handles are
    /// alive, so deleted and stale handles are refused here.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DeadEntity`] if `id` is deleted, stale or never created
    /// - any error of [`ComponentManager::try_add_component`]
    pub fn try_add_component<C: Component, I>(&mut self, id: EntityId, value: C) -> EcsResult<()>
    where
        L::Sets: ComponentStorage<C, I>,
    {
        if !self.allocator.is_alive(id) {
            return Err(EcsError::DeadEntity { entity: id });
        }
        self.components.try_add_component(id, value)
    }

    /// Deletes an entity and every component attached to it.
    ///
    /// Everything stored under the entity's index is dropped, including values
    /// left there through stale handles. The index is then released according
    /// to the identifier policy.
    ///
    /// # Returns
    ///
    /// `true` if the entity was deleted, `false` if it was already dead or
    /// the ID was invalid/stale.
    pub fn delete_entity(&mut self, id: EntityId) -> bool {
        if !self.allocator.is_alive(id) {
            tracing::debug!(entity = %id, "delete of dead or stale entity ignored");
            return false;
        }

        let removed = self.components.evict_index(id.index());
        self.allocator.free(id);
        tracing::trace!(entity = %id, removed, "entity deleted");

        true
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    /// Iterates over all alive entities.
    pub fn iter_alive(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.allocator.iter_alive()
    }

    /// The component manager, for queries and reads.
    #[inline]
    #[must_use]
    pub fn component_manager(&self) -> &ComponentManager<L> {
        &self.components
    }

    /// The component manager, for attaching and detaching components.
    #[inline]
    pub fn component_manager_mut(&mut self) -> &mut ComponentManager<L> {
        &mut self.components
    }
}

impl<L: ComponentList> Default for World<L> {
    fn default() -> Self {
        Self::with_config(&WorldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct NameComponent {
        name: String,
    }
    impl Component for NameComponent {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct ValueComponent {
        value: u32,
    }
    impl Component for ValueComponent {}

    type TestWorld = World<(NameComponent, ValueComponent)>;

    #[test]
    fn test_world_creation() {
        let world = TestWorld::new(1000);
        assert_eq!(world.capacity(), 1000);
        assert_eq!(world.alive_count(), 0);
        assert_eq!(world.component_manager().capacity(), 1000);
        assert_eq!(world.identifier_policy(), IdentifierPolicy::Recycle);
    }

    #[test]
    fn test_new_delete() {
        let mut world = TestWorld::new(100);

        let id1 = world.new_entity();
        assert!(world.is_alive(id1));
        assert_eq!(world.alive_count(), 1);

        let id2 = world.new_entity();
        assert_eq!(world.alive_count(), 2);
        assert_ne!(id1, id2);

        assert!(world.delete_entity(id1));
        assert!(!world.is_alive(id1));
        assert!(!world.delete_entity(id1));
        assert_eq!(world.alive_count(), 1);

        // Create again - should reuse the slot
        let id3 = world.new_entity();
        assert_eq!(id3.index(), id1.index()); // Same slot
        assert_ne!(id3.generation(), id1.generation()); // Different generation
    }

    #[test]
    fn test_delete_cascades() {
        let mut world = TestWorld::new(10);

        let entity = world.new_entity();
        world.component_manager_mut().add_component(
            entity,
            NameComponent {
                name: "random".to_owned(),
            },
        );
        assert!(world.delete_entity(entity));

        let manager = world.component_manager();
        assert!(!manager.contains_component::<NameComponent, _>(entity));
        assert!(!manager.contains_component::<ValueComponent, _>(entity));
        assert!(manager.is_valid());
    }

    #[test]
    fn test_recycled_entity_starts_empty() {
        let mut world = TestWorld::new(1);

        let old = world.new_entity();
        world
            .component_manager_mut()
            .add_component(old, ValueComponent { value: 7 });
        world.delete_entity(old);

        let new = world.new_entity();
        let manager = world.component_manager();
        assert_eq!(new.index(), old.index());
        assert!(!manager.has_any_component(new));
        assert!(!manager.contains_component::<ValueComponent, _>(old));
    }

    #[test]
    fn test_exhaustion() {
        let mut world = TestWorld::with_config(&WorldConfig {
            capacity: 2,
            identifier_policy: IdentifierPolicy::Monotonic,
        });

        let a = world.new_entity();
        let _b = world.new_entity();
        world.delete_entity(a);
        assert!(world.try_new_entity().is_err());
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_new_entity_panics_when_full() {
        let mut world = TestWorld::new(1);
        let _ = world.new_entity();
        let _ = world.new_entity();
    }

    #[test]
    fn test_iter_alive() {
        let mut world = TestWorld::default();
        let a = world.new_entity();
        let b = world.new_entity();
        world.delete_entity(a);

        assert_eq!(world.iter_alive().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_add_component_refuses_dead_entity() {
        let mut world = TestWorld::new(2);
        let entity = world.new_entity();
        world.add_component(entity, ValueComponent { value: 1 });
        world.delete_entity(entity);

        assert_eq!(
            world.try_add_component(entity, ValueComponent { value: 2 }),
            Err(EcsError::DeadEntity { entity })
        );
        assert_eq!(
            world.try_add_component(EntityId::new(1, 0), ValueComponent { value: 3 }),
            Err(EcsError::DeadEntity {
                entity: EntityId::new(1, 0)
            })
        );
        assert_eq!(world.component_manager().component_counts(), [0, 0]);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_add_component_to_dead_entity_panics() {
        let mut world = TestWorld::new(1);
        let entity = world.new_entity();
        world.delete_entity(entity);
        world.add_component(entity, ValueComponent { value: 0 });
    }

    #[test]
    fn test_recycling_evicts_values_written_through_stale_handles() {
        let mut world = TestWorld::new(1);
        let old = world.new_entity();
        world.delete_entity(old);

        // The manager alone cannot tell that `old` is dead
        world
            .component_manager_mut()
            .add_component(old, ValueComponent { value: 1 });

        let new = world.new_entity();
        world.add_component(new, ValueComponent { value: 2 });
        assert_eq!(
            world
                .component_manager()
                .get_component::<ValueComponent, _>(new)
                .value,
            2
        );

        world.delete_entity(new);
        assert_eq!(world.component_manager().component_counts(), [0, 0]);
    }
}
