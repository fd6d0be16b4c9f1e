//! Built-in scenarios exercising the storage core.

use super::{check, HarnessError, ScenarioResult, TestRegistry};
use crate::ecs::{Component, ComponentManager, EntityId, SparseSet, World};
use crate::error::EcsError;

#[derive(Debug, Clone, PartialEq)]
struct NameComponent {
    name: String,
}

impl Component for NameComponent {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValueComponent {
    value: u32,
}

impl Component for ValueComponent {}

/// Registers every storage-core scenario, in a fixed order.
///
/// # Errors
///
/// Returns [`HarnessError::DuplicateScenario`] if one of the names is already
/// taken in `registry`.
pub fn register_core_scenarios(registry: &mut TestRegistry) -> Result<(), HarnessError> {
    registry.register("test_the_test", test_the_test)?;
    registry.register("sparse_set_simple", sparse_set_simple)?;
    registry.register("sparse_set_modifying_last_element", sparse_set_modifying_last_element)?;
    registry.register("sparse_set_capacity_boundary", sparse_set_capacity_boundary)?;
    registry.register("component_manager", component_manager)?;
    registry.register("world", world)?;
    registry.register("world_stale_handle", world_stale_handle)?;
    Ok(())
}

fn test_the_test() -> ScenarioResult {
    check(true, "This should never fail.")
}

fn sparse_set_simple() -> ScenarioResult {
    let mut set = SparseSet::<String>::new(10);
    let first = EntityId::new(4, 0);
    let second = EntityId::new(8, 0);

    set.try_add(first, "First element".to_owned())?;
    check(set.contains(first), "4 missing after add")?;
    check(!set.contains(second), "8 present before add")?;
    set.validate()?;

    set.try_add(second, "Second element".to_owned())?;
    check(set.contains(first), "4 missing after second add")?;
    check(set.contains(second), "8 missing after add")?;
    set.validate()?;

    set.try_remove(first)?;
    set.validate()?;
    check(set.contains(second), "8 lost by swap-remove of 4")?;
    check(!set.contains(first), "4 still present after remove")
}

fn sparse_set_modifying_last_element() -> ScenarioResult {
    let mut set = SparseSet::<String>::new(10);
    let first = EntityId::new(4, 0);
    let second = EntityId::new(8, 0);

    set.try_add(first, "First element".to_owned())?;
    check(!set.contains(second), "8 present before add")?;
    set.validate()?;
    set.try_add(second, "Second element".to_owned())?;
    set.validate()?;
    set.try_remove(second)?;
    set.validate()?;
    set.try_remove(first)?;
    set.validate()?;
    check(set.is_empty(), "set not empty after removing everything")
}

fn sparse_set_capacity_boundary() -> ScenarioResult {
    let mut set = SparseSet::<u32>::new(10);

    set.try_add(EntityId::new(9, 0), 9)?;
    let overflow = set.try_add(EntityId::new(10, 0), 10);
    check(
        overflow
            == Err(EcsError::CapacityExceeded {
                index: 10,
                capacity: 10,
            }),
        format!("add at capacity returned {overflow:?}"),
    )?;
    set.validate()?;
    Ok(())
}

fn component_manager() -> ScenarioResult {
    type Manager = ComponentManager<(NameComponent, ValueComponent)>;
    check(Manager::COMPONENT_TYPE_COUNT == 2, "expected two component types")?;

    let mut manager = Manager::default();
    let entity = EntityId::new(5, 0);

    manager.try_add_component(entity, ValueComponent { value: 5 })?;
    let removed = manager.try_remove_component::<ValueComponent, _>(entity)?;
    check(removed.value == 5, "removed value differs from added value")?;
    check(
        !manager.contains_component::<ValueComponent, _>(entity),
        "value still present after remove",
    )?;
    check(
        manager.sparse_set::<NameComponent, _>().is_empty(),
        "name storage touched by value operations",
    )?;
    manager.validate()?;
    Ok(())
}

fn world() -> ScenarioResult {
    let mut world = World::<(NameComponent, ValueComponent)>::default();

    let entity = world.try_new_entity()?;
    world.try_add_component(
        entity,
        NameComponent {
            name: "random".to_owned(),
        },
    )?;
    check(world.delete_entity(entity), "delete of live entity refused")?;
    check(
        !world.component_manager().has_any_component(entity),
        "deleted entity still owns components",
    )?;

    let car1 = world.try_new_entity()?;
    let car2 = world.try_new_entity()?;
    world.try_add_component(car1, ValueComponent { value: 0 })?;
    world.try_add_component(car2, ValueComponent { value: 1 })?;

    let manager = world.component_manager();
    let mut seen = Vec::new();
    for entity in manager.get_entities_with_components::<(ValueComponent,), _>() {
        let value = manager.try_get_component::<ValueComponent, _>(entity)?.value;
        let expected = if entity == car1 { 0 } else { 1 };
        check(value == expected, format!("{entity} holds {value}"))?;
        seen.push(entity);
    }

    seen.sort_unstable();
    let mut expected = vec![car1, car2];
    expected.sort_unstable();
    check(seen == expected, format!("query returned {seen:?}"))
}

fn world_stale_handle() -> ScenarioResult {
    let mut world = World::<(ValueComponent,)>::new(1);

    let old = world.try_new_entity()?;
    world.try_add_component(old, ValueComponent { value: 1 })?;
    world.delete_entity(old);

    let late = world.try_add_component(old, ValueComponent { value: 3 });
    check(
        late == Err(EcsError::DeadEntity { entity: old }),
        format!("attach through deleted handle returned {late:?}"),
    )?;

    let new = world.try_new_entity()?;
    world.try_add_component(new, ValueComponent { value: 2 })?;

    check(new.index() == old.index(), "single-slot world did not recycle")?;
    check(!world.is_alive(old), "stale handle reported alive")?;

    let manager = world.component_manager();
    check(
        !manager.contains_component::<ValueComponent, _>(old),
        "stale handle sees the new entity's component",
    )?;
    check(
        manager.try_get_component::<ValueComponent, _>(old).is_err(),
        "stale handle read succeeded",
    )?;
    check(!world.delete_entity(old), "stale handle deleted the new entity")
}
