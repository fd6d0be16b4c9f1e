//! # Component System
//!
//! Components are pure data containers with no behavior.
//!
//! A world declares its closed list of component types as a tuple, e.g.
//! `(Name, Value)`. Each type gets one [`SparseSet`] and a positional
//! [`Slot`] resolved at compile time:
//!
//! ```text
//! (Name, Value)  ->  Sets = (SparseSet<Name>, SparseSet<Value>)
//!                    Name  -> Slot<0>
//!                    Value -> Slot<1>
//! ```
//!
//! The slot is an inferred type parameter on every typed operation, so
//! dispatch is a plain tuple field access. Asking for a type that is not in
//! the list, or that appears twice, does not compile.

use std::fmt;

use super::entity::EntityId;
use super::sparse_set::{EntitySet, SparseSet};
use crate::error::EcsResult;

/// Marker trait for ECS components.
///
/// Components are plain data records; an entity holds at most one value of
/// each component type. They compare by value and print for diagnostics,
/// which `#[derive(Debug, PartialEq)]` provides.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Value {
///     value: u32,
/// }
///
/// impl Component for Value {}
/// ```
pub trait Component: fmt::Debug + PartialEq + 'static {}

/// Positional index of a component type inside a [`ComponentList`].
///
/// Only ever used as a type; callers let it be inferred with `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot<const N: usize>;

/// A closed, compile-time list of component types.
///
/// Implemented for tuples of up to twelve [`Component`] types.
pub trait ComponentList: 'static {
    /// One sparse set per declared type, in declaration order.
    type Sets;

    /// One `usize` per declared type, e.g. `[usize; 2]`.
    type Counts: Copy + AsRef<[usize]> + fmt::Debug + PartialEq;

    /// Number of declared component types.
    const COMPONENT_TYPE_COUNT: usize;

    /// Creates every sparse set with the same capacity.
    fn new_sets(capacity: usize) -> Self::Sets;

    /// Removes `id` from every set that holds it, returning how many did.
    ///
    /// Sets that never held `id` are skipped, never reported.
    fn remove_all(sets: &mut Self::Sets, id: EntityId) -> usize;

    /// Removes whatever every set stores under `index`, regardless of the
    /// generation that wrote it. Returns how many values were dropped.
    fn evict_all(sets: &mut Self::Sets, index: u32) -> usize;

    /// Whether any set holds a value for `id`.
    fn contains_any(sets: &Self::Sets, id: EntityId) -> bool;

    /// Runs the consistency self-check of every set.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    fn validate_all(sets: &Self::Sets) -> EcsResult<()>;

    /// Empties every set.
    fn clear_all(sets: &mut Self::Sets);

    /// Number of values held by each set, in declaration order.
    fn lens(sets: &Self::Sets) -> Self::Counts;
}

/// Compile-time routing from a component type to its sparse set.
///
/// `I` is the [`Slot`] of `C` in the owning list.
pub trait ComponentStorage<C: Component, I> {
    /// The sparse set holding `C`.
    fn sparse_set(&self) -> &SparseSet<C>;

    /// The sparse set holding `C`, mutably.
    fn sparse_set_mut(&mut self) -> &mut SparseSet<C>;
}

/// A combination of component types to intersect.
///
/// Implemented for tuples of up to eight component types; `I` is the tuple
/// of their slots in the set collection `S`.
pub trait ComponentQuery<S, I> {
    /// Number of component types in the query.
    const ARITY: usize;

    /// Membership views of the queried sets, in query order.
    fn entity_sets(sets: &S) -> Vec<&dyn EntitySet>;
}

macro_rules! impl_component_list {
    (@storage ($($all:ident),+);) => {};
    (@storage ($($all:ident),+); $c:ident $i:tt $(, $rest:ident $ri:tt)*) => {
        impl<$($all: Component),+> ComponentStorage<$c, Slot<$i>> for ($(SparseSet<$all>,)+) {
            #[inline(always)]
            fn sparse_set(&self) -> &SparseSet<$c> {
                &self.$i
            }

            #[inline(always)]
            fn sparse_set_mut(&mut self) -> &mut SparseSet<$c> {
                &mut self.$i
            }
        }

        impl_component_list!(@storage ($($all),+); $($rest $ri),*);
    };
    ($count:literal; $($c:ident $i:tt),+) => {
        impl<$($c: Component),+> ComponentList for ($($c,)+) {
            type Sets = ($(SparseSet<$c>,)+);
            type Counts = [usize; $count];

            const COMPONENT_TYPE_COUNT: usize = $count;

            fn new_sets(capacity: usize) -> Self::Sets {
                ($(SparseSet::<$c>::new(capacity),)+)
            }

            fn remove_all(sets: &mut Self::Sets, id: EntityId) -> usize {
                let mut removed = 0;
                $(
                    if sets.$i.contains(id) {
                        let value = sets.$i.remove(id);
                        tracing::trace!(entity = %id, slot = $i, ?value, "component removed by cascade");
                        removed += 1;
                    }
                )+
                removed
            }

            fn evict_all(sets: &mut Self::Sets, index: u32) -> usize {
                let mut evicted = 0;
                $(
                    if let Some((owner, value)) = sets.$i.evict(index) {
                        tracing::trace!(entity = %owner, slot = $i, ?value, "component evicted");
                        evicted += 1;
                    }
                )+
                evicted
            }

            fn contains_any(sets: &Self::Sets, id: EntityId) -> bool {
                false $(|| sets.$i.contains(id))+
            }

            fn validate_all(sets: &Self::Sets) -> EcsResult<()> {
                $(sets.$i.validate()?;)+
                Ok(())
            }

            fn clear_all(sets: &mut Self::Sets) {
                $(sets.$i.clear();)+
            }

            fn lens(sets: &Self::Sets) -> Self::Counts {
                [$(sets.$i.len()),+]
            }
        }

        impl_component_list!(@storage ($($c),+); $($c $i),+);
    };
}

impl_component_list!(1; T0 0);
impl_component_list!(2; T0 0, T1 1);
impl_component_list!(3; T0 0, T1 1, T2 2);
impl_component_list!(4; T0 0, T1 1, T2 2, T3 3);
impl_component_list!(5; T0 0, T1 1, T2 2, T3 3, T4 4);
impl_component_list!(6; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
impl_component_list!(7; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
impl_component_list!(8; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
impl_component_list!(9; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
impl_component_list!(10; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
impl_component_list!(11; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
impl_component_list!(12; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);

macro_rules! impl_component_query {
    ($count:literal; $($c:ident $i:ident),+) => {
        impl<S, $($c: Component, $i),+> ComponentQuery<S, ($($i,)+)> for ($($c,)+)
        where
            $(S: ComponentStorage<$c, $i>,)+
        {
            const ARITY: usize = $count;

            fn entity_sets(sets: &S) -> Vec<&dyn EntitySet> {
                vec![$(<S as ComponentStorage<$c, $i>>::sparse_set(sets) as &dyn EntitySet),+]
            }
        }
    };
}

impl_component_query!(1; Q0 I0);
impl_component_query!(2; Q0 I0, Q1 I1);
impl_component_query!(3; Q0 I0, Q1 I1, Q2 I2);
impl_component_query!(4; Q0 I0, Q1 I1, Q2 I2, Q3 I3);
impl_component_query!(5; Q0 I0, Q1 I1, Q2 I2, Q3 I3, Q4 I4);
impl_component_query!(6; Q0 I0, Q1 I1, Q2 I2, Q3 I3, Q4 I4, Q5 I5);
impl_component_query!(7; Q0 I0, Q1 I1, Q2 I2, Q3 I3, Q4 I4, Q5 I5, Q6 I6);
impl_component_query!(8; Q0 I0, Q1 I1, Q2 I2, Q3 I3, Q4 I4, Q5 I5, Q6 I6, Q7 I7);
