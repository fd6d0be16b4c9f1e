//! # Sparse Set Storage
//!
//! Pre-allocated, fixed-capacity storage for a single component type.
//!
//! The storage uses a sparse/dense strategy:
//! - `sparse[index]` holds the dense slot of the entity, or a sentinel
//! - `dense` holds the values, packed with no holes
//! - `dense_ids[i]` is the entity whose value is `dense[i]`
//!
//! Add, remove and lookup are O(1). Removal swaps the last dense element
//! into the hole, so iteration order is not stable across removals.

use super::entity::EntityId;
use crate::error::{contract_violation, EcsError, EcsResult};

/// Sentinel stored in `sparse` for indices without a value.
const INVALID_SLOT: u32 = u32::MAX;

/// Fixed-capacity sparse set keyed by [`EntityId`].
///
/// Lookups compare the full identifier, generation included, so a stale
/// handle never resolves to the value of a recycled entity.
///
/// # Type Parameters
///
/// * `T` - The value type to store
///
/// # Example
///
/// ```rust,ignore
/// let mut names: SparseSet<String> = SparseSet::new(10);
/// names.add(EntityId::new(4, 0), "First element".to_owned());
/// assert!(names.contains(EntityId::new(4, 0)));
/// ```
pub struct SparseSet<T> {
    /// Index -> dense slot. Sized to the capacity.
    sparse: Box<[u32]>,
    /// Packed values.
    dense: Vec<T>,
    /// Owner of each packed value, parallel to `dense`.
    dense_ids: Vec<EntityId>,
}

impl<T> SparseSet<T> {
    /// Creates a new sparse set able to hold indices `0..capacity`.
    ///
    /// The sparse array and both dense arrays are allocated upfront, so no
    /// allocation happens afterwards.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum identifier index + 1
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity <= u32::MAX as usize,
            "Capacity cannot exceed u32::MAX"
        );

        Self {
            sparse: vec![INVALID_SLOT; capacity].into_boxed_slice(),
            dense: Vec::with_capacity(capacity),
            dense_ids: Vec::with_capacity(capacity),
        }
    }

    /// Returns the capacity of this set.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.sparse.len()
    }

    /// Returns the number of stored values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the set holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Checks whether `id` has a value in this set.
    ///
    /// Out-of-capacity and stale handles simply report `false`.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    /// Stores `value` for `id`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of capacity or the slot is already taken.
    /// Re-adding is not an upsert.
    #[track_caller]
    pub fn add(&mut self, id: EntityId, value: T) {
        if let Err(err) = self.try_add(id, value) {
            contract_violation(&err);
        }
    }

    /// Stores `value` for `id`, reporting contract violations as errors.
    ///
    /// # Errors
    ///
    /// - [`EcsError::CapacityExceeded`] if `id.index() >= capacity`
    /// - [`EcsError::DuplicateComponent`] if `id` already has a value
    /// - [`EcsError::StaleEntity`] if another generation holds the slot
    pub fn try_add(&mut self, id: EntityId, value: T) -> EcsResult<()> {
        let index = self.check_capacity(id)?;

        let slot = self.sparse[index];
        if slot != INVALID_SLOT {
            let occupant = self.dense_ids[slot as usize];
            return Err(if occupant == id {
                EcsError::DuplicateComponent { entity: id }
            } else {
                EcsError::StaleEntity { entity: id, occupant }
            });
        }

        // dense.len() < capacity <= u32::MAX
        #[allow(clippy::cast_possible_truncation)]
        let slot = self.dense.len() as u32;
        self.sparse[index] = slot;
        self.dense.push(value);
        self.dense_ids.push(id);

        Ok(())
    }

    /// Removes and returns the value of `id` (swap-and-pop).
    ///
    /// # Panics
    ///
    /// Panics if `id` has no value in this set.
    #[track_caller]
    pub fn remove(&mut self, id: EntityId) -> T {
        match self.try_remove(id) {
            Ok(value) => value,
            Err(err) => contract_violation(&err),
        }
    }

    /// Removes and returns the value of `id` (swap-and-pop).
    ///
    /// The last dense element is moved into the freed slot and its sparse
    /// entry is patched; the dense order changes.
    ///
    /// # Errors
    ///
    /// - [`EcsError::CapacityExceeded`] if `id.index() >= capacity`
    /// - [`EcsError::MissingComponent`] if `id` has no value
    /// - [`EcsError::StaleEntity`] if another generation holds the slot
    pub fn try_remove(&mut self, id: EntityId) -> EcsResult<T> {
        let slot = self.locate(id)?;

        let value = self.dense.swap_remove(slot);
        self.dense_ids.swap_remove(slot);

        if let Some(&moved) = self.dense_ids.get(slot) {
            #[allow(clippy::cast_possible_truncation)]
            let patched = slot as u32;
            self.sparse[moved.slot()] = patched;
        }
        self.sparse[id.slot()] = INVALID_SLOT;

        Ok(value)
    }

    /// Gets the value of `id`.
    ///
    /// The borrow ends before the next mutation of this set.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no value in this set.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn get(&self, id: EntityId) -> &T {
        match self.try_get(id) {
            Ok(value) => value,
            Err(err) => contract_violation(&err),
        }
    }

    /// Gets the value of `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no value in this set.
    #[inline]
    #[track_caller]
    pub fn get_mut(&mut self, id: EntityId) -> &mut T {
        match self.locate(id) {
            Ok(slot) => &mut self.dense[slot],
            Err(err) => contract_violation(&err),
        }
    }

    /// Gets the value of `id`.
    ///
    /// # Errors
    ///
    /// Same as [`SparseSet::try_remove`].
    #[inline]
    pub fn try_get(&self, id: EntityId) -> EcsResult<&T> {
        let slot = self.locate(id)?;
        Ok(&self.dense[slot])
    }

    /// Gets the value of `id` mutably.
    ///
    /// # Errors
    ///
    /// Same as [`SparseSet::try_remove`].
    #[inline]
    pub fn try_get_mut(&mut self, id: EntityId) -> EcsResult<&mut T> {
        let slot = self.locate(id)?;
        Ok(&mut self.dense[slot])
    }

    /// Returns the owners of the stored values, in dense order.
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.dense_ids
    }

    /// Returns the stored values, in dense order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    /// Returns the stored values mutably, in dense order.
    ///
    /// Useful for batch processing.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Iterates over all values with their owners.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.dense_ids.iter().copied().zip(self.dense.iter())
    }

    /// Iterates mutably over all values with their owners.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.dense_ids.iter().copied().zip(self.dense.iter_mut())
    }

    /// Drops every value, keeping the allocation.
    pub fn clear(&mut self) {
        for id in &self.dense_ids {
            self.sparse[id.slot()] = INVALID_SLOT;
        }
        self.dense.clear();
        self.dense_ids.clear();
    }

    /// Removes the value stored under `index`, whichever generation owns it.
    ///
    /// Returns the owner and the value, or `None` if the index is empty or
    /// out of capacity.
    pub fn evict(&mut self, index: u32) -> Option<(EntityId, T)> {
        let slot = *self.sparse.get(index as usize)?;
        if slot == INVALID_SLOT {
            return None;
        }

        let owner = self.dense_ids[slot as usize];
        self.try_remove(owner).ok().map(|value| (owner, value))
    }

    /// Runs the consistency self-check.
    ///
    /// Intended for tests, not for the hot path: it walks every slot.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvariantViolation`] describing the first broken
    /// invariant found.
    pub fn validate(&self) -> EcsResult<()> {
        let violation = |message: String| Err(EcsError::InvariantViolation(message));

        if self.dense.len() != self.dense_ids.len() {
            return violation(format!(
                "dense holds {} values but {} ids",
                self.dense.len(),
                self.dense_ids.len()
            ));
        }
        if self.dense.len() > self.capacity() {
            return violation(format!(
                "dense holds {} values, capacity is {}",
                self.dense.len(),
                self.capacity()
            ));
        }

        for (slot, id) in self.dense_ids.iter().enumerate() {
            match self.sparse.get(id.slot()) {
                Some(&back) if back as usize == slot => {}
                Some(&back) => {
                    return violation(format!(
                        "dense slot {slot} owned by {id}, but sparse points to {back}"
                    ));
                }
                None => {
                    return violation(format!("dense slot {slot} owned by out-of-range {id}"));
                }
            }
        }

        let mut occupied = 0usize;
        for (index, &slot) in self.sparse.iter().enumerate() {
            if slot == INVALID_SLOT {
                continue;
            }
            occupied += 1;
            match self.dense_ids.get(slot as usize) {
                Some(owner) if owner.slot() == index => {}
                _ => {
                    return violation(format!(
                        "sparse index {index} points to dangling dense slot {slot}"
                    ));
                }
            }
        }
        if occupied != self.dense.len() {
            return violation(format!(
                "{occupied} sparse entries for {} dense values",
                self.dense.len()
            ));
        }

        Ok(())
    }

    /// Returns `true` if the consistency self-check passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Dense slot of `id`, if present with the same generation.
    #[inline]
    fn position(&self, id: EntityId) -> Option<usize> {
        let slot = *self.sparse.get(id.slot())?;
        if slot == INVALID_SLOT {
            return None;
        }
        let slot = slot as usize;
        (self.dense_ids[slot] == id).then_some(slot)
    }

    /// Dense slot of `id`, or the contract violation explaining its absence.
    #[inline]
    fn locate(&self, id: EntityId) -> EcsResult<usize> {
        let index = self.check_capacity(id)?;

        let slot = self.sparse[index];
        if slot == INVALID_SLOT {
            return Err(EcsError::MissingComponent { entity: id });
        }

        let slot = slot as usize;
        let occupant = self.dense_ids[slot];
        if occupant != id {
            return Err(EcsError::StaleEntity { entity: id, occupant });
        }

        Ok(slot)
    }

    #[inline]
    fn check_capacity(&self, id: EntityId) -> EcsResult<usize> {
        let index = id.slot();
        if index >= self.capacity() {
            return Err(EcsError::CapacityExceeded {
                index: id.index(),
                capacity: self.capacity(),
            });
        }
        Ok(index)
    }
}

/// Type-erased membership view of a [`SparseSet`].
///
/// Queries use it to walk the smallest set and probe the others without
/// knowing their value types.
pub trait EntitySet {
    /// The owners of the stored values, in dense order.
    fn entity_ids(&self) -> &[EntityId];

    /// Whether `id` has a value in this set.
    fn contains_entity(&self, id: EntityId) -> bool;
}

impl<T> EntitySet for SparseSet<T> {
    #[inline]
    fn entity_ids(&self) -> &[EntityId] {
        self.ids()
    }

    #[inline]
    fn contains_entity(&self, id: EntityId) -> bool {
        self.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> EntityId {
        EntityId::new(index, 0)
    }

    #[test]
    fn test_sparse_set_creation() {
        let set: SparseSet<u32> = SparseSet::new(1000);
        assert_eq!(set.capacity(), 1000);
        assert!(set.is_empty());
        assert!(set.is_valid());
    }

    #[test]
    fn test_sparse_set_simple() {
        let mut set: SparseSet<String> = SparseSet::new(10);

        set.add(id(4), "First element".to_owned());
        assert!(set.contains(id(4)));
        assert!(!set.contains(id(8)));
        assert!(set.is_valid());

        set.add(id(8), "Second element".to_owned());
        assert!(set.contains(id(4)));
        assert!(set.contains(id(8)));
        assert!(set.is_valid());

        assert_eq!(set.remove(id(4)), "First element");
        assert!(set.is_valid());
        assert!(set.contains(id(8)));
        assert!(!set.contains(id(4)));
        assert_eq!(set.get(id(8)), "Second element");
    }

    #[test]
    fn test_sparse_set_modifying_last_element() {
        let mut set: SparseSet<String> = SparseSet::new(10);

        set.add(id(4), "First element".to_owned());
        assert!(!set.contains(id(8)));
        assert!(set.is_valid());
        set.add(id(8), "Second element".to_owned());
        assert!(set.is_valid());
        set.remove(id(8));
        assert!(set.is_valid());
        set.remove(id(4));
        assert!(set.is_valid());
        assert!(set.is_empty());
    }

    #[test]
    fn test_swap_remove_patches_moved_entry() {
        let mut set: SparseSet<u32> = SparseSet::new(16);
        for i in 0..5 {
            set.add(id(i), i * 10);
        }

        set.remove(id(1));
        assert_eq!(set.ids()[1], id(4));
        assert_eq!(*set.get(id(4)), 40);
        assert!(set.is_valid());
    }

    #[test]
    fn test_capacity_boundary() {
        let mut set: SparseSet<u8> = SparseSet::new(10);
        assert!(set.try_add(id(9), 1).is_ok());
        assert_eq!(
            set.try_add(id(10), 2),
            Err(EcsError::CapacityExceeded {
                index: 10,
                capacity: 10
            })
        );
        assert!(!set.contains(id(10)));
        assert!(!set.contains(EntityId::NULL));
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut set: SparseSet<u8> = SparseSet::new(4);
        set.add(id(2), 1);
        assert_eq!(
            set.try_add(id(2), 2),
            Err(EcsError::DuplicateComponent { entity: id(2) })
        );
        assert_eq!(*set.get(id(2)), 1);
    }

    #[test]
    fn test_stale_generation_is_rejected() {
        let mut set: SparseSet<u8> = SparseSet::new(4);
        let old = EntityId::new(1, 0);
        let new = EntityId::new(1, 1);
        set.add(new, 7);

        assert!(!set.contains(old));
        assert_eq!(
            set.try_get(old),
            Err(EcsError::StaleEntity {
                entity: old,
                occupant: new
            })
        );
        assert_eq!(
            set.try_add(old, 3),
            Err(EcsError::StaleEntity {
                entity: old,
                occupant: new
            })
        );
    }

    #[test]
    fn test_missing_entry() {
        let mut set: SparseSet<u8> = SparseSet::new(4);
        assert_eq!(
            set.try_remove(id(3)),
            Err(EcsError::MissingComponent { entity: id(3) })
        );
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_double_add_panics() {
        let mut set: SparseSet<u8> = SparseSet::new(4);
        set.add(id(0), 1);
        set.add(id(0), 2);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_get_missing_panics() {
        let set: SparseSet<u8> = SparseSet::new(4);
        let _ = set.get(id(0));
    }

    #[test]
    fn test_iter_and_clear() {
        let mut set: SparseSet<u32> = SparseSet::new(8);
        set.add(id(3), 30);
        set.add(id(5), 50);

        for (_, value) in set.iter_mut() {
            *value += 1;
        }
        let mut seen: Vec<_> = set.iter().map(|(e, v)| (e.index(), *v)).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![(3, 31), (5, 51)]);

        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(id(3)));
        assert!(set.is_valid());
    }

    #[test]
    fn test_evict_ignores_generation() {
        let mut set: SparseSet<u32> = SparseSet::new(4);
        let old = EntityId::new(2, 0);
        set.add(old, 7);
        set.add(id(1), 1);

        assert_eq!(set.evict(2), Some((old, 7)));
        assert_eq!(set.evict(2), None);
        assert_eq!(set.evict(9), None);
        assert!(set.contains(id(1)));
        assert!(set.is_valid());
    }
}
