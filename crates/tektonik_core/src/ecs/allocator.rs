//! # Entity Allocator
//!
//! Fixed-capacity identifier allocator with generation counters.

use super::entity::EntityId;
use crate::config::IdentifierPolicy;
use crate::error::{EcsError, EcsResult};

/// Per-index bookkeeping.
#[derive(Clone, Copy, Debug, Default)]
struct IndexSlot {
    /// Generation of the current (or next) occupant.
    generation: u32,
    /// Whether the index is currently allocated.
    alive: bool,
}

/// Allocates and retires entity identifiers.
///
/// - Allocation and freeing are **O(1)**
/// - Freeing bumps the generation of the index, so every handle issued
///   before the free becomes stale
/// - With [`IdentifierPolicy::Recycle`], freed indices are reused LIFO
///
/// # Thread Safety
///
/// This allocator is NOT thread-safe. It is owned by a single world.
pub struct EntityAllocator {
    /// Bookkeeping for every index.
    slots: Box<[IndexSlot]>,
    /// Freed indices awaiting reuse (recycling policy only).
    free_indices: Vec<u32>,
    /// First index never handed out.
    next_unused: u32,
    /// Number of currently alive identifiers.
    alive_count: usize,
    /// Reuse strategy.
    policy: IdentifierPolicy,
}

impl EntityAllocator {
    /// Creates an allocator for indices `0..capacity`.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize, policy: IdentifierPolicy) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity <= u32::MAX as usize,
            "Capacity cannot exceed u32::MAX"
        );

        let free_indices = match policy {
            IdentifierPolicy::Recycle => Vec::with_capacity(capacity),
            IdentifierPolicy::Monotonic => Vec::new(),
        };

        Self {
            slots: vec![IndexSlot::default(); capacity].into_boxed_slice(),
            free_indices,
            next_unused: 0,
            alive_count: 0,
            policy,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of currently alive identifiers.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Returns the reuse strategy.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> IdentifierPolicy {
        self.policy
    }

    /// Allocates a currently unused identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntitiesExhausted`] when no index is available.
    pub fn allocate(&mut self) -> EcsResult<EntityId> {
        let index = match self.free_indices.pop() {
            Some(index) => index,
            None if (self.next_unused as usize) < self.capacity() => {
                let index = self.next_unused;
                self.next_unused += 1;
                index
            }
            None => {
                return Err(EcsError::EntitiesExhausted {
                    capacity: self.capacity(),
                })
            }
        };

        let slot = &mut self.slots[index as usize];
        debug_assert!(!slot.alive, "free index {index} is still alive");
        slot.alive = true;
        self.alive_count += 1;

        Ok(EntityId::new(index, slot.generation))
    }

    /// Retires `id`.
    ///
    /// # Returns
    ///
    /// `true` if the identifier was freed, `false` if it was already dead,
    /// stale, null or out of range.
    pub fn free(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }

        let slot = &mut self.slots[id.slot()];
        slot.alive = false;
        // Invalidate every outstanding handle to this index
        slot.generation = slot.generation.wrapping_add(1);
        self.alive_count -= 1;

        if self.policy == IdentifierPolicy::Recycle {
            self.free_indices.push(id.index());
        }

        true
    }

    /// Checks whether `id` is alive with the current generation.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slots
            .get(id.slot())
            .is_some_and(|slot| slot.alive && slot.generation == id.generation())
    }

    /// Iterates over all alive identifiers in index order.
    pub fn iter_alive(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots
            .iter()
            .take(self.next_unused as usize)
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(index, slot)| {
                // index < next_unused <= u32::MAX
                #[allow(clippy::cast_possible_truncation)]
                let index = index as u32;
                EntityId::new(index, slot.generation)
            })
    }
}
