//! # Entity Queries
//!
//! Intersection of the identifier sets of several component containers.
//!
//! The smallest queried set drives the iteration; every candidate is probed
//! against the others with `contains`. Cost is bounded by the size of the
//! smallest set, not by the union.

use std::iter::FusedIterator;
use std::slice;

use super::entity::EntityId;
use super::sparse_set::EntitySet;

/// Lazy, finite, restartable sequence of the entities holding every queried
/// component.
///
/// The query borrows the component manager, so no container can change while
/// it is alive. Iterate it by value, or call [`EntityQuery::iter`] as many
/// times as needed. Order is the dense order of the driving set.
#[derive(Clone)]
pub struct EntityQuery<'a> {
    /// Dense ids of the smallest queried set.
    driver: &'a [EntityId],
    /// The remaining sets, probed for every candidate.
    probes: Vec<&'a dyn EntitySet>,
}

impl<'a> EntityQuery<'a> {
    /// Builds a query over `sets`, picking the smallest one as the driver.
    ///
    /// An empty `sets` yields an empty query.
    pub(crate) fn new(mut sets: Vec<&'a dyn EntitySet>) -> Self {
        let smallest = sets
            .iter()
            .enumerate()
            .min_by_key(|(_, set)| set.entity_ids().len())
            .map(|(position, _)| position);

        let Some(smallest) = smallest else {
            return Self {
                driver: &[],
                probes: sets,
            };
        };

        let driver = sets.swap_remove(smallest).entity_ids();
        Self {
            driver,
            probes: sets,
        }
    }

    /// Iterates the matching entities from the start.
    #[must_use]
    pub fn iter(&self) -> EntityQueryIter<'a, &[&'a dyn EntitySet]> {
        EntityQueryIter {
            ids: self.driver.iter(),
            probes: &self.probes,
        }
    }

    /// Upper bound on the number of matches: the size of the driving set.
    #[inline]
    #[must_use]
    pub fn driver_len(&self) -> usize {
        self.driver.len()
    }

    /// Counts the matches. Walks the whole driving set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no entity matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for EntityQuery<'a> {
    type Item = EntityId;
    type IntoIter = EntityQueryIter<'a, Vec<&'a dyn EntitySet>>;

    fn into_iter(self) -> Self::IntoIter {
        EntityQueryIter {
            ids: self.driver.iter(),
            probes: self.probes,
        }
    }
}

impl<'q, 'a> IntoIterator for &'q EntityQuery<'a> {
    type Item = EntityId;
    type IntoIter = EntityQueryIter<'a, &'q [&'a dyn EntitySet]>;

    fn into_iter(self) -> Self::IntoIter {
        EntityQueryIter {
            ids: self.driver.iter(),
            probes: &self.probes,
        }
    }
}

/// Iterator over the entities matched by an [`EntityQuery`].
pub struct EntityQueryIter<'a, P> {
    ids: slice::Iter<'a, EntityId>,
    probes: P,
}

impl<'a, P> Iterator for EntityQueryIter<'a, P>
where
    P: AsRef<[&'a dyn EntitySet]>,
{
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let probes = self.probes.as_ref();
        self.ids
            .by_ref()
            .copied()
            .find(|&id| probes.iter().all(|set| set.contains_entity(id)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.ids.len()))
    }
}

impl<'a, P> FusedIterator for EntityQueryIter<'a, P> where P: AsRef<[&'a dyn EntitySet]> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::SparseSet;

    fn id(index: u32) -> EntityId {
        EntityId::new(index, 0)
    }

    #[test]
    fn test_smallest_set_drives() {
        let mut big: SparseSet<u8> = SparseSet::new(16);
        let mut small: SparseSet<u8> = SparseSet::new(16);
        for i in 0..10 {
            big.add(id(i), 0);
        }
        small.add(id(3), 0);
        small.add(id(12), 0);

        let query = EntityQuery::new(vec![&big as &dyn EntitySet, &small]);
        assert_eq!(query.driver_len(), 2);
        assert_eq!(query.iter().collect::<Vec<_>>(), vec![id(3)]);
    }

    #[test]
    fn test_query_is_restartable() {
        let mut set: SparseSet<u8> = SparseSet::new(4);
        set.add(id(1), 0);
        set.add(id(2), 0);

        let query = EntityQuery::new(vec![&set as &dyn EntitySet]);
        let first: Vec<_> = query.iter().collect();
        let second: Vec<_> = (&query).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(query.count(), 2);
        assert_eq!(query.into_iter().count(), 2);
    }

    #[test]
    fn test_empty_query() {
        let query = EntityQuery::new(Vec::new());
        assert!(query.is_empty());
        assert_eq!(query.driver_len(), 0);
    }
}
