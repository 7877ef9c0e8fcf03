//! Collection shapes usable as SET OF / SEQUENCE OF fields

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;

/// Whether a collection keeps order and duplicates or deduplicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Ordered, keeps duplicates, encoded as SEQUENCE OF by default
    List,
    /// Deduplicating, encoded as SET OF by default
    Set,
}

/// A container a collection field decodes into and encodes from
///
/// Encoding follows the iteration order of [`AsnCollection::items`].
pub trait AsnCollection: Default + 'static {
    type Item: 'static;

    const KIND: CollectionKind;

    fn push(&mut self, item: Self::Item);

    fn items(&self) -> impl Iterator<Item = &Self::Item>;
}

impl<V: 'static> AsnCollection for Vec<V> {
    type Item = V;
    const KIND: CollectionKind = CollectionKind::List;

    fn push(&mut self, item: V) {
        Vec::push(self, item);
    }

    fn items(&self) -> impl Iterator<Item = &V> {
        self.iter()
    }
}

impl<V: 'static> AsnCollection for VecDeque<V> {
    type Item = V;
    const KIND: CollectionKind = CollectionKind::List;

    fn push(&mut self, item: V) {
        self.push_back(item);
    }

    fn items(&self) -> impl Iterator<Item = &V> {
        self.iter()
    }
}

impl<V: Eq + Hash + 'static> AsnCollection for HashSet<V> {
    type Item = V;
    const KIND: CollectionKind = CollectionKind::Set;

    fn push(&mut self, item: V) {
        self.insert(item);
    }

    fn items(&self) -> impl Iterator<Item = &V> {
        self.iter()
    }
}

impl<V: Ord + 'static> AsnCollection for BTreeSet<V> {
    type Item = V;
    const KIND: CollectionKind = CollectionKind::Set;

    fn push(&mut self, item: V) {
        self.insert(item);
    }

    fn items(&self) -> impl Iterator<Item = &V> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill<C: AsnCollection<Item = i32>>(values: &[i32]) -> C {
        let mut collection = C::default();
        for value in values {
            collection.push(*value);
        }
        collection
    }

    #[test]
    fn test_lists_keep_order_and_duplicates() {
        let list: Vec<i32> = fill(&[3, 1, 3]);
        assert_eq!(list.items().copied().collect::<Vec<_>>(), vec![3, 1, 3]);
        let deque: VecDeque<i32> = fill(&[3, 1, 3]);
        assert_eq!(deque.items().count(), 3);
        assert_eq!(<Vec<i32> as AsnCollection>::KIND, CollectionKind::List);
    }

    #[test]
    fn test_sets_deduplicate() {
        let set: HashSet<i32> = fill(&[3, 1, 3]);
        assert_eq!(set.len(), 2);
        let ordered: BTreeSet<i32> = fill(&[3, 1, 3]);
        assert_eq!(ordered.items().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(<BTreeSet<i32> as AsnCollection>::KIND, CollectionKind::Set);
    }
}
