//! Generational arena providing stable indices for bodies and joints.
//!
//! Adapted from the generational-arena crate, trimmed down to the
//! operations the body and joint sets actually need. Removing an element
//! bumps the slot's generation so that stale indices can never observe a
//! recycled slot (the ABA problem).

use std::iter;
use std::ops;

/// The `Arena` allows inserting and removing elements that are referred to
/// by `Index`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Arena<T> {
    items: Vec<Entry<T>>,
    generation: u32,
    free_list_head: Option<u32>,
    len: usize,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
enum Entry<T> {
    Free { next_free: Option<u32> },
    Occupied { generation: u32, value: T },
}

/// An index (and generation) into an `Arena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Index {
    index: u32,
    generation: u32,
}

impl Index {
    /// Creates a new `Index` from its raw parts.
    ///
    /// The parts must have been returned from an earlier call to
    /// `into_raw_parts`.
    pub fn from_raw_parts(index: u32, generation: u32) -> Index {
        Index { index, generation }
    }

    /// Converts this `Index` into its raw parts.
    pub fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

const DEFAULT_CAPACITY: usize = 4;

impl<T> Default for Arena<T> {
    fn default() -> Arena<T> {
        Arena::new()
    }
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena`.
    pub fn new() -> Arena<T> {
        Arena::with_capacity(DEFAULT_CAPACITY)
    }

    /// Constructs a new, empty `Arena<T>` able to hold `n` elements
    /// without further allocation.
    pub fn with_capacity(n: usize) -> Arena<T> {
        let n = n.max(1);
        let mut arena = Arena {
            items: Vec::new(),
            generation: 0,
            free_list_head: None,
            len: 0,
        };
        arena.reserve(n);
        arena
    }

    /// The number of elements in this arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is this arena empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates space for `additional_capacity` more elements.
    pub fn reserve(&mut self, additional_capacity: usize) {
        if additional_capacity == 0 {
            return;
        }

        let start = self.items.len();
        let end = start + additional_capacity;
        let old_head = self.free_list_head;
        self.items.reserve_exact(additional_capacity);
        self.items.extend((start..end).map(|i| {
            if i == end - 1 {
                Entry::Free {
                    next_free: old_head,
                }
            } else {
                Entry::Free {
                    next_free: Some(i as u32 + 1),
                }
            }
        }));
        self.free_list_head = Some(start as u32);
    }

    /// Inserts `value` into the arena, returning the index where it was
    /// placed.
    pub fn insert(&mut self, value: T) -> Index {
        match self.free_list_head {
            None => {
                self.reserve(self.items.len());
                self.insert_in_slot(value)
            }
            Some(_) => self.insert_in_slot(value),
        }
    }

    fn insert_in_slot(&mut self, value: T) -> Index {
        let old_free = self
            .free_list_head
            .expect("Internal error: free list exhausted after reserve.");
        match self.items[old_free as usize] {
            Entry::Occupied { .. } => unreachable!("Corrupt free list."),
            Entry::Free { next_free } => {
                self.free_list_head = next_free;
                self.len += 1;
                self.items[old_free as usize] = Entry::Occupied {
                    generation: self.generation,
                    value,
                };
                Index {
                    index: old_free,
                    generation: self.generation,
                }
            }
        }
    }

    /// Removes the element at index `i` from the arena, if it exists.
    pub fn remove(&mut self, i: Index) -> Option<T> {
        if i.index as usize >= self.items.len() {
            return None;
        }

        match self.items[i.index as usize] {
            Entry::Occupied { generation, .. } if generation == i.generation => {
                let entry = std::mem::replace(
                    &mut self.items[i.index as usize],
                    Entry::Free {
                        next_free: self.free_list_head,
                    },
                );
                self.generation += 1;
                self.free_list_head = Some(i.index);
                self.len -= 1;

                match entry {
                    Entry::Occupied { value, .. } => Some(value),
                    _ => unreachable!(),
                }
            }
            _ => None,
        }
    }

    /// Is the element at index `i` in the arena?
    pub fn contains(&self, i: Index) -> bool {
        self.get(i).is_some()
    }

    /// Gets a shared reference to the element at index `i`, if it exists.
    pub fn get(&self, i: Index) -> Option<&T> {
        match self.items.get(i.index as usize) {
            Some(Entry::Occupied { generation, value }) if *generation == i.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Gets an exclusive reference to the element at index `i`, if it exists.
    pub fn get_mut(&mut self, i: Index) -> Option<&mut T> {
        match self.items.get_mut(i.index as usize) {
            Some(Entry::Occupied { generation, value }) if *generation == i.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Gets exclusive references to the elements at two distinct indices.
    ///
    /// Panics if `i1 == i2`.
    pub fn get2_mut(&mut self, i1: Index, i2: Index) -> (Option<&mut T>, Option<&mut T>) {
        assert_ne!(i1.index, i2.index, "Cannot get two mutable references to the same element.");

        let (lo, hi) = if i1.index < i2.index { (i1, i2) } else { (i2, i1) };
        if hi.index as usize >= self.items.len() {
            let first = self.get_mut(lo);
            return if i1.index < i2.index {
                (first, None)
            } else {
                (None, first)
            };
        }

        let (left, right) = self.items.split_at_mut(hi.index as usize);
        let lo_entry = match &mut left[lo.index as usize] {
            Entry::Occupied { generation, value } if *generation == lo.generation => Some(value),
            _ => None,
        };
        let hi_entry = match &mut right[0] {
            Entry::Occupied { generation, value } if *generation == hi.generation => Some(value),
            _ => None,
        };

        if i1.index < i2.index {
            (lo_entry, hi_entry)
        } else {
            (hi_entry, lo_entry)
        }
    }

    /// Iterates over the `(Index, &T)` pairs of this arena.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &T)> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Entry::Occupied { generation, value } => Some((
                    Index {
                        index: i as u32,
                        generation: *generation,
                    },
                    value,
                )),
                _ => None,
            })
    }

    /// Iterates over the `(Index, &mut T)` pairs of this arena.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Index, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Entry::Occupied { generation, value } => Some((
                    Index {
                        index: i as u32,
                        generation: *generation,
                    },
                    value,
                )),
                _ => None,
            })
    }
}

impl<T> ops::Index<Index> for Arena<T> {
    type Output = T;

    fn index(&self, index: Index) -> &Self::Output {
        self.get(index).expect("No element at index.")
    }
}

impl<T> ops::IndexMut<Index> for Arena<T> {
    fn index_mut(&mut self, index: Index) -> &mut Self::Output {
        self.get_mut(index).expect("No element at index.")
    }
}

impl<T> iter::FromIterator<T> for Arena<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, upper) = iter.size_hint();
        let cap = upper.unwrap_or(lower).max(lower).max(1);
        let mut arena = Arena::with_capacity(cap);
        for t in iter {
            arena.insert(t);
        }
        arena
    }
}

#[cfg(test)]
mod test {
    use super::Arena;

    #[test]
    fn insert_get_remove() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a], 1);
        assert_eq!(arena[b], 2);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn stale_index_does_not_observe_recycled_slot() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        arena.remove(a);
        let b = arena.insert(2);
        // The slot is recycled, but the old index must stay invalid.
        assert_eq!(a.into_raw_parts().0, b.into_raw_parts().0);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena[b], 2);
    }

    #[test]
    fn reserve_zero_keeps_the_free_list_intact() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        arena.reserve(0);
        let b = arena.insert(2);
        assert_eq!(arena[a], 1);
        assert_eq!(arena[b], 2);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn get2_mut_disjoint() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let (ra, rb) = arena.get2_mut(a, b);
        *ra.unwrap() += 10;
        *rb.unwrap() += 20;
        assert_eq!(arena[a], 11);
        assert_eq!(arena[b], 22);

        let (rb, ra) = arena.get2_mut(b, a);
        assert_eq!(*rb.unwrap(), 22);
        assert_eq!(*ra.unwrap(), 11);
    }
}
