//! Transposition table of canonical configurations.
//!
//! Every distinct canonical board is stored once, kept sorted by its base-3
//! key so lookups are a binary search. Each entry points to at most two
//! search nodes: the one with Black to move and the one with White to move,
//! both expressed in the canonical frame.

use std::cmp::Ordering;

use crate::board::{Board, Color};
use crate::graph::NodeId;

/// Stable handle of a pool entry.
pub type EntryId = usize;

/// Result of a binary search over a sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Exact match at this position.
    Found(usize),
    /// The sequence is empty.
    Empty,
    /// Smaller than every element.
    BeforeAll,
    /// Larger than every element.
    AfterAll,
    /// Between elements `i` and `i + 1`.
    Between(usize),
}

impl Lookup {
    /// Insertion position that keeps the sequence sorted, if not found.
    pub fn insert_at(&self, len: usize) -> Option<usize> {
        match *self {
            Lookup::Found(_) => None,
            Lookup::Empty | Lookup::BeforeAll => Some(0),
            Lookup::AfterAll => Some(len),
            Lookup::Between(i) => Some(i + 1),
        }
    }
}

/// Binary search with a comparator that only reports the ordering of an
/// element relative to the target.
pub fn lookup_by<T>(items: &[T], mut cmp: impl FnMut(&T) -> Ordering) -> Lookup {
    if items.is_empty() {
        return Lookup::Empty;
    }
    let (mut lo, mut hi) = (0usize, items.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match cmp(&items[mid]) {
            Ordering::Equal => return Lookup::Found(mid),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    match lo {
        0 => Lookup::BeforeAll,
        n if n == items.len() => Lookup::AfterAll,
        n => Lookup::Between(n - 1),
    }
}

#[derive(Debug, Clone)]
pub struct PoolEntry {
    config: Board,
    key: u128,
    black: Option<NodeId>,
    white: Option<NodeId>,
}

impl PoolEntry {
    #[inline]
    pub fn config(&self) -> &Board {
        &self.config
    }

    #[inline]
    pub fn key(&self) -> u128 {
        self.key
    }

    pub fn node(&self, mover: Color) -> Option<NodeId> {
        match mover {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

#[derive(Debug, Default)]
pub struct Pool {
    entries: Vec<PoolEntry>,
    /// Entry ids sorted by key.
    order: Vec<EntryId>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a canonical configuration. `Found` carries the entry id.
    pub fn search(&self, config: &Board) -> Lookup {
        let key = config.key();
        match lookup_by(&self.order, |&id| self.entries[id].key.cmp(&key)) {
            Lookup::Found(i) => Lookup::Found(self.order[i]),
            other => other,
        }
    }

    /// Insert a configuration at the position reported by [`Pool::search`].
    pub fn push(&mut self, config: Board, hint: Lookup) -> EntryId {
        let Some(at) = hint.insert_at(self.order.len()) else {
            panic!("pool push of a configuration that is already stored: {hint:?}");
        };
        let key = config.key();
        debug_assert!(at == 0 || self.entries[self.order[at - 1]].key < key);
        debug_assert!(at == self.order.len() || key < self.entries[self.order[at]].key);
        let id = self.entries.len();
        self.entries.push(PoolEntry {
            config,
            key,
            black: None,
            white: None,
        });
        self.order.insert(at, id);
        id
    }

    /// Attach the node reached with `mover` to move.
    ///
    /// # Panics
    /// If the slot is already taken: a configuration and mover map to
    /// exactly one node.
    pub fn link(&mut self, entry: EntryId, mover: Color, node: NodeId) {
        let e = &mut self.entries[entry];
        let slot = match mover {
            Color::Black => &mut e.black,
            Color::White => &mut e.white,
        };
        if let Some(existing) = *slot {
            panic!("pool entry {entry} already maps {mover} to node {existing}, cannot add {node}");
        }
        *slot = Some(node);
    }

    #[inline]
    pub fn node(&self, entry: EntryId, mover: Color) -> Option<NodeId> {
        self.entries[entry].node(mover)
    }

    #[inline]
    pub fn entry(&self, entry: EntryId) -> &PoolEntry {
        &self.entries[entry]
    }

    #[inline]
    pub fn config(&self, entry: EntryId) -> &Board {
        &self.entries[entry].config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &PoolEntry)> + '_ {
        self.order.iter().map(move |&id| (id, &self.entries[id]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_lookup_by_cases() {
        let v = [10, 20, 30];
        assert_eq!(lookup_by(&[] as &[i32], |x| x.cmp(&5)), Lookup::Empty);
        assert_eq!(lookup_by(&v, |x| x.cmp(&5)), Lookup::BeforeAll);
        assert_eq!(lookup_by(&v, |x| x.cmp(&35)), Lookup::AfterAll);
        assert_eq!(lookup_by(&v, |x| x.cmp(&25)), Lookup::Between(1));
        assert_eq!(lookup_by(&v, |x| x.cmp(&20)), Lookup::Found(1));
        assert_eq!(Lookup::Between(1).insert_at(3), Some(2));
        assert_eq!(Lookup::AfterAll.insert_at(3), Some(3));
    }

    #[test]
    fn test_pool_stays_sorted_and_unique() {
        let s = Settings::new(2, 2, 0).unwrap();
        let mut pool = Pool::new();
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..200 {
            let mut b = Board::empty(&s);
            for _ in 0..3 {
                let c = if rng.bool() { Color::Black } else { Color::White };
                let _ = b.place(rng.usize(0..2), rng.usize(0..2), c);
            }
            let (canon, _) = b.canonicalize(true);
            let hint = pool.search(&canon);
            if let Lookup::Found(id) = hint {
                assert_eq!(pool.config(id), &canon);
            } else {
                pool.push(canon, hint);
            }
        }
        let keys: Vec<u128> = pool.iter().map(|(_, e)| e.key()).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys.len(), pool.len());
        for (id, e) in pool.iter() {
            assert_eq!(pool.search(e.config()), Lookup::Found(id));
        }
    }

    #[test]
    fn test_link_fills_slots() {
        let s = Settings::new(2, 1, 0).unwrap();
        let mut pool = Pool::new();
        let empty = Board::empty(&s);
        let hint = pool.search(&empty);
        let id = pool.push(empty, hint);
        pool.link(id, Color::Black, 0);
        assert_eq!(pool.node(id, Color::Black), Some(0));
        assert_eq!(pool.node(id, Color::White), None);
        pool.link(id, Color::White, 4);
        assert_eq!(pool.entry(id).node(Color::White), Some(4));
    }

    #[test]
    #[should_panic(expected = "already maps")]
    fn test_link_twice_panics() {
        let s = Settings::new(2, 1, 0).unwrap();
        let mut pool = Pool::new();
        let empty = Board::empty(&s);
        let hint = pool.search(&empty);
        let id = pool.push(empty, hint);
        pool.link(id, Color::Black, 0);
        pool.link(id, Color::Black, 1);
    }
}
