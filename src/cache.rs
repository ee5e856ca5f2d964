//! Evaluation cache for search results.
//!
//! Stores the value of previously searched positions keyed by their hash so a position reached
//! again within the same search episode is not searched twice. Decisive values are stored
//! relative to the node (see [`crate::score::to_cache`]) so they stay valid at any ply.

use crate::board::Bound;
use crate::score::{Score, from_cache, to_cache};

/// One cached search result.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<M> {
    /// Hash of the position.
    pub hash: u64,
    /// Remaining depth the value was computed with.
    pub depth: u8,
    /// Node-relative value.
    pub value: Score,
    /// How `value` bounds the true value.
    pub bound: Bound,
    /// Best move found for this position, if any.
    pub best_move: Option<M>,
}

/// What a probe found.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit<M> {
    /// A value that can be returned without searching, if the entry is deep and tight enough.
    pub value: Option<Score>,
    /// The stored best move, useful for ordering even when `value` is `None`.
    pub best_move: Option<M>,
}

/// Direct-mapped table: each hash owns exactly one slot.
///
/// A slot holding the same position is only overwritten by an equal-or-deeper result; a slot
/// holding another position is taken over when the new result is at least as deep.
pub struct EvaluationCache<M> {
    entries: Vec<Option<CacheEntry<M>>>,
    probes: u64,
    hits: u64,
}

impl<M: Clone> EvaluationCache<M> {
    /// Creates a cache with `capacity` slots. A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, || None);
        Self {
            entries,
            probes: 0,
            hits: 0,
        }
    }

    /// Returns `true` when the cache has no slots.
    pub fn is_disabled(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Returns `true` when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.is_none())
    }

    /// Number of probes since the last [`EvaluationCache::clear`].
    pub fn probes(&self) -> u64 {
        self.probes
    }

    /// Number of probes that produced a usable value.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    fn slot(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    /// Looks up `hash` for a search of `depth` remaining plies at `ply` in the window
    /// `(alpha, beta)`.
    ///
    /// Returns `None` when nothing is stored for this position.
    pub fn probe(
        &mut self,
        hash: u64,
        depth: u8,
        ply: usize,
        alpha: Score,
        beta: Score,
    ) -> Option<CacheHit<M>> {
        if self.is_disabled() {
            return None;
        }
        self.probes += 1;
        let idx = self.slot(hash);
        let entry = self.entries[idx].as_ref()?;
        if entry.hash != hash {
            return None;
        }

        let stored = from_cache(entry.value, ply);
        let value = if entry.depth >= depth {
            match entry.bound {
                Bound::Exact => Some(stored),
                Bound::Lower if stored >= beta => Some(stored),
                Bound::Upper if stored <= alpha => Some(stored),
                _ => None,
            }
        } else {
            None
        };
        if value.is_some() {
            self.hits += 1;
        }

        Some(CacheHit {
            value,
            best_move: entry.best_move.clone(),
        })
    }

    /// Returns the stored best move for `hash`, ignoring depth and bounds.
    pub fn best_move(&self, hash: u64) -> Option<M> {
        if self.is_disabled() {
            return None;
        }
        match &self.entries[self.slot(hash)] {
            Some(e) if e.hash == hash => e.best_move.clone(),
            _ => None,
        }
    }

    /// Returns the raw entry for `hash`.
    pub fn get(&self, hash: u64) -> Option<&CacheEntry<M>> {
        if self.is_disabled() {
            return None;
        }
        self.entries[self.slot(hash)]
            .as_ref()
            .filter(|e| e.hash == hash)
    }

    /// Stores a completed search result of the node at `ply`. Never replaces an entry with a
    /// shallower one.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u8,
        ply: usize,
        value: Score,
        bound: Bound,
        best_move: Option<M>,
    ) {
        if self.is_disabled() {
            return;
        }
        let idx = self.slot(hash);
        let should_replace = match &self.entries[idx] {
            None => true,
            Some(e) => e.depth <= depth,
        };

        if should_replace {
            // keep the old move for ordering if this result found none
            let best_move = match (&best_move, &self.entries[idx]) {
                (None, Some(e)) if e.hash == hash => e.best_move.clone(),
                _ => best_move,
            };
            self.entries[idx] = Some(CacheEntry {
                hash,
                depth,
                value: to_cache(value, ply),
                bound,
                best_move,
            });
        }
    }

    /// Empties the table and resets the counters.
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
        self.probes = 0;
        self.hits = 0;
    }
}
