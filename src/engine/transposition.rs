//! Transposition table: a cache from position hash to search result, shared
//! across one root search and rebuilt for the next.

use std::collections::HashMap;

use crate::chess::Move;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum NodeKind {
    /// A fully searched node; the score may be reused as-is at equal depth.
    Exact,
    /// The search failed low; the score is only an upper bound.
    Alpha,
    /// A beta cutoff fired; the score is only a lower bound, but the move
    /// that caused the cutoff is worth trying first elsewhere.
    Beta,
}

#[derive(Clone, Copy, Debug)]
pub struct TableEntry {
    pub score: i32,
    pub depth: i32,
    pub kind: NodeKind,
    pub best_move: Move,
    /// Set when the entry's score was reused during the current pass;
    /// protects it from being overwritten by a shallower re-search.
    pub keep: bool,
}

pub struct TranspositionTable {
    entries: HashMap<u64, TableEntry>,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new()
    }
}

impl TranspositionTable {
    pub fn new() -> TranspositionTable {
        TranspositionTable {
            entries: HashMap::with_capacity(100_000),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn probe(&self, hash: u64) -> Option<TableEntry> {
        self.entries.get(&hash).copied()
    }

    pub fn mark_keep(&mut self, hash: u64) {
        if let Some(entry) = self.entries.get_mut(&hash) {
            entry.keep = true;
        }
    }

    /// Stores an entry unless a deeper, kept one already occupies the slot.
    pub fn record(&mut self, hash: u64, score: i32, depth: i32, kind: NodeKind, best_move: Move) {
        match self.entries.get(&hash) {
            Some(existing) if existing.keep && existing.depth > depth => {}
            _ => {
                self.entries.insert(
                    hash,
                    TableEntry {
                        score,
                        depth,
                        kind,
                        best_move,
                        keep: false,
                    },
                );
            }
        }
    }
}
