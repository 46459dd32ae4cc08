//! Transposition table keyed by position fingerprint.
//!
//! Entries store the full 64-bit key so index collisions are detected on
//! probe. A probed entry is usable for a score cutoff only when it was
//! searched at least as deep as the current request; shallower entries
//! still contribute their best moves as an ordering hint.

use std::mem;

use serde::{Deserialize, Serialize};

use crate::board::Move;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TtEntry {
    key: u64,
    depth: u32,
    score: i32,
    best_moves: Vec<Move>,
}

impl TtEntry {
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn best_moves(&self) -> &[Move] {
        &self.best_moves
    }
}

/// Serializable image of a table, used for persistence.
#[derive(Serialize, Deserialize)]
pub struct TtSnapshot {
    capacity: usize,
    entries: Vec<TtEntry>,
}

pub struct TranspositionTable {
    table: Vec<Option<TtEntry>>,
    mask: usize, // Table size is a power of two; index with bitwise AND.
}

impl TranspositionTable {
    /// Build a table of roughly `size_mb` megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<Option<TtEntry>>();
        let mut num_entries = (size_mb * 1024 * 1024) / entry_size;

        num_entries = num_entries.next_power_of_two() / 2;
        if num_entries == 0 {
            num_entries = 1024;
        }

        TranspositionTable {
            table: vec![None; num_entries],
            mask: num_entries - 1,
        }
    }

    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Look up an entry, verifying the full key to reject collisions.
    #[must_use]
    pub fn probe(&self, key: u64) -> Option<&TtEntry> {
        match &self.table[self.index(key)] {
            Some(entry) if entry.key == key => Some(entry),
            _ => None,
        }
    }

    /// Store an entry. A slot is overwritten when empty or when the new
    /// search is at least as deep as the resident entry.
    pub fn store(&mut self, key: u64, depth: u32, score: i32, best_moves: Vec<Move>) {
        let index = self.index(key);
        let should_replace = match &self.table[index] {
            Some(existing) => depth >= existing.depth,
            None => true,
        };
        if should_replace {
            self.table[index] = Some(TtEntry {
                key,
                depth,
                score,
                best_moves,
            });
        }
    }

    pub fn clear(&mut self) {
        for entry in &mut self.table {
            *entry = None;
        }
    }

    #[must_use]
    pub fn occupied(&self) -> usize {
        self.table.iter().flatten().count()
    }

    /// Occupied entries in index order, for persistence.
    #[must_use]
    pub fn to_snapshot(&self) -> TtSnapshot {
        TtSnapshot {
            capacity: self.table.len(),
            entries: self.table.iter().flatten().cloned().collect(),
        }
    }

    /// Rebuild a table from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: TtSnapshot) -> Self {
        let capacity = snapshot.capacity.next_power_of_two().max(1024);
        let mut table = TranspositionTable {
            table: vec![None; capacity],
            mask: capacity - 1,
        };
        for entry in snapshot.entries {
            let index = table.index(entry.key);
            table.table[index] = Some(entry);
        }
        table
    }
}
