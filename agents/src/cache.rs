use knook_core::{Board, Color, Move, Square};
use std::collections::HashMap;

/// Key of a searched move: the position it was played from (simplified
/// FEN), the move itself and the remaining depth at that position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub position: String,
    pub from: Square,
    pub to: Square,
    pub depth: u8,
}

/// Entry in the search cache.
#[derive(Debug, Clone)]
pub struct SearchEntry {
    /// Board after the move
    pub board: Board,
    /// Exact minimax score of that board
    pub score: f64,
}

/// Memoized search results. Entries are never replaced or evicted.
#[derive(Debug, Default)]
pub struct SearchCache {
    entries: HashMap<SearchKey, SearchEntry>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probes the cache for a move.
    pub fn probe(&self, key: &SearchKey) -> Option<&SearchEntry> {
        self.entries.get(key)
    }

    /// Stores an entry unless the key is already present.
    pub fn store(&mut self, key: SearchKey, entry: SearchEntry) {
        self.entries.entry(key).or_insert(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Move lists per (simplified FEN, color).
#[derive(Debug, Default)]
pub struct MoveListCache {
    entries: HashMap<(String, Color), Vec<Move>>,
}

impl MoveListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the moves of `color` on `board`, generating them on a miss.
    pub fn moves(&mut self, board: &Board, color: Color) -> &[Move] {
        self.entries
            .entry((board.key(), color))
            .or_insert_with(|| board.possible_moves(color))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Both caches, owned by whoever drives the search and lent to it.
#[derive(Debug, Default)]
pub struct SearchCaches {
    pub moves: MoveListCache,
    pub search: SearchCache,
}

impl SearchCaches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.search.clear();
    }
}
