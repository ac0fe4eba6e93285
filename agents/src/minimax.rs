use crate::{
    cache::SearchCaches,
    search::{best_move, SearchLimits, SearchResult},
    Agent,
};
use knook_core::{Board, Move, OpeningBook};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Minimax agent. Its caches live as long as the agent, so later moves of
/// a game reuse earlier work.
pub struct MinimaxAgent {
    name: String,
    limits: SearchLimits,
    caches: SearchCaches,
    book: Option<OpeningBook>,
    rng: StdRng,
}

impl MinimaxAgent {
    pub fn new(limits: SearchLimits) -> Self {
        let name = match limits.max_depth {
            Some(depth) => format!("Minimax(depth={})", depth),
            None => "Minimax(depth=auto)".to_string(),
        };
        MinimaxAgent {
            name,
            limits,
            caches: SearchCaches::new(),
            book: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = Some(book);
        self
    }

    /// Seeds the generator used to pick among book moves.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Runs a full search and returns everything it found.
    pub fn search(&mut self, board: &Board) -> SearchResult {
        best_move(
            board,
            self.limits,
            self.book.as_ref(),
            &mut self.caches,
            &mut self.rng,
        )
    }

    pub fn caches(&self) -> &SearchCaches {
        &self.caches
    }
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(SearchLimits::auto())
    }
}

impl Agent for MinimaxAgent {
    fn best_move(&mut self, board: &Board) -> Option<Move> {
        self.search(board).best_move
    }

    fn name(&self) -> &str {
        &self.name
    }
}
