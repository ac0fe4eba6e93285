pub mod cache;
pub mod minimax;
pub mod search;

use knook_core::{Board, Move};

/// Core trait for chess agents
pub trait Agent {
    /// Get the best move for the current position
    fn best_move(&mut self, board: &Board) -> Option<Move>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use cache::{MoveListCache, SearchCache, SearchCaches, SearchEntry, SearchKey};
pub use minimax::MinimaxAgent;
pub use search::*;
