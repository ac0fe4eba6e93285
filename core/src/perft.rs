use crate::board::Board;
use crate::types::{Color, Move};

/// Perft results broken down by move kind.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    pub captures: u64,
    pub king_captures: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl PerftResults {
    /// Combines results from child nodes.
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.king_captures += other.king_captures;
        self.promotions += other.promotions;
        self.checks += other.checks;
    }
}

/// A board whose king was captured has no continuation.
fn is_over(board: &Board) -> bool {
    let position = board.position();
    position.king_square(Color::White).is_none() || position.king_square(Color::Black).is_none()
}

/// Plays a generated move on a copy of the board.
fn play(board: &Board, mv: Move) -> Board {
    let mut child = board.clone();
    let played = child.make_move(mv.from, mv.to, false);
    debug_assert!(played.is_ok(), "generated move {mv} refused: {played:?}");
    child
}

/// Counts the leaves of the move tree to the given depth.
pub fn perft(board: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    if is_over(board) {
        return 0;
    }

    let moves = board.moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&mv| perft(&play(board, mv), depth - 1))
        .sum()
}

/// Performs perft with a per-move breakdown at the root.
pub fn perft_divide(board: &Board, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 || is_over(board) {
        return Vec::new();
    }

    board
        .moves()
        .into_iter()
        .map(|mv| (mv, perft(&play(board, mv), depth - 1)))
        .collect()
}

/// Performs perft with detailed statistics on the leaf moves.
pub fn perft_detailed(board: &Board, depth: u8) -> PerftResults {
    let mut results = PerftResults::default();

    if depth == 0 {
        results.nodes = 1;
        return results;
    }
    if is_over(board) {
        return results;
    }

    let mover = board.turn();
    for mv in board.moves() {
        let child = play(board, mv);

        if depth == 1 {
            results.nodes += 1;
            if mv.is_capture() {
                results.captures += 1;
                if child.position().king_square(mover.opponent()).is_none() {
                    results.king_captures += 1;
                }
            }
            if child.position().piece_at(mv.to).map(|p| p.kind) != Some(mv.category.piece) {
                results.promotions += 1;
            }
            if child.position().is_in_check(mover.opponent()) {
                results.checks += 1;
            }
        } else {
            results.add(&perft_detailed(&child, depth - 1));
        }
    }

    results
}

/// Perft counts for this variant's move rules: single-step pawns, no castling.
pub mod positions {
    /// Starting position perft values.
    pub const STARTING_POSITION: &[(u8, u64)] = &[(1, 12), (2, 144)];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::positions::STARTING;

    #[test]
    fn test_perft_starting_position() {
        let board = Board::from_fen(STARTING).unwrap();

        for &(depth, expected) in positions::STARTING_POSITION {
            let result = perft(&board, depth);
            assert_eq!(
                result, expected,
                "Perft({}) failed: expected {}, got {}",
                depth, expected, result
            );
        }
    }

    #[test]
    fn test_perft_divide() {
        let board = Board::starting();
        let results = perft_divide(&board, 2);

        assert_eq!(results.len(), 12);
        assert_eq!(results.iter().map(|(_, n)| n).sum::<u64>(), 144);
        assert!(results.iter().all(|&(_, n)| n == 12));
    }

    #[test]
    fn test_king_capture_ends_branch() {
        // The queen takes the king; nothing follows on that branch.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4QK2 w").unwrap();
        let detailed = perft_detailed(&board, 1);
        assert_eq!(detailed.king_captures, 1);
        assert_eq!(detailed.nodes, perft(&board, 1));

        let divide = perft_divide(&board, 2);
        let (_, after_capture) = divide
            .iter()
            .find(|(mv, _)| mv.to.to_string() == "e8")
            .unwrap();
        assert_eq!(*after_capture, 0);
    }

    #[test]
    fn test_detailed_promotions() {
        let board = Board::from_fen("7k/P7/8/8/8/8/8/K7 w").unwrap();
        let detailed = perft_detailed(&board, 1);
        assert_eq!(detailed.promotions, 1);
        assert_eq!(detailed.nodes, 4);
    }
}
