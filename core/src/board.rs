/// Game state wrapped around a position: ply counter and a one-step undo buffer.
/// This module provides the main interface for playing moves.
use crate::fen::FenError;
use crate::position::Position;
use crate::rays::{rays, RayMode};
use crate::types::*;
use thiserror::Error;

/// A move refused by the semi-legality checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMoveError {
    #[error("Invalid Move ({from}{to}): No pieces on square {from}")]
    EmptySource { from: Square, to: Square },
    #[error("Invalid Move ({from}{to}): It is {turn}'s turn to play, but {from} is not a {turn} piece.")]
    WrongTurn {
        from: Square,
        to: Square,
        turn: Color,
    },
    #[error("Invalid Move ({from}{to}): Piece cannot capture a piece of the same color.")]
    SameColorCapture { from: Square, to: Square },
}

#[derive(Debug)]
pub struct Board {
    position: Position,
    /// Plies played since this board was set up
    plies: u32,
    last_position: Option<Position>,
    last_move: Option<Move>,
}

impl Board {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            plies: 0,
            last_position: None,
            last_move: None,
        }
    }

    /// Creates a board in the starting position.
    pub fn starting() -> Self {
        Self::new(Position::starting())
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Position::from_fen(fen).map(Self::new)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Number of moves played, counting half a move per ply.
    pub fn move_count(&self) -> f64 {
        f64::from(self.plies) * 0.5
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }

    /// Position before the most recent move, if any.
    pub fn last_position(&self) -> Option<&Position> {
        self.last_position.as_ref()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Simplified FEN of the current position.
    pub fn key(&self) -> String {
        self.position.key()
    }

    /// Plays a move in place.
    ///
    /// With `check_semi_legal` the move is refused when the source is empty,
    /// when the mover is not the side to move, or when it would capture a
    /// piece of its own color. A knight moving onto its own rook (or a rook onto
    /// its own knight) is not a capture but a fusion, leaving a knook behind.
    /// A captured king is not an error: its tracked square becomes `None`,
    /// which the search reads as the end of the game. A pawn reaching its last
    /// row becomes a queen.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        check_semi_legal: bool,
    ) -> Result<Move, IllegalMoveError> {
        let (Some(piece), Some(mv)) = (
            self.position.piece_at(from),
            self.position.move_between(from, to),
        ) else {
            return Err(IllegalMoveError::EmptySource { from, to });
        };
        let target = self.position.piece_at(to);
        let fusion = mv.category.kind == MoveKind::Fusion;

        if check_semi_legal {
            if piece.color != self.turn() {
                return Err(IllegalMoveError::WrongTurn {
                    from,
                    to,
                    turn: self.turn(),
                });
            }
            if !fusion && target.is_some_and(|t| t.color == piece.color) {
                return Err(IllegalMoveError::SameColorCapture { from, to });
            }
        }

        self.last_position = Some(self.position.clone());
        self.last_move = Some(mv);

        if let Some(captured) = target {
            if captured.kind == PieceKind::King {
                self.position.set_king_square(captured.color, None);
            }
        }

        self.position.move_piece(from, to);

        match piece.kind {
            _ if fusion => {
                self.position
                    .set_piece(to, Some(Piece::new(PieceKind::Knook, piece.color)));
            }
            PieceKind::Pawn if to.row() == piece.color.promotion_row() => {
                self.position
                    .set_piece(to, Some(Piece::new(PieceKind::Queen, piece.color)));
            }
            PieceKind::King => self.position.set_king_square(piece.color, Some(to)),
            _ => {}
        }

        self.position.set_turn(self.turn().opponent());
        self.plies += 1;

        Ok(mv)
    }

    /// Returns a new board with the move applied, leaving `self` untouched.
    pub fn apply(&self, from: Square, to: Square) -> Result<Board, IllegalMoveError> {
        let mut child = self.clone();
        child.make_move(from, to, true)?;
        Ok(child)
    }

    /// Restores the position before the last move. Only one step is kept.
    pub fn undo(&mut self) -> bool {
        match self.last_position.take() {
            Some(previous) => {
                self.position = previous;
                self.last_move = None;
                self.plies = self.plies.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    /// Enumerates every move of `color` in square order.
    pub fn possible_moves(&self, color: Color) -> Vec<Move> {
        let position = &self.position;
        let mut moves = Vec::new();

        for (from, piece) in position.pieces(color) {
            for to in rays(position, from, RayMode::Move) {
                let kind = if position.is_empty(to) {
                    MoveKind::Quiet
                } else {
                    MoveKind::Capture
                };
                moves.push(Move::new(
                    from,
                    to,
                    MoveCategory {
                        piece: piece.kind,
                        kind,
                    },
                ));
            }
        }

        moves
    }

    /// Moves available to the side to move.
    pub fn moves(&self) -> Vec<Move> {
        self.possible_moves(self.turn())
    }
}

/// Cloning copies the position and ply count; the undo buffer is not carried over.
impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            position: self.position.clone(),
            plies: self.plies,
            last_position: None,
            last_move: None,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl Position {
    /// Builds the move from `from` to `to` with its category, if `from` is occupied.
    pub fn move_between(&self, from: Square, to: Square) -> Option<Move> {
        let piece = self.piece_at(from)?;
        let kind = match self.piece_at(to) {
            None => MoveKind::Quiet,
            Some(target) if target.color == piece.color && is_fusion_pair(piece.kind, target.kind) => {
                MoveKind::Fusion
            }
            Some(_) => MoveKind::Capture,
        };
        Some(Move::new(
            from,
            to,
            MoveCategory {
                piece: piece.kind,
                kind,
            },
        ))
    }
}

fn is_fusion_pair(a: PieceKind, b: PieceKind) -> bool {
    matches!(
        (a, b),
        (PieceKind::Knight, PieceKind::Rook) | (PieceKind::Rook, PieceKind::Knight)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::positions;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_starting_board() {
        let board = Board::starting();
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.move_count(), 0.0);
        assert!(board.last_move().is_none());
        // Single pawn pushes and knight hops only.
        assert_eq!(board.moves().len(), 12);
        assert_eq!(board.possible_moves(Color::Black).len(), 12);
    }

    #[test]
    fn test_e4_e5() {
        let mut board = Board::starting();
        board.make_move(sq("e2"), sq("e4"), true).unwrap();
        assert_eq!(board.turn(), Color::Black);
        board.make_move(sq("e7"), sq("e5"), true).unwrap();
        assert_eq!(board.turn(), Color::White);

        assert_eq!(board.position().king_square(Color::White), Some(sq("e1")));
        assert_eq!(board.position().king_square(Color::Black), Some(sq("e8")));
        assert_eq!(board.move_count(), 1.0);
        assert_eq!(
            board.position().to_fen(true),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w"
        );
        assert_eq!(board.last_move().unwrap().to_string(), "e7e5");
    }

    #[test]
    fn test_illegal_moves() {
        let mut board = Board::starting();
        assert_eq!(
            board.make_move(sq("e4"), sq("e5"), true),
            Err(IllegalMoveError::EmptySource {
                from: sq("e4"),
                to: sq("e5")
            })
        );
        assert_eq!(
            board.make_move(sq("e7"), sq("e6"), true),
            Err(IllegalMoveError::WrongTurn {
                from: sq("e7"),
                to: sq("e6"),
                turn: Color::White
            })
        );
        assert_eq!(
            board.make_move(sq("a1"), sq("a2"), true),
            Err(IllegalMoveError::SameColorCapture {
                from: sq("a1"),
                to: sq("a2")
            })
        );
        // Refused moves leave the board untouched.
        assert_eq!(board.position(), &Position::starting());
        assert!(board.last_position().is_none());
    }

    #[test]
    fn test_error_message() {
        let mut board = Board::starting();
        let err = board.make_move(sq("e7"), sq("e6"), true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Move (e7e6): It is WHITE's turn to play, but e7 is not a WHITE piece."
        );
    }

    #[test]
    fn test_unchecked_move_ignores_turn() {
        let mut board = Board::starting();
        board.make_move(sq("e7"), sq("e6"), false).unwrap();
        assert!(board.position().is_color(sq("e6"), Color::Black));
        assert_eq!(board.turn(), Color::Black);
    }

    #[test]
    fn test_king_capture_clears_king() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4QK2 w").unwrap();
        let mv = board.make_move(sq("e1"), sq("e8"), true).unwrap();
        assert!(mv.is_capture());
        assert_eq!(board.position().king_square(Color::Black), None);
        assert_eq!(board.position().king_square(Color::White), Some(sq("f1")));
    }

    #[test]
    fn test_king_move_is_tracked() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w").unwrap();
        board.make_move(sq("e1"), sq("d2"), true).unwrap();
        assert_eq!(board.position().king_square(Color::White), Some(sq("d2")));
    }

    #[test]
    fn test_promotion_to_queen() {
        let mut board = Board::from_fen("7k/P7/8/8/8/8/p7/7K w").unwrap();
        board.make_move(sq("a7"), sq("a8"), true).unwrap();
        assert_eq!(
            board.position().piece_at(sq("a8")),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );

        board.make_move(sq("a2"), sq("a1"), true).unwrap();
        assert_eq!(
            board.position().piece_at(sq("a1")),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
    }

    #[test]
    fn test_undo_single_step() {
        let mut board = Board::starting();
        board.make_move(sq("g1"), sq("f3"), true).unwrap();
        assert!(board.undo());
        assert_eq!(board.position(), &Position::starting());
        assert_eq!(board.plies(), 0);
        assert!(!board.undo());
    }

    #[test]
    fn test_apply_and_clone_are_independent() {
        let board = Board::starting();
        let child = board.apply(sq("d2"), sq("d3")).unwrap();
        assert!(board.position().is_color(sq("d2"), Color::White));
        assert!(child.position().is_color(sq("d3"), Color::White));
        assert!(child.clone().last_position().is_none());
    }

    #[test]
    fn test_scan_covers_last_square() {
        // The only white piece sits on h1, index 63.
        let board = Board::from_fen("k7/8/8/8/8/8/8/7R w").unwrap();
        assert_eq!(board.moves().len(), 14);
    }

    #[test]
    fn test_move_categories() {
        let position = Position::from_fen("4k3/8/8/8/8/8/3p4/RN2K3 w").unwrap();
        let fusion = position.move_between(sq("b1"), sq("a1")).unwrap();
        assert_eq!(fusion.category.kind, MoveKind::Fusion);
        let capture = position.move_between(sq("b1"), sq("d2")).unwrap();
        assert_eq!(capture.category.kind, MoveKind::Capture);
        assert!(position.move_between(sq("c1"), sq("c2")).is_none());
    }

    #[test]
    fn test_fusion_makes_knook() {
        for checked in [true, false] {
            let mut board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K3 w").unwrap();
            let mv = board.make_move(sq("b1"), sq("a1"), checked).unwrap();

            assert_eq!(mv.category.kind, MoveKind::Fusion);
            assert_eq!(mv.notation(), "Nb1a1=Ñ");
            assert_eq!(
                board.position().piece_at(sq("a1")),
                Some(Piece::new(PieceKind::Knook, Color::White))
            );
            assert_eq!(board.position().piece_at(sq("b1")), None);
            assert_eq!(board.position().to_fen(true), "4k3/8/8/8/8/8/8/Ñ3K3 b");
            assert_eq!(board.turn(), Color::Black);
        }

        // Rook onto knight fuses as well, on the knight's square.
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K3 w").unwrap();
        board.make_move(sq("a1"), sq("b1"), true).unwrap();
        assert_eq!(
            board.position().piece_at(sq("b1")),
            Some(Piece::new(PieceKind::Knook, Color::White))
        );

        // Other same-colour pairs are still refused.
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K3 w").unwrap();
        assert_eq!(
            board.make_move(sq("e1"), sq("b1"), true),
            Err(IllegalMoveError::SameColorCapture {
                from: sq("e1"),
                to: sq("b1"),
            })
        );
    }

    #[test]
    fn test_generated_moves_apply() {
        for fen in [
            positions::STARTING,
            positions::KNOOKS,
            "r3k3/8/8/8/8/8/8/R3K2Ñ w",
            "4k3/3p4/8/8/1ñ6/8/4P3/4K3 b",
        ] {
            let board = Board::from_fen(fen).unwrap();
            for mv in board.moves() {
                let mut child = board.clone();
                assert_eq!(child.make_move(mv.from, mv.to, true), Ok(mv), "{fen}: {mv}");
            }
        }
    }
}
