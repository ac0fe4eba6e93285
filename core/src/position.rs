/// Array-based position: the 64 squares, side to move and the tracked kings.
use crate::fen::board_to_fen;
use crate::types::*;
use std::cell::OnceCell;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Clone, Debug)]
pub struct Position {
    /// 64 squares, indexed by Square::index()
    squares: [Option<Piece>; 64],
    turn: Color,
    white_king: Option<Square>,
    black_king: Option<Square>,
    /// Board part of the FEN, rebuilt lazily after each mutation
    fen_cache: OnceCell<String>,
}

impl Position {
    /// Creates an empty position with white to move.
    pub const fn empty() -> Self {
        Self {
            squares: [None; 64],
            turn: Color::White,
            white_king: None,
            black_king: None,
            fen_cache: OnceCell::new(),
        }
    }

    /// Creates the standard starting position.
    pub fn starting() -> Self {
        let mut position = Self::empty();

        for square in Square::all() {
            let col = square.col() as usize;
            let piece = match square.row() {
                0 => Some(Piece::new(BACK_RANK[col], Color::Black)),
                1 => Some(Piece::new(PieceKind::Pawn, Color::Black)),
                6 => Some(Piece::new(PieceKind::Pawn, Color::White)),
                7 => Some(Piece::new(BACK_RANK[col], Color::White)),
                _ => None,
            };
            position.set_piece(square, piece);
        }

        position
    }

    /// Gets the piece at the given square.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    /// Places (or clears) a square, keeping the tracked king squares in step.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(old) = self.piece_at(square) {
            if old.kind == PieceKind::King && self.king_square(old.color) == Some(square) {
                self.set_king_square(old.color, None);
            }
        }
        if let Some(new) = piece {
            if new.kind == PieceKind::King {
                self.set_king_square(new.color, Some(square));
            }
        }
        self.squares[square.index() as usize] = piece;
        self.invalidate_fen();
    }

    /// Moves whatever stands on `from` to `to`.
    /// Returns the captured piece, if any. King tracking is left to the caller.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.squares[from.index() as usize];
        let captured = self.squares[to.index() as usize];

        self.squares[from.index() as usize] = None;
        self.squares[to.index() as usize] = piece;
        self.invalidate_fen();

        captured
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    /// Returns the tracked king square, or None once that king was captured.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    pub(crate) fn set_king_square(&mut self, color: Color, square: Option<Square>) {
        match color {
            Color::White => self.white_king = square,
            Color::Black => self.black_king = square,
        }
    }

    /// Returns true if the given square is empty.
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Returns true if the given square contains a piece of the given color.
    pub fn is_color(&self, square: Square, color: Color) -> bool {
        self.piece_at(square).is_some_and(|p| p.color == color)
    }

    /// Returns true if the given square contains an enemy piece.
    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        self.is_color(square, color.opponent())
    }

    /// Iterates the occupied squares of one color in index order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| {
            self.piece_at(square)
                .filter(|piece| piece.color == color)
                .map(|piece| (square, piece))
        })
    }

    /// Board layout part of the FEN, computed once per mutation.
    pub fn board_fen(&self) -> &str {
        self.fen_cache.get_or_init(|| board_to_fen(&self.squares))
    }

    fn invalidate_fen(&mut self) {
        self.fen_cache.take();
    }

    /// Returns the position rotated half a turn with every piece recolored
    /// and the side to move swapped.
    pub fn rotated(&self) -> Position {
        let mut rotated = Position::empty();
        for square in Square::all() {
            let piece = self
                .piece_at(square)
                .map(|p| Piece::new(p.kind, p.color.opponent()));
            rotated.set_piece(square.rotate(), piece);
        }
        rotated.turn = self.turn.opponent();
        rotated
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.turn == other.turn
            && self.white_king == other.white_king
            && self.black_king == other.black_king
    }
}

impl Eq for Position {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_starting_position() {
        let position = Position::starting();

        assert_eq!(
            position.piece_at(sq("a1")),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert_eq!(
            position.piece_at(sq("e1")),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            position.piece_at(sq("e8")),
            Some(Piece::new(PieceKind::King, Color::Black))
        );
        assert!(position.piece_at(sq("e4")).is_none());

        assert_eq!(position.king_square(Color::White), Some(sq("e1")));
        assert_eq!(position.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(position.pieces(Color::White).count(), 16);
        assert_eq!(position.pieces(Color::Black).count(), 16);
    }

    #[test]
    fn test_move_piece_invalidates_fen() {
        let mut position = Position::starting();
        assert_eq!(
            position.board_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );

        let captured = position.move_piece(sq("e2"), sq("e4"));
        assert!(captured.is_none());
        assert!(position.is_empty(sq("e2")));
        assert!(position.is_color(sq("e4"), Color::White));
        assert_eq!(
            position.board_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"
        );
    }

    #[test]
    fn test_set_piece_tracks_kings() {
        let mut position = Position::empty();
        position.set_piece(sq("g1"), Some(Piece::new(PieceKind::King, Color::White)));
        assert_eq!(position.king_square(Color::White), Some(sq("g1")));

        position.set_piece(sq("g1"), None);
        assert_eq!(position.king_square(Color::White), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Position::starting();
        let mut copy = original.clone();
        copy.move_piece(sq("d2"), sq("d4"));

        assert!(original.is_color(sq("d2"), Color::White));
        assert_ne!(original, copy);
        assert_ne!(original.board_fen(), copy.board_fen());
    }

    #[test]
    fn test_rotated() {
        let position = Position::starting();
        let rotated = position.rotated();

        // Kings and queens swap files after a half turn.
        assert_eq!(
            rotated.piece_at(sq("d8")),
            Some(Piece::new(PieceKind::King, Color::Black))
        );
        assert_eq!(rotated.king_square(Color::White), Some(sq("d1")));
        assert_eq!(rotated.turn(), Color::Black);
        assert_eq!(rotated.rotated(), position);
    }
}
