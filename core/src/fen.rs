use crate::position::Position;
use crate::types::{Color, Piece, Square};
use thiserror::Error;

/// FEN (Forsyth-Edwards Notation) parsing and serialization.
/// The variant adds `Ñ`/`ñ` for the knook; castling, en passant and clock
/// fields are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("Invalid FEN format: {0}")]
    InvalidFormat(String),
    #[error("Invalid piece character: '{0}'")]
    InvalidPiece(char),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl Position {
    /// Parses a FEN string into a position.
    /// Standard starting position: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut parts = fen.split_whitespace();

        let board = parts
            .next()
            .ok_or_else(|| FenError::InvalidFormat("empty string".to_string()))?;
        let mut position = parse_board(board)?;

        // Everything after the side to move is ignored.
        let turn = match parts.next() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => return Err(FenError::InvalidColor(other.to_string())),
        };
        position.set_turn(turn);

        Ok(position)
    }

    /// Converts the position to a FEN string.
    ///
    /// With `simplify` only the side-to-move marker follows the board; this
    /// form keys the caches and the opening book. Otherwise placeholder
    /// rights and clock fields are appended for standard FEN readers.
    pub fn to_fen(&self, simplify: bool) -> String {
        let marker = self.turn().fen_marker();
        if simplify {
            format!("{} {marker}", self.board_fen())
        } else {
            format!("{} {marker} - - 0 1", self.board_fen())
        }
    }

    /// The simplified FEN used as a cache and book key.
    pub fn key(&self) -> String {
        self.to_fen(true)
    }
}

/// Parses the board portion of a FEN string.
fn parse_board(board_str: &str) -> Result<Position, FenError> {
    let mut position = Position::empty();
    let ranks: Vec<&str> = board_str.split('/').collect();

    if ranks.len() != 8 {
        return Err(FenError::InvalidFormat(format!(
            "Expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    // FEN lists the eighth rank first, which is row 0.
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0u8;

        for ch in rank_str.chars() {
            if col >= 8 {
                return Err(FenError::InvalidFormat(format!(
                    "Too many squares in rank {}",
                    8 - row
                )));
            }

            if let Some(empty_count) = ch.to_digit(10) {
                col += empty_count as u8;
            } else {
                let piece = Piece::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                let square = Square::from_row_col(row as u8, col).ok_or_else(|| {
                    FenError::InvalidFormat(format!("Square out of range in rank {}", 8 - row))
                })?;
                position.set_piece(square, Some(piece));
                col += 1;
            }
        }

        if col != 8 {
            return Err(FenError::InvalidFormat(format!(
                "Rank {} has {} squares, expected 8",
                8 - row,
                col
            )));
        }
    }

    Ok(position)
}

/// Converts the squares of a board to FEN notation.
pub(crate) fn board_to_fen(squares: &[Option<Piece>; 64]) -> String {
    let mut fen = String::new();

    for (row, rank) in squares.chunks(8).enumerate() {
        let mut empty_count = 0;

        for slot in rank {
            match slot {
                Some(piece) => {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            fen.push_str(&empty_count.to_string());
        }

        if row < 7 {
            fen.push('/');
        }
    }

    fen
}

/// Named FEN positions.
pub mod positions {
    /// Starting position.
    pub const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

    /// Position after 1.e4 e5.
    pub const AFTER_E4_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w";

    /// Both sides field a knook in place of the queen's rook.
    pub const KNOOKS: &str = "ñnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/ÑNBQKBNR w";
}
