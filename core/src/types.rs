use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Represents one of the two players.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the opposite color.
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the row delta of a pawn step for this color.
    /// Row 0 is the eighth rank, so white pawns walk towards lower rows.
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Returns the row on which pawns of this color promote.
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Returns the side-to-move marker used in FEN.
    pub const fn fen_marker(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("WHITE"),
            Color::Black => f.write_str("BLACK"),
        }
    }
}

/// The seven kinds of pieces, including the knook (knight + rook fusion).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    Knook,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Knook,
    ];

    /// Returns the point value of this piece kind.
    /// These are display points, not the weights used by the evaluator.
    pub const fn points(self) -> f64 {
        match self {
            PieceKind::Pawn => 1.0,
            PieceKind::Knight => 3.0,
            PieceKind::Bishop => 3.0,
            PieceKind::Rook => 5.0,
            PieceKind::Queen => 8.0,
            PieceKind::King => 1000.0,
            PieceKind::Knook => 6.5,
        }
    }

    /// Returns the lowercase FEN letter for this kind.
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Knook => 'ñ',
        }
    }

    /// Parses a FEN letter of either case.
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'p' | 'P' => Some(PieceKind::Pawn),
            'n' | 'N' => Some(PieceKind::Knight),
            'b' | 'B' => Some(PieceKind::Bishop),
            'r' | 'R' => Some(PieceKind::Rook),
            'q' | 'Q' => Some(PieceKind::Queen),
            'k' | 'K' => Some(PieceKind::King),
            'ñ' | 'Ñ' => Some(PieceKind::Knook),
            _ => None,
        }
    }
}

/// A piece with both kind and color. Empty squares are `Option::None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    pub const fn points(self) -> f64 {
        self.kind.points()
    }

    /// Parses a FEN character; uppercase is white.
    pub fn from_fen_char(ch: char) -> Option<Self> {
        let kind = PieceKind::from_char(ch)?;
        let color = if ch.is_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }

    /// Returns the FEN character for this piece.
    pub fn to_fen_char(self) -> char {
        let ch = self.kind.to_char();
        match self.color {
            Color::White => ch.to_uppercase().next().unwrap_or(ch),
            Color::Black => ch,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}

/// Error returned when an algebraic square name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid square name: '{0}'")]
pub struct SquareParseError(pub String);

/// A square on the board.
///
/// Squares are indexed `row * 8 + col` where row 0 is the eighth rank and
/// col 0 is the a-file, so `a8` is 0 and `h1` is 63.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Square(u8);

impl Square {
    /// Creates a square from index (0-63).
    /// Returns None if index is out of range.
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Creates a square from a (row, col) pair.
    pub const fn from_row_col(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square(row * 8 + col))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Returns the square `drow` rows and `dcol` columns away, if on the board.
    pub const fn offset(self, drow: i8, dcol: i8) -> Option<Self> {
        let row = self.row() as i8 + drow;
        let col = self.col() as i8 + dcol;
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Some(Square((row * 8 + col) as u8))
        } else {
            None
        }
    }

    /// Returns the square reached by rotating the board half a turn.
    pub const fn rotate(self) -> Self {
        Square(63 - self.0)
    }

    /// Iterates all 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col()) as char;
        let rank = (b'8' - self.row()) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let bytes = lower.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareParseError(s.to_string()));
        }
        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(SquareParseError(s.to_string()));
        }
        Square::from_row_col(b'8' - rank, file - b'a').ok_or_else(|| SquareParseError(s.to_string()))
    }
}

/// What a move does to its destination square.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MoveKind {
    Quiet,
    Capture,
    /// A knight and a rook of the same color joining into a knook.
    Fusion,
}

/// The moving piece kind together with what the move does.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct MoveCategory {
    pub piece: PieceKind,
    pub kind: MoveKind,
}

/// A move from one square to another.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub category: MoveCategory,
}

impl Move {
    pub const fn new(from: Square, to: Square, category: MoveCategory) -> Self {
        Self { from, to, category }
    }

    pub const fn is_capture(self) -> bool {
        matches!(self.category.kind, MoveKind::Capture)
    }

    /// Renders the move for display, e.g. `e2e4`, `Ng1xf3`, `Nb1a1=Ñ`.
    pub fn notation(self) -> String {
        let prefix = match self.category.piece {
            PieceKind::Pawn => String::new(),
            kind => kind.to_char().to_uppercase().collect(),
        };
        match self.category.kind {
            MoveKind::Quiet => format!("{prefix}{}{}", self.from, self.to),
            MoveKind::Capture => format!("{prefix}{}x{}", self.from, self.to),
            MoveKind::Fusion => format!("{prefix}{}{}=Ñ", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}
