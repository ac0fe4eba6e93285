use crate::board::Board;
use crate::position::Position;
use crate::types::*;

/// Scale applied to the summed piece-square difference.
const POSITIONAL_SCALE: f64 = 0.8;
/// Score per destination square of difference in mobility.
const MOBILITY_WEIGHT: f64 = 3.5;
/// King term: awarded for an attacked king, charged for a missing one.
const KING_BONUS: f64 = 150.0;

/// Evaluates a board from White's perspective.
/// Positive scores favor White, negative favor Black.
pub fn evaluate(board: &Board) -> f64 {
    let white_moves = board.possible_moves(Color::White).len();
    let black_moves = board.possible_moves(Color::Black).len();
    evaluate_with_mobility(board, white_moves, black_moves)
}

/// Same as [`evaluate`], with the move counts supplied by the caller.
/// The search passes counts taken from its move-list cache.
pub fn evaluate_with_mobility(board: &Board, white_moves: usize, black_moves: usize) -> f64 {
    let position = board.position();

    let material = material(position, Color::White) - material(position, Color::Black);
    let positional =
        piece_squares(position, Color::White) - piece_squares(position, Color::Black);
    let mobility = white_moves as f64 - black_moves as f64;

    f64::from(material)
        + f64::from(positional) * POSITIONAL_SCALE
        + mobility * MOBILITY_WEIGHT
        + king_term(position)
}

/// Material weight of a piece kind, in centipawns.
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20000,
        PieceKind::Knook => 650,
    }
}

/// Counts material value for a color.
fn material(position: &Position, color: Color) -> i32 {
    position
        .pieces(color)
        .map(|(_, piece)| piece_value(piece.kind))
        .sum()
}

/// Sums the piece-square table entries for a color.
fn piece_squares(position: &Position, color: Color) -> i32 {
    position
        .pieces(color)
        .map(|(square, piece)| piece_square_value(piece.kind, square, color))
        .sum()
}

/// Returns positional value for a piece on a given square.
/// Black reads the tables through a half-turn rotation.
fn piece_square_value(kind: PieceKind, square: Square, color: Color) -> i32 {
    let idx = match color {
        Color::White => square.index(),
        Color::Black => square.rotate().index(),
    } as usize;

    let table = match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
        PieceKind::Knook => &KNOOK_TABLE,
    };
    table[idx]
}

/// White's king bonus minus Black's.
fn king_term(position: &Position) -> f64 {
    king_bonus(position, Color::White) - king_bonus(position, Color::Black)
}

/// A side is rewarded for attacking the enemy king and charged for having lost its own.
fn king_bonus(position: &Position, color: Color) -> f64 {
    if position.king_square(color).is_none() {
        return -KING_BONUS;
    }
    match position.king_square(color.opponent()) {
        Some(king) if position.is_attacked(king) => KING_BONUS,
        _ => 0.0,
    }
}

// Piece-square tables indexed by square, a8 first, from White's side.
// Values are in centipawns.

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,   0,   0,   0,   0,  0,  0,
    50, 50,  50,  50,  50,  50, 50, 50,
    10, 10,  20,  30,  30,  20, 10, 10,
     5,  5,  10,  25,  25,  10,  5,  5,
     0,  0,   0,  20,  20,   0,  0,  0,
     5, -5, -10,   0,   0, -10, -5,  5,
     5, 10,  10, -20, -20,  10, 10,  5,
     0,  0,   0,   0,   0,   0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10,   0,   0,  0,  0,   0,   0, -10,
    -10,   0,   5,  5,  5,   5,   0, -10,
     -5,   0,   5,  5,  5,   5,   0,  -5,
      0,   0,   5,  5,  5,   5,   0,  -5,
    -10,   5,   5,  5,  5,   5,   0, -10,
    -10,   0,   5,  0,  0,   0,   0, -10,
    -20, -10, -10, -5, -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

// Knight centralisation with the rook's liking for open files and the seventh rank.
#[rustfmt::skip]
const KNOOK_TABLE: [i32; 64] = [
    -25, -20, -15, -15, -15, -15, -20, -25,
    -15,   0,   5,   5,   5,   5,   0, -15,
    -20,   0,   5,  10,  10,   5,   0, -20,
    -20,   5,  10,  10,  10,  10,   5, -20,
    -20,   0,  10,  10,  10,  10,   0, -20,
    -20,   5,   5,  10,  10,   5,   5, -20,
    -25, -10,   0,   5,   5,   0, -10, -25,
    -25, -20, -15, -10, -10, -15, -20, -25,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::positions;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn test_material_count() {
        let position = Position::starting();

        let white_material = material(&position, Color::White);
        let black_material = material(&position, Color::Black);
        assert_eq!(white_material, black_material);

        // King 20000, queen 900, two rooks 1000, two bishops 660,
        // two knights 640, eight pawns 800.
        assert_eq!(white_material, 24000);
    }

    #[test]
    fn test_starting_position_evaluation() {
        assert_eq!(evaluate(&Board::starting()), 0.0);
    }

    #[test]
    fn test_rotation_negates_score() {
        for fen in [
            positions::AFTER_E4_E5,
            positions::KNOOKS,
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b",
            "4k3/8/8/3ñ4/8/2N5/4Q3/4K3 w",
            "8/8/8/8/8/8/4Q3/4K3 w",
        ] {
            let original = board(fen);
            let rotated = Board::new(original.position().rotated());
            assert_eq!(
                evaluate(&rotated),
                -evaluate(&original),
                "rotation of {fen}"
            );
        }
    }

    #[test]
    fn test_turn_does_not_change_score() {
        let white = board("4k3/8/8/8/8/8/4Q3/4K3 w");
        let black = board("4k3/8/8/8/8/8/4Q3/4K3 b");
        assert_eq!(evaluate(&white), evaluate(&black));
    }

    #[test]
    fn test_material_advantage() {
        // White has a queen, Black a rook.
        let eval = evaluate(&board("4k3/8/8/4r3/4Q3/8/8/4K3 w"));
        assert!(eval > 300.0, "White material advantage eval: {eval}");
        assert!(eval < 600.0, "White material advantage eval: {eval}");
    }

    #[test]
    fn test_king_term() {
        let quiet = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w").unwrap();
        assert_eq!(king_term(&quiet), 0.0);

        // Black's rook on e8 attacks the white king.
        let attacked = Position::from_fen("k3r3/8/8/8/8/8/8/4K3 w").unwrap();
        assert_eq!(king_bonus(&attacked, Color::White), 0.0);
        assert_eq!(king_bonus(&attacked, Color::Black), KING_BONUS);
        assert_eq!(king_term(&attacked), -KING_BONUS);

        // White's rook on e1 attacks the black king.
        let checking = Position::from_fen("4k3/8/8/8/8/8/8/4R2K w").unwrap();
        assert_eq!(king_bonus(&checking, Color::White), KING_BONUS);
        assert_eq!(king_term(&checking), KING_BONUS);

        // A missing black king is charged to Black.
        let kingless = Position::from_fen("8/8/8/8/8/8/4Q3/4K3 w").unwrap();
        assert_eq!(king_bonus(&kingless, Color::Black), -KING_BONUS);
        assert_eq!(king_term(&kingless), KING_BONUS);
    }

    #[test]
    fn test_mobility_supplied_by_caller() {
        let start = Board::starting();
        assert_eq!(evaluate_with_mobility(&start, 12, 12), 0.0);
        assert_eq!(evaluate_with_mobility(&start, 14, 12), 2.0 * MOBILITY_WEIGHT);
    }

    #[test]
    fn test_knook_table_mirrors() {
        let white = piece_square_value(PieceKind::Knook, "d4".parse().unwrap(), Color::White);
        let black = piece_square_value(PieceKind::Knook, "e5".parse().unwrap(), Color::Black);
        assert_eq!(white, black);
        assert_eq!(piece_value(PieceKind::Knook), 650);
    }
}
