use crate::position::Position;
use crate::types::{Color, PieceKind, Square};

/// Direction and offset tables, written as (row delta, col delta).
/// Row deltas are negative towards the eighth rank.
const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (1, -1),
    (0, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (1, 1),
    (0, 1),
];

/// Selects what `rays` computes for an occupied square.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RayMode {
    /// Destinations reachable by the occupant under its movement rule.
    Move,
    /// Opponent pieces attacking the occupant.
    InCheck,
}

/// Generates the squares reachable from (or, in `InCheck` mode, attacking)
/// the piece on `square`. An empty square yields nothing.
pub fn rays(position: &Position, square: Square, mode: RayMode) -> Vec<Square> {
    let Some(piece) = position.piece_at(square) else {
        return Vec::new();
    };

    if mode == RayMode::InCheck {
        return check_rays(position, square, piece.color);
    }

    let mut out = Vec::with_capacity(16);
    let color = piece.color;
    match piece.kind {
        PieceKind::Pawn => pawn_rays(position, square, color, &mut out),
        PieceKind::Knight => step(position, square, color, &KNIGHT_OFFSETS, &mut out),
        PieceKind::Bishop => slide(position, square, color, &DIAGONAL, &mut out),
        PieceKind::Rook => slide(position, square, color, &ORTHOGONAL, &mut out),
        PieceKind::Queen => {
            slide(position, square, color, &DIAGONAL, &mut out);
            slide(position, square, color, &ORTHOGONAL, &mut out);
        }
        PieceKind::King => step(position, square, color, &KING_OFFSETS, &mut out),
        PieceKind::Knook => {
            step(position, square, color, &KNIGHT_OFFSETS, &mut out);
            slide(position, square, color, &ORTHOGONAL, &mut out);
        }
    }
    out
}

/// Slides along each direction until the board edge or the first occupant.
/// An opponent occupant is included (capture), an own piece is not.
fn slide(
    position: &Position,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<Square>,
) {
    for &(drow, dcol) in directions {
        let mut current = from;
        while let Some(next) = current.offset(drow, dcol) {
            match position.piece_at(next) {
                None => out.push(next),
                Some(occupant) => {
                    if occupant.color != color {
                        out.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
}

/// Fixed-offset steps, blocked only by own pieces.
fn step(
    position: &Position,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<Square>,
) {
    for &(drow, dcol) in offsets {
        if let Some(target) = from.offset(drow, dcol) {
            if !position.is_color(target, color) {
                out.push(target);
            }
        }
    }
}

/// Pawns capture diagonally forward and move one square straight forward.
/// No double push, no en passant.
fn pawn_rays(position: &Position, from: Square, color: Color, out: &mut Vec<Square>) {
    let forward = color.pawn_direction();

    for dcol in [-1, 1] {
        if let Some(target) = from.offset(forward, dcol) {
            if position.is_enemy(target, color) {
                out.push(target);
            }
        }
    }

    if let Some(target) = from.offset(forward, 0) {
        if position.is_empty(target) {
            out.push(target);
        }
    }
}

/// Returns the opponent pieces that attack a piece of `color` on `square`.
///
/// Kings are not counted as attackers.
pub fn check_rays(position: &Position, square: Square, color: Color) -> Vec<Square> {
    let mut attackers = Vec::new();

    line_attackers(
        position,
        square,
        color,
        &DIAGONAL,
        &[PieceKind::Bishop, PieceKind::Queen],
        &mut attackers,
    );
    line_attackers(
        position,
        square,
        color,
        &ORTHOGONAL,
        &[PieceKind::Rook, PieceKind::Queen, PieceKind::Knook],
        &mut attackers,
    );
    step_attackers(
        position,
        square,
        color,
        &KNIGHT_OFFSETS,
        &[PieceKind::Knight, PieceKind::Knook],
        &mut attackers,
    );

    // An enemy pawn attacks us from one row ahead of us, on either side.
    let forward = color.pawn_direction();
    step_attackers(
        position,
        square,
        color,
        &[(forward, -1), (forward, 1)],
        &[PieceKind::Pawn],
        &mut attackers,
    );

    attackers
}

fn line_attackers(
    position: &Position,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    kinds: &[PieceKind],
    out: &mut Vec<Square>,
) {
    for &(drow, dcol) in directions {
        let mut current = from;
        while let Some(next) = current.offset(drow, dcol) {
            if let Some(occupant) = position.piece_at(next) {
                if occupant.color != color && kinds.contains(&occupant.kind) {
                    out.push(next);
                }
                break;
            }
            current = next;
        }
    }
}

fn step_attackers(
    position: &Position,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    kinds: &[PieceKind],
    out: &mut Vec<Square>,
) {
    for &(drow, dcol) in offsets {
        if let Some(target) = from.offset(drow, dcol) {
            if let Some(occupant) = position.piece_at(target) {
                if occupant.color != color && kinds.contains(&occupant.kind) {
                    out.push(target);
                }
            }
        }
    }
}

impl Position {
    /// Returns true if the piece on `square` is attacked by the opponent.
    pub fn is_attacked(&self, square: Square) -> bool {
        !rays(self, square, RayMode::InCheck).is_empty()
    }

    /// Returns true if `color` still has a king and it is attacked.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| !check_rays(self, king, color).is_empty())
    }

    /// Squares of `color` whose occupant has at least one destination.
    pub fn movable_squares(&self, color: Color) -> Vec<Square> {
        self.pieces(color)
            .map(|(square, _)| square)
            .filter(|&square| !rays(self, square, RayMode::Move).is_empty())
            .collect()
    }
}
