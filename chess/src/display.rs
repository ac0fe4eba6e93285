use crossterm::{
    queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use knook_core::{Board, Color, Move, PieceKind, Position, Square};
use std::io::{self, Write};

fn symbol(kind: PieceKind, color: Color) -> char {
    match (kind, color) {
        (PieceKind::King, Color::White) => '♔',
        (PieceKind::Queen, Color::White) => '♕',
        (PieceKind::Rook, Color::White) => '♖',
        (PieceKind::Bishop, Color::White) => '♗',
        (PieceKind::Knight, Color::White) => '♘',
        (PieceKind::Pawn, Color::White) => '♙',
        (PieceKind::Knook, Color::White) => 'Ñ',
        (PieceKind::King, Color::Black) => '♚',
        (PieceKind::Queen, Color::Black) => '♛',
        (PieceKind::Rook, Color::Black) => '♜',
        (PieceKind::Bishop, Color::Black) => '♝',
        (PieceKind::Knight, Color::Black) => '♞',
        (PieceKind::Pawn, Color::Black) => '♟',
        (PieceKind::Knook, Color::Black) => 'ñ',
    }
}

/// Prints the position with coloured squares, the last move highlighted.
pub fn print_position(
    out: &mut impl Write,
    position: &Position,
    highlight: &[Square],
) -> io::Result<()> {
    queue!(out, Print("\n   a b c d e f g h\n"))?;

    for row in 0..8u8 {
        let rank = 8 - row;
        queue!(out, Print(format!("{rank}  ")))?;

        for col in 0..8u8 {
            let Some(square) = Square::from_row_col(row, col) else {
                continue;
            };

            let background = if highlight.contains(&square) {
                TermColor::DarkYellow
            } else if (row + col) % 2 == 0 {
                TermColor::DarkGrey
            } else {
                TermColor::Black
            };
            queue!(out, SetBackgroundColor(background))?;

            match position.piece_at(square) {
                Some(piece) => {
                    let foreground = match piece.color {
                        Color::White => TermColor::White,
                        Color::Black => TermColor::Magenta,
                    };
                    queue!(
                        out,
                        SetForegroundColor(foreground),
                        Print(format!("{} ", symbol(piece.kind, piece.color)))
                    )?;
                }
                None => queue!(out, Print("  "))?,
            }

            queue!(out, ResetColor)?;
        }

        queue!(out, Print(format!(" {rank}\n")))?;
    }

    queue!(out, Print("   a b c d e f g h\n\n"))?;
    out.flush()
}

/// Prints a board with its side to move and move count, highlighting `last_move`.
pub fn print_board(
    out: &mut impl Write,
    board: &Board,
    last_move: Option<Move>,
) -> io::Result<()> {
    let highlight: Vec<Square> = last_move
        .map(|mv| vec![mv.from, mv.to])
        .unwrap_or_default();
    print_position(out, board.position(), &highlight)?;

    let to_move = match board.turn() {
        Color::White => "White",
        Color::Black => "Black",
    };
    writeln!(out, "{} to move | Move {}", to_move, board.move_count())?;
    writeln!(out, "FEN: {}", board.position().to_fen(false))?;
    out.flush()
}
