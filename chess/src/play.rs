use crate::display::print_board;
use anyhow::{Context, Result};
use knook_agents::{MinimaxAgent, SearchResult};
use knook_core::{Board, Color, IllegalMoveError, Move, Square};
use std::io::{self, BufRead, Write};
use tracing::info;

/// Parses `e7e5` or `e7 e5`.
fn parse_squares(input: &str) -> Option<(Square, Square)> {
    let compact: String = input.split_whitespace().collect();
    if compact.len() != 4 || !compact.is_ascii() {
        return None;
    }
    let from = compact[..2].parse().ok()?;
    let to = compact[2..].parse().ok()?;
    Some((from, to))
}

fn winner(board: &Board) -> Option<Color> {
    let position = board.position();
    if position.king_square(Color::Black).is_none() {
        Some(Color::White)
    } else if position.king_square(Color::White).is_none() {
        Some(Color::Black)
    } else {
        None
    }
}

pub fn print_search(out: &mut impl Write, result: &SearchResult) -> io::Result<()> {
    if let Some(mv) = result.best_move {
        writeln!(out, "Engine plays: {}", mv)?;
    }
    writeln!(out, "Eval: {}", result.score)?;
    match &result.diagnostics {
        Some(diagnostics) => {
            writeln!(
                out,
                "calculated {} nodes at depth {}, in {:.3} seconds",
                diagnostics.nodes,
                result.depth,
                diagnostics.duration.as_secs_f64()
            )?;
            writeln!(out, "\tEffectively {:.0} nodes/sec", diagnostics.nodes_per_sec)?;
            writeln!(out, "\tpre static: {}", diagnostics.pre_static)?;
            match diagnostics.post_static {
                Some(score) => writeln!(out, "\tpost static: {}", score)?,
                None => writeln!(out, "\tpost static: -")?,
            }
            writeln!(out, "\tpost dynamic: {}", diagnostics.post_dynamic)?;
        }
        None if result.from_book => writeln!(out, "(book move)")?,
        None => {}
    }
    Ok(())
}

/// A game in progress on the terminal.
struct Game {
    board: Board,
    /// Move to highlight; search results can come from the cache without one.
    last_move: Option<Move>,
    /// Board at the start of each of the human's turns, oldest first.
    history: Vec<Board>,
}

impl Game {
    fn new(board: Board) -> Self {
        Self {
            board,
            last_move: None,
            history: Vec::new(),
        }
    }

    fn human_move(&mut self, from: Square, to: Square) -> Result<Move, IllegalMoveError> {
        let before = self.board.clone();
        let mv = self.board.make_move(from, to, true)?;
        self.history.push(before);
        self.last_move = Some(mv);
        Ok(mv)
    }

    /// Plays the searched move. Returns false when the engine had none.
    fn engine_move(&mut self, result: &SearchResult) -> bool {
        match (&result.board, result.best_move) {
            (Some(next), Some(mv)) => {
                self.board = next.clone();
                self.last_move = Some(mv);
                true
            }
            _ => false,
        }
    }

    /// Takes back the human's last move and the engine's reply.
    fn take_back(&mut self) -> bool {
        match self.history.pop() {
            Some(board) => {
                self.board = board;
                self.last_move = None;
                true
            }
            None => false,
        }
    }
}

/// Engine (White) against a human (Black) on the terminal.
pub fn play(board: Board, mut agent: MinimaxAgent) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    let mut game = Game::new(board);

    writeln!(stdout, "Enter moves as 'e7e5'. Commands: undo, help, quit")?;

    loop {
        print_board(&mut stdout, &game.board, game.last_move)?;

        if let Some(color) = winner(&game.board) {
            writeln!(stdout, "{} captured the king and wins!", color)?;
            return Ok(());
        }

        if game.board.turn() == Color::White {
            let result = agent.search(&game.board);
            print_search(&mut stdout, &result)?;
            if !game.engine_move(&result) {
                writeln!(stdout, "Engine has no move.")?;
                return Ok(());
            }
            continue;
        }

        write!(stdout, "Enter move => ")?;
        stdout.flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("failed to read move")?;

        match line.trim() {
            "quit" | "exit" => return Ok(()),
            "help" => {
                writeln!(stdout, "Moves: source and destination squares, e.g. 'e7e5'")?;
                writeln!(
                    stdout,
                    "Commands: undo (take back your last move and the reply), help, quit"
                )?;
            }
            "undo" => {
                if !game.take_back() {
                    writeln!(stdout, "Nothing to undo")?;
                }
            }
            input => match parse_squares(input) {
                Some((from, to)) => match game.human_move(from, to) {
                    Ok(mv) => info!(%mv, "human move"),
                    Err(err) => writeln!(stdout, "{}", err)?,
                },
                None => writeln!(stdout, "Invalid move. Try again (e.g., e7e5)")?,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knook_agents::SearchLimits;

    #[test]
    fn test_parse_squares() {
        let (from, to) = parse_squares("e7e5").unwrap();
        assert_eq!((from.to_string(), to.to_string()), ("e7".into(), "e5".into()));
        assert!(parse_squares("e7 e5").is_some());
        assert!(parse_squares("e7").is_none());
        assert!(parse_squares("e9e5").is_none());
        assert!(parse_squares("ñ7e5").is_none());
    }

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_take_back_returns_to_human_turn() {
        let mut agent = MinimaxAgent::new(SearchLimits::depth(1)).with_seed(0);
        let mut game = Game::new(Board::starting());
        assert!(!game.take_back());

        let result = agent.search(&game.board);
        assert!(game.engine_move(&result));
        let before_human = game.board.clone();
        assert_eq!(before_human.turn(), Color::Black);

        game.human_move(sq("e7"), sq("e6")).unwrap();
        let result = agent.search(&game.board);
        assert!(game.engine_move(&result));
        assert_eq!(game.board.turn(), Color::Black);

        assert!(game.take_back());
        assert_eq!(game.board.position(), before_human.position());
        assert_eq!(game.board.turn(), Color::Black);
        assert_eq!(game.last_move, None);
        assert!(!game.take_back());
    }

    #[test]
    fn test_refused_move_is_not_recorded() {
        // White is to move, so Black's pawn may not.
        let mut game = Game::new(Board::starting());
        assert!(game.human_move(sq("e7"), sq("e5")).is_err());
        assert!(game.history.is_empty());
        assert!(!game.take_back());
    }

    #[test]
    fn test_engine_move_is_highlighted_from_cache() {
        let mut agent = MinimaxAgent::new(SearchLimits::depth(2)).with_seed(0);
        let board = Board::starting();
        agent.search(&board);

        // The second search reuses cached children, which carry no last move.
        let result = agent.search(&board);
        let mut game = Game::new(board);
        assert!(game.engine_move(&result));
        assert!(game.last_move.is_some());
        assert_eq!(game.last_move, result.best_move);
    }

    #[test]
    fn test_winner() {
        assert_eq!(winner(&Board::starting()), None);
        let board = Board::from_fen("8/8/8/8/8/8/4Q3/4K3 b").unwrap();
        assert_eq!(winner(&board), Some(Color::White));
    }
}
