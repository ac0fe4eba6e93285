mod display;
mod play;

use anyhow::{bail, Context, Result};
use display::{print_board, print_position};
use knook_agents::{MinimaxAgent, SearchLimits};
use knook_core::{evaluate, perft, perft_divide, positions, Board, OpeningBook};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the opening book file.
const BOOK_ENV: &str = "KNOOK_BOOK";
/// Book file picked up from the working directory when nothing else is given.
const DEFAULT_BOOK: &str = "opening_book.json";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_board(fen: Option<&String>) -> Result<Board> {
    match fen {
        Some(fen) => Board::from_fen(fen).with_context(|| format!("invalid FEN '{fen}'")),
        None => Ok(Board::starting()),
    }
}

/// Removes `--book <path>` from the arguments and resolves the book to use.
fn take_book(args: &mut Vec<String>) -> Result<Option<OpeningBook>> {
    let explicit = match args.iter().position(|arg| arg == "--book") {
        Some(index) => {
            if index + 1 >= args.len() {
                bail!("--book needs a path");
            }
            let path = args.remove(index + 1);
            args.remove(index);
            Some(PathBuf::from(path))
        }
        None => env::var_os(BOOK_ENV).map(PathBuf::from),
    };

    match explicit {
        Some(path) => {
            let book = OpeningBook::load(&path)
                .with_context(|| format!("failed to load opening book {}", path.display()))?;
            Ok(Some(book))
        }
        None if Path::new(DEFAULT_BOOK).exists() => match OpeningBook::load(DEFAULT_BOOK) {
            Ok(book) => Ok(Some(book)),
            Err(err) => {
                warn!(error = %err, "ignoring default opening book");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

fn new_agent(book: Option<OpeningBook>) -> MinimaxAgent {
    let agent = MinimaxAgent::new(SearchLimits::auto());
    match book {
        Some(book) => agent.with_book(book),
        None => agent,
    }
}

/// Reads FENs from stdin and prints the search statistics for each.
fn perf(book: Option<OpeningBook>) -> Result<()> {
    let mut agent = new_agent(book);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "Enter Fen => ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let fen = line.trim();
        if fen.is_empty() {
            continue;
        }

        let board = match Board::from_fen(fen) {
            Ok(board) => board,
            Err(err) => {
                writeln!(stdout, "Error parsing FEN: {}", err)?;
                continue;
            }
        };

        let result = agent.search(&board);
        print_position(&mut stdout, board.position(), &[])?;
        if let Some(next) = &result.board {
            print_board(&mut stdout, next, result.best_move)?;
        }
        play::print_search(&mut stdout, &result)?;
        writeln!(stdout, "\n")?;
    }
}

fn run_perft(depth: u8, board: &Board) {
    println!("Running perft({})...", depth);
    println!("Position: {}", board.position().to_fen(true));

    if depth <= 3 {
        // Show move breakdown for shallow depths
        let results = perft_divide(board, depth);
        let mut total = 0;

        for (mv, count) in &results {
            println!("{}: {}", mv, count);
            total += count;
        }

        println!("\nTotal: {}", total);
    } else {
        let start = Instant::now();
        let nodes = perft(board, depth);
        let elapsed = start.elapsed();

        println!("Nodes: {}", nodes);
        println!("Time: {:.2}s", elapsed.as_secs_f64());
        println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64().max(1e-3));
    }
}

fn print_usage(program: &str) {
    println!("Knook chess engine");
    println!("Usage: {} <command> [--book <path>]", program);
    println!("Commands:");
    println!("  play [fen]           - Play Black against the engine");
    println!("  perf                 - Search FENs read from stdin and print statistics");
    println!("  eval [fen]           - Evaluate a position (+ = White, - = Black)");
    println!("  perft <depth> [fen]  - Count the move tree");
    println!("\nThe opening book is read from --book, ${}, or ./{}.", BOOK_ENV, DEFAULT_BOOK);
    println!("\nExample FEN positions:");
    println!("  Starting: {}", positions::STARTING);
    println!("  Knooks:   {}", positions::KNOOKS);
}

fn main() -> Result<()> {
    init_logging();

    let mut args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "knook".to_string());
    let book = take_book(&mut args)?;
    debug!(book = book.is_some(), "starting");

    match args.get(1).map(String::as_str) {
        Some("play") => {
            let board = parse_board(args.get(2))?;
            play::play(board, new_agent(book))
        }
        Some("perf") => perf(book),
        Some("eval") => {
            let board = parse_board(args.get(2))?;
            print_board(&mut io::stdout(), &board, board.last_move())?;
            println!("Evaluation: {} (+ = White, - = Black)", evaluate(&board));
            Ok(())
        }
        Some("perft") => {
            let Some(depth) = args.get(2) else {
                bail!("Usage: {} perft <depth> [fen]", program);
            };
            let depth: u8 = depth
                .parse()
                .with_context(|| format!("invalid depth '{depth}'"))?;
            let board = parse_board(args.get(3))?;
            run_perft(depth, &board);
            Ok(())
        }
        _ => {
            print_usage(&program);
            Ok(())
        }
    }
}
