use crate::cache::{SearchCaches, SearchEntry, SearchKey};
use knook_core::{evaluate, evaluate_with_mobility, Board, Color, Move, OpeningBook};
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Depth used when the side to move has many moves.
pub const DEFAULT_DEPTH: u8 = 4;
/// Depth used when the side to move has few moves.
pub const NARROW_DEPTH: u8 = 5;
/// Below this many moves the search goes one ply deeper.
const NARROW_BRANCHING: usize = 10;
/// Floor for the measured duration, so nodes/second stays finite.
const MIN_DURATION: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Fixed depth; `None` picks it from the number of moves at the root.
    pub max_depth: Option<u8>,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self {
            max_depth: Some(depth),
        }
    }

    pub fn auto() -> Self {
        Self { max_depth: None }
    }
}

/// Timing and node figures of a completed search.
#[derive(Debug, Clone)]
pub struct SearchDiagnostics {
    pub nodes: u64,
    pub duration: Duration,
    pub nodes_per_sec: f64,
    /// Static score of the board searched from
    pub pre_static: f64,
    /// Static score of the chosen board
    pub post_static: Option<f64>,
    /// Score returned by the search
    pub post_dynamic: f64,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Board after the chosen move
    pub board: Option<Board>,
    pub score: f64,
    /// Depth searched; 0 for a book move
    pub depth: u8,
    pub from_book: bool,
    /// Present for searched moves, absent for book moves
    pub diagnostics: Option<SearchDiagnostics>,
}

/// State threaded through one search: the caches and the node counter.
pub struct SearchInfo<'a> {
    caches: &'a mut SearchCaches,
    nodes: u64,
}

impl<'a> SearchInfo<'a> {
    pub fn new(caches: &'a mut SearchCaches) -> Self {
        Self { caches, nodes: 0 }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn moves(&mut self, board: &Board, color: Color) -> Vec<Move> {
        self.caches.moves.moves(board, color).to_vec()
    }

    /// Static evaluation with the move counts taken from the cache.
    fn evaluate(&mut self, board: &Board) -> f64 {
        let white = self.caches.moves.moves(board, Color::White).len();
        let black = self.caches.moves.moves(board, Color::Black).len();
        evaluate_with_mobility(board, white, black)
    }
}

/// Picks the search depth for `board`.
pub fn select_depth(board: &Board, limits: SearchLimits, caches: &mut SearchCaches) -> u8 {
    limits.max_depth.unwrap_or_else(|| {
        if caches.moves.moves(board, board.turn()).len() < NARROW_BRANCHING {
            NARROW_DEPTH
        } else {
            DEFAULT_DEPTH
        }
    })
}

/// Minimax with alpha-beta pruning, scored from White's side.
///
/// Returns the board after the best move (the first examined move wins
/// ties) and its score. A board without a black king scores +∞, one
/// without a white king −∞; depth 0 or no moves gives the static score.
pub fn minimax(
    board: &Board,
    depth: u8,
    alpha: f64,
    beta: f64,
    maximizing: bool,
    info: &mut SearchInfo,
) -> (Option<Board>, f64) {
    let (best, score) = alpha_beta(board, depth, alpha, beta, maximizing, info);
    (best.map(|(_, child)| child), score)
}

fn alpha_beta(
    board: &Board,
    depth: u8,
    mut alpha: f64,
    mut beta: f64,
    maximizing: bool,
    info: &mut SearchInfo,
) -> (Option<(Move, Board)>, f64) {
    info.nodes += 1;

    let position = board.position();
    if position.king_square(Color::Black).is_none() {
        return (None, f64::INFINITY);
    }
    if position.king_square(Color::White).is_none() {
        return (None, f64::NEG_INFINITY);
    }

    let moves = info.moves(board, board.turn());
    if depth == 0 || moves.is_empty() {
        return (None, info.evaluate(board));
    }

    let key = board.key();
    let mut best: Option<(Move, Board)> = None;
    let mut best_score = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    for mv in moves {
        let search_key = SearchKey {
            position: key.clone(),
            from: mv.from,
            to: mv.to,
            depth,
        };

        let cached = info
            .caches
            .search
            .probe(&search_key)
            .map(|entry| (entry.board.clone(), entry.score));

        let (child, score) = match cached {
            Some(hit) => {
                info.nodes += 1;
                hit
            }
            None => {
                let mut child = board.clone();
                // Generated moves always start from an occupied square.
                let played = child.make_move(mv.from, mv.to, false);
                debug_assert!(played.is_ok(), "generated move {mv} refused: {played:?}");
                if played.is_err() {
                    continue;
                }
                let (_, score) = alpha_beta(&child, depth - 1, alpha, beta, !maximizing, info);

                // Only exact scores are reusable under another window.
                if (alpha < score && score < beta) || score.is_infinite() {
                    info.caches.search.store(
                        search_key,
                        SearchEntry {
                            board: child.clone(),
                            score,
                        },
                    );
                }
                (child, score)
            }
        };

        if maximizing {
            if best.is_none() || score > best_score {
                best_score = score;
                best = Some((mv, child));
            }
            alpha = alpha.max(best_score);
        } else {
            if best.is_none() || score < best_score {
                best_score = score;
                best = Some((mv, child));
            }
            beta = beta.min(best_score);
        }

        if beta <= alpha {
            break;
        }
    }

    (best, best_score)
}

/// Chooses a move for the side to move.
///
/// A book move is played when the position is in the book, scored
/// statically and without diagnostics. Otherwise the board is searched
/// from the full window and the search is timed.
pub fn best_move<R: Rng + ?Sized>(
    board: &Board,
    limits: SearchLimits,
    book: Option<&OpeningBook>,
    caches: &mut SearchCaches,
    rng: &mut R,
) -> SearchResult {
    if let Some(child) = book.and_then(|book| board.theory_move(book, rng)) {
        let score = evaluate(&child);
        debug!(score, "playing book move");
        return SearchResult {
            best_move: child.last_move(),
            board: Some(child),
            score,
            depth: 0,
            from_book: true,
            diagnostics: None,
        };
    }

    let depth = select_depth(board, limits, caches);
    let maximizing = board.turn() == Color::White;

    if tracing::enabled!(tracing::Level::TRACE) {
        let moves: Vec<String> = caches
            .moves
            .moves(board, board.turn())
            .iter()
            .map(Move::to_string)
            .collect();
        trace!(?moves, "root moves");
    }

    let start_time = Instant::now();
    let mut info = SearchInfo::new(caches);
    let (best, score) = alpha_beta(
        board,
        depth,
        f64::NEG_INFINITY,
        f64::INFINITY,
        maximizing,
        &mut info,
    );
    let duration = start_time.elapsed().max(MIN_DURATION);
    let nodes = info.nodes();

    let pre_static = evaluate(board);
    let post_static = best.as_ref().map(|(_, child)| evaluate(child));
    let nodes_per_sec = nodes as f64 / duration.as_secs_f64();

    debug!(
        depth,
        nodes,
        score,
        elapsed_ms = duration.as_millis() as u64,
        "search complete"
    );

    let (best_move, board) = match best {
        Some((mv, child)) => (Some(mv), Some(child)),
        None => (None, None),
    };

    SearchResult {
        best_move,
        board,
        score,
        depth,
        from_book: false,
        diagnostics: Some(SearchDiagnostics {
            nodes,
            duration,
            nodes_per_sec,
            pre_static,
            post_static,
            post_dynamic: score,
        }),
    }
}
