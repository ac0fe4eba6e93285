/// Opening book: simplified FEN keys mapped to candidate moves.
///
/// The JSON file is a flat object, e.g.
/// `{"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w": ["e2 e4", "g1 f3"]}`.
use crate::board::Board;
use crate::types::Square;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum BookError {
    #[error("failed to read opening book {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed opening book: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    variations: HashMap<String, Vec<(Square, Square)>>,
}

impl OpeningBook {
    /// An empty book; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a book from its JSON text.
    /// Move strings that are not two square names are skipped.
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;

        let mut variations = HashMap::with_capacity(raw.len());
        for (key, moves) in raw {
            let parsed: Vec<(Square, Square)> = moves
                .iter()
                .filter_map(|text| match parse_book_move(text) {
                    Some(mv) => Some(mv),
                    None => {
                        warn!(position = %key, entry = %text, "skipping unreadable book move");
                        None
                    }
                })
                .collect();
            variations.insert(key, parsed);
        }

        Ok(Self { variations })
    }

    /// Reads and parses a book file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::from_json(&json)?;
        debug!(path = %path.display(), positions = book.len(), "opening book loaded");
        Ok(book)
    }

    /// Candidate moves for a simplified FEN key.
    pub fn candidates(&self, key: &str) -> &[(Square, Square)] {
        self.variations.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.variations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variations.is_empty()
    }
}

/// Parses `"e2 e4"`.
fn parse_book_move(text: &str) -> Option<(Square, Square)> {
    let mut parts = text.split_whitespace();
    let from = parts.next()?.parse().ok()?;
    let to = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((from, to))
}

impl Board {
    /// Plays a book move for the current position, chosen uniformly among
    /// the candidates. Returns `None` when the position is not in the book.
    pub fn theory_move<R: Rng + ?Sized>(&self, book: &OpeningBook, rng: &mut R) -> Option<Board> {
        let key = self.key();
        let &(from, to) = book.candidates(&key).choose(rng)?;

        match self.apply(from, to) {
            Ok(child) => {
                debug!(position = %key, %from, %to, "book move");
                Some(child)
            }
            Err(err) => {
                warn!(position = %key, error = %err, "book move rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::positions;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BOOK: &str = r#"{
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w": ["e2 e4", "d2 d4", "g1 f3"],
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b": ["e7 e5", "e7", "z9 e5"]
    }"#;

    #[test]
    fn test_from_json() {
        let book = OpeningBook::from_json(BOOK).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.candidates(positions::STARTING).len(), 3);
        assert!(book.candidates(positions::AFTER_E4_E5).is_empty());
    }

    #[test]
    fn test_bad_entries_skipped() {
        let book = OpeningBook::from_json(BOOK).unwrap();
        let candidates = book.candidates("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b");
        let e7: Square = "e7".parse().unwrap();
        let e5: Square = "e5".parse().unwrap();
        assert_eq!(candidates.to_vec(), vec![(e7, e5)]);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            OpeningBook::from_json("[1, 2]"),
            Err(BookError::Json(_))
        ));
        assert!(matches!(
            OpeningBook::load("/nonexistent/opening_book.json"),
            Err(BookError::Io { .. })
        ));
    }

    #[test]
    fn test_theory_move() {
        let book = OpeningBook::from_json(BOOK).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::starting();

        for _ in 0..10 {
            let child = board.theory_move(&book, &mut rng).unwrap();
            assert_eq!(child.turn(), crate::types::Color::Black);
            assert_eq!(child.plies(), 1);
        }
    }

    #[test]
    fn test_theory_move_miss() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::from_fen(positions::AFTER_E4_E5).unwrap();
        assert!(board.theory_move(&OpeningBook::empty(), &mut rng).is_none());
    }
}
