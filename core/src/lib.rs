pub mod board;
pub mod book;
pub mod evaluation;
pub mod fen;
pub mod perft;
pub mod position;
pub mod rays;
pub mod types;

pub use board::{Board, IllegalMoveError};
pub use book::{BookError, OpeningBook};
pub use evaluation::{evaluate, evaluate_with_mobility, piece_value};
pub use fen::{positions, FenError};
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use position::Position;
pub use rays::{check_rays, rays, RayMode};
pub use types::*;
