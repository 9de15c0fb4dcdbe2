mod board;
mod game_state;
mod input;
mod token;

pub use board::{Board, BoardError, Position, COLS, ROWS};
pub use game_state::GameState;
pub use input::{Direction, InputError, RawInput, ValidInput};
pub use token::{PlayerNum, Token, TokenKind};
