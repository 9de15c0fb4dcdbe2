mod blockrace;
pub mod messages;

pub use blockrace::{
    Board, BoardError, Direction, GameState, InputError, PlayerNum, Position, RawInput, Token,
    TokenKind, ValidInput, COLS, ROWS,
};
