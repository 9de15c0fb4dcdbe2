use crate::blockrace::board::Position;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerNum {
    P1,
    P2,
}

impl PlayerNum {
    pub fn other(&self) -> PlayerNum {
        match self {
            PlayerNum::P1 => PlayerNum::P2,
            PlayerNum::P2 => PlayerNum::P1,
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Marker(PlayerNum),
    Tnt,
    Obstacle,
    Booster,
}

// A token is fully described by its kind and position; two tokens of the same
// kind are interchangeable.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub position: Position,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(x: usize, y: usize, kind: TokenKind) -> Self {
        Token {
            position: Position { x, y },
            kind,
        }
    }
}
