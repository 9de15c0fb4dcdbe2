use crate::blockrace::input::Direction;
use crate::blockrace::token::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const COLS: usize = 18;
pub const ROWS: usize = 12;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Token at {0} is outside the grid")]
    OutOfBounds(Position),
    #[error("Cell {0} is occupied by more than one token")]
    DoubleOccupancy(Position),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Position {
    pub fn in_bounds(&self) -> bool {
        self.x < COLS && self.y < ROWS
    }

    // One cell in the given direction, clamped to the grid edge. Clamping,
    // not wraparound, is the edge policy.
    pub fn step_clamped(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position {
            x: self.x.saturating_add_signed(dx).min(COLS - 1),
            y: self.y.saturating_add_signed(dy).min(ROWS - 1),
        }
    }
}

// An unordered set of tokens; cells not listed are empty.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tokens: Vec<Token>,
}

impl Board {
    // Ensure that every token is on the grid and that no cell holds more
    // than one token.
    pub fn new(tokens: Vec<Token>) -> Result<Self, BoardError> {
        for (i, token) in tokens.iter().enumerate() {
            if !token.position.in_bounds() {
                return Err(BoardError::OutOfBounds(token.position));
            }
            if tokens[..i].iter().any(|t| t.position == token.position) {
                return Err(BoardError::DoubleOccupancy(token.position));
            }
        }
        Ok(Board { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    // First token occupying the cell, in insertion order. Play can introduce
    // overlapping markers, in which case the earlier token wins the lookup.
    pub fn occupant(&self, position: Position) -> Option<&Token> {
        self.tokens.iter().find(|t| t.position == position)
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub(crate) fn remove_tnt_at(&mut self, cells: &[Position]) {
        self.tokens
            .retain(|t| !(t.kind == TokenKind::Tnt && cells.contains(&t.position)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockrace::token::PlayerNum;

    #[test]
    fn test_rejects_out_of_bounds_token() {
        let result = Board::new(vec![Token::new(COLS, 3, TokenKind::Obstacle)]);
        assert!(matches!(result, Err(BoardError::OutOfBounds(_))));
    }

    #[test]
    fn test_rejects_double_occupancy() {
        let result = Board::new(vec![
            Token::new(4, 4, TokenKind::Tnt),
            Token::new(4, 4, TokenKind::Marker(PlayerNum::P1)),
        ]);
        assert!(matches!(result, Err(BoardError::DoubleOccupancy(_))));
    }

    #[test]
    fn test_occupant_lookup() {
        let board = Board::new(vec![
            Token::new(4, 4, TokenKind::Tnt),
            Token::new(5, 4, TokenKind::Booster),
        ])
        .unwrap();
        let occupant = board.occupant(Position { x: 5, y: 4 }).unwrap();
        assert_eq!(occupant.kind, TokenKind::Booster);
        assert!(board.occupant(Position { x: 6, y: 4 }).is_none());
    }

    #[test]
    fn test_step_clamped_interior() {
        let position = Position { x: 5, y: 5 };
        assert_eq!(position.step_clamped(Direction::Up), Position { x: 5, y: 4 });
        assert_eq!(position.step_clamped(Direction::Down), Position { x: 5, y: 6 });
        assert_eq!(position.step_clamped(Direction::Left), Position { x: 4, y: 5 });
        assert_eq!(position.step_clamped(Direction::Right), Position { x: 6, y: 5 });
    }

    #[test]
    fn test_step_clamped_at_edges() {
        let origin = Position { x: 0, y: 0 };
        assert_eq!(origin.step_clamped(Direction::Left), origin);
        assert_eq!(origin.step_clamped(Direction::Up), origin);
        let corner = Position {
            x: COLS - 1,
            y: ROWS - 1,
        };
        assert_eq!(corner.step_clamped(Direction::Right), corner);
        assert_eq!(corner.step_clamped(Direction::Down), corner);
    }
}
