use crate::blockrace::game_state::GameState;
use crate::blockrace::token::PlayerNum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Empty command")]
    EmptyCommand,
    #[error("Unrecognized direction: {0}")]
    UnrecognizedDirection(String),
    #[error("The game is already over")]
    GameOver,
    #[error("It is not {0:?}'s turn")]
    NotYourTurn(PlayerNum),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    // Screen coordinates: y grows downward.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    // Canonical command word; the inverse of from_command.
    pub fn as_command(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    // Decode a free-text command line: the first whitespace-delimited word,
    // matched case-insensitively.
    pub fn from_command(command: &str) -> Result<Direction, InputError> {
        let word = command
            .split_whitespace()
            .next()
            .ok_or(InputError::EmptyCommand)?;
        match word.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(InputError::UnrecognizedDirection(word.to_string())),
        }
    }
}

// A command line exactly as the client sent it.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RawInput {
    pub command: String,
}

#[derive(Copy, Clone, Debug)]
pub struct ValidInput {
    direction: Direction,
}

impl ValidInput {
    // validates:
    // - the game is still running
    // - the sender is the active player
    // - the command decodes to a direction
    pub fn new(
        input: RawInput,
        state: &GameState,
        player_num: PlayerNum,
    ) -> Result<Self, InputError> {
        if state.winner().is_some() {
            return Err(InputError::GameOver);
        }
        if state.active_player() != player_num {
            return Err(InputError::NotYourTurn(player_num));
        }
        let direction = Direction::from_command(&input.command)?;
        Ok(ValidInput { direction })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_word() {
        assert_eq!(Direction::from_command("up").unwrap(), Direction::Up);
        assert_eq!(Direction::from_command("down").unwrap(), Direction::Down);
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(Direction::from_command("LeFt").unwrap(), Direction::Left);
        assert_eq!(Direction::from_command("RIGHT").unwrap(), Direction::Right);
    }

    #[test]
    fn test_decode_takes_first_word_only() {
        assert_eq!(
            Direction::from_command("  down two cells please  ").unwrap(),
            Direction::Down
        );
    }

    #[test]
    fn test_canonical_words_decode_to_themselves() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(
                Direction::from_command(direction.as_command()).unwrap(),
                direction
            );
        }
    }

    #[test]
    fn test_decode_rejects_blank_line() {
        assert!(matches!(
            Direction::from_command("   "),
            Err(InputError::EmptyCommand)
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_word() {
        assert!(matches!(
            Direction::from_command("north"),
            Err(InputError::UnrecognizedDirection(_))
        ));
    }

    #[test]
    fn test_raw_input_wire_shape() {
        let input: RawInput = serde_json::from_str("{\"command\":\"left\"}").unwrap();
        assert_eq!(input.command, "left");
    }

    #[test]
    fn test_valid_input_accepts_active_player() {
        let state = GameState::default();
        let input = RawInput {
            command: "up".to_string(),
        };
        let valid = ValidInput::new(input, &state, PlayerNum::P1).unwrap();
        assert_eq!(valid.direction(), Direction::Up);
    }

    #[test]
    fn test_valid_input_rejects_inactive_player() {
        let state = GameState::default();
        let input = RawInput {
            command: "up".to_string(),
        };
        assert!(matches!(
            ValidInput::new(input, &state, PlayerNum::P2),
            Err(InputError::NotYourTurn(PlayerNum::P2))
        ));
    }

    #[test]
    fn test_valid_input_rejects_finished_game() {
        let mut state = GameState::default();
        // March both pairs straight down; player 1 moves first and wins.
        while state.winner().is_none() {
            state.apply_move(Direction::Down);
        }
        let input = RawInput {
            command: "up".to_string(),
        };
        assert!(matches!(
            ValidInput::new(input, &state, PlayerNum::P1),
            Err(InputError::GameOver)
        ));
    }
}
