use crate::client::SendMsg;
use crate::util;
use common::{messages::Response, GameState, InputError, PlayerNum, RawInput, ValidInput};
use hashbrown::HashMap;
use serde::Serialize;
use serde_json::from_str;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub type Games = Arc<RwLock<HashMap<String, Game>>>;

#[derive(Clone, Debug)]
enum ProtocolState {
    InGame,
    // true means that the player wants a rematch, false means they don't
    Rematch([Option<bool>; 2]),
    End,
}

#[derive(Debug)]
pub struct Game {
    game_state: GameState,
    // The first element is Player 1's ID and the second is Player 2's ID
    player_ids: [String; 2],
    protocol_state: ProtocolState,
}

impl Game {
    pub fn new(game_state: GameState, player_ids: [String; 2]) -> Self {
        Game {
            game_state,
            player_ids,
            protocol_state: ProtocolState::InGame,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.protocol_state, ProtocolState::End)
    }

    // Given a client's ID, gets the opponent's ID for the game they have joined
    pub fn opponent_id(&self, id: String) -> String {
        if id == self.player_ids[0] {
            self.player_ids[1].clone()
        } else if id == self.player_ids[1] {
            self.player_ids[0].clone()
        } else {
            panic!(
                "Client with ID {} did not match any of the game's client IDs {:?}",
                id, self.player_ids
            );
        }
    }

    pub fn handle_message(
        &mut self,
        player_num: PlayerNum,
        msg: &str,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
    ) {
        use ProtocolState::*;
        self.protocol_state = match self.protocol_state.clone() {
            InGame => {
                let input: RawInput = match from_str(msg) {
                    Ok(input) => input,
                    Err(err) => {
                        warn!("Failed to deserialize input into a move command: {}", err);
                        return;
                    }
                };
                match self.process_input(client, opponent, player_num, input) {
                    Ok(state) => state,
                    Err(err) => {
                        warn!("Rejected game input: {}", err);
                        return;
                    }
                }
            }
            Rematch(choices) => {
                let choice: bool = match from_str(msg) {
                    Ok(choice) => choice,
                    Err(err) => {
                        warn!("Failed to deserialize input into rematch choice: {}", err);
                        return;
                    }
                };
                self.process_rematch_choice(client, opponent, choices, player_num, choice)
            }
            End => End,
        }
    }

    // A validated move is applied to the engine and the refreshed state is
    // broadcast; the move that decides the game switches the protocol to the
    // rematch handshake.
    fn process_input(
        &mut self,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
        player_num: PlayerNum,
        input: RawInput,
    ) -> Result<ProtocolState, InputError> {
        let validated_input = ValidInput::new(input, &self.game_state, player_num)?;
        self.game_state.apply_move(validated_input.direction());
        let state = if let Some(winner) = self.game_state.winner() {
            info!("game won by {:?}", winner);
            let game_end = Response::GameEnd {
                board: self.game_state.board().clone(),
                winner,
            };
            // Both clients get the same terminal snapshot.
            send_messages(client, &game_end, opponent, &game_end);
            ProtocolState::Rematch([None, None])
        } else {
            let update = Response::GameState {
                board: self.game_state.board().clone(),
                active_player: self.game_state.active_player(),
            };
            send_messages(client, &update, opponent, &update);
            ProtocolState::InGame
        };
        Ok(state)
    }

    fn process_rematch_choice(
        &mut self,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
        choices: [Option<bool>; 2],
        player_num: PlayerNum,
        choice: bool,
    ) -> ProtocolState {
        let choices = match player_num {
            PlayerNum::P1 => [Some(choice), choices[1]],
            PlayerNum::P2 => [choices[0], Some(choice)],
        };
        match choices {
            [Some(true), Some(true)] => {
                self.game_state = GameState::default();
                let client_msg = Response::GameStart {
                    board: self.game_state.board().clone(),
                    player_num,
                    active_player: self.game_state.active_player(),
                };
                let opponent_msg = Response::GameStart {
                    board: self.game_state.board().clone(),
                    player_num: player_num.other(),
                    active_player: self.game_state.active_player(),
                };
                send_messages(client, client_msg, opponent, opponent_msg);
                ProtocolState::InGame
            }
            // Let ws module handle removing the game
            [_, Some(false)] | [Some(false), _] => ProtocolState::End,
            _ => ProtocolState::Rematch(choices),
        }
    }
}

fn send_message<M: Serialize>(client: &impl SendMsg, message: M) {
    // If the message fails to send even after retries, there's not much we can do but proceed
    let _ = util::retry(1, || client.send(&serde_json::to_string(&message).unwrap()));
}

fn send_messages<M1: Serialize, M2: Serialize>(
    client1: &impl SendMsg,
    message1: M1,
    client2: &impl SendMsg,
    message2: M2,
) {
    send_message(client1, message1);
    send_message(client2, message2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SendError;
    use common::{Board, Token, TokenKind, ROWS};

    struct MockSender;
    impl SendMsg for MockSender {
        fn send(&self, _msg: &str) -> Result<(), SendError> {
            Ok(())
        }
    }

    fn new_game() -> Game {
        Game::new(
            GameState::default(),
            ["id1".to_string(), "id2".to_string()],
        )
    }

    // A game that player 1 can win with a single "down".
    fn nearly_won_game() -> Game {
        let board = Board::new(vec![
            Token::new(5, ROWS - 2, TokenKind::Marker(PlayerNum::P1)),
            Token::new(9, 1, TokenKind::Marker(PlayerNum::P2)),
        ])
        .unwrap();
        Game::new(
            GameState::new(board, PlayerNum::P1),
            ["id1".to_string(), "id2".to_string()],
        )
    }

    #[test]
    fn test_malformed_message_is_ignored() {
        let mut game = new_game();
        game.handle_message(PlayerNum::P1, "foo", &MockSender, &MockSender);
        assert!(matches!(game.protocol_state, ProtocolState::InGame));
        assert_eq!(game.game_state.active_player(), PlayerNum::P1);
    }

    #[test]
    fn test_unrecognized_command_is_ignored() {
        let mut game = new_game();
        game.handle_message(
            PlayerNum::P1,
            "{\"command\":\"sideways\"}",
            &MockSender,
            &MockSender,
        );
        assert!(matches!(game.protocol_state, ProtocolState::InGame));
        assert_eq!(game.game_state.active_player(), PlayerNum::P1);
    }

    #[test]
    fn test_out_of_turn_input_is_ignored() {
        let mut game = new_game();
        game.handle_message(
            PlayerNum::P2,
            "{\"command\":\"down\"}",
            &MockSender,
            &MockSender,
        );
        assert_eq!(game.game_state.active_player(), PlayerNum::P1);
    }

    #[test]
    fn test_valid_move_advances_the_turn() {
        let mut game = new_game();
        game.handle_message(
            PlayerNum::P1,
            "{\"command\":\"down\"}",
            &MockSender,
            &MockSender,
        );
        assert_eq!(game.game_state.active_player(), PlayerNum::P2);
        assert!(matches!(game.protocol_state, ProtocolState::InGame));
    }

    #[test]
    fn test_winning_move_enters_rematch_phase() {
        let mut game = nearly_won_game();
        game.handle_message(
            PlayerNum::P1,
            "{\"command\":\"down\"}",
            &MockSender,
            &MockSender,
        );
        assert_eq!(game.game_state.winner(), Some(PlayerNum::P1));
        assert!(matches!(
            game.protocol_state,
            ProtocolState::Rematch([None, None])
        ));
    }

    #[test]
    fn test_rematch_agreement_restarts_the_game() {
        let mut game = nearly_won_game();
        game.handle_message(
            PlayerNum::P1,
            "{\"command\":\"down\"}",
            &MockSender,
            &MockSender,
        );
        game.handle_message(PlayerNum::P2, "true", &MockSender, &MockSender);
        assert!(matches!(
            game.protocol_state,
            ProtocolState::Rematch([None, Some(true)])
        ));
        game.handle_message(PlayerNum::P1, "true", &MockSender, &MockSender);
        assert!(matches!(game.protocol_state, ProtocolState::InGame));
        assert_eq!(game.game_state.winner(), None);
        assert_eq!(game.game_state.active_player(), PlayerNum::P1);
        assert_eq!(game.game_state.board().tokens().len(), 10);
    }

    #[test]
    fn test_rematch_decline_ends_the_game() {
        let mut game = nearly_won_game();
        game.handle_message(
            PlayerNum::P1,
            "{\"command\":\"down\"}",
            &MockSender,
            &MockSender,
        );
        game.handle_message(PlayerNum::P1, "false", &MockSender, &MockSender);
        assert!(game.is_over());
        // A finished game stays finished.
        game.handle_message(PlayerNum::P2, "true", &MockSender, &MockSender);
        assert!(game.is_over());
    }
}
