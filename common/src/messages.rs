use crate::blockrace::{Board, PlayerNum};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub url: String,
}

// Server-to-client notifications. Each carries a full board snapshot so the
// client re-renders from scratch instead of tracking deltas.
#[derive(Serialize, Deserialize, Debug)]
pub enum Response {
    GameStart {
        board: Board,
        player_num: PlayerNum,
        active_player: PlayerNum,
    },
    GameState {
        board: Board,
        active_player: PlayerNum,
    },
    GameEnd {
        board: Board,
        winner: PlayerNum,
    },
}
