use crate::blockrace::board::{Board, Position, ROWS};
use crate::blockrace::input::Direction;
use crate::blockrace::token::{PlayerNum, Token, TokenKind};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    active_player: PlayerNum,
    winner: Option<PlayerNum>,
}

// Fixed opening layout. Both marker pairs start on the row below the top
// edge and race toward the bottom row.
fn opening_board() -> Board {
    let p1 = TokenKind::Marker(PlayerNum::P1);
    let p2 = TokenKind::Marker(PlayerNum::P2);
    Board::new(vec![
        Token::new(1, 1, p1),
        Token::new(2, 1, p1),
        Token::new(16, 1, p2),
        Token::new(17, 1, p2),
        Token::new(5, 5, TokenKind::Tnt),
        Token::new(12, 8, TokenKind::Tnt),
        Token::new(8, 3, TokenKind::Obstacle),
        Token::new(10, 7, TokenKind::Obstacle),
        Token::new(3, 6, TokenKind::Booster),
        Token::new(15, 4, TokenKind::Booster),
    ])
    .unwrap()
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(opening_board(), PlayerNum::P1)
    }
}

impl GameState {
    pub fn new(board: Board, active_player: PlayerNum) -> Self {
        GameState {
            board,
            active_player,
            winner: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_player(&self) -> PlayerNum {
        self.active_player
    }

    pub fn winner(&self) -> Option<PlayerNum> {
        self.winner
    }

    // Move every marker of the active player one cell (two across a booster)
    // and hand the turn to the opponent. Once a winner is set the state is
    // frozen and further calls change nothing.
    pub fn apply_move(&mut self, direction: Direction) {
        if self.winner.is_some() {
            return;
        }
        let mover = TokenKind::Marker(self.active_player);
        // Collisions resolve against the pre-move board so that both markers
        // of the pair move simultaneously and consistently.
        let before = self.board.clone();
        let mut consumed: Vec<Position> = Vec::new();
        for token in self.board.tokens_mut() {
            if token.kind != mover {
                continue;
            }
            let candidate = token.position.step_clamped(direction);
            let blocking = before
                .tokens()
                .iter()
                .find(|t| t.position == candidate && t.kind != mover)
                .map(|t| t.kind);
            match blocking {
                // The hazard detonates in place; the mover stays put.
                Some(TokenKind::Tnt) => consumed.push(candidate),
                Some(TokenKind::Obstacle) => {}
                // Advance an extra cell, clamping each step independently.
                // The booster itself persists and the landing cell is not
                // re-checked.
                Some(TokenKind::Booster) => {
                    token.position = candidate.step_clamped(direction);
                }
                // Opposing markers neither block nor capture; the cells
                // overlap until one of the markers moves away.
                Some(TokenKind::Marker(_)) | None => token.position = candidate,
            }
        }
        self.board.remove_tnt_at(&consumed);
        self.winner = self.check_winner();
        self.active_player = self.active_player.other();
    }

    // P1 is checked first: if both players reach the far row in the same
    // update, the win goes to P1.
    fn check_winner(&self) -> Option<PlayerNum> {
        [PlayerNum::P1, PlayerNum::P2]
            .into_iter()
            .find(|&player| self.marker_on_far_row(player))
    }

    fn marker_on_far_row(&self, player: PlayerNum) -> bool {
        self.board
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::Marker(player) && t.position.y == ROWS - 1)
    }
}
