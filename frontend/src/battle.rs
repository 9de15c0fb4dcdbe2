use crate::event_bus::EventBus;
use crate::ws;
use crate::User;
use common::messages::Response;
use common::{Board, Direction, PlayerNum, Position, RawInput, TokenKind, COLS, ROWS};
use futures::channel::mpsc::Sender;
use gloo::console::log;
use gloo::events::EventListener;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, KeyboardEvent, SubmitEvent};
use yew::prelude::*;
use yew_agent::{Bridge, Bridged};

pub enum Message {
    ServerMsg(String),
    Key(Direction),
    CommandInput(String),
    SubmitCommand,
    RematchChoice(bool),
}

#[derive(Properties, PartialEq)]
pub struct BoardProps {
    pub board: Board,
}

enum Phase {
    WaitingForOpponent,
    Playing(PlayState),
    GameOver(EndState),
    Left,
}

struct PlayState {
    board: Board,
    player_num: PlayerNum,
    active_player: PlayerNum,
}

struct EndState {
    board: Board,
    winner: PlayerNum,
    answered: bool,
}

pub struct Battle {
    ws_sender: Sender<String>,
    phase: Phase,
    command: String,
    _producer: Box<dyn Bridge<EventBus>>,
    _keydown: EventListener,
}

impl Component for Battle {
    type Message = Message;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (user, _) = ctx
            .link()
            .context::<User>(Callback::noop())
            .expect("context to be set");
        // forward messages returned from the event bus to the update method
        let cb = {
            let link = ctx.link().clone();
            move |msg| link.send_message(Self::Message::ServerMsg(msg))
        };
        let producer = EventBus::bridge(Rc::new(cb));
        let mut ws_sender = ws::connect(user.user_id.borrow().clone());
        ws_sender.try_send("join".to_string()).unwrap();

        // Arrow keys are read at the window level so the board never needs
        // focus.
        let keydown = {
            let link = ctx.link().clone();
            EventListener::new(&web_sys::window().unwrap(), "keydown", move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    let direction = match event.key().as_str() {
                        "ArrowUp" => Some(Direction::Up),
                        "ArrowDown" => Some(Direction::Down),
                        "ArrowLeft" => Some(Direction::Left),
                        "ArrowRight" => Some(Direction::Right),
                        _ => None,
                    };
                    if let Some(direction) = direction {
                        link.send_message(Message::Key(direction));
                    }
                }
            })
        };

        Self {
            ws_sender,
            phase: Phase::WaitingForOpponent,
            command: String::new(),
            _producer: producer,
            _keydown: keydown,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Message::ServerMsg(response) => {
                self.apply_server_msg(&response);
                true
            }
            Message::Key(direction) => {
                if self.my_turn() {
                    self.send_move(direction.as_command().to_string());
                }
                false
            }
            Message::CommandInput(value) => {
                self.command = value;
                true
            }
            Message::SubmitCommand => {
                if self.my_turn() && !self.command.is_empty() {
                    let command = std::mem::take(&mut self.command);
                    self.send_move(command);
                }
                true
            }
            Message::RematchChoice(choice) => {
                if let Phase::GameOver(ref mut state) = self.phase {
                    if !state.answered {
                        state.answered = true;
                        self.ws_sender
                            .try_send(serde_json::to_string(&choice).unwrap())
                            .unwrap();
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &self.phase {
            Phase::WaitingForOpponent => html! {
                <section class={classes!("page")}>
                    <p class={classes!("status-line")}>{ "Waiting for an opponent..." }</p>
                </section>
            },
            Phase::Playing(state) => self.view_playing(ctx, state),
            Phase::GameOver(state) => view_game_over(ctx, state),
            Phase::Left => html! {
                <section class={classes!("page")}>
                    <p class={classes!("status-line")}>{ "The game is over. Head back to find a new one." }</p>
                </section>
            },
        }
    }
}

impl Battle {
    fn my_turn(&self) -> bool {
        match &self.phase {
            Phase::Playing(state) => state.player_num == state.active_player,
            _ => false,
        }
    }

    fn send_move(&mut self, command: String) {
        let input = RawInput { command };
        self.ws_sender
            .try_send(serde_json::to_string(&input).unwrap())
            .unwrap();
    }

    fn apply_server_msg(&mut self, msg: &str) {
        // The server closes a finished game with a bare text marker.
        if msg == "leave" {
            self.phase = Phase::Left;
            return;
        }
        let response: Response = match serde_json::from_str(msg) {
            Ok(response) => response,
            Err(err) => {
                log!(format!("unexpected server message: {} ({})", msg, err));
                return;
            }
        };
        match (response, &mut self.phase) {
            (
                Response::GameStart {
                    board,
                    player_num,
                    active_player,
                },
                _,
            ) => {
                self.phase = Phase::Playing(PlayState {
                    board,
                    player_num,
                    active_player,
                });
            }
            (
                Response::GameState {
                    board,
                    active_player,
                },
                Phase::Playing(state),
            ) => {
                state.board = board;
                state.active_player = active_player;
            }
            (Response::GameEnd { board, winner }, _) => {
                self.phase = Phase::GameOver(EndState {
                    board,
                    winner,
                    answered: false,
                });
            }
            (response, _) => {
                log!(format!("ignoring out-of-phase message: {:?}", response));
            }
        }
    }

    fn view_playing(&self, ctx: &Context<Self>, state: &PlayState) -> Html {
        let oninput = ctx.link().callback(|e: InputEvent| {
            Message::CommandInput(e.target_unchecked_into::<HtmlInputElement>().value())
        });
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Message::SubmitCommand
        });
        let prompt = format!(
            "{}@blockrace:~$ (type 'up', 'down', 'left', or 'right')",
            prompt_name(state.active_player)
        );
        html! {
            <section class={classes!("page")}>
                <BoardComponent board={state.board.clone()} />
                <form class={classes!("command-form")} {onsubmit}>
                    <input value={self.command.clone()} {oninput} placeholder={prompt} />
                </form>
                <div class={classes!("status-line")}>
                    { format!(
                        "You are {}. Current player: {}",
                        player_label(state.player_num),
                        color_label(state.active_player)
                    ) }
                </div>
            </section>
        }
    }
}

fn view_game_over(ctx: &Context<Battle>, state: &EndState) -> Html {
    let on_rematch = ctx.link().callback(|_| Message::RematchChoice(true));
    let on_leave = ctx.link().callback(|_| Message::RematchChoice(false));
    html! {
        <section class={classes!("page")}>
            <BoardComponent board={state.board.clone()} />
            <div class={classes!("winner-banner")}>
                { format!("{} wins!", player_label(state.winner)) }
            </div>
            {
                if state.answered {
                    html! {
                        <p class={classes!("status-line")}>{ "Waiting for the opponent's answer..." }</p>
                    }
                } else {
                    html! {
                        <div class={classes!("rematch-buttons")}>
                            <button onclick={on_rematch}>{ "Rematch" }</button>
                            <button onclick={on_leave}>{ "Leave" }</button>
                        </div>
                    }
                }
            }
        </section>
    }
}

#[function_component(BoardComponent)]
pub fn board(props: &BoardProps) -> Html {
    let board = &props.board;
    html! {
        <div class={classes!("board")}>
            <div
                class={classes!("board-grid")}
                style={format!(
                    "display: grid; grid-template-rows: repeat({}, 1fr); grid-template-columns: repeat({}, 1fr)",
                    ROWS, COLS
                )}>
                {
                    (0..ROWS).flat_map(|y| (0..COLS).map(move |x| {
                        board_cell((x, y), board.occupant(Position { x, y }).map(|t| t.kind))
                    })).collect::<Html>()
                }
            </div>
        </div>
    }
}

// The cell's visual class is derived solely from the occupying token kind;
// the bottom row carries the win-line highlight on top.
fn board_cell(position: (usize, usize), kind: Option<TokenKind>) -> Html {
    let mut class = match kind {
        Some(TokenKind::Marker(PlayerNum::P1)) => classes!("p1"),
        Some(TokenKind::Marker(PlayerNum::P2)) => classes!("p2"),
        Some(TokenKind::Tnt) => classes!("tnt"),
        Some(TokenKind::Obstacle) => classes!("obstacle"),
        Some(TokenKind::Booster) => classes!("booster"),
        None => classes!("empty"),
    };
    class.extend(classes!("board-cell", "bordered"));
    if position.1 == ROWS - 1 {
        class.extend(classes!("win-line"));
    }
    html! {
        <div class={class}></div>
    }
}

fn player_label(player_num: PlayerNum) -> &'static str {
    match player_num {
        PlayerNum::P1 => "Player 1",
        PlayerNum::P2 => "Player 2",
    }
}

fn color_label(player_num: PlayerNum) -> &'static str {
    match player_num {
        PlayerNum::P1 => "Player 1 (Blue)",
        PlayerNum::P2 => "Player 2 (Green)",
    }
}

fn prompt_name(player_num: PlayerNum) -> &'static str {
    match player_num {
        PlayerNum::P1 => "player1",
        PlayerNum::P2 => "player2",
    }
}
