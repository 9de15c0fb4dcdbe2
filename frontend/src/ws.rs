use crate::event_bus::{EventBus, Request};
use common::messages::{RegisterRequest, RegisterResponse};
use futures::{channel::mpsc::Sender, SinkExt, StreamExt};
use gloo::console::log;
use reqwasm::http;
use reqwasm::websocket::{futures::WebSocket, Message};
use wasm_bindgen_futures::spawn_local;
use yew_agent::Dispatched;

// Register with the backend, open the websocket it hands back, and return
// the outgoing channel. Messages arriving from the server are fanned out on
// the EventBus.
pub fn connect(user_id: String) -> Sender<String> {
    let (in_tx, mut in_rx) = futures::channel::mpsc::channel::<String>(1000);

    spawn_local(async move {
        let body = serde_json::to_string(&RegisterRequest { user_id }).unwrap();
        let response = http::Request::post("http://127.0.0.1:8000/register")
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        let register: RegisterResponse = response.json().await.unwrap();

        let ws = WebSocket::open(&register.url).unwrap();
        let (mut write, mut read) = ws.split();

        spawn_local(async move {
            while let Some(s) = in_rx.next().await {
                log!(format!("sending to websocket: {}", s));
                write.send(Message::Text(s)).await.unwrap();
            }
        });

        let mut event_bus = EventBus::dispatcher();
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(data)) => {
                    event_bus.send(Request::EventBusMsg(data));
                }
                Ok(Message::Bytes(b)) => {
                    if let Ok(val) = std::str::from_utf8(&b) {
                        event_bus.send(Request::EventBusMsg(val.to_string()));
                    }
                }
                Err(e) => {
                    log!(format!("ws: {:?}", e));
                }
            }
        }
        log!("WebSocket closed");
    });

    in_tx
}
