use crate::{
    client::{Client, GameAction},
    error::GameError,
    game::GameOptions,
    session::SessionManager,
};
use futures_util::{SinkExt, StreamExt, TryStreamExt};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;

#[derive(Error, Debug)]
enum WsError {
    #[error("violation of the application-layer protocol")]
    ProtocolError,
    #[error(transparent)]
    GameError(#[from] GameError),
}

pub async fn accept_connection(stream: TcpStream, manager: &SessionManager) {
    log::info!("Accepted new connection");

    let Ok(stream) = tokio_tungstenite::accept_async(stream).await else {
        log::error!("Error occured during websocket handshake");
        return;
    };
    let (mut write, mut read) = stream.split();

    let mut client = Client::new(manager);

    loop {
        tokio::select! {
            msg = read.try_next() => {
                let Ok(Some(msg)) = msg else {
                    break;
                };
                let msg = match msg {
                    Message::Text(msg) => msg,
                    Message::Ping(_) | Message::Pong(_) => {
                        client.heartbeat();
                        continue;
                    }
                    _ => break,
                };
                let reply = match parse_request(&msg) {
                    Ok(req) => process_request(req, &mut client).await,
                    Err(err) => {
                        log::error!("Invalid message received: {}", &msg);
                        Err(err)
                    }
                };
                let reply = match reply {
                    Ok(Some(reply)) => format_reply(reply),
                    Ok(None) => continue,
                    Err(err) => json!({
                        "type": "error",
                        "error": err.to_string()
                    }),
                };
                if write.send(Message::Text(reply.to_string())).await.is_err() {
                    log::error!("Could not send websockets message");
                    break;
                }
            },
            state = client.next_state() => {
                let reply = json!({
                    "type": "update",
                    "state": state
                });
                if write.send(Message::Text(reply.to_string())).await.is_err() {
                    log::error!("Could not send websockets message");
                    break;
                }
            }
        }
    }

    client.leave();
    log::info!("Connection closed");
}

/// A message sent by a game client to the server.
#[derive(Debug, PartialEq)]
enum Request {
    CreateGame { options: GameOptions },
    JoinGame { game_id: String },
    AddPlayer { name: String },
    RemovePlayer { name: String },
    SetOptions { options: GameOptions },
    StartGame { topic: String },
    GameAction(GameAction),
    EndGame,
    Heartbeat,
}

/// A message sent by the server to a game client.
enum Response {
    GameCreated { game_id: String },
    GameJoined { game_id: String },
    PlayerAdded { name: String, player_id: usize },
}

/// Parses a websockets message from the client.
fn parse_request(msg: &str) -> Result<Request, WsError> {
    let req: Value = serde_json::from_str(msg).map_err(|_| WsError::ProtocolError)?;
    let string_field = |key: &str| {
        req[key]
            .as_str()
            .map(|s| s.to_string())
            .ok_or(WsError::ProtocolError)
    };
    let options = |key: &str| -> Result<GameOptions, WsError> {
        match req.get(key) {
            None => Ok(GameOptions::default()),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|_| WsError::ProtocolError)
            }
        }
    };

    match req["type"].as_str().unwrap_or("") {
        "create_game" => Ok(Request::CreateGame {
            options: options("options")?,
        }),
        "join_game" => Ok(Request::JoinGame {
            game_id: string_field("gameId")?.to_ascii_uppercase(),
        }),
        "add_player" => Ok(Request::AddPlayer {
            name: string_field("name")?,
        }),
        "remove_player" => Ok(Request::RemovePlayer {
            name: string_field("name")?,
        }),
        "set_options" => Ok(Request::SetOptions {
            options: options("options")?,
        }),
        "start_game" => Ok(Request::StartGame {
            topic: string_field("topic")?,
        }),
        "game_action" => {
            let action = serde_json::from_value(req["action"].clone())
                .map_err(|_| WsError::ProtocolError)?;
            Ok(Request::GameAction(action))
        }
        "end_game" => Ok(Request::EndGame),
        "heartbeat" => Ok(Request::Heartbeat),
        _ => Err(WsError::ProtocolError),
    }
}

/// Processes a request from the client.
async fn process_request(req: Request, client: &mut Client<'_>) -> Result<Option<Response>, WsError> {
    match req {
        Request::CreateGame { options } => {
            let game_id = client.create_game(options)?;
            return Ok(Some(Response::GameCreated { game_id }));
        }
        Request::JoinGame { game_id } => {
            client.join_game(&game_id)?;
            return Ok(Some(Response::GameJoined { game_id }));
        }
        Request::AddPlayer { name } => {
            let player_id = client.add_player(&name)?;
            return Ok(Some(Response::PlayerAdded { name, player_id }));
        }
        Request::RemovePlayer { name } => client.remove_player(&name)?,
        Request::SetOptions { options } => client.set_options(options)?,
        Request::StartGame { topic } => client.start_game(&topic).await?,
        Request::GameAction(action) => client.game_action(action)?,
        Request::EndGame => client.end_game()?,
        Request::Heartbeat => client.heartbeat(),
    }
    Ok(None)
}

/// Formats a reply to the client to be sent over websockets.
fn format_reply(res: Response) -> Value {
    match res {
        Response::GameCreated { game_id } => json!({
            "type": "game_created",
            "gameId": game_id
        }),
        Response::GameJoined { game_id } => json!({
            "type": "game_joined",
            "gameId": game_id
        }),
        Response::PlayerAdded { name, player_id } => json!({
            "type": "player_added",
            "name": name,
            "playerId": player_id
        }),
    }
}
