use crate::session::SessionManager;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

pub fn make_router(manager: &'static SessionManager) -> Router {
    Router::new()
        .route("/sessions", get(get_sessions))
        .route("/pastgames", get(get_past_games))
        .with_state(manager)
}

async fn get_sessions(State(manager): State<&'static SessionManager>) -> Json<Value> {
    Json(json!({
        "num_sessions": manager.num_games()
    }))
}

async fn get_past_games(State(manager): State<&'static SessionManager>) -> Json<Value> {
    Json(json!({
        "games": manager.past_games()
    }))
}
