//! WebSocket upgrade + message loop. Each connection plays its own quiz
//! session; every client message gets exactly one JSON reply.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::{level_list, session_view};
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::session::Action;
use crate::state::{apply_to_slot, AppState, SessionSlot};

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "perimetr_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "perimetr_backend", "WebSocket connected");
  let mut slot = state.new_slot();
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "perimetr_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &mut slot, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "perimetr_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "perimetr_backend", "WebSocket disconnected");
}

async fn handle_client_ws(msg: ClientWsMessage, slot: &mut SessionSlot, state: &AppState) -> ServerWsMessage {
  let action = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,
    ClientWsMessage::Levels => return ServerWsMessage::Levels { levels: level_list() },
    ClientWsMessage::Records => return ServerWsMessage::Records { records: state.records().await },
    ClientWsMessage::Session => return ServerWsMessage::Session { session: session_view(&slot.session) },
    ClientWsMessage::StartLevel { level_index } => Action::StartLevel(level_index),
    ClientWsMessage::SubmitAnswer { answer } => Action::SubmitAnswer(answer),
    ClientWsMessage::Next => Action::Advance,
    ClientWsMessage::Menu => Action::ReturnToMenu,
  };

  match apply_to_slot(slot, action, &state.records).await {
    Ok(session) => {
      if let Some(v) = &session.verdict {
        info!(target: "quiz", correct = v.verdict.correct, progress = %session.progress, "WS session updated");
      }
      ServerWsMessage::Session { session }
    }
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}
