//! WebSocket handler for real-time alert streaming
//!
//! Each connection registers with the [`AlertBroadcaster`], receives a
//! `connection` acknowledgement and from then on every published alert.
//! Inbound frames are ignored apart from close.
//!
//! [`AlertBroadcaster`]: crate::broadcast::AlertBroadcaster

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use tracing::{debug, info, warn};

use crate::{api::state::ApiState, broadcast::ChannelEvent};

/// WebSocket upgrade handler
///
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<ApiState>) -> Response {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

fn encode(event: &ChannelEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            warn!("failed to encode channel event: {}", e);
            None
        }
    }
}

/// Handle WebSocket connection
async fn handle_websocket(socket: WebSocket, state: ApiState) {
    let broadcaster = state.broadcaster;
    let subscription = broadcaster.register().await;
    let id = subscription.id;
    let mut events = subscription.events;

    info!("WebSocket client connected ({})", id);

    let (mut sender, mut receiver) = socket.split();

    let Some(ack) = encode(&ChannelEvent::connected()) else {
        broadcaster.unregister(id).await;
        return;
    };
    if sender.send(ack).await.is_err() {
        debug!("{} went away before the acknowledgement", id);
        broadcaster.unregister(id).await;
        return;
    }
    broadcaster.mark_open(id).await;

    // Forward published alerts to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let Some(message) = encode(&event) else {
                continue;
            };
            if sender.send(message).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    broadcaster.unregister(id).await;
    info!("WebSocket client disconnected ({})", id);
}
