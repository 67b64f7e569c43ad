// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live import progress streaming.
//!
//! Progress events of every running import are broadcast to all connected
//! WebSocket clients. Events are informational only: clients must still
//! fetch the session over HTTP for the authoritative state, and no action is
//! ever taken on a message received over the socket.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use seido_import::{ImportObserver, ImportProgress, RowOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// If clients cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 256;

/// Live import events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
    /// A session started executing its import.
    ImportStarted {
        session_id: String,
        file_name: String,
    },
    /// A phase started, or the run reached 100%.
    Progress {
        session_id: String,
        progress: ImportProgress,
    },
    /// One row was upserted or failed.
    RowProcessed {
        session_id: String,
        outcome: RowOutcome,
    },
    /// A run finished.
    ImportFinished {
        session_id: String,
        success: bool,
        rolled_back: bool,
        run_id: Option<i64>,
    },
}

/// Broadcaster for live import events.
///
/// A thin wrapper around `tokio::sync::broadcast` shared by all WebSocket
/// clients.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// Non-blocking. Events sent while no client is connected are dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }

    /// An import observer that forwards the events of one session.
    #[must_use]
    pub fn observer<'a>(&'a self, session_id: &'a str) -> LiveObserver<'a> {
        LiveObserver {
            broadcaster: self,
            session_id,
        }
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards the progress of one run to the broadcaster.
pub struct LiveObserver<'a> {
    broadcaster: &'a LiveEventBroadcaster,
    session_id: &'a str,
}

impl ImportObserver for LiveObserver<'_> {
    fn on_phase(&mut self, progress: &ImportProgress) {
        self.broadcaster.broadcast(&LiveEvent::Progress {
            session_id: self.session_id.to_string(),
            progress: progress.clone(),
        });
    }

    fn on_row(&mut self, outcome: &RowOutcome) {
        self.broadcaster.broadcast(&LiveEvent::RowProcessed {
            session_id: self.session_id.to_string(),
            outcome: outcome.clone(),
        });
    }
}

/// Handles WebSocket upgrade requests for the live event stream.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

/// Sends a connection confirmation, then streams events until the client
/// disconnects.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Client connected to live import stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let connected_event: LiveEvent = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(?e, "Failed to serialize live event");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live client lagging, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live import stream");
}
