// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live booking notifications for connected clients.
//!
//! Every committed booking creation and status change is pushed to all
//! WebSocket clients on `/live`. Events only say that something happened;
//! clients fetch the booking over HTTP to see its current state.
//!
//! # Architecture
//!
//! - `LiveFeed` wraps a `tokio::sync::broadcast` channel
//! - `LiveFeedDispatcher` is the server's `NotificationDispatcher`
//! - Nothing received from a client is acted on

use async_trait::async_trait;
use axum::{
    extract::{
        FromRef, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use roombook::{NotificationEvent, NotificationKind};
use roombook_api::{NotificationDispatcher, NotificationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::AppState;

/// Events buffered per client before the oldest are dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// A frame on the live feed.
///
/// Notification frames carry the same JSON shape as `NotificationEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiveEvent {
    /// A booking was requested.
    NewBooking {
        #[serde(rename = "bookingId")]
        booking_id: i64,
    },
    /// A booking was approved, rejected, or cancelled.
    BookingStatusUpdate {
        #[serde(rename = "bookingId")]
        booking_id: i64,
    },
    /// Sent once when a client connects.
    Connected {
        /// Server time, RFC 3339.
        timestamp: String,
    },
}

impl From<NotificationEvent> for LiveEvent {
    fn from(event: NotificationEvent) -> Self {
        let booking_id: i64 = event.booking_id.value();
        match event.kind {
            NotificationKind::NewBooking => Self::NewBooking { booking_id },
            NotificationKind::BookingStatusUpdate => Self::BookingStatusUpdate { booking_id },
        }
    }
}

/// Fan-out of live events to every connected client.
#[derive(Debug, Clone)]
pub struct LiveFeed {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveFeed {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Sends `event` to every subscriber. Returns how many received it.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: &LiveEvent) -> usize {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Published live event");
                count
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
                0
            }
        }
    }

    /// Events published before the call are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl FromRef<AppState> for Arc<LiveFeed> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live)
    }
}

/// Publishes booking notifications to the live feed.
#[derive(Debug, Clone)]
pub struct LiveFeedDispatcher {
    feed: Arc<LiveFeed>,
}

impl LiveFeedDispatcher {
    #[must_use]
    pub const fn new(feed: Arc<LiveFeed>) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl NotificationDispatcher for LiveFeedDispatcher {
    async fn dispatch(&self, event: NotificationEvent) -> Result<(), NotificationError> {
        let receivers: usize = self.feed.publish(&LiveEvent::from(event));
        info!(
            kind = %event.kind,
            booking_id = %event.booking_id,
            receivers,
            "Booking notification"
        );
        Ok(())
    }
}

/// Handler for GET `/live`.
///
/// Upgrades the connection and streams live events until the client
/// disconnects.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(feed): AxumState<Arc<LiveFeed>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, feed))
}

async fn handle_socket(socket: WebSocket, feed: Arc<LiveFeed>) {
    info!("Client connected to live feed");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = feed.subscribe();

    let connected: LiveEvent = LiveEvent::Connected {
        timestamp: roombook_domain::format_timestamp(time::OffsetDateTime::now_utc()),
    };
    if let Ok(json) = serde_json::to_string(&connected)
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
                    Err(e) => error!(?e, "Failed to serialize live event"),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live feed client fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Ignoring message from live feed client");
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
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Client disconnected from live feed");
}
