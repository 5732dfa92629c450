// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Best-effort delivery of booking notifications.

use async_trait::async_trait;
use roombook::NotificationEvent;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Failures reported by a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("notification channel is closed")]
    ChannelClosed,
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Receives events after the state change that triggered them has committed.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Delivers one event.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails. Callers log it and move on.
    async fn dispatch(&self, event: NotificationEvent) -> Result<(), NotificationError>;
}

/// A dispatcher that only writes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDispatcher;

#[async_trait]
impl NotificationDispatcher for LoggingDispatcher {
    async fn dispatch(&self, event: NotificationEvent) -> Result<(), NotificationError> {
        info!(
            kind = %event.kind,
            booking_id = %event.booking_id,
            "Booking notification"
        );
        Ok(())
    }
}

/// Spawns delivery of `event` on the runtime.
///
/// Failure is logged at `warn` and otherwise ignored. The returned handle
/// never yields an error and may be dropped.
pub fn spawn_dispatch(
    dispatcher: &Arc<dyn NotificationDispatcher>,
    event: NotificationEvent,
) -> JoinHandle<()> {
    let dispatcher: Arc<dyn NotificationDispatcher> = Arc::clone(dispatcher);
    tokio::spawn(async move {
        match dispatcher.dispatch(event).await {
            Ok(()) => debug!(kind = %event.kind, booking_id = %event.booking_id, "Notification delivered"),
            Err(err) => warn!(
                kind = %event.kind,
                booking_id = %event.booking_id,
                error = %err,
                "Notification dispatch failed"
            ),
        }
    })
}
