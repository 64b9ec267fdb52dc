use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::{
    dto::{
        now_rfc3339,
        sse::{Handshake, ServerEvent},
    },
    state::{SharedState, SseHub},
};

/// Subscribe to the public stream (scores, teams, presets, ambient display).
pub fn subscribe_public(state: &SharedState) -> broadcast::Receiver<ServerEvent> {
    state.public_sse().subscribe()
}

/// Subscribe to the feedback stream (haptics, flashes, target overlay).
pub fn subscribe_feedback(state: &SharedState) -> broadcast::Receiver<ServerEvent> {
    state.feedback_sse().subscribe()
}

/// Identifies the SSE stream for logging once the connection is torn down.
#[derive(Clone, Copy, Debug)]
pub enum StreamKind {
    /// State and ambient display events.
    Public,
    /// Panel feedback events.
    Feedback,
}

impl StreamKind {
    fn name(self) -> &'static str {
        match self {
            StreamKind::Public => "public",
            StreamKind::Feedback => "feedback",
        }
    }
}

/// Convert a broadcast receiver into an SSE response, forwarding events until
/// the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    kind: StreamKind,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(stream = kind.name(), skipped, "SSE subscriber lagging");
                            continue;
                        }
                    }
                }
            }
        }

        info!(stream = kind.name(), "SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Announce a new subscription on `hub`.
pub fn broadcast_handshake(hub: &SseHub, kind: StreamKind, remote_available: bool) {
    let payload = Handshake {
        stream: kind.name().to_string(),
        message: format!("{} stream connected", kind.name()),
        remote_available,
        connected_at: now_rfc3339(),
    };
    match ServerEvent::json(Some("handshake".to_string()), &payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(error = %err, "failed to serialize SSE handshake"),
    }
}
