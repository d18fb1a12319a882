//! Inbound channel plumbing: the message envelope and the consumer loop that
//! feeds a [`Sink`].

use std::fmt;

use tokio::sync::mpsc::Receiver;
use tracing::error;

use crate::sink::Sink;

/// Envelope for one inbound message. The payload is anything with a text
/// representation; it is rendered with `Display` at write time and not
/// retained after handling.
#[derive(Debug, Clone)]
pub struct Message<P> {
    payload: P,
}

impl<P: fmt::Display> Message<P> {
    pub fn new(payload: P) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

/// Consumes messages from the channel until it closes, writing each payload
/// through the sink.
///
/// A failed write is logged and the message dropped; the loop keeps running.
/// There is no retry and no backpressure beyond the channel's own capacity.
/// Because a single task owns the receiver, writes from one sink instance
/// reach the remote store serialized.
pub async fn run<P: fmt::Display>(sink: &Sink, mut messages: Receiver<Message<P>>) {
    while let Some(message) = messages.recv().await {
        if let Err(error) = sink.handle_message(&message).await {
            error!(%error, "failed to push message payload to blob");
        }
    }
}
