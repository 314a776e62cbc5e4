//! NATS bridge to the chat gateway.
//!
//! The gateway process owns the platform socket. It publishes every
//! relevant platform event as [`InboundEvent`] JSON on `<prefix>.inbound`
//! and delivers every [`OutboundMessage`] the bot publishes on
//! `<prefix>.outbound`.

use gamewatch_core::ChatClient;
use gamewatch_types::{ChannelRef, CommandEvent, InboundEvent, OutboundMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::BotError;

/// NATS connection to the chat gateway.
pub struct NatsGateway {
    client: async_nats::Client,
}

impl NatsGateway {
    /// Connect to a NATS server.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Nats`] if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, BotError> {
        info!(url = url, "connecting to NATS server");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| BotError::Nats(format!("failed to connect to {url}: {e}")))?;
        info!("NATS connection established");
        Ok(Self { client })
    }

    /// Subscribe to inbound gateway events.
    ///
    /// A plain (non-queue) subscription delivers messages in publish order.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Nats`] if the subscription fails.
    pub async fn subscribe_inbound(&self, subject: &str) -> Result<async_nats::Subscriber, BotError> {
        let subscriber = self
            .client
            .subscribe(subject.to_owned())
            .await
            .map_err(|e| BotError::Nats(format!("failed to subscribe to {subject}: {e}")))?;
        info!(subject = subject, "subscribed to inbound events");
        Ok(subscriber)
    }

    /// A [`ChatClient`] publishing on `subject`, plus the publisher task
    /// draining its queue.
    ///
    /// The task ends once every clone of the returned client is dropped and
    /// the queue is empty; await it before [`flush`](Self::flush) on shutdown.
    pub fn chat_client(&self, subject: &str) -> (NatsChatClient, JoinHandle<()>) {
        let (client, outbound) = NatsChatClient::channel();
        let publisher = tokio::spawn(publish_outbound(
            self.client.clone(),
            subject.to_owned(),
            outbound,
        ));
        (client, publisher)
    }

    /// Flush all pending outbound messages to the NATS server.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Nats`] if the flush fails.
    pub async fn flush(&self) -> Result<(), BotError> {
        self.client
            .flush()
            .await
            .map_err(|e| BotError::Nats(format!("flush failed: {e}")))
    }

    /// Decode an inbound message payload.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Parse`] if the payload is not an [`InboundEvent`].
    pub fn deserialize_event(data: &[u8]) -> Result<InboundEvent, BotError> {
        serde_json::from_slice(data)
            .map_err(|e| BotError::Parse(format!("failed to deserialize inbound event: {e}")))
    }
}

impl std::fmt::Debug for NatsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NatsGateway")
            .field("connected", &true)
            .finish()
    }
}

/// [`ChatClient`] that queues [`OutboundMessage`]s for the gateway.
///
/// Queueing never blocks the dispatcher. A single publisher task sends the
/// queue in order, so replies and notifications reach the gateway in the
/// order the bot produced them.
#[derive(Debug, Clone)]
pub struct NatsChatClient {
    outbound: mpsc::UnboundedSender<OutboundMessage>,
}

impl NatsChatClient {
    /// Create a client and the receiving end of its queue.
    fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (outbound, queue) = mpsc::unbounded_channel();
        (Self { outbound }, queue)
    }

    fn enqueue(&self, message: OutboundMessage) {
        if self.outbound.send(message).is_err() {
            warn!("outbound publisher stopped, message dropped");
        }
    }
}

/// Publish queued messages on `subject`, one at a time, until the queue closes.
async fn publish_outbound(
    client: async_nats::Client,
    subject: String,
    mut queue: mpsc::UnboundedReceiver<OutboundMessage>,
) {
    while let Some(message) = queue.recv().await {
        let payload = match serde_json::to_vec(&message) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize outbound message");
                continue;
            }
        };
        debug!(
            subject = subject,
            channel = ?message.channel,
            "publishing outbound message"
        );
        if let Err(e) = client.publish(subject.clone(), payload.into()).await {
            warn!(subject = subject, error = %e, "failed to publish outbound message");
        }
    }
    debug!("outbound queue closed, publisher finished");
}

impl ChatClient for NatsChatClient {
    fn reply(&mut self, origin: &CommandEvent, text: &str) {
        let content = reply_content(origin, text);
        self.enqueue(OutboundMessage::new(
            ChannelRef::Channel(origin.channel_id.clone()),
            content,
        ));
    }

    fn send(&mut self, channel: &ChannelRef, text: &str) {
        self.enqueue(OutboundMessage::new(channel.clone(), text));
    }
}

/// Replies address the author the way the platform's reply primitive does.
fn reply_content(origin: &CommandEvent, text: &str) -> String {
    format!("{}, {text}", origin.user_id.mention())
}
