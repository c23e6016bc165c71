use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use soulbrowser_core_types::SoulError;
pub use tokio_util::sync::CancellationToken;

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Clone + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Event for T where T: Clone + Send + Sync + std::fmt::Debug + 'static {}

/// Callback invoked once per delivered event.
pub type EventCallback<E> = Box<dyn FnMut(E) + Send + 'static>;

#[async_trait]
pub trait EventBus<E>: Send + Sync
where
    E: Event,
{
    async fn publish(&self, event: E) -> Result<(), SoulError>;
    fn subscribe(&self) -> broadcast::Receiver<E>;
}

/// Scoped subscription contract.
///
/// `listen` registers `callback` and returns immediately. The callback runs
/// once per event published after registration, until `scope` is cancelled.
/// Cancellation stops delivery eventually, not synchronously: an event that
/// was already being dispatched may still reach the callback.
pub trait EventSource<E>: Send + Sync
where
    E: Event,
{
    fn listen(&self, scope: CancellationToken, callback: EventCallback<E>);
}

/// Simple in-memory bus suitable for unit tests and early integration.
pub struct InMemoryBus<E>
where
    E: Event,
{
    sender: broadcast::Sender<E>,
}

impl<E> InMemoryBus<E>
where
    E: Event,
{
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self { sender })
    }

    /// Number of live subscriptions, including scoped listeners.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl<E> EventBus<E> for InMemoryBus<E>
where
    E: Event,
{
    async fn publish(&self, event: E) -> Result<(), SoulError> {
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|err| SoulError::new(err.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}

impl<E> EventSource<E> for InMemoryBus<E>
where
    E: Event,
{
    fn listen(&self, scope: CancellationToken, callback: EventCallback<E>) {
        // Subscribe before spawning so events published after `listen`
        // returns are never missed.
        let rx = self.sender.subscribe();
        tokio::spawn(dispatch(rx, scope, callback));
    }
}

async fn dispatch<E>(
    mut rx: broadcast::Receiver<E>,
    scope: CancellationToken,
    mut callback: EventCallback<E>,
) where
    E: Event,
{
    loop {
        tokio::select! {
            biased;
            _ = scope.cancelled() => {
                debug!(target: "event-bus", "listener scope cancelled");
                break;
            }
            event = rx.recv() => match event {
                Ok(event) => callback(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(target: "event-bus", skipped, "listener lagged behind publisher");
                }
                Err(RecvError::Closed) => {
                    debug!(target: "event-bus", "event bus closed");
                    break;
                }
            }
        }
    }
}
