//! Per-consumer request handle

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::coordinator::{CacheRead, RequestCoordinator};
use crate::domain::cache::{Payload, RequestKey};
use crate::domain::request::{FetchOptions, RequestState};
use crate::domain::DomainError;

/// The single in-flight request a consumer may have
#[derive(Debug)]
struct ActiveRequest {
    id: u64,
    token: CancellationToken,
}

#[derive(Debug)]
struct ConsumerInner {
    coordinator: Arc<RequestCoordinator>,
    key: RequestKey,
    options: FetchOptions,
    state: watch::Sender<RequestState>,
    /// `None` once the latest request has published its result or was cancelled
    active: watch::Sender<Option<ActiveRequest>>,
    next_id: AtomicU64,
}

/// A registered request
///
/// Dropping a ticket whose request never finished (for example an unpolled
/// fetch future) releases the consumer's active slot.
#[derive(Debug)]
struct Ticket {
    id: u64,
    token: CancellationToken,
    owner: Arc<ConsumerInner>,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.owner.release(self.id);
    }
}

impl ConsumerInner {
    /// Cancels whatever is in flight and registers a new request
    fn begin(self: &Arc<Self>) -> Ticket {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let token = CancellationToken::new();

        self.active.send_modify(|active| {
            if let Some(previous) = active.take() {
                debug!(key = %self.key, superseded = previous.id, "Cancelling superseded request");
                previous.token.cancel();
            }

            *active = Some(ActiveRequest {
                id,
                token: token.clone(),
            });
        });

        Ticket {
            id,
            token,
            owner: Arc::clone(self),
        }
    }

    /// Applies a state change only if `ticket` is still the live request
    fn publish(&self, ticket: &Ticket, finished: bool, apply: impl FnOnce(&mut RequestState)) {
        self.active.send_if_modified(|active| {
            let is_current = matches!(active.as_ref(), Some(current) if current.id == ticket.id)
                && !ticket.token.is_cancelled();

            if !is_current {
                return false;
            }

            self.state.send_modify(apply);

            if finished {
                *active = None;
            }

            finished
        });
    }

    /// Frees the active slot if it still belongs to request `id`
    fn release(&self, id: u64) {
        self.active.send_if_modified(|active| match active.take_if(|current| current.id == id) {
            Some(current) => {
                current.token.cancel();
                true
            }
            None => false,
        });
    }

    async fn run(&self, ticket: Ticket, read: CacheRead) -> Result<Payload, DomainError> {
        if read == CacheRead::Bypass {
            self.coordinator.invalidate(&self.key).await;
        }

        let result = self
            .coordinator
            .load(&self.key, &self.options, read, &ticket.token, || {
                self.publish(&ticket, false, |state| state.mark_loading());
            })
            .await;

        match &result {
            Ok(payload) => {
                self.publish(&ticket, true, |state| state.mark_success(Arc::clone(payload)));
            }
            Err(e) if e.is_aborted() => {}
            Err(e) => {
                let message = e.to_string();
                self.publish(&ticket, true, |state| state.mark_failed(message));
            }
        }

        result
    }

    fn cancel(&self) {
        self.active.send_if_modified(|active| match active.take() {
            Some(current) => {
                current.token.cancel();
                true
            }
            None => false,
        });
    }
}

/// A consumer observing one request key
///
/// Holds the consumer's [`RequestState`] and guarantees at most one request
/// in flight: starting a fetch cancels the previous one, whose result is then
/// discarded. Dropping the handle cancels any in-flight request and freezes
/// the state.
#[derive(Debug)]
pub struct ApiConsumer {
    inner: Arc<ConsumerInner>,
}

impl ApiConsumer {
    pub(crate) fn start(
        coordinator: Arc<RequestCoordinator>,
        key: RequestKey,
        options: FetchOptions,
    ) -> Self {
        let (state, _) = watch::channel(RequestState::new());
        let (active, _) = watch::channel(None);

        let consumer = Self {
            inner: Arc::new(ConsumerInner {
                coordinator,
                key,
                options,
                state,
                active,
                next_id: AtomicU64::new(1),
            }),
        };

        if options.immediate {
            tokio::spawn(consumer.fetch());
        }

        consumer
    }

    pub fn key(&self) -> &RequestKey {
        &self.inner.key
    }

    pub fn options(&self) -> &FetchOptions {
        &self.inner.options
    }

    /// Snapshot of the current state
    pub fn state(&self) -> RequestState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.inner.state.subscribe()
    }

    /// Fetches the key, from the cache when fresh
    ///
    /// The request is registered when this is called, before the returned
    /// future is first polled, so it supersedes earlier requests right away
    /// and can be handed to `tokio::spawn`. Resolves to
    /// `DomainError::Aborted` if superseded or cancelled before completing.
    pub fn fetch(&self) -> BoxFuture<'static, Result<Payload, DomainError>> {
        self.start_request(CacheRead::Allowed)
    }

    /// Invalidates the key and fetches it from the network
    ///
    /// Registered eagerly, like [`ApiConsumer::fetch`].
    pub fn refresh(&self) -> BoxFuture<'static, Result<Payload, DomainError>> {
        self.start_request(CacheRead::Bypass)
    }

    /// Fetches and decodes the payload into a typed model
    pub async fn fetch_as<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        let payload = self.fetch().await?;
        T::deserialize(payload.as_ref()).map_err(|e| DomainError::decode(e.to_string()))
    }

    /// Current payload decoded into a typed model
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, DomainError> {
        self.inner.state.borrow().data_as()
    }

    /// Cancels the in-flight request, if any
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Waits until no request is in flight and returns the state
    ///
    /// Returns once the latest started request has published its result or
    /// was cancelled. A cancelled request publishes nothing, so the state
    /// may still read Loading. With nothing started it returns at once.
    pub async fn settled(&self) -> RequestState {
        let mut active = self.inner.active.subscribe();

        // The sender lives in `inner`, which `self` keeps alive
        let _ = active.wait_for(Option::is_none).await;

        self.state()
    }

    fn start_request(&self, read: CacheRead) -> BoxFuture<'static, Result<Payload, DomainError>> {
        let ticket = self.inner.begin();
        let inner = Arc::clone(&self.inner);

        async move { inner.run(ticket, read).await }.boxed()
    }
}

impl Drop for ApiConsumer {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}
