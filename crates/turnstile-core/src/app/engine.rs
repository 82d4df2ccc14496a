//! QueueEngine - the shared, concurrent entry point.
//!
//! Every mutating operation is one atomic unit:
//! 1. take the write lock
//! 2. apply the transition to a working copy of the state
//! 3. save the working copy through the [`StateStore`]
//! 4. swap it in, then emit its events, then release the lock
//!
//! A rejected request or a failed save drops the working copy, so no other
//! caller can ever observe a half-applied operation. Reads take the read
//! lock and see a committed snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::status::{DeskStatus, TicketStatus};
use crate::domain::{CustomerRecord, DeskId, Identity, QueueError};
use crate::ports::{Clock, EventSink, StateStore};
use crate::queue::{Applied, DeskSelector, EngineState, Registration};

pub struct QueueEngine {
    state: RwLock<EngineState>,
    selector: DeskSelector,
    store: Arc<dyn StateStore>,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl QueueEngine {
    /// Use [`EngineBuilder`](super::EngineBuilder) unless `state` is already
    /// known to be valid.
    pub fn new(
        state: EngineState,
        selector: DeskSelector,
        store: Arc<dyn StateStore>,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: RwLock::new(state),
            selector,
            store,
            sink,
            clock,
        }
    }

    /// Issue a ticket and place it on the least busy desk.
    ///
    /// Name and identity are validated before the registry is touched.
    pub async fn register_customer(
        &self,
        name: &str,
        identity: &str,
    ) -> Result<Registration, QueueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QueueError::MissingName);
        }
        let identity = Identity::parse(identity)?;

        let selector = self.selector;
        let registration = self
            .mutate("register", move |state, now| {
                state.register(&selector, identity, name, now)
            })
            .await?;

        info!(
            ticket = %registration.ticket,
            desk = %registration.desk,
            position = registration.position,
            "ticket issued"
        );
        Ok(registration)
    }

    /// Complete whoever is at `desk` and call the next waiting ticket.
    ///
    /// `Ok(None)` means the line was empty; the desk is idle afterwards.
    pub async fn call_next(&self, desk: DeskId) -> Result<Option<CustomerRecord>, QueueError> {
        let called = self
            .mutate("call_next", |state, now| state.call_next(desk, now))
            .await?;

        match &called {
            Some(record) => info!(%desk, ticket = %record.ticket, "customer called"),
            None => debug!(%desk, "nobody waiting"),
        }
        Ok(called)
    }

    /// Send the in-service ticket to the back of the same desk's line and
    /// call the next one. Returns whoever is called.
    pub async fn skip(&self, desk: DeskId) -> Result<CustomerRecord, QueueError> {
        let called = self
            .mutate("skip", |state, now| state.skip(desk, now))
            .await?;

        info!(%desk, ticket = %called.ticket, "ticket skipped, next customer called");
        Ok(called)
    }

    /// Forget every customer and restart numbering at 1.
    pub async fn reset(&self) -> Result<(), QueueError> {
        self.mutate("reset", |state, _| Ok(state.reset())).await?;
        info!("queue state reset");
        Ok(())
    }

    pub async fn status_of(&self, identity: &Identity) -> TicketStatus {
        let state = self.state.read().await;
        TicketStatus::of(&state, identity)
    }

    pub async fn lookup(&self, identity: &Identity) -> Result<CustomerRecord, QueueError> {
        let state = self.state.read().await;
        state.registry.lookup(identity).cloned()
    }

    pub async fn desk_status(&self, desk: DeskId) -> Result<DeskStatus, QueueError> {
        let state = self.state.read().await;
        DeskStatus::project(&state, desk)
    }

    /// Every desk, in ascending order, from the same snapshot.
    pub async fn all_desks(&self) -> Vec<DeskStatus> {
        let state = self.state.read().await;
        state
            .desk_ids()
            .into_iter()
            .filter_map(|desk| match DeskStatus::project(&state, desk) {
                Ok(status) => Some(status),
                Err(e) => {
                    warn!(%desk, error = %e, "desk cannot be projected");
                    None
                }
            })
            .collect()
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> EngineState {
        self.state.read().await.clone()
    }

    async fn mutate<T, F>(&self, op: &'static str, apply: F) -> Result<T, QueueError>
    where
        F: FnOnce(&mut EngineState, DateTime<Utc>) -> Result<Applied<T>, QueueError>,
    {
        let mut guard = self.state.write().await;
        let mut working = guard.clone();

        let applied = match apply(&mut working, self.clock.now()) {
            Ok(applied) => applied,
            Err(e) => {
                debug!(op, error = %e, "request rejected");
                return Err(e);
            }
        };

        if applied.changed() {
            if let Err(e) = self.store.save(&working).await {
                warn!(op, error = %e, "state save failed, mutation rolled back");
                return Err(e.into());
            }
            *guard = working;
        }

        // Still under the write lock, so sinks see events in commit order.
        for event in applied.events {
            if let Err(e) = self.sink.emit(event).await {
                warn!(op, error = %e, "event sink rejected event");
            }
        }
        Ok(applied.value)
    }
}
