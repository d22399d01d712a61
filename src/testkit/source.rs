//! Scripted [`BoostStatusSource`] for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::boost::BoostEvent;
use crate::port::outbound::{boost::BoostStatusSource, TransportError};

/// A status source that replays queued results.
///
/// When the queue is empty, the last successful event is repeated; before
/// any event was queued, fetches fail as unavailable.
#[derive(Clone, Default)]
pub struct ScriptedStatusSource {
    queue: Arc<Mutex<VecDeque<Result<BoostEvent, TransportError>>>>,
    last: Arc<Mutex<Option<BoostEvent>>>,
    fetches: Arc<AtomicU32>,
}

impl ScriptedStatusSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event to be returned by a future fetch.
    pub fn push(&self, event: BoostEvent) {
        self.queue.lock().push_back(Ok(event));
    }

    /// Queue a transport failure.
    pub fn push_failure(&self) {
        self.queue.lock().push_back(Err(TransportError::Unavailable {
            service: "scripted",
            reason: "scripted failure".to_string(),
        }));
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BoostStatusSource for ScriptedStatusSource {
    async fn fetch_status(&self) -> Result<BoostEvent, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.queue.lock().pop_front();
        match next {
            Some(Ok(event)) => {
                *self.last.lock() = Some(event.clone());
                Ok(event)
            }
            Some(Err(e)) => Err(e),
            None => self.last.lock().clone().ok_or(TransportError::Unavailable {
                service: "scripted",
                reason: "no event scripted".to_string(),
            }),
        }
    }
}
