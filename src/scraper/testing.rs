//! In-memory transport and log capture for tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use super::{ScraperError, Transport, TransportResponse};

type Scripted = Result<TransportResponse, ScraperError>;

/// Transport answering from per-URL scripts
///
/// Each URL replays its responses in order; the last one repeats forever.
/// Unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: AtomicUsize,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(self, url: impl Into<String>, responses: Vec<Scripted>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), responses.into_iter().collect());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(TransportResponse::new(404, ""))),
            None => Ok(TransportResponse::new(404, "")),
        }
    }
}

/// Shared counter of captured events
#[derive(Clone, Default)]
pub(crate) struct EventCount(Arc<AtomicUsize>);

impl EventCount {
    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

struct LevelCounter {
    level: Level,
    count: EventCount,
}

impl<S: Subscriber> Layer<S> for LevelCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == self.level {
            self.count.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Count events of one level emitted on the current thread while the guard lives
pub(crate) fn count_events(level: Level) -> (DefaultGuard, EventCount) {
    let count = EventCount::default();
    let subscriber = tracing_subscriber::registry().with(LevelCounter {
        level,
        count: count.clone(),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    (guard, count)
}
