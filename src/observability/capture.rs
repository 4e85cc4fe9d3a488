//! In-memory tracing layer for asserting on emitted diagnostics in tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Level and message of every event seen while installed.
#[derive(Clone, Default)]
pub(crate) struct CapturedEvents {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CapturedEvents {
    /// Install as the thread's default subscriber until the guard drops.
    ///
    /// Only covers tasks polled on this thread, which is what a
    /// current-thread `#[tokio::test]` runtime does.
    pub(crate) fn install() -> (Self, DefaultGuard) {
        let captured = Self::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    /// How many events at `level` carried exactly `message`.
    pub(crate) fn count(&self, level: Level, message: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, m)| *l == level && m == message)
            .count()
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = MessageVisitor(String::new());
        event.record(&mut message);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), message.0));
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
