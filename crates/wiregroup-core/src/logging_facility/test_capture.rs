//! Test capture mode for deterministic logging assertions
//!
//! Installs a global subscriber layer that records every event in memory
//! so tests can assert which pipeline stages ran and with which fields.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::core_types::schema::{FIELD_EVENT, FIELD_OP};

/// One recorded event; `op` and `event` are lifted out of `fields`
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Collects event fields as strings; strings stay unquoted, everything
/// else goes through its `Debug` form
#[derive(Default)]
struct FieldVisitor(HashMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type EventBuffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer that appends every event to the buffer of a [`TestCapture`]
pub struct TestCaptureLayer {
    buffer: EventBuffer,
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let fields = visitor.0;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        };

        if let Ok(mut events) = self.buffer.lock() {
            events.push(captured);
        }
    }
}

/// Shared view of captured events
#[derive(Clone, Default)]
pub struct TestCapture {
    buffer: EventBuffer,
}

impl TestCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer feeding this capture
    pub fn layer(&self) -> TestCaptureLayer {
        TestCaptureLayer {
            buffer: Arc::clone(&self.buffer),
        }
    }

    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events emitted by the given operation
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .collect()
    }

    /// # Panics
    ///
    /// Panics unless `op` emitted an event of kind `event`
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let matching = self.events_for_op(op);
        assert!(
            matching.iter().any(|e| e.event.as_deref() == Some(event)),
            "Expected event op={} event={}, saw {:?}",
            op,
            event,
            matching.iter().map(|e| e.event.clone()).collect::<Vec<_>>()
        );
    }

    pub fn count_events(&self, predicate: impl Fn(&CapturedEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the process-wide capture on first use and return it
///
/// The capture is shared. Tests in one binary share the
/// buffer, so assertions should key on fields unique to the test.
///
/// ```
/// use wiregroup_core::logging_facility::test_capture::init_test_capture;
/// use wiregroup_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::new();
            tracing_subscriber::registry()
                .with(capture.layer())
                .try_init()
                .ok();
            capture
        })
        .clone()
}
