//! In-memory event capture for logging assertions
//!
//! [`init_test_capture`] installs a process-wide layer that records every
//! event with its fields rendered as strings. Tests then query the buffer by
//! operation name, usually through [`TestCapture::boundary`], to check that a
//! pipeline stage emitted one `start` followed by one `end` or `end_error`.

use super::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;
use trustlens_core_types::schema::{
    FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_EVENT, FIELD_OP, FIELD_REQUEST_ID,
};

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, fields: HashMap<String, String>) -> Self {
        Self {
            level,
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        }
    }

    /// Field value by name, if recorded
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.field(FIELD_DURATION_MS)?.parse().ok()
    }

    pub fn err_code(&self) -> Option<&str> {
        self.field(FIELD_ERR_CODE)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.field(FIELD_REQUEST_ID)
    }

    /// True if this is the `event` of boundary `op`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

/// Start/end/error tally of one boundary operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryTrace {
    pub starts: usize,
    pub ends: usize,
    pub errors: usize,
}

impl BoundaryTrace {
    /// Every start was closed by exactly one end or error
    pub fn is_balanced(&self) -> bool {
        self.starts == self.ends + self.errors
    }
}

/// Renders strings bare and everything else through `Debug`
#[derive(Default)]
struct FieldRecorder(HashMap<String, String>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer appending every event to a shared buffer
pub struct TestCaptureLayer {
    buffer: Buffer,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let buffer = Buffer::default();
        (
            Self {
                buffer: Arc::clone(&buffer),
            },
            TestCapture { buffer },
        )
    }
}

impl<S: Subscriber> Layer<S> for TestCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        let captured = CapturedEvent::from_fields(*event.metadata().level(), recorder.0);
        if let Ok(mut events) = self.buffer.lock() {
            events.push(captured);
        }
    }
}

/// Read handle on the captured events
#[derive(Clone)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events of one operation, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .collect()
    }

    /// Start/end/error counts for `op`
    pub fn boundary(&self, op: &str) -> BoundaryTrace {
        self.events_for_op(op)
            .iter()
            .fold(BoundaryTrace::default(), |mut trace, e| {
                match e.event.as_deref() {
                    Some(EVENT_START) => trace.starts += 1,
                    Some(EVENT_END) => trace.ends += 1,
                    Some(EVENT_END_ERROR) => trace.errors += 1,
                    _ => {}
                }
                trace
            })
    }

    /// # Panics
    ///
    /// Panics if no `event` was captured for `op`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no {} event for op '{}' among {} captured events",
            event,
            op,
            events.len()
        );
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.buffer.lock() {
            events.clear();
        }
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer (once per process) and return its handle.
///
/// The buffer is shared by every test in the binary, so tests should query
/// by an operation name no other test uses.
///
/// ```
/// use trustlens_core::logging_facility::test_capture::init_test_capture;
/// use trustlens_core::{log_op_end, log_op_start};
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// log_op_end!("doc_capture_op", duration_ms = 0);
/// assert!(capture.boundary("doc_capture_op").is_balanced());
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}
