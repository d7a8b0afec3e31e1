//! Bridge from `tracing` events to a [`Logger`].

use crate::encoder::Caller;
use crate::field::Field;
use crate::level::Severity;
use crate::logger::Logger;
use serde_json::Value;
use std::fmt;
use tracing::field::{Field as TracingField, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// A [`Layer`] that writes every `tracing` event through a [`Logger`].
///
/// The event's `message` becomes the entry message and its other fields are
/// appended after the logger's own. With callers enabled the event's source
/// location is recorded.
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for LoggerLayer {
    // Loggers with different levels may be installed on different threads,
    // so interest is decided per event rather than cached per callsite.
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        !metadata.is_event() || self.logger.enabled(Severity::from(metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = Severity::from(metadata.level());
        if !self.logger.enabled(severity) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let caller = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => None,
        };

        self.logger.emit(severity, visitor.message, visitor.fields, caller);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<Field>,
}

impl EventVisitor {
    fn push(&mut self, field: &TracingField, value: Value) {
        self.fields.push(Field::new(field.name(), value));
    }
}

impl Visit for EventVisitor {
    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::float(field.name(), value));
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push(field, Value::String(value.to_string()));
        }
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push(field, Value::String(format!("{value:?}")));
        }
    }
}
