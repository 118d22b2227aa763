//! Observability subsystem for docscope
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Scope-based begin/complete logging
//!
//! Observability is read-only: a failed log write never changes the
//! outcome of the operation being observed.
//!
//! ```ignore
//! use docscope::observability::{log_event_with_fields, Event, ObservationScope};
//!
//! log_event_with_fields(Event::ExplainAnalyzed, &[("stages", "3")]);
//!
//! let scope = ObservationScope::new("ADVISE");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
