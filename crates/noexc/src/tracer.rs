//! Guard tracing hooks.
//!
//! The [`GuardTracer`] trait defines hook points at each step of a guarded scope:
//! entry, normal completion, suppression and propagation. Scopes are parameterized
//! over the tracer, so with [`NoopTracer`] every hook compiles away.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (default) |
//! | [`StderrTracer`] | Human-readable log of each scope to stderr |
//! | [`RecordingTracer`] | Full event recording for inspection in tests |
//!
//! Tracers never change the outcome of a scope; the diagnostic line written on
//! suppression goes to the [`PrintWriter`](crate::PrintWriter) regardless.

use crate::{exception::Exception, kind::ExcKind};

/// Event emitted by a guarded scope.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardEvent {
    /// A scope was entered with the given allow-list.
    Enter {
        /// Names of the ignored kinds, in allow-list order.
        ignored_kinds: Vec<String>,
    },
    /// The block finished without raising.
    Complete,
    /// An exception matched the allow-list and was swallowed.
    Suppress {
        /// `Type: message` summary of the exception.
        exception: String,
        /// The first allow-list entry that matched.
        matched_kind: String,
    },
    /// An exception matched nothing and was passed back to the caller.
    Propagate {
        /// `Type: message` summary of the exception.
        exception: String,
    },
}

/// Trait for guard tracing.
///
/// All methods have default no-op implementations, so implementations only
/// override the hooks they care about.
pub trait GuardTracer: std::fmt::Debug {
    /// Called when a scope is entered.
    #[inline(always)]
    fn on_enter(&mut self, _ignored_kinds: &[ExcKind]) {}

    /// Called when the block completed normally.
    #[inline(always)]
    fn on_complete(&mut self) {}

    /// Called after an exception was suppressed.
    ///
    /// # Arguments
    /// * `exc` - The suppressed exception
    /// * `matched_kind` - The first allow-list entry it matched
    #[inline(always)]
    fn on_suppress(&mut self, _exc: &Exception, _matched_kind: &ExcKind) {}

    /// Called before an unmatched exception is handed back to the caller.
    #[inline(always)]
    fn on_propagate(&mut self, _exc: &Exception) {}
}

impl<T: GuardTracer + ?Sized> GuardTracer for &mut T {
    fn on_enter(&mut self, ignored_kinds: &[ExcKind]) {
        (**self).on_enter(ignored_kinds);
    }

    fn on_complete(&mut self) {
        (**self).on_complete();
    }

    fn on_suppress(&mut self, exc: &Exception, matched_kind: &ExcKind) {
        (**self).on_suppress(exc, matched_kind);
    }

    fn on_propagate(&mut self, exc: &Exception) {
        (**self).on_propagate(exc);
    }
}

// ============================================================================
// NoopTracer — zero-cost default
// ============================================================================

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl GuardTracer for NoopTracer {}

// ============================================================================
// StderrTracer — human-readable log
// ============================================================================

/// Tracer that prints a human-readable log to stderr.
///
/// Output format:
/// ```text
///   >>> ENTER ignoring [ArithmeticError, KeyError]
///   --- SUPPRESS ZeroDivisionError: division by zero (matched ArithmeticError)
///   >>> ENTER ignoring [TypeError]
///   !!! PROPAGATE NameError: name 'x' is not defined
/// ```
#[derive(Debug, Default)]
pub struct StderrTracer;

impl StderrTracer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GuardTracer for StderrTracer {
    fn on_enter(&mut self, ignored_kinds: &[ExcKind]) {
        let names: Vec<&str> = ignored_kinds.iter().map(ExcKind::name).collect();
        eprintln!("  >>> ENTER ignoring [{}]", names.join(", "));
    }

    fn on_complete(&mut self) {
        eprintln!("  <<< COMPLETE");
    }

    fn on_suppress(&mut self, exc: &Exception, matched_kind: &ExcKind) {
        eprintln!("  --- SUPPRESS {} (matched {matched_kind})", exc.summary());
    }

    fn on_propagate(&mut self, exc: &Exception) {
        eprintln!("  !!! PROPAGATE {}", exc.summary());
    }
}

// ============================================================================
// RecordingTracer — full event log
// ============================================================================

/// Tracer that records every event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: Vec<GuardEvent>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[GuardEvent] {
        &self.events
    }

    /// Consumes the tracer and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<GuardEvent> {
        self.events
    }
}

impl GuardTracer for RecordingTracer {
    fn on_enter(&mut self, ignored_kinds: &[ExcKind]) {
        self.events.push(GuardEvent::Enter {
            ignored_kinds: ignored_kinds.iter().map(ToString::to_string).collect(),
        });
    }

    fn on_complete(&mut self) {
        self.events.push(GuardEvent::Complete);
    }

    fn on_suppress(&mut self, exc: &Exception, matched_kind: &ExcKind) {
        self.events.push(GuardEvent::Suppress {
            exception: exc.summary(),
            matched_kind: matched_kind.to_string(),
        });
    }

    fn on_propagate(&mut self, exc: &Exception) {
        self.events.push(GuardEvent::Propagate {
            exception: exc.summary(),
        });
    }
}
