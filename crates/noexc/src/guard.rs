use serde::{Deserialize, Serialize};

use crate::{
    error::InvalidKindError,
    exc_type::ExcType,
    exception::Exception,
    io::PrintWriter,
    kind::ExcKind,
    tracer::{GuardTracer, NoopTracer},
};

/// Prefix of the diagnostic line written for each suppressed exception.
pub const IGNORING_PREFIX: &str = "Ignoring exception ";

/// Scoped context that swallows a fixed set of exception kinds.
///
/// A guarded block is any code returning `Result<T, Exception>`. When the block
/// fails with an exception that is an instance of one of the ignored kinds (subclasses
/// included), the guard writes `Ignoring exception <str(exc)>` to its
/// [`PrintWriter`] and reports the scope as finished. Every other exception is
/// handed back untouched.
///
/// ```
/// use noexc::{CollectStringPrint, Exception, ExcType, ExceptionGuard};
///
/// let guard = ExceptionGuard::new([ExcType::ArithmeticError]);
/// let mut print = CollectStringPrint::new();
/// let outcome: Result<Option<i64>, Exception> = guard.run(&mut print, || Err(Exception::zero_division()));
/// assert_eq!(outcome, Ok(None));
/// assert_eq!(print.output(), "Ignoring exception division by zero\n");
/// ```
///
/// The allow-list is fixed at construction. Empty lists, duplicates and
/// overlapping kinds are all accepted; an empty list makes the guard a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionGuard {
    ignored_kinds: Vec<ExcKind>,
}

impl ExceptionGuard {
    /// Creates a guard ignoring the given kinds, in order.
    pub fn new<I, K>(kinds: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ExcKind>,
    {
        Self {
            ignored_kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a guard from kind names such as `"KeyError"` or `"AppError"`.
    ///
    /// Names of built-in exceptions resolve to [`ExcKind::Builtin`], any other
    /// identifier to [`ExcKind::Custom`].
    pub fn from_names<I, S>(names: I) -> Result<Self, InvalidKindError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ignored_kinds = names
            .into_iter()
            .map(|name| name.as_ref().parse::<ExcKind>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ignored_kinds })
    }

    #[must_use]
    pub fn ignored_kinds(&self) -> &[ExcKind] {
        &self.ignored_kinds
    }

    /// Returns the first allow-list entry that `exc` is an instance of.
    ///
    /// Only `Exception` subclasses can be suppressed: `SystemExit`, `KeyboardInterrupt`,
    /// `GeneratorExit` and bare `BaseException` never match, even when listed.
    #[must_use]
    pub fn matching_kind(&self, exc: &Exception) -> Option<&ExcKind> {
        if !exc.exc_type().is_subclass_of(ExcType::Exception) {
            return None;
        }
        self.ignored_kinds.iter().find(|kind| kind.matches(exc))
    }

    /// Returns true if `exc` would be suppressed by this guard.
    #[must_use]
    pub fn should_ignore(&self, exc: &Exception) -> bool {
        self.matching_kind(exc).is_some()
    }

    /// Enters a guarded scope that reports to `print`.
    ///
    /// Pass `&mut writer` to keep ownership of the writer.
    pub fn enter<P: PrintWriter>(&self, print: P) -> GuardedScope<'_, P, NoopTracer> {
        self.enter_traced(print, NoopTracer)
    }

    /// Enters a guarded scope that reports to `print` and `tracer`.
    pub fn enter_traced<P: PrintWriter, Tr: GuardTracer>(&self, print: P, mut tracer: Tr) -> GuardedScope<'_, P, Tr> {
        tracer.on_enter(&self.ignored_kinds);
        GuardedScope {
            guard: self,
            print,
            tracer,
        }
    }

    /// Runs `block` inside a guarded scope.
    ///
    /// Returns `Ok(Some(value))` when the block completes, `Ok(None)` when it
    /// raised an ignored exception, and `Err(exc)` with the original exception
    /// otherwise. Inside the block, `?` stops at the first exception, so only the
    /// first one raised is ever inspected.
    pub fn run<T, P, F>(&self, print: P, block: F) -> Result<Option<T>, Exception>
    where
        P: PrintWriter,
        F: FnOnce() -> Result<T, Exception>,
    {
        self.run_traced(print, NoopTracer, block)
    }

    /// Like [`run`](Self::run), also reporting scope events to `tracer`.
    pub fn run_traced<T, P, Tr, F>(&self, print: P, tracer: Tr, block: F) -> Result<Option<T>, Exception>
    where
        P: PrintWriter,
        Tr: GuardTracer,
        F: FnOnce() -> Result<T, Exception>,
    {
        let scope = self.enter_traced(print, tracer);
        scope.exit(block())
    }
}

/// An active guarded scope.
///
/// Created by [`ExceptionGuard::enter`]; closed by [`exit`](Self::exit), which
/// consumes the scope so it can only be closed once.
#[derive(Debug)]
#[must_use = "a guarded scope does nothing until `exit` is called with the block's result"]
pub struct GuardedScope<'g, P: PrintWriter, Tr: GuardTracer = NoopTracer> {
    guard: &'g ExceptionGuard,
    print: P,
    tracer: Tr,
}

impl<P: PrintWriter, Tr: GuardTracer> GuardedScope<'_, P, Tr> {
    /// Closes the scope with the block's result, suppressing it if it is an ignored exception.
    ///
    /// If the diagnostic line cannot be written, the writer's error is returned
    /// with the suppressed exception attached as its context.
    pub fn exit<T>(mut self, result: Result<T, Exception>) -> Result<Option<T>, Exception> {
        let exc = match result {
            Ok(value) => {
                self.tracer.on_complete();
                return Ok(Some(value));
            }
            Err(exc) => exc,
        };

        let Some(kind) = self.guard.matching_kind(&exc) else {
            self.tracer.on_propagate(&exc);
            return Err(exc);
        };

        if let Err(write_err) = self.print.write_line(&format!("{IGNORING_PREFIX}{exc}")) {
            let write_err = write_err.with_context(exc);
            self.tracer.on_propagate(&write_err);
            return Err(write_err);
        }
        self.tracer.on_suppress(&exc, kind);
        Ok(None)
    }
}
