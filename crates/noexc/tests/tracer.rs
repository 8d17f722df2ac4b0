/// Tests for guard tracing and diagnostic channel failures.
use std::borrow::Cow;

use noexc::{
    CollectStringPrint, ExcType, Exception, ExceptionGuard, GuardEvent, NoPrint, PrintWriter, RecordingTracer,
    StderrTracer,
};
use pretty_assertions::assert_eq;

/// Writer whose stdout is closed.
#[derive(Debug)]
struct BrokenPrint;

impl PrintWriter for BrokenPrint {
    fn stdout_write(&mut self, _output: Cow<'_, str>) -> Result<(), Exception> {
        Err(Exception::new_msg(ExcType::OSError, "[Errno 9] Bad file descriptor"))
    }

    fn stdout_push(&mut self, _end: char) -> Result<(), Exception> {
        Err(Exception::new_msg(ExcType::OSError, "[Errno 9] Bad file descriptor"))
    }
}

#[test]
fn recording_tracer_sees_each_outcome() {
    let guard = ExceptionGuard::new([ExcType::ArithmeticError, ExcType::KeyError]);
    let mut tracer = RecordingTracer::new();
    let mut print = CollectStringPrint::new();

    let completed = guard.run_traced(&mut print, &mut tracer, || Ok::<_, Exception>(5));
    assert_eq!(completed, Ok(Some(5)));

    let suppressed: Result<Option<()>, Exception> =
        guard.run_traced(&mut print, &mut tracer, || Err(Exception::zero_division()));
    assert_eq!(suppressed, Ok(None));

    let propagated: Result<Option<()>, Exception> =
        guard.run_traced(&mut print, &mut tracer, || Err(Exception::name_error("x")));
    assert!(propagated.is_err());

    let enter = GuardEvent::Enter {
        ignored_kinds: vec!["ArithmeticError".to_owned(), "KeyError".to_owned()],
    };
    assert_eq!(
        tracer.into_events(),
        vec![
            enter.clone(),
            GuardEvent::Complete,
            enter.clone(),
            GuardEvent::Suppress {
                exception: "ZeroDivisionError: division by zero".to_owned(),
                matched_kind: "ArithmeticError".to_owned(),
            },
            enter,
            GuardEvent::Propagate {
                exception: "NameError: name 'x' is not defined".to_owned(),
            },
        ]
    );
    assert_eq!(print.output(), "Ignoring exception division by zero\n");
}

#[test]
fn explicit_scope_reports_enter_before_block_runs() {
    let guard = ExceptionGuard::new([ExcType::IndexError]);
    let mut tracer = RecordingTracer::new();

    let scope = guard.enter_traced(NoPrint, &mut tracer);
    let result: Result<(), Exception> = Err(Exception::list_index_error());
    assert_eq!(scope.exit(result), Ok(None));

    let events = tracer.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], GuardEvent::Enter { .. }));
    assert!(matches!(events[1], GuardEvent::Suppress { .. }));
}

#[test]
fn stderr_tracer_does_not_change_outcome() {
    let guard = ExceptionGuard::new([ExcType::ValueError]);
    let mut print = CollectStringPrint::new();
    let outcome: Result<Option<()>, Exception> =
        guard.run_traced(&mut print, StderrTracer::new(), || Err(Exception::value_error("bad")));
    assert_eq!(outcome, Ok(None));
    assert_eq!(print.output(), "Ignoring exception bad\n");
}

/// A failing diagnostic channel surfaces its own error, chained to the suppressed exception.
#[test]
fn broken_writer_error_carries_suppressed_exception() {
    let guard = ExceptionGuard::new([ExcType::ZeroDivisionError]);
    let mut tracer = RecordingTracer::new();
    let outcome: Result<Option<()>, Exception> =
        guard.run_traced(BrokenPrint, &mut tracer, || Err(Exception::zero_division()));

    let err = outcome.unwrap_err();
    assert_eq!(err.exc_type(), ExcType::OSError);
    assert_eq!(err.context(), Some(&Exception::zero_division()));
    assert!(matches!(tracer.events().last(), Some(GuardEvent::Propagate { .. })));
}

#[test]
fn broken_writer_is_untouched_when_nothing_is_suppressed() {
    let guard = ExceptionGuard::new([ExcType::ZeroDivisionError]);
    assert_eq!(guard.run(BrokenPrint, || Ok::<_, Exception>("fine")), Ok(Some("fine")));

    let outcome: Result<Option<()>, Exception> = guard.run(BrokenPrint, || Err(Exception::type_error("nope")));
    assert_eq!(outcome, Err(Exception::type_error("nope")));
}
