#![doc = include_str!("../../../README.md")]
mod error;
mod exc_type;
mod exception;
mod guard;
mod io;
mod kind;
pub mod tracer;

pub use crate::{
    error::InvalidKindError,
    exc_type::ExcType,
    exception::{Exception, StackFrame},
    guard::{ExceptionGuard, GuardedScope, IGNORING_PREFIX},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    kind::ExcKind,
    tracer::{GuardEvent, GuardTracer, NoopTracer, RecordingTracer, StderrTracer},
};
