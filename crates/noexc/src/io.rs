use std::{
    borrow::Cow,
    io::{self, Write as _},
};

use crate::exception::Exception;

/// Trait for the channel that receives the guard's diagnostic lines.
///
/// Implement this trait to capture or redirect the `Ignoring exception ...` output.
/// The default implementation `StdPrint` writes to stdout.
pub trait PrintWriter {
    /// Writes a piece of text, without adding separators or a trailing newline.
    fn stdout_write(&mut self, output: Cow<'_, str>) -> Result<(), Exception>;

    /// Add a single character to stdout.
    ///
    /// Generally called to terminate a line.
    fn stdout_push(&mut self, end: char) -> Result<(), Exception>;

    /// Writes `line` followed by a newline.
    fn write_line(&mut self, line: &str) -> Result<(), Exception> {
        self.stdout_write(Cow::Borrowed(line))?;
        self.stdout_push('\n')
    }
}

impl<P: PrintWriter + ?Sized> PrintWriter for &mut P {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> Result<(), Exception> {
        (**self).stdout_write(output)
    }

    fn stdout_push(&mut self, end: char) -> Result<(), Exception> {
        (**self).stdout_push(end)
    }

    fn write_line(&mut self, line: &str) -> Result<(), Exception> {
        (**self).write_line(line)
    }
}

/// Default `PrintWriter` that writes to the process's stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> Result<(), Exception> {
        io::stdout().lock().write_all(output.as_bytes())?;
        Ok(())
    }

    fn stdout_push(&mut self, end: char) -> Result<(), Exception> {
        let mut buf = [0; 4];
        let mut stdout = io::stdout().lock();
        stdout.write_all(end.encode_utf8(&mut buf).as_bytes())?;
        if end == '\n' {
            stdout.flush()?;
        }
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<(), Exception> {
        // hold the lock for the whole line so concurrent guards don't interleave
        write_line_to(&mut io::stdout().lock(), line)
    }
}

/// Writes `line` plus a newline to `out` and flushes it.
fn write_line_to(out: &mut impl io::Write, line: &str) -> Result<(), Exception> {
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

/// A `PrintWriter` that collects all output into a string.
///
/// Useful for testing or capturing diagnostic output programmatically.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    /// Creates a new empty `CollectStringPrint`.
    #[must_use]
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Returns the collected output as a string slice.
    #[must_use]
    pub fn output(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the writer and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> Result<(), Exception> {
        self.0.push_str(&output);
        Ok(())
    }

    fn stdout_push(&mut self, end: char) -> Result<(), Exception> {
        self.0.push(end);
        Ok(())
    }
}

/// `PrintWriter` that ignores all output.
///
/// Useful for suppressing diagnostics during testing or benchmarking.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn stdout_write(&mut self, _output: Cow<'_, str>) -> Result<(), Exception> {
        Ok(())
    }

    fn stdout_push(&mut self, _end: char) -> Result<(), Exception> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::exc_type::ExcType;

    #[test]
    fn write_line_to_appends_newline() {
        let mut out = Vec::new();
        write_line_to(&mut out, "Ignoring exception division by zero").unwrap();
        write_line_to(&mut out, "Ignoring exception 'k'").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Ignoring exception division by zero\nIgnoring exception 'k'\n"
        );
    }

    #[test]
    fn write_line_to_maps_io_errors() {
        struct Closed;

        impl io::Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::PermissionDenied))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = write_line_to(&mut Closed, "lost").unwrap_err();
        assert_eq!(err.exc_type(), ExcType::PermissionError);
    }

    #[test]
    fn std_print_writes_lines() {
        StdPrint.write_line("noexc std print check").unwrap();
        StdPrint.stdout_write(Cow::Borrowed("partial")).unwrap();
        StdPrint.stdout_push('\n').unwrap();
    }

    #[test]
    fn collect_string_print_gathers_output() {
        let mut print = CollectStringPrint::new();
        print.write_line("one").unwrap();
        print.stdout_write(Cow::Borrowed("two")).unwrap();
        print.stdout_push('!').unwrap();
        assert_eq!(print.into_output(), "one\ntwo!");
    }
}
