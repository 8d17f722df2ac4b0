use std::{
    fmt::{self, Write},
    io,
    panic::Location,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::exc_type::ExcType;

/// A raised exception: the error value carried out of a guarded block.
///
/// Mirrors the shape of a Python exception instance closely enough for
/// `except`-style matching: a built-in [`ExcType`], an optional message, optional
/// user-defined class metadata, and the stack context it was raised from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exception {
    exc_type: ExcType,
    message: Option<String>,
    /// Class name for user-defined exception instances.
    #[serde(default)]
    custom_class_name: Option<String>,
    /// User exception MRO class names (class first, then bases) for handler matching.
    #[serde(default)]
    custom_mro_names: Vec<String>,
    /// Frames recorded while the exception travelled outwards, innermost first.
    #[serde(default)]
    traceback: Vec<StackFrame>,
    /// Exception that was being handled when this one was raised.
    #[serde(default)]
    context: Option<Box<Self>>,
    /// Repr of the missing key for `KeyError`s built from non-string keys.
    #[serde(default)]
    key_repr: Option<String>,
}

/// A single frame of traceback context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackFrame {
    pub filename: String,
    pub line: u32,
    /// Function name, `None` for module-level code.
    pub frame_name: Option<String>,
}

impl StackFrame {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: u32, frame_name: Option<String>) -> Self {
        Self {
            filename: filename.into(),
            line,
            frame_name,
        }
    }

    /// Captures the Rust source location of the caller.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), None)
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File \"{}\", line {}", self.filename, self.line)?;
        match &self.frame_name {
            Some(name) => write!(f, ", in {name}"),
            None => f.write_str(", in <module>"),
        }
    }
}

impl Exception {
    /// Creates a new exception with the given type and optional message.
    #[must_use]
    pub fn new(exc_type: ExcType, message: Option<String>) -> Self {
        Self {
            exc_type,
            message,
            custom_class_name: None,
            custom_mro_names: Vec::new(),
            traceback: Vec::new(),
            context: None,
            key_repr: None,
        }
    }

    /// Creates a new exception with the given type and message.
    #[must_use]
    pub fn new_msg(exc_type: ExcType, message: impl fmt::Display) -> Self {
        Self::new(exc_type, Some(message.to_string()))
    }

    /// Creates an instance of a user-defined exception class deriving from `base`.
    #[must_use]
    pub fn custom(class_name: impl Into<String>, base: ExcType, message: impl fmt::Display) -> Self {
        let class_name = class_name.into();
        let mut exc = Self::new_msg(base, message);
        exc.custom_mro_names.push(class_name.clone());
        exc.custom_class_name = Some(class_name);
        exc
    }

    /// Adds a user-defined base class to the MRO of a custom exception.
    ///
    /// Bases are appended in MRO order, after the class itself.
    #[must_use]
    pub fn with_custom_base(mut self, base_name: impl Into<String>) -> Self {
        self.custom_mro_names.push(base_name.into());
        self
    }

    /// Records a traceback frame.
    #[must_use]
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.traceback.push(frame);
        self
    }

    /// Records the exception that was being handled when this one was raised.
    #[must_use]
    pub fn with_context(mut self, context: Self) -> Self {
        self.context = Some(Box::new(context));
        self
    }

    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
    }

    #[must_use]
    pub fn custom_class_name(&self) -> Option<&str> {
        self.custom_class_name.as_deref()
    }

    #[must_use]
    pub fn traceback(&self) -> &[StackFrame] {
        &self.traceback
    }

    #[must_use]
    pub fn context(&self) -> Option<&Self> {
        self.context.as_deref()
    }

    /// Returns true when `handler_name` matches a user-defined class in this exception's MRO.
    #[must_use]
    pub fn matches_custom_handler_name(&self, handler_name: &str) -> bool {
        self.custom_mro_names.iter().any(|name| name == handler_name)
    }

    /// Name of the exception's class: the custom class name when set, otherwise the built-in type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.custom_class_name.as_deref().unwrap_or_else(|| self.exc_type.name())
    }

    /// str() for an exception
    #[must_use]
    pub fn py_str(&self) -> String {
        match (self.exc_type, &self.message) {
            // KeyError and its subclasses use the repr of the key for str(exc)
            (exc_type, _) if exc_type.is_subclass_of(ExcType::KeyError) => self.key_repr().unwrap_or_default(),
            (_, Some(message)) => message.clone(),
            (_, None) => String::new(),
        }
    }

    /// Returns the exception formatted as Python would repr it, e.g. `ValueError('bad')`.
    #[must_use]
    pub fn py_repr(&self) -> String {
        let mut s = String::new();
        // writing to a String cannot fail
        let _ = self.py_repr_fmt(&mut s);
        s
    }

    fn py_repr_fmt(&self, f: &mut impl Write) -> fmt::Result {
        write!(f, "{}(", self.type_name())?;
        if let Some(key_repr) = &self.key_repr {
            f.write_str(key_repr)?;
        } else if let Some(message) = &self.message {
            f.write_str(&string_repr(message))?;
        }
        f.write_char(')')
    }

    /// Last line of a Python traceback: `Type: message`, or just `Type` without a message.
    #[must_use]
    pub fn summary(&self) -> String {
        let text = self.py_str();
        if text.is_empty() {
            self.type_name().to_owned()
        } else {
            format!("{}: {text}", self.type_name())
        }
    }

    /// Creates a ZeroDivisionError for division by zero.
    ///
    /// Matches CPython 3.14's format: `ZeroDivisionError('division by zero')`
    #[must_use]
    pub fn zero_division() -> Self {
        Self::new_msg(ExcType::ZeroDivisionError, "division by zero")
    }

    /// Creates a KeyError for a missing string key.
    ///
    /// The key is stored raw; `str(exc)` renders it quoted, e.g. `'name'`.
    #[must_use]
    pub fn key_error(key: &str) -> Self {
        Self::new_msg(ExcType::KeyError, key)
    }

    /// Creates a KeyError from the repr of a non-string key, e.g. `42` or `(1, 2)`.
    ///
    /// `str(exc)` renders `repr` unchanged.
    #[must_use]
    pub fn key_error_repr(repr: impl fmt::Display) -> Self {
        let repr = repr.to_string();
        let mut exc = Self::new_msg(ExcType::KeyError, &repr);
        exc.key_repr = Some(repr);
        exc
    }

    /// Repr of the missing key, for `KeyError` and its subclasses.
    fn key_repr(&self) -> Option<String> {
        self.key_repr
            .clone()
            .or_else(|| self.message.as_deref().map(string_repr))
    }

    /// Creates an IndexError for list index out of range.
    ///
    /// Matches CPython's format: `IndexError('list index out of range')`
    #[must_use]
    pub fn list_index_error() -> Self {
        Self::new_msg(ExcType::IndexError, "list index out of range")
    }

    /// Creates a NameError for accessing an undefined variable.
    ///
    /// Matches CPython's format: `NameError: name 'x' is not defined`
    #[must_use]
    pub fn name_error(name: &str) -> Self {
        Self::new_msg(ExcType::NameError, format!("name '{name}' is not defined"))
    }

    #[must_use]
    pub fn type_error(msg: impl fmt::Display) -> Self {
        Self::new_msg(ExcType::TypeError, msg)
    }

    /// Creates a TypeError for a binary operator applied to incompatible operands.
    ///
    /// Matches CPython's format: `unsupported operand type(s) for +: 'int' and 'str'`
    #[must_use]
    pub fn unsupported_operand(op: &str, lhs_type: &str, rhs_type: &str) -> Self {
        Self::type_error(format!(
            "unsupported operand type(s) for {op}: '{lhs_type}' and '{rhs_type}'"
        ))
    }

    #[must_use]
    pub fn value_error(msg: impl fmt::Display) -> Self {
        Self::new_msg(ExcType::ValueError, msg)
    }

    /// Creates a ValueError for a string that does not parse as a base-10 integer.
    ///
    /// Matches CPython's format: `invalid literal for int() with base 10: 'abc'`
    #[must_use]
    pub fn invalid_int_literal(text: &str) -> Self {
        Self::value_error(format!("invalid literal for int() with base 10: {}", string_repr(text)))
    }

    /// Creates a FileNotFoundError for a missing path.
    ///
    /// Matches CPython's format: `[Errno 2] No such file or directory: 'path'`
    #[must_use]
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::new_msg(
            ExcType::FileNotFoundError,
            format!(
                "[Errno 2] No such file or directory: {}",
                string_repr(&path.as_ref().to_string_lossy())
            ),
        )
    }

    #[must_use]
    pub fn runtime_error(msg: impl fmt::Display) -> Self {
        Self::new_msg(ExcType::RuntimeError, msg)
    }

    /// Converts an I/O error into the matching `OSError` subclass.
    ///
    /// The message follows CPython's `[Errno N] description` layout, with the
    /// filename appended when one is given.
    #[must_use]
    pub fn from_io_error(err: &io::Error, filename: Option<&Path>) -> Self {
        let (exc_type, errno, description) = match err.kind() {
            io::ErrorKind::NotFound => (ExcType::FileNotFoundError, Some(2), "No such file or directory"),
            io::ErrorKind::PermissionDenied => (ExcType::PermissionError, Some(13), "Permission denied"),
            io::ErrorKind::AlreadyExists => (ExcType::FileExistsError, Some(17), "File exists"),
            io::ErrorKind::NotADirectory => (ExcType::NotADirectoryError, Some(20), "Not a directory"),
            io::ErrorKind::IsADirectory => (ExcType::IsADirectoryError, Some(21), "Is a directory"),
            io::ErrorKind::TimedOut => (ExcType::TimeoutError, Some(110), "Connection timed out"),
            _ => (ExcType::OSError, None, ""),
        };
        let errno = err.raw_os_error().or(errno);
        let mut message = match errno {
            Some(code) if !description.is_empty() => format!("[Errno {code}] {description}"),
            Some(code) => {
                let text = err.to_string();
                let suffix = format!(" (os error {code})");
                let text = text.strip_suffix(suffix.as_str()).unwrap_or(&text);
                format!("[Errno {code}] {text}")
            }
            None => err.to_string(),
        };
        if let Some(filename) = filename {
            message.push_str(": ");
            message.push_str(&string_repr(&filename.to_string_lossy()));
        }
        Self::new_msg(exc_type, message)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.py_str())
    }
}

impl std::error::Error for Exception {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.context.as_deref().map(|context| context as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for Exception {
    fn from(err: io::Error) -> Self {
        Self::from_io_error(&err, None)
    }
}

/// Python-style repr of a string: single quotes unless the text contains a single
/// quote and no double quote, with backslashes and control characters escaped.
fn string_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
