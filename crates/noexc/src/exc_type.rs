use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Built-in exception kinds a guard can be told to ignore.
///
/// Each variant's name is its Python class name, so allow-lists can be written
/// as text (`"KeyError".parse()`) and serialized as plain strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
pub enum ExcType {
    /// Root of the hierarchy - matches every exception in subclass checks.
    BaseException,
    /// Base class of all standard (non-exit) exceptions.
    Exception,

    // --- direct BaseException subclasses ---
    SystemExit,
    KeyboardInterrupt,
    /// Raised when a generator's close() method is called.
    GeneratorExit,

    // --- ArithmeticError hierarchy ---
    /// Intermediate class for arithmetic errors.
    ArithmeticError,
    /// Subclass of ArithmeticError.
    FloatingPointError,
    /// Subclass of ArithmeticError.
    OverflowError,
    /// Subclass of ArithmeticError.
    ZeroDivisionError,

    // --- LookupError hierarchy ---
    /// Intermediate class for lookup errors.
    LookupError,
    /// Subclass of LookupError.
    IndexError,
    /// Subclass of LookupError.
    KeyError,

    // --- RuntimeError hierarchy ---
    RuntimeError,
    /// Subclass of RuntimeError.
    NotImplementedError,
    /// Subclass of RuntimeError.
    RecursionError,

    AttributeError,

    // --- NameError hierarchy ---
    NameError,
    /// Subclass of NameError - for accessing local variable before assignment.
    UnboundLocalError,

    // --- ValueError hierarchy ---
    ValueError,
    /// Subclass of ValueError - for encoding/decoding errors.
    UnicodeDecodeError,

    // --- ImportError hierarchy ---
    ImportError,
    /// Subclass of ImportError - for when a module cannot be found.
    ModuleNotFoundError,

    // --- OSError hierarchy ---
    /// OS-related errors (file not found, permission denied, etc.)
    OSError,
    /// Subclass of OSError - for when a file or directory cannot be found.
    FileNotFoundError,
    /// Subclass of OSError - for when a file already exists.
    FileExistsError,
    /// Subclass of OSError - for when a path is a directory but a file was expected.
    IsADirectoryError,
    /// Subclass of OSError - for when a path is not a directory but one was expected.
    NotADirectoryError,
    /// Subclass of OSError - for when an operation lacks required permissions.
    PermissionError,
    /// Subclass of OSError - for when a system call times out.
    TimeoutError,

    // --- SyntaxError hierarchy ---
    SyntaxError,
    /// Subclass of SyntaxError for invalid block indentation.
    IndentationError,

    // --- Standalone exception types ---
    AssertionError,
    BufferError,
    EOFError,
    MemoryError,
    ReferenceError,
    StopAsyncIteration,
    StopIteration,
    TypeError,
}

impl ExcType {
    /// Returns the declared direct superclass of this exception type.
    ///
    /// `BaseException` is the only type without a parent.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        let parent = match self {
            Self::BaseException => return None,
            Self::Exception | Self::SystemExit | Self::KeyboardInterrupt | Self::GeneratorExit => Self::BaseException,
            Self::FloatingPointError | Self::OverflowError | Self::ZeroDivisionError => Self::ArithmeticError,
            Self::IndexError | Self::KeyError => Self::LookupError,
            Self::NotImplementedError | Self::RecursionError => Self::RuntimeError,
            Self::UnboundLocalError => Self::NameError,
            Self::UnicodeDecodeError => Self::ValueError,
            Self::ModuleNotFoundError => Self::ImportError,
            Self::FileNotFoundError
            | Self::FileExistsError
            | Self::IsADirectoryError
            | Self::NotADirectoryError
            | Self::PermissionError
            | Self::TimeoutError => Self::OSError,
            Self::IndentationError => Self::SyntaxError,
            Self::ArithmeticError
            | Self::LookupError
            | Self::RuntimeError
            | Self::AttributeError
            | Self::NameError
            | Self::ValueError
            | Self::ImportError
            | Self::OSError
            | Self::SyntaxError
            | Self::AssertionError
            | Self::BufferError
            | Self::EOFError
            | Self::MemoryError
            | Self::ReferenceError
            | Self::StopAsyncIteration
            | Self::StopIteration
            | Self::TypeError => Self::Exception,
        };
        Some(parent)
    }

    /// Iterates over this type followed by each of its superclasses, ending at `BaseException`.
    pub fn ancestors(self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |exc_type| exc_type.parent())
    }

    /// Checks if this exception type is a subclass of another exception type.
    ///
    /// Walks the declared parent chain, so a broad handler such as `ArithmeticError`
    /// matches `ZeroDivisionError`, and `Exception` matches everything except the
    /// direct `BaseException` subclasses (`SystemExit`, `KeyboardInterrupt`, `GeneratorExit`).
    ///
    /// Returns true if `self` would be caught by `except handler_type:`.
    #[must_use]
    pub fn is_subclass_of(self, handler_type: Self) -> bool {
        self.ancestors().any(|exc_type| exc_type == handler_type)
    }

    /// Returns the variant name as a static string.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}
