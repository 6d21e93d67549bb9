use core::error;
use core::ffi::{CStr, c_char, c_int};
use core::fmt;

use alloc::boxed::Box;

use crate::ffi;

/// A result type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Error code reported by the engine.
///
/// This holds the extended result code when one is available. Use
/// [`Code::primary`] to get at the primary code it belongs to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Code {
    raw: c_int,
}

impl Code {
    /// Construct a new code from the specified raw code.
    #[inline]
    pub const fn new(raw: c_int) -> Self {
        Self { raw }
    }

    /// Return the numeric representation of the error code.
    #[inline]
    pub const fn as_raw(self) -> c_int {
        self.raw
    }

    /// Return the primary result code, stripping any extended information.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::Code;
    ///
    /// assert_eq!(Code::CONSTRAINT_UNIQUE.primary(), Code::CONSTRAINT);
    /// assert_eq!(Code::ERROR.primary(), Code::ERROR);
    /// ```
    #[inline]
    pub const fn primary(self) -> Self {
        Self {
            raw: self.raw & 0xff,
        }
    }

    /// Return the static description the engine associates with this code.
    #[inline]
    fn description(self) -> &'static CStr {
        unsafe { CStr::from_ptr(ffi::sqlite3_errstr(self.raw)) }
    }
}

macro_rules! define_codes {
    ($(
        $vis:vis const $name:ident = $value:expr;
    )*) => {
        impl Code {
            $(
                #[allow(missing_docs)]
                $vis const $name: Code = Code::new($value);
            )*
        }

        impl fmt::Display for Code {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match *self {
                    $(Code::$name => write!(f, stringify!($name)),)*
                    Code { raw } => write!(f, "UNKNOWN({raw})"),
                }
            }
        }

        impl fmt::Debug for Code {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }
    };
}

define_codes! {
    pub const OK = 0;
    pub const ERROR = 1;
    pub const INTERNAL = 2;
    pub const PERM = 3;
    pub const ABORT = 4;
    pub const BUSY = 5;
    pub const LOCKED = 6;
    pub const NOMEM = 7;
    pub const READONLY = 8;
    pub const INTERRUPT = 9;
    pub const IOERR = 10;
    pub const CORRUPT = 11;
    pub const NOTFOUND = 12;
    pub const FULL = 13;
    pub const CANTOPEN = 14;
    pub const PROTOCOL = 15;
    pub const EMPTY = 16;
    pub const SCHEMA = 17;
    pub const TOOBIG = 18;
    pub const CONSTRAINT = 19;
    pub const MISMATCH = 20;
    pub const MISUSE = 21;
    pub const NOLFS = 22;
    pub const AUTH = 23;
    pub const FORMAT = 24;
    pub const RANGE = 25;
    pub const NOTADB = 26;
    pub const NOTICE = 27;
    pub const WARNING = 28;
    pub const ROW = 100;
    pub const DONE = 101;
    pub const CANTOPEN_ISDIR = 14 | (2 << 8);
    pub const CANTOPEN_FULLPATH = 14 | (3 << 8);
    pub const READONLY_DBMOVED = 8 | (4 << 8);
    pub const CONSTRAINT_CHECK = 19 | (1 << 8);
    pub const CONSTRAINT_FOREIGNKEY = 19 | (3 << 8);
    pub const CONSTRAINT_NOTNULL = 19 | (5 << 8);
    pub const CONSTRAINT_PRIMARYKEY = 19 | (6 << 8);
    pub const CONSTRAINT_UNIQUE = 19 | (8 << 8);
    pub const CONSTRAINT_ROWID = 19 | (10 << 8);
}

/// An error reported by the engine, or detected before calling it.
///
/// This is a snapshot of the error state of a connection taken at the moment
/// a call failed. It holds no reference back to the connection it came from.
pub struct Error {
    code: Code,
    message: Box<str>,
}

impl Error {
    /// Construct a new error from a code and a message.
    #[inline]
    pub(crate) fn new(code: Code, message: impl Into<Box<str>>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Construct an error with the engine's static description of `code`.
    pub(crate) fn from_code(code: Code) -> Self {
        let message = c_to_error_text(code.description().as_ptr());
        Self::new(code, message)
    }

    /// Snapshot the most recent error of the given connection.
    ///
    /// `db` must either be null or point to a connection which has not been
    /// closed. Both are handled by the engine, a null connection reports an
    /// out-of-memory condition.
    pub(crate) fn from_connection(db: *mut ffi::sqlite3) -> Self {
        let error = Self::snapshot(db);
        tracing::debug!(code = %error.code, reason = &*error.message, "engine call failed");
        error
    }

    /// Read the error state of a connection without treating it as a
    /// failure.
    pub(crate) fn snapshot(db: *mut ffi::sqlite3) -> Self {
        let (code, message) = unsafe {
            let code = ffi::sqlite3_extended_errcode(db);
            let message = c_to_error_text(ffi::sqlite3_errmsg(db));
            (code, message)
        };

        Self::new(Code::new(code), message)
    }

    /// The error code that caused this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Code, Connection};
    ///
    /// let c = Connection::memory()?;
    /// let e = c.prepare("SELECT * FROM missing").unwrap_err();
    /// assert_eq!(e.code(), Code::ERROR);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn code(&self) -> Code {
        self.code
    }

    /// The human-readable message which accompanied the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::Connection;
    ///
    /// let c = Connection::memory()?;
    /// let e = c.prepare("SELECT * FROM missing").unwrap_err();
    /// assert_eq!(e.message(), "no such table: missing");
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Copy an engine-owned error string, falling back to a generic text when it
/// is missing or not valid UTF-8.
pub(crate) fn c_to_error_text(ptr: *const c_char) -> Box<str> {
    if ptr.is_null() {
        return Box::from("no message");
    }

    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(message) => Box::from(message),
        Err(..) => Box::from("message is not valid utf-8"),
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("code", &self.code)
            .field("message", &self.message)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "sqlite3 error {}: {}", self.code.as_raw(), self.message)
    }
}

impl error::Error for Error {}
