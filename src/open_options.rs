use core::ffi::{CStr, c_int};
use core::ptr;

#[cfg(feature = "std")]
use std::path::Path;

use crate::connection::Connection;
use crate::error::{Code, Error, Result};
use crate::ffi;
use crate::handle::{ConnectionKind, UniqueHandle};

/// Options that can be used to customize the opening of a SQLite database.
///
/// When using [`new`] the database is opened with [`extended_result_codes`]
/// set. Note that a mode like [`read_write`] or [`read_only`] must be set,
/// otherwise opening fails with [`Code::MISUSE`].
///
/// [`new`]: Self::new
/// [`extended_result_codes`]: Self::extended_result_codes
/// [`read_write`]: Self::read_write
/// [`read_only`]: Self::read_only
///
/// # Examples
///
/// ```
/// use sqlite_handle::OpenOptions;
///
/// let c = OpenOptions::new()
///     .read_write()
///     .create()
///     .open_in_memory()?;
///
/// assert!(c.is_open());
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct OpenOptions {
    raw: c_int,
}

impl OpenOptions {
    /// Create flags for opening a database connection with default safe
    /// options.
    #[inline]
    pub fn new() -> Self {
        Self {
            raw: ffi::SQLITE_OPEN_EXRESCODE,
        }
    }

    /// Create flags for opening a database connection with no options set.
    #[inline]
    pub fn empty() -> Self {
        Self { raw: 0 }
    }

    /// The database is opened in read-only mode. If the database does not
    /// already exist, an error is returned.
    #[inline]
    pub fn read_only(&mut self) -> &mut Self {
        self.raw |= ffi::SQLITE_OPEN_READONLY;
        self
    }

    /// The database is opened for reading and writing if possible, or reading
    /// only if the file is write protected by the operating system.
    #[inline]
    pub fn read_write(&mut self) -> &mut Self {
        self.raw |= ffi::SQLITE_OPEN_READWRITE;
        self
    }

    /// The database is created if it does not already exist.
    #[inline]
    pub fn create(&mut self) -> &mut Self {
        self.raw |= ffi::SQLITE_OPEN_CREATE;
        self
    }

    /// The filename can be interpreted as a URI if this flag is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::OpenOptions;
    ///
    /// let c = OpenOptions::new()
    ///     .read_write()
    ///     .create()
    ///     .uri()
    ///     .open_c_str(c"file:memorydb?mode=memory")?;
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn uri(&mut self) -> &mut Self {
        self.raw |= ffi::SQLITE_OPEN_URI;
        self
    }

    /// The database will be opened as an in-memory database. The filename is
    /// only used to identify the database for cache-sharing.
    #[inline]
    pub fn memory(&mut self) -> &mut Self {
        self.raw |= ffi::SQLITE_OPEN_MEMORY;
        self
    }

    /// The new database connection will use the "multi-thread" [threading
    /// mode].
    ///
    /// [threading mode]: https://www.sqlite.org/threadsafe.html
    #[inline]
    pub fn no_mutex(&mut self) -> &mut Self {
        self.raw |= ffi::SQLITE_OPEN_NOMUTEX;
        self
    }

    /// The new database connection will use the "serialized" [threading
    /// mode].
    ///
    /// [threading mode]: https://www.sqlite.org/threadsafe.html
    #[inline]
    pub fn full_mutex(&mut self) -> &mut Self {
        self.raw |= ffi::SQLITE_OPEN_FULLMUTEX;
        self
    }

    /// The database connection comes up in "extended result code mode".
    #[inline]
    pub fn extended_result_codes(&mut self) -> &mut Self {
        self.raw |= ffi::SQLITE_OPEN_EXRESCODE;
        self
    }

    /// Open a database to the given path.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    #[inline]
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Connection> {
        let mut c = Connection::new();
        self.reopen(&mut c, path)?;
        Ok(c)
    }

    /// Open a database connection with a raw c-string.
    #[inline]
    pub fn open_c_str(&self, name: &CStr) -> Result<Connection> {
        let mut c = Connection::new();
        self.reopen_c_str(&mut c, name)?;
        Ok(c)
    }

    /// Open an in-memory database.
    #[inline]
    pub fn open_in_memory(&self) -> Result<Connection> {
        self.open_c_str(c":memory:")
    }

    /// Open a database to the given path into an existing connection.
    ///
    /// The connection is only replaced if opening succeeds, on failure it is
    /// left exactly as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, OpenOptions};
    ///
    /// let mut c = Connection::memory()?;
    /// c.execute_batch("CREATE TABLE users (name TEXT)")?;
    ///
    /// let mut opts = OpenOptions::new();
    /// opts.read_only();
    ///
    /// assert!(opts.reopen(&mut c, "/this/path/does/not/exist.sqlite3").is_err());
    /// c.execute_batch("INSERT INTO users VALUES ('Alice')")?;
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn reopen(&self, c: &mut Connection, path: impl AsRef<Path>) -> Result<()> {
        let path = crate::utils::path_to_cstring(path.as_ref())?;
        self.reopen_c_str(c, &path)
    }

    /// Open a database with a raw c-string into an existing connection.
    ///
    /// See [`OpenOptions::reopen`].
    pub fn reopen_c_str(&self, c: &mut Connection, name: &CStr) -> Result<()> {
        let handle = self.open_handle(name)?;
        c.replace(handle);
        Ok(())
    }

    fn open_handle(&self, name: &CStr) -> Result<UniqueHandle<ConnectionKind>> {
        let mut handle = UniqueHandle::<ConnectionKind>::empty();

        let code =
            unsafe { ffi::sqlite3_open_v2(name.as_ptr(), handle.out_ptr(), self.raw, ptr::null()) };

        if code != ffi::SQLITE_OK {
            // Unless allocation failed the engine hands out a connection even
            // when opening fails, and that connection carries the error. It
            // is closed when the temporary handle is dropped.
            if !handle.is_owning() {
                return Err(Error::from_code(Code::new(code)));
            }

            return Err(Error::from_connection(handle.get()));
        }

        tracing::trace!(name = ?name, flags = self.raw, "connection opened");
        Ok(handle)
    }
}

impl Default for OpenOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
