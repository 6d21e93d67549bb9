use core::ffi::CStr;
use core::fmt;
use core::ptr;

#[cfg(feature = "std")]
use std::path::Path;

use crate::bind::Bind;
use crate::error::{Code, Error, Result};
use crate::ffi::{self, sqlite3_try};
use crate::handle::{ConnectionKind, UniqueHandle};
use crate::open_options::OpenOptions;
use crate::statement::Statement;
use crate::utils;

/// A SQLite database connection.
///
/// A connection is either open, owning one engine connection which is closed
/// when it is dropped, or empty as constructed by [`Connection::new`].
///
/// # Thread safety
///
/// With the `threadsafe` feature enabled a connection can be sent to another
/// thread, but it cannot be shared between threads. The engine keeps the
/// most recent error as state of the connection, so concurrent use would
/// mix up which call a failure belongs to.
pub struct Connection {
    handle: UniqueHandle<ConnectionKind>,
}

/// Connection is `Send`.
#[cfg(feature = "threadsafe")]
unsafe impl Send for Connection {}

impl Connection {
    /// Construct an empty connection which is not open.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Code, Connection};
    ///
    /// let c = Connection::new();
    /// assert!(!c.is_open());
    ///
    /// let e = c.prepare("SELECT 1").unwrap_err();
    /// assert_eq!(e.code(), Code::MISUSE);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self {
            handle: UniqueHandle::empty(),
        }
    }

    /// Test if the connection is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.handle.is_owning()
    }

    /// Open a read-write connection to a new or existing database.
    ///
    /// `path` can be a filesystem path, or `:memory:` to open a private
    /// in-memory database. If opening fails the connection is left as it was,
    /// including any database it already had open.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::Connection;
    ///
    /// let mut c = Connection::new();
    /// c.open(":memory:")?;
    /// assert!(c.is_open());
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    #[inline]
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        OpenOptions::new().read_write().create().reopen(self, path)
    }

    /// Open a read-write connection through a raw c-string.
    ///
    /// See [`Connection::open`].
    #[inline]
    pub fn open_c_str(&mut self, name: &CStr) -> Result<()> {
        OpenOptions::new()
            .read_write()
            .create()
            .reopen_c_str(self, name)
    }

    /// Open a read-write connection through a UTF-16 filename.
    ///
    /// The filename does not need to be nul-terminated. Databases created
    /// through this call use UTF-16 as their native text encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::Connection;
    ///
    /// let name = ":memory:".encode_utf16().collect::<Vec<u16>>();
    ///
    /// let mut c = Connection::new();
    /// c.open_wide(&name)?;
    /// assert!(c.is_open());
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn open_wide(&mut self, name: &[u16]) -> Result<()> {
        let name = utils::wide_to_terminated(name)?;
        let mut handle = UniqueHandle::<ConnectionKind>::empty();

        let code = unsafe { ffi::sqlite3_open16(name.as_ptr().cast(), handle.out_ptr()) };

        if code != ffi::SQLITE_OK {
            if !handle.is_owning() {
                return Err(Error::from_code(Code::new(code)));
            }

            return Err(Error::from_connection(handle.get()));
        }

        tracing::trace!("connection opened through wide filename");
        self.replace(handle);
        Ok(())
    }

    /// Open a private in-memory database.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::Connection;
    ///
    /// let c = Connection::memory()?;
    /// assert!(c.is_open());
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn memory() -> Result<Self> {
        let mut c = Self::new();
        c.open_c_str(c":memory:")?;
        Ok(c)
    }

    /// Open a private in-memory database through the UTF-16 interface.
    #[inline]
    pub fn wide_memory() -> Result<Self> {
        const MEMORY: [u16; 8] = [
            b':' as u16,
            b'm' as u16,
            b'e' as u16,
            b'm' as u16,
            b'o' as u16,
            b'r' as u16,
            b'y' as u16,
            b':' as u16,
        ];

        let mut c = Self::new();
        c.open_wide(&MEMORY)?;
        Ok(c)
    }

    /// Swap in a freshly opened handle, closing whatever was open before.
    pub(crate) fn replace(&mut self, mut handle: UniqueHandle<ConnectionKind>) {
        self.handle.swap(&mut handle);
    }

    /// Access the raw connection pointer.
    ///
    /// The pointer is null if the connection is not open. It remains owned by
    /// this connection.
    #[inline]
    pub fn as_ptr(&self) -> *mut ffi::sqlite3 {
        self.handle.get()
    }

    /// Snapshot the most recent error reported on this connection.
    ///
    /// The engine overwrites this state with every call, so it is only
    /// meaningful right after a failing call.
    #[inline]
    pub fn last_error(&self) -> Error {
        if !self.is_open() {
            return not_open();
        }

        Error::snapshot(self.as_ptr())
    }

    /// Return the rowid of the most recent successful `INSERT`.
    ///
    /// Returns `0` if nothing has been inserted, or if the connection is not
    /// open.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::Connection;
    ///
    /// let c = Connection::memory()?;
    /// c.execute_batch("CREATE TABLE t (x INTEGER)")?;
    /// assert_eq!(c.last_insert_rowid(), 0);
    ///
    /// c.execute("INSERT INTO t (x) VALUES (?)", (42,))?;
    /// assert_eq!(c.last_insert_rowid(), 1);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn last_insert_rowid(&self) -> i64 {
        if !self.is_open() {
            return 0;
        }

        unsafe { ffi::sqlite3_last_insert_rowid(self.as_ptr()) }
    }

    /// Return the number of rows inserted, updated, or deleted by the most
    /// recent statement.
    #[inline]
    pub fn changes(&self) -> usize {
        if !self.is_open() {
            return 0;
        }

        let changes = unsafe { ffi::sqlite3_changes(self.as_ptr()) };
        usize::try_from(changes).unwrap_or(0)
    }

    /// Prepare a single statement against this connection.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, Reader};
    ///
    /// let c = Connection::memory()?;
    /// let mut stmt = c.prepare("SELECT 40 + 2")?;
    ///
    /// assert!(stmt.execute()?);
    /// assert_eq!(stmt.column_int(0), 42);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        Statement::new(self, sql, ())
    }

    /// Prepare a single statement, bind `values` to it and step it once.
    ///
    /// Returns `true` if the statement produced a row.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::Connection;
    ///
    /// let c = Connection::memory()?;
    /// c.execute_batch("CREATE TABLE users (name TEXT, age INTEGER)")?;
    ///
    /// assert!(!c.execute("INSERT INTO users VALUES (?, ?)", ("Alice", 42))?);
    /// assert!(c.execute("SELECT * FROM users WHERE age = ?", (42,))?);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn execute<'a>(&'a self, sql: &str, values: impl Bind<'a>) -> Result<bool> {
        Statement::new(self, sql, values)?.execute()
    }

    /// Execute a script of one or more statements, discarding any rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::Connection;
    ///
    /// let c = Connection::memory()?;
    ///
    /// c.execute_batch(r#"
    ///     CREATE TABLE users (name TEXT);
    ///     INSERT INTO users VALUES ('Alice');
    ///     INSERT INTO users VALUES ('Bob');
    /// "#)?;
    ///
    /// assert_eq!(c.changes(), 1);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        if !self.is_open() {
            return Err(not_open());
        }

        let sql = utils::str_to_cstring(sql)?;

        unsafe {
            sqlite3_try! {
                self.as_ptr(),
                ffi::sqlite3_exec(
                    self.as_ptr(),
                    sql.as_ptr(),
                    None,
                    ptr::null_mut(),
                    ptr::null_mut(),
                )
            };
        }

        Ok(())
    }
}

pub(crate) fn not_open() -> Error {
    Error::new(Code::MISUSE, "connection is not open")
}

impl Default for Connection {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Connection {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
