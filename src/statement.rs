use core::ffi::c_int;
use core::fmt;
use core::marker::PhantomData;
use core::ptr;

use crate::bind::Bind;
use crate::bind_value::BindValue;
use crate::bytes;
use crate::connection::{Connection, not_open};
use crate::error::{Code, Error, Result};
use crate::ffi::{self, sqlite3_try};
use crate::handle::{StatementKind, UniqueHandle};
use crate::row::Rows;

/// A prepared statement.
///
/// A statement is either *empty* or *prepared* against a [`Connection`]
/// which it borrows for `'a`. Text bound by reference has to live for `'a`
/// as well, since the engine reads it whenever the statement is stepped.
///
/// The statement is finalized when dropped, whatever state its cursor is in.
///
/// # Examples
///
/// ```
/// use sqlite_handle::{Connection, Reader, Statement};
///
/// let c = Connection::memory()?;
///
/// c.execute_batch(r#"
///     CREATE TABLE users (name TEXT, age INTEGER);
///     INSERT INTO users VALUES ('Alice', 42);
///     INSERT INTO users VALUES ('Bob', 52);
/// "#)?;
///
/// let mut stmt = Statement::new(&c, "SELECT name FROM users WHERE age > ?", (50,))?;
///
/// assert!(stmt.execute()?);
/// assert_eq!(stmt.column_text(0)?, "Bob");
/// assert!(!stmt.execute()?);
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
pub struct Statement<'a> {
    handle: UniqueHandle<StatementKind>,
    done: bool,
    _marker: PhantomData<&'a Connection>,
}

impl<'a> Statement<'a> {
    /// Construct an empty statement which is not prepared.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            handle: UniqueHandle::empty(),
            done: false,
            _marker: PhantomData,
        }
    }

    /// Prepare `sql` against `c` and bind `values` to its parameters.
    ///
    /// See [`Statement::prepare`].
    #[inline]
    pub fn new(c: &'a Connection, sql: &str, values: impl Bind<'a>) -> Result<Self> {
        let mut stmt = Self::empty();
        stmt.prepare(c, sql, values)?;
        Ok(stmt)
    }

    /// Test if the statement is prepared.
    #[inline]
    pub fn is_prepared(&self) -> bool {
        self.handle.is_owning()
    }

    /// Compile `sql` against `c`, replacing any statement held before, and
    /// bind `values` positionally starting at index `1`.
    ///
    /// Compilation errors are reported by the connection. If compiling
    /// fails the statement is left empty. Text which only holds whitespace or
    /// comments fails with [`Code::MISUSE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Code, Connection, Statement};
    ///
    /// let c = Connection::memory()?;
    ///
    /// let mut stmt = Statement::empty();
    /// let e = stmt.prepare(&c, "SELEKT 1", ()).unwrap_err();
    ///
    /// assert_eq!(e.code(), Code::ERROR);
    /// assert!(!stmt.is_prepared());
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn prepare(&mut self, c: &'a Connection, sql: &str, values: impl Bind<'a>) -> Result<()> {
        self.done = false;

        if !c.is_open() {
            self.handle.clear();
            return Err(not_open());
        }

        let len = bytes::byte_len(sql.len())?;

        let code = unsafe {
            ffi::sqlite3_prepare_v3(
                c.as_ptr(),
                sql.as_ptr().cast(),
                len,
                0,
                self.handle.out_ptr(),
                ptr::null_mut(),
            )
        };

        self.compiled(c, code)?;
        tracing::trace!(sql, "statement prepared");
        self.bind_all(values)
    }

    /// Compile UTF-16 encoded `sql` against `c`.
    ///
    /// The text does not need to be nul-terminated. See
    /// [`Statement::prepare`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, Reader, Statement};
    ///
    /// let c = Connection::memory()?;
    /// let sql = "SELECT ? * 2".encode_utf16().collect::<Vec<u16>>();
    ///
    /// let mut stmt = Statement::empty();
    /// stmt.prepare_wide(&c, &sql, (21,))?;
    ///
    /// assert!(stmt.execute()?);
    /// assert_eq!(stmt.column_int(0), 42);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn prepare_wide(
        &mut self,
        c: &'a Connection,
        sql: &[u16],
        values: impl Bind<'a>,
    ) -> Result<()> {
        self.done = false;

        if !c.is_open() {
            self.handle.clear();
            return Err(not_open());
        }

        let sql = bytes::wide_as_bytes(sql);
        let len = bytes::byte_len(sql.len())?;

        let code = unsafe {
            ffi::sqlite3_prepare16_v2(
                c.as_ptr(),
                sql.as_ptr().cast(),
                len,
                self.handle.out_ptr(),
                ptr::null_mut(),
            )
        };

        self.compiled(c, code)?;
        tracing::trace!("statement prepared from wide text");
        self.bind_all(values)
    }

    /// Bind a value to a parameter by index.
    ///
    /// The first parameter has index `1`.
    ///
    /// # Errors
    ///
    /// Binding outside of the range of parameters fails with
    /// [`Code::RANGE`].
    ///
    /// ```
    /// use sqlite_handle::{Code, Connection};
    ///
    /// let c = Connection::memory()?;
    /// let mut stmt = c.prepare("SELECT ?")?;
    ///
    /// let e = stmt.bind_value(0, "Bob").unwrap_err();
    /// assert_eq!(e.code(), Code::RANGE);
    ///
    /// let e = stmt.bind_value(2, "Bob").unwrap_err();
    /// assert_eq!(e.code(), Code::RANGE);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn bind_value(&mut self, index: c_int, value: impl BindValue<'a>) -> Result<()> {
        value.bind_value(self, index)
    }

    /// Bind a collection of values positionally, starting at index `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, Null};
    ///
    /// let c = Connection::memory()?;
    /// c.execute_batch("CREATE TABLE users (name TEXT, age INTEGER, email TEXT)")?;
    ///
    /// let mut stmt = c.prepare("INSERT INTO users VALUES (?, ?, ?)")?;
    /// stmt.bind_all(("Alice", 42, Null))?;
    /// assert!(!stmt.execute()?);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn bind_all(&mut self, values: impl Bind<'a>) -> Result<()> {
        values.bind(self)
    }

    /// Step the statement once.
    ///
    /// Returns `true` if a row is available for reading, and `false` if the
    /// statement has been evaluated completely. Reaching the end is not an
    /// error. Once the end is reached the statement stays there, and keeps
    /// returning `false`, until it is [`reset`].
    ///
    /// [`reset`]: Self::reset
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, Reader};
    ///
    /// let c = Connection::memory()?;
    /// c.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1), (2);")?;
    ///
    /// let mut stmt = c.prepare("SELECT x FROM t ORDER BY x")?;
    ///
    /// let mut values = Vec::new();
    ///
    /// while stmt.execute()? {
    ///     values.push(stmt.column_int(0));
    /// }
    ///
    /// assert_eq!(values, [1, 2]);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn execute(&mut self) -> Result<bool> {
        let raw = self.prepared()?;

        if self.done {
            return Ok(false);
        }

        match unsafe { ffi::sqlite3_step(raw) } {
            ffi::SQLITE_ROW => Ok(true),
            ffi::SQLITE_DONE => {
                self.done = true;
                Ok(false)
            }
            _ => Err(Error::from_connection(self.db())),
        }
    }

    /// Rewind the statement to before its first row and bind `values`
    /// positionally, starting at index `1`.
    ///
    /// Bindings which are not replaced keep their previous values.
    ///
    /// # Errors
    ///
    /// If the most recent step failed, the engine reports that failure again
    /// here. The statement is rewound regardless.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, Reader};
    ///
    /// let c = Connection::memory()?;
    ///
    /// c.execute_batch(r#"
    ///     CREATE TABLE users (name TEXT, age INTEGER);
    ///     INSERT INTO users VALUES ('Alice', 72);
    ///     INSERT INTO users VALUES ('Bob', 40);
    /// "#)?;
    ///
    /// let mut stmt = c.prepare("SELECT name FROM users WHERE age > ? ORDER BY age")?;
    ///
    /// let mut results = Vec::new();
    ///
    /// for age in [30, 50] {
    ///     stmt.reset((age,))?;
    ///
    ///     while stmt.execute()? {
    ///         results.push(stmt.column_text(0)?.to_owned());
    ///     }
    /// }
    ///
    /// assert_eq!(results, ["Bob", "Alice", "Alice"]);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn reset(&mut self, values: impl Bind<'a>) -> Result<()> {
        let raw = self.prepared()?;
        self.done = false;

        unsafe {
            sqlite3_try!(self.db(), ffi::sqlite3_reset(raw));
        }

        self.bind_all(values)
    }

    /// Start iterating over the rows of this statement.
    ///
    /// This steps the statement once right away. See [`Rows`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, Reader};
    ///
    /// let c = Connection::memory()?;
    /// c.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1), (2), (3);")?;
    ///
    /// let mut stmt = c.prepare("SELECT x FROM t ORDER BY x")?;
    /// let mut rows = stmt.rows()?;
    ///
    /// let mut values = Vec::new();
    ///
    /// while let Some(row) = rows.next()? {
    ///     values.push(row.column_int(0));
    /// }
    ///
    /// assert_eq!(values, [1, 2, 3]);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    pub fn rows(&mut self) -> Result<Rows<'_, 'a>> {
        Rows::begin(self)
    }

    /// Check the outcome of compiling against `c`.
    ///
    /// Text without any statement in it compiles successfully into nothing,
    /// which is reported as misuse.
    fn compiled(&mut self, c: &Connection, code: c_int) -> Result<()> {
        if code != ffi::SQLITE_OK {
            let error = Error::from_connection(c.as_ptr());
            self.handle.clear();
            return Err(error);
        }

        if !self.is_prepared() {
            return Err(Error::new(Code::MISUSE, "sql contains no statement"));
        }

        Ok(())
    }

    /// Access the raw statement pointer, which is null when empty.
    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut ffi::sqlite3_stmt {
        self.handle.get()
    }

    /// Access the raw statement pointer, failing if the statement is empty.
    #[inline]
    pub(crate) fn prepared(&self) -> Result<*mut ffi::sqlite3_stmt> {
        if !self.is_prepared() {
            return Err(Error::new(Code::MISUSE, "statement is not prepared"));
        }

        Ok(self.as_ptr())
    }

    /// The connection owning the statement, which holds its error state.
    #[inline]
    pub(crate) fn db(&self) -> *mut ffi::sqlite3 {
        unsafe { ffi::sqlite3_db_handle(self.as_ptr()) }
    }
}

/// Finalizing the statement happens while the connection is still borrowed.
///
/// ```compile_fail
/// use sqlite_handle::Connection;
///
/// let c = Connection::memory()?;
/// let stmt = c.prepare("SELECT 1")?;
/// drop(c);
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
impl Drop for Statement<'_> {
    #[inline]
    fn drop(&mut self) {
        self.handle.clear();
    }
}

impl Default for Statement<'_> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Statement<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("prepared", &self.is_prepared())
            .finish_non_exhaustive()
    }
}
