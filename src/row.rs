use core::fmt;
use core::marker::PhantomData;
use core::ptr;

use crate::error::Result;
use crate::ffi;
use crate::statement::Statement;

/// A view of the result row a statement is currently positioned on.
///
/// Rows are handed out by [`Rows`] and read through [`Reader`]. A row
/// mutably borrows the iteration which produced it, so it cannot be held
/// across the next step.
///
/// [`Reader`]: crate::Reader
pub struct Row<'s> {
    raw: *mut ffi::sqlite3_stmt,
    _marker: PhantomData<&'s mut ()>,
}

impl Row<'_> {
    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut ffi::sqlite3_stmt {
        self.raw
    }
}

impl fmt::Debug for Row<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row").finish_non_exhaustive()
    }
}

/// A single-pass iteration over the rows produced by a [`Statement`].
///
/// Constructed through [`Statement::rows`], which steps the statement once
/// right away. The iteration then either references the statement and has a
/// current row, or it is at its end. Once at the end it stays there, and
/// iterating the statement again requires a [`Statement::reset`].
///
/// This is a lending iteration, so it does not implement [`Iterator`]:
///
/// ```
/// use sqlite_handle::{Connection, Reader};
///
/// let c = Connection::memory()?;
///
/// c.execute_batch(r#"
///     CREATE TABLE users (name TEXT, age INTEGER);
///     INSERT INTO users VALUES ('Alice', 42);
///     INSERT INTO users VALUES ('Bob', 52);
/// "#)?;
///
/// let mut stmt = c.prepare("SELECT name, age FROM users ORDER BY age")?;
/// let mut rows = stmt.rows()?;
///
/// let mut results = Vec::new();
///
/// while let Some(mut row) = rows.next()? {
///     results.push((row.column_text(0)?.to_owned(), row.column_int(1)));
/// }
///
/// assert_eq!(results, [("Alice".to_owned(), 42), ("Bob".to_owned(), 52)]);
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
pub struct Rows<'s, 'a> {
    stmt: Option<&'s mut Statement<'a>>,
    fresh: bool,
}

impl<'s, 'a> Rows<'s, 'a> {
    /// Step `stmt` once and position the iteration accordingly.
    pub(crate) fn begin(stmt: &'s mut Statement<'a>) -> Result<Self> {
        let stmt = if stmt.execute()? { Some(stmt) } else { None };

        Ok(Self { stmt, fresh: true })
    }

    /// Construct an iteration which is at its end.
    #[inline]
    pub const fn end() -> Self {
        Self {
            stmt: None,
            fresh: false,
        }
    }

    /// Test if the iteration has reached its end.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.stmt.is_none()
    }

    /// Access the current row without stepping.
    ///
    /// Returns `None` at the end of the iteration.
    #[inline]
    pub fn current(&mut self) -> Option<Row<'_>> {
        let stmt = self.stmt.as_deref()?;

        Some(Row {
            raw: stmt.as_ptr(),
            _marker: PhantomData,
        })
    }

    /// Step the statement to its next row.
    ///
    /// Reaching the final row ends the iteration. If stepping fails the
    /// iteration ends as well, and the error is returned. Advancing an
    /// iteration which has already ended does nothing.
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
    /// let mut rows = stmt.rows()?;
    ///
    /// assert_eq!(rows.current().map(|row| row.column_int(0)), Some(1));
    /// rows.advance()?;
    /// assert_eq!(rows.current().map(|row| row.column_int(0)), Some(2));
    /// rows.advance()?;
    /// assert!(rows.is_end());
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn advance(&mut self) -> Result<()> {
        let Some(stmt) = self.stmt.take() else {
            return Ok(());
        };

        if stmt.execute()? {
            self.stmt = Some(stmt);
        }

        self.fresh = true;
        Ok(())
    }

    /// Get the next row.
    ///
    /// The first call yields the row produced when the iteration was
    /// constructed, every later call steps the statement first.
    pub fn next(&mut self) -> Result<Option<Row<'_>>> {
        if !self.fresh {
            self.advance()?;
        }

        self.fresh = false;
        Ok(self.current())
    }

    /// Call `f` with every remaining row, stopping at the first error.
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
    ///
    /// let mut sum = 0;
    ///
    /// stmt.rows()?.for_each(|row| {
    ///     sum += row.column_int(0);
    ///     Ok(())
    /// })?;
    ///
    /// assert_eq!(sum, 6);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    pub fn for_each<F>(mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Row<'_>) -> Result<()>,
    {
        while let Some(mut row) = self.next()? {
            f(&mut row)?;
        }

        Ok(())
    }
}

/// Iterations are equal if they are positioned on the same statement, or if
/// both are at their end.
///
/// # Examples
///
/// ```
/// use sqlite_handle::{Connection, Rows};
///
/// let c = Connection::memory()?;
/// let mut stmt = c.prepare("SELECT 1 WHERE 0")?;
///
/// let rows = stmt.rows()?;
/// assert!(rows.is_end());
/// assert!(rows == Rows::end());
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
impl PartialEq for Rows<'_, '_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self.stmt.as_deref(), other.stmt.as_deref()) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Rows<'_, '_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("end", &self.is_end())
            .finish_non_exhaustive()
    }
}
