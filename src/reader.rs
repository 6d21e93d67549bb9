use core::ffi::c_int;
use core::slice;
use core::str;

use crate::error::{Code, Error, Result};
use crate::ffi;
use crate::row::Row;
use crate::statement::Statement;

mod sealed {
    use crate::row::Row;
    use crate::statement::Statement;

    pub trait Sealed {}
    impl Sealed for Statement<'_> {}
    impl Sealed for Row<'_> {}
}

/// Typed access to the columns of the current result row.
///
/// Implemented by a [`Statement`] which is used as a cursor, and by the
/// [`Row`] handed out while iterating. Columns are indexed from `0`, unlike
/// bound parameters which start at `1`.
///
/// Values are only meaningful after a step produced a row. Reading a column
/// before the first step, after the statement is exhausted, or outside of
/// the result's columns yields whatever the engine returns in that case,
/// which is usually `0` or empty text.
///
/// Text readers take `&mut self` since the engine may convert the stored
/// value into the requested encoding, which invalidates text returned
/// earlier for the same column.
///
/// # Examples
///
/// ```
/// use sqlite_handle::{Connection, Reader};
///
/// let c = Connection::memory()?;
/// c.execute_batch("CREATE TABLE users (name TEXT, age INTEGER); INSERT INTO users VALUES ('Alice', 42);")?;
///
/// let mut stmt = c.prepare("SELECT name, age FROM users")?;
/// assert!(stmt.execute()?);
///
/// assert_eq!(stmt.column_count(), 2);
/// assert_eq!(stmt.column_text(0)?, "Alice");
/// assert_eq!(stmt.column_text_len(0), 5);
/// assert_eq!(stmt.column_int(1), 42);
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
pub trait Reader
where
    Self: self::sealed::Sealed,
{
    #[doc(hidden)]
    fn cursor(&self) -> *mut ffi::sqlite3_stmt;

    /// Read the column at `index` as an integer.
    ///
    /// NULL reads as `0` and text is converted the way SQL does it.
    #[inline]
    fn column_int(&self, index: c_int) -> i64 {
        unsafe { ffi::sqlite3_column_int64(self.cursor(), index) }
    }

    /// Read the column at `index` as UTF-8 text.
    ///
    /// NULL reads as empty text.
    ///
    /// # Errors
    ///
    /// Fails with [`Code::MISMATCH`] if the stored text is not valid UTF-8,
    /// and with [`Code::NOMEM`] if the engine could not allocate the
    /// converted value.
    fn column_text(&mut self, index: c_int) -> Result<&str> {
        let raw = self.cursor();

        unsafe {
            let ptr = ffi::sqlite3_column_text(raw, index);

            if ptr.is_null() {
                return null_or_nomem(raw, index, ffi::sqlite3_column_bytes).map(|()| "");
            }

            let len = ffi::sqlite3_column_bytes(raw, index);
            let bytes = slice::from_raw_parts(ptr, len.max(0) as usize);

            match str::from_utf8(bytes) {
                Ok(text) => Ok(text),
                Err(..) => Err(Error::new(Code::MISMATCH, "column is not valid UTF-8")),
            }
        }
    }

    /// Read the column at `index` as native-endian UTF-16 text.
    ///
    /// NULL reads as empty text.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, Reader};
    ///
    /// let c = Connection::memory()?;
    /// let mut stmt = c.prepare("SELECT 'Bob'")?;
    /// assert!(stmt.execute()?);
    ///
    /// let expected = "Bob".encode_utf16().collect::<Vec<u16>>();
    /// assert_eq!(stmt.column_wide_text(0)?, &expected[..]);
    /// assert_eq!(stmt.column_wide_text_len(0), 3);
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    fn column_wide_text(&mut self, index: c_int) -> Result<&[u16]> {
        let raw = self.cursor();

        unsafe {
            let ptr = ffi::sqlite3_column_text16(raw, index).cast::<u16>();

            if ptr.is_null() {
                return null_or_nomem(raw, index, ffi::sqlite3_column_bytes16).map(|()| &[][..]);
            }

            if !ptr.is_aligned() {
                return Err(Error::new(Code::MISMATCH, "wide column is not aligned"));
            }

            let len = ffi::sqlite3_column_bytes16(raw, index).max(0) as usize;
            Ok(slice::from_raw_parts(ptr, len / size_of::<u16>()))
        }
    }

    /// Length in bytes of the column at `index` as UTF-8 text.
    #[inline]
    fn column_text_len(&mut self, index: c_int) -> usize {
        let len = unsafe { ffi::sqlite3_column_bytes(self.cursor(), index) };
        len.max(0) as usize
    }

    /// Length in UTF-16 code units of the column at `index` as wide text.
    #[inline]
    fn column_wide_text_len(&mut self, index: c_int) -> usize {
        let len = unsafe { ffi::sqlite3_column_bytes16(self.cursor(), index) };
        len.max(0) as usize / size_of::<u16>()
    }

    /// Number of columns in the result.
    #[inline]
    fn column_count(&self) -> c_int {
        unsafe { ffi::sqlite3_column_count(self.cursor()) }
    }

    /// Test if the column at `index` is NULL.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_handle::{Connection, Reader};
    ///
    /// let c = Connection::memory()?;
    /// let mut stmt = c.prepare("SELECT NULL, 1")?;
    /// assert!(stmt.execute()?);
    ///
    /// assert!(stmt.column_is_null(0));
    /// assert!(!stmt.column_is_null(1));
    /// # Ok::<_, sqlite_handle::Error>(())
    /// ```
    #[inline]
    fn column_is_null(&self, index: c_int) -> bool {
        unsafe { ffi::sqlite3_column_type(self.cursor(), index) == ffi::SQLITE_NULL }
    }
}

impl Reader for Statement<'_> {
    #[inline]
    fn cursor(&self) -> *mut ffi::sqlite3_stmt {
        self.as_ptr()
    }
}

impl Reader for Row<'_> {
    #[inline]
    fn cursor(&self) -> *mut ffi::sqlite3_stmt {
        self.as_ptr()
    }
}

/// A null text pointer is returned for NULL, for empty blobs, and when the
/// engine fails to allocate the converted text.
unsafe fn null_or_nomem(
    raw: *mut ffi::sqlite3_stmt,
    index: c_int,
    len: unsafe extern "C" fn(*mut ffi::sqlite3_stmt, c_int) -> c_int,
) -> Result<()> {
    unsafe {
        if ffi::sqlite3_column_type(raw, index) == ffi::SQLITE_NULL || len(raw, index) == 0 {
            return Ok(());
        }
    }

    Err(Error::from_code(Code::NOMEM))
}
