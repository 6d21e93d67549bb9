use core::ffi::{CStr, c_int};

use alloc::string::String;
use alloc::vec::Vec;

use crate::bytes;
use crate::error::Result;
use crate::ffi::{self, sqlite3_try};
use crate::statement::Statement;

/// A marker type representing a NULL value.
///
/// # Examples
///
/// ```
/// use sqlite_handle::{Connection, Null, Reader};
///
/// let c = Connection::memory()?;
///
/// let mut stmt = c.prepare("SELECT ? IS NULL")?;
/// stmt.bind_value(1, Null)?;
///
/// assert!(stmt.execute()?);
/// assert_eq!(stmt.column_int(0), 1);
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Null;

/// Text which is copied by the engine when bound, so that it does not need to
/// outlive the statement.
///
/// Borrowed text such as `&str` is otherwise bound by reference and must
/// remain alive for as long as the statement may be stepped.
///
/// # Examples
///
/// ```
/// use sqlite_handle::{Connection, Reader, Statement, Transient};
///
/// let c = Connection::memory()?;
/// let mut stmt = c.prepare("SELECT ?")?;
///
/// {
///     let name = String::from("Alice");
///     stmt.bind_value(1, Transient(name.as_str()))?;
/// }
///
/// assert!(stmt.execute()?);
/// assert_eq!(stmt.column_text(0)?, "Alice");
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transient<T>(pub T);

/// A value which can be bound to a single parameter of a [`Statement`].
///
/// The lifetime `'a` is the lifetime of the statement's connection. Values
/// bound by reference must live at least that long.
pub trait BindValue<'a> {
    /// Bind this value to the parameter at `index`, where the first parameter
    /// has index `1`.
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()>;
}

impl<'a> BindValue<'a> for i64 {
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        let raw = stmt.prepared()?;

        unsafe {
            sqlite3_try!(stmt.db(), ffi::sqlite3_bind_int64(raw, index, self));
        }

        Ok(())
    }
}

impl<'a> BindValue<'a> for i32 {
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        i64::from(self).bind_value(stmt, index)
    }
}

impl<'a> BindValue<'a> for Null {
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        let raw = stmt.prepared()?;

        unsafe {
            sqlite3_try!(stmt.db(), ffi::sqlite3_bind_null(raw, index));
        }

        Ok(())
    }
}

/// `None` binds NULL.
///
/// # Examples
///
/// ```
/// use sqlite_handle::{Connection, Reader};
///
/// let c = Connection::memory()?;
/// let mut stmt = c.prepare("SELECT ?, ?")?;
///
/// stmt.bind_all((Some(1), None::<i64>))?;
///
/// assert!(stmt.execute()?);
/// assert!(!stmt.column_is_null(0));
/// assert!(stmt.column_is_null(1));
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
impl<'a, T> BindValue<'a> for Option<T>
where
    T: BindValue<'a>,
{
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        match self {
            Some(value) => value.bind_value(stmt, index),
            None => Null.bind_value(stmt, index),
        }
    }
}

/// Text is bound by reference with an explicit length.
impl<'a, 'b> BindValue<'a> for &'b str
where
    'b: 'a,
{
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        let len = bytes::byte_len(self.len())?;
        bind_text(stmt, index, self.as_ptr().cast(), len, None)
    }
}

impl<'a, 'b> BindValue<'a> for &'b String
where
    'b: 'a,
{
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        self.as_str().bind_value(stmt, index)
    }
}

/// A c-string is bound by reference and the engine determines its length
/// from its terminator.
///
/// # Examples
///
/// ```
/// use sqlite_handle::{Connection, Reader};
///
/// let c = Connection::memory()?;
/// let mut stmt = c.prepare("SELECT length(?)")?;
///
/// stmt.bind_value(1, c"Alice")?;
///
/// assert!(stmt.execute()?);
/// assert_eq!(stmt.column_int(0), 5);
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
impl<'a, 'b> BindValue<'a> for &'b CStr
where
    'b: 'a,
{
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        bind_text(stmt, index, self.as_ptr(), -1, None)
    }
}

/// Native-endian UTF-16 text, bound by reference.
///
/// # Examples
///
/// ```
/// use sqlite_handle::{Connection, Reader};
///
/// let c = Connection::memory()?;
/// let name = "Bob".encode_utf16().collect::<Vec<u16>>();
///
/// let mut stmt = c.prepare("SELECT ?")?;
/// stmt.bind_value(1, &name[..])?;
///
/// assert!(stmt.execute()?);
/// assert_eq!(stmt.column_text(0)?, "Bob");
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
impl<'a, 'b> BindValue<'a> for &'b [u16]
where
    'b: 'a,
{
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        let bytes = bytes::wide_as_bytes(self);
        let len = bytes::byte_len(bytes.len())?;
        bind_wide_text(stmt, index, bytes.as_ptr(), len, None)
    }
}

impl<'a, 'b> BindValue<'a> for &'b Vec<u16>
where
    'b: 'a,
{
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        self.as_slice().bind_value(stmt, index)
    }
}

/// Owned text is copied into memory which the engine releases.
impl<'a> BindValue<'a> for String {
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        Transient(self.as_str()).bind_value(stmt, index)
    }
}

/// Owned UTF-16 text is copied into memory which the engine releases.
impl<'a> BindValue<'a> for Vec<u16> {
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        Transient(self.as_slice()).bind_value(stmt, index)
    }
}

impl<'a> BindValue<'a> for Transient<&str> {
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        let (ptr, len, dealloc) = bytes::alloc(self.0.as_bytes())?;
        bind_text(stmt, index, ptr.cast_const().cast(), len, dealloc)
    }
}

impl<'a> BindValue<'a> for Transient<&[u16]> {
    #[inline]
    fn bind_value(self, stmt: &mut Statement<'a>, index: c_int) -> Result<()> {
        let (ptr, len, dealloc) = bytes::alloc(bytes::wide_as_bytes(self.0))?;
        bind_wide_text(stmt, index, ptr.cast_const().cast(), len, dealloc)
    }
}

fn bind_text(
    stmt: &mut Statement<'_>,
    index: c_int,
    ptr: *const core::ffi::c_char,
    len: c_int,
    dealloc: ffi::Destructor,
) -> Result<()> {
    let raw = match stmt.prepared() {
        Ok(raw) => raw,
        Err(error) => {
            release(ptr.cast(), dealloc);
            return Err(error);
        }
    };

    unsafe {
        sqlite3_try!(
            stmt.db(),
            ffi::sqlite3_bind_text(raw, index, ptr, len, dealloc)
        );
    }

    Ok(())
}

fn bind_wide_text(
    stmt: &mut Statement<'_>,
    index: c_int,
    ptr: *const u8,
    len: c_int,
    dealloc: ffi::Destructor,
) -> Result<()> {
    let raw = match stmt.prepared() {
        Ok(raw) => raw,
        Err(error) => {
            release(ptr, dealloc);
            return Err(error);
        }
    };

    unsafe {
        sqlite3_try!(
            stmt.db(),
            ffi::sqlite3_bind_text16(raw, index, ptr.cast(), len, dealloc)
        );
    }

    Ok(())
}

/// The engine takes ownership of copied text even when binding fails, so it
/// only has to be released here if the engine was never called.
fn release(ptr: *const u8, dealloc: ffi::Destructor) {
    if let Some(dealloc) = dealloc {
        unsafe {
            dealloc(ptr.cast_mut().cast());
        }
    }
}
