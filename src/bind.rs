use core::ffi::{CStr, c_int};

use alloc::string::String;
use alloc::vec::Vec;

use crate::bind_value::{BindValue, Null, Transient};
use crate::error::Result;
use crate::statement::Statement;

/// The first index used when binding parameters into a [`Statement`].
pub const BIND_INDEX: c_int = 1;

/// A collection of values bound positionally into a [`Statement`], starting
/// at [`BIND_INDEX`].
///
/// This is implemented for `()` which binds nothing, for tuples of
/// [`BindValue`] types, and for every single [`BindValue`] type.
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
///
///     INSERT INTO users VALUES ('Alice', 42);
///     INSERT INTO users VALUES ('Bob', 72);
/// "#)?;
///
/// let mut stmt = c.prepare("SELECT age FROM users WHERE name = ? AND age = ?")?;
/// stmt.bind_all(("Bob", 72))?;
///
/// assert!(stmt.execute()?);
/// assert_eq!(stmt.column_int(0), 72);
/// assert!(!stmt.execute()?);
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
pub trait Bind<'a> {
    /// Bind these values into the given [`Statement`].
    fn bind(self, stmt: &mut Statement<'a>) -> Result<()>;
}

/// Binding `()` leaves the statement's parameters untouched.
///
/// # Examples
///
/// ```
/// use sqlite_handle::Connection;
///
/// let c = Connection::memory()?;
/// c.execute_batch("CREATE TABLE config (key TEXT, value TEXT)")?;
///
/// let mut insert = c.prepare("INSERT INTO config VALUES ('version', '1.0.0')")?;
/// insert.bind_all(())?;
/// assert!(!insert.execute()?);
/// # Ok::<_, sqlite_handle::Error>(())
/// ```
impl<'a> Bind<'a> for () {
    #[inline]
    fn bind(self, _: &mut Statement<'a>) -> Result<()> {
        Ok(())
    }
}

macro_rules! implement_single {
    ($lt:lifetime => $($ty:ty),* $(,)?) => {
        $(
            impl<'a, $lt> Bind<'a> for $ty
            where
                $lt: 'a,
            {
                #[inline]
                fn bind(self, stmt: &mut Statement<'a>) -> Result<()> {
                    self.bind_value(stmt, BIND_INDEX)
                }
            }
        )*
    };
}

implement_single! {
    'b =>
    &'b str,
    &'b String,
    &'b CStr,
    &'b [u16],
    &'b Vec<u16>,
    Transient<&'b str>,
    Transient<&'b [u16]>,
}

macro_rules! implement_owned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'a> Bind<'a> for $ty {
                #[inline]
                fn bind(self, stmt: &mut Statement<'a>) -> Result<()> {
                    self.bind_value(stmt, BIND_INDEX)
                }
            }
        )*
    };
}

implement_owned!(i64, i32, Null, String, Vec<u16>);

/// A single optional value.
impl<'a, T> Bind<'a> for Option<T>
where
    T: BindValue<'a>,
{
    #[inline]
    fn bind(self, stmt: &mut Statement<'a>) -> Result<()> {
        self.bind_value(stmt, BIND_INDEX)
    }
}

macro_rules! implement_tuple {
    ($($ty:ident $var:ident),+) => {
        /// Tuples bind their elements one after another, starting at
        /// [`BIND_INDEX`].
        impl<'a, $($ty,)+> Bind<'a> for ($($ty,)+)
        where
            $($ty: BindValue<'a>,)+
        {
            #[inline]
            fn bind(self, stmt: &mut Statement<'a>) -> Result<()> {
                let ($($var,)+) = self;
                let mut index = BIND_INDEX;

                $(
                    $var.bind_value(stmt, index)?;
                    index += 1;
                )+

                let _ = index;
                Ok(())
            }
        }
    };
}

implement_tuple!(A a);
implement_tuple!(A a, B b);
implement_tuple!(A a, B b, C c);
implement_tuple!(A a, B b, C c, D d);
implement_tuple!(A a, B b, C c, D d, E e);
implement_tuple!(A a, B b, C c, D d, E e, F f);
implement_tuple!(A a, B b, C c, D d, E e, F f, G g);
implement_tuple!(A a, B b, C c, D d, E e, F f, G g, H h);
