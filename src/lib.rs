//! Thin, owning handles for [SQLite] connections and prepared statements.
//!
//! <br>
//!
//! ## Usage
//!
//! A [`Connection`] owns one database connection and a [`Statement`] owns one
//! prepared statement compiled against it. Both close their resource when
//! dropped, and both are built on the same [`UniqueHandle`] which can only
//! be moved and never copied.
//!
//! Values are bound positionally with [`Statement::bind_value`], or all at
//! once from a tuple through [`Bind`]. Stepping through results is done
//! either by calling [`Statement::execute`] directly and reading columns off
//! the statement, or through the lending iteration returned by
//! [`Statement::rows`]. Columns are read through the [`Reader`] trait in
//! both cases.
//!
//! Every failure reported by the engine is captured as an [`Error`] holding
//! the extended result code and message of the connection, right at the call
//! which failed.
//!
//! <br>
//!
//! #### Connecting and querying
//!
//! ```
//! use sqlite_handle::{Connection, Reader};
//!
//! let c = Connection::memory()?;
//!
//! c.execute_batch(r#"
//!     CREATE TABLE users (name TEXT, age INTEGER);
//!
//!     INSERT INTO users VALUES ('Alice', 42);
//!     INSERT INTO users VALUES ('Bob', 52);
//! "#)?;
//!
//! let mut stmt = c.prepare("SELECT name, age FROM users ORDER BY age")?;
//! let mut results = Vec::new();
//!
//! stmt.rows()?.for_each(|row| {
//!     results.push((row.column_text(0)?.to_owned(), row.column_int(1)));
//!     Ok(())
//! })?;
//!
//! assert_eq!(results, [("Alice".to_owned(), 42), ("Bob".to_owned(), 52)]);
//! # Ok::<_, sqlite_handle::Error>(())
//! ```
//!
//! <br>
//!
//! #### Reusing prepared statements
//!
//! Preparing a statement is expensive. A statement can be stepped to its
//! end, rewound with [`Statement::reset`] and bound to new values as many
//! times as needed.
//!
//! ```
//! use sqlite_handle::{Connection, Reader};
//!
//! let c = Connection::memory()?;
//! c.execute_batch("CREATE TABLE t (x INTEGER)")?;
//!
//! let mut insert = c.prepare("INSERT INTO t VALUES (?)")?;
//!
//! for x in 1..=3 {
//!     insert.reset((x,))?;
//!     assert!(!insert.execute()?);
//! }
//!
//! let mut count = c.prepare("SELECT COUNT(*) FROM t")?;
//! assert!(count.execute()?);
//! assert_eq!(count.column_int(0), 3);
//! # Ok::<_, sqlite_handle::Error>(())
//! ```
//!
//! <br>
//!
//! ## Features
//!
//! * `std` - Enables opening connections by [`Path`]. Enabled by default.
//! * `bundled` - Build and link the bundled copy of SQLite. Enabled by
//!   default.
//! * `threadsafe` - Build SQLite in serialized mode, which makes
//!   [`Connection`] `Send`. Enabled by default.
//!
//! [`Path`]: https://doc.rust-lang.org/std/path/struct.Path.html
//! [SQLite]: https://www.sqlite.org

#![no_std]
#![warn(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(not(feature = "alloc"))]
compile_error!("The `alloc` feature must be enabled to use this crate.");

#[cfg(test)]
mod tests;

mod bind;
mod bind_value;
mod bytes;
mod connection;
mod error;
mod ffi;
mod handle;
mod open_options;
mod reader;
mod row;
mod statement;
mod utils;

#[doc(inline)]
pub use self::bind::{BIND_INDEX, Bind};
#[doc(inline)]
pub use self::bind_value::{BindValue, Null, Transient};
#[doc(inline)]
pub use self::connection::Connection;
#[doc(inline)]
pub use self::error::{Code, Error, Result};
#[doc(inline)]
pub use self::handle::{ConnectionKind, Kind, StatementKind, UniqueHandle};
#[doc(inline)]
pub use self::open_options::OpenOptions;
#[doc(inline)]
pub use self::reader::Reader;
#[doc(inline)]
pub use self::row::{Row, Rows};
#[doc(inline)]
pub use self::statement::Statement;
