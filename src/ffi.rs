use core::ffi::{c_char, c_int, c_void};

pub(crate) use sqll_sys::{
    SQLITE_DONE, SQLITE_NULL, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_EXRESCODE,
    SQLITE_OPEN_FULLMUTEX, SQLITE_OPEN_MEMORY, SQLITE_OPEN_NOMUTEX, SQLITE_OPEN_READONLY,
    SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_bind_int64,
    sqlite3_bind_null, sqlite3_bind_text, sqlite3_changes, sqlite3_close_v2, sqlite3_column_bytes,
    sqlite3_column_count, sqlite3_column_int64, sqlite3_column_text, sqlite3_column_type,
    sqlite3_errmsg, sqlite3_errstr, sqlite3_finalize, sqlite3_last_insert_rowid, sqlite3_open_v2,
    sqlite3_prepare_v3, sqlite3_reset, sqlite3_step, sqlite3_stmt,
};

/// Destructor callback accepted by the text binding functions.
pub(crate) type Destructor = Option<unsafe extern "C" fn(*mut c_void)>;

// Entry points which are exported by the linked library but not covered by
// the generated bindings in `sqll-sys`.
unsafe extern "C" {
    pub(crate) fn sqlite3_db_handle(stmt: *mut sqlite3_stmt) -> *mut sqlite3;

    pub(crate) fn sqlite3_open16(filename: *const c_void, db: *mut *mut sqlite3) -> c_int;

    pub(crate) fn sqlite3_prepare16_v2(
        db: *mut sqlite3,
        sql: *const c_void,
        bytes: c_int,
        stmt: *mut *mut sqlite3_stmt,
        tail: *mut *const c_void,
    ) -> c_int;

    pub(crate) fn sqlite3_bind_text16(
        stmt: *mut sqlite3_stmt,
        index: c_int,
        data: *const c_void,
        bytes: c_int,
        destructor: Destructor,
    ) -> c_int;

    pub(crate) fn sqlite3_column_text16(stmt: *mut sqlite3_stmt, index: c_int) -> *const c_void;

    pub(crate) fn sqlite3_column_bytes16(stmt: *mut sqlite3_stmt, index: c_int) -> c_int;

    pub(crate) fn sqlite3_extended_errcode(db: *mut sqlite3) -> c_int;

    pub(crate) fn sqlite3_exec(
        db: *mut sqlite3,
        sql: *const c_char,
        callback: Option<
            unsafe extern "C" fn(*mut c_void, c_int, *mut *mut c_char, *mut *mut c_char) -> c_int,
        >,
        arg: *mut c_void,
        errmsg: *mut *mut c_char,
    ) -> c_int;
}

/// Helper to evaluate an engine call against a statement or connection.
///
/// On failure the error is read from the connection associated with the first
/// argument before anything else gets a chance to overwrite it.
macro_rules! __sqlite3_try {
    ($db:expr, $expr:expr) => {{
        let code = $expr;

        if code != $crate::ffi::SQLITE_OK {
            return Err($crate::error::Error::from_connection($db));
        }
    }};
}

pub(crate) use __sqlite3_try as sqlite3_try;
