#![cfg(not(miri))]

use std::path::Path;
use std::thread;

use anyhow::{Context, Result};
use sqlite_handle::{Code, Connection, OpenOptions, Reader};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn setup_users(path: impl AsRef<Path>) -> Result<Connection> {
    let mut c = Connection::new();
    c.open(path)?;

    c.execute_batch(
        r#"
        CREATE TABLE users (id INTEGER, name TEXT);
        INSERT INTO users VALUES (1, 'Alice');
        "#,
    )?;

    Ok(c)
}

fn count_users(c: &Connection) -> Result<i64> {
    let mut stmt = c.prepare("SELECT COUNT(*) FROM users")?;
    assert!(stmt.execute()?);
    Ok(stmt.column_int(0))
}

#[test]
fn open_on_disk() -> Result<()> {
    init_tracing();

    let dir = tempfile::tempdir().context("tempdir")?;
    let path = dir.path().join("database.sqlite3");

    {
        let c = setup_users(&path)?;
        c.execute("INSERT INTO users VALUES (?, ?)", (2, "Bob"))?;
    }

    let mut c = Connection::new();
    c.open(&path)?;
    assert_eq!(count_users(&c)?, 2);
    Ok(())
}

#[test]
fn failed_open_keeps_previous_connection() -> Result<()> {
    init_tracing();

    let dir = tempfile::tempdir().context("tempdir")?;
    let path = dir.path().join("database.sqlite3");

    let mut c = setup_users(&path)?;
    let before = c.as_ptr();

    let e = c
        .open(dir.path().join("missing").join("database.sqlite3"))
        .unwrap_err();

    assert_eq!(e.code().primary(), Code::CANTOPEN);
    assert!(c.is_open());
    assert_eq!(c.as_ptr(), before);
    assert_eq!(count_users(&c)?, 1);
    Ok(())
}

#[test]
fn successful_open_replaces_previous_connection() -> Result<()> {
    let dir = tempfile::tempdir().context("tempdir")?;

    let mut c = setup_users(dir.path().join("first.sqlite3"))?;
    c.open(dir.path().join("second.sqlite3"))?;

    let e = c.prepare("SELECT * FROM users").unwrap_err();
    assert_eq!(e.code(), Code::ERROR);
    assert_eq!(e.message(), "no such table: users");
    Ok(())
}

#[test]
fn open_read_only() -> Result<()> {
    let dir = tempfile::tempdir().context("tempdir")?;
    let path = dir.path().join("database.sqlite3");

    setup_users(&path)?;

    let c = OpenOptions::new().read_only().open(&path)?;
    let e = c
        .execute("INSERT INTO users VALUES (2, 'Bob')", ())
        .unwrap_err();

    assert_eq!(e.code(), Code::READONLY);
    assert_eq!(count_users(&c)?, 1);
    Ok(())
}

#[test]
fn open_missing_read_only() -> Result<()> {
    let dir = tempfile::tempdir().context("tempdir")?;
    let path = dir.path().join("missing.sqlite3");

    let e = OpenOptions::new().read_only().open(&path).unwrap_err();
    assert_eq!(e.code().primary(), Code::CANTOPEN);
    assert!(!path.exists());
    Ok(())
}

#[test]
fn open_wide_on_disk() -> Result<()> {
    let dir = tempfile::tempdir().context("tempdir")?;
    let path = dir.path().join("wide.sqlite3");
    let name = path
        .to_str()
        .context("path is not utf-8")?
        .encode_utf16()
        .collect::<Vec<u16>>();

    let mut c = Connection::new();
    c.open_wide(&name)?;
    c.execute_batch("CREATE TABLE t (x TEXT); INSERT INTO t VALUES ('Grüße');")?;
    drop(c);

    let mut c = Connection::new();
    c.open(&path)?;

    let mut stmt = c.prepare("SELECT x FROM t")?;
    assert!(stmt.execute()?);
    assert_eq!(stmt.column_text(0)?, "Grüße");
    Ok(())
}

#[cfg(feature = "threadsafe")]
#[test]
fn connection_is_send() -> Result<()> {
    let dir = tempfile::tempdir().context("tempdir")?;
    let path = dir.path().join("database.sqlite3");

    let c = setup_users(&path)?;

    let handle = thread::spawn(move || -> Result<i64> {
        c.execute("INSERT INTO users VALUES (?, ?)", (2, "Bob"))?;
        count_users(&c)
    });

    let count = handle
        .join()
        .map_err(|_| anyhow::anyhow!("thread panicked"))??;
    assert_eq!(count, 2);
    Ok(())
}

#[test]
fn connections_on_threads() -> Result<()> {
    let mut guards = Vec::new();

    for n in 0..8i64 {
        guards.push(thread::spawn(move || -> Result<i64> {
            let c = Connection::memory()?;
            let mut stmt = c.prepare("SELECT ? * 2")?;
            stmt.bind_value(1, n)?;
            assert!(stmt.execute()?);
            Ok(stmt.column_int(0))
        }));
    }

    for (n, guard) in guards.into_iter().enumerate() {
        let value = guard
            .join()
            .map_err(|_| anyhow::anyhow!("thread panicked"))??;
        assert_eq!(value, n as i64 * 2);
    }

    Ok(())
}
