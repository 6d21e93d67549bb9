use alloc::vec::Vec;

use anyhow::{Context, Result};

use crate::{Code, Connection, Reader, Statement, Transient};

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

#[test]
fn wide_memory_opens() -> Result<()> {
    let c = Connection::wide_memory()?;
    assert!(c.is_open());

    let mut c = Connection::new();
    c.open_wide(&wide(":memory:"))?;
    assert!(c.is_open());
    Ok(())
}

#[test]
fn wide_open_rejects_interior_nul() -> Result<()> {
    let mut c = Connection::new();
    let e = c.open_wide(&[b'a' as u16, 0, b'b' as u16]).unwrap_err();
    assert_eq!(e.code(), Code::MISUSE);
    assert!(!c.is_open());
    Ok(())
}

#[test]
fn wide_text_round_trip() -> Result<()> {
    let c = Connection::memory()?;
    let text = wide("Grüße, 世界 🦀");

    let mut stmt = c.prepare("SELECT ?")?;
    stmt.bind_value(1, &text[..])?;

    assert!(stmt.execute()?);
    assert_eq!(stmt.column_wide_text(0)?, &text[..]);
    assert_eq!(stmt.column_wide_text_len(0), text.len());
    Ok(())
}

#[test]
fn wide_text_reads_narrow() -> Result<()> {
    let c = Connection::wide_memory()?;

    let mut stmt = c.prepare("SELECT ?")?;
    stmt.bind_value(1, wide("Grüße"))?;

    assert!(stmt.execute()?);
    assert_eq!(stmt.column_text(0)?, "Grüße");
    assert_eq!(stmt.column_text_len(0), "Grüße".len());
    assert_eq!(stmt.column_wide_text_len(0), 5);
    Ok(())
}

#[test]
fn wide_transient_outlives_source() -> Result<()> {
    let c = Connection::memory()?;
    let mut stmt = c.prepare("SELECT ?")?;

    {
        let text = wide("Bob");
        stmt.bind_value(1, Transient(&text[..]))?;
    }

    assert!(stmt.execute()?);
    assert_eq!(stmt.column_text(0)?, "Bob");
    Ok(())
}

#[test]
fn wide_prepare() -> Result<()> {
    let c = Connection::memory()?;
    c.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1), (2);")?;

    let sql = wide("SELECT SUM(x) FROM t WHERE x >= ?");

    let mut stmt = Statement::empty();
    stmt.prepare_wide(&c, &sql, (1,))?;
    assert!(stmt.execute()?);
    assert_eq!(stmt.column_int(0), 3);

    let e = stmt.prepare_wide(&c, &wide("SELEKT 1"), ()).unwrap_err();
    assert_eq!(e.code(), Code::ERROR);
    assert!(!stmt.is_prepared());
    Ok(())
}

#[test]
fn wide_null_is_empty() -> Result<()> {
    let c = Connection::memory()?;
    let mut stmt = c.prepare("SELECT NULL")?;

    assert!(stmt.execute()?);
    assert!(stmt.column_wide_text(0)?.is_empty());
    assert_eq!(stmt.column_wide_text_len(0), 0);
    Ok(())
}

#[test]
fn failed_wide_open_keeps_previous_connection() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing").join("database.sqlite3");
    let missing = wide(missing.to_str().context("path is not utf-8")?);

    let mut c = Connection::memory()?;
    c.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")?;
    let before = c.as_ptr();

    let e = c.open_wide(&missing).unwrap_err();
    assert_eq!(e.code().primary(), Code::CANTOPEN);
    assert!(c.is_open());
    assert_eq!(c.as_ptr(), before);

    let mut stmt = c.prepare("SELECT x FROM t")?;
    assert!(stmt.execute()?);
    assert_eq!(stmt.column_int(0), 1);
    Ok(())
}
