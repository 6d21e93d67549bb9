use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use anyhow::Result;

use crate::{Code, Connection, Error, Reader, Rows};

use super::data;

#[test]
fn rows_in_order() -> Result<()> {
    let c = Connection::memory()?;
    data::numbers(&c)?;

    let mut stmt = c.prepare("SELECT x FROM t ORDER BY x")?;
    let mut rows = stmt.rows()?;

    let mut values = Vec::new();

    while let Some(row) = rows.next()? {
        values.push(row.column_int(0));
    }

    assert_eq!(values, [1, 2, 3]);
    assert!(rows.is_end());
    assert!(rows.next()?.is_none());
    Ok(())
}

#[test]
fn rows_explicit_protocol() -> Result<()> {
    let c = Connection::memory()?;
    data::numbers(&c)?;

    let mut stmt = c.prepare("SELECT x FROM t ORDER BY x")?;
    let mut rows = stmt.rows()?;

    for expected in 1..=3 {
        assert!(!rows.is_end());
        let row = rows.current();
        assert_eq!(row.map(|row| row.column_int(0)), Some(expected));
        rows.advance()?;
    }

    assert!(rows.is_end());
    assert!(rows.current().is_none());
    assert!(rows == Rows::end());

    // Advancing past the end stays at the end.
    rows.advance()?;
    assert!(rows.is_end());
    Ok(())
}

#[test]
fn rows_over_empty_result() -> Result<()> {
    let c = Connection::memory()?;
    data::numbers(&c)?;

    let mut stmt = c.prepare("SELECT x FROM t WHERE x > 10")?;
    let mut rows = stmt.rows()?;
    assert!(rows.is_end());
    assert!(rows.next()?.is_none());
    Ok(())
}

#[test]
fn rows_are_single_pass() -> Result<()> {
    let c = Connection::memory()?;
    data::numbers(&c)?;

    let mut stmt = c.prepare("SELECT x FROM t ORDER BY x")?;

    let mut count = 0;
    stmt.rows()?.for_each(|_| {
        count += 1;
        Ok(())
    })?;
    assert_eq!(count, 3);

    stmt.reset(())?;

    let mut values = Vec::new();

    stmt.rows()?.for_each(|row| {
        values.push(row.column_int(0));
        Ok(())
    })?;

    assert_eq!(values, [1, 2, 3]);
    Ok(())
}

#[test]
fn rows_with_text() -> Result<()> {
    let c = Connection::memory()?;
    data::english(&c)?;

    let mut stmt = c.prepare("SELECT value FROM english WHERE value LIKE ? ORDER BY value")?;
    stmt.bind_value(1, "%o%type")?;

    let mut rows = stmt.rows()?;
    let mut values = Vec::<String>::new();

    while let Some(mut row) = rows.next()? {
        values.push(row.column_text(0)?.to_owned());
    }

    assert_eq!(values, ["cerotype", "ozotype", "phenotype", "plastotype"]);
    Ok(())
}

#[test]
fn rows_equality_is_identity() -> Result<()> {
    let c = Connection::memory()?;
    data::numbers(&c)?;

    let mut a = c.prepare("SELECT x FROM t")?;
    let mut b = c.prepare("SELECT x FROM t")?;

    let a = a.rows()?;
    let b = b.rows()?;

    assert!(a != b);
    assert!(a != Rows::end());
    assert!(Rows::end() == Rows::end());
    Ok(())
}

#[test]
fn for_each_stops_at_error() -> Result<()> {
    let c = Connection::memory()?;
    data::numbers(&c)?;

    let mut stmt = c.prepare("SELECT x FROM t ORDER BY x")?;

    let mut seen = Vec::new();

    let e = stmt
        .rows()?
        .for_each(|row| {
            let x = row.column_int(0);
            seen.push(x);

            if x == 2 {
                return Err(Error::new(Code::ABORT, "stop"));
            }

            Ok(())
        })
        .unwrap_err();

    assert_eq!(e.code(), Code::ABORT);
    assert_eq!(seen, [1, 2]);
    Ok(())
}

#[test]
fn failing_step_ends_iteration() -> Result<()> {
    let c = Connection::memory()?;
    c.execute_batch(
        r#"
        CREATE TABLE t (x TEXT);
        INSERT INTO t VALUES ('1'), ('2'), ('x');
        "#,
    )?;

    // The third row is not valid JSON.
    let mut stmt = c.prepare("SELECT json(x) FROM t")?;
    let mut rows = stmt.rows()?;

    assert!(rows.next()?.is_some());
    assert!(rows.next()?.is_some());

    let e = rows.next().unwrap_err();
    assert_eq!(e.code(), Code::ERROR);
    assert!(rows.is_end());
    Ok(())
}

#[test]
fn exhausted_rows_stay_exhausted_until_reset() -> Result<()> {
    let c = Connection::memory()?;
    data::numbers(&c)?;

    let mut stmt = c.prepare("SELECT x FROM t ORDER BY x")?;

    let mut first = Vec::new();

    stmt.rows()?.for_each(|row| {
        first.push(row.column_int(0));
        Ok(())
    })?;

    assert_eq!(first, [1, 2, 3]);

    let mut rows = stmt.rows()?;
    assert!(rows.is_end());
    assert!(rows.next()?.is_none());

    stmt.reset(())?;

    let mut second = Vec::new();

    stmt.rows()?.for_each(|row| {
        second.push(row.column_int(0));
        Ok(())
    })?;

    assert_eq!(second, [1, 2, 3]);
    Ok(())
}
