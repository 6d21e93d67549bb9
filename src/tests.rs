use std::io;
use std::mem;
use std::sync::{Arc, Mutex};

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use anyhow::Result;

use crate::{Code, Connection, Statement};

mod iteration;
mod wide;

#[test]
fn connection_error() -> Result<()> {
    let c = Connection::memory()?;
    let e = c.execute_batch(":)").unwrap_err();
    assert_eq!(e.code(), Code::ERROR);
    assert!(!e.message().is_empty());
    Ok(())
}

#[test]
fn empty_connection_is_misuse() -> Result<()> {
    let c = Connection::new();
    assert!(!c.is_open());
    assert!(c.as_ptr().is_null());
    assert_eq!(c.last_insert_rowid(), 0);
    assert_eq!(c.changes(), 0);

    let e = c.prepare("SELECT 1").unwrap_err();
    assert_eq!(e.code(), Code::MISUSE);

    let e = c.execute_batch("SELECT 1").unwrap_err();
    assert_eq!(e.code(), Code::MISUSE);

    assert_eq!(c.last_error().code(), Code::MISUSE);
    Ok(())
}

#[test]
fn empty_statement_is_misuse() -> Result<()> {
    let mut stmt = Statement::empty();
    assert!(!stmt.is_prepared());

    assert_eq!(stmt.execute().unwrap_err().code(), Code::MISUSE);
    assert_eq!(stmt.reset(()).unwrap_err().code(), Code::MISUSE);
    assert_eq!(stmt.bind_value(1, 42).unwrap_err().code(), Code::MISUSE);
    assert_eq!(
        stmt.bind_value(1, String::from("Bob")).unwrap_err().code(),
        Code::MISUSE
    );
    assert_eq!(stmt.rows().unwrap_err().code(), Code::MISUSE);
    Ok(())
}

#[test]
fn default_is_empty() {
    assert!(!Connection::default().is_open());
    assert!(!Statement::default().is_prepared());
}

#[test]
fn code_display() {
    assert_eq!(Code::ERROR.to_string(), "ERROR");
    assert_eq!(Code::CONSTRAINT_UNIQUE.to_string(), "CONSTRAINT_UNIQUE");
    assert_eq!(Code::CONSTRAINT_UNIQUE.primary(), Code::CONSTRAINT);
    assert_eq!(Code::new(12345).to_string(), "UNKNOWN(12345)");
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn take(&self) -> String {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&mem::take(&mut *buf)).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn failures_are_logged_but_status_queries_are_not() -> Result<()> {
    let capture = Capture::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer({
            let capture = capture.clone();
            move || capture.clone()
        })
        .finish();

    tracing::subscriber::with_default(subscriber, || -> Result<()> {
        let c = Connection::memory()?;

        let last = c.last_error();
        assert_eq!(last.code(), Code::OK);
        assert!(!capture.take().contains("engine call failed"));

        let e = c.prepare("SELECT * FROM missing").unwrap_err();
        assert_eq!(e.code(), Code::ERROR);
        assert_eq!(c.last_error().message(), e.message());

        let logged = capture.take();
        assert_eq!(logged.matches("engine call failed").count(), 1);
        assert!(logged.contains("no such table: missing"));
        Ok(())
    })
}
