use std::io::{self, Write};
use std::time::Instant;

use sqlite_handle::{OpenOptions, Reader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let conn = OpenOptions::new()
        .create()
        .read_write()
        .no_mutex()
        .open_in_memory()?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS persons (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    )?;

    conn.execute(
        "INSERT INTO persons (name) VALUES (?1), (?2), (?3)",
        ("Steven", "John", "Alex"),
    )?;

    let mut stmt = conn.prepare("SELECT id, name FROM persons")?;

    let mut o = io::sink();

    let start = Instant::now();
    let mut c = 0;

    for _ in 0..100_000 {
        stmt.reset(())?;

        writeln!(o, "Found persons:")?;

        let mut rows = stmt.rows()?;

        while let Some(mut p) = rows.next()? {
            c += 1;
            let id = p.column_int(0);
            writeln!(o, "ID: {id}, Name: {}", p.column_text(1)?)?;
        }
    }

    println!("Elapsed: {:?}", start.elapsed());
    println!("Total persons found: {c}");
    Ok(())
}
