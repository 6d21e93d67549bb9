// Benches copied from https://github.com/stainless-steel/sqlite under the MIT
// license.

use criterion::Criterion;
use sqlite_handle::{Connection, Reader, Transient};

criterion::criterion_group!(
    benches,
    read_statement,
    read_rows,
    write_statement,
    write_transient_text
);
criterion::criterion_main!(benches);

fn read_statement(bencher: &mut Criterion) {
    let c = create();
    populate(&c, 100);

    let mut statement = c
        .prepare("SELECT a, b FROM data WHERE a > ? AND b > ?")
        .unwrap();

    bencher.bench_function("read_statement", |b| {
        b.iter(|| {
            statement.reset((42, 42)).unwrap();

            while statement.execute().unwrap() {
                assert!(statement.column_int(0) > 42);
                assert!(statement.column_int(1) > 42);
            }
        });
    });
}

fn read_rows(bencher: &mut Criterion) {
    let c = create();
    populate(&c, 100);

    let mut statement = c.prepare("SELECT a, d FROM data WHERE a > ?").unwrap();

    bencher.bench_function("read_rows", |b| {
        b.iter(|| {
            statement.reset((42,)).unwrap();

            statement
                .rows()
                .unwrap()
                .for_each(|row| {
                    assert!(row.column_int(0) > 42);
                    assert!(!row.column_text(1)?.is_empty());
                    Ok(())
                })
                .unwrap();
        });
    });
}

fn write_statement(bencher: &mut Criterion) {
    let c = create();
    let mut statement = c
        .prepare("INSERT INTO data (a, b, c, d) VALUES (?, ?, ?, ?)")
        .unwrap();

    bencher.bench_function("write_statement", |b| {
        b.iter(|| {
            statement.reset((42, 42, 42, "forty-two")).unwrap();
            assert!(!statement.execute().unwrap());
        });
    });
}

fn write_transient_text(bencher: &mut Criterion) {
    let c = create();
    let mut statement = c.prepare("INSERT INTO data (d) VALUES (?)").unwrap();

    bencher.bench_function("write_transient_text", |b| {
        b.iter(|| {
            let text = String::from("forty-two");
            statement.reset((Transient(text.as_str()),)).unwrap();
            assert!(!statement.execute().unwrap());
        });
    });
}

fn create() -> Connection {
    let c = Connection::memory().unwrap();
    c.execute_batch("CREATE TABLE data (a INTEGER, b INTEGER, c INTEGER, d TEXT)")
        .unwrap();
    c
}

fn populate(c: &Connection, count: i64) {
    let mut statement = c
        .prepare("INSERT INTO data (a, b, c, d) VALUES (?, ?, ?, ?)")
        .unwrap();

    for i in 0..count {
        statement.reset((i, i, i, format!("value {i}"))).unwrap();
        assert!(!statement.execute().unwrap());
    }
}
