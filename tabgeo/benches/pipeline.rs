//! Benchmarks construction + encodage

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabgeo::{assign, build, encode, BuildOptions, Crs, GeometryMode, RecordSet, Value};

fn xy_table(rows: usize) -> RecordSet {
    let mut table = RecordSet::new(["id", "lon", "lat", "name"]);
    for i in 0..rows {
        let lon = if i % 50 == 0 {
            Value::Text("n/a".to_string())
        } else {
            Value::Text(format!("{:.6}", 5.0 + (i % 600) as f64 / 100.0))
        };
        table.push_row(vec![
            Value::Integer(i as i64),
            lon,
            Value::Text(format!("{:.6}", 45.5 + (i % 250) as f64 / 100.0)),
            Value::Text(format!("site {}", i)),
        ]);
    }
    table
}

fn wkt_table(rows: usize) -> RecordSet {
    let mut table = RecordSet::new(["id", "wkt"]);
    for i in 0..rows {
        let x = (i % 100) as f64;
        table.push_row(vec![
            Value::Integer(i as i64),
            Value::Text(format!(
                "POLYGON(({x} 0,{x} 1,{} 1,{} 0,{x} 0))",
                x + 1.0,
                x + 1.0
            )),
        ]);
    }
    table
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for rows in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(rows as u64));

        let xy = xy_table(rows);
        let mode = GeometryMode::xy("lon", "lat");
        group.bench_with_input(BenchmarkId::new("xy", rows), &xy, |b, table| {
            b.iter(|| build(black_box(table), &mode, BuildOptions::default()).unwrap())
        });

        let wkt = wkt_table(rows);
        let mode = GeometryMode::wkt("wkt");
        group.bench_with_input(BenchmarkId::new("wkt", rows), &wkt, |b, table| {
            b.iter(|| build(black_box(table), &mode, BuildOptions::default()).unwrap())
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let table = xy_table(10_000);
    let built = build(&table, &GeometryMode::xy("lon", "lat"), BuildOptions::default()).unwrap();
    let collection = assign(built.collection, Crs::WGS84);

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(collection.len() as u64));
    group.bench_function("points_10k", |b| {
        b.iter(|| encode(black_box(&collection)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_encode);
criterion_main!(benches);
