use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgcopy_columnar::batch::{Column, ColumnValues};
use pgcopy_columnar::codec::{decode_pgcopy, encode_pgcopy_into};
use pgcopy_columnar::schema::PgType;

fn make_trades_columns(rows: usize) -> (Vec<Column>, Vec<PgType>) {
    let mut ids = Vec::with_capacity(rows);
    let mut prices = Vec::with_capacity(rows);
    let mut qtys = Vec::with_capacity(rows);
    let mut sides = Vec::with_capacity(rows);
    let mut side_mask = Vec::with_capacity(rows);
    let mut stamps = Vec::with_capacity(rows);

    for i in 0..rows {
        ids.push(1_000_000 + i as i64);
        prices.push(10_000.0 + i as f64 * 0.25);
        qtys.push(0.125 * ((i % 17) as f64 + 1.0));
        if i % 9 == 4 {
            sides.push(String::new());
            side_mask.push(false);
        } else {
            sides.push(if i % 2 == 0 { "buy" } else { "sell" }.to_string());
            side_mask.push(true);
        }
        stamps.push(1_600_000_000_000_000 + i as i64 * 60_000_000);
    }

    let columns = vec![
        Column {
            values: ColumnValues::Int64(ids),
            mask: vec![true; rows],
        },
        Column {
            values: ColumnValues::Float64(prices),
            mask: vec![true; rows],
        },
        Column {
            values: ColumnValues::Float64(qtys),
            mask: vec![true; rows],
        },
        Column {
            values: ColumnValues::Text(sides),
            mask: side_mask,
        },
        Column {
            values: ColumnValues::Timestamp(stamps),
            mask: vec![true; rows],
        },
    ];
    let types = vec![
        PgType::Int64,
        PgType::Float64,
        PgType::Float64,
        PgType::Text,
        PgType::Timestamp,
    ];
    (columns, types)
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("pgcopy_decode");
    for rows in [1_000usize, 10_000, 100_000] {
        let (columns, types) = make_trades_columns(rows);
        let mut encoded = Vec::new();
        encode_pgcopy_into(&columns, &mut encoded).unwrap();

        group.throughput(criterion::Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &encoded, |b, encoded| {
            b.iter(|| decode_pgcopy(black_box(encoded), black_box(&types)).unwrap());
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("pgcopy_encode");
    for rows in [1_000usize, 10_000, 100_000] {
        let (columns, _) = make_trades_columns(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &columns, |b, columns| {
            b.iter(|| {
                let mut out = Vec::new();
                encode_pgcopy_into(black_box(columns), &mut out).unwrap();
                out
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
