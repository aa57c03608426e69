use criterion::{black_box, criterion_group, criterion_main, Criterion};
use csv2json::{parse_table, to_json, to_records, Output};

fn sample_csv(rows: usize) -> Vec<u8> {
    let mut data = String::from("id,name,city,score\n");
    for i in 0..rows {
        data.push_str(&format!("{i},\"person {i}\",Springfield,{}\n", i % 100));
    }
    data.into_bytes()
}

fn bench_transform(c: &mut Criterion) {
    let data = sample_csv(10_000);

    c.bench_function("parse_table 10k rows", |b| {
        b.iter(|| parse_table(black_box(&data), b',').unwrap())
    });

    let table = parse_table(&data, b',').unwrap();
    c.bench_function("to_records 10k rows", |b| {
        b.iter(|| to_records(black_box(table.clone())))
    });

    let output = Output::Records(to_records(table));
    c.bench_function("to_json 10k records", |b| {
        b.iter(|| to_json(black_box(&output), "", "    ").unwrap())
    });
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
