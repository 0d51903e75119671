use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use housing_core::{
    parse_property_address, AddressParser, Analytics, Deduplicator, FieldNormalizer, RawRecord,
    Record,
};

const CITIES: [&str; 4] = ["NASHVILLE", "ANTIOCH", "MADISON", "HERMITAGE"];

fn synthetic_rows(count: u64) -> Vec<RawRecord> {
    let start = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
    (0..count)
        .map(|id| {
            let parcel = format!("{:03} 00 0 {:03}.00", id % 500, id % 97);
            let mut row = RawRecord::new(id, &parcel, start + Duration::days((id % 1400) as i64));
            // Every tenth row is missing its address so the backfill has work to do
            if id % 10 != 0 {
                let city = CITIES[(id % CITIES.len() as u64) as usize];
                row.property_address = Some(format!("{}  ELM ST, {}", 100 + id % 500, city));
            }
            row.sale_price = Some(100_000.0 + (id % 250) as f64 * 1_000.0);
            row.total_value = Some(90_000.0 + (id % 300) as f64 * 500.0);
            row.legal_reference = format!("REF-{}", id % 2_000);
            row.sold_as_vacant = Some(if id % 3 == 0 { "Yes" } else { "No" }.to_string());
            row
        })
        .collect()
}

fn cleaned_rows(count: u64) -> Vec<Record> {
    let (mut records, _) = FieldNormalizer::new().normalize(synthetic_rows(count));
    AddressParser::new().apply(&mut records);
    records
}

fn benchmark_address_parsing(c: &mut Criterion) {
    c.bench_function("parse_property_address", |b| {
        b.iter(|| parse_property_address(black_box("1808  FOX CHASE DR, GOODLETTSVILLE")))
    });
}

fn benchmark_normalize(c: &mut Criterion) {
    let rows = synthetic_rows(20_000);
    c.bench_function("normalize_20k", |b| {
        let normalizer = FieldNormalizer::new();
        b.iter(|| black_box(normalizer.normalize(rows.clone())))
    });
}

fn benchmark_deduplicate(c: &mut Criterion) {
    let records = cleaned_rows(20_000);
    c.bench_function("deduplicate_20k", |b| {
        let deduplicator = Deduplicator::new();
        b.iter(|| black_box(deduplicator.deduplicate(records.clone())))
    });
}

fn benchmark_summarize(c: &mut Criterion) {
    let records = cleaned_rows(20_000);
    c.bench_function("summarize_20k", |b| {
        let analytics = Analytics::default();
        b.iter(|| black_box(analytics.summarize(&records)))
    });
}

criterion_group!(
    benches,
    benchmark_address_parsing,
    benchmark_normalize,
    benchmark_deduplicate,
    benchmark_summarize
);
criterion_main!(benches);
