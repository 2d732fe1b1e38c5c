use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use catalogview::report::correlation::{correlation_matrix, CORRELATION_COLUMNS};
use catalogview::*;

const CATEGORIES: [&str; 6] = [
    "Computers&Accessories|Cables|USBCables",
    "Electronics|Mobiles|Smartphones",
    "Electronics|HomeTheater|Televisions",
    "Home&Kitchen|Kitchen|Kettles",
    "OfficeProducts|Pens",
    "Toys|Puzzles",
];

fn catalog_csv(rows: usize) -> String {
    let mut csv = String::from(
        "product_id,category,discounted_price,actual_price,discount_percentage,rating,rating_count\n",
    );
    for i in 0..rows {
        let actual = 100 + (i * 37) % 25_000;
        let pct = (i * 7) % 90;
        let discounted = actual * (100 - pct) / 100;
        let rating = if i % 97 == 0 {
            "|".to_string()
        } else {
            format!("{:.1}", 2.0 + (i % 30) as f64 / 10.0)
        };
        csv.push_str(&format!(
            "P{:06},{},₹{},\"₹{},{:03}\",{}%,{},\"{},{:03}\"\n",
            i,
            CATEGORIES[i % CATEGORIES.len()],
            discounted,
            actual / 1000,
            actual % 1000,
            pct,
            rating,
            1 + i % 40,
            (i * 13) % 1000,
        ));
    }
    csv
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for size in [100, 1000, 10000].iter() {
        let csv = catalog_csv(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &csv, |b, csv| {
            b.iter(|| pipeline::ingest(black_box(csv.as_bytes())).unwrap());
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for size in [100, 1000, 10000].iter() {
        let table = pipeline::ingest(catalog_csv(*size).as_bytes()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| normalize(black_box(table)).unwrap());
        });
    }
    group.finish();
}

fn bench_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation");

    for size in [100, 1000, 10000].iter() {
        let prepared = pipeline::prepare(catalog_csv(*size).as_bytes(), &DashboardConfig::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &prepared.table, |b, table| {
            b.iter(|| correlation_matrix(black_box(table), &CORRELATION_COLUMNS));
        });
    }
    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    let filter = CategoryFilter::new(["Smartphones", "Kettles"]);
    let config = DashboardConfig::default();

    for size in [100, 1000, 10000].iter() {
        let csv = catalog_csv(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &csv, |b, csv| {
            b.iter(|| {
                let dashboard = pipeline::run(black_box(csv.as_bytes()), &filter, &config).unwrap();
                render::render_dashboard(&dashboard).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ingest,
    bench_normalize,
    bench_correlation,
    bench_full_run
);
criterion_main!(benches);
