//! Criterion benchmarks for table scans behind the chart views.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use popmap::data::{CountryShape, PopulationTable};
use popmap::map::{render_choropleth, ColorScale, RenderOptions, Viewport, PALETTE};
use popmap::series::{aggregate, country_series};

/// World Bank sized table: `countries` rows, 1960-2023, every tenth cell blank
fn make_table(countries: usize) -> PopulationTable {
    let mut csv = String::from("Country Name,Country Code");
    for year in 1960..2024 {
        csv.push_str(&format!(",{year}"));
    }
    csv.push('\n');
    for c in 0..countries {
        csv.push_str(&format!("Country {c},C{c:02}"));
        for (i, year) in (1960..2024).enumerate() {
            if (c + i) % 10 == 0 {
                csv.push(',');
            } else {
                csv.push_str(&format!(",{}", 1_000_000 + c * 1_000 + year));
            }
        }
        csv.push('\n');
    }
    PopulationTable::from_reader(csv.as_bytes()).expect("synthetic table parses")
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for countries in [50, 266, 1000] {
        let table = make_table(countries);
        group.throughput(Throughput::Elements((countries * 64) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(countries), &table, |b, table| {
            b.iter(|| black_box(aggregate(table, 1960..=2023)))
        });
    }
    group.finish();
}

fn bench_country_series(c: &mut Criterion) {
    let table = make_table(266);
    let mut group = c.benchmark_group("country_series");
    group.bench_function("by_name_last_row", |b| {
        b.iter(|| black_box(country_series(&table, black_box("country 265"), "bench")))
    });
    group.bench_function("by_code", |b| {
        b.iter(|| black_box(country_series(&table, black_box("c130"), "bench")))
    });
    group.finish();
}

fn bench_choropleth(c: &mut Criterion) {
    // Grid of 10x10 degree squares covering the map
    let mut shapes = Vec::new();
    for lon in (-180..180).step_by(10) {
        for lat in (-60..80).step_by(10) {
            let (x, y) = (f64::from(lon), f64::from(lat));
            let ring = vec![(x, y), (x + 10.0, y), (x + 10.0, y + 10.0), (x, y + 10.0), (x, y)];
            shapes.push(CountryShape::new(format!("{lon}/{lat}"), None, vec![vec![ring]]));
        }
    }
    let values: Vec<f64> = (0..shapes.len()).map(|i| 10f64.powi((i % 9) as i32)).collect();
    let scale = ColorScale::fit(values.iter().copied(), PALETTE.len());
    let buckets: Vec<Option<usize>> = values.iter().map(|&v| scale.bucket(v)).collect();
    let options = RenderOptions {
        show_borders: true,
        highlight: Some(0),
    };

    c.bench_function("render_choropleth_200x50", |b| {
        let viewport = Viewport::world(400, 200);
        b.iter(|| black_box(render_choropleth(&shapes, &buckets, PALETTE.len(), &options, 200, 50, &viewport)))
    });
}

criterion_group!(benches, bench_aggregate, bench_country_series, bench_choropleth);
criterion_main!(benches);
