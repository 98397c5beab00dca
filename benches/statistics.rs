use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use noaa_climate::{annual_records, decade_averages, trend_statistics, SeriesResponse, YearValue};

fn synthetic_series(start: i32, end: i32) -> SeriesResponse {
    SeriesResponse {
        title: Some("Synthetic".to_string()),
        base_period: Some("1901-2000".to_string()),
        series: (start..=end)
            .map(|year| {
                let t = (year - start) as f64;
                (year, YearValue::new(Some(30.0 + (t * 0.7).sin()), Some(t * 0.01 - 0.5)))
            })
            .collect(),
    }
}

fn bench_statistics(c: &mut Criterion) {
    let series = synthetic_series(1850, 2024);
    c.bench_function("trend_statistics", |b| {
        b.iter(|| trend_statistics(black_box(&series.series)))
    });

    let Some(now) = NaiveDate::from_ymd_opt(2024, 6, 1).and_then(|d| d.and_hms_opt(0, 0, 0)) else {
        return;
    };
    let annual = annual_records(&synthetic_series(1895, 2024), Some(&series), now);
    c.bench_function("decade_averages", |b| {
        b.iter(|| decade_averages(black_box(&annual), now))
    });
}

criterion_group!(benches, bench_statistics);
criterion_main!(benches);
