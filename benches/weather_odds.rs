use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weather_odds::{
    DailyRecord, EngineConfig, LatLon, ProbabilityEngine, RecordSeries, RecordStore, ReportRequest,
    StoreHandle,
};

const LOCATION: LatLon = LatLon(52.1, 5.18);

// 20 years of daily records with a seasonal cycle and a slow warming drift.
fn synthetic_series() -> RecordSeries {
    let mut records = Vec::new();
    let mut date = NaiveDate::from_ymd_opt(2004, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let mut i = 0u32;
    while date <= end {
        let phase = f64::from(i % 365) / 365.0 * std::f64::consts::TAU;
        let drift = f64::from(i) / 3650.0;
        let t_max = 14.0 - 12.0 * phase.cos() + drift + f64::from(i % 7);
        records.push(
            DailyRecord::builder()
                .date(date)
                .temp_max(t_max)
                .temp_min(t_max - 9.0)
                .precipitation(f64::from(i % 11) * 1.7)
                .wind_speed(8.0 + f64::from(i % 13) * 1.5)
                .relative_humidity(45.0 + f64::from(i % 40))
                .build(),
        );
        date = date.succ_opt().unwrap();
        i += 1;
    }
    RecordSeries::from_records(records).unwrap()
}

fn bench_reports(c: &mut Criterion) {
    let mut builder = RecordStore::builder();
    builder.insert("synthetic", LOCATION, synthetic_series()).unwrap();
    let engine = ProbabilityEngine::new(StoreHandle::new(builder.build()), EngineConfig::default())
        .unwrap();

    let single = ReportRequest::new(LOCATION, 7, 15);
    c.bench_function("generate_report", |b| {
        b.iter(|| engine.generate_report(black_box(&single)))
    });

    let without_trends = ReportRequest::new(LOCATION, 1, 3).with_trends(false);
    c.bench_function("generate_report_no_trends", |b| {
        b.iter(|| engine.generate_report(black_box(&without_trends)))
    });

    let year: Vec<ReportRequest> = (1..=12)
        .flat_map(|month| [1, 15].map(|day| ReportRequest::new(LOCATION, month, day)))
        .collect();
    c.bench_function("generate_reports_24", |b| {
        b.iter(|| engine.generate_reports(black_box(&year)))
    });
}

criterion_group!(benches, bench_reports);
criterion_main!(benches);
