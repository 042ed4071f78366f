use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vitalrs::scoring::{self, RecoveryHistory, RecoveryVitals};
use vitalrs::sleep::{SleepConsistencyInput, SleepEngine, SleepSessionData};
use vitalrs::{ScoringConfig, StrainEngine};

/// Performance benchmarks for the scoring engines
///
/// Strain is the only engine whose cost grows with input size (one sample
/// per wearable reading), so it gets the scaling treatment; the rest are
/// fixed-size daily computations benchmarked once.

fn create_hr_samples(count: usize) -> Vec<(i64, f64)> {
    (0..count)
        .map(|i| {
            let bpm = 110.0 + 40.0 * ((i as f64) * 0.01).sin();
            (i as i64 * 10_000, bpm)
        })
        .collect()
}

fn create_sleep_session() -> SleepSessionData {
    SleepSessionData {
        start_date_millis: 0,
        end_date_millis: 460 * 60_000,
        total_sleep_minutes: 460.0,
        time_in_bed_minutes: 490.0,
        light_minutes: 250.0,
        deep_minutes: 95.0,
        rem_minutes: 115.0,
        awake_minutes: 20.0,
        awakenings: 3,
        sleep_onset_latency_minutes: Some(14.0),
        sleep_efficiency: 0.94,
        stages: Vec::new(),
    }
}

fn bench_strain_calculation(c: &mut Criterion) {
    let config = ScoringConfig::default();
    let engine = StrainEngine::new(195, &config.strain, &config.heart_rate_zones);

    let mut group = c.benchmark_group("Strain Calculation");

    // One sample per 10s: 360/hour, 8640/day of continuous wear
    for &size in &[360, 2160, 8640, 86_400] {
        let raw = create_hr_samples(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("compute_workout_strain", size),
            &raw,
            |b, raw| {
                b.iter(|| engine.compute_workout_strain(black_box(raw)));
            },
        );
    }

    group.finish();
}

fn bench_recovery_calculation(c: &mut Criterion) {
    let config = ScoringConfig::default();
    let vitals = RecoveryVitals {
        hrv: Some(68.0),
        resting_heart_rate: Some(52.0),
        sleep_performance: Some(88.0),
        respiratory_rate: Some(14.2),
        spo2: Some(97.0),
        skin_temperature_deviation: Some(0.2),
    };
    let history = RecoveryHistory {
        hrv: (0..28).map(|i| 60.0 + f64::from(i % 7)).collect(),
        resting_heart_rate: (0..28).map(|i| 52.0 + f64::from(i % 3)).collect(),
        sleep_performance: (0..28).map(|i| 82.0 + f64::from(i % 10)).collect(),
        respiratory_rate: (0..28).map(|i| 14.0 + f64::from(i % 2) * 0.3).collect(),
        spo2: (0..28).map(|i| 96.0 + f64::from(i % 3) * 0.5).collect(),
        skin_temperature: (0..28).map(|i| f64::from(i % 4) * 0.1).collect(),
    };

    c.bench_function("compute_recovery_full_vitals", |b| {
        b.iter(|| {
            scoring::compute_recovery(black_box(&config), black_box(&vitals), black_box(&history))
        });
    });
}

fn bench_sleep_analysis(c: &mut Criterion) {
    let config = ScoringConfig::default();
    let engine = SleepEngine::new(&config.sleep);
    let sessions = vec![create_sleep_session()];
    let consistency = SleepConsistencyInput {
        recent_bedtime_minutes: vec![1380.0, 1395.0, 1370.0, 1400.0, 1385.0, 1390.0],
        recent_wake_time_minutes: vec![420.0, 435.0, 410.0, 440.0, 425.0, 430.0],
    };
    let week_actual = [7.2, 6.8, 7.5, 6.9, 7.1, 7.4, 6.5];
    let week_needs = [7.5; 7];

    c.bench_function("analyze_sleep_full_night", |b| {
        b.iter(|| {
            engine.analyze(
                black_box(&sessions),
                7.5,
                12.3,
                black_box(&week_actual),
                black_box(&week_needs),
                black_box(&consistency),
            )
        });
    });
}

fn bench_correlation(c: &mut Criterion) {
    let with: Vec<f64> = (0..90).map(|i| 68.0 + f64::from(i % 11)).collect();
    let without: Vec<f64> = (0..90).map(|i| 60.0 + f64::from(i % 9)).collect();

    c.bench_function("correlate_behavior_90_days", |b| {
        b.iter(|| {
            scoring::correlate_behavior(
                black_box("meditation"),
                black_box("recovery"),
                black_box(&with),
                black_box(&without),
                true,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_strain_calculation,
    bench_recovery_calculation,
    bench_sleep_analysis,
    bench_correlation
);
criterion_main!(benches);
