//! Performance benchmarks for wifi-densepose-positioning.
//!
//! Run with: cargo bench --package wifi-densepose-positioning
//!
//! Benchmarks cover:
//! - Geometric estimation per method and beacon count
//! - KNN classification against growing fingerprint stores
//! - A full tracking-session cycle

use std::sync::Arc;

use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use wifi_densepose_positioning::config::EstimatorConfig;
use wifi_densepose_positioning::fingerprint::FingerprintMap;
use wifi_densepose_positioning::{
    Beacon, BeaconId, BeaconTable, EstimationMethod, FingerprintRecord, FingerprintStore,
    GeometricEstimator, KnnMatcher, PathLossModel, Point2, PositioningConfig, RssiSignature,
    ScanPort, SimulatedScanner, TrackingSession,
};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Beacons on a 10 m grid, row-major.
fn grid_beacons(count: usize) -> Vec<Beacon> {
    (0..count)
        .map(|i| {
            let x = (i % 8) as f64 * 10.0;
            let y = (i / 8) as f64 * 10.0;
            Beacon::new(format!("AP-{i:02}"), Point2::new(x, y))
        })
        .collect()
}

fn ranges_from(truth: Point2, beacons: &[Beacon]) -> Vec<(BeaconId, f64)> {
    beacons
        .iter()
        .map(|b| (b.id.clone(), b.position.distance_to(&truth).max(0.5)))
        .collect()
}

/// Deterministic pseudo-random signatures of `ranks` values.
fn synthetic_store(records: usize, ranks: usize) -> FingerprintMap {
    let t = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
    (0..records)
        .map(|r| {
            let values = (0..ranks)
                .map(|k| -40.0 - ((r * 7 + k * 13) % 55) as f64)
                .collect();
            let label = format!("spot-{r}");
            let record = FingerprintRecord::new(label.clone(), RssiSignature::new(values), 10, t);
            (label, record)
        })
        .collect()
}

// =============================================================================
// Geometric estimation
// =============================================================================

fn bench_geometric_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometric_estimation");
    let truth = Point2::new(23.0, 7.0);

    for &count in &[3usize, 6, 16] {
        let beacons = grid_beacons(count);
        let ranges = ranges_from(truth, &beacons);
        let table = BeaconTable::from_beacons(beacons).unwrap();

        for method in [
            EstimationMethod::WeightedCentroid,
            EstimationMethod::Trilateration,
            EstimationMethod::LeastSquares,
        ] {
            let mut est = GeometricEstimator::new(
                PathLossModel::default(),
                table.clone(),
                EstimatorConfig {
                    method,
                    ..EstimatorConfig::default()
                },
            );
            group.throughput(Throughput::Elements(count as u64));
            group.bench_with_input(BenchmarkId::new(method.as_str(), count), &ranges, |b, ranges| {
                b.iter(|| black_box(est.estimate_distances(ranges.iter().map(|(id, d)| (id, *d)))))
            });
        }
    }
    group.finish();
}

// =============================================================================
// Fingerprint matching
// =============================================================================

fn bench_knn_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_classify");
    let matcher = KnnMatcher::default();
    let query = RssiSignature::new((0..15).map(|k| -45.0 - k as f64 * 3.0).collect());

    for &records in &[10usize, 100, 1000] {
        let store = synthetic_store(records, 15);
        group.throughput(Throughput::Elements(records as u64));
        group.bench_with_input(BenchmarkId::new("records", records), &store, |b, store| {
            b.iter(|| black_box(matcher.classify(&query, store, 3)))
        });
    }
    group.finish();
}

// =============================================================================
// Session cycle
// =============================================================================

fn bench_session_cycle(c: &mut Criterion) {
    let config = PositioningConfig {
        beacons: grid_beacons(6),
        ..PositioningConfig::default()
    };
    let table = config.beacon_table().unwrap();
    let scanner = SimulatedScanner::new(&table, PathLossModel::default(), 7);
    scanner.set_position(Point2::new(21.0, 4.0));

    let store = FingerprintStore::in_memory();
    for record in synthetic_store(50, 15).into_values() {
        store.insert(record).unwrap();
    }
    let mut session = TrackingSession::new(&config, Arc::new(store)).unwrap();

    c.bench_function("session_cycle", |b| {
        b.iter(|| {
            let reading = scanner.scan().unwrap();
            black_box(session.process(reading.into()))
        })
    });
}

criterion_group!(
    benches,
    bench_geometric_estimation,
    bench_knn_classify,
    bench_session_cycle,
);
criterion_main!(benches);
