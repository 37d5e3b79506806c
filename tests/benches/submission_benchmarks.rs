//! # Weather-Attest Submission Benchmarks
//!
//! Per-stage cost of accepting one reading:
//!
//! | Stage | Crate |
//! |-------|-------|
//! | canonical bytes + SHA-256 | shared-types |
//! | sign | wa-01 |
//! | verify | wa-02 |
//! | bounds + freshness | wa-03 |
//! | sliding-window check | wa-04 |

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::SensorReading;
use std::sync::Arc;
use std::time::Duration;
use wa_01_device_identity::DeviceIdentity;
use wa_03_payload_validation::PayloadValidator;
use wa_04_rate_limiting::{ManualTimeSource, RateLimitConfig, RateLimiter};

fn reading(identity: &DeviceIdentity) -> SensorReading {
    SensorReading {
        device_id: identity.device_id().to_hex(),
        location: "Benchmark Ridge".into(),
        temperature: 18.25,
        humidity: 63.0,
        pressure: 1012.7,
        wind_speed: 14.3,
        wind_direction: "SE".into(),
        timestamp: Utc::now(),
    }
}

fn bench_canonical_hash(c: &mut Criterion) {
    let identity = DeviceIdentity::generate();
    let reading = reading(&identity);

    c.bench_function("canonical_bytes_sha256", |b| {
        b.iter(|| black_box(reading.data_hash().unwrap()))
    });
}

fn bench_sign_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("p256-submission");
    group.measurement_time(Duration::from_secs(10));

    let identity = DeviceIdentity::generate();
    let reading = reading(&identity);
    let submission = identity.sign(reading.clone()).unwrap();

    group.bench_function("sign", |b| {
        b.iter(|| black_box(identity.sign(reading.clone()).unwrap()))
    });

    group.bench_function("verify", |b| {
        b.iter(|| black_box(wa_02_signature_verification::verify(&submission)))
    });

    let mut tampered = submission.clone();
    tampered.reading.temperature += 0.5;
    group.bench_function("verify_rejects_tampered", |b| {
        b.iter(|| black_box(wa_02_signature_verification::verify(&tampered)))
    });

    group.finish();
}

fn bench_payload_validation(c: &mut Criterion) {
    let identity = DeviceIdentity::generate();
    let reading = reading(&identity);
    let validator = PayloadValidator::default();
    let now = Utc::now();

    c.bench_function("payload_validate", |b| {
        b.iter(|| black_box(validator.validate(&reading, now).is_ok()))
    });
}

fn bench_rate_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate-limiter");

    for devices in [10usize, 1_000, 10_000] {
        let ids: Vec<String> = (0..devices).map(|i| format!("{i:032x}")).collect();
        group.throughput(Throughput::Elements(devices as u64));
        group.bench_with_input(
            BenchmarkId::new("check_and_record", devices),
            &ids,
            |b, ids| {
                let clock = Arc::new(ManualTimeSource::new(0));
                let limiter = RateLimiter::with_time_source(
                    RateLimitConfig {
                        window_secs: 1,
                        max_submissions: 12,
                    },
                    clock.clone(),
                );
                b.iter(|| {
                    clock.advance(100);
                    for id in ids {
                        black_box(limiter.check_and_record(id));
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_canonical_hash,
    bench_sign_verify,
    bench_payload_validation,
    bench_rate_limiter
);
criterion_main!(benches);
