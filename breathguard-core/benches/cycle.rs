//! Per-cycle cost of the inference engine
//!
//! Measures `Monitor::observe` (everything after sampling) over a realistic
//! breathing trace, plus the fault path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use breathguard_core::{CalibrationRequests, Monitor, MonitorConfig};

fn breathing_trace() -> Vec<f32> {
    (0..256u32)
        .map(|i| if (i / 20) % 2 == 0 { 85.0 } else { 92.0 })
        .collect()
}

fn bench_cycle(c: &mut Criterion) {
    let trace = breathing_trace();

    c.bench_function("observe_breathing", |b| {
        let requests = CalibrationRequests::new();
        let mut monitor = Monitor::new(MonitorConfig::default(), &requests).unwrap();
        let mut t = 0u64;
        b.iter(|| {
            for value in &trace {
                t += 1;
                black_box(monitor.observe(black_box(*value), t / 10));
            }
        });
    });

    c.bench_function("observe_fault", |b| {
        let requests = CalibrationRequests::new();
        let mut monitor = Monitor::new(MonitorConfig::default(), &requests).unwrap();
        b.iter(|| black_box(monitor.observe(black_box(5000.0), 0)));
    });
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
