//! Easing benchmark: Measure curve evaluation and name resolution.
//!
//! Target: < 20ns per evaluation, including the elastic family

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use statfx::easing::{lookup, lookup_by_name};
use statfx::Easing;

fn easing_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("easing_apply");
    for curve in [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseInOutExpo,
        Easing::EaseOutElastic,
        Easing::EaseInOutBounce,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(curve), &curve, |b, &curve| {
            b.iter(|| curve.apply(black_box(0.37)));
        });
    }
    group.finish();
}

fn easing_sweep_all(c: &mut Criterion) {
    c.bench_function("easing_sweep_all_curves", |b| {
        b.iter(|| {
            let mut acc = 0.0_f32;
            for curve in Easing::ALL {
                for step in 0..=16 {
                    acc += curve.apply(black_box(step as f32 / 16.0));
                }
            }
            acc
        });
    });
}

fn easing_lookup(c: &mut Criterion) {
    c.bench_function("easing_lookup_code", |b| {
        b.iter(|| lookup(black_box(17)));
    });

    c.bench_function("easing_lookup_canonical_name", |b| {
        b.iter(|| lookup_by_name(black_box("easeInOutCubic")));
    });

    c.bench_function("easing_lookup_alias_with_separators", |b| {
        b.iter(|| lookup_by_name(black_box("  Ease-In-Out_Bounce ")));
    });

    c.bench_function("easing_lookup_miss", |b| {
        b.iter(|| lookup_by_name(black_box("not-a-curve")));
    });
}

criterion_group!(benches, easing_apply, easing_sweep_all, easing_lookup);
criterion_main!(benches);
