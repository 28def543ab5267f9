//! Tick benchmark: Measure one channel tick end to end.
//!
//! Target: < 100ns per tick with a no-op sink

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use statfx::control::{approach, map_intensity, Channel, ChannelConfig};
use statfx::{ChannelId, EffectHandle, Easing, GameStateProvider, OverlaySink, ProviderError, SinkError};

/// Provider that alternates between two readings so the channel never settles.
struct Oscillating {
    flip: std::sync::atomic::AtomicBool,
}

impl GameStateProvider for Oscillating {
    fn sample_percentage(&self, _channel: ChannelId) -> Result<f32, ProviderError> {
        let high = self.flip.fetch_xor(true, std::sync::atomic::Ordering::Relaxed);
        Ok(if high { 0.9 } else { 0.1 })
    }
}

struct Steady(f32);

impl GameStateProvider for Steady {
    fn sample_percentage(&self, _channel: ChannelId) -> Result<f32, ProviderError> {
        Ok(self.0)
    }
}

#[derive(Default)]
struct NullSink {
    next: u64,
}

impl OverlaySink for NullSink {
    fn trigger(&mut self, _effect_id: &str, _intensity: f32) -> Result<EffectHandle, SinkError> {
        self.next += 1;
        Ok(EffectHandle(self.next))
    }

    fn stop(&mut self, handle: EffectHandle) {
        black_box(handle);
    }
}

fn config() -> ChannelConfig {
    ChannelConfig {
        easing: Easing::EaseInOutCubic,
        ..ChannelConfig::default()
    }
}

fn tick_updating(c: &mut Criterion) {
    let provider = Oscillating {
        flip: std::sync::atomic::AtomicBool::new(false),
    };
    let mut sink = NullSink::default();
    let mut channel = Channel::new(ChannelId::Health, "StatFXImodHealth", config());

    c.bench_function("tick_updating", |b| {
        b.iter(|| channel.tick(black_box(&provider), &mut sink));
    });
}

fn tick_deadband(c: &mut Criterion) {
    let provider = Steady(0.5);
    let mut sink = NullSink::default();
    let mut channel = Channel::new(ChannelId::Stamina, "StatFXImodStam", config());
    channel.seed(0.5);

    c.bench_function("tick_deadband", |b| {
        b.iter(|| channel.tick(black_box(&provider), &mut sink));
    });
}

fn filter_stages(c: &mut Criterion) {
    c.bench_function("approach_step", |b| {
        b.iter(|| approach(black_box(0.8), black_box(0.2), 0.015, 0.015));
    });

    c.bench_function("map_intensity_partial_window", |b| {
        b.iter(|| map_intensity(black_box(0.45), 0.8, 0.2, Easing::EaseOutQuad));
    });
}

criterion_group!(benches, tick_updating, tick_deadband, filter_stages);
criterion_main!(benches);
