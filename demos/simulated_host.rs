//! Simulated host: Drive the engine from a fake player whose stamina
//! drains and recovers, printing every overlay update.
//!
//! Run with `RUST_LOG=debug` to see the per-tick trace as well.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use statfx::control::TickOutcome;
use statfx::{
    ChannelId, EffectHandle, Engine, EngineConfig, GameStateProvider, LifecycleEvent,
    OverlaySink, ProviderError, Settings, SinkError,
};

/// Player whose stamina is set from the main thread.
struct Player {
    stamina_bits: AtomicU32,
}

impl Player {
    fn set_stamina(&self, value: f32) {
        self.stamina_bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl GameStateProvider for Player {
    fn sample_percentage(&self, channel: ChannelId) -> Result<f32, ProviderError> {
        Ok(match channel {
            ChannelId::Stamina => f32::from_bits(self.stamina_bits.load(Ordering::Relaxed)),
            ChannelId::Health | ChannelId::Magicka => 1.0,
        })
    }
}

/// Sink that only hands out handles; the reports carry the interesting part.
#[derive(Default)]
struct Screen {
    next: u64,
}

impl OverlaySink for Screen {
    fn trigger(&mut self, _effect_id: &str, _intensity: f32) -> Result<EffectHandle, SinkError> {
        self.next += 1;
        Ok(EffectHandle(self.next))
    }

    fn stop(&mut self, _handle: EffectHandle) {}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    statfx::logging::init_tracing(None);

    let mut settings = Settings::from_toml_str(
        r#"
        [global]
        sleep_time = 20

        [stamina]
        range = "0.1, 0.7"
        easing = "easeInQuad"
        fade_time = "0.6, 0.3"
        "#,
    )?;
    settings.health.enabled = false;
    settings.magicka.enabled = false;

    let player = Arc::new(Player {
        stamina_bits: AtomicU32::new(1.0_f32.to_bits()),
    });
    let mut engine = Engine::new(
        player.clone(),
        Screen::default(),
        EngineConfig::default().with_settings(settings),
    );

    engine.handle_event(LifecycleEvent::DataLoaded)?;
    println!("state: {}", engine.current_state());

    let started = Instant::now();
    let script = [(0.0, 0.2), (0.8, 0.9), (1.4, 0.05), (2.0, 1.0)];
    let mut next = 0;
    while started.elapsed() < Duration::from_millis(2600) {
        let elapsed = started.elapsed().as_secs_f32();
        if next < script.len() && elapsed >= script[next].0 {
            println!("-- stamina set to {:.2} at {elapsed:.2}s", script[next].1);
            player.set_stamina(script[next].1);
            next += 1;
        }

        while let Ok(report) = engine.reports().try_recv() {
            if let Ok(TickOutcome::Updated { intensity, .. }) = report.result {
                let bar = "#".repeat((intensity * 40.0).round() as usize);
                println!(
                    "{:>5} {:<8} current {:.3} actual {:.3} |{bar:<40}|",
                    report.frame, report.channel, report.current, report.actual
                );
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    engine.handle_event(LifecycleEvent::PreLoadGame)?;
    println!("state: {}", engine.current_state());
    engine.terminate();
    println!("state: {}", engine.current_state());
    Ok(())
}
