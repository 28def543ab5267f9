//! Engine: control surface that ties the lifecycle, settings and the
//! scheduler thread together.
//!
//! The engine is what a host holds. It owns the settings, probes the
//! provider on start-up, and translates host lifecycle events into state
//! transitions. The scheduler thread is spawned on the first successful
//! start and lives until the engine is terminated or dropped.

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use tracing::{debug, error, info};

use super::lifecycle::{Lifecycle, SystemState};
use super::messages::{LifecycleEvent, SchedulerCommand, TickReport};
use super::scheduler::SchedulerActor;
use crate::config::Settings;
use crate::control::{ChannelId, ChannelMask};
use crate::error::EngineError;
use crate::host::{GameStateProvider, OverlaySink};

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Settings file. When `None`, [`EngineConfig::settings`] is used as-is
    /// and never reloaded.
    pub settings_path: Option<PathBuf>,
    /// Settings used until (or instead of) the file is read.
    pub settings: Settings,
    /// Tick reports buffered for observers before new ones are dropped.
    pub report_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            settings: Settings::default(),
            report_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Read settings from `path` on start-up.
    #[must_use]
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Use `settings` directly.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}

/// The overlay engine.
pub struct Engine {
    lifecycle: Arc<Lifecycle>,
    provider: Arc<dyn GameStateProvider>,
    /// Held until the scheduler thread takes it.
    sink: Option<Box<dyn OverlaySink>>,
    settings_path: Option<PathBuf>,
    settings: Settings,
    /// Whether the scheduler has received the current settings.
    applied: bool,
    command_tx: Sender<SchedulerCommand>,
    command_rx: Option<Receiver<SchedulerCommand>>,
    report_tx: Sender<TickReport>,
    report_rx: Receiver<TickReport>,
    scheduler: Option<SchedulerActor>,
}

impl Engine {
    /// Create a paused engine. Nothing is read or spawned until
    /// [`start`](Self::start).
    pub fn new(
        provider: Arc<dyn GameStateProvider>,
        sink: impl OverlaySink + 'static,
        config: EngineConfig,
    ) -> Self {
        let (command_tx, command_rx) = unbounded();
        let (report_tx, report_rx) = bounded(config.report_capacity.max(1));
        Self {
            lifecycle: Arc::new(Lifecycle::new()),
            provider,
            sink: Some(Box::new(sink)),
            settings_path: config.settings_path,
            settings: config.settings,
            applied: false,
            command_tx,
            command_rx: Some(command_rx),
            report_tx,
            report_rx,
            scheduler: None,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn current_state(&self) -> SystemState {
        self.lifecycle.current()
    }

    /// Settings in effect (or about to be, once the next start succeeds).
    #[inline]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Channels that are ticked.
    pub fn enabled_channels(&self) -> ChannelMask {
        self.settings.enabled_channels()
    }

    /// Tick reports, one per channel tick. Reports are dropped while the
    /// buffer is full.
    #[inline]
    pub const fn reports(&self) -> &Receiver<TickReport> {
        &self.report_rx
    }

    /// Start (or resume) ticking.
    ///
    /// Reloads settings when reloading is enabled or none have been applied
    /// yet, probes the provider for every enabled channel, reseeds the
    /// channels from those readings, then moves to `Running`. Starting a
    /// running engine does nothing.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Provider`] if a reading is unavailable; the state is
    ///   unchanged.
    /// - [`EngineError::Config`] or [`EngineError::Spawn`] if the settings
    ///   file is unusable or the thread cannot be spawned; the engine is
    ///   terminated.
    /// - [`EngineError::Terminated`] if the engine was already terminated.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.lifecycle.current() {
            SystemState::Terminated => return Err(EngineError::Terminated),
            SystemState::Running => {
                debug!("start ignored, already running");
                return Ok(());
            }
            SystemState::Paused => {}
        }

        let reload = !self.applied || self.settings.global.reload;
        if reload {
            if let Some(path) = &self.settings_path {
                match Settings::load(path) {
                    Ok(settings) => {
                        self.settings = settings;
                        self.applied = false;
                    }
                    Err(e) => {
                        error!(error = %e, "settings unusable, terminating");
                        self.terminate();
                        return Err(e.into());
                    }
                }
            }
        }

        let mut samples = Vec::with_capacity(ChannelId::ALL.len());
        for id in ChannelId::ALL {
            if self.settings.channel(id).enabled {
                samples.push((id, self.provider.sample_percentage(id)?));
            }
        }

        if !self.applied {
            self.settings.log_summary();
        }
        self.ensure_scheduler()?;
        if !self.applied {
            self.send(SchedulerCommand::Reconfigure(Box::new(self.settings.clone())))?;
            self.applied = true;
        }
        self.send(SchedulerCommand::Reseed(samples))?;

        if !self.lifecycle.run("start") {
            return Err(EngineError::Terminated);
        }
        info!(channels = ?self.enabled_channels(), "engine running");
        Ok(())
    }

    /// Stop ticking. Channels keep their values.
    ///
    /// # Errors
    ///
    /// [`EngineError::Terminated`] if the engine was already terminated.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        if self.lifecycle.pause("pause") {
            Ok(())
        } else {
            Err(EngineError::Terminated)
        }
    }

    /// React to a host lifecycle event. Events are ignored once terminated.
    ///
    /// # Errors
    ///
    /// Whatever [`start`](Self::start) returns for starting events.
    pub fn handle_event(&mut self, event: LifecycleEvent) -> Result<(), EngineError> {
        if self.lifecycle.is_terminated() {
            debug!(?event, "event ignored, engine terminated");
            return Ok(());
        }
        debug!(?event, "lifecycle event");
        if event.starts() {
            self.start()
        } else {
            self.pause()
        }
    }

    /// Terminate and wait for the scheduler thread to exit.
    pub fn terminate(&mut self) {
        self.lifecycle.terminate("terminate");
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.join();
        }
    }

    fn ensure_scheduler(&mut self) -> Result<(), EngineError> {
        if self.scheduler.is_some() {
            return Ok(());
        }
        let (Some(sink), Some(commands)) = (self.sink.take(), self.command_rx.take()) else {
            self.terminate();
            return Err(EngineError::Terminated);
        };
        match SchedulerActor::spawn(
            self.lifecycle.clone(),
            self.provider.clone(),
            sink,
            &self.settings,
            commands,
            self.report_tx.clone(),
        ) {
            Ok(scheduler) => {
                self.scheduler = Some(scheduler);
                // spawn applied the current settings
                self.applied = true;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to spawn scheduler thread, terminating");
                self.terminate();
                Err(EngineError::Spawn(e))
            }
        }
    }

    fn send(&mut self, command: SchedulerCommand) -> Result<(), EngineError> {
        if self.command_tx.send(command).is_err() {
            error!("scheduler thread gone, terminating");
            self.terminate();
            return Err(EngineError::Terminated);
        }
        Ok(())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.terminate();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.current_state())
            .field("settings_path", &self.settings_path)
            .field("applied", &self.applied)
            .field("scheduler", &self.scheduler.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::TickOutcome;
    use crate::host::testing::{RecordingSink, ScriptedProvider};
    use std::time::Duration;

    fn fast_settings() -> Settings {
        let mut settings = Settings::default();
        settings.global.sleep_time = Duration::from_millis(1);
        settings
    }

    fn engine_with(provider: Arc<ScriptedProvider>, sink: RecordingSink) -> Engine {
        Engine::new(
            provider,
            sink,
            EngineConfig::default().with_settings(fast_settings()),
        )
    }

    fn next_report(engine: &Engine, channel: ChannelId) -> TickReport {
        loop {
            let report = engine
                .reports()
                .recv_timeout(Duration::from_secs(1))
                .expect("no tick report");
            if report.channel == channel {
                return report;
            }
        }
    }

    #[test]
    fn test_starts_paused() {
        let engine = engine_with(Arc::new(ScriptedProvider::new()), RecordingSink::new());
        assert_eq!(engine.current_state(), SystemState::Paused);
        assert_eq!(engine.enabled_channels(), ChannelMask::all());
    }

    #[test]
    fn test_start_runs_and_drives_sink() {
        let provider = Arc::new(ScriptedProvider::new().with_script(ChannelId::Health, [1.0, 0.5]));
        let sink = RecordingSink::new();
        let mut engine = engine_with(provider, sink.clone());

        engine.handle_event(LifecycleEvent::DataLoaded).unwrap();
        assert_eq!(engine.current_state(), SystemState::Running);

        let report = next_report(&engine, ChannelId::Health);
        assert!(matches!(report.result, Ok(TickOutcome::Updated { .. })));
        assert!(report.current < 1.0);

        engine.terminate();
        assert!(sink.trigger_count() >= 1);
        assert_eq!(sink.configured().len(), 3);
    }

    #[test]
    fn test_start_reseeds_from_probe() {
        let provider = Arc::new(ScriptedProvider::new().with_script(ChannelId::Stamina, [0.4]));
        let sink = RecordingSink::new();
        let mut engine = engine_with(provider, sink.clone());

        engine.start().unwrap();
        let report = next_report(&engine, ChannelId::Stamina);
        assert_eq!(report.result, Ok(TickOutcome::Deadband));
        assert!((report.current - 0.4).abs() < 1e-6);

        engine.terminate();
        assert_eq!(sink.trigger_count(), 0);
    }

    #[test]
    fn test_unavailable_provider_aborts_start() {
        let provider = Arc::new(ScriptedProvider::new().with_unavailable(ChannelId::Magicka));
        let mut engine = engine_with(provider.clone(), RecordingSink::new());

        let err = engine.start().unwrap_err();
        assert!(matches!(err, EngineError::Provider(_)));
        assert!(!err.is_fatal());
        assert_eq!(engine.current_state(), SystemState::Paused);

        provider.set_unavailable(ChannelId::Magicka, false);
        engine.start().unwrap();
        assert_eq!(engine.current_state(), SystemState::Running);
    }

    #[test]
    fn test_preload_pauses() {
        let mut engine = engine_with(Arc::new(ScriptedProvider::new()), RecordingSink::new());
        engine.handle_event(LifecycleEvent::NewGame).unwrap();
        engine.handle_event(LifecycleEvent::PreLoadGame).unwrap();
        assert_eq!(engine.current_state(), SystemState::Paused);
        engine.handle_event(LifecycleEvent::PostLoadGame).unwrap();
        assert_eq!(engine.current_state(), SystemState::Running);
    }

    #[test]
    fn test_events_ignored_once_terminated() {
        let mut engine = engine_with(Arc::new(ScriptedProvider::new()), RecordingSink::new());
        engine.start().unwrap();
        engine.terminate();

        for event in [
            LifecycleEvent::DataLoaded,
            LifecycleEvent::NewGame,
            LifecycleEvent::PostLoadGame,
            LifecycleEvent::PreLoadGame,
        ] {
            engine.handle_event(event).unwrap();
            assert_eq!(engine.current_state(), SystemState::Terminated);
        }
        assert!(matches!(engine.start(), Err(EngineError::Terminated)));
        assert!(matches!(engine.pause(), Err(EngineError::Terminated)));
    }

    #[test]
    fn test_invalid_settings_terminate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("StatFX.toml");
        std::fs::write(&path, "[global\n").unwrap();

        let mut engine = Engine::new(
            Arc::new(ScriptedProvider::new()),
            RecordingSink::new(),
            EngineConfig::default().with_settings_path(&path),
        );
        let err = engine.start().unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.is_fatal());
        assert_eq!(engine.current_state(), SystemState::Terminated);
    }

    #[test]
    fn test_mistyped_settings_key_does_not_terminate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("StatFX.toml");
        std::fs::write(&path, "[global]\nsleep_time = \"1\"\n[health]\nmin_delta = \"0.02\"\nmax_delta = \"fast\"\n").unwrap();

        let mut engine = Engine::new(
            Arc::new(ScriptedProvider::new()),
            RecordingSink::new(),
            EngineConfig::default().with_settings_path(&path),
        );
        engine.start().unwrap();
        assert_eq!(engine.current_state(), SystemState::Running);
        let control = engine.settings().health.control;
        assert!((control.min_delta - 0.02).abs() < 1e-6);
        assert!((control.max_delta_neg - 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_reload_on_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("StatFX.toml");
        std::fs::write(&path, "[global]\nsleep_time = 1\n[magicka]\ndisabled = true\n").unwrap();

        let mut engine = Engine::new(
            Arc::new(ScriptedProvider::new()),
            RecordingSink::new(),
            EngineConfig::default().with_settings_path(&path),
        );
        engine.start().unwrap();
        assert_eq!(engine.enabled_channels(), ChannelMask::HEALTH | ChannelMask::STAMINA);

        engine.pause().unwrap();
        std::fs::write(&path, "[global]\nsleep_time = 1\n").unwrap();
        engine.start().unwrap();
        assert_eq!(engine.enabled_channels(), ChannelMask::all());
    }

    #[test]
    fn test_reload_disabled_keeps_first_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("StatFX.toml");
        std::fs::write(&path, "[global]\nsleep_time = 1\nreload = false\n[health]\ndisabled = true\n").unwrap();

        let mut engine = Engine::new(
            Arc::new(ScriptedProvider::new()),
            RecordingSink::new(),
            EngineConfig::default().with_settings_path(&path),
        );
        engine.start().unwrap();
        engine.pause().unwrap();
        std::fs::write(&path, "[global\n").unwrap();
        engine.start().unwrap();
        assert_eq!(engine.current_state(), SystemState::Running);
        assert_eq!(engine.enabled_channels(), ChannelMask::STAMINA | ChannelMask::MAGICKA);
    }

    #[test]
    fn test_drop_joins_scheduler() {
        let sink = RecordingSink::new();
        let provider = Arc::new(ScriptedProvider::new().with_script(ChannelId::Health, [1.0, 0.0]));
        let mut engine = engine_with(provider, sink.clone());
        engine.start().unwrap();
        let _ = next_report(&engine, ChannelId::Health);
        drop(engine);

        // the active overlay is stopped on the way out
        let calls = sink.calls();
        assert!(matches!(calls.last(), Some(crate::host::testing::SinkCall::Stop(_))));
    }
}
