//! Scheduler Actor: dedicated thread that ticks every channel at a fixed
//! period.
//!
//! Each iteration reads the lifecycle state once, applies queued
//! commands, then ticks the enabled channels in order when running. A
//! panic inside the tick body is caught at the iteration boundary and
//! turns into a cooldown; the loop never dies from a bad tick.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::{debug, error, info, warn};

use super::lifecycle::{Lifecycle, SystemState};
use super::messages::{SchedulerCommand, TickReport};
use crate::config::Settings;
use crate::control::Channel;
use crate::host::{GameStateProvider, OverlaySink};

/// Handle to the scheduler thread.
pub(crate) struct SchedulerActor {
    handle: Option<JoinHandle<()>>,
}

impl SchedulerActor {
    /// Spawn the scheduler thread, applying `settings` before the first
    /// iteration.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub(crate) fn spawn(
        lifecycle: Arc<Lifecycle>,
        provider: Arc<dyn GameStateProvider>,
        sink: Box<dyn OverlaySink>,
        settings: &Settings,
        commands: Receiver<SchedulerCommand>,
        reports: Sender<TickReport>,
    ) -> std::io::Result<Self> {
        let mut scheduler = SchedulerLoop {
            lifecycle,
            provider,
            sink,
            commands,
            reports,
            channels: Vec::new(),
            sleep_time: settings.global.sleep_time,
            cooldown: settings.global.failure_cooldown(),
            frame: 0,
            observed: SystemState::Paused,
        };
        scheduler.apply_settings(settings);

        let handle = thread::Builder::new()
            .name("statfx-scheduler".to_string())
            .spawn(move || scheduler.run())?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the thread to exit. The lifecycle must already be
    /// terminated.
    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("scheduler thread panicked outside the tick body");
            }
        }
    }
}

/// State owned by the scheduler thread.
struct SchedulerLoop {
    lifecycle: Arc<Lifecycle>,
    provider: Arc<dyn GameStateProvider>,
    sink: Box<dyn OverlaySink>,
    commands: Receiver<SchedulerCommand>,
    reports: Sender<TickReport>,
    channels: Vec<Channel>,
    sleep_time: Duration,
    cooldown: Duration,
    frame: u64,
    observed: SystemState,
}

impl SchedulerLoop {
    fn run(mut self) {
        info!(sleep_time_ms = self.sleep_time.as_millis() as u64, "scheduler started");
        loop {
            let state = self.lifecycle.current();
            self.drain_commands();

            if state != self.observed {
                info!(state = %state, "scheduler observed state change");
                self.observed = state;
            }

            let pause = match state {
                SystemState::Terminated => break,
                SystemState::Paused => self.sleep_time,
                SystemState::Running => {
                    let result = catch_unwind(AssertUnwindSafe(|| self.tick_all()));
                    match result {
                        Ok(()) => self.sleep_time,
                        Err(payload) => {
                            error!(
                                panic = panic_message(payload.as_ref()),
                                cooldown_ms = self.cooldown.as_millis() as u64,
                                "tick panicked, cooling down"
                            );
                            self.cooldown + self.sleep_time
                        }
                    }
                }
            };
            self.frame += 1;
            thread::sleep(pause);
        }

        for channel in &mut self.channels {
            channel.retire(self.sink.as_mut());
        }
        info!(frames = self.frame, "scheduler stopped");
    }

    fn drain_commands(&mut self) {
        loop {
            match self.commands.try_recv() {
                Ok(SchedulerCommand::Reconfigure(settings)) => self.apply_settings(&settings),
                Ok(SchedulerCommand::Reseed(samples)) => {
                    for (id, value) in samples {
                        if let Some(channel) = self.channels.iter_mut().find(|c| c.id() == id) {
                            channel.seed(value);
                            debug!(channel = %id, value, "reseeded");
                        }
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply_settings(&mut self, settings: &Settings) {
        for channel in &mut self.channels {
            channel.retire(self.sink.as_mut());
        }
        self.channels = settings.build_channels();
        self.sleep_time = settings.global.sleep_time;
        self.cooldown = settings.global.failure_cooldown();

        for channel in self.channels.iter().filter(|c| c.is_enabled()) {
            let profile = &settings.channel(channel.id()).profile;
            if let Err(e) = self.sink.configure(channel.effect_id(), profile) {
                warn!(channel = %channel.id(), error = %e, "failed to configure overlay effect");
            }
        }
    }

    fn tick_all(&mut self) {
        let provider = self.provider.as_ref();
        for channel in self.channels.iter_mut().filter(|c| c.is_enabled()) {
            let result = channel.tick(provider, self.sink.as_mut());
            if let Err(e) = &result {
                debug!(channel = %channel.id(), error = %e, "channel skipped");
            }
            // Observers that fall behind lose reports, never the loop.
            let _ = self.reports.try_send(TickReport {
                frame: self.frame,
                channel: channel.id(),
                current: channel.current(),
                actual: channel.actual(),
                result,
            });
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ChannelId, TickOutcome};
    use crate::host::testing::{RecordingSink, ScriptedProvider};
    use crossbeam_channel::{bounded, unbounded};

    fn fast_settings() -> Settings {
        let mut settings = Settings::default();
        settings.global.sleep_time = Duration::from_millis(1);
        settings.global.failure_cooldown_ticks = 2;
        settings
    }

    #[test]
    fn test_paused_loop_does_not_tick() {
        let lifecycle = Arc::new(Lifecycle::new());
        let sink = RecordingSink::new();
        let (_cmd_tx, cmd_rx) = unbounded();
        let (report_tx, report_rx) = bounded(16);
        let mut actor = SchedulerActor::spawn(
            lifecycle.clone(),
            Arc::new(ScriptedProvider::new()),
            Box::new(sink.clone()),
            &fast_settings(),
            cmd_rx,
            report_tx,
        )
        .unwrap();

        thread::sleep(Duration::from_millis(20));
        assert!(report_rx.try_recv().is_err());
        assert_eq!(sink.trigger_count(), 0);
        // every enabled channel configured once on start
        assert_eq!(sink.configured().len(), 3);

        lifecycle.terminate("test");
        actor.join();
    }

    #[test]
    fn test_running_loop_ticks_in_order() {
        let lifecycle = Arc::new(Lifecycle::new());
        let (_cmd_tx, cmd_rx) = unbounded();
        let (report_tx, report_rx) = bounded(64);
        let mut actor = SchedulerActor::spawn(
            lifecycle.clone(),
            Arc::new(ScriptedProvider::new()),
            Box::new(RecordingSink::new()),
            &fast_settings(),
            cmd_rx,
            report_tx,
        )
        .unwrap();
        lifecycle.run("test");

        let order: Vec<ChannelId> = (0..3)
            .map(|_| report_rx.recv_timeout(Duration::from_secs(1)).unwrap().channel)
            .collect();
        assert_eq!(order, ChannelId::ALL);

        lifecycle.terminate("test");
        actor.join();
    }

    #[test]
    fn test_reseed_command_snaps_channel() {
        let lifecycle = Arc::new(Lifecycle::new());
        let sink = RecordingSink::new();
        let (cmd_tx, cmd_rx) = unbounded();
        let (report_tx, report_rx) = bounded(64);
        let provider = ScriptedProvider::new().with_script(ChannelId::Health, [0.3]);
        let mut actor = SchedulerActor::spawn(
            lifecycle.clone(),
            Arc::new(provider),
            Box::new(sink.clone()),
            &fast_settings(),
            cmd_rx,
            report_tx,
        )
        .unwrap();

        cmd_tx
            .send(SchedulerCommand::Reseed(vec![(ChannelId::Health, 0.3)]))
            .unwrap();
        lifecycle.run("test");

        let report = report_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(report.channel, ChannelId::Health);
        assert_eq!(report.result, Ok(TickOutcome::Deadband));
        assert!((report.current - 0.3).abs() < 1e-6);

        lifecycle.terminate("test");
        actor.join();
        assert_eq!(sink.trigger_count(), 0);
    }

    #[test]
    fn test_terminated_loop_exits() {
        let lifecycle = Arc::new(Lifecycle::new());
        let (_cmd_tx, cmd_rx) = unbounded();
        let (report_tx, _report_rx) = bounded(1);
        let mut actor = SchedulerActor::spawn(
            lifecycle.clone(),
            Arc::new(ScriptedProvider::new()),
            Box::new(RecordingSink::new()),
            &fast_settings(),
            cmd_rx,
            report_tx,
        )
        .unwrap();
        lifecycle.run("test");
        lifecycle.terminate("test");

        let (done_tx, done_rx) = bounded(1);
        thread::spawn(move || {
            actor.join();
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(1)).is_ok());
    }

    struct PanicOnceSink {
        panicked: bool,
        attempts: Arc<std::sync::Mutex<Vec<std::time::Instant>>>,
        inner: RecordingSink,
    }

    impl OverlaySink for PanicOnceSink {
        fn trigger(
            &mut self,
            effect_id: &str,
            intensity: f32,
        ) -> Result<crate::host::EffectHandle, crate::error::SinkError> {
            self.attempts.lock().unwrap().push(std::time::Instant::now());
            if !self.panicked {
                self.panicked = true;
                panic!("sink exploded");
            }
            self.inner.trigger(effect_id, intensity)
        }

        fn stop(&mut self, handle: crate::host::EffectHandle) {
            self.inner.stop(handle);
        }
    }

    #[test]
    fn test_panicking_tick_is_contained() {
        let lifecycle = Arc::new(Lifecycle::new());
        let recorder = RecordingSink::new();
        let attempts = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = PanicOnceSink {
            panicked: false,
            attempts: attempts.clone(),
            inner: recorder.clone(),
        };
        let mut settings = fast_settings();
        settings.global.failure_cooldown_ticks = 20;
        let (_cmd_tx, cmd_rx) = unbounded();
        let (report_tx, _report_rx) = bounded(1);
        let provider = ScriptedProvider::new().with_script(ChannelId::Health, [0.0]);
        let mut actor = SchedulerActor::spawn(
            lifecycle.clone(),
            Arc::new(provider),
            Box::new(sink),
            &settings,
            cmd_rx,
            report_tx,
        )
        .unwrap();
        lifecycle.run("test");

        let mut waited = 0;
        while recorder.trigger_count() == 0 && waited < 1000 {
            thread::sleep(Duration::from_millis(5));
            waited += 5;
        }
        assert!(recorder.trigger_count() > 0, "loop did not resume after panic");
        assert_eq!(lifecycle.current(), SystemState::Running);

        lifecycle.terminate("test");
        actor.join();

        // cooldown of 20 periods, then the regular period
        let attempts = attempts.lock().unwrap();
        let backoff = attempts[1].duration_since(attempts[0]);
        assert!(backoff >= Duration::from_millis(21), "resumed after {backoff:?}");
    }

    #[test]
    fn test_panic_payload_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
