//! Test doubles for the host seams.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use super::{EffectHandle, GameStateProvider, OverlaySink};
use crate::config::EffectProfile;
use crate::control::ChannelId;
use crate::error::{ProviderError, SinkError};

/// Provider that replays a script per channel and then holds the last value.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<ChannelId, VecDeque<f32>>>,
    unavailable: Mutex<HashSet<ChannelId>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(self, channel: ChannelId, values: impl IntoIterator<Item = f32>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(channel, values.into_iter().collect());
        self
    }

    pub fn with_unavailable(self, channel: ChannelId) -> Self {
        self.set_unavailable(channel, true);
        self
    }

    pub fn set_unavailable(&self, channel: ChannelId, unavailable: bool) {
        let mut set = self.unavailable.lock().unwrap();
        if unavailable {
            set.insert(channel);
        } else {
            set.remove(&channel);
        }
    }
}

impl GameStateProvider for ScriptedProvider {
    fn sample_percentage(&self, channel: ChannelId) -> Result<f32, ProviderError> {
        if self.unavailable.lock().unwrap().contains(&channel) {
            return Err(ProviderError::Unavailable { channel });
        }
        let mut scripts = self.scripts.lock().unwrap();
        let Some(script) = scripts.get_mut(&channel) else {
            return Ok(1.0);
        };
        let value = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().copied()
        };
        Ok(value.unwrap_or(1.0))
    }
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Configure { effect_id: String },
    Trigger { effect_id: String, intensity: f32 },
    Stop(EffectHandle),
}

/// Sink that records every call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    next_handle: u64,
    fail_triggers: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_triggers(mut self) -> Self {
        self.fail_triggers = true;
        self
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn trigger_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, SinkCall::Trigger { .. }))
            .count()
    }

    pub fn configured(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Configure { effect_id } => Some(effect_id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl OverlaySink for RecordingSink {
    fn configure(&mut self, effect_id: &str, _profile: &EffectProfile) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(SinkCall::Configure {
            effect_id: effect_id.to_owned(),
        });
        Ok(())
    }

    fn trigger(&mut self, effect_id: &str, intensity: f32) -> Result<EffectHandle, SinkError> {
        self.calls.lock().unwrap().push(SinkCall::Trigger {
            effect_id: effect_id.to_owned(),
            intensity,
        });
        if self.fail_triggers {
            return Err(SinkError::TriggerFailed {
                effect_id: effect_id.to_owned(),
                reason: "scripted failure".to_owned(),
            });
        }
        self.next_handle += 1;
        Ok(EffectHandle(self.next_handle))
    }

    fn stop(&mut self, handle: EffectHandle) {
        self.calls.lock().unwrap().push(SinkCall::Stop(handle));
    }
}
