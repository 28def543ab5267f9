//! C Foreign Function Interface (FFI) for StatFX.
//!
//! This module lets a native host plugin embed the engine. The host hands
//! over a table of callbacks that implement the provider and sink seams,
//! then forwards its lifecycle events.
//!
//! # Safety
//!
//! All functions that accept pointers require valid pointers or NULL.
//! Callbacks are invoked from the engine's scheduler thread as well as the
//! calling thread, so they must be thread-safe with respect to
//! `user_data`. The caller is responsible for destroying the engine.
//!
//! # Example (C)
//!
//! ```c
//! #include "statfx.h"
//!
//! static StatfxHostCallbacks callbacks = {
//!     .user_data = &plugin_state,
//!     .sample = sample_actor_value,
//!     .trigger = apply_imod,
//!     .stop = stop_imod,
//!     .configure = NULL,
//! };
//!
//! void on_message(SKSEMessage* msg) {
//!     switch (msg->type) {
//!     case kDataLoaded:
//!         engine = statfx_engine_new(&callbacks, "Data/SKSE/Plugins/StatFX.toml");
//!         statfx_engine_notify(engine, DataLoaded);
//!         break;
//!     case kPreLoadGame:
//!         statfx_engine_notify(engine, PreLoadGame);
//!         break;
//!     }
//! }
//! ```

// FFI modules intentionally use unsafe and no_mangle
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::collections::HashMap;
use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;
use std::sync::Arc;

use tracing::warn;

use crate::actor::{Engine, EngineConfig, LifecycleEvent, SystemState};
use crate::config::EffectProfile;
use crate::control::ChannelId;
use crate::easing::{lookup, lookup_by_name, Easing};
use crate::error::{EngineError, ProviderError, SinkError};
use crate::host::{EffectHandle, GameStateProvider, OverlaySink};

// =============================================================================
// Opaque Handle Types
// =============================================================================

/// Opaque handle to a StatFX engine.
pub struct StatfxEngine(Engine);

// =============================================================================
// Result and Enum Codes
// =============================================================================

/// Result codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatfxResult {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer passed.
    NullPointer = 1,
    /// A reading was unavailable; state unchanged.
    ProviderUnavailable = 2,
    /// Settings file unusable; engine terminated.
    ConfigError = 3,
    /// Scheduler thread could not be spawned; engine terminated.
    SpawnFailed = 4,
    /// Engine is terminated.
    Terminated = 5,
}

impl From<&EngineError> for StatfxResult {
    fn from(err: &EngineError) -> Self {
        match err {
            EngineError::Provider(_) => Self::ProviderUnavailable,
            EngineError::Config(_) => Self::ConfigError,
            EngineError::Spawn(_) => Self::SpawnFailed,
            EngineError::Terminated => Self::Terminated,
        }
    }
}

/// Host lifecycle events.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatfxLifecycleEvent {
    /// Game data finished loading.
    DataLoaded = 0,
    /// A new game was started.
    NewGame = 1,
    /// A save game finished loading.
    PostLoadGame = 2,
    /// A save game is about to load.
    PreLoadGame = 3,
}

impl From<StatfxLifecycleEvent> for LifecycleEvent {
    fn from(event: StatfxLifecycleEvent) -> Self {
        match event {
            StatfxLifecycleEvent::DataLoaded => Self::DataLoaded,
            StatfxLifecycleEvent::NewGame => Self::NewGame,
            StatfxLifecycleEvent::PostLoadGame => Self::PostLoadGame,
            StatfxLifecycleEvent::PreLoadGame => Self::PreLoadGame,
        }
    }
}

/// Engine state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatfxState {
    /// Not ticking.
    Paused = 0,
    /// Ticking.
    Running = 1,
    /// Stopped for good.
    Terminated = 2,
}

impl From<SystemState> for StatfxState {
    fn from(state: SystemState) -> Self {
        match state {
            SystemState::Paused => Self::Paused,
            SystemState::Running => Self::Running,
            SystemState::Terminated => Self::Terminated,
        }
    }
}

// =============================================================================
// Host Callbacks
// =============================================================================

/// Write the fraction (0..1) of `channel`'s resource to `out_value`.
/// Return `false` when the reading is unavailable.
pub type StatfxSampleFn =
    unsafe extern "C" fn(user_data: *mut c_void, channel: u32, out_value: *mut f32) -> bool;

/// Start `effect_id` at `intensity` and write its handle to `out_handle`.
/// Return `false` on failure.
pub type StatfxTriggerFn = unsafe extern "C" fn(
    user_data: *mut c_void,
    effect_id: *const c_char,
    intensity: f32,
    out_handle: *mut u64,
) -> bool;

/// Stop a running effect.
pub type StatfxStopFn = unsafe extern "C" fn(user_data: *mut c_void, handle: u64);

/// Apply the static look of `effect_id`. Return `false` on failure.
pub type StatfxConfigureFn = unsafe extern "C" fn(
    user_data: *mut c_void,
    effect_id: *const c_char,
    profile: *const EffectProfile,
) -> bool;

/// Callback table implementing the provider and sink.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct StatfxHostCallbacks {
    /// Passed back to every callback.
    pub user_data: *mut c_void,
    /// Required.
    pub sample: Option<StatfxSampleFn>,
    /// Required.
    pub trigger: Option<StatfxTriggerFn>,
    /// Required.
    pub stop: Option<StatfxStopFn>,
    /// Optional.
    pub configure: Option<StatfxConfigureFn>,
}

/// Validated callback table.
struct HostCallbacks {
    user_data: *mut c_void,
    sample: StatfxSampleFn,
    trigger: StatfxTriggerFn,
    stop: StatfxStopFn,
    configure: Option<StatfxConfigureFn>,
}

// The host guarantees its callbacks may be called from any thread.
unsafe impl Send for HostCallbacks {}
unsafe impl Sync for HostCallbacks {}

impl HostCallbacks {
    fn from_raw(raw: &StatfxHostCallbacks) -> Option<Self> {
        Some(Self {
            user_data: raw.user_data,
            sample: raw.sample?,
            trigger: raw.trigger?,
            stop: raw.stop?,
            configure: raw.configure,
        })
    }
}

struct CallbackProvider(Arc<HostCallbacks>);

impl GameStateProvider for CallbackProvider {
    fn sample_percentage(&self, channel: ChannelId) -> Result<f32, ProviderError> {
        let mut value = 0.0_f32;
        let ok = unsafe { (self.0.sample)(self.0.user_data, channel.code(), &mut value) };
        if ok {
            Ok(value)
        } else {
            Err(ProviderError::Unavailable { channel })
        }
    }
}

struct CallbackSink {
    callbacks: Arc<HostCallbacks>,
    /// NUL-terminated copies of effect ids, built once per id.
    names: HashMap<String, CString>,
}

impl CallbackSink {
    fn c_name(&mut self, effect_id: &str) -> Result<*const c_char, SinkError> {
        if !self.names.contains_key(effect_id) {
            let name = CString::new(effect_id).map_err(|_| SinkError::UnknownEffect {
                effect_id: effect_id.to_owned(),
            })?;
            self.names.insert(effect_id.to_owned(), name);
        }
        Ok(self.names[effect_id].as_ptr())
    }
}

impl OverlaySink for CallbackSink {
    fn configure(&mut self, effect_id: &str, profile: &EffectProfile) -> Result<(), SinkError> {
        let Some(configure) = self.callbacks.configure else {
            return Ok(());
        };
        let name = self.c_name(effect_id)?;
        if unsafe { configure(self.callbacks.user_data, name, profile) } {
            Ok(())
        } else {
            Err(SinkError::UnknownEffect {
                effect_id: effect_id.to_owned(),
            })
        }
    }

    fn trigger(&mut self, effect_id: &str, intensity: f32) -> Result<EffectHandle, SinkError> {
        let name = self.c_name(effect_id)?;
        let mut handle = 0_u64;
        let ok = unsafe { (self.callbacks.trigger)(self.callbacks.user_data, name, intensity, &mut handle) };
        if ok {
            Ok(EffectHandle(handle))
        } else {
            Err(SinkError::TriggerFailed {
                effect_id: effect_id.to_owned(),
                reason: "host trigger callback returned false".to_owned(),
            })
        }
    }

    fn stop(&mut self, handle: EffectHandle) {
        unsafe { (self.callbacks.stop)(self.callbacks.user_data, handle.get()) }
    }
}

// =============================================================================
// Engine Functions
// =============================================================================

/// Create a paused engine.
///
/// `config_path` may be NULL to run on defaults. Returns NULL when
/// `callbacks` is NULL, a required callback is missing, or the path is not
/// valid UTF-8.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_engine_new(
    callbacks: *const StatfxHostCallbacks,
    config_path: *const c_char,
) -> *mut StatfxEngine {
    if callbacks.is_null() {
        return ptr::null_mut();
    }
    let Some(callbacks) = HostCallbacks::from_raw(&*callbacks) else {
        warn!("host callbacks incomplete, engine not created");
        return ptr::null_mut();
    };

    let mut config = EngineConfig::default();
    if !config_path.is_null() {
        match CStr::from_ptr(config_path).to_str() {
            Ok(path) => config = config.with_settings_path(Path::new(path)),
            Err(_) => return ptr::null_mut(),
        }
    }

    let callbacks = Arc::new(callbacks);
    let provider = Arc::new(CallbackProvider(callbacks.clone()));
    let sink = CallbackSink {
        callbacks,
        names: HashMap::new(),
    };
    let engine = Engine::new(provider, sink, config);
    Box::into_raw(Box::new(StatfxEngine(engine)))
}

/// Destroy an engine, terminating and joining its scheduler thread.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_engine_destroy(engine: *mut StatfxEngine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Forward a host lifecycle event.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_engine_notify(
    engine: *mut StatfxEngine,
    event: StatfxLifecycleEvent,
) -> StatfxResult {
    if engine.is_null() {
        return StatfxResult::NullPointer;
    }
    to_result((*engine).0.handle_event(event.into()))
}

/// Start ticking.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_engine_start(engine: *mut StatfxEngine) -> StatfxResult {
    if engine.is_null() {
        return StatfxResult::NullPointer;
    }
    to_result((*engine).0.start())
}

/// Stop ticking.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_engine_pause(engine: *mut StatfxEngine) -> StatfxResult {
    if engine.is_null() {
        return StatfxResult::NullPointer;
    }
    to_result((*engine).0.pause())
}

/// Current state. A NULL engine reads as terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_engine_state(engine: *const StatfxEngine) -> StatfxState {
    if engine.is_null() {
        return StatfxState::Terminated;
    }
    (*engine).0.current_state().into()
}

/// Bitmask of enabled channels (bit 0 health, 1 stamina, 2 magicka).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_engine_enabled_channels(engine: *const StatfxEngine) -> u32 {
    if engine.is_null() {
        return 0;
    }
    (*engine).0.enabled_channels().bits()
}

fn to_result(result: Result<(), EngineError>) -> StatfxResult {
    match result {
        Ok(()) => StatfxResult::Ok,
        Err(e) => {
            warn!(error = %e, "engine call failed");
            StatfxResult::from(&e)
        }
    }
}

// =============================================================================
// Easing Utilities
// =============================================================================

/// Curve code for a name; unknown names and NULL give the linear code.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_easing_from_name(name: *const c_char) -> u8 {
    if name.is_null() {
        return Easing::Linear.code();
    }
    CStr::from_ptr(name)
        .to_str()
        .map_or(Easing::Linear, lookup_by_name)
        .code()
}

/// Evaluate curve `code` at `t`; unknown codes evaluate as linear.
#[unsafe(no_mangle)]
pub extern "C" fn statfx_easing_apply(code: u8, t: f32) -> f32 {
    lookup(code).apply(t)
}

// =============================================================================
// Logging
// =============================================================================

/// Install the log subscriber, writing to `statfx.log` in `dir` (or stderr
/// when `dir` is NULL). Returns `false` if a subscriber already existed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn statfx_init_logging(dir: *const c_char) -> bool {
    if dir.is_null() {
        return crate::logging::init_tracing(None);
    }
    match CStr::from_ptr(dir).to_str() {
        Ok(dir) => crate::logging::init_tracing(Some(Path::new(dir))),
        Err(_) => false,
    }
}

// =============================================================================
// Version Information
// =============================================================================

/// Get the StatFX version string.
#[unsafe(no_mangle)]
pub extern "C" fn statfx_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr().cast::<c_char>()
}
