//! Settings file loading.
//!
//! Settings live in a TOML file (by default [`DEFAULT_FILE_NAME`]) with an
//! optional `[global]` table and one optional table per channel:
//!
//! ```toml
//! [global]
//! sleep_time = 25            # ms between ticks
//! reload = true              # re-read on every start
//!
//! [stamina]
//! effect_id = "StatFXImodStam"
//! tint = "#40FF4080"
//! range = "0.0, 0.6"         # end, start
//! easing = "easeInQuad"
//! fade_time = "1.5, 0.75"    # seconds; falling, rising
//! ```
//!
//! A defect in one key never fails the load: the key falls back to its
//! default and a warning names the section. Numbers may be quoted, as in
//! `min_delta = "0.02"`. Only an unreadable file or invalid TOML syntax is
//! an error.

mod profile;
mod raw;

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::control::{Channel, ChannelConfig, ChannelId, ChannelMask, EPSILON};
use crate::easing::{find_by_name, Easing};
use crate::error::ConfigError;

pub use profile::{Cinematic, EffectProfile, Tint};
use raw::{RawChannel, RawGlobal, RawSettings, Scalar, Scalars};

/// File name looked up next to the host when no path is given.
pub const DEFAULT_FILE_NAME: &str = "StatFX.toml";

/// Default loop period.
pub const DEFAULT_SLEEP_TIME: Duration = Duration::from_millis(25);

/// Default number of loop periods to back off after a failed tick.
pub const DEFAULT_FAILURE_COOLDOWN_TICKS: u32 = 20;

/// Settings shared by every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    /// Loop period.
    pub sleep_time: Duration,
    /// Re-read the settings file on every start.
    pub reload: bool,
    /// Loop periods to back off after a failed tick.
    pub failure_cooldown_ticks: u32,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            sleep_time: DEFAULT_SLEEP_TIME,
            reload: true,
            failure_cooldown_ticks: DEFAULT_FAILURE_COOLDOWN_TICKS,
        }
    }
}

impl GlobalSettings {
    /// Back-off after a failed tick.
    pub fn failure_cooldown(&self) -> Duration {
        self.sleep_time * self.failure_cooldown_ticks
    }
}

/// Resolved settings for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSettings {
    /// Whether the channel is ticked at all.
    pub enabled: bool,
    /// Host effect the channel drives.
    pub effect_id: String,
    /// Static look pushed to the sink.
    pub profile: EffectProfile,
    /// Smoothing and curve tuning.
    pub control: ChannelConfig,
}

impl ChannelSettings {
    /// Defaults for `channel`.
    pub fn defaults(channel: ChannelId) -> Self {
        Self {
            enabled: true,
            effect_id: channel.default_effect_id().to_owned(),
            profile: EffectProfile::default(),
            control: ChannelConfig::default(),
        }
    }

    /// A fresh controller for `channel` with these settings.
    pub fn build_channel(&self, channel: ChannelId) -> Channel {
        Channel::new(channel, self.effect_id.clone(), self.control).with_enabled(self.enabled)
    }
}

/// Complete settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `[global]`
    pub global: GlobalSettings,
    /// `[health]`
    pub health: ChannelSettings,
    /// `[stamina]`
    pub stamina: ChannelSettings,
    /// `[magicka]`
    pub magicka: ChannelSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            global: GlobalSettings::default(),
            health: ChannelSettings::defaults(ChannelId::Health),
            stamina: ChannelSettings::defaults(ChannelId::Stamina),
            magicka: ChannelSettings::defaults(ChannelId::Magicka),
        }
    }
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A missing file yields defaults with a warning.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file exists but cannot be read,
    /// [`ConfigError::Parse`] when it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "settings file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the text is not valid TOML. Keys with
    /// unusable values fall back to their defaults instead.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let raw: RawSettings = toml::from_str(text)?;
        Ok(Self::from_raw(&raw))
    }

    fn from_raw(raw: &RawSettings) -> Self {
        let global = resolve_global(&raw.global);
        Self {
            health: resolve_channel(ChannelId::Health, &raw.health, global.sleep_time),
            stamina: resolve_channel(ChannelId::Stamina, &raw.stamina, global.sleep_time),
            magicka: resolve_channel(ChannelId::Magicka, &raw.magicka, global.sleep_time),
            global,
        }
    }

    /// Settings of one channel.
    pub const fn channel(&self, channel: ChannelId) -> &ChannelSettings {
        match channel {
            ChannelId::Health => &self.health,
            ChannelId::Stamina => &self.stamina,
            ChannelId::Magicka => &self.magicka,
        }
    }

    /// Channels that are ticked.
    pub fn enabled_channels(&self) -> ChannelMask {
        ChannelId::ALL
            .into_iter()
            .filter(|id| self.channel(*id).enabled)
            .collect()
    }

    /// Fresh controllers for every channel, in tick order.
    pub fn build_channels(&self) -> Vec<Channel> {
        ChannelId::ALL
            .into_iter()
            .map(|id| self.channel(id).build_channel(id))
            .collect()
    }

    /// Log one summary line for the globals and each enabled channel.
    pub fn log_summary(&self) {
        info!(
            sleep_time_ms = self.global.sleep_time.as_millis() as u64,
            reload = self.global.reload,
            failure_cooldown_ticks = self.global.failure_cooldown_ticks,
            "global settings"
        );
        for id in ChannelId::ALL {
            let settings = self.channel(id);
            if !settings.enabled {
                info!(channel = %id, "channel disabled");
                continue;
            }
            let tint = settings.profile.tint;
            let control = &settings.control;
            info!(
                channel = %id,
                effect = %settings.effect_id,
                tint = ?(tint.r, tint.g, tint.b, tint.a),
                contrast = ?settings.profile.contrast,
                brightness = ?settings.profile.brightness,
                saturation = ?settings.profile.saturation,
                range = ?(control.start_fraction, control.end_fraction),
                curve = %control.easing,
                min_delta = control.min_delta,
                max_delta = control.max_delta_neg,
                max_delta_pos = control.max_delta_pos,
                "channel settings"
            );
        }
    }
}

fn resolve_global(raw: &RawGlobal) -> GlobalSettings {
    let mut global = GlobalSettings::default();

    if let Some(ms) = read_integer("global", "sleep_time", raw.sleep_time.as_ref()) {
        match u64::try_from(ms) {
            Ok(ms) if ms > 0 => global.sleep_time = Duration::from_millis(ms),
            _ => warn!(section = "global", sleep_time = ms, "sleep_time must be at least 1 ms, using default"),
        }
    }
    if let Some(reload) = read_bool("global", "reload", raw.reload.as_ref()) {
        global.reload = reload;
    }
    if let Some(ticks) = read_integer("global", "failure_cooldown_ticks", raw.failure_cooldown_ticks.as_ref()) {
        match u32::try_from(ticks) {
            Ok(ticks) if ticks > 0 => global.failure_cooldown_ticks = ticks,
            _ => warn!(
                section = "global",
                failure_cooldown_ticks = ticks,
                "failure_cooldown_ticks must be at least 1, using default"
            ),
        }
    }
    global
}

fn resolve_channel(id: ChannelId, raw: &RawChannel, sleep_time: Duration) -> ChannelSettings {
    let section = id.name();
    let mut settings = ChannelSettings::defaults(id);
    settings.enabled = !read_bool(section, "disabled", raw.disabled.as_ref()).unwrap_or(false);

    if let Some(effect_id) = read_text(section, "effect_id", raw.effect_id.as_ref()) {
        let effect_id = effect_id.trim();
        if effect_id.is_empty() {
            warn!(section = %id, "effect_id is empty, using default");
        } else {
            settings.effect_id = effect_id.to_owned();
        }
    }

    settings.profile = resolve_profile(id, raw);

    let defaults = ChannelConfig::default();
    let (start, end) = resolve_range(id, raw);
    let easing = resolve_easing(id, raw);

    let (mut max_delta_neg, mut max_delta_pos) = (defaults.max_delta_neg, defaults.max_delta_pos);
    if let Some((neg, pos)) = resolve_fade_time(id, raw, (start - end).abs(), sleep_time) {
        max_delta_neg = neg;
        max_delta_pos = pos;
    }

    let mut min_delta = defaults.min_delta;
    if let Some(value) = read_number(section, "min_delta", raw.min_delta.as_ref()) {
        min_delta = checked_delta(id, "min_delta", value, defaults.min_delta, true);
    }
    if let Some(value) = read_number(section, "max_delta", raw.max_delta.as_ref()) {
        max_delta_neg = checked_delta(id, "max_delta", value, defaults.max_delta_neg, false);
        max_delta_pos = max_delta_neg;
    }
    if let Some(value) = read_number(section, "max_delta_pos", raw.max_delta_pos.as_ref()) {
        max_delta_pos = checked_delta(id, "max_delta_pos", value, defaults.max_delta_pos, false);
    }

    settings.control = ChannelConfig {
        start_fraction: start,
        end_fraction: end,
        easing,
        min_delta,
        max_delta_neg,
        max_delta_pos,
    }
    .normalized(id);
    settings
}

fn resolve_profile(id: ChannelId, raw: &RawChannel) -> EffectProfile {
    let section = id.name();
    let mut tint = Tint::NONE;
    if let Some(value) = &raw.tint {
        let parsed = match value {
            Scalars::Text(text) => Tint::parse(text),
            Scalars::Many(vs) => {
                let mut components = [0.0_f32; 4];
                for (slot, v) in components.iter_mut().zip(vs) {
                    *slot = *v;
                }
                let [r, g, b, a] = components;
                Some(Tint::new(r, g, b, a))
            }
            Scalars::One(_) | Scalars::Other(_) => None,
        };
        match parsed {
            Some(parsed) => tint = parsed,
            None => warn!(section = %id, tint = %value.describe(), "could not understand tint, using no tint"),
        }
    }
    if let Some(a) = read_number(section, "tint_strength", raw.tint_strength.as_ref()) {
        tint.a = a;
    }
    if let Some(r) = read_number(section, "tint_red", raw.tint_red.as_ref()) {
        tint.r = r;
    }
    if let Some(g) = read_number(section, "tint_green", raw.tint_green.as_ref()) {
        tint.g = g;
    }
    if let Some(b) = read_number(section, "tint_blue", raw.tint_blue.as_ref()) {
        tint.b = b;
    }
    tint = tint.scaled();
    if !tint.is_valid() {
        warn!(
            section = %id,
            r = tint.r,
            g = tint.g,
            b = tint.b,
            a = tint.a,
            "tint component out of range, using no tint"
        );
        tint = Tint::NONE;
    }

    let cinematic = |add_key: &str, add: Option<&Scalar>, mult_key: &str, mult: Option<&Scalar>| {
        let mut value = Cinematic::default();
        if let Some(add) = read_number(section, add_key, add) {
            value.add = add;
        }
        if let Some(mult) = read_number(section, mult_key, mult) {
            value.mult = mult;
        }
        value
    };

    EffectProfile {
        tint,
        contrast: cinematic(
            "contrast_add",
            raw.contrast_add.as_ref(),
            "contrast_mult",
            raw.contrast_mult.as_ref(),
        ),
        brightness: cinematic(
            "brightness_add",
            raw.brightness_add.as_ref(),
            "brightness_mult",
            raw.brightness_mult.as_ref(),
        ),
        saturation: cinematic(
            "saturation_add",
            raw.saturation_add.as_ref(),
            "saturation_mult",
            raw.saturation_mult.as_ref(),
        ),
    }
}

/// `(start, end)` of the window, before normalization.
fn resolve_range(id: ChannelId, raw: &RawChannel) -> (f32, f32) {
    let defaults = ChannelConfig::default();
    let (mut start, mut end) = (defaults.start_fraction, defaults.end_fraction);
    let in_unit = |v: f32| (0.0..=1.0).contains(&v);

    if let Some(range) = &raw.range {
        match range.values().as_deref() {
            Some(&[lo, hi]) if in_unit(lo) && in_unit(hi) => {
                end = lo;
                start = hi;
            }
            Some(&[_, _]) => {
                warn!(section = %id, range = %range.describe(), "range must lie within 0 to 1, using defaults");
            }
            _ => {
                warn!(section = %id, range = %range.describe(), "could not understand range, expected \"end, start\"");
            }
        }
    }

    if let Some(value) = read_number(id.name(), "start_fraction", raw.start_fraction.as_ref()) {
        start = value;
    }
    if let Some(value) = read_number(id.name(), "end_fraction", raw.end_fraction.as_ref()) {
        end = value;
    }
    if !in_unit(start) || !in_unit(end) {
        warn!(section = %id, start, end, "start_fraction and end_fraction must lie within 0 to 1, using defaults");
        start = defaults.start_fraction;
        end = defaults.end_fraction;
    }
    (start, end)
}

fn resolve_easing(id: ChannelId, raw: &RawChannel) -> Easing {
    let Some(name) = read_text(id.name(), "easing", raw.easing.as_ref()) else {
        return Easing::Linear;
    };
    find_by_name(&name).unwrap_or_else(|| {
        warn!(section = %id, easing = %name, "no match for easing curve, using linear");
        Easing::Linear
    })
}

/// `(max_delta_neg, max_delta_pos)` from a fade time in seconds.
///
/// A fade needs a window to cross; with a zero-width window the fade time
/// is ignored and the default deltas stay.
fn resolve_fade_time(
    id: ChannelId,
    raw: &RawChannel,
    width: f32,
    sleep_time: Duration,
) -> Option<(f32, f32)> {
    let fade = raw.fade_time.as_ref()?;
    if width < EPSILON {
        warn!(section = %id, fade_time = %fade.describe(), "fade_time needs a range with width, ignoring");
        return None;
    }
    let (neg_secs, pos_secs) = match fade.values().as_deref() {
        Some(&[both]) => (both, both),
        Some(&[neg, pos]) => (neg, pos),
        _ => {
            warn!(section = %id, fade_time = %fade.describe(), "could not understand fade_time, ignoring");
            return None;
        }
    };
    let usable = |secs: f32| secs.is_finite() && secs > 0.0;
    if !usable(neg_secs) || !usable(pos_secs) {
        warn!(section = %id, fade_time = %fade.describe(), "fade_time must be positive, ignoring");
        return None;
    }

    let tick_ms = sleep_time.as_secs_f32() * 1000.0;
    let to_delta = |secs: f32| width / (secs * 1000.0 / tick_ms).round().max(1.0);
    let deltas = (to_delta(neg_secs), to_delta(pos_secs));
    info!(
        section = %id,
        fade_time = %fade.describe(),
        max_delta = deltas.0,
        max_delta_pos = deltas.1,
        "fade_time converted to deltas"
    );
    Some(deltas)
}

fn read_number(section: &str, key: &str, value: Option<&Scalar>) -> Option<f32> {
    let value = value?;
    let number = value.as_f32().filter(|v| v.is_finite());
    if number.is_none() {
        warn!(section, key, value = %value.describe(), "expected a number, using default");
    }
    number
}

fn read_integer(section: &str, key: &str, value: Option<&Scalar>) -> Option<i64> {
    let value = value?;
    let number = value.as_i64();
    if number.is_none() {
        warn!(section, key, value = %value.describe(), "expected a whole number, using default");
    }
    number
}

fn read_bool(section: &str, key: &str, value: Option<&Scalar>) -> Option<bool> {
    let value = value?;
    let flag = value.as_bool();
    if flag.is_none() {
        warn!(section, key, value = %value.describe(), "expected true or false, using default");
    }
    flag
}

fn read_text(section: &str, key: &str, value: Option<&Scalar>) -> Option<String> {
    let value = value?;
    let text = value.as_text();
    if text.is_none() {
        warn!(section, key, value = %value.describe(), "expected text, using default");
    }
    text
}

fn checked_delta(id: ChannelId, key: &str, value: f32, default: f32, allow_zero: bool) -> f32 {
    let usable = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if usable {
        value
    } else {
        warn!(section = %id, key, value, "delta must be a positive number, using default");
        default
    }
}
