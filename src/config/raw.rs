//! Serde mirror of the settings file. Every field is optional and accepts
//! any TOML value; type checks, validation and defaults live in the
//! parent module, so one mistyped key never fails the whole file.

use serde::{Deserialize, Deserializer};
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawSettings {
    #[serde(deserialize_with = "section")]
    pub global: RawGlobal,
    #[serde(deserialize_with = "section")]
    pub health: RawChannel,
    #[serde(deserialize_with = "section")]
    pub stamina: RawChannel,
    #[serde(deserialize_with = "section")]
    pub magicka: RawChannel,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawGlobal {
    pub sleep_time: Option<Scalar>,
    pub reload: Option<Scalar>,
    pub failure_cooldown_ticks: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawChannel {
    pub disabled: Option<Scalar>,
    #[serde(alias = "editor_id")]
    pub effect_id: Option<Scalar>,

    #[serde(alias = "tint_color")]
    pub tint: Option<Scalars>,
    #[serde(alias = "tint_alpha")]
    pub tint_strength: Option<Scalar>,
    pub tint_red: Option<Scalar>,
    pub tint_green: Option<Scalar>,
    pub tint_blue: Option<Scalar>,

    pub contrast_add: Option<Scalar>,
    pub contrast_mult: Option<Scalar>,
    pub brightness_add: Option<Scalar>,
    pub brightness_mult: Option<Scalar>,
    pub saturation_add: Option<Scalar>,
    pub saturation_mult: Option<Scalar>,

    pub range: Option<Scalars>,
    pub start_fraction: Option<Scalar>,
    pub end_fraction: Option<Scalar>,

    #[serde(alias = "easing_function")]
    #[serde(alias = "easing_func")]
    #[serde(alias = "easing_curve")]
    #[serde(alias = "ease")]
    #[serde(alias = "ease_func")]
    #[serde(alias = "ease_function")]
    #[serde(alias = "ease_curve")]
    #[serde(alias = "function")]
    #[serde(alias = "curve")]
    #[serde(alias = "curve_type")]
    #[serde(alias = "curve_function")]
    #[serde(alias = "curve_func")]
    pub easing: Option<Scalar>,

    #[serde(alias = "transition_time")]
    #[serde(alias = "transition")]
    #[serde(alias = "time")]
    #[serde(alias = "fade")]
    #[serde(alias = "fade_duration")]
    #[serde(alias = "fade_seconds")]
    #[serde(alias = "fade_secs")]
    #[serde(alias = "fade_s")]
    pub fade_time: Option<Scalars>,

    pub min_delta: Option<Scalar>,
    pub max_delta: Option<Scalar>,
    pub max_delta_pos: Option<Scalar>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Section<T> {
    Table(T),
    Other(toml::Value),
}

/// A section that is not a table is replaced by its defaults.
fn section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(match Section::<T>::deserialize(deserializer)? {
        Section::Table(table) => table,
        Section::Other(value) => {
            warn!(value = %value, "settings section is not a table, using defaults");
            T::default()
        }
    })
}

/// A single value as written, numbers possibly quoted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(toml::Value),
}

impl Scalar {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Int(v) => Some(*v as f32),
            Self::Float(v) => Some(*v as f32),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Bool(_) | Self::Other(_) => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(*v as i64),
            Self::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Text as written; integers are accepted so curve codes resolve.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Int(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// Original text, for log messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(text) => text.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

/// A value that may be written as a number, a list of numbers, or a
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum Scalars {
    One(f32),
    Many(Vec<f32>),
    Text(String),
    Other(toml::Value),
}

impl Scalars {
    /// The written numbers, or `None` when any of them is unreadable.
    pub fn values(&self) -> Option<Vec<f32>> {
        match self {
            Self::One(v) => Some(vec![*v]),
            Self::Many(vs) => Some(vs.clone()),
            Self::Text(text) => text
                .split(',')
                .map(|part| {
                    part.trim()
                        .trim_matches(|c| c == '(' || c == ')')
                        .trim()
                        .parse::<f32>()
                        .ok()
                })
                .collect(),
            Self::Other(_) => None,
        }
    }

    /// Original text, for log messages.
    pub fn describe(&self) -> String {
        match self {
            Self::One(v) => v.to_string(),
            Self::Many(vs) => format!("{vs:?}"),
            Self::Text(text) => text.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}
