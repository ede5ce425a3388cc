use crate::domain::{Scale, ScaleError};
use crate::interface_adapters::protocol::WireSchema;
use std::{env, str::FromStr, time::Duration};

// Runtime/client constants (not protocol tuning).

pub const GREETING: &str = "Hello Server!";
pub const KEY_CHANNEL_CAPACITY: usize = 64;

pub const DEFAULT_SERVER_URL: &str = "ws://localhost:9001";
// 1000/60 ms, kept exact in nanoseconds.
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);
pub const DEFAULT_SURFACE_WIDTH: f64 = 1280.0;
pub const DEFAULT_SURFACE_HEIGHT: f64 = 720.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}=`{value}` is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("GRID_SCALE is invalid: {0}")]
    Scale(#[from] ScaleError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub server_url: String,
    pub schema: WireSchema,
    pub send_interval: Duration,
    pub scale: Scale,
    pub surface_width: f64,
    pub surface_height: f64,
    pub greeting: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            schema: WireSchema::default(),
            send_interval: DEFAULT_SEND_INTERVAL,
            scale: Scale::DEFAULT,
            surface_width: DEFAULT_SURFACE_WIDTH,
            surface_height: DEFAULT_SURFACE_HEIGHT,
            greeting: GREETING.to_string(),
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds settings from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let server_url = lookup("GAME_SERVER_URL").unwrap_or(defaults.server_url);

        let schema = parse_var(&lookup, "WIRE_SCHEMA")?.unwrap_or(defaults.schema);

        let send_interval = match parse_var::<f64>(&lookup, "SEND_INTERVAL_MS")? {
            Some(ms) => send_interval_from_ms(ms)?,
            None => defaults.send_interval,
        };

        let scale = match parse_var::<f64>(&lookup, "GRID_SCALE")? {
            Some(factor) => Scale::uniform(factor)?,
            None => defaults.scale,
        };

        let surface_width =
            surface_extent(&lookup, "SURFACE_WIDTH")?.unwrap_or(defaults.surface_width);
        let surface_height =
            surface_extent(&lookup, "SURFACE_HEIGHT")?.unwrap_or(defaults.surface_height);

        Ok(Self {
            server_url,
            schema,
            send_interval,
            scale,
            surface_width,
            surface_height,
            greeting: defaults.greeting,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        })
}

// A tick period must be at least one nanosecond once rounded.
fn send_interval_from_ms(ms: f64) -> Result<Duration, ConfigError> {
    let nanos = if ms.is_finite() && ms > 0.0 {
        (ms * 1_000_000.0).round() as u64
    } else {
        0
    };
    if nanos == 0 {
        return Err(ConfigError::Invalid {
            var: "SEND_INTERVAL_MS",
            value: ms.to_string(),
            reason: "must be a positive number of milliseconds".to_string(),
        });
    }
    Ok(Duration::from_nanos(nanos))
}

fn surface_extent(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<f64>, ConfigError> {
    match parse_var::<f64>(lookup, var)? {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ConfigError::Invalid {
            var,
            value: v.to_string(),
            reason: "must be a non-negative number of pixels".to_string(),
        }),
        other => Ok(other),
    }
}
