//! # Render Configuration
//!
//! Deployment conventions consumed by the view layer: the display-zone
//! offset applied when formatting zone-aware timestamps for clients, and
//! the service name used for log routing.
//!
//! The default offset is UTC+8 — a deployment convention inherited from the
//! original service, not a protocol requirement. It is always configurable;
//! no call site hardcodes it.

use chrono::{FixedOffset, Offset, Utc};

/// Environment variable overriding the display-zone offset, in minutes
/// east of UTC.
pub const DISPLAY_ZONE_ENV: &str = "VOBJ_DISPLAY_ZONE_MINUTES";

/// Environment variable overriding the service name.
pub const SERVICE_NAME_ENV: &str = "VOBJ_SERVICE_NAME";

/// Default display-zone offset: UTC+8, in minutes.
const DEFAULT_DISPLAY_ZONE_MINUTES: i32 = 8 * 60;

/// Default service name.
const DEFAULT_SERVICE_NAME: &str = "vobj";

/// Configuration consumed by the view layer.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Zone applied when formatting zone-aware timestamps for display.
    pub display_zone: FixedOffset,
    /// Service name used for log routing by the surrounding service.
    pub service_name: String,
}

impl ViewConfig {
    /// Build a configuration from an explicit offset (minutes east of UTC)
    /// and service name. Out-of-range offsets fall back to the default.
    pub fn new(display_zone_minutes: i32, service_name: impl Into<String>) -> Self {
        Self {
            display_zone: offset_from_minutes(display_zone_minutes)
                .unwrap_or_else(default_display_zone),
            service_name: service_name.into(),
        }
    }

    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Unparseable values are logged at warn level and replaced with the
    /// defaults rather than failing startup.
    pub fn from_env() -> Self {
        let display_zone = match std::env::var(DISPLAY_ZONE_ENV) {
            Ok(raw) => match raw.parse::<i32>().ok().and_then(offset_from_minutes) {
                Some(zone) => zone,
                None => {
                    tracing::warn!(
                        value = %raw,
                        "unparseable display-zone offset, using default"
                    );
                    default_display_zone()
                }
            },
            Err(_) => default_display_zone(),
        };
        let service_name =
            std::env::var(SERVICE_NAME_ENV).unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_owned());
        Self {
            display_zone,
            service_name,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            display_zone: default_display_zone(),
            service_name: DEFAULT_SERVICE_NAME.to_owned(),
        }
    }
}

/// Convert an offset in minutes east of UTC to a `FixedOffset`, if in range.
fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

/// The UTC+8 default. The multiplication is in range, so the fallback to
/// plain UTC is unreachable in practice.
fn default_display_zone() -> FixedOffset {
    offset_from_minutes(DEFAULT_DISPLAY_ZONE_MINUTES).unwrap_or_else(|| Utc.fix())
}
