//! System configuration parameters
//!
//! All tunable parameters for the DoorMonitor node.  Detection tuning lives
//! in [`SystemConfig`]; network identity lives in [`NetworkConfig`] and is
//! baked in at build time.

use serde::{Deserialize, Serialize};

use crate::detection::calibrator::{DEFAULT_REQUIRED_STABLE, DEFAULT_STABILITY_THRESHOLD};
use crate::detection::detector::DEFAULT_HYSTERESIS_DELTA;
use crate::detection::DoorState;
use crate::error::{Error, Result};

/// Firmware version string recorded in the audit log.
pub const APP_VERSION: &str = "ver=1.0";

/// Solution name reported to the IoT hub.
pub const SOLUTION_NAME: &str = "DoorMonitor";

/// Core detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Calibration ---
    /// Per-axis delta (raw units) below which a sample counts as stable
    pub stability_threshold: u32,
    /// Consecutive stable samples needed to fix the baseline
    pub required_stable_samples: u32,
    /// Restart calibration after this many seconds without converging (0 = wait forever)
    pub calibration_timeout_secs: u32,

    // --- Detection ---
    /// Hysteresis margin below the baseline (magnitude units)
    pub hysteresis_delta: f64,
    /// Door state assumed right after calibration
    pub initial_door_state: DoorState,

    // --- Timing ---
    /// Poll interval (milliseconds)
    pub poll_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Calibration
            stability_threshold: DEFAULT_STABILITY_THRESHOLD,
            required_stable_samples: DEFAULT_REQUIRED_STABLE,
            calibration_timeout_secs: 0,

            // Detection
            hysteresis_delta: DEFAULT_HYSTERESIS_DELTA,
            initial_door_state: DoorState::Closed,

            // Timing
            poll_interval_ms: 1000, // 1 Hz
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<()> {
        if self.stability_threshold == 0 {
            return Err(Error::Config("stability_threshold must be > 0"));
        }
        if self.required_stable_samples == 0 {
            return Err(Error::Config("required_stable_samples must be > 0"));
        }
        if !self.hysteresis_delta.is_finite() || self.hysteresis_delta < 0.0 {
            return Err(Error::Config("hysteresis_delta must be finite and >= 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be > 0"));
        }
        Ok(())
    }

    /// Duration of one poll in seconds.
    pub fn poll_period_secs(&self) -> f32 {
        self.poll_interval_ms as f32 / 1000.0
    }
}

/// Network identity and credentials.
///
/// Populated from `DOORMON_*` environment variables at compile time so no
/// secrets live in the source tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
    /// e.g. `mqtts://myhub.azure-devices.net:8883`
    pub mqtt_url: heapless::String<128>,
    pub device_id: heapless::String<64>,
    /// SAS token or password for the MQTT session
    pub mqtt_password: heapless::String<256>,
}

impl NetworkConfig {
    pub fn from_build_env() -> Result<Self> {
        Ok(Self {
            wifi_ssid: fill(option_env!("DOORMON_WIFI_SSID"), "DOORMON_WIFI_SSID too long")?,
            wifi_password: fill(option_env!("DOORMON_WIFI_PASS"), "DOORMON_WIFI_PASS too long")?,
            mqtt_url: fill(option_env!("DOORMON_MQTT_URL"), "DOORMON_MQTT_URL too long")?,
            device_id: fill(option_env!("DOORMON_DEVICE_ID"), "DOORMON_DEVICE_ID too long")?,
            mqtt_password: fill(option_env!("DOORMON_MQTT_PASS"), "DOORMON_MQTT_PASS too long")?,
        })
    }

    /// IoT hub device-to-cloud topic for this device.
    pub fn events_topic(&self) -> heapless::String<128> {
        let mut topic = heapless::String::new();
        // 64-byte id + 28 bytes of framing always fits.
        let _ = core::fmt::write(
            &mut topic,
            format_args!("devices/{}/messages/events/", self.device_id),
        );
        topic
    }
}

fn fill<const N: usize>(value: Option<&str>, err: &'static str) -> Result<heapless::String<N>> {
    let mut s = heapless::String::new();
    s.push_str(value.unwrap_or_default()).map_err(|_| Error::Config(err))?;
    Ok(s)
}
