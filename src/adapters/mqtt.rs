//! MQTT notifier adapter.
//!
//! Implements [`NotifierPort`] by publishing one device-to-cloud message per
//! door transition to the IoT hub's events topic:
//!
//! ```text
//! devices/{device_id}/messages/events/   {"DoorStatus":"Opened"}
//! ```
//!
//! ## cfg gating
//!
//! - **`espidf` feature**: publishes through `esp_idf_svc::mqtt::client`
//!   at QoS 1.
//! - **host**: records published payloads in memory; `set_fail` forces
//!   the failure path.

use log::info;
use serde::Serialize;

use crate::app::ports::NotifierPort;
use crate::config::NetworkConfig;
use crate::detection::{DoorState, Transition};
use crate::error::CommsError;

#[cfg(feature = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, MqttClientConfiguration, QoS};

/// IoT hub MQTT API version sent in the username.
pub const IOTHUB_API_VERSION: &str = "2021-04-12";

/// Wire form of one door status message.
#[derive(Debug, Serialize)]
struct DoorStatusMessage {
    #[serde(rename = "DoorStatus")]
    door_status: DoorStatusValue,
}

#[derive(Debug, Serialize)]
enum DoorStatusValue {
    Closed,
    Opened,
}

impl From<DoorState> for DoorStatusValue {
    fn from(state: DoorState) -> Self {
        match state {
            DoorState::Closed => Self::Closed,
            DoorState::Open => Self::Opened,
        }
    }
}

/// Serialise the message body for a door that just entered `state`.
pub fn door_status_payload(state: DoorState) -> Result<Vec<u8>, CommsError> {
    serde_json::to_vec(&DoorStatusMessage {
        door_status: state.into(),
    })
    .map_err(|_| CommsError::EncodeFailed)
}

/// Username the hub expects: `{host}/{device_id}/?api-version=...`.
///
/// The host is taken from the broker URL with scheme and port removed.
pub fn iothub_username(mqtt_url: &str, device_id: &str) -> heapless::String<256> {
    let without_scheme = mqtt_url.split_once("://").map_or(mqtt_url, |(_, rest)| rest);
    let host = without_scheme
        .split(['/', ':'])
        .next()
        .unwrap_or(without_scheme);
    let mut username = heapless::String::new();
    // 128-byte host + 64-byte id + 27 bytes of framing always fits.
    let _ = core::fmt::write(
        &mut username,
        format_args!("{}/{}/?api-version={}", host, device_id, IOTHUB_API_VERSION),
    );
    username
}

pub struct MqttNotifier {
    topic: heapless::String<128>,
    published: u32,
    #[cfg(feature = "espidf")]
    client: EspMqttClient<'static>,
    #[cfg(not(feature = "espidf"))]
    sent: Vec<Vec<u8>>,
    #[cfg(not(feature = "espidf"))]
    fail: bool,
}

impl MqttNotifier {
    /// Connect to the hub described by `network`.
    #[cfg(feature = "espidf")]
    pub fn connect(network: &NetworkConfig) -> Result<Self, CommsError> {
        let username = iothub_username(&network.mqtt_url, &network.device_id);
        let conf = MqttClientConfiguration {
            client_id: Some(network.device_id.as_str()),
            username: Some(username.as_str()),
            password: Some(network.mqtt_password.as_str()),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let client = EspMqttClient::new_cb(network.mqtt_url.as_str(), &conf, |event| {
            log::debug!("MQTT event: {:?}", event.payload());
        })
        .map_err(|e| {
            log::error!("MQTT: client init failed: {}", e);
            CommsError::MqttConnectFailed
        })?;
        info!("MQTT: client started for '{}'", network.device_id);
        Ok(Self {
            topic: network.events_topic(),
            published: 0,
            client,
        })
    }

    /// In-memory notifier publishing to the events topic of `network`.
    #[cfg(not(feature = "espidf"))]
    pub fn connect(network: &NetworkConfig) -> Result<Self, CommsError> {
        info!("MQTT(sim): recording messages for '{}'", network.device_id);
        Ok(Self {
            topic: network.events_topic(),
            published: 0,
            sent: Vec::new(),
            fail: false,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Messages handed to the broker since boot.
    pub fn published(&self) -> u32 {
        self.published
    }

    /// Payloads recorded so far, oldest first.
    #[cfg(not(feature = "espidf"))]
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Make subsequent publishes fail (or succeed again).
    #[cfg(not(feature = "espidf"))]
    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    #[cfg(feature = "espidf")]
    fn platform_publish(&mut self, payload: &[u8]) -> Result<(), CommsError> {
        self.client
            .publish(&self.topic, QoS::AtLeastOnce, false, payload)
            .map(|_| ())
            .map_err(|e| {
                log::error!("MQTT: publish failed: {}", e);
                CommsError::MqttPublishFailed
            })
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_publish(&mut self, payload: &[u8]) -> Result<(), CommsError> {
        if self.fail {
            return Err(CommsError::MqttPublishFailed);
        }
        self.sent.push(payload.to_vec());
        Ok(())
    }
}

impl NotifierPort for MqttNotifier {
    fn notify(&mut self, transition: &Transition) -> Result<(), CommsError> {
        let payload = door_status_payload(transition.to)?;
        self.platform_publish(&payload)?;
        self.published += 1;
        info!(
            "MQTT: {} -> {} sent to {}",
            transition.from, transition.to, self.topic
        );
        Ok(())
    }
}
