//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements       | Connects to               |
//! |------------|------------------|---------------------------|
//! | `hardware` | SensorPort       | LIS2MDL over I2C          |
//! | `display`  | DisplayPort      | 4-line status text (log)  |
//! | `log_sink` | EventSink        | Serial log output         |
//! | `mqtt`     | NotifierPort     | IoT hub MQTT events topic |
//! | `wifi`     | ConnectivityPort | ESP-IDF WiFi STA          |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod wifi;
