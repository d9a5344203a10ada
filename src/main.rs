//! DoorMonitor firmware: main entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                    │
//! │                                                           │
//! │  Lis2mdl (SensorPort)   MqttNotifier (NotifierPort)       │
//! │  TextDisplay (Display)  LogEventSink (EventSink)          │
//! │  WifiAdapter (ConnectivityPort)                           │
//! │                                                           │
//! │  ─────────────── Port Trait Boundary ──────────────────   │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │            AppService (pure logic)                  │  │
//! │  │  FSM · Calibrator · DoorStateDetector               │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use doormonitor::adapters::display::TextDisplay;
use doormonitor::adapters::log_sink::LogEventSink;
use doormonitor::adapters::mqtt::MqttNotifier;
use doormonitor::adapters::wifi::{ConnectivityPort, WifiAdapter};
use doormonitor::app::ports::{DisplayPort, DisplayStatus};
use doormonitor::app::service::AppService;
use doormonitor::config::{NetworkConfig, SOLUTION_NAME, SystemConfig};
use doormonitor::error::Error;
use doormonitor::sensors::Lis2mdl;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("{} v{}", SOLUTION_NAME, env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let config = SystemConfig::default();
    let network = NetworkConfig::from_build_env()?;
    let mut display = TextDisplay::new();
    let mut sink = LogEventSink::new();

    // ── 2. WiFi ───────────────────────────────────────────────
    let driver = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = WifiAdapter::new(BlockingWifi::wrap(driver, sysloop)?);
    wifi.set_credentials(&network.wifi_ssid, &network.wifi_password)
        .map_err(|e| anyhow!("WiFi credentials: {e}"))?;
    if let Err(e) = wifi.connect() {
        warn!("WiFi unavailable at boot ({}), waiting offline", e);
    }

    // ── 3. IoT hub client ─────────────────────────────────────
    let mut notifier = MqttNotifier::connect(&network).map_err(Error::from)?;

    // ── 4. Magnetometer on I2C0 (SDA=GPIO21, SCL=GPIO22) ──────
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(400.kHz().into()),
    )?;
    let mut magnetometer = Lis2mdl::new(i2c);
    magnetometer.init().map_err(Error::from)?;

    // ── 5. Application core ───────────────────────────────────
    let poll_ms = config.poll_interval_ms;
    let mut app = AppService::new(config)?;
    app.start(wifi.is_connected(), &mut sink);
    if !wifi.is_connected() {
        display.show(&DisplayStatus::Offline);
    }

    info!("System ready. Entering poll loop ({} ms).", poll_ms);

    // ── 6. Poll loop ──────────────────────────────────────────
    loop {
        FreeRtos::delay_ms(poll_ms);

        if !wifi.is_connected() {
            if let Err(e) = wifi.connect() {
                warn!("WiFi reconnect failed: {}", e);
            }
        }
        app.set_link(wifi.is_connected());

        // Failures are already reported through the sink.
        let _ = app.tick(&mut magnetometer, &mut notifier, &mut display, &mut sink);
    }
}
