//! Four-line text status display.
//!
//! Mirrors the layout of the node's 128x64 OLED: line 0 carries the
//! headline, lines 1-2 carry numbers, line 3 carries hints.  Lines are
//! fixed-capacity strings; text that does not fit is truncated.  Only
//! lines whose content actually changed are written to the log, so a
//! steady reading does not flood the console.

use core::fmt::Write;

use log::info;

use crate::app::ports::{DisplayPort, DisplayStatus};
use crate::detection::DoorState;

pub const LINE_COUNT: usize = 4;
pub const LINE_WIDTH: usize = 32;

pub type Line = heapless::String<LINE_WIDTH>;

#[derive(Debug, Default)]
pub struct TextDisplay {
    lines: [Line; LINE_COUNT],
    /// Number of line writes that changed content.
    updates: u32,
}

impl TextDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, idx: usize) -> &str {
        self.lines.get(idx).map_or("", |l| l.as_str())
    }

    pub fn updates(&self) -> u32 {
        self.updates
    }

    fn print(&mut self, idx: usize, args: core::fmt::Arguments<'_>) {
        let mut text = Line::new();
        // Overflow only truncates.
        let _ = text.write_fmt(args);
        let Some(slot) = self.lines.get_mut(idx) else {
            return;
        };
        if *slot != text {
            info!("LCD[{}] {}", idx, text);
            *slot = text;
            self.updates += 1;
        }
    }

    fn clear(&mut self, idx: usize) {
        self.print(idx, format_args!(""));
    }
}

impl DisplayPort for TextDisplay {
    fn show(&mut self, status: &DisplayStatus) {
        match *status {
            DisplayStatus::Offline => {
                self.print(0, format_args!("DoorMonitor"));
                self.print(2, format_args!("No IoT Hub"));
            }
            DisplayStatus::Calibrating(progress) => {
                self.print(0, format_args!("Calibrating"));
                self.print(1, format_args!("remaining {}", progress.remaining()));
            }
            DisplayStatus::Calibrated(baseline) => {
                self.print(0, format_args!("Monitoring"));
                self.print(1, format_args!("base: {:.1}", baseline.value()));
                self.clear(2);
                self.clear(3);
            }
            DisplayStatus::Reading {
                baseline,
                magnitude,
            } => {
                self.print(1, format_args!("base: {:.1}", baseline));
                self.print(2, format_args!("magnet: {:.1}", magnitude));
            }
            DisplayStatus::Door(state) => {
                let headline = match state {
                    DoorState::Closed => "Door closed",
                    DoorState::Open => "Door open",
                };
                self.print(0, format_args!("{}", headline));
            }
            DisplayStatus::Fault => {
                self.print(0, format_args!("DoorMonitor"));
                self.print(3, format_args!("Fault: halted"));
            }
        }
    }
}
