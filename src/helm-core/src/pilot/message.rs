// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Typed messages exchanged over the instrument bus.
//!
//! Messages are immutable, timestamped value objects: one observed fact or
//! one control intent each. The kind set is closed ([`Message`]); adding a
//! kind means adding a variant here and a handler to the bus listener trait.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

fn unix_ms_now() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis() as u64)
}

/// Directive currently applied to the rudder by the autopilot executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AutopilotCommand {
    Port,
    Starboard,
    Brake,
    Free,
}

/// Calibrated voltage reading for one analog channel.
#[derive(Debug, Clone, Serialize)]
pub struct VoltageMeasurement {
    /// Stable channel id used by downstream consumers.
    pub channel: u8,
    pub label: String,
    pub volts: f64,
    /// Unix timestamp in milliseconds, `Option` for serialization.
    pub at: Option<u64>,
}

impl VoltageMeasurement {
    pub fn new(channel: u8, label: impl Into<String>, volts: f64) -> Self {
        Self {
            channel,
            label: label.into(),
            volts,
            at: unix_ms_now(),
        }
    }
}

/// Current physical rudder angle in radians, positive to starboard.
#[derive(Debug, Clone, Serialize)]
pub struct RudderMessage {
    pub angle: f64,
    pub at: Option<u64>,
}

impl RudderMessage {
    pub fn new(angle: f64) -> Self {
        Self {
            angle,
            at: unix_ms_now(),
        }
    }
}

/// Course and calibration quality from the heading sensor.
#[derive(Debug, Clone, Serialize)]
pub struct ImuMessage {
    /// Compass course in radians.
    pub course: f64,
    /// Calibration quality, 0 (none) to 3 (fully calibrated).
    pub calibration: u8,
    pub at: Option<u64>,
}

impl ImuMessage {
    pub fn new(course: f64, calibration: u8) -> Self {
        Self {
            course,
            calibration,
            at: unix_ms_now(),
        }
    }
}

/// Authoritative autopilot state echoed by the executor.
#[derive(Debug, Clone, Serialize)]
pub struct AutopilotStatusMessage {
    pub engaged: bool,
    /// Target heading in radians.
    pub target_heading: f64,
    /// Target rudder deflection in radians.
    pub target_rudder: f64,
    pub command: AutopilotCommand,
    pub at: Option<u64>,
}

impl AutopilotStatusMessage {
    pub fn new(
        engaged: bool,
        target_heading: f64,
        target_rudder: f64,
        command: AutopilotCommand,
    ) -> Self {
        Self {
            engaged,
            target_heading,
            target_rudder,
            command,
            at: unix_ms_now(),
        }
    }
}

/// Control intent from the head unit to the autopilot executor.
#[derive(Debug, Clone, Serialize)]
pub struct AutopilotControlMessage {
    pub engaged: bool,
    /// Target heading in radians.
    pub target_heading: f64,
    pub at: Option<u64>,
}

impl AutopilotControlMessage {
    pub fn new(engaged: bool, target_heading: f64) -> Self {
        Self {
            engaged,
            target_heading,
            at: unix_ms_now(),
        }
    }
}

/// Closed set of message kinds carried by the bus.
#[derive(Debug, Clone, Serialize)]
pub enum Message {
    Voltage(VoltageMeasurement),
    Rudder(RudderMessage),
    Imu(ImuMessage),
    AutopilotStatus(AutopilotStatusMessage),
    AutopilotControl(AutopilotControlMessage),
}

impl From<VoltageMeasurement> for Message {
    fn from(value: VoltageMeasurement) -> Self {
        Message::Voltage(value)
    }
}

impl From<RudderMessage> for Message {
    fn from(value: RudderMessage) -> Self {
        Message::Rudder(value)
    }
}

impl From<ImuMessage> for Message {
    fn from(value: ImuMessage) -> Self {
        Message::Imu(value)
    }
}

impl From<AutopilotStatusMessage> for Message {
    fn from(value: AutopilotStatusMessage) -> Self {
        Message::AutopilotStatus(value)
    }
}

impl From<AutopilotControlMessage> for Message {
    fn from(value: AutopilotControlMessage) -> Self {
        Message::AutopilotControl(value)
    }
}
