// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Periodic analog acquisition.
//!
//! One [`AdcTask::poll`] pass reads every analog channel through an
//! [`AdcReader`], converts raw counts to calibrated voltages with a fixed
//! linear scale, and publishes the results on the bus. The auxiliary
//! channel either reports a plain voltage or, when the unit is built with a
//! rudder sensor attached, a signed rudder angle derived from the sensor
//! geometry. The choice is fixed at construction, not at runtime.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bus::MessageBus;
use crate::pilot::message::{RudderMessage, VoltageMeasurement};
use crate::DynResult;

/// Analog input channels of the head unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcChannel {
    Supply,
    House,
    Starter,
    Auxiliary,
}

/// Register-level access to the converter, implemented by the hardware
/// driver or a simulator.
pub trait AdcReader: Send {
    /// Read one channel, in raw counts.
    fn read(&mut self, channel: AdcChannel) -> DynResult<u16>;

    /// Full-scale raw value of this converter.
    fn max_value(&self) -> u16;
}

/// Linear calibration applied to every channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalogConfig {
    /// Voltage corresponding to a full-scale raw reading, after the input
    /// divider.
    pub full_scale_voltage: f64,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            full_scale_voltage: 20.0,
        }
    }
}

/// Mechanical geometry of the rudder-angle sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RudderGeometry {
    /// Reference voltage feeding the sensor.
    pub supply_voltage: f64,
    /// Total angular travel of the sensor, in radians.
    pub angular_travel: f64,
    /// True when the sensor reads zero volts at full port deflection.
    pub zero_to_port: bool,
}

impl Default for RudderGeometry {
    fn default() -> Self {
        Self {
            supply_voltage: 5.0,
            angular_travel: 60f64.to_radians(),
            zero_to_port: true,
        }
    }
}

/// What the auxiliary channel measures.
#[derive(Debug, Clone)]
pub enum AuxSense {
    /// Plain voltage, published like the battery channels.
    Voltage,
    /// Rudder-angle sensor, published as a [`RudderMessage`].
    RudderAngle(RudderGeometry),
}

/// Convert a calibrated sensor voltage into a signed rudder angle.
///
/// The sensor is a linear potentiometer across `supply_voltage` spanning
/// `angular_travel`; the midpoint of its travel is rudder center, and
/// `zero_to_port` sets which end of the travel reads zero.
pub fn rudder_angle_from_volts(volts: f64, geometry: &RudderGeometry) -> f64 {
    let ratio = volts / geometry.supply_voltage;
    let angle = ratio * geometry.angular_travel;
    if geometry.zero_to_port {
        angle - geometry.angular_travel / 2.0
    } else {
        geometry.angular_travel / 2.0 - angle
    }
}

/// Periodic acquisition task: owns the reader, publishes on the bus.
pub struct AdcTask<R: AdcReader> {
    reader: R,
    bus: Arc<MessageBus>,
    config: AnalogConfig,
    aux: AuxSense,
}

impl<R: AdcReader> AdcTask<R> {
    pub fn new(reader: R, bus: Arc<MessageBus>, config: AnalogConfig, aux: AuxSense) -> Self {
        Self {
            reader,
            bus,
            config,
            aux,
        }
    }

    fn volts(&mut self, channel: AdcChannel) -> DynResult<f64> {
        let raw = self.reader.read(channel)?;
        Ok(f64::from(raw) * self.config.full_scale_voltage / f64::from(self.reader.max_value()))
    }

    /// One acquisition pass: read, calibrate, publish.
    pub fn poll(&mut self) -> DynResult<()> {
        let supply = self.volts(AdcChannel::Supply)?;
        let house = self.volts(AdcChannel::House)?;
        let starter = self.volts(AdcChannel::Starter)?;
        let aux = self.volts(AdcChannel::Auxiliary)?;

        self.bus.publish(VoltageMeasurement::new(0, "house", house))?;
        self.bus
            .publish(VoltageMeasurement::new(1, "starter", starter))?;
        self.bus
            .publish(VoltageMeasurement::new(3, "supply", supply))?;

        match &self.aux {
            AuxSense::Voltage => {
                self.bus.publish(VoltageMeasurement::new(4, "bat3", aux))?;
            }
            AuxSense::RudderAngle(geometry) => {
                self.bus
                    .publish(RudderMessage::new(rudder_angle_from_volts(aux, geometry)))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::bus::MessageListener;

    const EPS: f64 = 1e-9;

    /// Reader returning fixed raw counts per channel.
    struct FakeAdc {
        supply: u16,
        house: u16,
        starter: u16,
        aux: u16,
        max: u16,
    }

    impl AdcReader for FakeAdc {
        fn read(&mut self, channel: AdcChannel) -> DynResult<u16> {
            Ok(match channel {
                AdcChannel::Supply => self.supply,
                AdcChannel::House => self.house,
                AdcChannel::Starter => self.starter,
                AdcChannel::Auxiliary => self.aux,
            })
        }

        fn max_value(&self) -> u16 {
            self.max
        }
    }

    struct FailingAdc;

    impl AdcReader for FailingAdc {
        fn read(&mut self, _channel: AdcChannel) -> DynResult<u16> {
            Err("adc read failed".into())
        }

        fn max_value(&self) -> u16 {
            1023
        }
    }

    #[derive(Default)]
    struct SensorCapture {
        voltages: Mutex<Vec<VoltageMeasurement>>,
        rudder: Mutex<Vec<RudderMessage>>,
    }

    impl MessageListener for SensorCapture {
        fn on_voltage(&self, message: &VoltageMeasurement) {
            self.voltages.lock().unwrap().push(message.clone());
        }

        fn on_rudder(&self, message: &RudderMessage) {
            self.rudder.lock().unwrap().push(message.clone());
        }
    }

    fn capture_bus() -> (Arc<MessageBus>, Arc<SensorCapture>) {
        let bus = Arc::new(MessageBus::new());
        let capture = Arc::new(SensorCapture::default());
        bus.subscribe(capture.clone()).unwrap();
        (bus, capture)
    }

    #[test]
    fn test_voltage_mode_publishes_all_channels() {
        let (bus, capture) = capture_bus();
        let reader = FakeAdc {
            supply: 1000,
            house: 500,
            starter: 250,
            aux: 100,
            max: 1000,
        };
        let mut task = AdcTask::new(
            reader,
            bus,
            AnalogConfig {
                full_scale_voltage: 20.0,
            },
            AuxSense::Voltage,
        );
        task.poll().unwrap();

        let voltages = capture.voltages.lock().unwrap();
        assert_eq!(voltages.len(), 4);
        let ids: Vec<(u8, &str)> = voltages
            .iter()
            .map(|m| (m.channel, m.label.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![(0, "house"), (1, "starter"), (3, "supply"), (4, "bat3")]
        );
        assert!((voltages[0].volts - 10.0).abs() < EPS);
        assert!((voltages[1].volts - 5.0).abs() < EPS);
        assert!((voltages[2].volts - 20.0).abs() < EPS);
        assert!((voltages[3].volts - 2.0).abs() < EPS);
        assert!(capture.rudder.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rudder_mode_publishes_angle_instead_of_voltage() {
        let (bus, capture) = capture_bus();
        // 500/1000 of 5.0 V full scale is 2.5 V: mid-travel, rudder centered.
        let reader = FakeAdc {
            supply: 0,
            house: 0,
            starter: 0,
            aux: 500,
            max: 1000,
        };
        let mut task = AdcTask::new(
            reader,
            bus,
            AnalogConfig {
                full_scale_voltage: 5.0,
            },
            AuxSense::RudderAngle(RudderGeometry::default()),
        );
        task.poll().unwrap();

        assert_eq!(capture.voltages.lock().unwrap().len(), 3);
        let rudder = capture.rudder.lock().unwrap();
        assert_eq!(rudder.len(), 1);
        assert!(rudder[0].angle.abs() < EPS);
    }

    #[test]
    fn test_rudder_geometry_midpoint_is_centered_in_both_polarities() {
        for zero_to_port in [true, false] {
            let geometry = RudderGeometry {
                supply_voltage: 5.0,
                angular_travel: 60f64.to_radians(),
                zero_to_port,
            };
            assert!(rudder_angle_from_volts(2.5, &geometry).abs() < EPS);
        }
    }

    #[test]
    fn test_rudder_geometry_full_scale_sign_follows_polarity() {
        let travel = 60f64.to_radians();
        let port_zero = RudderGeometry {
            supply_voltage: 5.0,
            angular_travel: travel,
            zero_to_port: true,
        };
        let starboard_zero = RudderGeometry {
            zero_to_port: false,
            ..port_zero.clone()
        };

        assert!((rudder_angle_from_volts(5.0, &port_zero) - travel / 2.0).abs() < EPS);
        assert!((rudder_angle_from_volts(5.0, &starboard_zero) + travel / 2.0).abs() < EPS);
        assert!((rudder_angle_from_volts(0.0, &port_zero) + travel / 2.0).abs() < EPS);
        assert!((rudder_angle_from_volts(0.0, &starboard_zero) - travel / 2.0).abs() < EPS);
    }

    #[test]
    fn test_reader_failure_propagates() {
        let (bus, capture) = capture_bus();
        let mut task = AdcTask::new(
            FailingAdc,
            bus,
            AnalogConfig::default(),
            AuxSense::Voltage,
        );

        assert!(task.poll().is_err());
        assert!(capture.voltages.lock().unwrap().is_empty());
    }
}
