// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Simulated boat for the desk harness.
//!
//! Stand-ins for the hardware the head unit normally talks to: an ADC
//! backend serving configured voltages, a heading sensor with a calibration
//! warm-up, and an autopilot executor that echoes control intents back as
//! status. There is no control law here; while engaged the heading simply
//! drifts toward the target at a fixed turn rate so the panel has something
//! to show.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use helm_core::bus::{MessageBus, MessageListener};
use helm_core::math::angles::{normalize_absolute_angle, normalize_relative_angle};
use helm_core::pilot::message::{
    AutopilotCommand, AutopilotControlMessage, AutopilotStatusMessage, ImuMessage,
};
use helm_core::sensor::{AdcChannel, AdcReader};
use helm_core::DynResult;

use crate::config::SimConfig;

const SIM_ADC_MAX: u16 = 4095;

/// ADC backend returning raw counts derived from configured voltages.
pub struct SimAdc {
    supply_volts: f64,
    house_volts: f64,
    starter_volts: f64,
    aux_volts: f64,
    full_scale_voltage: f64,
}

impl SimAdc {
    pub fn new(cfg: &SimConfig, full_scale_voltage: f64) -> Self {
        Self {
            supply_volts: cfg.supply_volts,
            house_volts: cfg.house_volts,
            starter_volts: cfg.starter_volts,
            aux_volts: cfg.rudder_volts,
            full_scale_voltage,
        }
    }

    fn counts(&self, volts: f64) -> u16 {
        let ratio = (volts / self.full_scale_voltage).clamp(0.0, 1.0);
        (ratio * f64::from(SIM_ADC_MAX)).round() as u16
    }
}

impl AdcReader for SimAdc {
    fn read(&mut self, channel: AdcChannel) -> DynResult<u16> {
        Ok(match channel {
            AdcChannel::Supply => self.counts(self.supply_volts),
            AdcChannel::House => self.counts(self.house_volts),
            AdcChannel::Starter => self.counts(self.starter_volts),
            AdcChannel::Auxiliary => self.counts(self.aux_volts),
        })
    }

    fn max_value(&self) -> u16 {
        SIM_ADC_MAX
    }
}

#[derive(Debug, Default)]
struct ExecutorState {
    engaged: bool,
    target_heading: f64,
    current_heading: f64,
}

/// Stand-in autopilot executor.
///
/// Captures control intents and headings from the bus and echoes an
/// authoritative status on its own schedule — never from inside a bus
/// dispatch, which the bus would reject.
pub struct SimExecutor {
    state: Mutex<ExecutorState>,
    /// Rudder travel span used to cap the displayed target rudder.
    travel: f64,
}

impl SimExecutor {
    pub fn new(travel: f64) -> Self {
        Self {
            state: Mutex::new(ExecutorState::default()),
            travel,
        }
    }

    /// Target heading while engaged, `None` otherwise.
    pub fn engaged_target(&self) -> Option<f64> {
        let state = self.state.lock().expect("executor state poisoned");
        state.engaged.then_some(state.target_heading)
    }

    /// Publish the authoritative autopilot status.
    ///
    /// The target rudder is the heading error capped to the travel span: a
    /// display placeholder, not a control output.
    pub fn tick(&self, bus: &MessageBus) -> DynResult<()> {
        let (engaged, target_heading, target_rudder, command) = {
            let state = self.state.lock().expect("executor state poisoned");
            let half_travel = self.travel / 2.0;
            let error = normalize_relative_angle(state.target_heading - state.current_heading);
            let rudder = if state.engaged {
                error.clamp(-half_travel, half_travel)
            } else {
                0.0
            };
            let command = if !state.engaged {
                AutopilotCommand::Free
            } else if rudder > 0.0 {
                AutopilotCommand::Starboard
            } else if rudder < 0.0 {
                AutopilotCommand::Port
            } else {
                AutopilotCommand::Brake
            };
            (state.engaged, state.target_heading, rudder, command)
        };

        bus.publish(AutopilotStatusMessage::new(
            engaged,
            target_heading,
            target_rudder,
            command,
        ))?;
        Ok(())
    }
}

impl MessageListener for SimExecutor {
    fn on_autopilot_control(&self, message: &AutopilotControlMessage) {
        let mut state = self.state.lock().expect("executor state poisoned");
        state.engaged = message.engaged;
        state.target_heading = message.target_heading;
    }

    fn on_imu(&self, message: &ImuMessage) {
        let mut state = self.state.lock().expect("executor state poisoned");
        state.current_heading = message.course;
    }
}

/// Simulated heading sensor.
///
/// Reports an uncalibrated reading until the warm-up elapses, then full
/// calibration. While the autopilot is engaged the heading converges on the
/// target at the configured turn rate.
pub struct SimVessel {
    bus: Arc<MessageBus>,
    executor: Arc<SimExecutor>,
    heading: f64,
    turn_rate: f64,
    warmup_remaining: Duration,
}

impl SimVessel {
    pub fn new(bus: Arc<MessageBus>, cfg: &SimConfig, executor: Arc<SimExecutor>) -> Self {
        Self {
            bus,
            executor,
            heading: cfg.initial_heading_deg.to_radians(),
            turn_rate: cfg.turn_rate_deg_s.to_radians(),
            warmup_remaining: Duration::from_secs(cfg.calibration_delay_s),
        }
    }

    /// Advance the simulation by `dt` and publish a heading reading.
    pub fn tick(&mut self, dt: Duration) -> DynResult<()> {
        self.warmup_remaining = self.warmup_remaining.saturating_sub(dt);
        let calibration = if self.warmup_remaining.is_zero() { 3 } else { 1 };

        if let Some(target) = self.executor.engaged_target() {
            let error = normalize_relative_angle(target - self.heading);
            let step = self.turn_rate * dt.as_secs_f64();
            if error.abs() <= step {
                self.heading = normalize_absolute_angle(target);
            } else {
                self.heading = normalize_absolute_angle(self.heading + step.copysign(error));
            }
        }

        self.bus.publish(ImuMessage::new(self.heading, calibration))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_config() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn test_adc_counts_track_configured_volts() {
        let mut adc = SimAdc::new(&sim_config(), 20.0);
        let raw = adc.read(AdcChannel::House).unwrap();
        let volts = f64::from(raw) * 20.0 / f64::from(adc.max_value());
        assert!((volts - sim_config().house_volts).abs() < 0.01);
    }

    #[test]
    fn test_vessel_calibrates_after_warmup() {
        let bus = Arc::new(MessageBus::new());
        let executor = Arc::new(SimExecutor::new(60f64.to_radians()));
        let mut vessel = SimVessel::new(bus.clone(), &sim_config(), executor);

        struct LastImu(Mutex<Option<u8>>);
        impl MessageListener for LastImu {
            fn on_imu(&self, message: &ImuMessage) {
                *self.0.lock().unwrap() = Some(message.calibration);
            }
        }
        let last = Arc::new(LastImu(Mutex::new(None)));
        bus.subscribe(last.clone()).unwrap();

        vessel.tick(Duration::from_secs(1)).unwrap();
        assert_eq!(*last.0.lock().unwrap(), Some(1));

        for _ in 0..5 {
            vessel.tick(Duration::from_secs(1)).unwrap();
        }
        assert_eq!(*last.0.lock().unwrap(), Some(3));
    }

    #[test]
    fn test_executor_echoes_control_intent() {
        let bus = Arc::new(MessageBus::new());
        let executor = Arc::new(SimExecutor::new(60f64.to_radians()));
        bus.subscribe(executor.clone()).unwrap();

        struct LastStatus(Mutex<Option<AutopilotStatusMessage>>);
        impl MessageListener for LastStatus {
            fn on_autopilot_status(&self, message: &AutopilotStatusMessage) {
                *self.0.lock().unwrap() = Some(message.clone());
            }
        }
        let last = Arc::new(LastStatus(Mutex::new(None)));
        bus.subscribe(last.clone()).unwrap();

        bus.publish(AutopilotControlMessage::new(true, 1.0)).unwrap();
        executor.tick(&bus).unwrap();

        let status = last.0.lock().unwrap().clone().expect("no status");
        assert!(status.engaged);
        assert!((status.target_heading - 1.0).abs() < 1e-9);
        assert_eq!(status.command, AutopilotCommand::Starboard);
    }

    #[test]
    fn test_executor_reports_free_while_disengaged() {
        let bus = Arc::new(MessageBus::new());
        let executor = Arc::new(SimExecutor::new(60f64.to_radians()));
        bus.subscribe(executor.clone()).unwrap();

        struct LastStatus(Mutex<Option<AutopilotStatusMessage>>);
        impl MessageListener for LastStatus {
            fn on_autopilot_status(&self, message: &AutopilotStatusMessage) {
                *self.0.lock().unwrap() = Some(message.clone());
            }
        }
        let last = Arc::new(LastStatus(Mutex::new(None)));
        bus.subscribe(last.clone()).unwrap();

        executor.tick(&bus).unwrap();
        let status = last.0.lock().unwrap().clone().expect("no status");
        assert!(!status.engaged);
        assert_eq!(status.command, AutopilotCommand::Free);
        assert_eq!(status.target_rudder, 0.0);
    }
}
