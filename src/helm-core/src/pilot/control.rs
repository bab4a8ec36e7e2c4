// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Heading-hold autopilot control page.
//!
//! The page owns the engage/disengage state machine and the operator-facing
//! state (headings, rudder positions, executor command). It consumes sensor
//! and status messages from the bus, consumes operator input events from the
//! surrounding shell, and emits control intents back onto the bus.
//!
//! A single physical button serves two purposes: a short click is left to
//! the shell (page navigation), a 2 s hold toggles the autopilot. The page
//! signals an unconsumed short click by returning `false` from
//! [`AutopilotControlPage::handle_button`].

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::bus::{MessageBus, MessageListener};
use crate::math::angles::normalize_absolute_angle;
use crate::pilot::display::{Color, Field, PanelDisplay};
use crate::pilot::format::{
    color_for_rudder, command_symbol, format_absolute_angle, format_relative_angle,
};
use crate::pilot::message::{
    AutopilotCommand, AutopilotControlMessage, AutopilotStatusMessage, ImuMessage, RudderMessage,
};

/// Hold duration that turns a button press into the engage/disengage
/// gesture.
pub const LONG_PRESS: Duration = Duration::from_millis(2000);

/// Physical button edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Pressed,
    Released,
}

/// Button edge with its observation time.
#[derive(Debug, Clone, Copy)]
pub struct ButtonEvent {
    pub action: ButtonAction,
    pub at: Instant,
}

/// Rotary encoder turn, in signed degrees.
#[derive(Debug, Clone, Copy)]
pub struct EncoderEvent {
    pub rotation_deg: f64,
}

/// Periodic scheduler tick. Its `at` sample is the time base for the
/// long-press debounce.
#[derive(Debug, Clone, Copy)]
pub struct TickEvent {
    pub at: Instant,
}

#[derive(Debug)]
struct ControlState {
    pressed_at: Option<Instant>,
    imu_calibrated: bool,
    engaged: bool,
    current_heading: f64,
    target_heading: f64,
    current_rudder: f64,
    target_rudder: f64,
    command: AutopilotCommand,
}

impl ControlState {
    fn new() -> Self {
        Self {
            pressed_at: None,
            imu_calibrated: false,
            engaged: false,
            current_heading: 0.0,
            target_heading: 0.0,
            current_rudder: 0.0,
            target_rudder: 0.0,
            command: AutopilotCommand::Free,
        }
    }
}

/// UI page owning the autopilot control state.
///
/// Created at page construction with its bus and display injected;
/// subscribed to the bus by the shell, torn down by dropping.
pub struct AutopilotControlPage {
    bus: Arc<MessageBus>,
    display: Arc<dyn PanelDisplay>,
    state: Mutex<ControlState>,
}

impl AutopilotControlPage {
    pub fn new(bus: Arc<MessageBus>, display: Arc<dyn PanelDisplay>) -> Self {
        Self {
            bus,
            display,
            state: Mutex::new(ControlState::new()),
        }
    }

    /// Whether the autopilot is currently engaged.
    pub fn engaged(&self) -> bool {
        self.lock_state().engaged
    }

    /// Current target heading in radians. Only operationally meaningful
    /// while engaged, but retained across disengage.
    pub fn target_heading(&self) -> f64 {
        self.lock_state().target_heading
    }

    /// Handle a button edge.
    ///
    /// Returns `false` for a short click (released before [`LONG_PRESS`])
    /// so the shell can claim it for page navigation; `true` otherwise.
    pub fn handle_button(&self, event: ButtonEvent) -> bool {
        let mut state = self.lock_state();
        match event.action {
            ButtonAction::Pressed => {
                state.pressed_at = Some(event.at);
                true
            }
            ButtonAction::Released => match state.pressed_at.take() {
                Some(pressed_at) if event.at.duration_since(pressed_at) < LONG_PRESS => false,
                _ => true,
            },
        }
    }

    /// Handle a scheduler tick: fire the engage/disengage toggle once the
    /// button has been held past [`LONG_PRESS`].
    ///
    /// The toggle fires at most once per hold. Engaging requires a
    /// calibrated heading sensor and snaps the target heading to the
    /// present course; a refused engage publishes nothing.
    pub fn handle_tick(&self, event: TickEvent) -> bool {
        let mut state = self.lock_state();
        let held_long = state
            .pressed_at
            .is_some_and(|pressed_at| event.at.duration_since(pressed_at) >= LONG_PRESS);
        if !held_long {
            return true;
        }
        // The hold is consumed whether or not a toggle happens.
        state.pressed_at = None;

        let outgoing = if state.engaged {
            state.engaged = false;
            debug!("autopilot disengaged");
            Some(AutopilotControlMessage::new(false, state.target_heading))
        } else if state.imu_calibrated {
            // Engaging always starts on the boat's present course.
            state.engaged = true;
            state.target_heading = state.current_heading;
            debug!(target_heading = state.target_heading, "autopilot engaged");
            Some(AutopilotControlMessage::new(true, state.target_heading))
        } else {
            debug!("engage refused: heading sensor not calibrated");
            None
        };

        if let Some(message) = outgoing {
            self.update_display(&state);
            drop(state);
            self.send_control(message);
        }
        true
    }

    /// Handle an encoder turn: adjust the target heading and announce it.
    ///
    /// Applies even while disengaged, so the operator can pre-stage a
    /// heading before engaging.
    pub fn handle_encoder(&self, event: EncoderEvent) -> bool {
        let mut state = self.lock_state();
        state.target_heading =
            normalize_absolute_angle(state.target_heading + event.rotation_deg.to_radians());
        let message = AutopilotControlMessage::new(state.engaged, state.target_heading);
        self.update_display(&state);
        drop(state);
        self.send_control(message);
        true
    }

    fn send_control(&self, message: AutopilotControlMessage) {
        // Input events arrive from the shell, never from a bus dispatch.
        self.bus
            .publish(message)
            .expect("event handlers must not run inside a bus dispatch");
    }

    fn lock_state(&self) -> MutexGuard<'_, ControlState> {
        self.state.lock().expect("control state poisoned")
    }

    /// Redraw every field from the current state. A pure projection, safe
    /// to repeat after every mutation.
    fn update_display(&self, state: &ControlState) {
        if !state.imu_calibrated {
            self.display.set_text(Field::Mode, "Calibrating   ");
            self.display.set_color(Field::Mode, Color::Red);
        } else if state.engaged {
            self.display.set_text(Field::Mode, "APMode: Heading");
            self.display.set_color(Field::Mode, Color::Green);
        } else {
            self.display.set_text(Field::Mode, "APMode: Off      ");
            self.display.set_color(Field::Mode, Color::Blue);
        }

        self.display.set_text(
            Field::CurrentHeading,
            &format_absolute_angle(state.current_heading, true),
        );
        self.display.set_text(
            Field::TargetHeading,
            &format_absolute_angle(state.target_heading, true),
        );
        self.display.set_text(
            Field::RudderPosition,
            &format_relative_angle(state.current_rudder),
        );

        if state.engaged {
            let text = format!(
                "{} {} ",
                format_relative_angle(state.target_rudder),
                command_symbol(state.command)
            );
            self.display.set_text(Field::RudderCommand, &text);
            self.display
                .set_color(Field::RudderCommand, color_for_rudder(state.target_rudder));
        } else {
            self.display.set_text(Field::RudderCommand, "---   ");
            self.display.set_color(Field::RudderCommand, Color::White);
        }
    }
}

impl MessageListener for AutopilotControlPage {
    fn on_rudder(&self, message: &RudderMessage) {
        let mut state = self.lock_state();
        state.current_rudder = message.angle;
        self.update_display(&state);
    }

    fn on_imu(&self, message: &ImuMessage) {
        let mut state = self.lock_state();
        state.imu_calibrated = message.calibration == 3;
        state.current_heading = message.course;
        self.update_display(&state);
    }

    fn on_autopilot_status(&self, message: &AutopilotStatusMessage) {
        // Passive echo of the authoritative executor state; last writer
        // wins, no reconciliation with optimistic local edits.
        let mut state = self.lock_state();
        state.engaged = message.engaged;
        state.target_rudder = message.target_rudder;
        state.target_heading = message.target_heading;
        state.command = message.command;
        self.update_display(&state);
    }
}
