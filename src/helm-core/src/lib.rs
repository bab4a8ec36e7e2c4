// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod bus;
pub mod math;
pub mod pilot;
pub mod sensor;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use bus::{BusError, MessageBus, MessageListener, SubscriberId};
pub use pilot::message::{
    AutopilotCommand, AutopilotControlMessage, AutopilotStatusMessage, ImuMessage, Message,
    RudderMessage, VoltageMeasurement,
};
