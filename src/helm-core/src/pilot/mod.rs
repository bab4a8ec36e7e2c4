// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Autopilot head-unit components.
//!
//! This module contains the typed message set, the heading-hold control
//! page, the display contract the page renders through, and the stateless
//! presentation formatting shared by all of them.

pub mod control;
pub mod display;
pub mod format;
pub mod message;

pub use control::{
    AutopilotControlPage, ButtonAction, ButtonEvent, EncoderEvent, TickEvent, LONG_PRESS,
};
pub use display::{Color, Field, PanelDisplay};
