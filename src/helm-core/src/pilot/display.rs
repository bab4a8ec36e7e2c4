// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Display contract between control logic and the actual screen.

use serde::Serialize;

/// Panel colors available to the head unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Color {
    White,
    Red,
    Green,
    Blue,
}

/// Labeled text fields owned by the autopilot control page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Mode,
    CurrentHeading,
    TargetHeading,
    RudderPosition,
    RudderCommand,
}

/// Rendering seam. Implementations only store or draw; they must never
/// feed back into the control state.
pub trait PanelDisplay: Send + Sync {
    fn set_text(&self, field: Field, text: &str);
    fn set_color(&self, field: Field, color: Color);
}
