// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Stateless presentation formatting for angles and rudder commands.
//!
//! All formatters produce fixed-width output so the panel fields keep a
//! stable alignment as the values change.

use crate::math::angles::{normalize_absolute_angle, normalize_relative_angle};
use crate::pilot::display::Color;
use crate::pilot::message::AutopilotCommand;

/// Format an absolute heading (radians) as a right-justified degree value
/// with a reference suffix, e.g. `" 42 M  "`.
///
/// The suffix is `'M'` for a magnetic heading, `'T'` for true.
pub fn format_absolute_angle(angle: f64, magnetic: bool) -> String {
    let degrees = normalize_absolute_angle(angle).to_degrees();
    format!("{:3.0} {}  ", degrees, if magnetic { 'M' } else { 'T' })
}

/// Format a relative angle (radians) as a right-justified signed degree
/// value, e.g. `"-17   "`. No unit suffix.
pub fn format_relative_angle(angle: f64) -> String {
    let degrees = normalize_relative_angle(angle).to_degrees();
    format!("{:3.0}   ", degrees)
}

/// Panel color conveying the rudder deflection direction: starboard green,
/// port red, centered white.
pub fn color_for_rudder(rudder: f64) -> Color {
    if rudder > 0.0 {
        Color::Green
    } else if rudder < 0.0 {
        Color::Red
    } else {
        Color::White
    }
}

/// Single-character marker for the executor's current rudder directive.
pub fn command_symbol(command: AutopilotCommand) -> &'static str {
    match command {
        AutopilotCommand::Port => "<",
        AutopilotCommand::Starboard => ">",
        AutopilotCommand::Brake => "o",
        AutopilotCommand::Free => " ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_formats_wrapped_and_canonical_identically() {
        assert_eq!(
            format_absolute_angle((-1f64).to_radians(), true),
            format_absolute_angle(359f64.to_radians(), true)
        );
        assert_eq!(format_absolute_angle(359f64.to_radians(), true), "359 M  ");
    }

    #[test]
    fn test_absolute_suffix_and_padding() {
        assert_eq!(format_absolute_angle(90f64.to_radians(), false), " 90 T  ");
        assert_eq!(format_absolute_angle(5f64.to_radians(), true), "  5 M  ");
    }

    #[test]
    fn test_relative_signed_values() {
        assert_eq!(format_relative_angle((-17f64).to_radians()), "-17   ");
        assert_eq!(format_relative_angle(5f64.to_radians()), "  5   ");
        assert_eq!(format_relative_angle(0.0), "  0   ");
    }

    #[test]
    fn test_relative_wraps_before_formatting() {
        assert_eq!(format_relative_angle(190f64.to_radians()), "-170   ");
        assert_eq!(
            format_relative_angle(370f64.to_radians()),
            format_relative_angle(10f64.to_radians())
        );
    }

    #[test]
    fn test_rudder_colors() {
        assert_eq!(color_for_rudder(0.0), Color::White);
        assert_eq!(color_for_rudder(0.2), Color::Green);
        assert_eq!(color_for_rudder(-0.2), Color::Red);
        assert_eq!(color_for_rudder(f64::NAN), Color::White);
    }

    #[test]
    fn test_command_symbols() {
        assert_eq!(command_symbol(AutopilotCommand::Port), "<");
        assert_eq!(command_symbol(AutopilotCommand::Starboard), ">");
        assert_eq!(command_symbol(AutopilotCommand::Brake), "o");
        assert_eq!(command_symbol(AutopilotCommand::Free), " ");
    }
}
