// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Operator input parsing for the console shell.

/// Parsed console command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Press,
    Release,
    /// Encoder turn in signed degrees.
    Turn(f64),
    Status,
    Quit,
}

/// Parse one input line.
///
/// Empty lines yield `Ok(None)`; unrecognized input is an error carrying a
/// usage hint. A bare signed number is shorthand for `turn`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let command = match word {
        "press" | "p" => Command::Press,
        "release" | "r" => Command::Release,
        "turn" | "t" => {
            let Some(arg) = parts.next() else {
                return Err("usage: turn <degrees>".to_string());
            };
            let degrees: f64 = arg
                .parse()
                .map_err(|_| format!("invalid degrees '{}'", arg))?;
            Command::Turn(degrees)
        }
        "status" | "s" => Command::Status,
        "quit" | "q" | "exit" => Command::Quit,
        other => match other.parse::<f64>() {
            Ok(degrees) => Command::Turn(degrees),
            Err(_) => {
                return Err(format!(
                    "unknown command '{}' (press, release, turn <deg>, status, quit)",
                    other
                ))
            }
        },
    };
    Ok(Some(command))
}
