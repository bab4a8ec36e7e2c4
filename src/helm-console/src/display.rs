// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Terminal rendering of the panel fields.

use std::collections::HashMap;
use std::sync::Mutex;

use helm_core::pilot::display::{Color, Field, PanelDisplay};

/// Panel backend that caches field contents and composes them into a
/// single status line on demand.
///
/// Fields start as `"----"`, matching a head unit that has not received
/// data yet.
pub struct TermDisplay {
    fields: Mutex<HashMap<Field, (String, Color)>>,
}

impl Default for TermDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TermDisplay {
    pub fn new() -> Self {
        Self {
            fields: Mutex::new(HashMap::new()),
        }
    }

    fn field(&self, field: Field) -> String {
        self.fields
            .lock()
            .expect("display fields poisoned")
            .get(&field)
            .map(|(text, _)| text.clone())
            .unwrap_or_else(|| "----".to_string())
    }

    /// Compose the one-line panel summary.
    pub fn status_line(&self) -> String {
        format!(
            "{} | HDG {} | TGT {} | RUD {} | CMD {}",
            self.field(Field::Mode).trim_end(),
            self.field(Field::CurrentHeading).trim_end(),
            self.field(Field::TargetHeading).trim_end(),
            self.field(Field::RudderPosition).trim_end(),
            self.field(Field::RudderCommand).trim_end(),
        )
    }
}

impl PanelDisplay for TermDisplay {
    fn set_text(&self, field: Field, text: &str) {
        let mut fields = self.fields.lock().expect("display fields poisoned");
        let entry = fields
            .entry(field)
            .or_insert_with(|| (String::new(), Color::White));
        entry.0 = text.to_string();
    }

    fn set_color(&self, field: Field, color: Color) {
        let mut fields = self.fields.lock().expect("display fields poisoned");
        let entry = fields
            .entry(field)
            .or_insert_with(|| ("----".to_string(), Color::White));
        entry.1 = color;
    }
}
