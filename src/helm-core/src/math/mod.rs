// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod angles;

pub use angles::{normalize_absolute_angle, normalize_relative_angle};
