// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Color utilities.

use colored::Color;
use colored::ColoredString;
use colored::Colorize;

use crate::Error;
use crate::record::Level;

/// Background colors for the known log levels.
#[derive(Debug, Clone)]
pub struct LevelColor {
    /// Color for critical level logs.
    pub critical: Color,
    /// Color for error level logs.
    pub error: Color,
    /// Color for warning level logs.
    pub warning: Color,
    /// Color for info level logs.
    pub info: Color,
    /// Color for debug level logs.
    pub debug: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            critical: Color::Yellow,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            debug: Color::BrightBlack,
        }
    }
}

impl LevelColor {
    /// The background color of `level`.
    pub fn get(&self, level: Level) -> Color {
        match level {
            Level::Critical => self.critical,
            Level::Error => self.error,
            Level::Warning => self.warning,
            Level::Info => self.info,
            Level::Debug => self.debug,
        }
    }

    /// Colorize the log level name.
    ///
    /// # Errors
    ///
    /// Return an error if `name` is not one of the known levels.
    pub fn colorize_level_name(&self, no_color: bool, name: &str) -> Result<ColoredString, Error> {
        let Some(level) = Level::from_name(name) else {
            return Err(Error::new("unknown log level").with_context("level", name));
        };
        if no_color {
            Ok(ColoredString::from(name))
        } else {
            Ok(name.on_color(self.get(level)))
        }
    }
}

/// Foreground colors for the fixed header fields.
#[derive(Debug, Clone)]
pub struct FieldColor {
    /// Color for the clock time.
    pub time: Color,
    /// Color for the logger name.
    pub logger_name: Color,
    /// Color for the module.
    pub module: Color,
    /// Color for the function.
    pub function: Color,
    /// Color for the line number.
    pub line: Color,
    /// Color for the correlation id.
    pub correlation_id: Color,
}

impl Default for FieldColor {
    fn default() -> Self {
        Self {
            time: Color::Magenta,
            logger_name: Color::Cyan,
            module: Color::Yellow,
            function: Color::Blue,
            line: Color::Green,
            correlation_id: Color::Yellow,
        }
    }
}

/// Colorize `text` with a foreground color, or leave it plain if `no_color` is set.
pub fn colorize(no_color: bool, color: Color, text: &str) -> ColoredString {
    if no_color {
        ColoredString::from(text)
    } else {
        text.color(color)
    }
}
