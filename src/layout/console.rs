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

use std::collections::BTreeSet;
use std::fmt::Write;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::color::FieldColor;
use crate::color::LevelColor;
use crate::color::colorize;
use crate::fields;
use crate::fields::EXC_INFO;
use crate::fields::FieldMap;
use crate::fields::MESSAGE;
use crate::fields::STACK_INFO;
use crate::layout::Layout;
use crate::record::LogEvent;
use crate::record::Message;

/// A console layout that renders a colored header line and appends the event's structured fields
/// as JSON.
///
/// Output format:
///
/// ```text
/// 12:34:56 INFO svc.worker worker.run:42
/// started
/// 12:34:57 WARNING svc.worker worker.run:57 - abc-123
/// job is slow{"job_id":"j-1","elapsed_ms":5120}
/// 12:34:58 ERROR svc.worker worker.run:63
/// {"event":"job_failed","exc_info":"Traceback (most recent call last):\n..."}
/// ```
///
/// The header holds, in order: the clock time, the level, the logger name, the
/// `module.function:line` location and, when present, ` - ` followed by the correlation id. Every
/// header field is colored unless [`no_color`](ConsoleLayout::no_color) is set; whether escape
/// sequences are emitted is further decided by [`colored`] from the terminal and environment.
///
/// The second line holds the message, directly followed by the structured fields serialized as
/// JSON. Extra fields named in the reserved-attribute set are dropped, and `message` is never
/// repeated in the JSON. See [`reserved_attrs`](ConsoleLayout::reserved_attrs).
///
/// # Examples
///
/// ```
/// use tintlog::layout::ConsoleLayout;
///
/// let layout = ConsoleLayout::default();
/// ```
#[derive(Debug, Clone)]
pub struct ConsoleLayout {
    level_colors: LevelColor,
    field_colors: FieldColor,
    no_color: bool,
    timezone: TimeZone,
    reserved_attrs: BTreeSet<String>,
    static_fields: FieldMap,
    timestamp_field: Option<String>,
    pretty: bool,
}

impl Default for ConsoleLayout {
    fn default() -> Self {
        Self {
            level_colors: LevelColor::default(),
            field_colors: FieldColor::default(),
            no_color: false,
            timezone: TimeZone::system(),
            reserved_attrs: fields::default_reserved_attrs(),
            static_fields: FieldMap::new(),
            timestamp_field: None,
            pretty: false,
        }
    }
}

impl ConsoleLayout {
    /// Replace the reserved-attribute set.
    ///
    /// Extra fields whose name is in this set are left out of the JSON tail. Defaults to
    /// [`RESERVED_ATTRS`](fields::RESERVED_ATTRS) plus `correlation_id`; the given set replaces
    /// the default entirely.
    ///
    /// # Examples
    ///
    /// ```
    /// use tintlog::fields::RESERVED_ATTRS;
    /// use tintlog::layout::ConsoleLayout;
    ///
    /// // keep correlation_id in the JSON tail as well as in the header
    /// let layout = ConsoleLayout::default().reserved_attrs(RESERVED_ATTRS.iter().copied());
    /// ```
    pub fn reserved_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Set the timezone of the header clock.
    ///
    /// Defaults to the system timezone if not set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use tintlog::layout::ConsoleLayout;
    ///
    /// let layout = ConsoleLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Set fields that are added to the JSON tail of every event.
    ///
    /// Fields of the event itself take precedence over static fields of the same name.
    pub fn static_fields(mut self, fields: FieldMap) -> Self {
        self.static_fields = fields;
        self
    }

    /// Add the event time to the JSON tail under `key`, as an RFC 3339 UTC timestamp.
    ///
    /// This is independent of the clock shown in the header.
    pub fn timestamp_field(mut self, key: impl Into<String>) -> Self {
        self.timestamp_field = Some(key.into());
        self
    }

    /// Serialize the JSON tail with indentation.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Format one event into its display string.
    ///
    /// # Errors
    ///
    /// Return an error if the level name is not one of the known levels, if the event time cannot
    /// be represented, or if the fields cannot be serialized.
    pub fn format_event(&self, event: &LogEvent) -> Result<String, Error> {
        let level = self
            .level_colors
            .colorize_level_name(self.no_color, event.level_name())?;

        let mut fields = self.static_fields.clone();
        let message = match event.message() {
            Message::Text(text) => text.as_str(),
            Message::Structured(payload) => {
                fields.extend(payload.clone());
                ""
            }
        };

        let ts = Timestamp::try_from(event.time()).map_err(|err| {
            Error::new("failed to convert event time")
                .with_context("time", format!("{:?}", event.time()))
                .with_source(err)
        })?;

        // values the caller already put in the payload win
        if let Some(exception) = event.exception() {
            fields::insert_if_unset(&mut fields, EXC_INFO, exception.render());
        }
        if let Some(text) = event.exception_text() {
            fields::insert_if_unset(&mut fields, EXC_INFO, text);
        }
        if let Some(stack) = event.stack_info() {
            let stack = stack.strip_suffix('\n').unwrap_or(stack);
            fields::insert_if_unset(&mut fields, STACK_INFO, stack);
        }

        fields::merge_extra(&mut fields, event.extra_fields(), &self.reserved_attrs);
        if let Some(key) = &self.timestamp_field {
            fields.insert(key.clone(), ts.to_string().into());
        }
        fields.shift_remove(MESSAGE);

        let tail = if fields.is_empty() {
            String::new()
        } else if self.pretty {
            serde_json::to_string_pretty(&fields).map_err(Error::from_serde_error)?
        } else {
            serde_json::to_string(&fields).map_err(Error::from_serde_error)?
        };

        let time = ts.to_zoned(self.timezone.clone()).strftime("%H:%M:%S").to_string();
        let colors = &self.field_colors;
        let no_color = self.no_color;

        let mut text = String::new();
        write!(
            &mut text,
            "{time} {level} {logger} {module}.{function}:{line}",
            time = colorize(no_color, colors.time, &time),
            logger = colorize(no_color, colors.logger_name, event.logger_name()),
            module = colorize(no_color, colors.module, event.module()),
            function = colorize(no_color, colors.function, event.function()),
            line = colorize(no_color, colors.line, &event.line().to_string()),
        )
        .map_err(Error::from_fmt_error)?;
        if let Some(id) = event.correlation_id() {
            let id = colorize(no_color, colors.correlation_id, id);
            write!(&mut text, " - {id}").map_err(Error::from_fmt_error)?;
        }
        text.push('\n');
        text.push_str(message);
        text.push_str(&tail);

        Ok(text)
    }
}

impl Layout for ConsoleLayout {
    fn format(&self, event: &LogEvent) -> Result<Vec<u8>, Error> {
        self.format_event(event).map(String::into_bytes)
    }
}
