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

//! Log event and its parts.

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;
use std::str::FromStr;
use std::time::SystemTime;

use serde::Serialize;

use crate::Error;
use crate::fields::FieldMap;
use crate::fields::Value;

/// An enum representing the severities known to the console layout.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Designates critical errors.
    Critical,
    /// Designates errors.
    Error,
    /// Designates hazardous situations.
    Warning,
    /// Designates useful information.
    Info,
    /// Designates lower priority information.
    Debug,
}

impl Level {
    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Critical => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// Look up a level by its exact canonical name, e.g. `"WARNING"`.
    ///
    /// Unlike [`FromStr`], aliases and other casings are not accepted.
    pub fn from_name(name: &str) -> Option<Level> {
        [
            Level::Critical,
            Level::Error,
            Level::Warning,
            Level::Info,
            Level::Debug,
        ]
        .into_iter()
        .find(|level| level.as_str() == name)
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (name, level) in [
            ("critical", Level::Critical),
            ("fatal", Level::Critical),
            ("error", Level::Error),
            ("warning", Level::Warning),
            ("warn", Level::Warning),
            ("info", Level::Info),
            ("debug", Level::Debug),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(Error::new("unknown log level").with_context("level", s))
    }
}

/// The message of a log event.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// A rendered, human-readable message.
    Text(String),
    /// A structured payload logged in place of a string.
    Structured(FieldMap),
}

impl Default for Message {
    fn default() -> Self {
        Message::Text(String::new())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<fmt::Arguments<'_>> for Message {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Message::Text(args.to_string())
    }
}

impl From<FieldMap> for Message {
    fn from(fields: FieldMap) -> Self {
        Message::Structured(fields)
    }
}

/// A captured exception: its type, its value and where it was raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionInfo {
    type_name: String,
    value: String,
    traceback: Option<String>,
}

impl ExceptionInfo {
    /// Create an exception from its type name and value text.
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
            traceback: None,
        }
    }

    /// Capture an error and its chain of sources.
    ///
    /// Every source is rendered as a `Caused by:` line after the error itself.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + 'static,
    {
        let mut value = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            value.push_str("\nCaused by: ");
            value.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(std::any::type_name::<E>(), value)
    }

    /// Attach the traceback text printed before the exception line.
    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }

    /// The exception type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The exception value text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The traceback text, if captured.
    pub fn traceback(&self) -> Option<&str> {
        self.traceback.as_deref()
    }

    /// Render the exception as text: the traceback, then `Type: value`.
    pub fn render(&self) -> String {
        let mut text = String::new();
        if let Some(traceback) = &self.traceback {
            text.push_str(traceback.trim_end_matches('\n'));
            text.push('\n');
        }
        // SAFETY: write to a string always succeeds
        write!(&mut text, "{}: {}", self.type_name, self.value).unwrap();
        text.truncate(text.trim_end_matches('\n').len());
        text
    }
}

/// A log event: the input of a layout.
#[derive(Clone, Debug)]
pub struct LogEvent {
    // the observed time
    time: SystemTime,

    // the metadata
    level: Cow<'static, str>,
    logger_name: String,
    module: String,
    function: String,
    line: u32,

    // the payload
    message: Message,

    // structural logging
    extra_fields: FieldMap,
    exception: Option<ExceptionInfo>,
    exception_text: Option<String>,
    stack_info: Option<String>,
    correlation_id: Option<String>,
}

impl LogEvent {
    /// Returns a new builder.
    pub fn builder() -> LogEventBuilder {
        LogEventBuilder::default()
    }

    /// The instant the event was created.
    pub fn time(&self) -> SystemTime {
        self.time
    }

    /// The severity name of the event.
    pub fn level_name(&self) -> &str {
        &self.level
    }

    /// The severity of the event, if it is one of the known levels.
    pub fn level(&self) -> Option<Level> {
        Level::from_name(&self.level)
    }

    /// The name of the emitting logger.
    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// The module that emitted the event.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The function that emitted the event.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The source line of the call site.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Extra fields supplied at the call site.
    pub fn extra_fields(&self) -> &FieldMap {
        &self.extra_fields
    }

    /// The captured exception, if any.
    pub fn exception(&self) -> Option<&ExceptionInfo> {
        self.exception.as_ref()
    }

    /// Pre-rendered exception text, if any.
    pub fn exception_text(&self) -> Option<&str> {
        self.exception_text.as_deref()
    }

    /// The captured call stack, if any.
    pub fn stack_info(&self) -> Option<&str> {
        self.stack_info.as_deref()
    }

    /// The correlation id, if any.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Create a builder initialized with the current event's values.
    pub fn to_builder(&self) -> LogEventBuilder {
        LogEventBuilder {
            event: self.clone(),
        }
    }
}

/// Builder for [`LogEvent`].
#[derive(Debug)]
pub struct LogEventBuilder {
    event: LogEvent,
}

impl Default for LogEventBuilder {
    fn default() -> Self {
        LogEventBuilder {
            event: LogEvent {
                time: SystemTime::now(),
                level: Cow::Borrowed(Level::Info.as_str()),
                logger_name: String::from("root"),
                module: String::new(),
                function: String::new(),
                line: 0,
                message: Message::default(),
                extra_fields: FieldMap::new(),
                exception: None,
                exception_text: None,
                stack_info: None,
                correlation_id: None,
            },
        }
    }
}

impl LogEventBuilder {
    /// Set [`time`](LogEvent::time).
    pub fn time(mut self, time: SystemTime) -> Self {
        self.event.time = time;
        self
    }

    /// Set [`level`](LogEvent::level).
    pub fn level(mut self, level: Level) -> Self {
        self.event.level = Cow::Borrowed(level.as_str());
        self
    }

    /// Set [`level_name`](LogEvent::level_name) to an arbitrary severity name.
    ///
    /// Names outside [`Level`] are kept verbatim and rejected by layouts that need a known level.
    pub fn level_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.event.level = name.into();
        self
    }

    /// Set [`logger_name`](LogEvent::logger_name).
    pub fn logger_name(mut self, name: impl Into<String>) -> Self {
        self.event.logger_name = name.into();
        self
    }

    /// Set [`module`](LogEvent::module).
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.event.module = module.into();
        self
    }

    /// Set [`function`](LogEvent::function).
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.event.function = function.into();
        self
    }

    /// Set [`line`](LogEvent::line).
    pub fn line(mut self, line: u32) -> Self {
        self.event.line = line;
        self
    }

    /// Set [`message`](LogEvent::message), either text or a structured payload.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.event.message = message.into();
        self
    }

    /// Replace all [`extra_fields`](LogEvent::extra_fields).
    pub fn extra_fields(mut self, fields: FieldMap) -> Self {
        self.event.extra_fields = fields;
        self
    }

    /// Add one extra field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.extra_fields.insert(key.into(), value.into());
        self
    }

    /// Add one extra field from any serializable value.
    ///
    /// # Errors
    ///
    /// Return an error if `value` cannot be represented as JSON.
    pub fn try_field<T>(self, key: impl Into<String>, value: &T) -> Result<Self, Error>
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => Ok(self.field(key, value)),
            Err(err) => Err(Error::from_serde_error(err).with_context("field", key)),
        }
    }

    /// Set [`exception`](LogEvent::exception).
    pub fn exception(mut self, exception: ExceptionInfo) -> Self {
        self.event.exception = Some(exception);
        self
    }

    /// Set [`exception_text`](LogEvent::exception_text).
    pub fn exception_text(mut self, text: impl Into<String>) -> Self {
        self.event.exception_text = Some(text.into());
        self
    }

    /// Set [`stack_info`](LogEvent::stack_info).
    pub fn stack_info(mut self, stack: impl Into<String>) -> Self {
        self.event.stack_info = Some(stack.into());
        self
    }

    /// Capture the current call stack as [`stack_info`](LogEvent::stack_info).
    pub fn capture_stack(self) -> Self {
        let backtrace = std::backtrace::Backtrace::force_capture();
        self.stack_info(backtrace.to_string())
    }

    /// Set [`correlation_id`](LogEvent::correlation_id).
    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.event.correlation_id = Some(id.into());
        self
    }

    /// Invoke the builder and return a `LogEvent`
    pub fn build(self) -> LogEvent {
        self.event
    }
}
