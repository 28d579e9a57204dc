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

use std::fmt::Write;
use std::path::Path;

use crate::Error;
use crate::fields::CORRELATION_ID;
use crate::fields::FieldMap;
use crate::layout::ConsoleLayout;
use crate::record::Level;
use crate::record::LogEvent;

/// The function name recorded for events from the `log` crate, which does not capture it.
pub const UNKNOWN_FUNCTION: &str = "?";

fn level_name(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => Level::Error.as_str(),
        log::Level::Warn => Level::Warning.as_str(),
        log::Level::Info => Level::Info.as_str(),
        log::Level::Debug => Level::Debug.as_str(),
        // not a known level; layouts with a fixed color table reject it
        log::Level::Trace => "TRACE",
    }
}

// the file stem names the module; fall back to the last segment of the module path
fn module_name(record: &log::Record) -> String {
    if let Some(stem) = record.file().map(Path::new).and_then(Path::file_stem) {
        return stem.to_string_lossy().into_owned();
    }

    record
        .module_path()
        .and_then(|path| path.rsplit("::").next())
        .unwrap_or_default()
        .to_string()
}

struct KvCollector {
    fields: FieldMap,
    correlation_id: Option<String>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KvCollector {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        let key = key.to_string();
        if key == CORRELATION_ID {
            self.correlation_id = Some(value.to_string());
        }
        match serde_json::to_value(&value) {
            Ok(value) => self.fields.insert(key, value),
            Err(_) => self.fields.insert(key, value.to_string().into()),
        };
        Ok(())
    }
}

impl LogEvent {
    /// Convert a [`log::Record`] into a log event.
    ///
    /// The target becomes the logger name, and the record's key-values become extra fields. A
    /// `correlation_id` key-value is also lifted into [`correlation_id`](LogEvent::correlation_id).
    /// Records at [`log::Level::Trace`] keep the level name `TRACE`.
    ///
    /// # Errors
    ///
    /// Return an error if the message arguments fail to format or the key-values cannot be
    /// visited.
    pub fn from_log_record(record: &log::Record) -> Result<LogEvent, Error> {
        let mut message = String::new();
        write!(&mut message, "{}", record.args()).map_err(Error::from_fmt_error)?;

        let mut collector = KvCollector {
            fields: FieldMap::new(),
            correlation_id: None,
        };
        record
            .key_values()
            .visit(&mut collector)
            .map_err(|err| Error::new("failed to visit key-values").with_context("cause", err))?;

        let mut builder = LogEvent::builder()
            .level_name(level_name(record.level()))
            .logger_name(record.target())
            .module(module_name(record))
            .function(UNKNOWN_FUNCTION)
            .line(record.line().unwrap_or_default())
            .message(message)
            .extra_fields(collector.fields);
        if let Some(id) = collector.correlation_id {
            builder = builder.correlation_id(id);
        }
        Ok(builder.build())
    }
}

impl ConsoleLayout {
    /// Format a [`log::Record`] directly.
    ///
    /// # Errors
    ///
    /// Return an error if the record cannot be converted or formatted; see
    /// [`LogEvent::from_log_record`] and [`ConsoleLayout::format_event`].
    pub fn format_log_record(&self, record: &log::Record) -> Result<String, Error> {
        let event = LogEvent::from_log_record(record)?;
        self.format_event(&event)
    }
}

#[cfg(test)]
mod tests {
    use jiff::tz::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn converts_record() {
        let kvs = vec![("job_id", "j-1"), ("correlation_id", "abc-123")];
        let event = LogEvent::from_log_record(
            &log::Record::builder()
                .args(format_args!("job {} started", 7))
                .level(log::Level::Warn)
                .target("svc.worker")
                .module_path(Some("svc::worker"))
                .file(Some("src/worker.rs"))
                .line(Some(42))
                .key_values(&kvs)
                .build(),
        )
        .unwrap();

        assert_eq!(event.level(), Some(Level::Warning));
        assert_eq!(event.logger_name(), "svc.worker");
        assert_eq!(event.module(), "worker");
        assert_eq!(event.function(), UNKNOWN_FUNCTION);
        assert_eq!(event.line(), 42);
        assert_eq!(
            event.message(),
            &crate::record::Message::Text("job 7 started".to_string())
        );
        assert_eq!(event.correlation_id(), Some("abc-123"));
        assert_eq!(
            serde_json::Value::Object(event.extra_fields().clone()),
            json!({"job_id": "j-1", "correlation_id": "abc-123"})
        );
    }

    #[test]
    fn module_falls_back_to_module_path() {
        let event = LogEvent::from_log_record(
            &log::Record::builder()
                .args(format_args!("hi"))
                .module_path(Some("svc::jobs::runner"))
                .build(),
        )
        .unwrap();
        assert_eq!(event.module(), "runner");
    }

    #[test]
    fn formats_record_with_correlation_id() {
        let layout = ConsoleLayout::default().no_color().timezone(TimeZone::UTC);
        let kvs = vec![("correlation_id", "abc-123"), ("user_id", "u-7")];
        let output = layout
            .format_log_record(
                &log::Record::builder()
                    .args(format_args!("login"))
                    .level(log::Level::Info)
                    .target("svc.auth")
                    .file(Some("src/auth.rs"))
                    .line(Some(9))
                    .key_values(&kvs)
                    .build(),
            )
            .unwrap();

        let (header, rest) = output.split_once('\n').unwrap();
        assert!(header.ends_with(" INFO svc.auth auth.?:9 - abc-123"), "{header}");
        assert_eq!(rest, "login{\"user_id\":\"u-7\"}");
    }

    #[test]
    fn trace_records_fail_to_format() {
        let layout = ConsoleLayout::default().no_color();
        let err = layout
            .format_log_record(
                &log::Record::builder()
                    .args(format_args!("noisy"))
                    .level(log::Level::Trace)
                    .build(),
            )
            .unwrap_err();
        assert_eq!(err.context("level"), Some("TRACE"));
    }
}
