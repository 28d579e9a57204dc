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

use std::time::Duration;
use std::time::SystemTime;

use tintlog::Level;
use tintlog::LogEvent;
use tintlog::jiff::tz::TimeZone;
use tintlog::layout::ConsoleLayout;

fn format(level: Level, correlation_id: Option<&str>) -> String {
    // colored decides from the terminal otherwise
    tintlog::colored::control::set_override(true);

    let mut builder = LogEvent::builder()
        .time(SystemTime::UNIX_EPOCH + Duration::from_secs(12 * 3600 + 34 * 60 + 56))
        .level(level)
        .logger_name("svc.worker")
        .module("worker")
        .function("run")
        .line(42)
        .message("started")
        .field("job_id", "j-1");
    if let Some(id) = correlation_id {
        builder = builder.correlation_id(id);
    }

    ConsoleLayout::default()
        .timezone(TimeZone::UTC)
        .format_event(&builder.build())
        .unwrap()
}

fn strip_ansi(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn header_fields_are_colored() {
    let output = format(Level::Info, None);
    assert_eq!(
        output,
        "\x1b[35m12:34:56\x1b[0m \x1b[44mINFO\x1b[0m \x1b[36msvc.worker\x1b[0m \
         \x1b[33mworker\x1b[0m.\x1b[34mrun\x1b[0m:\x1b[32m42\x1b[0m\n\
         started{\"job_id\":\"j-1\"}"
    );
}

#[test]
fn level_colors() {
    for (level, code) in [
        (Level::Warning, "43"),
        (Level::Info, "44"),
        (Level::Debug, "100"),
        (Level::Critical, "43"),
        (Level::Error, "41"),
    ] {
        let output = format(level, None);
        let expected = format!(" \x1b[{code}m{level}\x1b[0m ");
        assert!(output.contains(&expected), "{level}: {output:?}");
    }
}

#[test]
fn correlation_id_suffix() {
    let output = format(Level::Info, Some("abc-123"));
    let (header, rest) = output.split_once('\n').unwrap();
    assert!(
        header.ends_with(":\x1b[32m42\x1b[0m - \x1b[33mabc-123\x1b[0m"),
        "{header:?}"
    );
    assert_eq!(rest, "started{\"job_id\":\"j-1\"}");
}

#[test]
fn stripped_output_matches_plain_layout() {
    let output = format(Level::Warning, Some("abc-123"));
    assert_eq!(
        strip_ansi(&output),
        "12:34:56 WARNING svc.worker worker.run:42 - abc-123\nstarted{\"job_id\":\"j-1\"}"
    );
}
