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

//! Tintlog renders log events for the console: a colored header line with the time, level,
//! logger and source location, followed by the message and the event's structured fields as JSON.
//!
//! # Overview
//!
//! A [`LogEvent`] is formatted by a [`Layout`]. The [`ConsoleLayout`](layout::ConsoleLayout)
//! produces output like:
//!
//! ```text
//! 12:34:56 INFO svc.worker worker.run:42 - abc-123
//! started{"job_id":"j-1"}
//! ```
//!
//! Extra fields that belong to the base record shape, `message` and `correlation_id` are never
//! repeated in the JSON tail. Writing the formatted output anywhere is left to the caller.
//!
//! # Examples
//!
//! ```
//! use tintlog::Level;
//! use tintlog::LogEvent;
//! use tintlog::layout::ConsoleLayout;
//!
//! let layout = ConsoleLayout::default().no_color();
//! let event = LogEvent::builder()
//!     .level(Level::Info)
//!     .logger_name("svc.worker")
//!     .module("worker")
//!     .function("run")
//!     .line(42)
//!     .message("started")
//!     .field("job_id", "j-1")
//!     .build();
//!
//! let text = layout.format_event(&event).unwrap();
//! assert!(text.ends_with(" INFO svc.worker worker.run:42\nstarted{\"job_id\":\"j-1\"}"));
//! ```
//!
//! With the `bridge-log` feature, records of the [`log`](https://docs.rs/log) crate convert via
//! [`LogEvent::from_log_record`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub extern crate colored;
pub extern crate jiff;

pub mod bridge;
pub mod color;
pub mod fields;
pub mod layout;
pub mod record;

mod error;

pub use self::error::Error;
pub use self::layout::Layout;
pub use self::record::Level;
pub use self::record::LogEvent;
pub use self::record::Message;
