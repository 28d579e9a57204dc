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

//! Structured fields attached to a log event.

use std::collections::BTreeSet;

pub use serde_json::Value;

/// An ordered key-value map of structured fields.
///
/// Keys keep their insertion order, which is also the order they are serialized in.
pub type FieldMap = serde_json::Map<String, Value>;

/// Field names that belong to the base log record shape.
///
/// These never make it into the structured tail when they arrive as extra fields, since the
/// header already renders them or they describe the record itself.
pub const RESERVED_ATTRS: &[&str] = &[
    "args",
    "asctime",
    "created",
    "exc_info",
    "exc_text",
    "filename",
    "funcName",
    "levelname",
    "levelno",
    "lineno",
    "module",
    "msecs",
    "message",
    "msg",
    "name",
    "pathname",
    "process",
    "processName",
    "relativeCreated",
    "stack_info",
    "taskName",
    "thread",
    "threadName",
];

/// The field name of the correlation id.
pub const CORRELATION_ID: &str = "correlation_id";

/// The field name of the rendered exception.
pub const EXC_INFO: &str = "exc_info";

/// The field name of the rendered call stack.
pub const STACK_INFO: &str = "stack_info";

/// The field name of the human-readable message.
pub const MESSAGE: &str = "message";

/// The default reserved-attribute set: [`RESERVED_ATTRS`] plus [`CORRELATION_ID`].
pub fn default_reserved_attrs() -> BTreeSet<String> {
    RESERVED_ATTRS
        .iter()
        .chain(std::iter::once(&CORRELATION_ID))
        .map(|s| s.to_string())
        .collect()
}

/// Returns `true` if `key` has no meaningful value in `fields`.
///
/// A missing key and every falsy value are unset: `null`, `false`, zero, the empty string, the
/// empty array and the empty object.
pub(crate) fn is_unset(fields: &FieldMap, key: &str) -> bool {
    match fields.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// Inserts `value` under `key` unless the caller already set a value there.
pub(crate) fn insert_if_unset(fields: &mut FieldMap, key: &str, value: impl Into<Value>) {
    if is_unset(fields, key) {
        fields.insert(key.to_string(), value.into());
    }
}

/// Merges `extra` into `fields`, skipping every key found in `reserved`.
///
/// An extra key that is already present overwrites the existing value in place.
pub(crate) fn merge_extra(fields: &mut FieldMap, extra: &FieldMap, reserved: &BTreeSet<String>) {
    for (k, v) in extra {
        if !reserved.contains(k) {
            fields.insert(k.clone(), v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn map(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("not an object"),
        }
    }

    #[test]
    fn default_reserved_attrs_extends_base_set() {
        let reserved = default_reserved_attrs();
        assert_eq!(reserved.len(), RESERVED_ATTRS.len() + 1);
        assert!(reserved.contains(CORRELATION_ID));
        assert!(reserved.contains(MESSAGE));
        assert!(reserved.contains("funcName"));
    }

    #[test]
    fn unset_covers_falsy_values() {
        let fields = map(json!({
            "null": null, "empty": "", "zero": 0, "zero_f": 0.0, "no": false, "arr": [], "obj": {},
            "text": "x", "one": 1, "yes": true, "items": [0], "nested": {"a": null}
        }));
        for key in ["null", "empty", "zero", "zero_f", "no", "arr", "obj", "missing"] {
            assert!(is_unset(&fields, key), "{key}");
        }
        for key in ["text", "one", "yes", "items", "nested"] {
            assert!(!is_unset(&fields, key), "{key}");
        }
    }

    #[test]
    fn insert_never_overwrites() {
        let mut fields = map(json!({"exc_info": "mine"}));
        insert_if_unset(&mut fields, EXC_INFO, "theirs");
        insert_if_unset(&mut fields, STACK_INFO, "stack");
        assert_eq!(Value::Object(fields), json!({"exc_info": "mine", "stack_info": "stack"}));
    }

    #[test]
    fn merge_skips_reserved_and_keeps_order() {
        let mut fields = map(json!({"b": 1, "a": 2}));
        let extra = map(json!({"a": 3, "correlation_id": "x", "lineno": 9, "c": 4}));
        merge_extra(&mut fields, &extra, &default_reserved_attrs());

        let keys = fields.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(fields["a"], json!(3));
    }
}
