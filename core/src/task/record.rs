/*
 * record.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Duke.
 *
 * Duke is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Duke is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Duke.  If not, see <http://www.gnu.org/licenses/>.
 */

//! The task record.

use std::fmt;

use thiserror::Error;

use crate::json::{required, JsonError, Map, Value};

use super::kind::TaskKind;

const COMPLETED_MARKER: &str = "[✓]";
const INCOMPLETE_MARKER: &str = "[✗]";

/// Task validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("The description of a {0} cannot be empty.")]
    EmptyDescription(TaskKind),
    #[error("The time of a {0} cannot be empty.")]
    EmptyTime(TaskKind),
}

impl From<TaskError> for JsonError {
    fn from(e: TaskError) -> Self {
        JsonError::invalid(e.to_string())
    }
}

/// One entry in the task list. Deadlines carry a `by` time and events an `at` time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    kind: TaskKind,
    description: String,
    completed: bool,
    when: Option<String>,
}

impl Task {
    pub fn todo(description: impl Into<String>) -> Result<Self, TaskError> {
        Self::from_parts(TaskKind::ToDo, description.into(), false, None)
    }

    pub fn deadline(
        description: impl Into<String>,
        by: impl Into<String>,
    ) -> Result<Self, TaskError> {
        Self::from_parts(TaskKind::Deadline, description.into(), false, Some(by.into()))
    }

    pub fn event(description: impl Into<String>, at: impl Into<String>) -> Result<Self, TaskError> {
        Self::from_parts(TaskKind::Event, description.into(), false, Some(at.into()))
    }

    /// Validate and assemble a task. A time given to a ToDo is dropped.
    pub(crate) fn from_parts(
        kind: TaskKind,
        description: String,
        completed: bool,
        when: Option<String>,
    ) -> Result<Self, TaskError> {
        if description.is_empty() {
            return Err(TaskError::EmptyDescription(kind));
        }
        let when = match kind.time_field() {
            Some(_) => match when {
                Some(w) if !w.is_empty() => Some(w),
                _ => return Err(TaskError::EmptyTime(kind)),
            },
            None => None,
        };
        Ok(Self {
            kind,
            description,
            completed,
            when,
        })
    }

    /// Build from a decoded field mapping, as produced by `map_of(AnyValue)`.
    /// `type` defaults to ToDo and `completed` to false when absent; a field of the wrong
    /// shape is an error either way.
    pub fn from_fields(fields: &Map<Value>) -> Result<Self, JsonError> {
        let kind = string_field(fields, "type")?
            .map(TaskKind::from_name)
            .unwrap_or(TaskKind::ToDo);
        let description = required("description", string_field(fields, "description")?)?;
        let completed = match fields.get("completed") {
            None => false,
            Some(value) => value
                .as_bool()
                .ok_or_else(|| JsonError::unsupported("boolean", value.shape()))?,
        };
        let when = match kind.time_field() {
            Some(field) => Some(required(field, string_field(fields, field)?)?.to_string()),
            None => None,
        };
        Ok(Self::from_parts(kind, description.to_string(), completed, when)?)
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// `by` time of a deadline or `at` time of an event.
    pub fn when(&self) -> Option<&str> {
        self.when.as_deref()
    }

    pub fn mark_complete(&mut self) {
        self.completed = true;
    }
}

/// A string field that may be absent but must be a string when present.
fn string_field<'a>(fields: &'a Map<Value>, name: &str) -> Result<Option<&'a str>, JsonError> {
    match fields.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| JsonError::unsupported("string", value.shape())),
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let done = if self.completed {
            COMPLETED_MARKER
        } else {
            INCOMPLETE_MARKER
        };
        write!(f, "[{}]{} {}", self.kind.marker(), done, self.description)?;
        if let (Some(field), Some(when)) = (self.kind.time_field(), &self.when) {
            write!(f, " ({}: {})", field, when)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{decode, map_of, AnyValue, Shape};

    #[test]
    fn empty_description_rejected() {
        assert_eq!(Task::todo("").unwrap_err(), TaskError::EmptyDescription(TaskKind::ToDo));
        assert_eq!(
            Task::todo("").unwrap_err().to_string(),
            "The description of a ToDo cannot be empty."
        );
        assert_eq!(Task::deadline("x", "").unwrap_err(), TaskError::EmptyTime(TaskKind::Deadline));
    }

    #[test]
    fn display() {
        let mut t = Task::todo("buy milk").unwrap();
        assert_eq!(t.to_string(), "[T][✗] buy milk");
        t.mark_complete();
        assert_eq!(t.to_string(), "[T][✓] buy milk");
        let d = Task::deadline("return book", "Sunday").unwrap();
        assert_eq!(d.to_string(), "[D][✗] return book (by: Sunday)");
        let e = Task::event("meeting", "2pm").unwrap();
        assert_eq!(e.to_string(), "[E][✗] meeting (at: 2pm)");
    }

    #[test]
    fn from_fields_defaults_and_requirements() {
        let mut fields = Map::new();
        fields.insert("description".to_string(), Value::from("read"));
        let t = Task::from_fields(&fields).unwrap();
        assert_eq!(t.kind(), TaskKind::ToDo);
        assert!(!t.is_completed());

        fields.insert("type".to_string(), Value::from("event"));
        let err = Task::from_fields(&fields).unwrap_err();
        assert!(matches!(err, JsonError::MissingField { ref field } if field == "at"));

        let err = Task::from_fields(&Map::new()).unwrap_err();
        assert!(matches!(err, JsonError::MissingField { ref field } if field == "description"));
    }

    #[test]
    fn from_fields_rejects_wrong_shapes() {
        let decode_fields =
            |text: &str| Task::from_fields(&decode(text, &map_of(AnyValue)).unwrap());

        let err = decode_fields(r#"{"description":"x","completed":"yes"}"#).unwrap_err();
        assert!(matches!(
            err,
            JsonError::UnsupportedShape { actual: Shape::String, ref expected }
                if expected == "boolean"
        ));

        let err = decode_fields(r#"{"description":42}"#).unwrap_err();
        assert!(matches!(
            err,
            JsonError::UnsupportedShape { actual: Shape::Number, ref expected }
                if expected == "string"
        ));

        let err = decode_fields(r#"{"type":"Deadline","description":"x","by":7}"#).unwrap_err();
        assert!(matches!(err, JsonError::UnsupportedShape { actual: Shape::Number, .. }));

        let err = decode_fields(r#"{"type":null,"description":"x"}"#).unwrap_err();
        assert!(matches!(err, JsonError::UnsupportedShape { actual: Shape::Null, .. }));

        let t = decode_fields(r#"{"description":"x","completed":true}"#).unwrap();
        assert!(t.is_completed());
    }
}
