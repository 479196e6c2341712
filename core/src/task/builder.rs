/*
 * builder.rs
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

//! Decoding tasks straight from JSON objects.

use crate::json::{
    required, BooleanValue, JsonError, ObjectHandler, Receiver, StringValue, ValueHandler,
};

use super::kind::TaskKind;
use super::record::Task;

/// Handler producing a [`Task`] from an object such as
/// `{"type":"Deadline","description":"return book","completed":false,"by":"Sunday"}`.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskBuilder;

impl ValueHandler for TaskBuilder {
    type Output = Task;

    fn expecting(&self) -> &str {
        "task object"
    }

    fn handle_object<'h>(
        &'h self,
    ) -> Result<Box<dyn ObjectHandler<Output = Task> + 'h>, JsonError> {
        Ok(Box::new(TaskFields::default()))
    }
}

#[derive(Default)]
struct TaskFields {
    kind: Option<TaskKind>,
    description: Option<String>,
    completed: Option<bool>,
    by: Option<String>,
    at: Option<String>,
}

impl ObjectHandler for TaskFields {
    type Output = Task;

    fn handle_field(&mut self, name: String, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        match name.as_str() {
            "type" => self.kind = Some(TaskKind::from_name(&value.receive(&StringValue)?)),
            "description" => self.description = Some(value.receive(&StringValue)?),
            "completed" => self.completed = Some(value.receive(&BooleanValue)?),
            "by" => self.by = Some(value.receive(&StringValue)?),
            "at" => self.at = Some(value.receive(&StringValue)?),
            _ => {}
        }
        Ok(())
    }

    fn handle_end(self: Box<Self>) -> Result<Task, JsonError> {
        let fields = *self;
        let kind = fields.kind.unwrap_or(TaskKind::ToDo);
        let description = required("description", fields.description)?;
        let when = match kind {
            TaskKind::ToDo => None,
            TaskKind::Deadline => Some(required("by", fields.by)?),
            TaskKind::Event => Some(required("at", fields.at)?),
        };
        let completed = fields.completed.unwrap_or(false);
        Ok(Task::from_parts(kind, description, completed, when)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{decode, list_of, Shape};

    #[test]
    fn decodes_each_kind() {
        let t = decode(r#"{"description":"buy milk"}"#, &TaskBuilder).unwrap();
        assert_eq!(t, Task::todo("buy milk").unwrap());

        let d = decode(
            r#"{"type":"Deadline","description":"return book","completed":true,"by":"Sunday"}"#,
            &TaskBuilder,
        )
        .unwrap();
        assert_eq!(d.kind(), TaskKind::Deadline);
        assert!(d.is_completed());
        assert_eq!(d.when(), Some("Sunday"));

        let e = decode(
            r#"{"at":"2pm","type":"event","description":"meeting"}"#,
            &TaskBuilder,
        )
        .unwrap();
        assert_eq!(e, Task::event("meeting", "2pm").unwrap());
    }

    #[test]
    fn missing_description_fails_at_end() {
        let err = decode("{}", &TaskBuilder).unwrap_err();
        assert!(matches!(err, JsonError::MissingField { ref field } if field == "description"));
        let err = decode(r#"{"type":"Deadline","description":"x"}"#, &TaskBuilder).unwrap_err();
        assert!(matches!(err, JsonError::MissingField { ref field } if field == "by"));
    }

    #[test]
    fn empty_description_is_invalid() {
        let err = decode(r#"{"description":""}"#, &TaskBuilder).unwrap_err();
        assert_eq!(err.to_string(), "The description of a ToDo cannot be empty.");
    }

    #[test]
    fn wrong_field_shape() {
        let err = decode(r#"{"description":"x","completed":"no"}"#, &TaskBuilder).unwrap_err();
        assert!(matches!(
            err,
            JsonError::UnsupportedShape { actual: Shape::String, ref expected }
                if expected == "boolean"
        ));
        let err = decode("[]", &TaskBuilder).unwrap_err();
        assert!(matches!(err, JsonError::UnsupportedShape { actual: Shape::Array, .. }));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let t = decode(
            r#"{"description":"x","priority":{"level":[1,2]},"completed":false}"#,
            &TaskBuilder,
        )
        .unwrap();
        assert_eq!(t.description(), "x");
    }

    #[test]
    fn list_keeps_order() {
        let tasks = decode(
            r#"[{"description":"a"},{"description":"b"},{"description":"c"}]"#,
            &list_of(TaskBuilder),
        )
        .unwrap();
        let names: Vec<_> = tasks.iter().map(Task::description).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
