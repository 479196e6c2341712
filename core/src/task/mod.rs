/*
 * mod.rs
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

//! Todo-list tasks and their JSON form.
//!
//! Encoding goes through writers registered in the global [`Registry`] by
//! [`register_writers`]; decoding goes through [`TaskBuilder`].

mod builder;
mod kind;
mod record;

use once_cell::sync::OnceCell;

use crate::json::{decode, encode, list_of, JsonError, Registry, ValueContext};

pub use builder::TaskBuilder;
pub use kind::TaskKind;
pub use record::{Task, TaskError};

/// Register the task writers in the global registry. Runs once per process.
pub fn register_writers() {
    static REGISTERED: OnceCell<()> = OnceCell::new();
    REGISTERED.get_or_init(|| register_writers_in(Registry::global()));
}

/// Register the task writers in `registry`.
pub fn register_writers_in(registry: &Registry) {
    registry.register::<TaskKind>(write_kind);
    registry.register::<Task>(write_task);
}

fn write_kind(ctx: ValueContext<'_, '_>, kind: &TaskKind) -> Result<(), JsonError> {
    ctx.write_str(kind.name());
    Ok(())
}

fn write_task(ctx: ValueContext<'_, '_>, task: &Task) -> Result<(), JsonError> {
    ctx.write_object(|obj| {
        obj.write_field("type", &task.kind())?;
        obj.field("description").write_str(task.description());
        obj.write_field("completed", &task.is_completed())?;
        if let (Some(field), Some(when)) = (task.kind().time_field(), task.when()) {
            obj.field(field).write_str(when);
        }
        Ok(())
    })
}

/// Encode a task list as a JSON array.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, JsonError> {
    register_writers();
    encode(|ctx| {
        ctx.write_array(|arr| {
            for task in tasks {
                arr.write_element(task)?;
            }
            Ok(())
        })
    })
}

/// Decode a task list written by [`encode_tasks`].
pub fn decode_tasks(text: &str) -> Result<Vec<Task>, JsonError> {
    decode(text, &list_of(TaskBuilder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{to_string, JsonWriter};

    #[test]
    fn task_writer_emits_fields_in_order() {
        register_writers();
        let t = Task::deadline("return book", "Sunday").unwrap();
        assert_eq!(
            to_string(&t).unwrap(),
            r#"{"type":"Deadline","description":"return book","completed":false,"by":"Sunday"}"#
        );
    }

    #[test]
    fn list_roundtrip() {
        let mut done = Task::todo("buy milk").unwrap();
        done.mark_complete();
        let tasks = vec![
            done,
            Task::deadline("return book", "Sunday").unwrap(),
            Task::event("party", "Sat 8pm").unwrap(),
        ];
        let text = encode_tasks(&tasks).unwrap();
        assert_eq!(decode_tasks(&text).unwrap(), tasks);
        assert_eq!(encode_tasks(&[]).unwrap(), "[]");
    }

    #[test]
    fn local_registry_needs_registration() {
        let registry = Registry::new();
        let t = Task::todo("x").unwrap();
        let mut writer = JsonWriter::with_registry(&registry);
        let err = writer.write_root(|ctx| ctx.write_value(&t)).unwrap_err();
        assert!(matches!(err, JsonError::UnregisteredType { .. }));

        register_writers_in(&registry);
        let mut writer = JsonWriter::with_registry(&registry);
        writer.write_root(|ctx| ctx.write_value(&t)).unwrap();
        assert_eq!(
            writer.into_string().unwrap(),
            r#"{"type":"ToDo","description":"x","completed":false}"#
        );
    }
}
