/*
 * kind.rs
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

//! Task kinds and their list markers.

use std::fmt;

/// The three kinds of task the list can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    ToDo,
    Deadline,
    Event,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::ToDo, TaskKind::Deadline, TaskKind::Event];

    /// Name as stored in the `type` field.
    pub fn name(self) -> &'static str {
        match self {
            TaskKind::ToDo => "ToDo",
            TaskKind::Deadline => "Deadline",
            TaskKind::Event => "Event",
        }
    }

    /// One-letter marker shown in task listings.
    pub fn marker(self) -> &'static str {
        match self {
            TaskKind::ToDo => "T",
            TaskKind::Deadline => "D",
            TaskKind::Event => "E",
        }
    }

    /// Field holding the task's time, if this kind has one.
    pub fn time_field(self) -> Option<&'static str> {
        match self {
            TaskKind::ToDo => None,
            TaskKind::Deadline => Some("by"),
            TaskKind::Event => Some("at"),
        }
    }

    /// Case-insensitive lookup by name. Unknown names are treated as ToDo.
    pub fn from_name(name: &str) -> TaskKind {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .unwrap_or(TaskKind::ToDo)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
