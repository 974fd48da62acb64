#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::palette::TaskColor;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First six hex digits, enough to tell tasks apart in logs.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string().chars().take(6).collect()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<TaskColor>,
}

impl Task {
    /// Callers are responsible for passing already-trimmed, non-empty text.
    #[must_use]
    pub fn new(text: String, color: Option<TaskColor>) -> Self {
        Self {
            id: TaskId::new(),
            text,
            done: false,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<TaskId> = (0..1000).map(|_| TaskId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn short_id_is_prefix_of_display() {
        let id = TaskId::new();
        assert_eq!(id.short().len(), 6);
        assert!(id.to_string().starts_with(&id.short()));
    }

    #[test]
    fn new_task_starts_open() {
        let t = Task::new("Buy milk".to_owned(), Some(TaskColor::Pink));
        assert!(!t.done);
        assert_eq!(t.color, Some(TaskColor::Pink));
    }

    #[test]
    fn plain_tasks_serialize_without_color() {
        let t = Task::new("X".to_owned(), None);
        let v = serde_json::to_value(&t).unwrap();
        assert!(v.get("color").is_none());
        assert_eq!(v["done"], serde_json::Value::Bool(false));
    }
}
