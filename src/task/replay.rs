#![forbid(unsafe_code)]

//! Headless driver: a line-oriented script of list operations.
//!
//! ```text
//! # comment
//! add Buy milk
//! toggle 1
//! # default color, then recolor task 1
//! pick
//! choose sky-blue
//! pick 1
//! dismiss
//! delete 1
//! ```
//!
//! Comments take a whole line. Task positions are 1-based and resolved
//! when the line runs. A position with no task behind it targets nothing,
//! so the op is a no-op.

use crate::error::TodoError;
use crate::task::list::TodoList;
use crate::task::model::TaskId;
use crate::task::palette::TaskColor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Add(String),
    Toggle(usize),
    Delete(usize),
    Pick(Option<usize>),
    Choose(TaskColor),
    Dismiss,
}

pub fn parse_script(src: &str) -> Result<Vec<Op>, TodoError> {
    let mut ops = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        if let Some(op) = parse_line(raw).map_err(|msg| TodoError::Replay { line: i + 1, msg })? {
            ops.push(op);
        }
    }
    Ok(ops)
}

fn parse_line(raw: &str) -> Result<Option<Op>, String> {
    let line = raw.trim_start();
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let op = match verb.to_ascii_lowercase().as_str() {
        // Keep the text as written; the list trims it.
        "add" => Op::Add(rest.to_owned()),
        "toggle" => Op::Toggle(parse_position(rest)?),
        "delete" | "rm" => Op::Delete(parse_position(rest)?),
        "pick" => {
            if rest.trim().is_empty() {
                Op::Pick(None)
            } else {
                Op::Pick(Some(parse_position(rest)?))
            }
        }
        "choose" => Op::Choose(rest.parse::<TaskColor>().map_err(|e| e.to_string())?),
        "dismiss" => Op::Dismiss,
        other => return Err(format!("unknown operation '{other}'")),
    };
    Ok(Some(op))
}

fn parse_position(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("missing task position".to_owned());
    }
    match s.parse::<usize>() {
        Ok(0) => Err("task positions start at 1".to_owned()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid task position '{s}': {e}")),
    }
}

fn id_at(list: &TodoList, pos: usize) -> Option<TaskId> {
    list.tasks().get(pos - 1).map(|t| t.id)
}

pub fn apply(list: &mut TodoList, op: &Op) {
    match op {
        Op::Add(text) => {
            list.add_task(text);
        }
        Op::Toggle(pos) => {
            if let Some(id) = id_at(list, *pos) {
                list.toggle_task(id);
            }
        }
        Op::Delete(pos) => {
            if let Some(id) = id_at(list, *pos) {
                list.delete_task(id);
            }
        }
        Op::Pick(None) => list.open_color_picker(None),
        Op::Pick(Some(pos)) => {
            if let Some(id) = id_at(list, *pos) {
                list.open_color_picker(Some(id));
            }
        }
        Op::Choose(color) => list.choose_color(*color),
        Op::Dismiss => list.dismiss_color_picker(),
    }
}

pub fn run(list: &mut TodoList, ops: &[Op]) {
    for op in ops {
        apply(list, op);
    }
}
