#![forbid(unsafe_code)]

pub mod draft;
pub mod list;
pub mod model;
pub mod palette;
pub mod replay;
