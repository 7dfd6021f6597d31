//! Bridge between the UI thread and the async planner worker.

pub mod commands;
pub mod runtime;
