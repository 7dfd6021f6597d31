//! UI layer for the planner window: form model, markdown plan model, result rendering, and app shell.

pub mod app;
pub mod form;
pub mod markdown;
pub mod render;

pub use app::VacationPlannerApp;
