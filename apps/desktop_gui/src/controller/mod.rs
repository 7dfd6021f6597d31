//! Controller layer: UI events, state transitions, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod state;
pub mod submission;
