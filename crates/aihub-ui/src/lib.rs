//! egui panels and view state for the AI Hub client.
//!
//! Panels never call the backend themselves; they return an action that the
//! app turns into a background task.

pub mod panels;
pub mod state;
pub mod theme;

#[cfg(test)]
mod tests;
