//! Fitness tracker client
//!
//! Logs workouts, schedules planned workouts and reads insights from the
//! fitness API. Calorie estimates, weekly goal progress, the month calendar
//! and missed-workout detection are computed locally.

pub mod api;
pub mod calendar;
pub mod commands;
pub mod display;
pub mod form;
pub mod met;
pub mod missed;
pub mod models;
pub mod progress;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use api::{ApiClient, ApiConfig, ApiError};
pub use commands::{AppState, CommandError, Confirm};
