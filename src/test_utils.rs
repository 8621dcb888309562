//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Date helpers
//! - Mock data factories
//! - API clients pointed at a mock server
//! - Helper assertions

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::api::{ApiClient, ApiConfig};
use crate::models::{PlannedWorkout, Profile, WeeklyTargetType, Workout};

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
  date(year, month, day)
    .and_hms_opt(hour, minute, 0)
    .expect("valid test time")
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(year, month, day, hour, 0, 0)
    .single()
    .expect("valid test timestamp")
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Untimed, not yet completed plan
pub fn mock_planned_workout(id: &str, workout_type: &str, planned_date: NaiveDate, minutes: u32) -> PlannedWorkout {
  PlannedWorkout {
    id: id.to_string(),
    workout_type: workout_type.to_string(),
    planned_date,
    planned_time: None,
    planned_duration: minutes,
    notes: None,
    completed: false,
    completed_workout_id: None,
  }
}

pub fn mock_workout(id: &str, workout_type: &str, minutes: u32, timestamp: Option<DateTime<Utc>>) -> Workout {
  Workout {
    id: id.to_string(),
    workout_type: workout_type.to_string(),
    duration: minutes,
    calories: 0,
    timestamp,
  }
}

/// A complete 150 lb profile with the given weekly target
pub fn mock_profile(target_type: WeeklyTargetType, target_value: u32) -> Profile {
  Profile {
    height_feet: Some(5),
    height_inches: Some(9),
    current_weight: Some(150.0),
    age: Some(30),
    weekly_target_type: Some(target_type),
    weekly_target_value: Some(target_value),
    ..Default::default()
  }
}

/// ---------------------------------------------------------------------------
/// API Helpers
/// ---------------------------------------------------------------------------

pub const TEST_TOKEN: &str = "test-token";

pub fn test_config(base: &str) -> ApiConfig {
  ApiConfig::new(base, Some(TEST_TOKEN.to_string())).expect("valid mock server url")
}

/// Client signed in with `TEST_TOKEN` against a mock server
pub fn test_client(base: &str) -> ApiClient {
  ApiClient::new(&test_config(base)).expect("client builds")
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_factories_create_valid_data() {
    let profile = mock_profile(WeeklyTargetType::Duration, 120);
    assert!(profile.is_complete());
    assert_eq!(profile.weekly_target(), Some((WeeklyTargetType::Duration, 120)));

    let plan = mock_planned_workout("p1", "yoga", date(2024, 6, 1), 45);
    assert!(!plan.completed);
    assert!(plan.planned_time.is_none());

    let workout = mock_workout("w1", "running", 30, Some(utc(2024, 6, 1, 8)));
    assert_eq!(workout.duration, 30);
  }

  #[test]
  fn test_client_carries_token() {
    let client = test_client("http://127.0.0.1:9/api");
    assert!(client.has_token());
  }
}
