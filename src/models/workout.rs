use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codec;

/// A logged workout as returned by `GET /workouts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
  #[serde(deserialize_with = "codec::id")]
  pub id: String,
  #[serde(rename = "type")]
  pub workout_type: String,
  /// Minutes
  #[serde(deserialize_with = "codec::count")]
  pub duration: u32,
  #[serde(default, deserialize_with = "codec::count")]
  pub calories: u32,
  #[serde(default, with = "codec::optional_timestamp")]
  pub timestamp: Option<DateTime<Utc>>,
}

/// For logging new workouts (without id, timestamp)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
  #[serde(rename = "type")]
  pub workout_type: String,
  pub duration: u32,
  pub calories: u32,
}

/// Newest first; workouts without a timestamp sink to the end.
pub fn sort_newest_first(workouts: &mut [Workout]) {
  workouts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
