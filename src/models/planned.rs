use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::codec;

/// A workout scheduled ahead of time (`/planned-workouts`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkout {
  #[serde(deserialize_with = "codec::id")]
  pub id: String,
  pub workout_type: String,
  pub planned_date: NaiveDate,
  #[serde(default, with = "codec::optional_time")]
  pub planned_time: Option<NaiveTime>,
  #[serde(deserialize_with = "codec::count")]
  pub planned_duration: u32,
  #[serde(default, deserialize_with = "codec::optional_text")]
  pub notes: Option<String>,
  #[serde(default)]
  pub completed: bool,
  #[serde(default, deserialize_with = "codec::optional_id")]
  pub completed_workout_id: Option<String>,
}

impl PlannedWorkout {
  /// Combined date and time, when a time was given
  pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
    self.planned_time.map(|t| self.planned_date.and_time(t))
  }

  /// Copy of this plan marked done and linked to the logged workout
  pub fn completed_by(&self, workout_id: &str) -> Self {
    Self {
      completed: true,
      completed_workout_id: Some(workout_id.to_string()),
      ..self.clone()
    }
  }

  /// The editable fields, as sent when the plan itself is changed
  pub fn to_new(&self) -> NewPlannedWorkout {
    NewPlannedWorkout {
      workout_type: self.workout_type.clone(),
      planned_date: self.planned_date,
      planned_time: self.planned_time,
      planned_duration: self.planned_duration,
      notes: self.notes.clone(),
    }
  }
}

/// For scheduling or editing a plan (without id and completion state)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlannedWorkout {
  pub workout_type: String,
  pub planned_date: NaiveDate,
  #[serde(with = "codec::optional_time")]
  pub planned_time: Option<NaiveTime>,
  pub planned_duration: u32,
  pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deserialize_minimal_plan() {
    let plan: PlannedWorkout = serde_json::from_str(
      r#"{"id":7,"workout_type":"yoga","planned_date":"2024-06-03","planned_duration":"45","planned_time":null}"#,
    )
    .unwrap();
    assert_eq!(plan.id, "7");
    assert_eq!(plan.planned_time, None);
    assert!(!plan.completed);
    assert_eq!(plan.completed_workout_id, None);
    assert_eq!(plan.scheduled_at(), None);
  }

  #[test]
  fn test_completed_by_links_workout() {
    let plan: PlannedWorkout = serde_json::from_str(
      r#"{"id":"p1","workout_type":"hiit","planned_date":"2024-06-03","planned_time":"06:30","planned_duration":20,"notes":"track"}"#,
    )
    .unwrap();
    let done = plan.completed_by("w9");
    assert!(done.completed);
    assert_eq!(done.completed_workout_id.as_deref(), Some("w9"));
    assert_eq!(done.notes.as_deref(), Some("track"));

    let body = serde_json::to_value(&done).unwrap();
    assert_eq!(body["planned_time"], "06:30");
    assert_eq!(body["planned_date"], "2024-06-03");
    assert_eq!(body["completed"], true);
  }
}
