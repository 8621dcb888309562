//! Server-computed insight payloads
//!
//! Streaks, week-over-week comparisons and consistency stats are aggregated by
//! the API. The client only renders them, so every field is optional and
//! null or float-typed values decode to a usable default.

use serde::{Deserialize, Serialize};

use super::codec;

/// `GET /insights`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsSummary {
  #[serde(default)]
  pub message: Option<String>,
}

/// `GET /insights/comprehensive`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprehensiveInsights {
  pub weekly_progress: Option<ServerWeeklyProgress>,
  pub week_comparison: Option<WeekComparison>,
  pub streak: Option<Streak>,
  pub consistency_stats: Option<ConsistencyStats>,
  pub workout_frequency: Vec<FrequencyPoint>,
  pub calories_over_time: Vec<CaloriesPoint>,
  pub workout_type_breakdown: Vec<TypeBreakdown>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerWeeklyProgress {
  #[serde(deserialize_with = "codec::number")]
  pub current: f64,
  #[serde(deserialize_with = "codec::number")]
  pub target: f64,
  #[serde(deserialize_with = "codec::text")]
  pub unit: String,
  pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekComparison {
  #[serde(deserialize_with = "codec::number")]
  pub this_week_workouts: f64,
  pub workout_change_percent: Option<f64>,
  #[serde(deserialize_with = "codec::number")]
  pub this_week_duration: f64,
  pub duration_change_percent: Option<f64>,
  #[serde(deserialize_with = "codec::number")]
  pub this_week_calories: f64,
  pub calories_change_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Streak {
  #[serde(deserialize_with = "codec::count")]
  pub current_streak: u32,
  #[serde(deserialize_with = "codec::count")]
  pub longest_streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyStats {
  #[serde(deserialize_with = "codec::number")]
  pub total_workouts: f64,
  #[serde(deserialize_with = "codec::number")]
  pub total_duration: f64,
  #[serde(deserialize_with = "codec::number")]
  pub total_calories: f64,
  #[serde(deserialize_with = "codec::number")]
  pub avg_workouts_per_week: f64,
  #[serde(deserialize_with = "codec::number")]
  pub avg_duration_per_workout: f64,
  pub most_active_day: Option<String>,
  pub favorite_workout_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyPoint {
  #[serde(deserialize_with = "codec::text")]
  pub date: String,
  #[serde(deserialize_with = "codec::number")]
  pub count: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaloriesPoint {
  #[serde(deserialize_with = "codec::text")]
  pub date: String,
  #[serde(deserialize_with = "codec::number")]
  pub calories: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeBreakdown {
  #[serde(rename = "type", deserialize_with = "codec::text")]
  pub workout_type: String,
  #[serde(deserialize_with = "codec::number")]
  pub count: f64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_partial_payload() {
    let insights: ComprehensiveInsights = serde_json::from_value(serde_json::json!({
      "streak": {"current_streak": 4},
      "workout_type_breakdown": [{"type": "running", "count": 3}],
      "unexpected": true
    }))
    .unwrap();
    let streak = insights.streak.unwrap();
    assert_eq!(streak.current_streak, 4);
    assert_eq!(streak.longest_streak, 0);
    assert_eq!(insights.workout_type_breakdown[0].workout_type, "running");
    assert!(insights.week_comparison.is_none());
    assert!(insights.calories_over_time.is_empty());
  }

  #[test]
  fn test_float_and_null_fields_decode() {
    let insights: ComprehensiveInsights = serde_json::from_value(serde_json::json!({
      "streak": {"current_streak": 3.0, "longest_streak": null},
      "weekly_progress": {"current": 1, "target": null, "unit": null},
      "workout_frequency": [{"date": null, "count": "2"}],
      "workout_type_breakdown": [{"type": null, "count": 1.0}]
    }))
    .unwrap();

    let streak = insights.streak.unwrap();
    assert_eq!(streak.current_streak, 3);
    assert_eq!(streak.longest_streak, 0);

    let weekly = insights.weekly_progress.unwrap();
    assert_eq!(weekly.current, 1.0);
    assert_eq!(weekly.target, 0.0);
    assert_eq!(weekly.unit, "");

    assert_eq!(insights.workout_frequency[0].date, "");
    assert_eq!(insights.workout_frequency[0].count, 2.0);
    assert_eq!(insights.workout_type_breakdown[0].workout_type, "");
  }
}
