use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::codec;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeeklyTargetType {
  #[default]
  Workouts,
  Duration,
}

impl WeeklyTargetType {
  pub fn as_str(&self) -> &'static str {
    match self {
      WeeklyTargetType::Workouts => "workouts",
      WeeklyTargetType::Duration => "duration",
    }
  }
}

impl std::str::FromStr for WeeklyTargetType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "workouts" => Ok(WeeklyTargetType::Workouts),
      "duration" | "minutes" => Ok(WeeklyTargetType::Duration),
      other => Err(format!("Unknown weekly target type: {}", other)),
    }
  }
}

/// The user's profile (`GET/POST /profile`). Weights are in pounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  #[serde(default, deserialize_with = "codec::optional_count")]
  pub height_feet: Option<u32>,
  #[serde(default, deserialize_with = "codec::optional_count")]
  pub height_inches: Option<u32>,
  #[serde(default, deserialize_with = "codec::optional_number")]
  pub current_weight: Option<f64>,
  #[serde(default, deserialize_with = "codec::optional_count")]
  pub age: Option<u32>,
  #[serde(default, deserialize_with = "codec::optional_text")]
  pub sex: Option<String>,
  #[serde(default, deserialize_with = "codec::optional_text")]
  pub goals: Option<String>,
  #[serde(default, deserialize_with = "codec::optional_number")]
  pub target_weight: Option<f64>,
  #[serde(default, deserialize_with = "lenient_target_type")]
  pub weekly_target_type: Option<WeeklyTargetType>,
  #[serde(default, deserialize_with = "codec::optional_count")]
  pub weekly_target_value: Option<u32>,
  #[serde(default, with = "codec::optional_date")]
  pub goal_deadline: Option<NaiveDate>,
  #[serde(default, deserialize_with = "codec::optional_count")]
  pub workout_frequency: Option<u32>,
  #[serde(default, deserialize_with = "codec::optional_text")]
  pub activity_level: Option<String>,
  #[serde(default, deserialize_with = "codec::optional_text")]
  pub gym_experience: Option<String>,
}

fn lenient_target_type<'de, D>(deserializer: D) -> Result<Option<WeeklyTargetType>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  Ok(
    Option::<String>::deserialize(deserializer)?
      .and_then(|s| s.parse::<WeeklyTargetType>().ok()),
  )
}

impl Profile {
  /// A profile is complete once height, weight and age are known
  pub fn is_complete(&self) -> bool {
    self.height_feet.is_some() && self.current_weight.is_some() && self.age.is_some()
  }

  /// Weekly target, if both a type and a non-zero value are set
  pub fn weekly_target(&self) -> Option<(WeeklyTargetType, u32)> {
    match (self.weekly_target_type, self.weekly_target_value) {
      (Some(kind), Some(value)) if value > 0 => Some((kind, value)),
      _ => None,
    }
  }

  /// Pounds left between current and target weight
  pub fn weight_to_go(&self) -> Option<f64> {
    match (self.current_weight, self.target_weight) {
      (Some(current), Some(target)) => Some((current - target).abs()),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_object_is_incomplete() {
    let profile: Profile = serde_json::from_str("{}").unwrap();
    assert!(!profile.is_complete());
    assert_eq!(profile.weekly_target(), None);
  }

  #[test]
  fn test_complete_profile() {
    let profile: Profile = serde_json::from_value(serde_json::json!({
      "height_feet": 5,
      "height_inches": 10,
      "current_weight": 180,
      "age": 34,
      "weekly_target_type": "duration",
      "weekly_target_value": 150,
      "target_weight": 170,
      "goal_deadline": "2025-01-01",
      "sex": ""
    }))
    .unwrap();
    assert!(profile.is_complete());
    assert_eq!(profile.weekly_target(), Some((WeeklyTargetType::Duration, 150)));
    assert_eq!(profile.weight_to_go(), Some(10.0));
    assert_eq!(profile.height_inches, Some(10));
    assert_eq!(profile.sex, None);
  }

  #[test]
  fn test_zero_target_value_means_no_target() {
    let profile = Profile {
      weekly_target_type: Some(WeeklyTargetType::Workouts),
      weekly_target_value: Some(0),
      ..Default::default()
    };
    assert_eq!(profile.weekly_target(), None);
  }

  #[test]
  fn test_target_type_parsing() {
    assert_eq!("Workouts".parse::<WeeklyTargetType>(), Ok(WeeklyTargetType::Workouts));
    assert_eq!("duration".parse::<WeeklyTargetType>(), Ok(WeeklyTargetType::Duration));
    assert!("laps".parse::<WeeklyTargetType>().is_err());
  }
}
