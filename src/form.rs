//! Input forms
//!
//! Forms keep raw text as typed and only produce request bodies on submit,
//! after validation. Each `submit` either returns a ready payload or the first
//! problem found.

use chrono::NaiveDate;
use serde::Serialize;

use crate::met::MetTable;
use crate::models::codec::parse_time;
use crate::models::{NewPlannedWorkout, NewWorkout, PlannedWorkout, Profile, WeeklyTargetType};

/// ---------------------------------------------------------------------------
/// Profile Options
/// ---------------------------------------------------------------------------

pub const SEX_OPTIONS: &[&str] = &["male", "female", "other"];
pub const GOAL_OPTIONS: &[&str] = &[
  "lose-weight",
  "gain-muscle",
  "maintain",
  "improve-endurance",
  "general-fitness",
];
pub const ACTIVITY_LEVEL_OPTIONS: &[&str] = &[
  "sedentary",
  "lightly-active",
  "moderately-active",
  "very-active",
  "extremely-active",
];
pub const GYM_EXPERIENCE_OPTIONS: &[&str] = &["beginner", "novice", "intermediate", "advanced", "expert"];
pub const MAX_WORKOUT_FREQUENCY: u32 = 7;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
  #[error("{0} is required")]
  Required(&'static str),

  #[error("{field} must be a whole number, got {value:?}")]
  NotAWholeNumber { field: &'static str, value: String },

  #[error("{field} must be a number, got {value:?}")]
  NotANumber { field: &'static str, value: String },

  #[error("{field} {message}")]
  OutOfRange { field: &'static str, message: String },

  #[error("{field} must be a date (YYYY-MM-DD), got {value:?}")]
  InvalidDate { field: &'static str, value: String },

  #[error("Time must be HH:MM, got {0:?}")]
  InvalidTime(String),

  #[error("Cannot schedule workouts for past dates. Please select today or a future date.")]
  PastDate(NaiveDate),

  #[error("{field} must be one of {allowed}, got {value:?}")]
  UnknownOption {
    field: &'static str,
    value: String,
    allowed: String,
  },
}

impl Serialize for ValidationError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Field Parsing
/// ---------------------------------------------------------------------------

fn blank_to_none(raw: &str) -> Option<&str> {
  let trimmed = raw.trim();
  (!trimmed.is_empty()).then_some(trimmed)
}

fn required_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
  blank_to_none(raw)
    .map(str::to_string)
    .ok_or(ValidationError::Required(field))
}

fn whole_number(field: &'static str, raw: &str) -> Result<Option<u32>, ValidationError> {
  blank_to_none(raw)
    .map(|value| {
      value.parse::<u32>().map_err(|_| ValidationError::NotAWholeNumber {
        field,
        value: value.to_string(),
      })
    })
    .transpose()
}

/// Whole number where blank and zero both mean "not set"
fn optional_whole_number(field: &'static str, raw: &str) -> Result<Option<u32>, ValidationError> {
  Ok(whole_number(field, raw)?.filter(|n| *n > 0))
}

fn optional_weight(field: &'static str, raw: &str) -> Result<Option<f64>, ValidationError> {
  let Some(value) = blank_to_none(raw) else {
    return Ok(None);
  };
  let lbs: f64 = value.parse().map_err(|_| ValidationError::NotANumber {
    field,
    value: value.to_string(),
  })?;
  if !lbs.is_finite() || lbs < 0.0 {
    return Err(ValidationError::OutOfRange {
      field,
      message: "must be a positive number of pounds".into(),
    });
  }
  Ok((lbs > 0.0).then_some(lbs))
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
    field,
    value: raw.trim().to_string(),
  })
}

fn choice(field: &'static str, raw: &str, allowed: &[&str]) -> Result<Option<String>, ValidationError> {
  let Some(value) = blank_to_none(raw) else {
    return Ok(None);
  };
  let value = value.to_lowercase();
  if allowed.contains(&value.as_str()) {
    Ok(Some(value))
  } else {
    Err(ValidationError::UnknownOption {
      field,
      value,
      allowed: allowed.join(", "),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Workout Log Form
/// ---------------------------------------------------------------------------

/// Logging form with calorie auto-suggestion.
///
/// Once the user types a calorie value the form stops overwriting it. Whether
/// a later type or duration change should re-enable suggestions is still an
/// open UX question; for now the override sticks until `reset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
  pub workout_type: String,
  pub duration: String,
  pub calories: String,
  manual_calories: bool,
}

impl WorkoutForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_manual(&self) -> bool {
    self.manual_calories
  }

  pub fn set_type(&mut self, value: &str, weight_lbs: Option<f64>, mets: &MetTable) {
    self.workout_type = value.to_string();
    self.suggest(weight_lbs, mets);
  }

  pub fn set_duration(&mut self, value: &str, weight_lbs: Option<f64>, mets: &MetTable) {
    self.duration = value.to_string();
    self.suggest(weight_lbs, mets);
  }

  pub fn set_calories(&mut self, value: &str) {
    self.calories = value.to_string();
    self.manual_calories = true;
  }

  fn suggest(&mut self, weight_lbs: Option<f64>, mets: &MetTable) {
    if self.manual_calories || weight_lbs.is_none() {
      return;
    }
    let minutes = self.duration.trim().parse::<f64>().ok();
    match mets.estimate_calories(&self.workout_type, minutes, weight_lbs) {
      Some(calories) if calories > 0 => self.calories = calories.to_string(),
      _ => {}
    }
  }

  pub fn submit(&self) -> Result<NewWorkout, ValidationError> {
    let workout_type = required_text("Workout type", &self.workout_type)?;

    let duration = whole_number("Duration", &self.duration)?.ok_or(ValidationError::Required("Duration"))?;
    if duration == 0 {
      return Err(ValidationError::OutOfRange {
        field: "Duration",
        message: "must be at least 1 minute".into(),
      });
    }

    let calories = whole_number("Calories", &self.calories)?.ok_or(ValidationError::Required("Calories"))?;

    Ok(NewWorkout {
      workout_type: workout_type.to_lowercase(),
      duration,
      calories,
    })
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }
}

/// ---------------------------------------------------------------------------
/// Planned Workout Form
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedWorkoutForm {
  pub workout_type: String,
  pub planned_date: String,
  pub planned_time: String,
  pub planned_duration: String,
  pub notes: String,
}

impl PlannedWorkoutForm {
  /// Prefilled for editing an existing plan
  pub fn from_plan(plan: &PlannedWorkout) -> Self {
    Self {
      workout_type: plan.workout_type.clone(),
      planned_date: plan.planned_date.format("%Y-%m-%d").to_string(),
      planned_time: plan
        .planned_time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default(),
      planned_duration: plan.planned_duration.to_string(),
      notes: plan.notes.clone().unwrap_or_default(),
    }
  }

  /// Validate against `today`; the same rules apply to new plans and edits
  pub fn submit(&self, today: NaiveDate) -> Result<NewPlannedWorkout, ValidationError> {
    let workout_type = required_text("Workout type", &self.workout_type)?;

    let planned_date = match blank_to_none(&self.planned_date) {
      Some(raw) => parse_date("Date", raw)?,
      None => return Err(ValidationError::Required("Date")),
    };
    if planned_date < today {
      return Err(ValidationError::PastDate(planned_date));
    }

    let planned_time = blank_to_none(&self.planned_time)
      .map(|raw| parse_time(raw).ok_or_else(|| ValidationError::InvalidTime(raw.to_string())))
      .transpose()?;

    let planned_duration =
      whole_number("Duration", &self.planned_duration)?.ok_or(ValidationError::Required("Duration"))?;
    if planned_duration < 1 {
      return Err(ValidationError::OutOfRange {
        field: "Duration",
        message: "must be at least 1 minute".into(),
      });
    }

    Ok(NewPlannedWorkout {
      workout_type: workout_type.to_lowercase(),
      planned_date,
      planned_time,
      planned_duration,
      notes: blank_to_none(&self.notes).map(str::to_string),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Profile Form
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
  pub height_feet: String,
  pub height_inches: String,
  pub current_weight: String,
  pub age: String,
  pub sex: String,
  pub goals: String,
  pub target_weight: String,
  pub weekly_target_type: String,
  pub weekly_target_value: String,
  pub goal_deadline: String,
  pub workout_frequency: String,
  pub activity_level: String,
  pub gym_experience: String,
}

fn number_text<T: ToString>(value: Option<T>) -> String {
  value.map(|v| v.to_string()).unwrap_or_default()
}

impl ProfileForm {
  pub fn from_profile(profile: &Profile) -> Self {
    Self {
      height_feet: number_text(profile.height_feet),
      height_inches: number_text(profile.height_inches),
      current_weight: number_text(profile.current_weight),
      age: number_text(profile.age),
      sex: profile.sex.clone().unwrap_or_default(),
      goals: profile.goals.clone().unwrap_or_default(),
      target_weight: number_text(profile.target_weight),
      weekly_target_type: profile
        .weekly_target_type
        .unwrap_or_default()
        .as_str()
        .to_string(),
      weekly_target_value: number_text(profile.weekly_target_value),
      goal_deadline: number_text(profile.goal_deadline.map(|d| d.format("%Y-%m-%d"))),
      workout_frequency: number_text(profile.workout_frequency),
      activity_level: profile.activity_level.clone().unwrap_or_default(),
      gym_experience: profile.gym_experience.clone().unwrap_or_default(),
    }
  }

  pub fn submit(&self) -> Result<Profile, ValidationError> {
    let height_inches = optional_whole_number("Height (inches)", &self.height_inches)?;
    if height_inches.is_some_and(|i| i > 11) {
      return Err(ValidationError::OutOfRange {
        field: "Height (inches)",
        message: "must be between 0 and 11".into(),
      });
    }

    let workout_frequency = optional_whole_number("Workout frequency", &self.workout_frequency)?;
    if workout_frequency.is_some_and(|f| f > MAX_WORKOUT_FREQUENCY) {
      return Err(ValidationError::OutOfRange {
        field: "Workout frequency",
        message: format!("must be between 0 and {} days per week", MAX_WORKOUT_FREQUENCY),
      });
    }

    let weekly_target_type = match blank_to_none(&self.weekly_target_type) {
      Some(raw) => raw
        .parse::<WeeklyTargetType>()
        .map_err(|_| ValidationError::UnknownOption {
          field: "Weekly target type",
          value: raw.to_string(),
          allowed: "workouts, duration".into(),
        })?,
      None => WeeklyTargetType::default(),
    };

    let goal_deadline = blank_to_none(&self.goal_deadline)
      .map(|raw| parse_date("Goal deadline", raw))
      .transpose()?;

    Ok(Profile {
      height_feet: optional_whole_number("Height (feet)", &self.height_feet)?,
      height_inches,
      current_weight: optional_weight("Current weight", &self.current_weight)?,
      age: optional_whole_number("Age", &self.age)?,
      sex: choice("Sex", &self.sex, SEX_OPTIONS)?,
      goals: choice("Goal", &self.goals, GOAL_OPTIONS)?,
      target_weight: optional_weight("Target weight", &self.target_weight)?,
      weekly_target_type: Some(weekly_target_type),
      weekly_target_value: optional_whole_number("Weekly target", &self.weekly_target_value)?,
      goal_deadline,
      workout_frequency,
      activity_level: choice("Activity level", &self.activity_level, ACTIVITY_LEVEL_OPTIONS)?,
      gym_experience: choice("Gym experience", &self.gym_experience, GYM_EXPERIENCE_OPTIONS)?,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{date, mock_planned_workout};
  use chrono::NaiveTime;

  #[test]
  fn test_workout_form_suggests_calories_with_weight() {
    let mets = MetTable::standard();
    let mut form = WorkoutForm::new();
    form.set_type("running", Some(150.0), &mets);
    assert_eq!(form.calories, "");

    form.set_duration("60", Some(150.0), &mets);
    assert_eq!(form.calories, "667");

    form.set_duration("30", Some(150.0), &mets);
    assert_eq!(form.calories, "333");
  }

  #[test]
  fn test_workout_form_no_weight_no_suggestion() {
    let mets = MetTable::standard();
    let mut form = WorkoutForm::new();
    form.set_type("running", None, &mets);
    form.set_duration("60", None, &mets);
    assert_eq!(form.calories, "");
  }

  #[test]
  fn test_manual_calories_stick_until_reset() {
    let mets = MetTable::standard();
    let mut form = WorkoutForm::new();
    form.set_type("yoga", Some(150.0), &mets);
    form.set_calories("250");
    assert!(form.is_manual());

    form.set_duration("90", Some(150.0), &mets);
    assert_eq!(form.calories, "250");

    let workout = form.submit().unwrap();
    assert_eq!(
      workout,
      NewWorkout {
        workout_type: "yoga".into(),
        duration: 90,
        calories: 250
      }
    );

    form.reset();
    assert!(!form.is_manual());
    form.set_type("yoga", Some(150.0), &mets);
    form.set_duration("60", Some(150.0), &mets);
    assert_eq!(form.calories, "204");
  }

  #[test]
  fn test_zero_suggestion_keeps_previous_value() {
    let mets = MetTable::standard();
    let mut form = WorkoutForm::new();
    form.set_type("hiking", Some(180.0), &mets);
    form.set_duration("45", Some(180.0), &mets);
    let before = form.calories.clone();
    form.set_duration("0", Some(180.0), &mets);
    assert_eq!(form.calories, before);
  }

  #[test]
  fn test_workout_form_validation() {
    let mut form = WorkoutForm {
      workout_type: " ".into(),
      duration: "30".into(),
      calories: "100".into(),
      ..Default::default()
    };
    assert_eq!(form.submit(), Err(ValidationError::Required("Workout type")));

    form.workout_type = "Cycling".into();
    form.duration = "0".into();
    assert!(matches!(form.submit(), Err(ValidationError::OutOfRange { .. })));

    form.duration = "thirty".into();
    assert!(matches!(form.submit(), Err(ValidationError::NotAWholeNumber { .. })));

    form.duration = "30".into();
    form.calories = "-5".into();
    assert!(matches!(form.submit(), Err(ValidationError::NotAWholeNumber { .. })));

    form.calories = "0".into();
    assert_eq!(form.submit().unwrap().workout_type, "cycling");
  }

  #[test]
  fn test_planned_form_rejects_past_date() {
    let form = PlannedWorkoutForm {
      workout_type: "yoga".into(),
      planned_date: "2024-06-11".into(),
      planned_duration: "30".into(),
      ..Default::default()
    };
    let err = form.submit(date(2024, 6, 12)).unwrap_err();
    assert_eq!(err, ValidationError::PastDate(date(2024, 6, 11)));
    assert!(err.to_string().starts_with("Cannot schedule workouts for past dates"));

    // Today is allowed
    assert!(form.submit(date(2024, 6, 11)).is_ok());
  }

  #[test]
  fn test_planned_form_blank_time_and_notes_are_null() {
    let form = PlannedWorkoutForm {
      workout_type: "HIIT".into(),
      planned_date: "2024-06-20".into(),
      planned_time: "".into(),
      planned_duration: "25".into(),
      notes: "   ".into(),
    };
    let plan = form.submit(date(2024, 6, 12)).unwrap();
    assert_eq!(plan.workout_type, "hiit");
    assert_eq!(plan.planned_time, None);
    assert_eq!(plan.notes, None);

    let body = serde_json::to_value(&plan).unwrap();
    assert!(body["planned_time"].is_null());
    assert!(body["notes"].is_null());
  }

  #[test]
  fn test_planned_form_round_trips_existing_plan() {
    let mut plan = mock_planned_workout("p1", "swimming", date(2024, 7, 1), 40);
    plan.planned_time = NaiveTime::from_hms_opt(6, 15, 0);
    plan.notes = Some("pool".into());

    let form = PlannedWorkoutForm::from_plan(&plan);
    assert_eq!(form.planned_time, "06:15");
    assert_eq!(form.submit(date(2024, 6, 12)).unwrap(), plan.to_new());
  }

  #[test]
  fn test_planned_form_bad_time() {
    let form = PlannedWorkoutForm {
      workout_type: "yoga".into(),
      planned_date: "2024-06-20".into(),
      planned_time: "25:99".into(),
      planned_duration: "30".into(),
      ..Default::default()
    };
    assert_eq!(
      form.submit(date(2024, 6, 12)),
      Err(ValidationError::InvalidTime("25:99".into()))
    );
  }

  #[test]
  fn test_profile_form_zero_and_blank_become_none() {
    let form = ProfileForm {
      height_feet: "5".into(),
      height_inches: "0".into(),
      current_weight: "165".into(),
      age: "29".into(),
      target_weight: "".into(),
      weekly_target_value: "0".into(),
      workout_frequency: "4".into(),
      sex: "Female".into(),
      ..Default::default()
    };
    let profile = form.submit().unwrap();
    assert_eq!(profile.height_inches, None);
    assert_eq!(profile.target_weight, None);
    assert_eq!(profile.weekly_target_value, None);
    assert_eq!(profile.weekly_target_type, Some(WeeklyTargetType::Workouts));
    assert_eq!(profile.sex.as_deref(), Some("female"));
    assert!(profile.is_complete());
  }

  #[test]
  fn test_profile_form_rejects_bad_input() {
    let mut form = ProfileForm {
      age: "abc".into(),
      ..Default::default()
    };
    assert!(matches!(form.submit(), Err(ValidationError::NotAWholeNumber { field: "Age", .. })));

    form.age = "30".into();
    form.workout_frequency = "8".into();
    assert!(matches!(form.submit(), Err(ValidationError::OutOfRange { .. })));

    form.workout_frequency = "3".into();
    form.activity_level = "couch".into();
    assert!(matches!(form.submit(), Err(ValidationError::UnknownOption { .. })));

    form.activity_level = "very-active".into();
    form.goal_deadline = "next year".into();
    assert!(matches!(form.submit(), Err(ValidationError::InvalidDate { .. })));
  }

  #[test]
  fn test_profile_form_round_trip() {
    let form = ProfileForm {
      height_feet: "6".into(),
      height_inches: "1".into(),
      current_weight: "200.5".into(),
      age: "45".into(),
      goals: "lose-weight".into(),
      target_weight: "185".into(),
      weekly_target_type: "duration".into(),
      weekly_target_value: "150".into(),
      goal_deadline: "2025-03-01".into(),
      gym_experience: "novice".into(),
      ..Default::default()
    };
    let profile = form.submit().unwrap();
    assert_eq!(ProfileForm::from_profile(&profile).submit().unwrap(), profile);
    assert_eq!(profile.goal_deadline, Some(date(2025, 3, 1)));
  }
}
