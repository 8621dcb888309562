//! Weekly goal progress
//!
//! Weeks run Sunday through Saturday. Progress is measured either as a count
//! of workouts or as total minutes, depending on the profile's weekly target.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{PlannedWorkout, Profile, WeeklyTargetType, Workout};

/// Anything that lands on a calendar day and has a length in minutes
pub trait Scheduled {
  fn day(&self) -> Option<NaiveDate>;
  fn minutes(&self) -> u32;
}

impl Scheduled for PlannedWorkout {
  fn day(&self) -> Option<NaiveDate> {
    Some(self.planned_date)
  }

  fn minutes(&self) -> u32 {
    self.planned_duration
  }
}

impl Scheduled for Workout {
  fn day(&self) -> Option<NaiveDate> {
    self
      .timestamp
      .map(|ts| ts.with_timezone(&Local).date_naive())
  }

  fn minutes(&self) -> u32 {
    self.duration
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressUnit {
  Workouts,
  Minutes,
}

impl ProgressUnit {
  pub fn as_str(&self) -> &'static str {
    match self {
      ProgressUnit::Workouts => "workouts",
      ProgressUnit::Minutes => "minutes",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgress {
  pub current: u32,
  pub target: u32,
  pub unit: ProgressUnit,
}

impl WeeklyProgress {
  /// Share of the target reached, capped at 100
  pub fn percentage(&self) -> f64 {
    if self.target == 0 {
      return 0.0;
    }
    (self.current as f64 / self.target as f64 * 100.0).min(100.0)
  }

  pub fn is_met(&self) -> bool {
    self.current >= self.target
  }
}

/// Sunday..=Saturday of the week containing `today`
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
  let start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
  (start, start + Duration::days(6))
}

/// Progress toward the profile's weekly target, or `None` if no target is set
pub fn weekly_progress<T: Scheduled>(
  today: NaiveDate,
  profile: &Profile,
  items: &[T],
) -> Option<WeeklyProgress> {
  let (kind, target) = profile.weekly_target()?;
  let (start, end) = week_bounds(today);

  let this_week = items
    .iter()
    .filter(|item| item.day().is_some_and(|d| d >= start && d <= end));

  let progress = match kind {
    WeeklyTargetType::Workouts => WeeklyProgress {
      current: this_week.count() as u32,
      target,
      unit: ProgressUnit::Workouts,
    },
    WeeklyTargetType::Duration => WeeklyProgress {
      current: this_week.map(|item| item.minutes()).sum(),
      target,
      unit: ProgressUnit::Minutes,
    },
  };

  log::debug!(
    "Weekly progress {}..{}: {}/{} {}",
    start,
    end,
    progress.current,
    progress.target,
    progress.unit.as_str()
  );

  Some(progress)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{date, mock_planned_workout, mock_profile};

  #[test]
  fn test_week_bounds_sunday_to_saturday() {
    // 2024-06-05 is a Wednesday
    let (start, end) = week_bounds(date(2024, 6, 5));
    assert_eq!(start, date(2024, 6, 2));
    assert_eq!(end, date(2024, 6, 8));

    // Sunday is its own week start
    assert_eq!(week_bounds(date(2024, 6, 2)).0, date(2024, 6, 2));
    // Saturday ends the week
    assert_eq!(week_bounds(date(2024, 6, 8)).0, date(2024, 6, 2));
  }

  #[test]
  fn test_workout_count_excludes_next_week() {
    let profile = mock_profile(WeeklyTargetType::Workouts, 3);
    let plans = vec![
      mock_planned_workout("a", "running", date(2024, 6, 3), 30),
      mock_planned_workout("b", "yoga", date(2024, 6, 8), 45),
      mock_planned_workout("c", "hiit", date(2024, 6, 9), 20),
    ];

    let progress = weekly_progress(date(2024, 6, 5), &profile, &plans).unwrap();
    assert_eq!(
      progress,
      WeeklyProgress {
        current: 2,
        target: 3,
        unit: ProgressUnit::Workouts
      }
    );
    assert!(!progress.is_met());
  }

  #[test]
  fn test_duration_sums_minutes() {
    let profile = mock_profile(WeeklyTargetType::Duration, 60);
    let plans = vec![
      mock_planned_workout("a", "running", date(2024, 6, 2), 30),
      mock_planned_workout("b", "yoga", date(2024, 6, 4), 45),
      mock_planned_workout("c", "hiit", date(2024, 6, 1), 20),
    ];

    let progress = weekly_progress(date(2024, 6, 5), &profile, &plans).unwrap();
    assert_eq!(progress.current, 75);
    assert_eq!(progress.unit, ProgressUnit::Minutes);
    assert_eq!(progress.percentage(), 100.0);
    assert!(progress.is_met());
  }

  #[test]
  fn test_no_target_returns_none() {
    let plans = vec![mock_planned_workout("a", "running", date(2024, 6, 3), 30)];
    assert!(weekly_progress(date(2024, 6, 5), &Profile::default(), &plans).is_none());

    let zero = mock_profile(WeeklyTargetType::Workouts, 0);
    assert!(weekly_progress(date(2024, 6, 5), &zero, &plans).is_none());
  }

  #[test]
  fn test_percentage_partial() {
    let progress = WeeklyProgress {
      current: 1,
      target: 4,
      unit: ProgressUnit::Workouts,
    };
    assert_eq!(progress.percentage(), 25.0);
  }
}
