//! Missed planned workouts
//!
//! A plan is missed once it is not completed and its scheduled moment has
//! passed. Timed plans compare date and time against now; untimed plans stay
//! pending for the whole scheduled day and only count as missed from the
//! following day on.

use chrono::NaiveDateTime;

use crate::met::MetTable;
use crate::models::{NewWorkout, PlannedWorkout, Profile};

pub fn is_missed(plan: &PlannedWorkout, now: NaiveDateTime) -> bool {
  if plan.completed {
    return false;
  }
  match plan.scheduled_at() {
    Some(at) => at < now,
    None => plan.planned_date < now.date(),
  }
}

/// Missed plans, most recent date first. Plans on the same date keep their
/// input order.
pub fn missed_workouts(planned: &[PlannedWorkout], now: NaiveDateTime) -> Vec<&PlannedWorkout> {
  let mut missed: Vec<&PlannedWorkout> = planned.iter().filter(|p| is_missed(p, now)).collect();
  missed.sort_by(|a, b| b.planned_date.cmp(&a.planned_date));
  missed
}

/// Workout to log for a missed plan. Calories are estimated from the profile
/// weight, or zero when no weight is known.
pub fn retroactive_workout(
  plan: &PlannedWorkout,
  profile: Option<&Profile>,
  mets: &MetTable,
) -> NewWorkout {
  let calories = mets
    .estimate_calories(
      &plan.workout_type,
      Some(plan.planned_duration as f64),
      profile.and_then(|p| p.current_weight),
    )
    .unwrap_or(0);

  NewWorkout {
    workout_type: plan.workout_type.clone(),
    duration: plan.planned_duration,
    calories,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{date, datetime, mock_planned_workout};
  use chrono::NaiveTime;

  #[test]
  fn test_untimed_yesterday_is_missed_but_today_is_not() {
    let now = datetime(2024, 6, 12, 23, 59);
    let yesterday = mock_planned_workout("y", "running", date(2024, 6, 11), 30);
    let today = mock_planned_workout("t", "running", date(2024, 6, 12), 30);

    assert!(is_missed(&yesterday, now));
    assert!(!is_missed(&today, now));
  }

  #[test]
  fn test_timed_plan_compares_time() {
    let mut plan = mock_planned_workout("p", "yoga", date(2024, 6, 12), 30);
    plan.planned_time = NaiveTime::from_hms_opt(7, 0, 0);

    assert!(!is_missed(&plan, datetime(2024, 6, 12, 6, 59)));
    assert!(!is_missed(&plan, datetime(2024, 6, 12, 7, 0)));
    assert!(is_missed(&plan, datetime(2024, 6, 12, 7, 1)));
  }

  #[test]
  fn test_completed_never_missed() {
    let mut plan = mock_planned_workout("p", "yoga", date(2024, 1, 1), 30);
    plan.completed = true;
    assert!(!is_missed(&plan, datetime(2024, 6, 12, 12, 0)));
  }

  #[test]
  fn test_sorted_most_recent_first() {
    let plans = vec![
      mock_planned_workout("old", "walking", date(2024, 6, 1), 30),
      mock_planned_workout("future", "walking", date(2024, 7, 1), 30),
      mock_planned_workout("recent", "walking", date(2024, 6, 10), 30),
      mock_planned_workout("recent-2", "hiking", date(2024, 6, 10), 60),
    ];
    let missed = missed_workouts(&plans, datetime(2024, 6, 12, 9, 0));
    let ids: Vec<&str> = missed.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["recent", "recent-2", "old"]);
  }

  #[test]
  fn test_retroactive_workout_calories() {
    let plan = mock_planned_workout("p", "running", date(2024, 6, 10), 60);
    let mets = MetTable::standard();

    let profile = Profile {
      current_weight: Some(150.0),
      ..Default::default()
    };
    let logged = retroactive_workout(&plan, Some(&profile), &mets);
    assert_eq!(logged.calories, 667);
    assert_eq!(logged.duration, 60);
    assert_eq!(logged.workout_type, "running");

    assert_eq!(retroactive_workout(&plan, None, &mets).calories, 0);
  }
}
