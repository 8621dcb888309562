//! Month calendar grid for planned workouts
//!
//! The grid is always six full weeks (42 days) starting on the Sunday on or
//! before the first of the month, so every month fits regardless of length.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::models::PlannedWorkout;

pub const GRID_DAYS: usize = 42;
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
  pub date: NaiveDate,
  pub in_current_month: bool,
  pub is_today: bool,
  /// Timed plans first in time order, then untimed plans in list order
  pub workouts: Vec<PlannedWorkout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarGrid {
  pub year: i32,
  pub month: u32,
  pub days: Vec<CalendarDay>,
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

/// First day of the month `offset` months away from the month of `date`
pub fn shift_month(date: NaiveDate, offset: i32) -> NaiveDate {
  let first = first_of_month(date);
  let shifted = if offset >= 0 {
    first.checked_add_months(Months::new(offset as u32))
  } else {
    first.checked_sub_months(Months::new(offset.unsigned_abs()))
  };
  shifted.unwrap_or(first)
}

/// "October 2026"
pub fn month_label(date: NaiveDate) -> String {
  date.format("%B %Y").to_string()
}

/// Plans for one day, ordered for display
pub fn workouts_on(date: NaiveDate, planned: &[PlannedWorkout]) -> Vec<PlannedWorkout> {
  let mut day: Vec<PlannedWorkout> = planned
    .iter()
    .filter(|w| w.planned_date == date)
    .cloned()
    .collect();

  // Stable sort keeps untimed plans in their original relative order
  day.sort_by(|a, b| match (a.planned_time, b.planned_time) {
    (Some(x), Some(y)) => x.cmp(&y),
    (Some(_), None) => std::cmp::Ordering::Less,
    (None, Some(_)) => std::cmp::Ordering::Greater,
    (None, None) => std::cmp::Ordering::Equal,
  });
  day
}

impl CalendarGrid {
  /// Build the grid for the month containing `anchor`
  pub fn for_month(anchor: NaiveDate, today: NaiveDate, planned: &[PlannedWorkout]) -> Self {
    let first = first_of_month(anchor);
    let start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);

    let days = (0..GRID_DAYS as i64)
      .map(|offset| {
        let date = start + Duration::days(offset);
        CalendarDay {
          date,
          in_current_month: date.month() == first.month(),
          is_today: date == today,
          workouts: workouts_on(date, planned),
        }
      })
      .collect();

    Self {
      year: first.year(),
      month: first.month(),
      days,
    }
  }

  /// The grid as six rows of seven days
  pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
    self.days.chunks(7)
  }

  pub fn label(&self) -> String {
    NaiveDate::from_ymd_opt(self.year, self.month, 1)
      .map(month_label)
      .unwrap_or_default()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
