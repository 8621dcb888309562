//! Plain-text rendering for the command line

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike, Utc};

use crate::calendar::{CalendarGrid, WEEKDAY_LABELS};
use crate::models::insights::WeekComparison;
use crate::models::{ComprehensiveInsights, PlannedWorkout, Profile, Workout};
use crate::progress::WeeklyProgress;

const BAR_WIDTH: usize = 20;

/// "6:05 PM"
pub fn format_time_12h(time: NaiveTime) -> String {
  let (pm, hour) = time.hour12();
  format!("{}:{:02} {}", hour, time.minute(), if pm { "PM" } else { "AM" })
}

/// "Monday, Jun 3"
pub fn format_plan_date(date: NaiveDate) -> String {
  date.format("%A, %b %-d").to_string()
}

/// "Mon, Jun 3, 8:05 AM" in local time
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
  let local = ts.with_timezone(&Local);
  format!("{}, {}", local.format("%a, %b %-d"), format_time_12h(local.time()))
}

pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Whole numbers without a trailing ".0"
fn number(value: f64) -> String {
  if value.fract() == 0.0 {
    format!("{:.0}", value)
  } else {
    format!("{:.1}", value)
  }
}

pub const MAX_BAR_WIDTH: usize = 60;

/// Bar length for a server-supplied count, capped so a bad value cannot blow up
fn bar_width(count: f64) -> usize {
  if count.is_finite() {
    count.round().clamp(0.0, MAX_BAR_WIDTH as f64) as usize
  } else {
    0
  }
}

pub fn workout_line(workout: &Workout) -> String {
  let mut line = format!(
    "{} - {} min - {} cal",
    capitalize(&workout.workout_type),
    workout.duration,
    workout.calories
  );
  if let Some(ts) = workout.timestamp {
    line.push_str(&format!("  ({})", format_timestamp(ts)));
  }
  line
}

pub fn planned_line(plan: &PlannedWorkout) -> String {
  let mut line = format!(
    "{}  {}",
    format_plan_date(plan.planned_date),
    capitalize(&plan.workout_type)
  );
  if let Some(time) = plan.planned_time {
    line.push_str(&format!(" at {}", format_time_12h(time)));
  }
  line.push_str(&format!(" - {} min", plan.planned_duration));
  if plan.completed {
    line.push_str(" [done]");
  }
  if let Some(notes) = &plan.notes {
    line.push_str(&format!("\n    {}", notes));
  }
  line
}

/// "[##########..........] 2 / 4 workouts (50%)"
pub fn progress_bar(progress: &WeeklyProgress) -> String {
  let pct = progress.percentage();
  let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
  format!(
    "[{}{}] {} / {} {} ({:.0}%){}",
    "#".repeat(filled),
    ".".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
    progress.current,
    progress.target,
    progress.unit.as_str(),
    pct,
    if progress.is_met() { " goal met" } else { "" }
  )
}

/// "12 lbs to go"
pub fn weight_to_go(profile: &Profile) -> Option<String> {
  profile
    .weight_to_go()
    .map(|lbs| format!("{} lbs to go", number(lbs)))
}

pub fn render_calendar(grid: &CalendarGrid) -> String {
  let mut lines = vec![grid.label(), WEEKDAY_LABELS.map(|d| format!("{:>4}", d)).join("")];

  for week in grid.weeks() {
    let row: String = week
      .iter()
      .map(|day| {
        let mark = match (day.is_today, day.workouts.is_empty()) {
          (true, _) => '>',
          (false, false) => '*',
          (false, true) => ' ',
        };
        if day.in_current_month {
          format!("{}{:>3}", mark, day.date.format("%-d"))
        } else {
          format!("{}{:>3}", mark, "")
        }
      })
      .collect();
    lines.push(row);
  }

  let scheduled: Vec<String> = grid
    .days
    .iter()
    .filter(|day| day.in_current_month)
    .flat_map(|day| day.workouts.iter())
    .map(|plan| format!("  {} [{}]", planned_line(plan), plan.id))
    .collect();

  if !scheduled.is_empty() {
    lines.push(String::new());
    lines.extend(scheduled);
  }
  lines.join("\n")
}

fn change(percent: Option<f64>) -> String {
  match percent {
    Some(p) if p >= 0.0 => format!(" (+{:.0}%)", p),
    Some(p) => format!(" ({:.0}%)", p),
    None => String::new(),
  }
}

fn comparison_lines(week: &WeekComparison) -> Vec<String> {
  vec![
    "This week".to_string(),
    format!(
      "  Workouts: {}{}",
      number(week.this_week_workouts),
      change(week.workout_change_percent)
    ),
    format!(
      "  Minutes:  {}{}",
      number(week.this_week_duration),
      change(week.duration_change_percent)
    ),
    format!(
      "  Calories: {}{}",
      number(week.this_week_calories),
      change(week.calories_change_percent)
    ),
  ]
}

pub fn render_insights(insights: &ComprehensiveInsights, profile: Option<&Profile>) -> String {
  let mut lines = Vec::new();

  if let Some(goal) = &insights.weekly_progress {
    let pct = goal.percentage.unwrap_or(if goal.target > 0.0 {
      (goal.current / goal.target * 100.0).min(100.0)
    } else {
      0.0
    });
    lines.push(format!(
      "Weekly goal: {} / {} {} ({:.0}%)",
      number(goal.current),
      number(goal.target),
      goal.unit,
      pct
    ));
  }

  if let Some(week) = &insights.week_comparison {
    lines.extend(comparison_lines(week));
  }

  let streak = insights.streak.clone().unwrap_or_default();
  lines.push(format!(
    "Current streak: {} days (longest {} days)",
    streak.current_streak, streak.longest_streak
  ));

  if let Some(stats) = &insights.consistency_stats {
    lines.push("Consistency".to_string());
    lines.push(format!("  Total workouts:       {}", number(stats.total_workouts)));
    lines.push(format!("  Total duration:       {} min", number(stats.total_duration)));
    lines.push(format!("  Total calories:       {}", number(stats.total_calories)));
    lines.push(format!("  Avg workouts/week:    {}", number(stats.avg_workouts_per_week)));
    lines.push(format!("  Avg duration/workout: {} min", number(stats.avg_duration_per_workout)));
    if let Some(day) = &stats.most_active_day {
      lines.push(format!("  Most active day:      {}", day));
    }
    if let Some(fav) = &stats.favorite_workout_type {
      lines.push(format!("  Favorite workout:     {}", capitalize(fav)));
    }
  }

  if insights.workout_type_breakdown.is_empty() {
    lines.push("No workouts logged yet".to_string());
  } else {
    lines.push("Workout types".to_string());
    for entry in &insights.workout_type_breakdown {
      lines.push(format!("  {:<16} {}", capitalize(&entry.workout_type), entry.count));
    }
  }

  if !insights.workout_frequency.is_empty() {
    lines.push("Workouts per week".to_string());
    for point in &insights.workout_frequency {
      lines.push(format!("  {:<12} {}", point.date, "#".repeat(bar_width(point.count))));
    }
  }

  if !insights.calories_over_time.is_empty() {
    lines.push("Calories per week".to_string());
    for point in &insights.calories_over_time {
      lines.push(format!("  {:<12} {}", point.date, number(point.calories)));
    }
  }

  if let Some(profile) = profile {
    if let (Some(current), Some(target), Some(to_go)) =
      (profile.current_weight, profile.target_weight, weight_to_go(profile))
    {
      lines.push(format!(
        "Weight: {} lbs now, {} lbs target, {}",
        number(current),
        number(target),
        to_go
      ));
    }
  }

  lines.join("\n")
}
