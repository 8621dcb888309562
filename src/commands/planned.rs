use chrono::{NaiveDate, NaiveDateTime};

use super::{AppState, CommandError, Confirm};
use crate::calendar::CalendarGrid;
use crate::form::PlannedWorkoutForm;
use crate::missed::{is_missed, missed_workouts, retroactive_workout};
use crate::models::PlannedWorkout;
use crate::progress::{weekly_progress, WeeklyProgress};
use crate::state::Resource;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this planned workout?";
pub const DISMISS_PROMPT: &str = "Are you sure you want to dismiss this planned workout?";

/// ---------------------------------------------------------------------------
/// Planned Workouts
/// ---------------------------------------------------------------------------

/// All plans ordered by date, timed plans first within a day
pub async fn list_planned(state: &mut AppState) -> Result<Vec<PlannedWorkout>, CommandError> {
  state.require_dashboard().await?;
  let result = state.store.load_planned(&state.api).await;
  let mut planned = state.check(result)?;
  planned.sort_by(|a, b| {
    a.planned_date
      .cmp(&b.planned_date)
      .then_with(|| match (a.planned_time, b.planned_time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
      })
  });
  Ok(planned)
}

async fn cached_planned(state: &mut AppState) -> Result<Vec<PlannedWorkout>, CommandError> {
  state.require_dashboard().await?;
  let result = state.store.ensure_planned(&state.api).await;
  state.check(result)
}

async fn find_planned(state: &mut AppState, id: &str) -> Result<PlannedWorkout, CommandError> {
  cached_planned(state)
    .await?
    .into_iter()
    .find(|p| p.id == id)
    .ok_or_else(|| CommandError::NotFound(format!("Planned workout {}", id)))
}

pub async fn schedule(
  state: &mut AppState,
  form: &PlannedWorkoutForm,
  today: NaiveDate,
) -> Result<Vec<PlannedWorkout>, CommandError> {
  let plan = form.submit(today)?;
  state.require_dashboard().await?;

  let created = state.api.create_planned_workout(&plan).await;
  let created = state.check(created)?;
  log::info!("Scheduled {} on {} as {}", plan.workout_type, plan.planned_date, created.id);

  state.store.invalidate(Resource::PlannedWorkouts);
  list_planned(state).await
}

/// Form prefilled from an existing plan
pub async fn edit_form(state: &mut AppState, id: &str) -> Result<PlannedWorkoutForm, CommandError> {
  Ok(PlannedWorkoutForm::from_plan(&find_planned(state, id).await?))
}

pub async fn edit(
  state: &mut AppState,
  id: &str,
  form: &PlannedWorkoutForm,
  today: NaiveDate,
) -> Result<Vec<PlannedWorkout>, CommandError> {
  let plan = form.submit(today)?;
  state.require_dashboard().await?;

  let updated = state.api.update_planned_workout(id, &plan).await;
  state.check(updated)?;
  log::info!("Updated planned workout {}", id);

  state.store.invalidate(Resource::PlannedWorkouts);
  list_planned(state).await
}

/// Delete after confirmation. Returns `false` when the user declined.
pub async fn delete(state: &mut AppState, id: &str, confirm: &impl Confirm) -> Result<bool, CommandError> {
  state.require_dashboard().await?;
  if !confirm.confirm(DELETE_PROMPT) {
    return Ok(false);
  }

  let deleted = state.api.delete_planned_workout(id).await;
  state.check(deleted)?;
  log::info!("Deleted planned workout {}", id);

  state.store.invalidate(Resource::PlannedWorkouts);
  Ok(true)
}

/// ---------------------------------------------------------------------------
/// Calendar & Progress
/// ---------------------------------------------------------------------------

pub async fn calendar(
  state: &mut AppState,
  anchor: NaiveDate,
  today: NaiveDate,
) -> Result<CalendarGrid, CommandError> {
  let planned = cached_planned(state).await?;
  Ok(CalendarGrid::for_month(anchor, today, &planned))
}

/// This week's planned workouts against the profile target. `None` when the
/// profile has no weekly target.
pub async fn progress(state: &mut AppState, today: NaiveDate) -> Result<Option<WeeklyProgress>, CommandError> {
  let profile = state.require_dashboard().await?;
  let planned = cached_planned(state).await?;
  Ok(weekly_progress(today, &profile, &planned))
}

/// ---------------------------------------------------------------------------
/// Missed Workouts
/// ---------------------------------------------------------------------------

pub async fn missed(state: &mut AppState, now: NaiveDateTime) -> Result<Vec<PlannedWorkout>, CommandError> {
  let planned = cached_planned(state).await?;
  Ok(missed_workouts(&planned, now).into_iter().cloned().collect())
}

/// Log a missed plan as done: create one workout from the plan, then mark the
/// plan completed and linked to it. Returns the new workout id.
pub async fn log_missed(state: &mut AppState, id: &str, now: NaiveDateTime) -> Result<String, CommandError> {
  let profile = state.require_dashboard().await?;
  // Completion state may have changed elsewhere
  state.store.invalidate(Resource::PlannedWorkouts);
  let plan = find_planned(state, id).await?;

  if plan.completed {
    return Err(CommandError::AlreadyCompleted(plan.id));
  }
  if !is_missed(&plan, now) {
    log::debug!("Logging planned workout {} before its scheduled time", plan.id);
  }

  let workout = retroactive_workout(&plan, Some(&profile), &state.mets);
  let created = state.api.create_workout(&workout).await;
  let created = state.check(created)?;

  let linked = state
    .api
    .replace_planned_workout(&plan.completed_by(&created.id))
    .await;
  if let Err(e) = linked {
    log::warn!(
      "Workout {} was logged but planned workout {} could not be marked completed",
      created.id,
      plan.id
    );
    return Err(state.api_failure(e));
  }
  log::info!("Logged missed {} as workout {}", plan.id, created.id);

  // Failed slots are refetched on next use, so the log itself still succeeds
  if let Err(e) = state.store.refresh_all(&state.api).await {
    log::warn!("Could not refresh workouts after logging {}: {}", plan.id, e);
  }
  Ok(created.id)
}

/// Remove a missed plan after confirmation. Returns `false` when declined.
pub async fn dismiss_missed(
  state: &mut AppState,
  id: &str,
  confirm: &impl Confirm,
) -> Result<bool, CommandError> {
  state.require_dashboard().await?;
  if !confirm.confirm(DISMISS_PROMPT) {
    return Ok(false);
  }

  let deleted = state.api.delete_planned_workout(id).await;
  state.check(deleted)?;
  log::info!("Dismissed planned workout {}", id);

  state.store.invalidate(Resource::PlannedWorkouts);
  Ok(true)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
