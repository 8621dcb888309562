use chrono::NaiveDate;

use super::{AppState, CommandError};
use crate::form::WorkoutForm;
use crate::models::Workout;
use crate::progress::{weekly_progress, WeeklyProgress};

/// ---------------------------------------------------------------------------
/// List Workouts
/// ---------------------------------------------------------------------------

/// Logged workouts, newest first
pub async fn list_workouts(state: &mut AppState) -> Result<Vec<Workout>, CommandError> {
  state.require_dashboard().await?;
  let result = state.store.load_workouts(&state.api).await;
  state.check(result)
}

/// ---------------------------------------------------------------------------
/// Log Workout
/// ---------------------------------------------------------------------------

/// Validate and log a workout, returning the refreshed list
pub async fn log_workout(state: &mut AppState, form: &WorkoutForm) -> Result<Vec<Workout>, CommandError> {
  let workout = form.submit()?;
  state.require_dashboard().await?;

  let created = state.api.create_workout(&workout).await;
  let created = state.check(created)?;
  log::info!(
    "Logged {} ({} min, {} cal) as {}",
    workout.workout_type,
    workout.duration,
    workout.calories,
    created.id
  );

  state.store.invalidate_workouts();
  list_workouts(state).await
}

/// ---------------------------------------------------------------------------
/// Delete Workout
/// ---------------------------------------------------------------------------

pub async fn delete_workout(state: &mut AppState, id: &str) -> Result<Vec<Workout>, CommandError> {
  state.require_dashboard().await?;

  let deleted = state.api.delete_workout(id).await;
  state.check(deleted)?;
  log::info!("Deleted workout {}", id);

  state.store.invalidate_workouts();
  list_workouts(state).await
}

/// ---------------------------------------------------------------------------
/// Weekly Progress
/// ---------------------------------------------------------------------------

/// This week's logged workouts against the profile target
pub async fn logged_progress(state: &mut AppState, today: NaiveDate) -> Result<Option<WeeklyProgress>, CommandError> {
  let profile = state.require_dashboard().await?;
  let result = state.store.ensure_workouts(&state.api).await;
  let workouts = state.check(result)?;
  Ok(weekly_progress(today, &profile, &workouts))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::tests::{mock_profile_endpoint, test_state};
  use crate::form::ValidationError;
  use crate::met::MetTable;
  use mockito::Matcher;

  #[tokio::test]
  async fn test_log_workout_posts_and_refreshes() {
    let mut server = mockito::Server::new_async().await;
    let _profile = mock_profile_endpoint(&mut server).await;
    let create = server
      .mock("POST", "/workouts")
      .match_header("authorization", "Bearer test-token")
      .match_body(Matcher::Json(serde_json::json!({
        "type": "running",
        "duration": 60,
        "calories": 667
      })))
      .with_status(201)
      .with_body(r#"{"id":"w1"}"#)
      .create_async()
      .await;
    let list = server
      .mock("GET", "/workouts")
      .with_status(200)
      .with_body(r#"[{"id":"w1","type":"running","duration":60,"calories":667,"timestamp":"2024-06-12T07:00:00Z"}]"#)
      .create_async()
      .await;

    let mut state = test_state(&server.url());
    let mets = MetTable::standard();
    let mut form = WorkoutForm::new();
    form.set_type("running", Some(150.0), &mets);
    form.set_duration("60", Some(150.0), &mets);

    let workouts = log_workout(&mut state, &form).await.unwrap();
    assert_eq!(workouts.len(), 1);
    assert!(state.store.workouts.is_loaded());

    create.assert_async().await;
    list.assert_async().await;
  }

  #[tokio::test]
  async fn test_invalid_form_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let create = server
      .mock("POST", "/workouts")
      .expect(0)
      .create_async()
      .await;

    let mut state = test_state(&server.url());
    let err = log_workout(&mut state, &WorkoutForm::new()).await.unwrap_err();
    assert!(matches!(
      err,
      CommandError::Validation(ValidationError::Required("Workout type"))
    ));

    create.assert_async().await;
  }

  #[tokio::test]
  async fn test_delete_workout_refetches() {
    let mut server = mockito::Server::new_async().await;
    let _profile = mock_profile_endpoint(&mut server).await;
    let delete = server
      .mock("DELETE", "/workouts/w7")
      .with_status(200)
      .with_body(r#"{"message":"deleted"}"#)
      .create_async()
      .await;
    let _list = server
      .mock("GET", "/workouts")
      .with_status(200)
      .with_body("[]")
      .create_async()
      .await;

    let mut state = test_state(&server.url());
    assert!(delete_workout(&mut state, "w7").await.unwrap().is_empty());

    delete.assert_async().await;
  }

  #[tokio::test]
  async fn test_logged_progress_counts_this_week() {
    let mut server = mockito::Server::new_async().await;
    let _profile = mock_profile_endpoint(&mut server).await;
    let _list = server
      .mock("GET", "/workouts")
      .with_status(200)
      .with_body(
        r#"[{"id":"a","type":"yoga","duration":30,"timestamp":"2024-06-05T12:00:00Z"},
            {"id":"b","type":"running","duration":45,"timestamp":"2024-05-20T12:00:00Z"}]"#,
      )
      .create_async()
      .await;

    let mut state = test_state(&server.url());
    let progress = logged_progress(&mut state, crate::test_utils::date(2024, 6, 6))
      .await
      .unwrap()
      .unwrap();
    assert_eq!(progress.current, 1);
    assert_eq!(progress.target, 3);
  }
}
