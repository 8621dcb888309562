//! Load state and cached server data
//!
//! Every cached resource is a `Loadable`. Mutations invalidate the affected
//! resources and the caller reloads, so what is shown is always the server's
//! current state rather than a locally patched copy.

use serde::Serialize;

use crate::api::{ApiClient, ApiError};
use crate::models::{ComprehensiveInsights, InsightsSummary, PlannedWorkout, Workout};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Loadable<T> {
  #[default]
  Idle,
  Loading,
  Loaded(T),
  Failed(String),
}

impl<T> Loadable<T> {
  pub fn value(&self) -> Option<&T> {
    match self {
      Loadable::Loaded(value) => Some(value),
      _ => None,
    }
  }

  pub fn is_loaded(&self) -> bool {
    matches!(self, Loadable::Loaded(_))
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      Loadable::Failed(message) => Some(message),
      _ => None,
    }
  }
}

/// Store a fetch result in its slot. A failure replaces any earlier value.
fn settle<T: Clone>(slot: &mut Loadable<T>, result: Result<T, ApiError>) -> Result<T, ApiError> {
  match result {
    Ok(value) => {
      *slot = Loadable::Loaded(value.clone());
      Ok(value)
    }
    Err(e) => {
      *slot = Loadable::Failed(e.to_string());
      Err(e)
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  Workouts,
  PlannedWorkouts,
  Insights,
  ComprehensiveInsights,
}

#[derive(Debug, Default)]
pub struct Store {
  pub workouts: Loadable<Vec<Workout>>,
  pub planned: Loadable<Vec<PlannedWorkout>>,
  pub insights: Loadable<InsightsSummary>,
  pub comprehensive: Loadable<ComprehensiveInsights>,
}

impl Store {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn invalidate(&mut self, resource: Resource) {
    log::debug!("Invalidating {:?}", resource);
    match resource {
      Resource::Workouts => self.workouts = Loadable::Idle,
      Resource::PlannedWorkouts => self.planned = Loadable::Idle,
      Resource::Insights => self.insights = Loadable::Idle,
      Resource::ComprehensiveInsights => self.comprehensive = Loadable::Idle,
    }
  }

  /// Logged workouts feed the insights, so they go stale together
  pub fn invalidate_workouts(&mut self) {
    self.invalidate(Resource::Workouts);
    self.invalidate(Resource::Insights);
    self.invalidate(Resource::ComprehensiveInsights);
  }

  pub async fn load_workouts(&mut self, api: &ApiClient) -> Result<Vec<Workout>, ApiError> {
    self.workouts = Loadable::Loading;
    let result = api.list_workouts().await.map(|mut workouts| {
      crate::models::workout::sort_newest_first(&mut workouts);
      workouts
    });
    settle(&mut self.workouts, result)
  }

  pub async fn load_planned(&mut self, api: &ApiClient) -> Result<Vec<PlannedWorkout>, ApiError> {
    self.planned = Loadable::Loading;
    let result = api.list_planned_workouts().await;
    settle(&mut self.planned, result)
  }

  pub async fn load_insights(&mut self, api: &ApiClient) -> Result<InsightsSummary, ApiError> {
    self.insights = Loadable::Loading;
    let result = api.get_insights().await;
    settle(&mut self.insights, result)
  }

  pub async fn load_comprehensive(&mut self, api: &ApiClient) -> Result<ComprehensiveInsights, ApiError> {
    self.comprehensive = Loadable::Loading;
    let result = api.get_comprehensive_insights().await;
    settle(&mut self.comprehensive, result)
  }

  /// Cached planned workouts, fetching only when not loaded
  pub async fn ensure_planned(&mut self, api: &ApiClient) -> Result<Vec<PlannedWorkout>, ApiError> {
    match self.planned.value() {
      Some(planned) => Ok(planned.clone()),
      None => self.load_planned(api).await,
    }
  }

  pub async fn ensure_workouts(&mut self, api: &ApiClient) -> Result<Vec<Workout>, ApiError> {
    match self.workouts.value() {
      Some(workouts) => Ok(workouts.clone()),
      None => self.load_workouts(api).await,
    }
  }

  /// Fetch workouts and planned workouts concurrently
  pub async fn refresh_all(&mut self, api: &ApiClient) -> Result<(), ApiError> {
    self.workouts = Loadable::Loading;
    self.planned = Loadable::Loading;

    let (workouts, planned) = tokio::join!(api.list_workouts(), api.list_planned_workouts());

    let workouts = workouts.map(|mut w| {
      crate::models::workout::sort_newest_first(&mut w);
      w
    });
    // Settle both before reporting so neither slot is left in Loading
    let workouts = settle(&mut self.workouts, workouts);
    let planned = settle(&mut self.planned, planned);
    workouts?;
    planned?;
    Ok(())
  }
}
