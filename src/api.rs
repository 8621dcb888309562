use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use std::env;
use std::time::Duration;
use url::Url;

use crate::models::{
  ComprehensiveInsights, InsightsSummary, NewPlannedWorkout, NewWorkout, PlannedWorkout, Profile,
  Workout,
};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const API_BASE_VAR: &str = "FITNESS_API_BASE";
pub const API_TOKEN_VAR: &str = "FITNESS_API_TOKEN";
pub const API_TIMEOUT_VAR: &str = "FITNESS_API_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const BODY_PREVIEW_CHARS: usize = 500;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub api_base: Url,
  /// Bearer token issued by the identity provider
  pub token: Option<String>,
  pub timeout: Duration,
}

impl ApiConfig {
  pub fn new(api_base: &str, token: Option<String>) -> Result<Self, ApiError> {
    Ok(Self {
      api_base: parse_base_url(api_base)?,
      token: token.filter(|t| !t.trim().is_empty()),
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    })
  }

  pub fn from_env() -> Result<Self, ApiError> {
    Self::from_env_with(None, None)
  }

  /// Environment configuration with command-line overrides for the base URL
  /// and token
  pub fn from_env_with(api_base: Option<&str>, token: Option<String>) -> Result<Self, ApiError> {
    let base = match api_base {
      Some(base) => base.to_string(),
      None => env::var(API_BASE_VAR).map_err(|_| ApiError::MissingConfig(API_BASE_VAR.into()))?,
    };
    let token = token.or_else(|| env::var(API_TOKEN_VAR).ok());

    let mut config = Self::new(&base, token)?;
    if let Ok(raw) = env::var(API_TIMEOUT_VAR) {
      let secs: u64 = raw.trim().parse().map_err(|_| {
        ApiError::InvalidConfig(format!("{} must be a whole number of seconds, got {:?}", API_TIMEOUT_VAR, raw))
      })?;
      config.timeout = Duration::from_secs(secs);
    }

    Ok(config)
  }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
  let url = Url::parse(raw.trim())
    .map_err(|e| ApiError::InvalidConfig(format!("{} is not a valid URL: {}", API_BASE_VAR, e)))?;

  if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
    return Err(ApiError::InvalidConfig(format!(
      "{} must be an http(s) URL, got {}",
      API_BASE_VAR, url
    )));
  }
  Ok(url)
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Not signed in or session expired")]
  Unauthorized,

  #[error("API error {status}: {body}")]
  Status { status: u16, body: String },

  #[error("Unexpected response for {what}: {message}")]
  Decode { what: String, message: String },
}

impl ApiError {
  pub fn is_unauthorized(&self) -> bool {
    matches!(self, ApiError::Unauthorized)
  }
}

impl Serialize for ApiError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Response Types
/// ---------------------------------------------------------------------------

/// Body returned by create endpoints; only the new id is relied on
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Created {
  #[serde(deserialize_with = "crate::models::codec::id")]
  pub id: String,
}

/// ---------------------------------------------------------------------------
/// API Client
/// ---------------------------------------------------------------------------

pub struct ApiClient {
  client: Client,
  base: Url,
  token: Option<String>,
}

impl ApiClient {
  pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
    let client = Client::builder().timeout(config.timeout).build()?;

    Ok(Self {
      client,
      base: config.api_base.clone(),
      token: config.token.clone(),
    })
  }

  pub fn has_token(&self) -> bool {
    self.token.is_some()
  }

  /// Replace (or clear) the bearer token attached to every request
  pub fn set_token(&mut self, token: Option<String>) {
    self.token = token;
  }

  fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = self.base.clone();
    url
      .path_segments_mut()
      .map_err(|_| ApiError::InvalidConfig(format!("cannot append a path to {}", self.base)))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
    let url = self.endpoint(segments)?;
    log::debug!("{} {}", method, url);

    let mut request = self
      .client
      .request(method, url)
      .header("Accept", "application/json");

    // Without a token the request still goes out; the API decides
    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }
    Ok(request)
  }

  /// Send and return the body text, mapping 401 and other failures
  async fn send(&self, request: RequestBuilder, what: &str) -> Result<String, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
      log::warn!("{}: unauthorized, sign-in required", what);
      return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      log::error!("{} failed with {}: {}", what, status, preview(&body));
      return Err(ApiError::Status {
        status: status.as_u16(),
        body,
      });
    }

    Ok(response.text().await?)
  }

  async fn fetch<T: DeserializeOwned>(&self, segments: &[&str], what: &str) -> Result<T, ApiError> {
    let body = self.send(self.request(Method::GET, segments)?, what).await?;
    decode(&body, what)
  }

  /// -------------------------------------------------------------------------
  /// Workouts
  /// -------------------------------------------------------------------------

  pub async fn list_workouts(&self) -> Result<Vec<Workout>, ApiError> {
    self.fetch(&["workouts"], "list workouts").await
  }

  pub async fn create_workout(&self, workout: &NewWorkout) -> Result<Created, ApiError> {
    let request = self.request(Method::POST, &["workouts"])?.json(workout);
    let body = self.send(request, "create workout").await?;
    decode(&body, "create workout")
  }

  pub async fn delete_workout(&self, id: &str) -> Result<(), ApiError> {
    let request = self.request(Method::DELETE, &["workouts", id])?;
    self.send(request, "delete workout").await?;
    Ok(())
  }

  /// -------------------------------------------------------------------------
  /// Profile
  /// -------------------------------------------------------------------------

  /// `None` when the API has no profile yet (it answers with `{}`)
  pub async fn get_profile(&self) -> Result<Option<Profile>, ApiError> {
    let value: serde_json::Value = self.fetch(&["profile"], "get profile").await?;

    let is_empty = match &value {
      serde_json::Value::Null => true,
      serde_json::Value::Object(map) => map.is_empty(),
      _ => false,
    };
    if is_empty {
      return Ok(None);
    }

    serde_json::from_value(value)
      .map(Some)
      .map_err(|e| ApiError::Decode {
        what: "get profile".into(),
        message: e.to_string(),
      })
  }

  pub async fn save_profile(&self, profile: &Profile) -> Result<(), ApiError> {
    let request = self.request(Method::POST, &["profile"])?.json(profile);
    self.send(request, "save profile").await?;
    Ok(())
  }

  /// -------------------------------------------------------------------------
  /// Planned Workouts
  /// -------------------------------------------------------------------------

  pub async fn list_planned_workouts(&self) -> Result<Vec<PlannedWorkout>, ApiError> {
    self.fetch(&["planned-workouts"], "list planned workouts").await
  }

  pub async fn create_planned_workout(&self, plan: &NewPlannedWorkout) -> Result<Created, ApiError> {
    let request = self.request(Method::POST, &["planned-workouts"])?.json(plan);
    let body = self.send(request, "create planned workout").await?;
    decode(&body, "create planned workout")
  }

  /// Edit the user-facing fields of a plan
  pub async fn update_planned_workout(&self, id: &str, plan: &NewPlannedWorkout) -> Result<(), ApiError> {
    self.put_planned(id, plan, "update planned workout").await
  }

  /// Store a full plan, including completion state
  pub async fn replace_planned_workout(&self, plan: &PlannedWorkout) -> Result<(), ApiError> {
    self.put_planned(&plan.id, plan, "complete planned workout").await
  }

  async fn put_planned<B: Serialize>(&self, id: &str, body: &B, what: &str) -> Result<(), ApiError> {
    let request = self.request(Method::PUT, &["planned-workouts", id])?.json(body);
    self.send(request, what).await?;
    Ok(())
  }

  pub async fn delete_planned_workout(&self, id: &str) -> Result<(), ApiError> {
    let request = self.request(Method::DELETE, &["planned-workouts", id])?;
    self.send(request, "delete planned workout").await?;
    Ok(())
  }

  /// -------------------------------------------------------------------------
  /// Insights
  /// -------------------------------------------------------------------------

  pub async fn get_insights(&self) -> Result<InsightsSummary, ApiError> {
    self.fetch(&["insights"], "get insights").await
  }

  pub async fn get_comprehensive_insights(&self) -> Result<ComprehensiveInsights, ApiError> {
    self
      .fetch(&["insights", "comprehensive"], "get comprehensive insights")
      .await
  }
}

fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, ApiError> {
  serde_json::from_str(body).map_err(|e| {
    log::error!("Failed to parse {} response: {}", what, e);
    log::debug!("Raw response: {}", preview(body));
    ApiError::Decode {
      what: what.to_string(),
      message: e.to_string(),
    }
  })
}

fn preview(body: &str) -> &str {
  match body.char_indices().nth(BODY_PREVIEW_CHARS) {
    Some((idx, _)) => &body[..idx],
    None => body,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
