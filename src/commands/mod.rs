pub mod insights;
pub mod planned;
pub mod profile;
pub mod workouts;

use serde::Serialize;

use crate::api::{ApiClient, ApiConfig, ApiError};
use crate::form::ValidationError;
use crate::met::MetTable;
use crate::models::Profile;
use crate::session::{Session, SessionError, StaticToken};
use crate::state::Store;

/// ---------------------------------------------------------------------------
/// Application State
/// ---------------------------------------------------------------------------

/// Everything a command needs: the API client, the signed-in session, the
/// cached server data and the MET table used for estimates.
pub struct AppState {
  pub api: ApiClient,
  pub session: Session,
  pub store: Store,
  pub mets: MetTable,
}

impl AppState {
  pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
    Ok(Self {
      api: ApiClient::new(config)?,
      session: Session::start(&StaticToken(config.token.clone())),
      store: Store::new(),
      mets: MetTable::standard(),
    })
  }

  /// Convert an API failure, ending the session when the token was rejected
  pub(crate) fn api_failure(&mut self, err: ApiError) -> CommandError {
    if err.is_unauthorized() {
      self.session.sign_out();
      self.api.set_token(None);
      return CommandError::Session(SessionError::Expired);
    }
    CommandError::Api(err)
  }

  pub(crate) fn check<T>(&mut self, result: Result<T, ApiError>) -> Result<T, CommandError> {
    result.map_err(|e| self.api_failure(e))
  }

  /// Signed in with a complete profile, loading the profile on first use
  pub async fn require_dashboard(&mut self) -> Result<Profile, CommandError> {
    self.session.require_signed_in()?;
    if self.session.profile().is_none() {
      let refreshed = self.session.refresh_profile(&self.api).await;
      self.check(refreshed)?;
    }
    Ok(self.session.require_profile()?.clone())
  }
}

/// ---------------------------------------------------------------------------
/// Confirmation
/// ---------------------------------------------------------------------------

/// Asks the user before destructive actions
pub trait Confirm {
  fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
  F: Fn(&str) -> bool,
{
  fn confirm(&self, prompt: &str) -> bool {
    self(prompt)
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
  #[error(transparent)]
  Api(#[from] ApiError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Session(#[from] SessionError),

  #[error("{0} not found")]
  NotFound(String),

  #[error("Planned workout {0} is already completed")]
  AlreadyCompleted(String),
}

impl Serialize for CommandError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::test_utils::test_config;

  pub const COMPLETE_PROFILE: &str =
    r#"{"height_feet":5,"height_inches":9,"current_weight":150,"age":30,"weekly_target_type":"workouts","weekly_target_value":3}"#;

  pub fn test_state(base: &str) -> AppState {
    AppState::new(&test_config(base)).unwrap()
  }

  pub async fn mock_profile_endpoint(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
      .mock("GET", "/profile")
      .with_status(200)
      .with_body(COMPLETE_PROFILE)
      .create_async()
      .await
  }

  #[tokio::test]
  async fn test_unauthorized_signs_out() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
      .mock("GET", "/profile")
      .with_status(401)
      .create_async()
      .await;

    let mut state = test_state(&server.url());
    let err = state.require_dashboard().await.unwrap_err();
    assert!(matches!(err, CommandError::Session(SessionError::Expired)));
    assert!(!state.session.is_signed_in());
    assert!(!state.api.has_token());
  }

  #[tokio::test]
  async fn test_incomplete_profile_blocks_dashboard() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
      .mock("GET", "/profile")
      .with_status(200)
      .with_body("{}")
      .create_async()
      .await;

    let mut state = test_state(&server.url());
    assert!(matches!(
      state.require_dashboard().await.unwrap_err(),
      CommandError::Session(SessionError::ProfileIncomplete)
    ));
  }

  #[tokio::test]
  async fn test_profile_loaded_once() {
    let mut server = mockito::Server::new_async().await;
    let m = mock_profile_endpoint(&mut server).await;

    let mut state = test_state(&server.url());
    state.require_dashboard().await.unwrap();
    let profile = state.require_dashboard().await.unwrap();
    assert_eq!(profile.current_weight, Some(150.0));

    m.assert_async().await;
  }

  #[test]
  fn test_closure_confirms() {
    let yes = |_: &str| true;
    let no = |prompt: &str| prompt.is_empty();
    assert!(yes.confirm("Delete?"));
    assert!(!no.confirm("Delete?"));
  }

  #[test]
  fn test_error_serializes_as_message() {
    let err = CommandError::NotFound("planned workout p1".into());
    assert_eq!(serde_json::to_value(&err).unwrap(), "planned workout p1 not found");
  }
}
