//! Signed-in session context
//!
//! Sign-in itself happens with the managed identity provider. The session
//! only carries the resulting bearer token and whether the user's profile is
//! complete enough to unlock the dashboard.

use serde::Serialize;

use crate::api::{ApiClient, ApiError};
use crate::models::Profile;

/// Source of the bearer token for the current user
pub trait IdentityProvider {
  fn id_token(&self) -> Option<String>;
}

/// Token handed over up front (CLI flag or environment)
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl IdentityProvider for StaticToken {
  fn id_token(&self) -> Option<String> {
    self.0.clone().filter(|t| !t.trim().is_empty())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
  #[error("Not signed in. Sign in with your identity provider and pass the token.")]
  SignedOut,

  #[error("Your session has expired. Please sign in again.")]
  Expired,

  #[error("Please complete your profile first (height, weight and age).")]
  ProfileIncomplete,
}

impl Serialize for SessionError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
  token: Option<String>,
  expired: bool,
  profile: Option<Profile>,
}

impl Session {
  pub fn start<P: IdentityProvider>(provider: &P) -> Self {
    Self {
      token: provider.id_token(),
      expired: false,
      profile: None,
    }
  }

  pub fn is_signed_in(&self) -> bool {
    self.token.is_some()
  }

  /// Drop the token after the API rejected it
  pub fn sign_out(&mut self) {
    if self.token.take().is_some() {
      log::info!("Session token rejected, signing out");
    }
    self.expired = true;
    self.profile = None;
  }

  pub fn profile(&self) -> Option<&Profile> {
    self.profile.as_ref()
  }

  /// Record the latest server profile (`None` when the user has none yet)
  pub fn set_profile(&mut self, profile: Option<Profile>) {
    self.profile = profile;
  }

  pub fn profile_complete(&self) -> bool {
    self.profile.as_ref().is_some_and(Profile::is_complete)
  }

  /// Re-read the profile so completeness reflects the server
  pub async fn refresh_profile(&mut self, api: &ApiClient) -> Result<bool, ApiError> {
    let profile = api.get_profile().await?;
    self.profile = profile;
    log::debug!("Profile refreshed, complete: {}", self.profile_complete());
    Ok(self.profile_complete())
  }

  pub fn require_signed_in(&self) -> Result<(), SessionError> {
    match (self.is_signed_in(), self.expired) {
      (true, _) => Ok(()),
      (false, true) => Err(SessionError::Expired),
      (false, false) => Err(SessionError::SignedOut),
    }
  }

  /// Gate for dashboard-style actions
  pub fn require_profile(&self) -> Result<&Profile, SessionError> {
    self.require_signed_in()?;
    match &self.profile {
      Some(profile) if profile.is_complete() => Ok(profile),
      _ => Err(SessionError::ProfileIncomplete),
    }
  }
}
