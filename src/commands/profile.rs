use serde::Serialize;

use super::{AppState, CommandError};
use crate::form::ProfileForm;
use crate::models::Profile;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileStatus {
  pub profile: Option<Profile>,
  pub is_complete: bool,
}

/// ---------------------------------------------------------------------------
/// Show Profile
/// ---------------------------------------------------------------------------

/// Current server profile; does not require the profile to be complete
pub async fn show_profile(state: &mut AppState) -> Result<ProfileStatus, CommandError> {
  state.session.require_signed_in()?;

  let refreshed = state.session.refresh_profile(&state.api).await;
  let is_complete = state.check(refreshed)?;

  Ok(ProfileStatus {
    profile: state.session.profile().cloned(),
    is_complete,
  })
}

/// ---------------------------------------------------------------------------
/// Save Profile
/// ---------------------------------------------------------------------------

/// Validate and save, then re-read the profile so the session reflects
/// whether the dashboard is now unlocked
pub async fn save_profile(state: &mut AppState, form: &ProfileForm) -> Result<ProfileStatus, CommandError> {
  let profile = form.submit()?;
  state.session.require_signed_in()?;

  let saved = state.api.save_profile(&profile).await;
  state.check(saved)?;
  log::info!("Profile saved");

  show_profile(state).await
}

/// Start from the saved profile so unchanged fields are kept
pub async fn edit_form(state: &mut AppState) -> Result<ProfileForm, CommandError> {
  let status = show_profile(state).await?;
  Ok(
    status
      .profile
      .as_ref()
      .map(ProfileForm::from_profile)
      .unwrap_or_default(),
  )
}
