use super::{AppState, CommandError};
use crate::models::{ComprehensiveInsights, InsightsSummary, Profile};

pub async fn summary(state: &mut AppState) -> Result<InsightsSummary, CommandError> {
  state.require_dashboard().await?;
  let result = state.store.load_insights(&state.api).await;
  state.check(result)
}

/// Server insights together with a fresh profile for the weight section.
/// Both requests run concurrently.
pub async fn comprehensive(state: &mut AppState) -> Result<(ComprehensiveInsights, Profile), CommandError> {
  state.require_dashboard().await?;

  let (insights, profile) = tokio::join!(
    state.store.load_comprehensive(&state.api),
    state.api.get_profile()
  );
  let insights = state.check(insights)?;
  let profile = state.check(profile)?;
  state.session.set_profile(profile);

  let profile = state.session.require_profile()?.clone();
  Ok((insights, profile))
}
