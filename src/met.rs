//! MET-based calorie estimation
//!
//! Calories are estimated as `MET * body weight (kg) * duration (h)`. The MET
//! factor is looked up by substring match against an ordered keyword list, so
//! the first matching entry always wins regardless of platform.

/// ---------------------------------------------------------------------------
/// MET Table
/// ---------------------------------------------------------------------------

pub const LBS_TO_KG: f64 = 0.453592;
pub const DEFAULT_MET: f64 = 5.0;

/// Keyword order matters: lookup stops at the first match.
const STANDARD_METS: &[(&str, f64)] = &[
  ("running", 9.8),
  ("jogging", 7.0),
  ("walking", 3.8),
  ("cycling", 7.5),
  ("swimming", 8.0),
  ("weight training", 6.0),
  ("yoga", 3.0),
  ("pilates", 3.5),
  ("hiit", 8.0),
  ("crossfit", 8.0),
  ("rowing", 7.0),
  ("elliptical", 5.0),
  ("dancing", 4.5),
  ("boxing", 9.0),
  ("hiking", 6.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct MetTable {
  entries: Vec<(String, f64)>,
  default: f64,
}

impl Default for MetTable {
  fn default() -> Self {
    Self::standard()
  }
}

impl MetTable {
  pub fn standard() -> Self {
    Self::new(
      STANDARD_METS.iter().map(|(k, v)| (k.to_string(), *v)),
      DEFAULT_MET,
    )
  }

  /// Build a table from (keyword, factor) pairs. Keywords are lower-cased.
  pub fn new<I>(entries: I, default: f64) -> Self
  where
    I: IntoIterator<Item = (String, f64)>,
  {
    Self {
      entries: entries
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect(),
      default,
    }
  }

  pub fn default_met(&self) -> f64 {
    self.default
  }

  /// MET factor for a workout type. Matches when the keyword is contained in
  /// the type or the type is contained in the keyword; falls back to the
  /// default when nothing matches. Surrounding whitespace is ignored, so a
  /// blank type gets the default instead of matching "weight training".
  pub fn lookup(&self, workout_type: &str) -> f64 {
    let needle = workout_type.trim().to_lowercase();
    if needle.is_empty() {
      return self.default;
    }

    self
      .entries
      .iter()
      .find(|(key, _)| needle.contains(key.as_str()) || key.contains(needle.as_str()))
      .map(|(_, met)| *met)
      .unwrap_or(self.default)
  }

  /// Known workout types, alphabetically, for pickers
  pub fn workout_types(&self) -> Vec<&str> {
    let mut types: Vec<&str> = self.entries.iter().map(|(k, _)| k.as_str()).collect();
    types.sort_unstable();
    types
  }

  /// Estimated calories, or `None` when an input is missing or unusable.
  ///
  /// The type must contain a non-whitespace character, so `" "` gives no
  /// estimate rather than matching a keyword that contains a space. The
  /// duration must be a finite non-negative number of minutes and the weight
  /// a finite positive number of pounds. A zero duration estimates zero
  /// calories.
  pub fn estimate_calories(
    &self,
    workout_type: &str,
    duration_minutes: Option<f64>,
    weight_lbs: Option<f64>,
  ) -> Option<u32> {
    if workout_type.trim().is_empty() {
      return None;
    }
    let minutes = duration_minutes.filter(|m| m.is_finite() && *m >= 0.0)?;
    let lbs = weight_lbs.filter(|w| w.is_finite() && *w > 0.0)?;

    let weight_kg = lbs * LBS_TO_KG;
    let duration_hours = minutes / 60.0;
    let met = self.lookup(workout_type);

    Some((met * weight_kg * duration_hours).round() as u32)
  }
}

/// Estimate with the standard table
pub fn estimate_calories(
  workout_type: &str,
  duration_minutes: Option<f64>,
  weight_lbs: Option<f64>,
) -> Option<u32> {
  MetTable::standard().estimate_calories(workout_type, duration_minutes, weight_lbs)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
