//! Lenient serde adapters for API payloads
//!
//! The API is backed by a document store, so numbers may arrive as floats
//! ("30.0"), ids may be numeric or textual, and unset form fields may come
//! back as empty strings. These adapters normalise all of that at the edge.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
  Int(i64),
  Float(f64),
  Text(String),
}

impl Raw {
  fn into_text(self) -> String {
    match self {
      Raw::Int(n) => n.to_string(),
      Raw::Float(f) => f.to_string(),
      Raw::Text(s) => s,
    }
  }

  fn into_number(self) -> Result<Option<f64>, String> {
    match self {
      Raw::Int(n) => Ok(Some(n as f64)),
      Raw::Float(f) => Ok(Some(f)),
      Raw::Text(s) if s.trim().is_empty() => Ok(None),
      Raw::Text(s) => s
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("expected a number, got {:?}", s)),
    }
  }
}

fn whole(value: f64) -> Result<u32, String> {
  if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
    return Err(format!("expected a non-negative whole number, got {}", value));
  }
  Ok(value.round() as u32)
}

/// Identifier that may be sent as a string or a number.
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Raw::deserialize(deserializer)?.into_text())
}

pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(
    Option::<Raw>::deserialize(deserializer)?
      .map(Raw::into_text)
      .filter(|s| !s.is_empty()),
  )
}

/// Non-negative whole number; floats are rounded, null and blank read as 0.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
  D: Deserializer<'de>,
{
  let value = match Option::<Raw>::deserialize(deserializer)? {
    None => 0.0,
    Some(raw) => raw.into_number().map_err(de::Error::custom)?.unwrap_or(0.0),
  };
  whole(value).map_err(de::Error::custom)
}

/// Any number, with null and blank read as 0.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Raw>::deserialize(deserializer)? {
    None => Ok(0.0),
    Some(raw) => Ok(raw.into_number().map_err(de::Error::custom)?.unwrap_or(0.0)),
  }
}

/// Text where null reads as the empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Raw>::deserialize(deserializer)?.map(Raw::into_text).unwrap_or_default())
}

/// Optional whole number. Blank strings and zero are treated as unset,
/// matching how the profile form stores cleared fields.
pub fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Raw>::deserialize(deserializer)? {
    None => Ok(None),
    Some(raw) => match raw.into_number().map_err(de::Error::custom)? {
      None => Ok(None),
      Some(v) => whole(v)
        .map(|n| if n == 0 { None } else { Some(n) })
        .map_err(de::Error::custom),
    },
  }
}

pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Raw>::deserialize(deserializer)? {
    None => Ok(None),
    Some(raw) => Ok(raw.into_number().map_err(de::Error::custom)?.filter(|v| *v != 0.0)),
  }
}

/// Text field where the empty string means "not set".
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(
    Option::<String>::deserialize(deserializer)?
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty()),
  )
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.with_timezone(&Utc))
    .ok()
    .or_else(|| {
      NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
    })
}

/// RFC 3339 timestamps; naive timestamps are read as UTC.
pub mod optional_timestamp {
  use super::*;

  pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match value {
      Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
  where
    D: Deserializer<'de>,
  {
    match Option::<String>::deserialize(deserializer)? {
      None => Ok(None),
      Some(raw) if raw.trim().is_empty() => Ok(None),
      Some(raw) => parse_timestamp(raw.trim())
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw))),
    }
  }
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
  NaiveTime::parse_from_str(raw, "%H:%M")
    .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    .ok()
}

/// Wall-clock time as "HH:MM".
pub mod optional_time {
  use super::*;

  pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match value {
      Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
  where
    D: Deserializer<'de>,
  {
    match Option::<String>::deserialize(deserializer)? {
      None => Ok(None),
      Some(raw) if raw.trim().is_empty() => Ok(None),
      Some(raw) => parse_time(raw.trim())
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid time: {}", raw))),
    }
  }
}

/// Calendar date as "YYYY-MM-DD"; blank means unset.
pub mod optional_date {
  use super::*;

  pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match value {
      Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
  where
    D: Deserializer<'de>,
  {
    match Option::<String>::deserialize(deserializer)? {
      None => Ok(None),
      Some(raw) if raw.trim().is_empty() => Ok(None),
      Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| de::Error::custom(format!("invalid date: {}", raw))),
    }
  }
}
