//! Minimal `FitbitClient` trait, token rotation and daily activity summaries.

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;
pub mod date_range;
pub mod http_client;
pub mod refresher;
pub mod store;
pub mod summary;

pub use date_range::DateRange;

#[derive(Debug, Error)]
pub enum FitbitError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),
}

impl FitbitError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth(body),
            _ => Self::Api { status, body },
        }
    }
}

/// Static client id plus the refresh token read from the store.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub client_id: String,
    pub refresh_token: SecretString,
}

/// Result of one refresh-token grant. The refresh token replaces the stored one.
#[derive(Clone, Debug)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

/// Per-band breakdown of a day's Active Zone Minutes.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneMinutes {
    pub active_zone_minutes: u32,
    pub fat_burn_active_zone_minutes: u32,
    pub cardio_active_zone_minutes: u32,
    pub peak_active_zone_minutes: u32,
}

/// A day's value: a plain number (often string-encoded on the wire) or a zone breakdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Zones(ZoneMinutes),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Zones(z) => f64::from(z.active_zone_minutes),
        }
    }
}

impl<'de> Deserialize<'de> for MetricValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(MetricValue::Number)
                .ok_or_else(|| D::Error::custom(format!("number out of range: {n}"))),
            serde_json::Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(MetricValue::Number)
                .map_err(|e| D::Error::custom(format!("invalid numeric string {s:?}: {e}"))),
            serde_json::Value::Object(_) => serde_json::from_value::<ZoneMinutes>(value)
                .map(MetricValue::Zones)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected number, numeric string or zone record, got {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct DailyMetric {
    #[serde(rename = "dateTime")]
    pub date: NaiveDate,
    pub value: MetricValue,
}

/// One named metric stream retrievable over a date range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Series {
    Distance,
    ActiveZoneMinutes,
    Steps,
    Calories,
}

impl Series {
    /// Path segment under `/1/user/-/activities/`.
    pub fn resource(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::ActiveZoneMinutes => "active-zone-minutes",
            Self::Steps => "steps",
            Self::Calories => "calories",
        }
    }

    /// Top-level key holding the daily entries in the response body.
    pub fn response_key(self) -> String {
        format!("activities-{}", self.resource())
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

impl FromStr for Series {
    type Err = FitbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distance" => Ok(Self::Distance),
            "azm" | "active-zone-minutes" => Ok(Self::ActiveZoneMinutes),
            "steps" => Ok(Self::Steps),
            "calories" => Ok(Self::Calories),
            other => Err(FitbitError::Config(format!("unknown series: {other}"))),
        }
    }
}

#[async_trait]
pub trait FitbitClient: Send + Sync + 'static {
    /// Run the OAuth2 refresh-token grant. The submitted refresh token is spent afterwards.
    async fn refresh_access_token(
        &self,
        credentials: &Credentials,
    ) -> Result<TokenPair, FitbitError>;

    /// Fetch one daily series for an inclusive date range.
    async fn get_daily_series(
        &self,
        access_token: &SecretString,
        series: Series,
        range: DateRange,
    ) -> Result<Vec<DailyMetric>, FitbitError>;
}
