//! HTTP client implementation for the Fitbit Web API.
//!
//! This module provides a reqwest-based implementation of the [`FitbitClient`](crate::FitbitClient) trait.

use crate::{Credentials, DailyMetric, DateRange, FitbitClient, FitbitError, Series, TokenPair};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Client for the Fitbit Web API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestFitbitClient {
    base_url: String,
    client: reqwest::Client,
}

/// Body of a successful `POST /oauth2/token`.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    user_id: Option<String>,
}

impl ReqwestFitbitClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Fitbit API (e.g., "https://api.fitbit.com")
    pub fn new(base_url: &str) -> Result<Self, FitbitError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fitbit_client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build a GET request carrying the bearer token.
    fn get_request(&self, url: &str, access_token: &SecretString) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(access_token.expose_secret())
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> FitbitError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        FitbitError::from_status(status, body_snippet)
    }
}

/// Pull the entries under `series`'s key out of a decoded response body.
pub fn decode_series(
    series: Series,
    body: serde_json::Value,
) -> Result<Vec<DailyMetric>, FitbitError> {
    let key = series.response_key();
    let serde_json::Value::Object(mut map) = body else {
        return Err(FitbitError::ResponseShape(format!(
            "expected a JSON object holding `{key}`"
        )));
    };
    let entries = map
        .remove(&key)
        .ok_or_else(|| FitbitError::ResponseShape(format!("missing `{key}`")))?;
    serde_json::from_value(entries)
        .map_err(|e| FitbitError::ResponseShape(format!("decoding `{key}`: {e}")))
}

#[async_trait]
impl FitbitClient for ReqwestFitbitClient {
    async fn refresh_access_token(
        &self,
        credentials: &Credentials,
    ) -> Result<TokenPair, FitbitError> {
        let url = format!("{}/oauth2/token", self.base_url);
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", credentials.refresh_token.expose_secret()),
            ("client_id", credentials.client_id.as_str()),
        ];
        let resp = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| FitbitError::TokenExchange(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body_snippet: String = body.chars().take(256).collect();
            return Err(FitbitError::TokenExchange(format!(
                "status {}: {}",
                status.as_u16(),
                body_snippet
            )));
        }

        // Read body as text first so a decode failure reports serde's message
        // rather than a generic transport error. The body itself may carry
        // tokens, so it never goes into the error.
        let text = resp
            .text()
            .await
            .map_err(|e| FitbitError::TokenExchange(format!("reading body: {e}")))?;
        let payload: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| FitbitError::TokenExchange(format!("decoding token response: {e}")))?;
        if payload.access_token.is_empty() || payload.refresh_token.is_empty() {
            return Err(FitbitError::TokenExchange(
                "token response carries an empty token".into(),
            ));
        }

        tracing::debug!(
            user_id = payload.user_id.as_deref().unwrap_or("-"),
            expires_in = payload.expires_in,
            "refresh-token grant succeeded"
        );
        Ok(TokenPair {
            access_token: SecretString::new(payload.access_token.into()),
            refresh_token: SecretString::new(payload.refresh_token.into()),
        })
    }

    async fn get_daily_series(
        &self,
        access_token: &SecretString,
        series: Series,
        range: DateRange,
    ) -> Result<Vec<DailyMetric>, FitbitError> {
        let url = format!(
            "{}/1/user/-/activities/{}/date/{}.json",
            self.base_url,
            series.resource(),
            range
        );
        let resp = self.get_request(&url, access_token).send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        let text = resp.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(256).collect();
            FitbitError::ResponseShape(format!("invalid JSON: {e} - body: {body_snippet}"))
        })?;
        let entries = decode_series(series, body)?;
        tracing::debug!(%series, days = entries.len(), "fetched series");
        Ok(entries)
    }
}
