//! Refresh-token rotation.
//!
//! Fitbit refresh tokens are single use: once a grant succeeds the submitted
//! token is dead server-side. [`TokenRefresher::refresh`] therefore persists
//! the new refresh token before handing the access token to anyone, and never
//! touches the store when the exchange fails.

use crate::store::TokenStore;
use crate::{Credentials, FitbitClient, FitbitError, TokenPair};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Store key for the rotating refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Clone)]
pub struct TokenRefresher {
    client: Arc<dyn FitbitClient>,
    store: Arc<dyn TokenStore>,
    client_id: String,
}

impl TokenRefresher {
    pub fn new(
        client: Arc<dyn FitbitClient>,
        store: Arc<dyn TokenStore>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            client_id: client_id.into(),
        }
    }

    /// Load the stored credentials; a blank client id or token is a configuration error.
    pub async fn credentials(&self) -> Result<Credentials, FitbitError> {
        if self.client_id.trim().is_empty() {
            return Err(FitbitError::Config("client id is empty".into()));
        }
        let refresh_token = self
            .store
            .get(REFRESH_TOKEN_KEY)
            .await?
            .ok_or_else(|| FitbitError::Config("no refresh token is stored".into()))?;
        Ok(Credentials {
            client_id: self.client_id.clone(),
            refresh_token: SecretString::new(refresh_token.into()),
        })
    }

    /// Exchange the stored refresh token and persist its replacement.
    pub async fn refresh(&self) -> Result<TokenPair, FitbitError> {
        let credentials = self.credentials().await?;
        let pair = self
            .client
            .refresh_access_token(&credentials)
            .await
            .map_err(|e| match e {
                FitbitError::TokenExchange(_) => e,
                other => FitbitError::TokenExchange(other.to_string()),
            })?;

        if let Err(e) = self
            .store
            .set(REFRESH_TOKEN_KEY, pair.refresh_token.expose_secret())
            .await
        {
            // The previous token is already spent, so the chain is broken until re-authorized.
            tracing::error!("refresh token rotated but could not be persisted: {e}");
            return Err(e);
        }
        tracing::info!("refresh token rotated");
        Ok(pair)
    }
}
