//! Credential state and token exchange against Google's token endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::{EXPIRY_SAFETY_MARGIN_SECS, GOOGLE_TOKEN_URL};

/// Transport-level failure talking to the token endpoint.
///
/// Provider rejections (invalid grant, mismatched redirect URI, missing
/// fields) are not errors; they surface as [`ExchangeOutcome::Unchanged`].
#[derive(Debug, Error)]
pub enum TokenError {
    /// The endpoint was unreachable or answered with a body that is not JSON.
    #[error("token endpoint transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result of a single token-endpoint exchange attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The provider issued a full token set and credential state was replaced.
    Updated,
    /// The response lacked expected fields; prior state is untouched.
    Unchanged(UnchangedReason),
}

/// Why an exchange left the credential untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnchangedReason {
    /// Well-formed OAuth error body from the provider.
    ErrorBody {
        error: String,
        description: Option<String>,
    },
    /// JSON response missing one of `access_token`/`refresh_token`/`expires_in`.
    MissingFields,
}

/// Issued token material plus refresh bookkeeping.
///
/// All four fields are replaced together on every successful exchange, so a
/// credential either carries a complete token set or none at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenState {
    /// Current bearer token (short-lived, ~1 hour)
    pub access_token: String,

    /// Long-lived token used to obtain new access tokens
    pub refresh_token: String,

    /// Wall-clock time of the last successful exchange
    pub last_refreshed_at: DateTime<Utc>,

    /// Provider-reported lifetime minus the safety margin. Non-positive when
    /// the provider reported a lifetime at or below the margin; such a token
    /// counts as expired on the next check.
    pub valid_for_secs: i64,
}

impl TokenState {
    /// Checks whether the access token has outlived its shortened validity
    /// window.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        (now - self.last_refreshed_at).num_seconds() >= self.valid_for_secs
    }
}

/// Success response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct IssuedTokens {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

/// Error response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// One OAuth client's token state.
///
/// Created once per user session and kept alive across component invocations
/// by the host's session store; only the two exchange operations mutate it.
#[derive(Debug, Clone)]
pub struct GoogleCredentials {
    client_id: String,
    client_secret: String,
    token_url: String,
    tokens: Option<TokenState>,
}

impl GoogleCredentials {
    /// Creates a tokenless credential for one OAuth client.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            tokens: None,
        }
    }

    /// Points token exchanges at a different endpoint. Tests use this to
    /// target a stub server.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// OAuth client ID
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// OAuth client secret
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Whether a token set has ever been issued
    pub fn has_tokens(&self) -> bool {
        self.tokens.is_some()
    }

    /// Current token state, if any. The host's own persistence can snapshot
    /// this; the credential itself never touches disk.
    pub fn token_state(&self) -> Option<&TokenState> {
        self.tokens.as_ref()
    }

    /// Restores a previously issued token set, e.g. from the host's session
    /// persistence.
    pub fn restore(&mut self, state: TokenState) {
        self.tokens = Some(state);
    }

    /// Checks if the access token is past its validity window (and a refresh
    /// would run on the next [`access_token`](Self::access_token) call).
    pub fn needs_refresh(&self) -> bool {
        match &self.tokens {
            Some(state) => state.is_expired(Utc::now()),
            None => false,
        }
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    ///
    /// The `redirect_uri` must be the exact one the widget used to obtain
    /// the code, or Google rejects the exchange. On `Updated` all four token
    /// fields are replaced atomically; on `Unchanged` the prior state (none
    /// or stale) is left as it was.
    pub async fn create_tokens(
        &mut self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ExchangeOutcome, TokenError> {
        info!("exchanging authorization code for tokens");

        let form = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        match self.post_exchange(&form).await? {
            Ok(issued) => {
                self.install(issued);
                Ok(ExchangeOutcome::Updated)
            }
            Err(reason) => {
                warn!(?reason, "authorization code exchange rejected");
                Ok(ExchangeOutcome::Unchanged(reason))
            }
        }
    }

    /// Returns the current access token, refreshing it first when the
    /// validity window has lapsed.
    ///
    /// `None` if no token has ever been issued. Inside the validity window
    /// this performs no network activity and keeps returning the same token.
    /// A refresh the provider rejects leaves the stale token in place and
    /// returns it anyway; only transport failures propagate.
    pub async fn access_token(&mut self) -> Result<Option<String>, TokenError> {
        let state = match &self.tokens {
            Some(state) => state,
            None => return Ok(None),
        };

        if state.is_expired(Utc::now()) {
            info!("access token past its validity window, refreshing");
            let refresh_token = state.refresh_token.clone();

            let form = [
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ];

            match self.post_exchange(&form).await? {
                Ok(issued) => {
                    self.install(issued);
                    debug!("access token refreshed");
                }
                Err(reason) => {
                    warn!(?reason, "refresh rejected, returning stale access token");
                }
            }
        }

        Ok(self.tokens.as_ref().map(|s| s.access_token.clone()))
    }

    /// Posts a form-encoded exchange and interprets the response body.
    ///
    /// Provider rejections arrive as well-formed JSON error bodies, so the
    /// body shape decides the outcome, not the HTTP status.
    async fn post_exchange(
        &self,
        form: &[(&str, &str)],
    ) -> Result<Result<IssuedTokens, UnchangedReason>, TokenError> {
        let client = reqwest::Client::new();

        let body: serde_json::Value = client
            .post(&self.token_url)
            .form(form)
            .send()
            .await?
            .json()
            .await?;

        Ok(interpret_response(body))
    }

    /// Replaces the full token set, stamping the refresh time and the
    /// margin-shortened validity window.
    fn install(&mut self, issued: IssuedTokens) {
        self.tokens = Some(TokenState {
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
            last_refreshed_at: Utc::now(),
            valid_for_secs: issued.expires_in - EXPIRY_SAFETY_MARGIN_SECS,
        });
    }
}

/// Classifies a token-endpoint response body.
fn interpret_response(body: serde_json::Value) -> Result<IssuedTokens, UnchangedReason> {
    match serde_json::from_value::<IssuedTokens>(body.clone()) {
        Ok(issued) => Ok(issued),
        Err(_) => match serde_json::from_value::<TokenErrorResponse>(body) {
            Ok(err) => Err(UnchangedReason::ErrorBody {
                error: err.error,
                description: err.error_description,
            }),
            Err(_) => Err(UnchangedReason::MissingFields),
        },
    }
}
