//! Sign-in flow orchestration.
//!
//! The widget's consent interaction is out-of-process from the flow's point
//! of view: the widget renders, the user finishes Google's consent screen,
//! and the result arrives on a later invocation driven by the host's re-run
//! cycle. Each invocation therefore either yields a usable token or asks the
//! host to render the widget and come back.

use oauth::{ExchangeOutcome, GoogleCredentials, TokenError};
use tracing::{debug, info, warn};

use crate::widget::{PendingAuthorization, WidgetArgs};

/// What the host must do after one invocation of the component.
#[derive(Debug, Clone)]
pub enum SigninOutcome {
    /// A usable access token; the widget does not need to render.
    Token(String),
    /// No token yet: render the widget with these arguments and invoke the
    /// component again once it reports a consent result.
    AwaitingConsent(WidgetArgs),
}

impl SigninOutcome {
    /// The access token, if this invocation produced one.
    pub fn token(&self) -> Option<&str> {
        match self {
            SigninOutcome::Token(token) => Some(token),
            SigninOutcome::AwaitingConsent(_) => None,
        }
    }
}

/// One sign-in component instance: the scopes to request plus the identity
/// key the host uses for widget remount stability.
#[derive(Debug, Clone)]
pub struct SigninComponent {
    scopes: Vec<String>,
    key: String,
}

impl SigninComponent {
    pub fn new(scopes: Vec<String>, key: impl Into<String>) -> Self {
        Self {
            scopes,
            key: key.into(),
        }
    }

    /// Runs one invocation of the sign-in flow.
    ///
    /// A cached (or refreshable) access token wins outright and the widget
    /// is never involved. Otherwise the most recent widget value decides:
    /// nothing reported yet keeps the widget up, a reported consent result
    /// is exchanged for tokens and the credential re-queried. A rejected
    /// exchange falls back to [`SigninOutcome::AwaitingConsent`], so the
    /// user can retry.
    pub async fn obtain_token(
        &self,
        credentials: &mut GoogleCredentials,
        pending: Option<PendingAuthorization>,
    ) -> Result<SigninOutcome, TokenError> {
        if let Some(token) = credentials.access_token().await? {
            debug!(key = %self.key, "returning cached access token");
            return Ok(SigninOutcome::Token(token));
        }

        let Some(authorization) = pending else {
            debug!(key = %self.key, "no consent result yet");
            return Ok(SigninOutcome::AwaitingConsent(self.widget_args(credentials)));
        };

        match credentials
            .create_tokens(&authorization.code, &authorization.redirect_uri)
            .await?
        {
            ExchangeOutcome::Updated => {
                info!(key = %self.key, "consent completed, tokens issued");
            }
            ExchangeOutcome::Unchanged(reason) => {
                warn!(key = %self.key, ?reason, "consent result could not be exchanged");
            }
        }

        match credentials.access_token().await? {
            Some(token) => Ok(SigninOutcome::Token(token)),
            None => Ok(SigninOutcome::AwaitingConsent(self.widget_args(credentials))),
        }
    }

    fn widget_args(&self, credentials: &GoogleCredentials) -> WidgetArgs {
        WidgetArgs::new(credentials, &self.scopes, &self.key)
    }
}
