//! Boundary types for the embedded sign-in widget.
//!
//! The widget runs inside the host framework's front-end. The core hands it
//! the client identity and requested scopes; the user walks through Google's
//! consent screen in a popup; the widget reports the resulting authorization
//! code, together with the exact redirect URI it used, back through the host
//! on a later invocation.

use oauth::constants::GOOGLE_AUTH_URL;
use oauth::GoogleCredentials;
use serde::{Deserialize, Serialize};

/// Arguments forwarded to the embedded widget on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetArgs {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Requested scopes, passed through verbatim
    pub scopes: Vec<String>,

    /// Identity key for remount stability: the host keeps reusing the same
    /// widget instance as long as the key stays constant, even when other
    /// arguments change between runs.
    pub key: String,
}

impl WidgetArgs {
    /// Builds the render payload for one widget instance.
    pub fn new(credentials: &GoogleCredentials, scopes: &[String], key: &str) -> Self {
        Self {
            client_id: credentials.client_id().to_string(),
            client_secret: credentials.client_secret().to_string(),
            scopes: scopes.to_vec(),
            key: key.to_string(),
        }
    }

    /// Consent-screen URL for the given redirect target.
    ///
    /// `access_type=offline` and `prompt=consent` make Google issue a
    /// refresh token alongside the access token.
    pub fn consent_url(&self, redirect_uri: &str) -> String {
        let scopes = self.scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            GOOGLE_AUTH_URL,
            self.client_id,
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes),
        )
    }
}

/// Completed consent reported by the widget.
///
/// Ephemeral: produced once per consent interaction and consumed exactly
/// once by the flow. `redirect_uri` is whatever URI the widget actually
/// redirected through; the token exchange must echo it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PendingAuthorization {
    pub code: String,
    pub redirect_uri: String,
}

impl From<(String, String)> for PendingAuthorization {
    /// The widget's raw component value is a bare `(code, redirect_uri)` pair.
    fn from((code, redirect_uri): (String, String)) -> Self {
        Self { code, redirect_uri }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> WidgetArgs {
        let creds = GoogleCredentials::new("client-1", "secret-1");
        WidgetArgs::new(
            &creds,
            &[
                "https://www.googleapis.com/auth/drive.readonly".to_string(),
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
            ],
            "signin",
        )
    }

    #[test]
    fn test_consent_url_encodes_scopes_and_redirect() {
        let url = args().consent_url("https://app.example.com/cb");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb"));
        assert!(url.contains(
            "scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fdrive.readonly%20https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fuserinfo.email"
        ));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
    }

    #[test]
    fn test_pending_authorization_from_pair() {
        let pending = PendingAuthorization::from((
            "abc".to_string(),
            "https://app.example.com/cb".to_string(),
        ));
        assert_eq!(pending.code, "abc");
        assert_eq!(pending.redirect_uri, "https://app.example.com/cb");
    }
}
