//! Google OAuth 2.0 endpoints and token policy constants.

/// Google OAuth authorization endpoint (consent screen)
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth token exchange endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Safety margin subtracted from every provider-reported token lifetime.
///
/// A token judged valid here can still be rejected by the resource server
/// moments later due to clock skew or in-flight latency, so the local
/// validity window is shortened by two minutes. A provider-reported lifetime
/// at or below this margin yields a token that counts as expired on the next
/// check.
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 120;
