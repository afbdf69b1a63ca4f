//! Google OAuth 2.0 credential state for the embedded sign-in component.
//!
//! This crate owns the access/refresh token pair for one OAuth client and
//! the policy for when the access token must be refreshed. The interactive
//! consent step lives in the `signin` crate; the only network surface here
//! is Google's token endpoint.

pub mod constants;
pub mod credentials;

pub use credentials::{
    ExchangeOutcome, GoogleCredentials, TokenError, TokenState, UnchangedReason,
};
