//! Google sign-in component for server-rendered app frameworks.
//!
//! Pairs a [`oauth::GoogleCredentials`] held in the host's session store
//! with an embedded consent widget. Each render cycle calls
//! [`SigninComponent::obtain_token`], which either yields a usable access
//! token or the widget payload the host must render next.

pub mod component;
pub mod sessions;
pub mod widget;

pub use component::{SigninComponent, SigninOutcome};
pub use sessions::SessionStore;
pub use widget::{PendingAuthorization, WidgetArgs};
