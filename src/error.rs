//! Bridge errors.
//!
//! The taxonomy is deliberately small: declaration shapes are closed enums so
//! malformed bindings cannot exist, store computation failures propagate as
//! panics from whatever triggered the evaluation, and teardown against a
//! missing address is a no-op rather than an error.

use thiserror::Error;

/// Errors surfaced by the bridge's own surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// `created` ran before [`install`](crate::lifecycle::install) registered
    /// a subscription primitive.
    #[error("bridge not installed: call install() with a subscription primitive first")]
    NotInstalled,

    /// Host-visible `set` on a key no binding declared.
    #[error("no binding declares property `{0}`")]
    UnknownProperty(String),

    /// Host-visible `set` on a binding that declares no setter.
    #[error("property `{0}` is read-only (binding declares no setter)")]
    ReadOnlyProperty(String),
}
