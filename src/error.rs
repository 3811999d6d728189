use thiserror::Error;

/// Failures the action reports back across the host boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// The host handle was already gone when the action loaded. Fatal to
    /// initialization; nothing gets registered.
    #[error("plugin host unavailable at load")]
    HostUnavailable,

    /// The action parameter does not name a tz-database entry. Local to a
    /// single render call.
    #[error("unknown timezone identifier `{0}`")]
    UnknownTimeZone(String),
}
