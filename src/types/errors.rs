//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.
//!
//! The fault model is two-tier: everything in this enum aborts the
//! dispatch that raised it, while per-endpoint broadcast drops (channel full,
//! listener gone) are tolerated inside the delivery loop and never surface
//! here. "Suppressed" and "filtered" are not errors either; they are success
//! outcomes carried by [`DispatchOutcome`](crate::dispatch::DispatchOutcome).

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error reported by a collection's emit hook, wrapped by [`Error::Hook`].
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error enum for uevent delivery.
#[derive(Error, Debug)]
pub enum Error {
    /// Text did not decode to a canonical action token.
    #[error("invalid action: {0:?}")]
    InvalidAction(String),

    /// The target object has no collection anywhere on its parent chain.
    #[error("no owning collection: {0}")]
    MissingCollection(String),

    /// A collection's emit hook rejected the event.
    #[error("emit hook failed: {0}")]
    Hook(#[source] HookError),

    /// An entry would exceed the environment buffer's byte or key capacity.
    #[error("environment buffer overflow: {0}")]
    BufferOverflow(String),

    /// Endpoint allocation failed (registry endpoint cap reached).
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Broadcast channel could not be bound for the namespace.
    #[error("protocol unavailable: {0}")]
    ProtocolUnavailable(String),

    /// Endpoint transport failure that is not a best-effort drop.
    #[error("transport error: {0}")]
    Transport(String),

    /// Usermode helper could not be started.
    #[error("helper spawn failed: {0}")]
    SpawnFailure(String),

    /// I/O errors (helper spawn path).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn invalid_action(text: impl Into<String>) -> Self {
        Self::InvalidAction(text.into())
    }

    pub fn missing_collection(object: impl Into<String>) -> Self {
        Self::MissingCollection(object.into())
    }

    pub fn hook(source: HookError) -> Self {
        Self::Hook(source)
    }

    pub fn buffer_overflow(msg: impl Into<String>) -> Self {
        Self::BufferOverflow(msg.into())
    }

    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    pub fn protocol_unavailable(msg: impl Into<String>) -> Self {
        Self::ProtocolUnavailable(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn spawn_failure(msg: impl Into<String>) -> Self {
        Self::SpawnFailure(msg.into())
    }
}
