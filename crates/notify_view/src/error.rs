//! Error types for the notify view.

use thiserror::Error;
use xeno_notify_host::HostError;

/// Errors surfaced by the notify view.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotifyViewError {
	/// A named callback is not registered.
	#[error("callback not found: {0}")]
	CallbackNotFound(String),

	/// The host reported a handle that is not a valid identifier.
	#[error("invalid notification handle: {0}")]
	InvalidHandle(u64),

	/// A named renderer is not registered with the host.
	#[error("unknown renderer: {0}")]
	UnknownRenderer(String),

	/// A renderer panicked.
	#[error("render panicked: {0}")]
	RenderPanic(String),

	/// Configuration could not be parsed.
	#[error("config parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reported by the host.
	#[error(transparent)]
	Host(#[from] HostError),
}

/// Result type for notify view operations.
pub type Result<T> = std::result::Result<T, NotifyViewError>;
