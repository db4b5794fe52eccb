use thiserror::Error;

/// Errors produced by the notification host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
	/// Invalid configuration provided.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
	/// A level name could not be parsed.
	#[error("unknown level: {0}")]
	UnknownLevel(String),
	/// A renderer failed to populate its surface.
	#[error("render failed: {0}")]
	Render(String),
	/// The host could not be loaded.
	#[error("notification host unavailable: {0}")]
	Unavailable(String),
}
