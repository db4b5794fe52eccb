//! Core types for the notification host.

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use crate::error::HostError;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
	/// Trace message (verbose debugging).
	Trace,
	/// Debug message.
	Debug,
	/// Informational message (default).
	#[default]
	Info,
	/// Warning message.
	Warn,
	/// Error message.
	Error,
}

impl Level {
	/// Upper-case name used in highlight group names.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Trace => "TRACE",
			Self::Debug => "DEBUG",
			Self::Info => "INFO",
			Self::Warn => "WARN",
			Self::Error => "ERROR",
		}
	}

	/// Default icon glyph for the level.
	pub const fn icon(self) -> &'static str {
		match self {
			Self::Trace => "\u{270e}",
			Self::Debug => "\u{f188}",
			Self::Info => "\u{f05a}",
			Self::Warn => "\u{f071}",
			Self::Error => "\u{f057}",
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Level {
	type Err = HostError;

	/// Parses a level name case-insensitively (`"warn"`, `"WARNING"`, ...).
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"trace" => Ok(Self::Trace),
			"debug" => Ok(Self::Debug),
			"info" => Ok(Self::Info),
			"warn" | "warning" => Ok(Self::Warn),
			"error" => Ok(Self::Error),
			_ => Err(HostError::UnknownLevel(s.to_string())),
		}
	}
}

/// Identifier of a live notification record.
///
/// The host never issues `0`; a zero handle is the invalid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotifyHandle(pub u64);

impl NotifyHandle {
	/// Returns true when the handle is a valid host identifier.
	pub const fn is_valid(self) -> bool {
		self.0 != 0
	}
}

impl fmt::Display for NotifyHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Identifier of a floating window owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

/// Identifier of a drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// Animation phase in the record lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
	/// Created but not yet opened.
	#[default]
	Pending,
	/// Window open, animating into view.
	Entering,
	/// Fully visible and waiting.
	Dwelling,
	/// Animating out of view.
	Exiting,
	/// Ready for removal.
	Finished,
}

/// Duration specification for animation phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timing {
	/// Use default timing.
	#[default]
	Auto,
	/// Use a specific fixed duration.
	Fixed(Duration),
}

impl Timing {
	pub(crate) fn resolve(self, default: Duration) -> Duration {
		match self {
			Self::Auto => default,
			Self::Fixed(d) => d,
		}
	}
}

/// Behavior when the open-record limit is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
	/// Close the oldest open record to make room (default).
	#[default]
	DropOldest,
	/// Keep new records pending until a slot frees up.
	WaitForSlot,
}

/// Options for [`crate::NotifyHost::dismiss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DismissOptions {
	/// Also discard records that have not opened yet.
	pub pending: bool,
	/// Close open records immediately, skipping the exit animation.
	pub silent: bool,
}
