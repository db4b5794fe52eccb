//! Notify view configuration.
//!
//! Options resolve in three layers, each applied field by field:
//!
//! 1. [`NotifyOptions::default`] (adapter defaults)
//! 2. configured values ([`NotifyOptionsConfig`], usually from TOML)
//! 3. per-message [`RequestOverrides`], applied at dispatch over the options
//!    computed for that request
//!
//! ```toml
//! title = "Messages"
//! level = "warn"
//! merge = true
//! render = "minimal"
//! timeout = 3000
//! on_open = "focus"
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use xeno_notify_host::{Level, Notification, NotifyHandle, RenderFn};

use crate::error::{NotifyViewError, Result};
use crate::message::MessageId;

/// Default notification title.
pub const DEFAULT_TITLE: &str = "Notification";

/// Name of the renderer that writes message lines without decoration.
pub const PLAIN_RENDERER: &str = "plain";

/// How a notification surface is painted.
#[derive(Clone)]
pub enum RenderSpec {
	/// Renderer looked up by name in the host registry.
	NamedRenderer(String),
	/// Caller-supplied render function.
	CustomRenderer(RenderFn),
	/// Message lines written verbatim.
	Plain,
}

impl RenderSpec {
	/// Maps `"plain"` to [`RenderSpec::Plain`] and any other name to a registry lookup.
	pub fn named(name: &str) -> Self {
		if name == PLAIN_RENDERER {
			Self::Plain
		} else {
			Self::NamedRenderer(name.to_string())
		}
	}
}

impl fmt::Debug for RenderSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NamedRenderer(name) => f.debug_tuple("NamedRenderer").field(name).finish(),
			Self::CustomRenderer(_) => f.write_str("CustomRenderer(<fn>)"),
			Self::Plain => f.write_str("Plain"),
		}
	}
}

/// Open/close listener. Receives the handle and, for open, the live notification.
pub type NotifyCallback = Arc<dyn Fn(NotifyHandle, Option<&Notification>)>;

/// Open/close listener reference.
#[derive(Clone)]
pub enum CallbackSpec {
	/// Listener looked up by name in the [`CallbackRegistry`] when it fires.
	Named(String),
	Custom(NotifyCallback),
}

impl fmt::Debug for CallbackSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
			Self::Custom(_) => f.write_str("Custom(<fn>)"),
		}
	}
}

/// Named open/close listeners.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
	callbacks: FxHashMap<String, NotifyCallback>,
}

impl fmt::Debug for CallbackRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<&str> = self.callbacks.keys().map(String::as_str).collect();
		names.sort_unstable();
		f.debug_struct("CallbackRegistry").field("callbacks", &names).finish()
	}
}

impl CallbackRegistry {
	pub fn register(&mut self, name: impl Into<String>, callback: NotifyCallback) {
		self.callbacks.insert(name.into(), callback);
	}

	/// Resolves a listener reference to a callable.
	pub fn resolve(&self, spec: &CallbackSpec) -> Result<NotifyCallback> {
		match spec {
			CallbackSpec::Custom(callback) => Ok(Arc::clone(callback)),
			CallbackSpec::Named(name) => self.callbacks.get(name).cloned().ok_or_else(|| NotifyViewError::CallbackNotFound(name.clone())),
		}
	}
}

/// Per-request options that win over the computed ones.
///
/// `replace_message` takes precedence over `replace_current`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOverrides {
	pub timeout: Option<Duration>,
	pub icon: Option<String>,
	pub keep: Option<bool>,
	pub animate: Option<bool>,
	/// Replace (or, with `false`, never replace) the view's current notification.
	pub replace_current: Option<bool>,
	/// Replace the notification currently showing another message.
	pub replace_message: Option<MessageId>,
}

/// Notify view options.
#[derive(Debug, Clone)]
pub struct NotifyOptions {
	/// Title used when a request carries none.
	pub title: String,
	/// Level forced onto every notification.
	pub level: Option<Level>,
	/// Combine the whole batch into one notification.
	pub merge: bool,
	/// Replace the current notification on each dispatch.
	pub replace: bool,
	pub on_open: Option<CallbackSpec>,
	pub on_close: Option<CallbackSpec>,
	/// Render override. The host's default renderer is used when absent.
	pub render: Option<RenderSpec>,
	/// Dwell time passed to the host.
	pub timeout: Option<Duration>,
}

impl Default for NotifyOptions {
	fn default() -> Self {
		Self {
			title: DEFAULT_TITLE.to_string(),
			level: None,
			merge: false,
			replace: false,
			on_open: None,
			on_close: None,
			render: None,
			timeout: None,
		}
	}
}

impl NotifyOptions {
	/// Parses TOML and applies it over the defaults.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: NotifyOptionsConfig = toml::from_str(input)?;
		Self::default().merged(config)
	}

	/// Applies configured values over these options.
	pub fn merged(mut self, config: NotifyOptionsConfig) -> Result<Self> {
		if let Some(title) = config.title {
			self.title = title;
		}
		if let Some(level) = config.level {
			self.level = Some(level.parse::<Level>()?);
		}
		if let Some(merge) = config.merge {
			self.merge = merge;
		}
		if let Some(replace) = config.replace {
			self.replace = replace;
		}
		if let Some(render) = config.render {
			self.render = Some(RenderSpec::named(&render));
		}
		if let Some(timeout) = config.timeout {
			self.timeout = Some(Duration::from_millis(timeout));
		}
		if let Some(name) = config.on_open {
			self.on_open = Some(CallbackSpec::Named(name));
		}
		if let Some(name) = config.on_close {
			self.on_close = Some(CallbackSpec::Named(name));
		}
		Ok(self)
	}

	#[must_use]
	pub fn with_merge(mut self, merge: bool) -> Self {
		self.merge = merge;
		self
	}

	#[must_use]
	pub fn with_level(mut self, level: Option<Level>) -> Self {
		self.level = level;
		self
	}

	#[must_use]
	pub fn with_render(mut self, render: RenderSpec) -> Self {
		self.render = Some(render);
		self
	}

	#[must_use]
	pub fn with_on_open(mut self, callback: CallbackSpec) -> Self {
		self.on_open = Some(callback);
		self
	}

	#[must_use]
	pub fn with_on_close(mut self, callback: CallbackSpec) -> Self {
		self.on_close = Some(callback);
		self
	}

	#[must_use]
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}
}

/// Serialized form of [`NotifyOptions`]. Absent fields keep their previous value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyOptionsConfig {
	pub title: Option<String>,
	/// Case-insensitive level name.
	pub level: Option<String>,
	pub merge: Option<bool>,
	pub replace: Option<bool>,
	/// Renderer name; `"plain"` writes message lines without decoration.
	pub render: Option<String>,
	/// Timeout in milliseconds.
	pub timeout: Option<u64>,
	pub on_open: Option<String>,
	pub on_close: Option<String>,
}
