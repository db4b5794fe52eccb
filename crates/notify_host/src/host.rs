//! Seam between notification clients and the host.

use std::fmt;
use std::time::Duration;

use crate::config::HostConfig;
use crate::error::HostError;
use crate::render::{Notification, RenderFn};
use crate::types::{DismissOptions, Level, NotifyHandle, WindowId};

/// Per-notification options passed to [`NotifyHost::create`].
#[derive(Clone)]
pub struct HostOptions {
	/// Title shown by decorating renderers. Inherited from a replaced record when absent.
	pub title: Option<String>,
	/// Icon override. Defaults to the level icon.
	pub icon: Option<String>,
	/// Dwell time before auto-close. Defaults to the host timeout.
	pub timeout: Option<Duration>,
	/// Live record to replace in place.
	pub replace: Option<NotifyHandle>,
	/// Animate entry and exit.
	pub animate: bool,
	/// Suppress auto-close while set.
	pub keep: bool,
	/// Paint callback. The host default renderer is used when absent.
	pub render: Option<RenderFn>,
}

impl Default for HostOptions {
	fn default() -> Self {
		Self {
			title: None,
			icon: None,
			timeout: None,
			replace: None,
			animate: true,
			keep: false,
			render: None,
		}
	}
}

impl fmt::Debug for HostOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HostOptions")
			.field("title", &self.title)
			.field("icon", &self.icon)
			.field("timeout", &self.timeout)
			.field("replace", &self.replace)
			.field("animate", &self.animate)
			.field("keep", &self.keep)
			.field("render", &self.render.as_ref().map(|_| "<fn>"))
			.finish()
	}
}

/// Lifecycle notification emitted by the host.
///
/// For a given handle, `Opened` is always emitted before `Closed`. A record
/// dropped before it opened produces `Discarded` instead of either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	/// A record's window opened and its surface was painted.
	Opened {
		handle: NotifyHandle,
		window: WindowId,
		notification: Notification,
	},
	/// An open record closed. `window` is `None` when the window was handed to a
	/// replacing record instead of being destroyed.
	Closed { handle: NotifyHandle, window: Option<WindowId> },
	/// A pending record was dropped before opening.
	Discarded { handle: NotifyHandle },
}

/// Notification host driven by a client on the UI event loop.
pub trait NotifyHost {
	/// Creates a record and returns its handle. The record opens on a later turn.
	fn create(&mut self, content: Option<&str>, level: Level, options: HostOptions) -> NotifyHandle;

	/// Dismisses open (and optionally pending) records.
	fn dismiss(&mut self, options: DismissOptions);

	fn window_is_valid(&self, window: WindowId) -> bool;

	/// Closes a window and its record. Returns false when the window is unknown.
	fn close_window(&mut self, window: WindowId) -> bool;

	fn config(&self) -> &HostConfig;

	/// Takes lifecycle events in the order they were produced.
	fn drain_events(&mut self) -> Vec<HostEvent>;
}

/// Loads a host instance.
pub trait HostProvider {
	type Host: NotifyHost;

	fn load(&self) -> Result<Self::Host, HostError>;
}
