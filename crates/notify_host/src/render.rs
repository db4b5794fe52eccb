//! Renderer registry and built-in renderers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use unicode_width::UnicodeWidthStr;

use crate::config::HostConfig;
use crate::error::HostError;
use crate::surface::Surface;
use crate::types::{Level, NotifyHandle};

/// Snapshot of a record handed to renderers and open listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub handle: NotifyHandle,
	pub level: Level,
	pub title: String,
	pub icon: String,
	pub message: Vec<String>,
	pub timeout: Option<Duration>,
}

/// Highlight groups for one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyHighlights {
	pub title: String,
	pub icon: String,
	pub border: String,
	pub body: String,
}

impl NotifyHighlights {
	pub fn for_level(level: Level) -> Self {
		let name = level.name();
		Self {
			title: format!("Notify{name}Title"),
			icon: format!("Notify{name}Icon"),
			border: format!("Notify{name}Border"),
			body: format!("Notify{name}Body"),
		}
	}
}

/// Render callback invoked at paint time.
pub type RenderFn = Arc<dyn Fn(&mut Surface, &Notification, &NotifyHighlights, &HostConfig) -> Result<(), HostError>>;

/// Renderers keyed by name.
#[derive(Clone, Default)]
pub struct RendererRegistry {
	renderers: FxHashMap<String, RenderFn>,
}

impl fmt::Debug for RendererRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
		names.sort_unstable();
		f.debug_struct("RendererRegistry").field("renderers", &names).finish()
	}
}

impl RendererRegistry {
	/// Registry holding the built-in renderers.
	pub fn builtin() -> Self {
		let mut registry = Self::default();
		registry.register("default", Arc::new(render_default));
		registry.register("minimal", Arc::new(render_minimal));
		registry.register("simple", Arc::new(render_simple));
		registry.register("compact", Arc::new(render_compact));
		registry
	}

	/// Registers a renderer, replacing any previous one with the same name.
	pub fn register(&mut self, name: impl Into<String>, render: RenderFn) {
		self.renderers.insert(name.into(), render);
	}

	pub fn get(&self, name: &str) -> Option<RenderFn> {
		self.renderers.get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.renderers.contains_key(name)
	}
}

fn render_default(surface: &mut Surface, notif: &Notification, hl: &NotifyHighlights, _config: &HostConfig) -> Result<(), HostError> {
	let header = format!("{} {}", notif.icon, notif.title);
	let width = notif.message.iter().map(|l| l.width()).chain([header.width()]).max().unwrap_or(0);

	surface.set_lines([header]);
	surface.push_line("\u{2500}".repeat(width.max(1)));
	for line in &notif.message {
		surface.push_line(line.as_str());
	}

	surface.add_highlight(0, 0, Some(notif.icon.len()), hl.icon.as_str());
	surface.add_highlight(0, notif.icon.len() + 1, None, hl.title.as_str());
	surface.add_highlight(1, 0, None, hl.border.as_str());
	for line in 2..surface.line_count() {
		surface.add_highlight(line, 0, None, hl.body.as_str());
	}
	Ok(())
}

fn render_minimal(surface: &mut Surface, notif: &Notification, hl: &NotifyHighlights, _config: &HostConfig) -> Result<(), HostError> {
	surface.set_lines(notif.message.iter().map(String::as_str));
	for line in 0..surface.line_count() {
		surface.add_highlight(line, 0, None, hl.body.as_str());
	}
	Ok(())
}

fn render_simple(surface: &mut Surface, notif: &Notification, hl: &NotifyHighlights, _config: &HostConfig) -> Result<(), HostError> {
	surface.set_lines([notif.title.as_str()]);
	for line in &notif.message {
		surface.push_line(line.as_str());
	}
	surface.add_highlight(0, 0, None, hl.title.as_str());
	for line in 1..surface.line_count() {
		surface.add_highlight(line, 0, None, hl.body.as_str());
	}
	Ok(())
}

fn render_compact(surface: &mut Surface, notif: &Notification, hl: &NotifyHighlights, _config: &HostConfig) -> Result<(), HostError> {
	let prefix = format!("{} {} \u{2502} ", notif.icon, notif.title);
	let mut lines = notif.message.iter();
	let first = lines.next().map(String::as_str).unwrap_or_default();

	surface.set_lines([format!("{prefix}{first}")]);
	for line in lines {
		surface.push_line(line.as_str());
	}

	surface.add_highlight(0, 0, Some(notif.icon.len()), hl.icon.as_str());
	surface.add_highlight(0, notif.icon.len() + 1, Some(prefix.len()), hl.title.as_str());
	Ok(())
}
