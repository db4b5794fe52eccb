//! Drawable surfaces notifications are painted into.

use crate::types::{SurfaceId, WindowId};

/// Highlight applied to a column range of one surface line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
	/// Zero-based line index.
	pub line: usize,
	/// Start byte column (inclusive).
	pub start: usize,
	/// End byte column (exclusive). `None` highlights to the end of the line.
	pub end: Option<usize>,
	/// Highlight group name.
	pub group: String,
}

/// Window dimensions requested by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
	pub width: usize,
	pub height: usize,
}

/// Line buffer a renderer populates.
///
/// A surface is attached to at most one window. Renderers may request a window
/// size; the host applies it after the render callback returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
	id: SurfaceId,
	lines: Vec<String>,
	highlights: Vec<Highlight>,
	tags: Vec<String>,
	window: Option<WindowId>,
	requested_size: Option<WindowSize>,
}

impl Surface {
	pub fn new(id: SurfaceId) -> Self {
		Self {
			id,
			lines: Vec::new(),
			highlights: Vec::new(),
			tags: Vec::new(),
			window: None,
			requested_size: None,
		}
	}

	pub fn id(&self) -> SurfaceId {
		self.id
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	pub fn line_count(&self) -> usize {
		self.lines.len()
	}

	/// Replaces all lines and drops existing highlights.
	pub fn set_lines<I, S>(&mut self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.lines = lines.into_iter().map(Into::into).collect();
		self.highlights.clear();
	}

	/// Appends one line.
	pub fn push_line(&mut self, line: impl Into<String>) {
		self.lines.push(line.into());
	}

	pub fn add_highlight(&mut self, line: usize, start: usize, end: Option<usize>, group: impl Into<String>) {
		self.highlights.push(Highlight {
			line,
			start,
			end,
			group: group.into(),
		});
	}

	pub fn highlights(&self) -> &[Highlight] {
		&self.highlights
	}

	/// Marks the surface as owned by a named integration.
	pub fn tag(&mut self, tag: &str) {
		if !self.has_tag(tag) {
			self.tags.push(tag.to_string());
		}
	}

	pub fn has_tag(&self, tag: &str) -> bool {
		self.tags.iter().any(|t| t == tag)
	}

	/// Clears lines, highlights, and any pending size request. Tags are kept.
	pub fn clear(&mut self) {
		self.lines.clear();
		self.highlights.clear();
		self.requested_size = None;
	}

	/// Window this surface is displayed in, if any.
	pub fn window(&self) -> Option<WindowId> {
		self.window
	}

	/// Returns true when the surface is attached to a window.
	pub fn is_visible(&self) -> bool {
		self.window.is_some()
	}

	pub(crate) fn attach(&mut self, window: Option<WindowId>) {
		self.window = window;
	}

	/// Requests new window dimensions for the attached window.
	pub fn request_size(&mut self, width: usize, height: usize) {
		self.requested_size = Some(WindowSize { width, height });
	}

	pub fn requested_size(&self) -> Option<WindowSize> {
		self.requested_size
	}

	pub(crate) fn take_requested_size(&mut self) -> Option<WindowSize> {
		self.requested_size.take()
	}
}
