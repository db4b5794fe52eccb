//! Host configuration.

use std::time::Duration;

use crate::error::HostError;
use crate::render::{NotifyHighlights, RendererRegistry};
use crate::types::{Level, Overflow, Timing};

/// Default dwell time before a record auto-closes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default duration for the entry animation.
pub const DEFAULT_ENTRY_DURATION: Duration = Duration::from_millis(300);
/// Default duration for the exit animation.
pub const DEFAULT_EXIT_DURATION: Duration = Duration::from_millis(200);

/// Configuration read by the host and exposed to renderers.
#[derive(Debug, Clone)]
pub struct HostConfig {
	minimum_width: usize,
	max_width: Option<usize>,
	max_height: Option<usize>,
	render: String,
	timeout: Duration,
	entry_timing: Timing,
	exit_timing: Timing,
	max_visible: Option<usize>,
	overflow: Overflow,
	renderers: RendererRegistry,
}

impl Default for HostConfig {
	fn default() -> Self {
		Self {
			minimum_width: 50,
			max_width: None,
			max_height: None,
			render: "default".to_string(),
			timeout: DEFAULT_TIMEOUT,
			entry_timing: Timing::Auto,
			exit_timing: Timing::Auto,
			max_visible: None,
			overflow: Overflow::default(),
			renderers: RendererRegistry::builtin(),
		}
	}
}

impl HostConfig {
	#[must_use]
	pub fn with_minimum_width(mut self, width: usize) -> Self {
		self.minimum_width = width;
		self
	}

	#[must_use]
	pub fn with_max_width(mut self, width: Option<usize>) -> Self {
		self.max_width = width;
		self
	}

	#[must_use]
	pub fn with_max_height(mut self, height: Option<usize>) -> Self {
		self.max_height = height;
		self
	}

	/// Sets the name of the renderer used when a record has no render callback.
	#[must_use]
	pub fn with_render(mut self, name: impl Into<String>) -> Self {
		self.render = name.into();
		self
	}

	#[must_use]
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	#[must_use]
	pub fn with_timings(mut self, entry: Timing, exit: Timing) -> Self {
		self.entry_timing = entry;
		self.exit_timing = exit;
		self
	}

	/// Sets the maximum number of simultaneously open records.
	#[must_use]
	pub fn with_max_visible(mut self, max: Option<usize>, overflow: Overflow) -> Self {
		self.max_visible = max;
		self.overflow = overflow;
		self
	}

	#[must_use]
	pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
		self.renderers = renderers;
		self
	}

	pub fn minimum_width(&self) -> usize {
		self.minimum_width
	}

	pub fn max_width(&self) -> Option<usize> {
		self.max_width
	}

	pub fn max_height(&self) -> Option<usize> {
		self.max_height
	}

	/// Name of the default renderer.
	pub fn render(&self) -> &str {
		&self.render
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	pub fn entry_duration(&self) -> Duration {
		self.entry_timing.resolve(DEFAULT_ENTRY_DURATION)
	}

	pub fn exit_duration(&self) -> Duration {
		self.exit_timing.resolve(DEFAULT_EXIT_DURATION)
	}

	pub fn max_visible(&self) -> Option<usize> {
		self.max_visible
	}

	pub fn overflow(&self) -> Overflow {
		self.overflow
	}

	pub fn renderers(&self) -> &RendererRegistry {
		&self.renderers
	}

	pub fn renderers_mut(&mut self) -> &mut RendererRegistry {
		&mut self.renderers
	}

	pub fn highlights(&self, level: Level) -> NotifyHighlights {
		NotifyHighlights::for_level(level)
	}

	/// Checks bounds that would make windows unrepresentable.
	pub fn validate(&self) -> Result<(), HostError> {
		if let Some(max) = self.max_width
			&& max != 0 && max < self.minimum_width
		{
			return Err(HostError::InvalidConfig(format!("max_width {max} is below minimum_width {}", self.minimum_width)));
		}
		if self.max_height == Some(0) {
			return Err(HostError::InvalidConfig("max_height must be non-zero".to_string()));
		}
		if self.max_visible == Some(0) {
			return Err(HostError::InvalidConfig("max_visible must be non-zero".to_string()));
		}
		Ok(())
	}
}
