use std::time::Duration;

use crate::config::HostConfig;
use crate::host::HostOptions;
use crate::render::{Notification, RenderFn};
use crate::types::{AnimationPhase, Level, NotifyHandle, WindowId};

/// Internal state for a single notification record.
pub(super) struct RecordState {
	pub(super) handle: NotifyHandle,
	pub(super) level: Level,
	pub(super) title: String,
	pub(super) icon: String,
	pub(super) message: Vec<String>,
	/// Paint callback supplied by the client.
	pub(super) render: Option<RenderFn>,
	/// Current lifecycle phase.
	pub(super) phase: AnimationPhase,
	/// Animation progress within the current phase (0.0 to 1.0).
	pub(super) progress: f32,
	pub(super) timeout: Duration,
	/// Time remaining before auto-close.
	pub(super) remaining_dwell: Duration,
	pub(super) entry_duration: Duration,
	pub(super) exit_duration: Duration,
	/// Suppresses auto-close.
	pub(super) keep: bool,
	/// Window showing this record. Set at open, or inherited from a replaced record.
	pub(super) window: Option<WindowId>,
}

impl RecordState {
	/// Creates a pending record, inheriting unset fields from `replaced`.
	pub(super) fn new(handle: NotifyHandle, content: Option<&str>, level: Level, options: HostOptions, config: &HostConfig, replaced: Option<RecordState>) -> Self {
		let message = match content {
			Some(content) => content.split('\n').map(str::to_string).collect(),
			None => replaced.as_ref().map(|r| r.message.clone()).unwrap_or_default(),
		};
		let title = options.title.or_else(|| replaced.as_ref().map(|r| r.title.clone())).unwrap_or_default();
		let timeout = options.timeout.unwrap_or(config.timeout());
		let (entry_duration, exit_duration) = if options.animate {
			(config.entry_duration(), config.exit_duration())
		} else {
			(Duration::ZERO, Duration::ZERO)
		};

		Self {
			handle,
			level,
			title,
			icon: options.icon.unwrap_or_else(|| level.icon().to_string()),
			message,
			render: options.render,
			phase: AnimationPhase::Pending,
			progress: 0.0,
			timeout,
			remaining_dwell: timeout,
			entry_duration,
			exit_duration,
			keep: options.keep,
			window: replaced.and_then(|r| r.window),
		}
	}

	pub(super) fn notification(&self) -> Notification {
		Notification {
			handle: self.handle,
			level: self.level,
			title: self.title.clone(),
			icon: self.icon.clone(),
			message: self.message.clone(),
			timeout: Some(self.timeout),
		}
	}

	/// Returns true while the record has a window on screen.
	pub(super) fn is_open(&self) -> bool {
		matches!(self.phase, AnimationPhase::Entering | AnimationPhase::Dwelling | AnimationPhase::Exiting)
	}

	/// Moves an opened record into its first visible phase.
	pub(super) fn enter(&mut self, in_place: bool) {
		self.progress = 0.0;
		self.phase = if in_place || self.entry_duration.is_zero() {
			AnimationPhase::Dwelling
		} else {
			AnimationPhase::Entering
		};
	}

	pub(super) fn begin_exit(&mut self) {
		self.progress = 0.0;
		self.phase = if self.exit_duration.is_zero() {
			AnimationPhase::Finished
		} else {
			AnimationPhase::Exiting
		};
	}

	/// Advances an open record by the given time delta.
	pub(super) fn update(&mut self, delta: Duration) {
		let phase_duration = match self.phase {
			AnimationPhase::Entering => self.entry_duration,
			AnimationPhase::Exiting => self.exit_duration,
			_ => Duration::ZERO,
		};

		if matches!(self.phase, AnimationPhase::Entering | AnimationPhase::Exiting) {
			self.progress = if phase_duration.is_zero() {
				1.0
			} else {
				(self.progress + delta.as_secs_f32() / phase_duration.as_secs_f32()).min(1.0)
			};

			if self.progress >= 1.0 {
				match self.phase {
					AnimationPhase::Entering => {
						self.phase = AnimationPhase::Dwelling;
						self.progress = 0.0;
					}
					AnimationPhase::Exiting => {
						self.phase = AnimationPhase::Finished;
					}
					_ => {}
				}
			}
		}

		if self.phase == AnimationPhase::Dwelling && !self.keep {
			self.remaining_dwell = self.remaining_dwell.saturating_sub(delta);
			if self.remaining_dwell.is_zero() {
				self.begin_exit();
			}
		}
	}
}
