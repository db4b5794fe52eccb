//! In-process notification host.

use std::collections::BTreeMap;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};
use unicode_width::UnicodeWidthStr;

mod state;


use state::RecordState;

use crate::config::HostConfig;
use crate::error::HostError;
use crate::host::{HostEvent, HostOptions, HostProvider, NotifyHost};
use crate::render::Notification;
use crate::surface::Surface;
use crate::types::{AnimationPhase, DismissOptions, Level, NotifyHandle, Overflow, SurfaceId, WindowId};

/// Fallback cap for window dimensions when the config sets none.
const UNBOUNDED_CAP: usize = 1000;

/// Floating window showing one record.
#[derive(Debug)]
pub struct Window {
	id: WindowId,
	handle: NotifyHandle,
	width: usize,
	height: usize,
	surface: Surface,
}

impl Window {
	fn new(id: WindowId, handle: NotifyHandle, surface: SurfaceId, width: usize) -> Self {
		let mut surface = Surface::new(surface);
		surface.attach(Some(id));
		Self {
			id,
			handle,
			width,
			height: 1,
			surface,
		}
	}

	pub fn id(&self) -> WindowId {
		self.id
	}

	/// Record currently shown in this window.
	pub fn handle(&self) -> NotifyHandle {
		self.handle
	}

	pub fn width(&self) -> usize {
		self.width
	}

	pub fn height(&self) -> usize {
		self.height
	}

	pub fn surface(&self) -> &Surface {
		&self.surface
	}
}

/// Manages notification records with lifecycle, replacement, and windows.
///
/// Records open on the [`tick`](Self::tick) after they are created and close
/// when their timeout elapses, when dismissed, or when their window is closed.
/// Every transition visible to clients is queued as a [`HostEvent`].
#[derive(Debug)]
pub struct NotifyService {
	config: HostConfig,
	/// Records keyed by handle; handles are issued in creation order.
	records: BTreeMap<NotifyHandle, RecordState>,
	windows: FxHashMap<WindowId, Window>,
	next_handle: u64,
	next_window: u64,
	next_surface: u64,
	events: Vec<HostEvent>,
}

impl std::fmt::Debug for RecordState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RecordState")
			.field("handle", &self.handle)
			.field("phase", &self.phase)
			.field("window", &self.window)
			.finish_non_exhaustive()
	}
}

impl Default for NotifyService {
	fn default() -> Self {
		Self::new(HostConfig::default())
	}
}

impl NotifyService {
	pub fn new(config: HostConfig) -> Self {
		Self {
			config,
			records: BTreeMap::new(),
			windows: FxHashMap::default(),
			next_handle: 1,
			next_window: 1,
			next_surface: 1,
			events: Vec::new(),
		}
	}

	/// Returns a snapshot of a live record.
	pub fn record(&self, handle: NotifyHandle) -> Option<Notification> {
		self.records.get(&handle).map(RecordState::notification)
	}

	pub fn phase(&self, handle: NotifyHandle) -> Option<AnimationPhase> {
		self.records.get(&handle).map(|r| r.phase)
	}

	pub fn window(&self, id: WindowId) -> Option<&Window> {
		self.windows.get(&id)
	}

	/// Returns the window showing a record.
	pub fn window_for(&self, handle: NotifyHandle) -> Option<&Window> {
		self.records.get(&handle).and_then(|r| r.window).and_then(|w| self.windows.get(&w))
	}

	/// Returns the number of live records, pending ones included.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Returns the number of records with an open window.
	pub fn open_count(&self) -> usize {
		self.records.values().filter(|r| r.is_open()).count()
	}

	/// Opens pending records, advances open ones, and closes finished ones.
	pub fn tick(&mut self, delta: Duration) {
		let handles: Vec<NotifyHandle> = self.records.keys().copied().collect();
		for handle in handles {
			let Some(record) = self.records.get_mut(&handle) else {
				continue;
			};
			if record.phase == AnimationPhase::Pending {
				self.open(handle);
			} else {
				record.update(delta);
			}
		}

		let finished: Vec<NotifyHandle> = self
			.records
			.values()
			.filter(|r| r.phase == AnimationPhase::Finished)
			.map(|r| r.handle)
			.collect();
		for handle in finished {
			self.finish(handle);
		}
	}

	fn allocate_handle(&mut self) -> NotifyHandle {
		let handle = NotifyHandle(self.next_handle);
		self.next_handle = self.next_handle.wrapping_add(1).max(1);
		handle
	}

	/// Removes a replace target and queues its close (or discard) event.
	fn take_replaced(&mut self, old: NotifyHandle) -> Option<RecordState> {
		let record = self.records.remove(&old)?;
		match record.phase {
			AnimationPhase::Pending => {
				self.events.push(HostEvent::Discarded { handle: old });
				Some(record)
			}
			AnimationPhase::Finished => {
				let window = record.window.and_then(|w| self.windows.remove(&w)).map(|w| w.id);
				self.events.push(HostEvent::Closed { handle: old, window });
				None
			}
			_ => {
				self.events.push(HostEvent::Closed { handle: old, window: None });
				Some(record)
			}
		}
	}

	/// Opens a pending record. Returns false when it has to keep waiting for a slot.
	fn open(&mut self, handle: NotifyHandle) -> bool {
		let in_place = self.records.get(&handle).and_then(|r| r.window).is_some_and(|w| self.windows.contains_key(&w));

		if !in_place && let Some(max) = self.config.max_visible() {
			while self.open_count() >= max {
				match self.config.overflow() {
					Overflow::DropOldest => {
						let Some(oldest) = self.records.values().find(|r| r.is_open()).map(|r| r.handle) else {
							break;
						};
						debug!(handle = oldest.0, "closing oldest notification to make room");
						self.finish(oldest);
					}
					Overflow::WaitForSlot => return false,
				}
			}
		}

		let window_id = if in_place {
			self.records.get(&handle).and_then(|r| r.window)
		} else {
			None
		};
		let window_id = match window_id {
			Some(id) => id,
			None => {
				let id = WindowId(self.next_window);
				self.next_window += 1;
				let surface = SurfaceId(self.next_surface);
				self.next_surface += 1;
				self.windows.insert(id, Window::new(id, handle, surface, self.config.minimum_width()));
				id
			}
		};

		let (Some(record), Some(window)) = (self.records.get_mut(&handle), self.windows.get_mut(&window_id)) else {
			return false;
		};
		record.window = Some(window_id);
		record.enter(in_place);
		window.handle = handle;
		paint(&self.config, record, window);

		trace!(handle = handle.0, window = window_id.0, in_place, "notification opened");
		self.events.push(HostEvent::Opened {
			handle,
			window: window_id,
			notification: record.notification(),
		});
		true
	}

	/// Removes an open record, destroys its window, and queues the close event.
	fn finish(&mut self, handle: NotifyHandle) {
		let Some(record) = self.records.remove(&handle) else {
			return;
		};
		let window = record.window.and_then(|w| self.windows.remove(&w)).map(|w| w.id);
		trace!(handle = handle.0, ?window, "notification closed");
		self.events.push(HostEvent::Closed { handle, window });
	}
}

/// Paints a record into its window and sizes the window.
fn paint(config: &HostConfig, record: &RecordState, window: &mut Window) {
	let notification = record.notification();
	let highlights = config.highlights(record.level);
	let surface = &mut window.surface;

	let result = match &record.render {
		Some(render) => render(surface, &notification, &highlights, config),
		None => {
			let name = config.render();
			let render = config.renderers().get(name).or_else(|| {
				warn!(renderer = name, "unknown renderer, using default");
				config.renderers().get("default")
			});
			match render {
				Some(render) => render(surface, &notification, &highlights, config),
				None => Err(HostError::Render(format!("no renderer named {name}"))),
			}
		}
	};
	if let Err(error) = result {
		warn!(handle = record.handle.0, %error, "notification render failed");
		surface.clear();
	}

	match surface.take_requested_size() {
		Some(size) => {
			window.width = size.width;
			window.height = size.height;
		}
		None => {
			let natural = surface.lines().iter().map(|l| l.width()).max().unwrap_or(0);
			window.width = natural.max(config.minimum_width()).min(cap(config.max_width()));
			window.height = surface.line_count().min(cap(config.max_height()));
		}
	}
}

fn cap(max: Option<usize>) -> usize {
	max.filter(|&m| m > 0).unwrap_or(UNBOUNDED_CAP)
}

impl NotifyHost for NotifyService {
	fn create(&mut self, content: Option<&str>, level: Level, options: HostOptions) -> NotifyHandle {
		let handle = self.allocate_handle();
		let replaced = options.replace.and_then(|old| self.take_replaced(old));
		let record = RecordState::new(handle, content, level, options, &self.config, replaced);
		debug!(handle = handle.0, %level, inherited_window = record.window.is_some(), "notification created");
		self.records.insert(handle, record);
		handle
	}

	fn dismiss(&mut self, options: DismissOptions) {
		let handles: Vec<NotifyHandle> = self.records.keys().copied().collect();
		for handle in handles {
			let Some(record) = self.records.get_mut(&handle) else {
				continue;
			};
			match record.phase {
				AnimationPhase::Pending => {
					if options.pending {
						self.records.remove(&handle);
						self.events.push(HostEvent::Discarded { handle });
					}
				}
				AnimationPhase::Finished => {}
				_ if options.silent => record.phase = AnimationPhase::Finished,
				_ => record.begin_exit(),
			}
		}

		let finished: Vec<NotifyHandle> = self
			.records
			.values()
			.filter(|r| r.phase == AnimationPhase::Finished)
			.map(|r| r.handle)
			.collect();
		for handle in finished {
			self.finish(handle);
		}
	}

	fn window_is_valid(&self, window: WindowId) -> bool {
		self.windows.contains_key(&window)
	}

	fn close_window(&mut self, window: WindowId) -> bool {
		let Some(handle) = self.windows.get(&window).map(|w| w.handle) else {
			return false;
		};
		if self.records.get(&handle).is_some_and(RecordState::is_open) {
			self.finish(handle);
			return true;
		}

		// Handed to a replacing record that has not opened yet; it opens in a fresh window.
		self.windows.remove(&window);
		for record in self.records.values_mut().filter(|r| r.window == Some(window)) {
			record.window = None;
		}
		trace!(window = window.0, "closed window awaiting its replacement");
		true
	}

	fn config(&self) -> &HostConfig {
		&self.config
	}

	fn drain_events(&mut self) -> Vec<HostEvent> {
		std::mem::take(&mut self.events)
	}
}

/// Provider that validates a [`HostConfig`] before building a [`NotifyService`].
#[derive(Debug, Clone, Default)]
pub struct ServiceProvider {
	config: HostConfig,
}

impl ServiceProvider {
	pub fn new(config: HostConfig) -> Self {
		Self { config }
	}
}

impl HostProvider for ServiceProvider {
	type Host = NotifyService;

	fn load(&self) -> Result<NotifyService, HostError> {
		self.config.validate()?;
		Ok(NotifyService::new(self.config.clone()))
	}
}
