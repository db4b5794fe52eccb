//! Notify view: drives a [`NotifyHost`] from message batches.
//!
//! [`NotifyView::show`] plans the pending batch into requests and dispatches
//! each one to the host. The host reports open and close transitions as
//! [`HostEvent`]s; [`NotifyView::pump`] consumes them, keeps the message to
//! handle associations current, and runs the configured listeners after
//! [`CALLBACK_DELAY`].
//!
//! # Associations
//!
//! Every dispatched message carries the handle of the notification showing it
//! in `opts.notify_id` until that notification closes. A close only clears
//! messages still pointing at the closing handle, so a message picked up by a
//! later notification keeps its newer association.

use std::mem;
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{debug, error, trace};
use xeno_notify_host::{DismissOptions, HostEvent, HostOptions, HostProvider, Notification, NotifyHandle, NotifyHost, WindowId};

use crate::config::{CallbackRegistry, CallbackSpec, NotifyOptions, RequestOverrides};
use crate::deferred::{CALLBACK_DELAY, DeferredCallback, DeferredQueue, DeferredTask};
use crate::error::{NotifyViewError, Result};
use crate::message::{Message, MessageId, MessageLookup};
use crate::plan::{NotificationRequest, plan};
use crate::render::RenderPipeline;

#[cfg(test)]
mod tests;

/// Adapter state mutated by the open and close paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterState {
	window: Option<WindowId>,
	current_handle: Option<NotifyHandle>,
	current_notification: Option<Notification>,
}

impl AdapterState {
	/// Window tracked in merge mode.
	pub fn window(&self) -> Option<WindowId> {
		self.window
	}

	/// Handle of the most recently dispatched notification, until it closes.
	pub fn current_handle(&self) -> Option<NotifyHandle> {
		self.current_handle
	}

	/// Snapshot of the current notification once the host has opened it.
	pub fn current_notification(&self) -> Option<&Notification> {
		self.current_notification.as_ref()
	}
}

/// Notification the host has not yet closed.
#[derive(Debug, Clone)]
struct LiveNotification {
	messages: Vec<MessageId>,
	/// Set when the host reports the open.
	notification: Option<Notification>,
}

/// Projects message batches onto a notification host.
pub struct NotifyView<H: NotifyHost> {
	host: H,
	options: NotifyOptions,
	callbacks: CallbackRegistry,
	batch: Vec<MessageId>,
	state: AdapterState,
	live: FxHashMap<NotifyHandle, LiveNotification>,
	deferred: DeferredQueue,
	blocking: bool,
}

impl<H: NotifyHost> std::fmt::Debug for NotifyView<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NotifyView")
			.field("options", &self.options)
			.field("batch", &self.batch)
			.field("state", &self.state)
			.field("live", &self.live.len())
			.field("deferred", &self.deferred.len())
			.field("blocking", &self.blocking)
			.finish_non_exhaustive()
	}
}

impl<H: NotifyHost> NotifyView<H> {
	pub fn new(host: H, options: NotifyOptions) -> Self {
		Self {
			host,
			options,
			callbacks: CallbackRegistry::default(),
			batch: Vec::new(),
			state: AdapterState::default(),
			live: FxHashMap::default(),
			deferred: DeferredQueue::default(),
			blocking: false,
		}
	}

	/// Loads a host from `provider` and wraps it.
	pub fn from_provider<P>(provider: &P, options: NotifyOptions) -> Result<Self>
	where
		P: HostProvider<Host = H>,
	{
		Ok(Self::new(provider.load()?, options))
	}

	/// Returns true when `provider` can load a host.
	pub fn is_available<P>(provider: &P) -> bool
	where
		P: HostProvider<Host = H>,
	{
		match provider.load() {
			Ok(_) => true,
			Err(error) => {
				debug!(%error, "notification host unavailable");
				false
			}
		}
	}

	pub fn state(&self) -> &AdapterState {
		&self.state
	}

	pub fn options(&self) -> &NotifyOptions {
		&self.options
	}

	/// Replaces the options. Notifications already dispatched keep their render state.
	pub fn set_options(&mut self, options: NotifyOptions) {
		self.options = options;
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn callbacks_mut(&mut self) -> &mut CallbackRegistry {
		&mut self.callbacks
	}

	/// While set, notifications are created without animation and never auto-close.
	pub fn set_blocking(&mut self, blocking: bool) {
		self.blocking = blocking;
	}

	pub fn is_blocking(&self) -> bool {
		self.blocking
	}

	/// Appends a message to the pending batch.
	pub fn push(&mut self, id: MessageId) {
		self.batch.push(id);
	}

	pub fn batch(&self) -> &[MessageId] {
		&self.batch
	}

	/// Messages covered by a notification the host has not closed yet.
	pub fn messages_for(&self, handle: NotifyHandle) -> Option<&[MessageId]> {
		self.live.get(&handle).map(|l| l.messages.as_slice())
	}

	/// Returns the number of scheduled listener invocations.
	pub fn pending_callbacks(&self) -> usize {
		self.deferred.len()
	}

	/// Plans the pending batch, clears it, and dispatches each request in order.
	///
	/// Batch entries missing from `store` are skipped.
	pub fn show<S: MessageLookup>(&mut self, store: &mut S) -> Vec<NotifyHandle> {
		let ids = mem::take(&mut self.batch);
		let lookup: &S = store;
		let messages: Vec<&Message> = ids
			.iter()
			.filter_map(|&id| {
				let message = lookup.get_by_id(id);
				if message.is_none() {
					debug!(message = id.0, "message vanished before show");
				}
				message
			})
			.collect();
		let requests = plan(&messages, &self.options);
		trace!(messages = messages.len(), requests = requests.len(), merge = self.options.merge, "showing batch");

		requests.into_iter().map(|request| self.dispatch(request, store)).collect()
	}

	/// Creates the host notification for one request and stamps its messages.
	pub fn dispatch<S: MessageLookup>(&mut self, request: NotificationRequest, store: &mut S) -> NotifyHandle {
		let level = self.options.level.or(request.level).unwrap_or_default();
		let content = (!request.content.is_empty()).then(|| request.content.clone());

		let mut options = HostOptions {
			title: Some(request.title.clone().unwrap_or_else(|| self.options.title.clone())),
			timeout: self.options.timeout,
			replace: if self.options.merge || self.options.replace {
				self.state.current_handle
			} else {
				None
			},
			..HostOptions::default()
		};
		if self.blocking {
			options.animate = false;
			options.keep = true;
		}
		if let Some(overrides) = &request.opts {
			self.apply_overrides(&mut options, overrides, store);
		}

		let messages: Vec<Message> = request.messages.iter().filter_map(|&id| store.get_by_id(id).cloned()).collect();
		options.render = Some(RenderPipeline::new(self.options.render.clone(), content.clone(), messages).into_render_fn());

		let replace = options.replace;
		let handle = self.host.create(content.as_deref(), level, options);
		debug!(handle = handle.0, replace = ?replace.map(|h| h.0), messages = request.messages.len(), %level, "notification dispatched");

		self.state.current_handle = Some(handle);
		for &id in &request.messages {
			if let Some(message) = store.get_by_id_mut(id) {
				message.opts.notify_id = Some(handle);
			}
		}
		self.live.insert(
			handle,
			LiveNotification {
				messages: request.messages,
				notification: None,
			},
		);
		handle
	}

	/// Applies per-message overrides over the computed host options.
	fn apply_overrides<S: MessageLookup>(&self, options: &mut HostOptions, overrides: &RequestOverrides, store: &S) {
		if let Some(timeout) = overrides.timeout {
			options.timeout = Some(timeout);
		}
		if let Some(icon) = &overrides.icon {
			options.icon = Some(icon.clone());
		}
		if let Some(keep) = overrides.keep {
			options.keep = keep;
		}
		if let Some(animate) = overrides.animate {
			options.animate = animate;
		}

		if let Some(target) = overrides.replace_message {
			options.replace = store.get_by_id(target).and_then(|m| m.opts.notify_id);
			trace!(message = target.0, replace = ?options.replace.map(|h| h.0), "resolved replace target");
		} else if let Some(current) = overrides.replace_current {
			options.replace = if current { self.state.current_handle } else { None };
		}
	}

	/// Consumes host events, then runs every listener due at `now`.
	///
	/// Returns the number of listeners run. A listener that is not registered,
	/// or a handle that is not a valid identifier, stops the pump with an error;
	/// later listeners stay queued for the next call.
	pub fn pump<S: MessageLookup>(&mut self, now: Instant, store: &mut S) -> Result<usize> {
		for event in self.host.drain_events() {
			self.handle_event(event, now, store);
		}

		let mut ran = 0;
		while let Some(task) = self.deferred.pop_due(now) {
			if let Err(err) = self.run_deferred(task) {
				error!(error = %err, seq = task.seq, "notify callback failed");
				return Err(err);
			}
			ran += 1;
		}
		Ok(ran)
	}

	fn handle_event<S: MessageLookup>(&mut self, event: HostEvent, now: Instant, store: &mut S) {
		match event {
			HostEvent::Opened { handle, window, notification } => self.on_open(handle, window, notification, now),
			HostEvent::Closed { handle, window } => {
				self.release(handle, store);
				if window.is_some() && self.state.window == window {
					self.state.window = None;
				}
				trace!(handle = handle.0, window = ?window.map(|w| w.0), "notification closed");
				if self.options.on_close.is_some() {
					self.deferred.schedule(now, CALLBACK_DELAY, DeferredCallback::Close { handle });
				}
			}
			HostEvent::Discarded { handle } => {
				self.release(handle, store);
				trace!(handle = handle.0, "notification discarded before opening");
			}
		}
	}

	fn on_open(&mut self, handle: NotifyHandle, window: WindowId, notification: Notification, now: Instant) {
		if self.options.merge {
			self.state.window = Some(window);
		}
		if self.state.current_handle == Some(handle) {
			self.state.current_notification = Some(notification.clone());
		}
		match self.live.get_mut(&handle) {
			Some(live) => live.notification = Some(notification),
			None => debug!(handle = handle.0, "open event for unknown notification"),
		}
		trace!(handle = handle.0, window = window.0, "notification opened");
		if self.options.on_open.is_some() {
			self.deferred.schedule(now, CALLBACK_DELAY, DeferredCallback::Open { handle });
		}
	}

	/// Drops the association between `handle` and its messages.
	fn release<S: MessageLookup>(&mut self, handle: NotifyHandle, store: &mut S) {
		if self.state.current_handle == Some(handle) {
			self.state.current_handle = None;
			self.state.current_notification = None;
		}
		let Some(live) = self.live.remove(&handle) else {
			return;
		};
		for id in live.messages {
			if let Some(message) = store.get_by_id_mut(id)
				&& message.opts.notify_id == Some(handle)
			{
				message.opts.notify_id = None;
			}
		}
	}

	fn run_deferred(&self, task: DeferredTask) -> Result<()> {
		let (handle, spec) = match task.callback {
			DeferredCallback::Open { handle } => (handle, self.options.on_open.as_ref()),
			DeferredCallback::Close { handle } => (handle, self.options.on_close.as_ref()),
		};
		let Some(spec) = spec else {
			trace!(handle = handle.0, "listener removed before it fired");
			return Ok(());
		};
		let callback = self.callbacks.resolve(spec)?;
		if !handle.is_valid() {
			return Err(NotifyViewError::InvalidHandle(handle.0));
		}

		match task.callback {
			DeferredCallback::Open { .. } => {
				let notification = self.live.get(&handle).and_then(|l| l.notification.as_ref());
				if notification.is_none() {
					debug!(handle = handle.0, "notification closed before open listener fired");
				}
				callback(handle, notification);
			}
			DeferredCallback::Close { .. } => callback(handle, None),
		}
		if let CallbackSpec::Named(name) = spec {
			trace!(handle = handle.0, callback = name.as_str(), "ran notify listener");
		}
		Ok(())
	}

	/// Closes the tracked window if it is still valid. Does nothing otherwise.
	pub fn hide(&mut self) {
		let Some(window) = self.state.window else {
			return;
		};
		if !self.host.window_is_valid(window) {
			trace!(window = window.0, "tracked window already gone");
			return;
		}
		self.host.close_window(window);
		self.state.window = None;
	}

	/// Dismisses every notification, pending ones included, without close animations.
	pub fn dismiss(&mut self) {
		self.host.dismiss(DismissOptions { pending: true, silent: true });
	}
}
