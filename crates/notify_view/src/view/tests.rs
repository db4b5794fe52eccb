use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use xeno_notify_host::{HostConfig, HostError, Level};

use super::*;
use crate::config::NotifyCallback;
use crate::message::MessageStore;

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

struct Created {
	handle: NotifyHandle,
	content: Option<String>,
	level: Level,
	options: HostOptions,
}

/// Host that records calls and emits only the events a test scripts.
#[derive(Default)]
struct FakeHost {
	config: HostConfig,
	next_handle: u64,
	created: Vec<Created>,
	events: Vec<HostEvent>,
	windows: Vec<WindowId>,
	closed_windows: Vec<WindowId>,
	dismissed: Vec<DismissOptions>,
}

impl FakeHost {
	fn open(&mut self, handle: NotifyHandle, window: WindowId) {
		let (title, message) = self
			.created
			.iter()
			.find(|c| c.handle == handle)
			.map(|c| {
				let lines: Vec<String> = c.content.as_deref().unwrap_or_default().split('\n').map(str::to_string).collect();
				(c.options.title.clone().unwrap_or_default(), lines)
			})
			.unwrap_or_default();
		self.windows.push(window);
		self.events.push(HostEvent::Opened {
			handle,
			window,
			notification: Notification {
				handle,
				level: Level::Info,
				title,
				icon: String::new(),
				message,
				timeout: None,
			},
		});
	}

	fn close(&mut self, handle: NotifyHandle, window: Option<WindowId>) {
		self.windows.retain(|w| Some(*w) != window);
		self.events.push(HostEvent::Closed { handle, window });
	}

	fn last(&self) -> &Created {
		self.created.last().unwrap()
	}
}

impl NotifyHost for FakeHost {
	fn create(&mut self, content: Option<&str>, level: Level, options: HostOptions) -> NotifyHandle {
		self.next_handle += 1;
		let handle = NotifyHandle(self.next_handle);
		self.created.push(Created {
			handle,
			content: content.map(str::to_string),
			level,
			options,
		});
		handle
	}

	fn dismiss(&mut self, options: DismissOptions) {
		self.dismissed.push(options);
	}

	fn window_is_valid(&self, window: WindowId) -> bool {
		self.windows.contains(&window)
	}

	fn close_window(&mut self, window: WindowId) -> bool {
		let known = self.window_is_valid(window);
		self.windows.retain(|w| *w != window);
		self.closed_windows.push(window);
		known
	}

	fn config(&self) -> &HostConfig {
		&self.config
	}

	fn drain_events(&mut self) -> Vec<HostEvent> {
		mem::take(&mut self.events)
	}
}

struct FakeProvider {
	available: bool,
}

impl HostProvider for FakeProvider {
	type Host = FakeHost;

	fn load(&self) -> std::result::Result<FakeHost, HostError> {
		if self.available {
			Ok(FakeHost::default())
		} else {
			Err(HostError::Unavailable("notify module missing".to_string()))
		}
	}
}

type Calls = Rc<RefCell<Vec<(NotifyHandle, Option<Notification>)>>>;

fn recorder() -> (Calls, NotifyCallback) {
	let calls: Calls = Rc::default();
	let sink = Rc::clone(&calls);
	let callback: NotifyCallback = Arc::new(move |handle: NotifyHandle, notification: Option<&Notification>| {
		sink.borrow_mut().push((handle, notification.cloned()));
	});
	(calls, callback)
}

fn view(options: NotifyOptions) -> NotifyView<FakeHost> {
	init_tracing();
	NotifyView::new(FakeHost::default(), options)
}

fn show(view: &mut NotifyView<FakeHost>, store: &mut MessageStore, texts: &[&str]) -> Vec<NotifyHandle> {
	for text in texts {
		let id = store.add(Level::Info, text);
		view.push(id);
	}
	view.show(store)
}

#[test]
fn test_merge_replaces_previous_handle() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_merge(true));

	let first = show(&mut view, &mut store, &["one", "two"]);
	assert_eq!(first.len(), 1);
	assert_eq!(view.host().last().options.replace, None);
	assert_eq!(view.host().last().content.as_deref(), Some("one\ntwo"));

	let second = show(&mut view, &mut store, &["three"]);
	assert_eq!(view.host().last().options.replace, Some(first[0]));
	assert_eq!(view.state().current_handle(), Some(second[0]));
	assert!(view.batch().is_empty());
}

#[test]
fn test_close_clears_messages_of_closed_handle() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_merge(true));

	let first = show(&mut view, &mut store, &["one"])[0];
	let second = show(&mut view, &mut store, &["two"])[0];
	let (one, two) = (MessageId(0), MessageId(1));
	assert_eq!(store.get_by_id(one).unwrap().opts.notify_id, Some(first));
	assert_eq!(store.get_by_id(two).unwrap().opts.notify_id, Some(second));

	view.host_mut().close(first, None);
	view.pump(Instant::now(), &mut store).unwrap();

	assert_eq!(store.get_by_id(one).unwrap().opts.notify_id, None);
	assert_eq!(store.get_by_id(two).unwrap().opts.notify_id, Some(second));
	assert_eq!(view.state().current_handle(), Some(second));
	assert!(view.messages_for(first).is_none());
}

#[test]
fn test_close_keeps_newer_claim_on_message() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default());

	let id = store.add(Level::Info, "shared");
	view.push(id);
	let first = view.show(&mut store)[0];
	view.push(id);
	let second = view.show(&mut store)[0];

	view.host_mut().close(first, None);
	view.pump(Instant::now(), &mut store).unwrap();

	assert_eq!(store.get_by_id(id).unwrap().opts.notify_id, Some(second));
}

#[test]
fn test_split_creates_one_notification_per_message() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default());

	let lint = store.insert(Message::new(MessageId(10), Level::Warn, "unused").with_title("Lint"));
	let plain = store.add(Level::Error, "failed");
	view.push(lint);
	view.push(plain);
	let handles = view.show(&mut store);

	assert_eq!(handles.len(), 2);
	let created = &view.host().created;
	assert_eq!(created[0].options.title.as_deref(), Some("Lint"));
	assert_eq!(created[0].level, Level::Warn);
	assert_eq!(created[1].options.title.as_deref(), Some("Notification"));
	assert_eq!(created[1].level, Level::Error);
	assert!(created.iter().all(|c| c.options.replace.is_none()));
	assert_eq!(store.get_by_id(lint).unwrap().opts.notify_id, Some(handles[0]));
	assert_eq!(store.get_by_id(plain).unwrap().opts.notify_id, Some(handles[1]));
}

#[test]
fn test_configured_level_wins_over_message_level() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_level(Some(Level::Debug)));

	let id = store.add(Level::Error, "quiet please");
	view.push(id);
	view.show(&mut store);

	assert_eq!(view.host().last().level, Level::Debug);
}

#[test]
fn test_replace_message_resolves_through_lookup() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default());

	let target = store.add(Level::Info, "building");
	view.push(target);
	let building = view.show(&mut store)[0];

	let overrides = RequestOverrides {
		replace_message: Some(target),
		replace_current: Some(false),
		..RequestOverrides::default()
	};
	let done = store.allocate_id();
	store.insert(Message::new(done, Level::Info, "built").with_overrides(overrides));
	view.push(done);
	view.show(&mut store);

	assert_eq!(view.host().last().options.replace, Some(building));
}

#[test]
fn test_replace_message_without_target_creates_fresh() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_merge(true));
	show(&mut view, &mut store, &["current"]);

	let idle = store.add(Level::Info, "never shown");
	let overrides = RequestOverrides {
		replace_message: Some(idle),
		..RequestOverrides::default()
	};
	let missing = RequestOverrides {
		replace_message: Some(MessageId(999)),
		..RequestOverrides::default()
	};
	for overrides in [overrides, missing] {
		let request = NotificationRequest {
			content: "next".to_string(),
			messages: Vec::new(),
			title: None,
			level: None,
			opts: Some(overrides),
		};
		view.dispatch(request, &mut store);
		assert_eq!(view.host().last().options.replace, None);
	}
}

#[test]
fn test_replace_current_false_opts_out_in_merge_mode() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_merge(true));
	show(&mut view, &mut store, &["current"]);

	let request = NotificationRequest {
		content: "separate".to_string(),
		messages: Vec::new(),
		title: None,
		level: None,
		opts: Some(RequestOverrides {
			replace_current: Some(false),
			..RequestOverrides::default()
		}),
	};
	view.dispatch(request, &mut store);
	assert_eq!(view.host().last().options.replace, None);
}

#[test]
fn test_overrides_win_over_computed_options() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_timeout(Duration::from_secs(3)));
	view.set_blocking(true);

	let overrides = RequestOverrides {
		timeout: Some(Duration::from_secs(9)),
		icon: Some("!".to_string()),
		animate: Some(true),
		..RequestOverrides::default()
	};
	let id = store.allocate_id();
	store.insert(Message::new(id, Level::Info, "custom").with_overrides(overrides));
	view.push(id);
	view.show(&mut store);

	let options = &view.host().last().options;
	assert_eq!(options.timeout, Some(Duration::from_secs(9)));
	assert_eq!(options.icon.as_deref(), Some("!"));
	assert!(options.animate);
	assert!(options.keep);
}

#[test]
fn test_blocking_disables_animation_and_auto_close() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_timeout(Duration::from_secs(3)));

	show(&mut view, &mut store, &["normal"]);
	assert!(view.host().last().options.animate);
	assert!(!view.host().last().options.keep);
	assert_eq!(view.host().last().options.timeout, Some(Duration::from_secs(3)));

	view.set_blocking(true);
	show(&mut view, &mut store, &["blocking"]);
	assert!(!view.host().last().options.animate);
	assert!(view.host().last().options.keep);
}

#[test]
fn test_empty_content_is_sent_as_none() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default());

	show(&mut view, &mut store, &[""]);
	assert_eq!(view.host().last().content, None);
	assert!(view.host().last().options.render.is_some());
}

#[test]
fn test_show_skips_missing_messages() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default());

	let kept = store.add(Level::Info, "kept");
	view.push(MessageId(42));
	view.push(kept);
	let handles = view.show(&mut store);

	assert_eq!(handles.len(), 1);
	assert_eq!(view.messages_for(handles[0]), Some([kept].as_slice()));
	assert!(view.show(&mut store).is_empty());
}

#[test]
fn test_open_listener_runs_after_delay() {
	let mut store = MessageStore::new();
	let (calls, callback) = recorder();
	let mut view = view(NotifyOptions::default().with_on_open(CallbackSpec::Custom(callback)));

	let handle = show(&mut view, &mut store, &["hello"])[0];
	view.host_mut().open(handle, WindowId(7));

	let now = Instant::now();
	assert_eq!(view.pump(now, &mut store).unwrap(), 0);
	assert_eq!(view.state().current_notification().map(|n| n.handle), Some(handle));
	assert!(calls.borrow().is_empty());

	assert_eq!(view.pump(now + CALLBACK_DELAY, &mut store).unwrap(), 1);
	let calls = calls.borrow();
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].0, handle);
	assert_eq!(calls[0].1.as_ref().map(|n| n.message.clone()), Some(vec!["hello".to_string()]));
}

#[test]
fn test_stale_open_listener_receives_no_notification() {
	let mut store = MessageStore::new();
	let (opened, on_open) = recorder();
	let (closed, on_close) = recorder();
	let options = NotifyOptions::default()
		.with_merge(true)
		.with_on_open(CallbackSpec::Custom(on_open))
		.with_on_close(CallbackSpec::Custom(on_close));
	let mut view = view(options);

	let handle = show(&mut view, &mut store, &["brief"])[0];
	view.host_mut().open(handle, WindowId(1));
	view.host_mut().close(handle, Some(WindowId(1)));

	let now = Instant::now();
	view.pump(now, &mut store).unwrap();
	assert_eq!(view.state(), &AdapterState::default());

	assert_eq!(view.pump(now + CALLBACK_DELAY, &mut store).unwrap(), 2);
	assert_eq!(opened.borrow().as_slice(), &[(handle, None)]);
	assert_eq!(closed.borrow().as_slice(), &[(handle, None)]);
}

#[test]
fn test_named_listener_resolves_from_registry() {
	let mut store = MessageStore::new();
	let (calls, callback) = recorder();
	let mut view = view(NotifyOptions::default().with_on_close(CallbackSpec::Named("log".to_string())));
	view.callbacks_mut().register("log", callback);

	let handle = show(&mut view, &mut store, &["bye"])[0];
	view.host_mut().open(handle, WindowId(1));
	view.host_mut().close(handle, Some(WindowId(1)));

	let now = Instant::now();
	assert_eq!(view.pump(now, &mut store).unwrap(), 0);
	assert_eq!(view.pump(now + CALLBACK_DELAY, &mut store).unwrap(), 1);
	assert_eq!(calls.borrow().as_slice(), &[(handle, None)]);
}

#[test]
fn test_unregistered_listener_is_an_error() {
	let mut store = MessageStore::new();
	let (_, on_close) = recorder();
	let options = NotifyOptions::default()
		.with_on_open(CallbackSpec::Named("missing".to_string()))
		.with_on_close(CallbackSpec::Custom(on_close));
	let mut view = view(options);

	let handle = show(&mut view, &mut store, &["oops"])[0];
	view.host_mut().open(handle, WindowId(1));
	view.host_mut().close(handle, Some(WindowId(1)));

	let now = Instant::now();
	view.pump(now, &mut store).unwrap();
	let later = now + CALLBACK_DELAY;
	let err = view.pump(later, &mut store).unwrap_err();
	assert!(matches!(err, NotifyViewError::CallbackNotFound(ref name) if name == "missing"));
	assert_eq!(view.pending_callbacks(), 1);
	assert_eq!(view.pump(later, &mut store).unwrap(), 1);
}

#[test]
fn test_invalid_handle_is_an_error() {
	let mut store = MessageStore::new();
	let (calls, callback) = recorder();
	let mut view = view(NotifyOptions::default().with_on_open(CallbackSpec::Custom(callback)));

	view.host_mut().open(NotifyHandle(0), WindowId(1));
	let now = Instant::now();
	view.pump(now, &mut store).unwrap();
	let err = view.pump(now + CALLBACK_DELAY, &mut store).unwrap_err();

	assert!(matches!(err, NotifyViewError::InvalidHandle(0)));
	assert!(calls.borrow().is_empty());
}

#[test]
fn test_hide_closes_tracked_window_once() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_merge(true));

	let handle = show(&mut view, &mut store, &["tracked"])[0];
	view.host_mut().open(handle, WindowId(3));
	view.pump(Instant::now(), &mut store).unwrap();
	assert_eq!(view.state().window(), Some(WindowId(3)));

	view.hide();
	assert_eq!(view.host().closed_windows, vec![WindowId(3)]);
	assert_eq!(view.state().window(), None);

	let before = view.state().clone();
	view.hide();
	assert_eq!(view.host().closed_windows, vec![WindowId(3)]);
	assert_eq!(view.state(), &before);
}

#[test]
fn test_hide_without_window_is_noop() {
	let mut view = view(NotifyOptions::default());
	view.hide();
	view.hide();
	assert!(view.host().closed_windows.is_empty());
	assert_eq!(view.state(), &AdapterState::default());
}

#[test]
fn test_hide_ignores_invalid_window() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_merge(true));

	let handle = show(&mut view, &mut store, &["gone"])[0];
	view.host_mut().open(handle, WindowId(4));
	view.pump(Instant::now(), &mut store).unwrap();
	view.host_mut().windows.clear();

	view.hide();
	assert!(view.host().closed_windows.is_empty());
	assert_eq!(view.state().window(), Some(WindowId(4)));
}

#[test]
fn test_split_mode_does_not_track_window() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default());

	let handle = show(&mut view, &mut store, &["free"])[0];
	view.host_mut().open(handle, WindowId(5));
	view.pump(Instant::now(), &mut store).unwrap();
	assert_eq!(view.state().window(), None);
}

#[test]
fn test_replaced_close_keeps_handed_over_window() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default().with_merge(true));

	let first = show(&mut view, &mut store, &["first"])[0];
	view.host_mut().open(first, WindowId(2));
	view.pump(Instant::now(), &mut store).unwrap();

	show(&mut view, &mut store, &["second"]);
	view.host_mut().close(first, None);
	view.pump(Instant::now(), &mut store).unwrap();

	assert_eq!(view.state().window(), Some(WindowId(2)));
}

#[test]
fn test_discarded_clears_association_without_listener() {
	let mut store = MessageStore::new();
	let (calls, callback) = recorder();
	let mut view = view(NotifyOptions::default().with_on_close(CallbackSpec::Custom(callback)));

	let handle = show(&mut view, &mut store, &["dropped"])[0];
	view.host_mut().events.push(HostEvent::Discarded { handle });
	view.pump(Instant::now() + CALLBACK_DELAY, &mut store).unwrap();

	assert_eq!(store.get_by_id(MessageId(0)).unwrap().opts.notify_id, None);
	assert_eq!(view.state().current_handle(), None);
	assert_eq!(view.pending_callbacks(), 0);
	assert!(calls.borrow().is_empty());
}

#[test]
fn test_dismiss_drops_pending_silently() {
	let mut view = view(NotifyOptions::default());
	view.dismiss();
	assert_eq!(view.host().dismissed, vec![DismissOptions { pending: true, silent: true }]);
}

#[test]
fn test_availability_follows_provider() {
	assert!(NotifyView::is_available(&FakeProvider { available: true }));
	assert!(!NotifyView::is_available(&FakeProvider { available: false }));

	let err = NotifyView::from_provider(&FakeProvider { available: false }, NotifyOptions::default()).unwrap_err();
	assert!(matches!(err, NotifyViewError::Host(HostError::Unavailable(_))));
	assert!(NotifyView::from_provider(&FakeProvider { available: true }, NotifyOptions::default()).is_ok());
}

#[test]
fn test_set_options_switches_mode_for_later_dispatches() {
	let mut store = MessageStore::new();
	let mut view = view(NotifyOptions::default());
	assert!(!view.is_blocking());

	let first = show(&mut view, &mut store, &["split"])[0];
	assert_eq!(view.host().last().options.replace, None);

	view.set_options(view.options().clone().with_merge(true));
	view.set_blocking(true);
	assert!(view.options().merge);
	assert!(view.is_blocking());

	show(&mut view, &mut store, &["merged"]);
	assert_eq!(view.host().last().options.replace, Some(first));
	assert!(view.host().last().options.keep);
}
