//! Messages produced upstream and the lookup the view resolves them through.

use rustc_hash::FxHashMap;
use xeno_notify_host::{Level, NotifyHandle};

use crate::config::RequestOverrides;

/// Identifier assigned to a message by its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

/// Styled fragment of a message line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
	pub text: String,
	pub hl_group: Option<String>,
}

impl Chunk {
	pub fn plain(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			hl_group: None,
		}
	}

	pub fn styled(text: impl Into<String>, hl_group: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			hl_group: Some(hl_group.into()),
		}
	}
}

/// One line of message content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLine {
	pub chunks: Vec<Chunk>,
}

impl MessageLine {
	pub fn new(chunks: Vec<Chunk>) -> Self {
		Self { chunks }
	}

	pub fn text(&self) -> String {
		self.chunks.iter().map(|c| c.text.as_str()).collect()
	}
}

/// Mutable options bag carried by a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOpts {
	/// Title used when the message is shown on its own.
	pub title: Option<String>,
	/// Handle of the notification currently showing this message.
	///
	/// Written by the view on dispatch, cleared when that notification closes.
	pub notify_id: Option<NotifyHandle>,
	/// Ad hoc options that win over the view's computed options.
	pub overrides: RequestOverrides,
}

/// Unit of text and severity produced by the message pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
	id: MessageId,
	pub level: Level,
	pub lines: Vec<MessageLine>,
	pub opts: MessageOpts,
}

impl Message {
	/// Creates an unstyled message, one line per `\n`-separated segment.
	pub fn new(id: MessageId, level: Level, text: &str) -> Self {
		Self {
			id,
			level,
			lines: text.split('\n').map(|l| MessageLine::new(vec![Chunk::plain(l)])).collect(),
			opts: MessageOpts::default(),
		}
	}

	pub fn id(&self) -> MessageId {
		self.id
	}

	#[must_use]
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.opts.title = Some(title.into());
		self
	}

	#[must_use]
	pub fn with_lines(mut self, lines: Vec<MessageLine>) -> Self {
		self.lines = lines;
		self
	}

	#[must_use]
	pub fn with_overrides(mut self, overrides: RequestOverrides) -> Self {
		self.opts.overrides = overrides;
		self
	}

	/// Plain-text content, lines joined with `\n`.
	pub fn content(&self) -> String {
		self.lines.iter().map(MessageLine::text).collect::<Vec<_>>().join("\n")
	}
}

/// Plain-text content of a batch, messages joined with `\n`.
pub fn batch_content(messages: &[&Message]) -> String {
	messages.iter().map(|m| m.content()).collect::<Vec<_>>().join("\n")
}

/// Message lookup by id.
pub trait MessageLookup {
	fn get_by_id(&self, id: MessageId) -> Option<&Message>;

	fn get_by_id_mut(&mut self, id: MessageId) -> Option<&mut Message>;
}

/// In-memory message store.
#[derive(Debug, Default)]
pub struct MessageStore {
	messages: FxHashMap<MessageId, Message>,
	next_id: u64,
}

impl MessageStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocates an id and stores an unstyled message.
	pub fn add(&mut self, level: Level, text: &str) -> MessageId {
		let id = self.allocate_id();
		self.messages.insert(id, Message::new(id, level, text));
		id
	}

	/// Stores a message built by the caller. Replaces any message with the same id.
	pub fn insert(&mut self, message: Message) -> MessageId {
		let id = message.id();
		self.next_id = self.next_id.max(id.0.wrapping_add(1));
		self.messages.insert(id, message);
		id
	}

	/// Allocates a fresh id for a message built by the caller.
	pub fn allocate_id(&mut self) -> MessageId {
		let id = MessageId(self.next_id);
		self.next_id = self.next_id.wrapping_add(1);
		id
	}

	pub fn remove(&mut self, id: MessageId) -> Option<Message> {
		self.messages.remove(&id)
	}

	pub fn len(&self) -> usize {
		self.messages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}
}

impl MessageLookup for MessageStore {
	fn get_by_id(&self, id: MessageId) -> Option<&Message> {
		self.messages.get(&id)
	}

	fn get_by_id_mut(&mut self, id: MessageId) -> Option<&mut Message> {
		self.messages.get_mut(&id)
	}
}
