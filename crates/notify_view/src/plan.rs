//! Merge/split planning of a message batch into notification requests.

use xeno_notify_host::Level;

use crate::config::{NotifyOptions, RequestOverrides};
use crate::message::{Message, MessageId, batch_content};

/// One notification to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
	/// Plain-text content the renderer is expected to show.
	pub content: String,
	/// Messages covered by this notification, in batch order.
	pub messages: Vec<MessageId>,
	pub title: Option<String>,
	pub level: Option<Level>,
	/// Per-message overrides, present only for split requests.
	pub opts: Option<RequestOverrides>,
}

/// Plans the notifications for a batch.
///
/// In merge mode the whole batch becomes one request with no title or level of
/// its own. Otherwise each message becomes its own request, in batch order.
/// An empty batch plans nothing.
pub fn plan(messages: &[&Message], options: &NotifyOptions) -> Vec<NotificationRequest> {
	if messages.is_empty() {
		return Vec::new();
	}

	if options.merge {
		return vec![NotificationRequest {
			content: batch_content(messages),
			messages: messages.iter().map(|m| m.id()).collect(),
			title: None,
			level: None,
			opts: None,
		}];
	}

	messages
		.iter()
		.map(|m| NotificationRequest {
			content: m.content(),
			messages: vec![m.id()],
			title: m.opts.title.clone(),
			level: Some(m.level),
			opts: Some(m.opts.overrides.clone()),
		})
		.collect()
}
