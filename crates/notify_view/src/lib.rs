//! Notification view for the message pipeline.
//!
//! Projects batches of [`Message`]s onto a pop-up notification host. A batch is
//! either merged into one notification that replaces the previous one, or split
//! into one notification per message. The view paints each notification through
//! a [`RenderPipeline`] that highlights the message lines inside the host's
//! decoration, and keeps each message's `notify_id` pointing at the notification
//! showing it until that notification closes.
//!
//! The view is single-threaded and driven by the UI loop: call
//! [`NotifyView::show`] when messages arrive and [`NotifyView::pump`] on each
//! turn after the host has advanced.

pub mod config;
pub mod deferred;
pub mod error;
pub mod locate;
pub mod message;
pub mod plan;
pub mod render;
pub mod sizing;
pub mod view;

pub use config::{CallbackRegistry, CallbackSpec, NotifyCallback, NotifyOptions, NotifyOptionsConfig, RenderSpec, RequestOverrides};
pub use deferred::{CALLBACK_DELAY, DeferredCallback, DeferredQueue};
pub use error::{NotifyViewError, Result};
pub use locate::locate;
pub use message::{Chunk, Message, MessageId, MessageLine, MessageLookup, MessageOpts, MessageStore, batch_content};
pub use plan::{NotificationRequest, plan};
pub use render::{NOTIFY_TAG, RenderPipeline};
pub use sizing::size;
pub use view::{AdapterState, NotifyView};
