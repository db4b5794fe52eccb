//! Render callback the view hands to the host.
//!
//! The host invokes the callback at paint time. The pipeline resolves the
//! renderer, tags the surface, highlights the message lines inside the
//! decorated output, and requests a window size. Every failure is contained:
//! the host paint cycle only ever sees `Ok`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{trace, warn};
use xeno_notify_host::{HostConfig, HostError, Notification, NotifyHighlights, RenderFn, Surface};

use crate::config::RenderSpec;
use crate::error::{NotifyViewError, Result};
use crate::locate::locate;
use crate::message::Message;
use crate::sizing::size;

/// Tag marking surfaces painted by this view.
pub const NOTIFY_TAG: &str = "notify";

/// Render state bound to one notification request.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
	render: Option<RenderSpec>,
	content: Option<String>,
	messages: Vec<Message>,
}

impl RenderPipeline {
	/// Binds a render override, the known content, and the request's messages.
	pub fn new(render: Option<RenderSpec>, content: Option<String>, messages: Vec<Message>) -> Self {
		Self { render, content, messages }
	}

	/// Paints `surface`, propagating any renderer or highlighting failure.
	pub fn render(&self, surface: &mut Surface, notif: &Notification, hl: &NotifyHighlights, config: &HostConfig) -> Result<()> {
		let spec = self.render.clone().unwrap_or_else(|| RenderSpec::named(config.render()));
		match spec {
			RenderSpec::CustomRenderer(render) => render(surface, notif, hl, config)?,
			RenderSpec::NamedRenderer(name) => {
				let render = config.renderers().get(&name).ok_or(NotifyViewError::UnknownRenderer(name))?;
				render(surface, notif, hl, config)?;
			}
			RenderSpec::Plain => self.render_plain(surface, notif),
		}

		surface.tag(NOTIFY_TAG);

		let lines = surface.lines().to_vec();
		match locate(&lines, self.content.as_deref()) {
			Some(offset) => highlight(surface, offset, &self.messages),
			None => trace!(handle = notif.handle.0, "content not found in rendered output, skipping highlights"),
		}

		if surface.is_visible() {
			let (width, height) = size(&lines, config.minimum_width(), config.max_width(), config.max_height());
			surface.request_size(width, height);
		}
		Ok(())
	}

	/// Wraps the pipeline in a [`RenderFn`] whose failures are logged and blank the surface.
	pub fn into_render_fn(self) -> RenderFn {
		Arc::new(move |surface: &mut Surface, notif: &Notification, hl: &NotifyHighlights, config: &HostConfig| -> std::result::Result<(), HostError> {
			protect(surface, |surface| self.render(surface, notif, hl, config));
			Ok(())
		})
	}

	/// Writes message lines without decoration.
	fn render_plain(&self, surface: &mut Surface, notif: &Notification) {
		if self.messages.is_empty() {
			surface.set_lines(notif.message.iter().map(String::as_str));
			return;
		}
		surface.set_lines(self.messages.iter().flat_map(|m| m.lines.iter().map(|l| l.text())));
	}
}

/// Applies chunk highlights of `messages`, whose first line is rendered at `offset`.
///
/// Lines past the end of the surface are skipped. Each message line is found
/// within its surface line so renderers that prefix the first body line still
/// get column-accurate highlights.
fn highlight(surface: &mut Surface, offset: usize, messages: &[Message]) {
	let message_lines = messages.iter().flat_map(|m| m.lines.iter());
	for (index, line) in (offset..surface.line_count()).zip(message_lines) {
		let base = line_base(&surface.lines()[index], &line.text());
		let mut col = base;
		for chunk in &line.chunks {
			let end = col + chunk.text.len();
			if let Some(group) = &chunk.hl_group {
				surface.add_highlight(index, col, Some(end), group.as_str());
			}
			col = end;
		}
	}
}

/// Column at which `text` starts within a rendered line.
///
/// Body text sits after any decoration prefix, so a suffix match wins over an
/// earlier occurrence inside the prefix.
fn line_base(rendered: &str, text: &str) -> usize {
	if rendered.ends_with(text) {
		rendered.len() - text.len()
	} else {
		rendered.find(text).unwrap_or(0)
	}
}

/// Runs `render` and converts an error or panic into a logged blank surface.
pub(crate) fn protect<F>(surface: &mut Surface, render: F)
where
	F: FnOnce(&mut Surface) -> Result<()>,
{
	let error = match panic::catch_unwind(AssertUnwindSafe(|| render(&mut *surface))) {
		Ok(Ok(())) => return,
		Ok(Err(error)) => error,
		Err(payload) => NotifyViewError::RenderPanic(panic_message(payload.as_ref())),
	};
	warn!(surface = surface.id().0, %error, "notify render failed");
	surface.clear();
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic".to_string()
	}
}
