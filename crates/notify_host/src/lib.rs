//! Pop-up notification host.
//!
//! Clients create records through [`NotifyHost`], receive [`HostEvent`]s as
//! records open and close, and may paint record surfaces themselves by passing a
//! [`RenderFn`] in [`HostOptions`]. [`NotifyService`] is the in-process host.

pub mod config;
pub mod error;
pub mod host;
pub mod render;
pub mod service;
pub mod surface;
pub mod types;

pub use config::HostConfig;
pub use error::HostError;
pub use host::{HostEvent, HostOptions, HostProvider, NotifyHost};
pub use render::{Notification, NotifyHighlights, RenderFn, RendererRegistry};
pub use service::{NotifyService, ServiceProvider, Window};
pub use surface::{Highlight, Surface, WindowSize};
pub use types::{AnimationPhase, DismissOptions, Level, NotifyHandle, Overflow, SurfaceId, Timing, WindowId};
