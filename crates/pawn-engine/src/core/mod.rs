//! Contracts between the runtime loop and the application.
//!
//! The runtime owns the window and the GPU; the application sees them only
//! through the contexts handed to its callbacks.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, StartCtx};
