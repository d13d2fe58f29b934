//! Overlay module for TopLens
//!
//! Interactive behavior of the floating thumbnail window: click forwarding,
//! click-through with hover fade, chrome toggling, position locking and
//! clipboard capture of the mirrored window.

pub mod chrome;
pub mod click_forwarding;
pub mod clipboard;
pub mod platform;
pub mod position_lock;
pub mod state;
pub mod transparency;
#[cfg(windows)]
pub mod win32;

#[cfg(test)]
mod testing;

pub use chrome::ChromeController;
pub use click_forwarding::ClickForwardingGate;
pub use clipboard::ClipboardCaptureService;
pub use platform::{PersistedConfig, PlatformAdapter, TimerId};
pub use position_lock::PositionLockController;
pub use state::{
    BorderStyle, Color, OverlayWindowState, Padding, ScreenPosition, ThumbnailRegion,
    ThumbnailSurface, TransparencyKey,
};
pub use transparency::{HoverFadeTimer, TransparencyController};
#[cfg(windows)]
pub use win32::Win32Platform;

use capture::CaptureError;
use export::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

pub type OverlayResult<T> = Result<T, OverlayError>;
