//! Export module for TopLens
//!
//! Encodes captured pixels as device-independent bitmaps and places them on
//! the system clipboard.

mod dib;
#[cfg(windows)]
mod clipboard;

pub use dib::{encode_dib, BITMAP_INFO_HEADER_SIZE};
#[cfg(windows)]
pub use clipboard::ClipboardWriter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Image is empty")]
    EmptyImage,

    #[error("Image too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },
}

pub type ExportResult<T> = Result<T, ExportError>;
