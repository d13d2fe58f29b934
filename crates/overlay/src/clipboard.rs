//! Copy the mirrored window to the clipboard

use crate::platform::PlatformAdapter;
use crate::state::ThumbnailSurface;
use crate::OverlayResult;
use capture::{CaptureError, CaptureSource, PixelBuffer};

/// Captures the target window's pixels and places them on the clipboard
#[derive(Debug, Default, Clone, Copy)]
pub struct ClipboardCaptureService;

impl ClipboardCaptureService {
    pub fn new() -> Self {
        Self
    }

    /// Copy the current thumbnail to the clipboard.
    ///
    /// Does nothing without a shown thumbnail or a target. Failures are
    /// logged and leave the clipboard untouched.
    pub fn capture(
        &self,
        platform: &mut impl PlatformAdapter,
        surface: &ThumbnailSurface,
        target: Option<&dyn CaptureSource>,
    ) {
        if !surface.showing_thumbnail {
            return;
        }
        let Some(target) = target else {
            return;
        };

        if let Err(e) = Self::copy_to_clipboard(platform, surface, target) {
            log::warn!("Failed to copy to clipboard: {}", e);
        }
    }

    fn copy_to_clipboard(
        platform: &mut impl PlatformAdapter,
        surface: &ThumbnailSurface,
        target: &dyn CaptureSource,
    ) -> OverlayResult<()> {
        let image = Self::capture_image(surface, target)?;
        platform.set_clipboard_image(&image)?;

        log::info!("Copied {}x{} thumbnail to clipboard", image.width, image.height);
        Ok(())
    }

    /// Capture the target, cropped to the active region when there is one
    pub fn capture_image(
        surface: &ThumbnailSurface,
        target: &dyn CaptureSource,
    ) -> OverlayResult<PixelBuffer> {
        let rect = target.screen_rect()?;
        if rect.is_empty() {
            return Err(CaptureError::InvalidSize {
                width: rect.width as i64,
                height: rect.height as i64,
            }
            .into());
        }

        let mut buffer = PixelBuffer::with_size(rect.size());
        target.render_full_content(&mut buffer)?;

        let Some(region) = surface.active_region() else {
            return Ok(buffer);
        };

        let region_rect = region.compute_rect(surface.original_size);
        match region_rect.intersection(&buffer.bounds()) {
            Some(crop) => Ok(buffer.crop(&crop)),
            None => {
                log::debug!("Region {:?} outside captured window, copying all of it", region_rect);
                Ok(buffer)
            }
        }
    }
}
