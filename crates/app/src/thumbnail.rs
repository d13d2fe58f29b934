//! Live DWM thumbnail of the mirrored window

use capture::{Rect, Size};
use windows::core::Result;
use windows::Win32::Foundation::{BOOL, HWND, RECT};
use windows::Win32::Graphics::Dwm::{
    DwmQueryThumbnailSourceSize, DwmRegisterThumbnail, DwmUnregisterThumbnail,
    DwmUpdateThumbnailProperties, DWM_THUMBNAIL_PROPERTIES, DWM_TNP_OPACITY,
    DWM_TNP_RECTDESTINATION, DWM_TNP_RECTSOURCE, DWM_TNP_SOURCECLIENTAREAONLY, DWM_TNP_VISIBLE,
};

/// Registered thumbnail; unregistered on drop
pub struct DwmThumbnail {
    handle: isize,
}

impl DwmThumbnail {
    pub fn register(dest: HWND, source: HWND) -> Result<Self> {
        let handle = unsafe { DwmRegisterThumbnail(dest, source)? };
        log::debug!("Registered thumbnail {:#x}", handle);
        Ok(Self { handle })
    }

    /// Size of the source window as the compositor sees it
    pub fn source_size(&self) -> Result<Size> {
        let size = unsafe { DwmQueryThumbnailSourceSize(self.handle)? };
        Ok(Size::new(size.cx.max(0) as u32, size.cy.max(0) as u32))
    }

    /// Draw `source` (or the whole window) into `dest`, both in client pixels
    pub fn update(&self, dest: Rect, source: Option<Rect>) -> Result<()> {
        let mut props = DWM_THUMBNAIL_PROPERTIES {
            dwFlags: DWM_TNP_RECTDESTINATION
                | DWM_TNP_VISIBLE
                | DWM_TNP_OPACITY
                | DWM_TNP_SOURCECLIENTAREAONLY,
            rcDestination: to_win32(dest),
            opacity: 255,
            fVisible: BOOL::from(true),
            fSourceClientAreaOnly: BOOL::from(false),
            ..Default::default()
        };

        if let Some(source) = source {
            props.dwFlags |= DWM_TNP_RECTSOURCE;
            props.rcSource = to_win32(source);
        }

        unsafe { DwmUpdateThumbnailProperties(self.handle, &props) }
    }
}

impl Drop for DwmThumbnail {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = DwmUnregisterThumbnail(self.handle) {
                log::warn!("Failed to unregister thumbnail: {}", e);
            }
        }
    }
}

fn to_win32(rect: Rect) -> RECT {
    RECT {
        left: rect.x,
        top: rect.y,
        right: rect.right(),
        bottom: rect.bottom(),
    }
}
