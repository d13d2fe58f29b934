//! System clipboard output

use crate::{encode_dib, ExportError, ExportResult};
use capture::PixelBuffer;
use windows::Win32::Foundation::{HANDLE, HWND};
use windows::Win32::System::DataExchange::{
    CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData,
};
use windows::Win32::System::Memory::{GlobalAlloc, GlobalFree, GlobalLock, GlobalUnlock, GMEM_MOVEABLE};
use windows::Win32::System::Ole::CF_DIB;

/// Writes images to the system clipboard
pub struct ClipboardWriter;

impl ClipboardWriter {
    /// Replace the clipboard contents with `image`
    pub fn set_image(owner: Option<HWND>, image: &PixelBuffer) -> ExportResult<()> {
        let dib = encode_dib(image)?;

        unsafe {
            let hmem = GlobalAlloc(GMEM_MOVEABLE, dib.len())?;

            let ptr = GlobalLock(hmem) as *mut u8;
            if ptr.is_null() {
                let _ = GlobalFree(hmem);
                return Err(ExportError::ClipboardUnavailable("GlobalLock failed".into()));
            }
            std::ptr::copy_nonoverlapping(dib.as_ptr(), ptr, dib.len());
            let _ = GlobalUnlock(hmem);

            let _guard = match OpenGuard::open(owner) {
                Ok(guard) => guard,
                Err(e) => {
                    let _ = GlobalFree(hmem);
                    return Err(e);
                }
            };

            if let Err(e) = EmptyClipboard() {
                let _ = GlobalFree(hmem);
                return Err(e.into());
            }

            // The clipboard owns the memory once this succeeds
            if let Err(e) = SetClipboardData(CF_DIB.0 as u32, HANDLE(hmem.0)) {
                let _ = GlobalFree(hmem);
                return Err(e.into());
            }
        }

        log::debug!("Placed {}x{} image on clipboard", image.width, image.height);
        Ok(())
    }
}

/// Keeps the clipboard open until dropped
struct OpenGuard;

impl OpenGuard {
    unsafe fn open(owner: Option<HWND>) -> ExportResult<Self> {
        OpenClipboard(owner.unwrap_or_default())
            .map_err(|e| ExportError::ClipboardUnavailable(e.to_string()))?;
        Ok(Self)
    }
}

impl Drop for OpenGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseClipboard();
        }
    }
}
