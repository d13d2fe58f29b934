//! Full-content capture of top-level windows using GDI

use crate::{CaptureError, CaptureResult, CaptureSource, PixelBuffer, Rect};
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT};
use windows::Win32::Graphics::Dwm::{DwmGetWindowAttribute, DWMWA_CLOAKED};
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
    ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HBITMAP,
    HDC, HGDIOBJ,
};
use windows::Win32::Storage::Xps::{PrintWindow, PRINT_WINDOW_FLAGS};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetAncestor, GetWindow, GetWindowLongW, GetWindowRect, GetWindowTextW,
    IsWindow, IsWindowVisible, GA_ROOT, GWL_EXSTYLE, GWL_STYLE, GW_OWNER, WS_DISABLED,
    WS_EX_TOOLWINDOW,
};

/// Renders DirectComposition and other off-screen content as well
const PW_RENDERFULLCONTENT: PRINT_WINDOW_FLAGS = PRINT_WINDOW_FLAGS(2);

/// Weak reference to a top-level window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowTarget {
    hwnd: isize,
}

impl WindowTarget {
    pub fn new(hwnd: isize) -> Self {
        Self { hwnd }
    }

    pub fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut std::ffi::c_void)
    }

    /// Whether the window still exists
    pub fn is_alive(&self) -> bool {
        unsafe { IsWindow(self.hwnd()).as_bool() }
    }
}

impl CaptureSource for WindowTarget {
    fn screen_rect(&self) -> CaptureResult<Rect> {
        if !self.is_alive() {
            return Err(CaptureError::TargetGone);
        }

        let mut rect = RECT::default();
        unsafe {
            GetWindowRect(self.hwnd(), &mut rect)?;
        }

        Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom)
    }

    fn render_full_content(&self, buffer: &mut PixelBuffer) -> CaptureResult<()> {
        if !self.is_alive() {
            return Err(CaptureError::TargetGone);
        }

        let width = buffer.width as i32;
        let height = buffer.height as i32;

        unsafe {
            let surface = RenderSurface::new(width, height)?;

            if !PrintWindow(self.hwnd(), surface.mem_dc, PW_RENDERFULLCONTENT).as_bool() {
                return Err(CaptureError::RenderFailed);
            }

            let mut bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    biHeight: -height, // Top-down DIB
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    biSizeImage: 0,
                    biXPelsPerMeter: 0,
                    biYPelsPerMeter: 0,
                    biClrUsed: 0,
                    biClrImportant: 0,
                },
                bmiColors: [Default::default()],
            };

            let lines = GetDIBits(
                surface.mem_dc,
                surface.bitmap,
                0,
                height as u32,
                Some(buffer.data.as_mut_ptr() as *mut _),
                &mut bmi,
                DIB_RGB_COLORS,
            );

            if lines == 0 {
                return Err(CaptureError::RenderFailed);
            }
        }

        log::debug!("Rendered {}x{} from window {:#x}", width, height, self.hwnd);
        Ok(())
    }
}

/// Memory DC with a selected bitmap, released on drop
struct RenderSurface {
    screen_dc: HDC,
    mem_dc: HDC,
    bitmap: HBITMAP,
    old_bitmap: HGDIOBJ,
}

impl RenderSurface {
    unsafe fn new(width: i32, height: i32) -> CaptureResult<Self> {
        let screen_dc = GetDC(None);
        if screen_dc.is_invalid() {
            return Err(CaptureError::RenderFailed);
        }

        let mem_dc = CreateCompatibleDC(screen_dc);
        let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
        let old_bitmap = SelectObject(mem_dc, bitmap);

        let surface = Self {
            screen_dc,
            mem_dc,
            bitmap,
            old_bitmap,
        };

        if surface.mem_dc.is_invalid() || surface.bitmap.is_invalid() {
            return Err(CaptureError::RenderFailed);
        }

        Ok(surface)
    }
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        unsafe {
            if !self.mem_dc.is_invalid() {
                SelectObject(self.mem_dc, self.old_bitmap);
                let _ = DeleteDC(self.mem_dc);
            }
            if !self.bitmap.is_invalid() {
                let _ = DeleteObject(self.bitmap);
            }
            ReleaseDC(None, self.screen_dc);
        }
    }
}

/// Window information for the window picker
#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub hwnd: isize,
    pub rect: Rect,
    pub title: String,
}

/// Enumerate titled top-level windows in Z-order
pub fn enumerate_windows() -> Vec<WindowInfo> {
    let mut windows = Vec::new();

    unsafe {
        let _ = EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut windows as *mut Vec<WindowInfo> as isize),
        );
    }

    windows
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = &mut *(lparam.0 as *mut Vec<WindowInfo>);

    if should_include_window(hwnd) {
        if let Some(info) = get_window_info(hwnd) {
            windows.push(info);
        }
    }

    BOOL(1) // Continue enumeration
}

unsafe fn should_include_window(hwnd: HWND) -> bool {
    if !IsWindowVisible(hwnd).as_bool() {
        return false;
    }

    let style = GetWindowLongW(hwnd, GWL_STYLE) as u32;
    if style & WS_DISABLED.0 != 0 {
        return false;
    }

    let ex_style = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32;
    if ex_style & WS_EX_TOOLWINDOW.0 != 0 {
        return false;
    }

    // Windows on other virtual desktops are cloaked
    let mut cloaked: u32 = 0;
    if DwmGetWindowAttribute(
        hwnd,
        DWMWA_CLOAKED,
        &mut cloaked as *mut _ as *mut _,
        std::mem::size_of::<u32>() as u32,
    ).is_ok() && cloaked != 0 {
        return false;
    }

    if let Ok(owner) = GetWindow(hwnd, GW_OWNER) {
        if !owner.is_invalid() {
            return false;
        }
    }

    GetAncestor(hwnd, GA_ROOT) == hwnd
}

unsafe fn get_window_info(hwnd: HWND) -> Option<WindowInfo> {
    let mut rect = RECT::default();
    if GetWindowRect(hwnd, &mut rect).is_err() {
        return None;
    }
    let rect = Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom).ok()?;

    let mut title_buf = [0u16; 256];
    let len = GetWindowTextW(hwnd, &mut title_buf);
    if len <= 0 {
        return None;
    }
    let title = OsString::from_wide(&title_buf[..len as usize])
        .to_string_lossy()
        .into_owned();

    Some(WindowInfo {
        hwnd: hwnd.0 as isize,
        rect,
        title,
    })
}
