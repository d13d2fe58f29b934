//! Win32 implementation of the platform adapter

use crate::platform::{PlatformAdapter, TimerId};
use crate::state::{BorderStyle, TransparencyKey, OPAQUE};
use crate::OverlayResult;
use capture::{PixelBuffer, Point, Rect, Size};
use export::ClipboardWriter;
use std::time::{Duration, Instant};
use windows::core::{HSTRING, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HWND, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, InvalidateRect, MonitorFromWindow, MONITORINFO, MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, GetWindowLongPtrW, GetWindowRect, KillTimer, MessageBoxW,
    SetForegroundWindow, SetLayeredWindowAttributes, SetTimer, SetWindowLongPtrW, SetWindowPos,
    GWL_EXSTYLE, GWL_STYLE, HWND_NOTOPMOST, HWND_TOPMOST, IDYES, LWA_ALPHA, LWA_COLORKEY,
    MB_ICONQUESTION, MB_YESNO, SM_CXFRAME, SM_CYFRAME, SWP_FRAMECHANGED, SWP_NOACTIVATE,
    SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, WS_CAPTION, WS_EX_LAYERED, WS_EX_TOOLWINDOW,
    WS_MAXIMIZEBOX, WS_MINIMIZEBOX, WS_POPUP, WS_SYSMENU, WS_THICKFRAME,
};

/// Style bits making up the sizable frame
const CHROME_STYLE: u32 =
    WS_CAPTION.0 | WS_THICKFRAME.0 | WS_SYSMENU.0 | WS_MINIMIZEBOX.0 | WS_MAXIMIZEBOX.0;

/// Platform adapter over a layered top-level window
pub struct Win32Platform {
    hwnd: HWND,
    opacity: f64,
    key: TransparencyKey,
}

impl Win32Platform {
    /// Wrap `hwnd`, making it a fully opaque layered window
    pub fn new(hwnd: HWND) -> Self {
        let platform = Self {
            hwnd,
            opacity: OPAQUE,
            key: TransparencyKey::None,
        };
        platform.apply_layered_attributes();
        platform
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    fn ex_style(&self) -> isize {
        unsafe { GetWindowLongPtrW(self.hwnd, GWL_EXSTYLE) }
    }

    fn set_ex_style(&self, ex_style: isize) {
        unsafe {
            SetWindowLongPtrW(self.hwnd, GWL_EXSTYLE, ex_style);
        }
    }

    /// Opacity and color key share one OS call
    fn apply_layered_attributes(&self) {
        let ex_style = self.ex_style();
        if ex_style & WS_EX_LAYERED.0 as isize == 0 {
            self.set_ex_style(ex_style | WS_EX_LAYERED.0 as isize);
        }

        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (key, flags) = match self.key {
            TransparencyKey::None => (COLORREF(0), LWA_ALPHA),
            TransparencyKey::Color(color) => (COLORREF(color.to_colorref()), LWA_ALPHA | LWA_COLORKEY),
        };

        unsafe {
            if let Err(e) = SetLayeredWindowAttributes(self.hwnd, key, alpha, flags) {
                log::warn!("SetLayeredWindowAttributes failed: {}", e);
            }
        }
    }

    /// Make the system recompute the non-client area
    fn refresh_frame(&self) {
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                None,
                0,
                0,
                0,
                0,
                SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
    }
}

impl PlatformAdapter for Win32Platform {
    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
        self.apply_layered_attributes();
    }

    fn set_transparency_key(&mut self, key: TransparencyKey) {
        self.key = key;
        self.apply_layered_attributes();
    }

    fn border_style(&self) -> BorderStyle {
        let style = unsafe { GetWindowLongPtrW(self.hwnd, GWL_STYLE) } as u32;
        if style & WS_THICKFRAME.0 != 0 {
            BorderStyle::Sizable
        } else {
            BorderStyle::None
        }
    }

    fn set_border_style(&mut self, style: BorderStyle) {
        unsafe {
            let current = GetWindowLongPtrW(self.hwnd, GWL_STYLE) as u32;
            let updated = match style {
                BorderStyle::Sizable => (current & !WS_POPUP.0) | CHROME_STYLE,
                BorderStyle::None => (current & !CHROME_STYLE) | WS_POPUP.0,
            };
            SetWindowLongPtrW(self.hwnd, GWL_STYLE, updated as isize);
        }
        self.refresh_frame();
    }

    fn bounds(&self) -> Rect {
        let mut rect = RECT::default();
        unsafe {
            if GetWindowRect(self.hwnd, &mut rect).is_err() {
                return Rect::default();
            }
        }
        Rect::new(
            rect.left,
            rect.top,
            (rect.right - rect.left).max(0) as u32,
            (rect.bottom - rect.top).max(0) as u32,
        )
    }

    fn set_location(&mut self, location: Point) {
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                None,
                location.x,
                location.y,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
    }

    fn set_topmost(&mut self, topmost: bool) {
        let insert_after = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                insert_after,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            );
        }
    }

    fn activate(&mut self) {
        unsafe {
            let _ = SetForegroundWindow(self.hwnd);
        }
    }

    fn invalidate(&mut self) {
        unsafe {
            let _ = InvalidateRect(self.hwnd, None, true);
        }
    }

    fn work_area(&self) -> Rect {
        unsafe {
            let monitor = MonitorFromWindow(self.hwnd, MONITOR_DEFAULTTONEAREST);
            let mut mi = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };

            if !GetMonitorInfoW(monitor, &mut mi).as_bool() {
                return self.bounds();
            }

            let work = mi.rcWork;
            Rect::new(
                work.left,
                work.top,
                (work.right - work.left).max(0) as u32,
                (work.bottom - work.top).max(0) as u32,
            )
        }
    }

    fn frame_border_thickness(&self) -> Size {
        unsafe {
            Size::new(
                GetSystemMetrics(SM_CXFRAME).max(0) as u32,
                GetSystemMetrics(SM_CYFRAME).max(0) as u32,
            )
        }
    }

    fn cursor_position(&self) -> Point {
        let mut pt = POINT::default();
        unsafe {
            let _ = GetCursorPos(&mut pt);
        }
        Point::new(pt.x, pt.y)
    }

    /// A borderless overlay stays out of the taskbar and Alt+Tab
    fn notify_window_state_changed(&mut self) {
        let ex_style = self.ex_style();
        let tool = WS_EX_TOOLWINDOW.0 as isize;
        let updated = match self.border_style() {
            BorderStyle::None => ex_style | tool,
            BorderStyle::Sizable => ex_style & !tool,
        };

        if updated != ex_style {
            self.set_ex_style(updated);
        }
        self.refresh_frame();
    }

    fn set_clipboard_image(&mut self, image: &PixelBuffer) -> OverlayResult<()> {
        ClipboardWriter::set_image(Some(self.hwnd), image)?;
        Ok(())
    }

    fn start_timer(&mut self, id: TimerId, period: Duration) {
        let elapse = period.as_millis().min(u32::MAX as u128) as u32;
        if unsafe { SetTimer(self.hwnd, id.0, elapse, None) } == 0 {
            log::warn!("SetTimer({}) failed", id.0);
        }
    }

    fn stop_timer(&mut self, id: TimerId) {
        unsafe {
            let _ = KillTimer(self.hwnd, id.0);
        }
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let title = HSTRING::from(title);
        let message = HSTRING::from(message);

        unsafe {
            MessageBoxW(
                self.hwnd,
                PCWSTR(message.as_ptr()),
                PCWSTR(title.as_ptr()),
                MB_YESNO | MB_ICONQUESTION,
            ) == IDYES
        }
    }
}
