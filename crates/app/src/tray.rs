//! System tray icon

use windows::core::Result;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NIM_MODIFY,
    NOTIFYICONDATAW,
};
use windows::Win32::UI::WindowsAndMessaging::{LoadIconW, IDI_APPLICATION, WM_USER};

/// Tray icon message
pub const WM_TRAYICON: u32 = WM_USER + 1;

const TOOLTIP: &str = "TopLens";

/// Tray icon giving access to the overlay menu when the window is hard to reach
pub struct SystemTray {
    nid: NOTIFYICONDATAW,
    visible: bool,
}

impl SystemTray {
    pub fn new(hwnd: HWND) -> Self {
        let mut nid = NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: hwnd,
            uID: 1,
            uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP,
            uCallbackMessage: WM_TRAYICON,
            ..Default::default()
        };
        write_tip(&mut nid, TOOLTIP);

        Self {
            nid,
            visible: false,
        }
    }

    pub fn show(&mut self) -> Result<()> {
        if self.visible {
            return Ok(());
        }

        unsafe {
            self.nid.hIcon = LoadIconW(None, IDI_APPLICATION)?;
            Shell_NotifyIconW(NIM_ADD, &self.nid).ok()?;
        }
        self.visible = true;
        Ok(())
    }

    pub fn hide(&mut self) {
        if !self.visible {
            return;
        }

        unsafe {
            let _ = Shell_NotifyIconW(NIM_DELETE, &self.nid);
        }
        self.visible = false;
    }

    /// Tooltip names the mirrored window
    pub fn set_tooltip(&mut self, text: &str) {
        write_tip(&mut self.nid, text);

        if self.visible {
            unsafe {
                let _ = Shell_NotifyIconW(NIM_MODIFY, &self.nid);
            }
        }
    }
}

fn write_tip(nid: &mut NOTIFYICONDATAW, text: &str) {
    let wide: Vec<u16> = text.encode_utf16().collect();
    let len = wide.len().min(nid.szTip.len() - 1);

    nid.szTip = [0; 128];
    nid.szTip[..len].copy_from_slice(&wide[..len]);
}

impl Drop for SystemTray {
    fn drop(&mut self) {
        self.hide();
    }
}
