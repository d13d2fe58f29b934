//! Overlay window host

use crate::layout;
use crate::menu::{show_context_menu, MenuCommand, MenuState};
use crate::settings::Settings;
use crate::thumbnail::DwmThumbnail;
use crate::tray::{SystemTray, WM_TRAYICON};
use capture::{enumerate_windows, CaptureSource, Point, Rect, Size, WindowInfo, WindowTarget};
use overlay::{
    BorderStyle, ChromeController, ClickForwardingGate, ClipboardCaptureService, PlatformAdapter,
    PositionLockController, ThumbnailSurface, TimerId, TransparencyController, TransparencyKey,
    Win32Platform,
};
use std::cell::RefCell;
use std::time::Duration;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, EndPaint, ScreenToClient, SetBkMode, SetTextColor, TextOutW,
    UpdateWindow, PAINTSTRUCT, TRANSPARENT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetKeyState, ReleaseCapture, VK_C, VK_CONTROL};
use windows::Win32::UI::WindowsAndMessaging::*;

/// Polls the cursor while click-through keeps mouse input away from the window
const HOVER_POLL_TIMER: TimerId = TimerId(2);
const HOVER_POLL_PERIOD: Duration = Duration::from_millis(250);

/// Follows target resizes and notices when the target closes
const TARGET_WATCH_TIMER: TimerId = TimerId(3);
const TARGET_WATCH_PERIOD: Duration = Duration::from_millis(1000);

const MK_LBUTTON: usize = 0x0001;

const HINT_TEXT: &str = "Right-click to pick a window";

thread_local! {
    static HOST: RefCell<Option<HostState>> = const { RefCell::new(None) };
}

/// Run `f` against the host state.
///
/// Returns `None` while the state is already borrowed, which happens when a
/// Win32 call made from inside `f` sends a message back to the window.
fn with_state<R>(f: impl FnOnce(&mut HostState) -> R) -> Option<R> {
    HOST.with(|host| {
        let mut host = host.try_borrow_mut().ok()?;
        host.as_mut().map(f)
    })
}

fn loword(value: isize) -> i32 {
    (value & 0xFFFF) as i16 as i32
}

fn hiword(value: isize) -> i32 {
    ((value >> 16) & 0xFFFF) as i16 as i32
}

fn make_lparam(x: i32, y: i32) -> LPARAM {
    LPARAM((((y as u16 as u32) << 16) | x as u16 as u32) as isize)
}

struct HostState {
    platform: Win32Platform,
    settings: Settings,
    surface: ThumbnailSurface,
    thumbnail: Option<DwmThumbnail>,
    target: Option<WindowTarget>,
    /// Windows listed in the last menu, indexed by `MenuCommand::SelectWindow`
    windows: Vec<WindowInfo>,
    /// Where the thumbnail is drawn, in client pixels
    thumbnail_dest: Rect,
    /// What the thumbnail shows, in target window pixels
    thumbnail_source: Rect,
    transparency: TransparencyController,
    chrome: ChromeController,
    position_lock: PositionLockController,
    click_forwarding: ClickForwardingGate,
    clipboard: ClipboardCaptureService,
    tray: Option<SystemTray>,
}

impl HostState {
    fn hwnd(&self) -> HWND {
        self.platform.hwnd()
    }

    fn client_size(&self) -> Size {
        let mut rect = RECT::default();
        unsafe {
            if GetClientRect(self.hwnd(), &mut rect).is_err() {
                return Size::default();
            }
        }
        Size::new((rect.right - rect.left).max(0) as u32, (rect.bottom - rect.top).max(0) as u32)
    }

    fn set_target(&mut self, info: WindowInfo) {
        // Only one thumbnail may be registered at a time
        self.thumbnail = None;

        let target = WindowTarget::new(info.hwnd);
        match DwmThumbnail::register(self.hwnd(), target.hwnd()) {
            Ok(thumbnail) => {
                self.surface.original_size = thumbnail.source_size().unwrap_or(info.rect.size());
                self.surface.showing_thumbnail = true;
                self.thumbnail = Some(thumbnail);
                self.target = Some(target);

                if let Some(tray) = self.tray.as_mut() {
                    tray.set_tooltip(&format!("TopLens - {}", info.title));
                }
                log::info!(
                    "Mirroring \"{}\" ({}x{})",
                    info.title,
                    info.rect.width,
                    info.rect.height
                );
            }
            Err(e) => {
                log::warn!("Failed to mirror \"{}\": {}", info.title, e);
                self.clear_target();
            }
        }

        self.update_thumbnail();
        self.platform.invalidate();
    }

    fn clear_target(&mut self) {
        self.thumbnail = None;
        self.target = None;
        self.surface.showing_thumbnail = false;

        // A borderless empty overlay could not be found again
        self.chrome.set_chrome_visible(&mut self.platform, &self.surface, true);

        if let Some(tray) = self.tray.as_mut() {
            tray.set_tooltip("TopLens");
        }
        self.platform.invalidate();
    }

    /// Fit the thumbnail to the client area, showing the region when constrained
    fn update_thumbnail(&mut self) {
        if let Some(target) = self.target {
            if !target.is_alive() {
                log::info!("Mirrored window closed");
                self.clear_target();
                return;
            }
        }

        let Some(thumbnail) = self.thumbnail.as_ref() else {
            return;
        };
        if let Ok(size) = thumbnail.source_size() {
            self.surface.original_size = size;
        }

        let original = self.surface.original_size;
        let full = Rect::new(0, 0, original.width, original.height);
        let source = self
            .surface
            .active_region()
            .and_then(|region| region.compute_rect(original).intersection(&full))
            .unwrap_or(full);

        let dest = layout::fit(source.size(), self.client_size());
        let clip = (source != full).then_some(source);

        if let Err(e) = thumbnail.update(dest, clip) {
            log::warn!("Failed to update thumbnail: {}", e);
        }
        log::debug!("Thumbnail {:?} -> {:?}", source, dest);

        self.thumbnail_dest = dest;
        self.thumbnail_source = source;
    }

    /// Replay a left click on the thumbnail as a click on the target
    fn forward_click(&self, client: Point) {
        let Some(target) = self.target else {
            return;
        };
        let Some(source) =
            layout::map_to_source(client, self.thumbnail_dest, self.thumbnail_source)
        else {
            return;
        };
        let window_rect = match target.screen_rect() {
            Ok(rect) => rect,
            Err(e) => {
                log::warn!("Cannot forward click: {}", e);
                return;
            }
        };

        let mut pt = POINT {
            x: window_rect.x + source.x,
            y: window_rect.y + source.y,
        };

        unsafe {
            if !ScreenToClient(target.hwnd(), &mut pt).as_bool() {
                return;
            }

            let lparam = make_lparam(pt.x, pt.y);
            let _ = PostMessageW(target.hwnd(), WM_LBUTTONDOWN, WPARAM(MK_LBUTTON), lparam);
            let _ = PostMessageW(target.hwnd(), WM_LBUTTONUP, WPARAM(0), lparam);
        }
        log::debug!("Forwarded click at ({}, {})", pt.x, pt.y);
    }

    fn copy_to_clipboard(&mut self) {
        let target = self.target.as_ref().map(|t| t as &dyn CaptureSource);
        self.clipboard.capture(&mut self.platform, &self.surface, target);
    }

    fn poll_hover(&mut self) {
        if !self.transparency.is_click_through() {
            return;
        }
        if self.platform.bounds().contains_point(self.platform.cursor_position()) {
            self.transparency.notify_hover(&mut self.platform);
        }
    }

    fn menu_state(&mut self) -> MenuState {
        let own = self.hwnd().0 as isize;
        self.windows = enumerate_windows()
            .into_iter()
            .filter(|w| w.hwnd != own)
            .collect();

        MenuState {
            showing_thumbnail: self.surface.showing_thumbnail,
            click_forwarding: self.click_forwarding.is_enabled(&self.surface),
            click_through: self.transparency.is_click_through(),
            chrome_visible: self.chrome.is_chrome_visible(&self.platform),
            has_region: self.surface.selected_region.is_some(),
            constrain_to_region: self.surface.constrain_to_region,
            lock: self.position_lock.lock(),
            window_titles: self.windows.iter().map(|w| w.title.clone()).collect(),
        }
    }

    fn execute(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::ToggleClickForwarding => {
                let enable = !self.click_forwarding.is_enabled(&self.surface);
                self.click_forwarding.set_enabled(
                    enable,
                    &mut self.platform,
                    &mut self.settings,
                    &mut self.surface,
                );
            }
            MenuCommand::ToggleClickThrough => {
                let enable = !self.transparency.is_click_through();
                self.transparency.set_click_through(&mut self.platform, enable);
                if enable {
                    self.platform.start_timer(HOVER_POLL_TIMER, HOVER_POLL_PERIOD);
                } else {
                    self.platform.stop_timer(HOVER_POLL_TIMER);
                }
            }
            MenuCommand::ToggleChrome => {
                let visible = !self.chrome.is_chrome_visible(&self.platform);
                self.chrome.set_chrome_visible(&mut self.platform, &self.surface, visible);
                self.update_thumbnail();
            }
            MenuCommand::ToggleConstrainToRegion => {
                self.surface.constrain_to_region = !self.surface.constrain_to_region;
                self.settings.constrain_to_region = self.surface.constrain_to_region;
                self.settings.save_or_log();
                self.update_thumbnail();
            }
            MenuCommand::CopyToClipboard => self.copy_to_clipboard(),
            MenuCommand::Lock(lock) => {
                self.position_lock.set_lock(&mut self.platform, lock);
                self.settings.position_lock = lock;
                self.settings.save_or_log();
            }
            MenuCommand::SelectWindow(index) => {
                if let Some(info) = self.windows.get(index).cloned() {
                    self.set_target(info);
                }
            }
            // Handled by the window procedure
            MenuCommand::Exit => {}
        }
    }

    fn shutdown(&mut self) {
        self.transparency.dispose(&mut self.platform);
        self.platform.stop_timer(HOVER_POLL_TIMER);
        self.platform.stop_timer(TARGET_WATCH_TIMER);
        self.thumbnail = None;
        self.tray = None;

        let bounds = self.platform.bounds();
        if !bounds.is_empty() {
            self.settings.window_size = [bounds.width, bounds.height];
        }
        self.settings.save_or_log();
    }
}

/// Floating overlay window
pub struct OverlayHost {
    hwnd: HWND,
}

impl OverlayHost {
    const CLASS_NAME: PCWSTR = w!("TopLensOverlay");

    /// Create the overlay window and its controllers
    pub fn create(settings: Settings) -> anyhow::Result<Self> {
        let hwnd = unsafe {
            let hmodule = GetModuleHandleW(None)?;
            let hinstance = HINSTANCE(hmodule.0);

            // Black is the click-through key, so the empty background passes input
            let bg_brush = CreateSolidBrush(COLORREF(0));

            let wc = WNDCLASSEXW {
                cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(Self::wnd_proc),
                hInstance: hinstance,
                hIcon: LoadIconW(None, IDI_APPLICATION)?,
                hCursor: LoadCursorW(None, IDC_ARROW)?,
                hbrBackground: bg_brush,
                lpszClassName: Self::CLASS_NAME,
                ..Default::default()
            };

            if RegisterClassExW(&wc) == 0 {
                anyhow::bail!(
                    "Failed to register window class: {}",
                    windows::core::Error::from_win32()
                );
            }

            let [width, height] = settings.window_size;
            CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_LAYERED,
                Self::CLASS_NAME,
                w!("TopLens"),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                width as i32,
                height as i32,
                HWND::default(),
                HMENU::default(),
                hinstance,
                None,
            )?
        };

        let mut platform = Win32Platform::new(hwnd);
        platform.start_timer(TARGET_WATCH_TIMER, TARGET_WATCH_PERIOD);

        let mut position_lock = PositionLockController::new();
        position_lock.set_lock(&mut platform, settings.position_lock);

        let surface = ThumbnailSurface {
            selected_region: settings.region,
            constrain_to_region: settings.constrain_to_region,
            ..Default::default()
        };

        let mut tray = SystemTray::new(hwnd);
        if let Err(e) = tray.show() {
            log::warn!("Failed to show tray icon: {}", e);
        }

        let state = HostState {
            platform,
            settings,
            surface,
            thumbnail: None,
            target: None,
            windows: Vec::new(),
            thumbnail_dest: Rect::default(),
            thumbnail_source: Rect::default(),
            transparency: TransparencyController::new(TransparencyKey::None),
            chrome: ChromeController::new(BorderStyle::Sizable),
            position_lock,
            click_forwarding: ClickForwardingGate::new(),
            clipboard: ClipboardCaptureService::new(),
            tray: Some(tray),
        };
        HOST.with(|host| *host.borrow_mut() = Some(state));

        log::info!("Overlay window created");
        Ok(Self { hwnd })
    }

    pub fn show(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOW);
            let _ = UpdateWindow(self.hwnd);
        }
    }

    /// Run message loop
    pub fn run_message_loop() -> i32 {
        unsafe {
            let mut msg = MSG::default();
            while GetMessageW(&mut msg, None, 0, 0).into() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
            msg.wParam.0 as i32
        }
    }

    unsafe extern "system" fn wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_PAINT => {
                Self::on_paint(hwnd);
                LRESULT(0)
            }

            WM_TIMER => {
                let id = TimerId(wparam.0);
                let handled = with_state(|s| {
                    if id == overlay::transparency::HOVER_FADE_TIMER {
                        s.transparency.on_timer_tick(&mut s.platform);
                    } else if id == HOVER_POLL_TIMER {
                        s.poll_hover();
                    } else if id == TARGET_WATCH_TIMER {
                        s.update_thumbnail();
                    }
                });
                if handled.is_some() {
                    LRESULT(0)
                } else {
                    DefWindowProcW(hwnd, msg, wparam, lparam)
                }
            }

            WM_SIZE => {
                with_state(|s| s.update_thumbnail());
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }

            WM_EXITSIZEMOVE => {
                // A locked window snaps back after being dragged
                with_state(|s| s.position_lock.refresh(&mut s.platform));
                LRESULT(0)
            }

            WM_DISPLAYCHANGE | WM_SETTINGCHANGE => {
                with_state(|s| s.position_lock.refresh(&mut s.platform));
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }

            WM_LBUTTONDOWN => {
                let forwarding = with_state(|s| s.surface.report_clicks).unwrap_or(false);
                if !forwarding {
                    // Drag the window by its body
                    let _ = ReleaseCapture();
                    SendMessageW(hwnd, WM_NCLBUTTONDOWN, WPARAM(HTCAPTION as usize), LPARAM(0));
                }
                LRESULT(0)
            }

            WM_LBUTTONUP => {
                let point = Point::new(loword(lparam.0), hiword(lparam.0));
                with_state(|s| {
                    if s.surface.report_clicks {
                        s.forward_click(point);
                    }
                });
                LRESULT(0)
            }

            WM_KEYDOWN => {
                if wparam.0 == VK_C.0 as usize && GetKeyState(VK_CONTROL.0 as i32) < 0 {
                    with_state(|s| s.copy_to_clipboard());
                    return LRESULT(0);
                }
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }

            WM_CONTEXTMENU => {
                Self::on_context_menu(hwnd);
                LRESULT(0)
            }

            WM_TRAYICON => {
                let event = (lparam.0 & 0xFFFF) as u32;
                if event == WM_RBUTTONUP || event == WM_LBUTTONUP {
                    Self::on_context_menu(hwnd);
                }
                LRESULT(0)
            }

            WM_DESTROY => {
                with_state(|s| s.shutdown());
                HOST.with(|host| {
                    if let Ok(mut host) = host.try_borrow_mut() {
                        *host = None;
                    }
                });
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    /// The menu loop runs outside any state borrow
    unsafe fn on_context_menu(hwnd: HWND) {
        let Some(menu_state) = with_state(|s| s.menu_state()) else {
            return;
        };

        match show_context_menu(hwnd, &menu_state) {
            Ok(Some(MenuCommand::Exit)) => {
                let _ = DestroyWindow(hwnd);
            }
            Ok(Some(command)) => {
                log::debug!("Menu command {:?}", command);
                with_state(|s| s.execute(command));
            }
            Ok(None) => {}
            Err(e) => log::warn!("Failed to show menu: {}", e),
        }
    }

    unsafe fn on_paint(hwnd: HWND) {
        let mut ps = PAINTSTRUCT::default();
        let hdc = BeginPaint(hwnd, &mut ps);

        let showing = with_state(|s| s.surface.showing_thumbnail).unwrap_or(true);
        if !showing {
            let text: Vec<u16> = HINT_TEXT.encode_utf16().collect();
            SetBkMode(hdc, TRANSPARENT);
            SetTextColor(hdc, COLORREF(0x00CCCCCC));
            let _ = TextOutW(hdc, 12, 12, &text);
        }

        let _ = EndPaint(hwnd, &ps);
    }
}
