//! Overlay context menu

use overlay::ScreenPosition;

const ID_CLICK_FORWARDING: u32 = 2001;
const ID_CLICK_THROUGH: u32 = 2002;
const ID_CHROME: u32 = 2003;
const ID_CONSTRAIN_REGION: u32 = 2004;
const ID_COPY: u32 = 2005;
const ID_LOCK_NONE: u32 = 2010;
const ID_LOCK_BASE: u32 = 2011;
const ID_EXIT: u32 = 2099;
const ID_WINDOW_BASE: u32 = 3000;
const MAX_WINDOWS: usize = 500;

/// Command picked from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ToggleClickForwarding,
    ToggleClickThrough,
    ToggleChrome,
    ToggleConstrainToRegion,
    CopyToClipboard,
    Lock(Option<ScreenPosition>),
    SelectWindow(usize),
    Exit,
}

impl MenuCommand {
    pub fn id(&self) -> u32 {
        match self {
            MenuCommand::ToggleClickForwarding => ID_CLICK_FORWARDING,
            MenuCommand::ToggleClickThrough => ID_CLICK_THROUGH,
            MenuCommand::ToggleChrome => ID_CHROME,
            MenuCommand::ToggleConstrainToRegion => ID_CONSTRAIN_REGION,
            MenuCommand::CopyToClipboard => ID_COPY,
            MenuCommand::Lock(None) => ID_LOCK_NONE,
            MenuCommand::Lock(Some(position)) => {
                let index = ScreenPosition::ALL
                    .iter()
                    .position(|p| p == position)
                    .unwrap_or_default();
                ID_LOCK_BASE + index as u32
            }
            MenuCommand::SelectWindow(index) => ID_WINDOW_BASE + *index as u32,
            MenuCommand::Exit => ID_EXIT,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        let lock_end = ID_LOCK_BASE + ScreenPosition::ALL.len() as u32;

        match id {
            ID_CLICK_FORWARDING => Some(MenuCommand::ToggleClickForwarding),
            ID_CLICK_THROUGH => Some(MenuCommand::ToggleClickThrough),
            ID_CHROME => Some(MenuCommand::ToggleChrome),
            ID_CONSTRAIN_REGION => Some(MenuCommand::ToggleConstrainToRegion),
            ID_COPY => Some(MenuCommand::CopyToClipboard),
            ID_LOCK_NONE => Some(MenuCommand::Lock(None)),
            id if (ID_LOCK_BASE..lock_end).contains(&id) => {
                Some(MenuCommand::Lock(Some(ScreenPosition::ALL[(id - ID_LOCK_BASE) as usize])))
            }
            id if (ID_WINDOW_BASE..ID_WINDOW_BASE + MAX_WINDOWS as u32).contains(&id) => {
                Some(MenuCommand::SelectWindow((id - ID_WINDOW_BASE) as usize))
            }
            ID_EXIT => Some(MenuCommand::Exit),
            _ => None,
        }
    }
}

/// Snapshot of the toggles shown in the menu
#[derive(Debug, Clone, Default)]
pub struct MenuState {
    pub showing_thumbnail: bool,
    pub click_forwarding: bool,
    pub click_through: bool,
    pub chrome_visible: bool,
    pub has_region: bool,
    pub constrain_to_region: bool,
    pub lock: Option<ScreenPosition>,
    pub window_titles: Vec<String>,
}

#[cfg(windows)]
pub use popup::show_context_menu;

#[cfg(windows)]
mod popup {
    use super::{MenuCommand, MenuState, MAX_WINDOWS};
    use overlay::ScreenPosition;
    use windows::core::{w, HSTRING, PCWSTR};
    use windows::Win32::Foundation::{HWND, POINT};
    use windows::Win32::UI::WindowsAndMessaging::{
        AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, SetForegroundWindow,
        TrackPopupMenu, HMENU, MENU_ITEM_FLAGS, MF_CHECKED, MF_GRAYED, MF_POPUP, MF_SEPARATOR,
        MF_STRING, TPM_LEFTALIGN, TPM_RETURNCMD, TPM_RIGHTBUTTON,
    };

    fn item_flags(checked: bool, enabled: bool) -> MENU_ITEM_FLAGS {
        let mut flags = MF_STRING;
        if checked {
            flags = flags | MF_CHECKED;
        }
        if !enabled {
            flags = flags | MF_GRAYED;
        }
        flags
    }

    unsafe fn append(menu: HMENU, flags: MENU_ITEM_FLAGS, command: MenuCommand, text: PCWSTR) {
        let _ = AppendMenuW(menu, flags, command.id() as usize, text);
    }

    /// Show the menu at the cursor and wait for a pick
    pub fn show_context_menu(
        hwnd: HWND,
        state: &MenuState,
    ) -> windows::core::Result<Option<MenuCommand>> {
        unsafe {
            let menu = CreatePopupMenu()?;

            let windows_menu = CreatePopupMenu()?;
            for (index, title) in state.window_titles.iter().take(MAX_WINDOWS).enumerate() {
                let text = HSTRING::from(title.as_str());
                append(
                    windows_menu,
                    MF_STRING,
                    MenuCommand::SelectWindow(index),
                    PCWSTR(text.as_ptr()),
                );
            }
            let _ = AppendMenuW(menu, MF_POPUP, windows_menu.0 as usize, w!("Select window"));
            let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());

            append(
                menu,
                item_flags(state.click_forwarding, true),
                MenuCommand::ToggleClickForwarding,
                w!("Click forwarding"),
            );
            append(
                menu,
                item_flags(state.click_through, true),
                MenuCommand::ToggleClickThrough,
                w!("Click-through"),
            );
            append(
                menu,
                item_flags(state.chrome_visible, state.showing_thumbnail || !state.chrome_visible),
                MenuCommand::ToggleChrome,
                w!("Show window border"),
            );

            let lock_menu = CreatePopupMenu()?;
            append(
                lock_menu,
                item_flags(state.lock.is_none(), true),
                MenuCommand::Lock(None),
                w!("Unlocked"),
            );
            for position in ScreenPosition::ALL {
                let text = HSTRING::from(position.display_text());
                append(
                    lock_menu,
                    item_flags(state.lock == Some(position), true),
                    MenuCommand::Lock(Some(position)),
                    PCWSTR(text.as_ptr()),
                );
            }
            let _ = AppendMenuW(menu, MF_POPUP, lock_menu.0 as usize, w!("Lock position"));

            append(
                menu,
                item_flags(state.constrain_to_region, state.has_region),
                MenuCommand::ToggleConstrainToRegion,
                w!("Constrain to region"),
            );
            append(
                menu,
                item_flags(false, state.showing_thumbnail),
                MenuCommand::CopyToClipboard,
                w!("Copy to clipboard\tCtrl+C"),
            );
            let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
            append(menu, MF_STRING, MenuCommand::Exit, w!("Exit"));

            let mut pt = POINT::default();
            let _ = GetCursorPos(&mut pt);

            // Required for the menu to close when clicking elsewhere
            let _ = SetForegroundWindow(hwnd);
            let picked = TrackPopupMenu(
                menu,
                TPM_LEFTALIGN | TPM_RIGHTBUTTON | TPM_RETURNCMD,
                pt.x,
                pt.y,
                0,
                hwnd,
                None,
            );

            // Destroys the submenus as well
            let _ = DestroyMenu(menu);

            Ok(MenuCommand::from_id(picked.0 as u32))
        }
    }
}
