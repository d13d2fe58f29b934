//! TopLens - keeps a live thumbnail of any window on top

#![windows_subsystem = "windows"]
#![cfg_attr(not(windows), allow(dead_code))]

mod layout;
mod menu;
mod settings;

#[cfg(windows)]
mod host;
#[cfg(windows)]
mod thumbnail;
#[cfg(windows)]
mod tray;

use crate::settings::Settings;

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use crate::host::OverlayHost;
    use windows::Win32::UI::HiDpi::{
        SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Set DPI awareness
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let settings = Settings::load(Settings::default_path());

    let host = match OverlayHost::create(settings) {
        Ok(host) => host,
        Err(e) => {
            log::error!("Failed to create overlay window: {}", e);
            return Err(e);
        }
    };
    host.show();

    let code = OverlayHost::run_message_loop();
    log::info!("Exiting with code {}", code);
    Ok(())
}

#[cfg(not(windows))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load(Settings::default_path());
    log::debug!("Loaded settings: {:?}", settings);

    anyhow::bail!("TopLens requires Windows")
}
