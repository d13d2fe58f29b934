//! Screen position locking

use crate::platform::PlatformAdapter;
use crate::state::ScreenPosition;

/// Pins the window to a screen anchor
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionLockController {
    lock: Option<ScreenPosition>,
}

impl PositionLockController {
    pub fn new() -> Self {
        Self { lock: None }
    }

    pub fn lock(&self) -> Option<ScreenPosition> {
        self.lock
    }

    /// Store an anchor and move there, or clear the lock without moving
    pub fn set_lock(&mut self, platform: &mut impl PlatformAdapter, lock: Option<ScreenPosition>) {
        if let Some(position) = lock {
            Self::move_to(platform, position);
            log::info!("Position locked to {:?}", position);
        } else if self.lock.is_some() {
            log::info!("Position lock released");
        }

        self.lock = lock;
    }

    /// Re-apply the stored anchor; safe to call at any time
    pub fn refresh(&self, platform: &mut impl PlatformAdapter) {
        if let Some(position) = self.lock {
            Self::move_to(platform, position);
        }
    }

    fn move_to(platform: &mut impl PlatformAdapter, position: ScreenPosition) {
        let size = platform.bounds().size();
        let location = position.resolve(size, platform.work_area());
        platform.set_location(location);
    }
}
