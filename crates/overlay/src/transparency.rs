//! Click-through transparency and the hover fade

use crate::platform::{PlatformAdapter, TimerId};
use crate::state::{Color, TransparencyKey, OPAQUE};
use std::time::{Duration, Instant};

/// Keyed color that makes the window background ignore pointer input
pub const CLICK_THROUGH_KEY: Color = Color::BLACK;

/// Opacity while the pointer hovers a click-through window.
/// Must not equal any opacity a user can configure.
pub const HOVER_OPACITY: f64 = 0.6;

pub const HOVER_FADE_TIMER: TimerId = TimerId(1);
pub const HOVER_TIMER_PERIOD: Duration = Duration::from_millis(1000);
pub const HOVER_RESTORE_DELAY: Duration = Duration::from_secs(2);

/// Repeating timer that decides when a faded window comes back
#[derive(Debug)]
pub struct HoverFadeTimer {
    hover_started: Instant,
    running: bool,
}

impl HoverFadeTimer {
    fn new(now: Instant) -> Self {
        Self {
            hover_started: now,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn start(&mut self, platform: &mut impl PlatformAdapter) {
        if self.running {
            return;
        }
        platform.start_timer(HOVER_FADE_TIMER, HOVER_TIMER_PERIOD);
        self.running = true;
        log::debug!("Hover fade timer started");
    }

    fn stop(&mut self, platform: &mut impl PlatformAdapter) {
        if !self.running {
            return;
        }
        platform.stop_timer(HOVER_FADE_TIMER);
        self.running = false;
        log::debug!("Hover fade timer stopped");
    }
}

/// Toggles click-through and owns the hover fade timer
#[derive(Debug)]
pub struct TransparencyController {
    enabled: bool,
    default_key: TransparencyKey,
    hover_timer: Option<HoverFadeTimer>,
}

impl TransparencyController {
    /// `default_key` is restored when click-through is turned off
    pub fn new(default_key: TransparencyKey) -> Self {
        Self {
            enabled: false,
            default_key,
            hover_timer: None,
        }
    }

    pub fn is_click_through(&self) -> bool {
        self.enabled
    }

    pub fn hover_timer(&self) -> Option<&HoverFadeTimer> {
        self.hover_timer.as_ref()
    }

    pub fn set_click_through(&mut self, platform: &mut impl PlatformAdapter, enable: bool) {
        let key = if enable {
            TransparencyKey::Color(CLICK_THROUGH_KEY)
        } else {
            self.default_key
        };
        platform.set_transparency_key(key);

        if enable {
            // Some compositors only react to a topmost transition
            platform.set_topmost(false);
            platform.activate();
            platform.set_topmost(true);
        }

        self.enabled = enable;
        log::info!("Click-through {}", if enable { "enabled" } else { "disabled" });
    }

    /// The pointer is hovering the click-through window
    pub fn notify_hover(&mut self, platform: &mut impl PlatformAdapter) {
        if platform.opacity() == OPAQUE {
            platform.set_opacity(HOVER_OPACITY);
        }

        let now = platform.now();
        let timer = self.hover_timer.get_or_insert_with(|| HoverFadeTimer::new(now));
        timer.hover_started = now;
        timer.start(platform);
    }

    /// Periodic tick of the hover fade timer
    pub fn on_timer_tick(&mut self, platform: &mut impl PlatformAdapter) {
        let Some(timer) = self.hover_timer.as_mut() else {
            return;
        };
        if !timer.running {
            return;
        }

        let elapsed = platform.now().saturating_duration_since(timer.hover_started);
        if elapsed <= HOVER_RESTORE_DELAY {
            return;
        }

        if platform.bounds().contains_point(platform.cursor_position()) {
            return;
        }

        if platform.opacity() == HOVER_OPACITY {
            platform.set_opacity(OPAQUE);
        }
        timer.stop(platform);
    }

    /// Stop and drop the hover timer, for window teardown
    pub fn dispose(&mut self, platform: &mut impl PlatformAdapter) {
        if let Some(mut timer) = self.hover_timer.take() {
            timer.stop(platform);
        }
    }
}
