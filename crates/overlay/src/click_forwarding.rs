//! Consent-gated click forwarding toggle

use crate::platform::{PersistedConfig, PlatformAdapter};
use crate::state::ThumbnailSurface;

pub const CONSENT_TITLE: &str = "Click forwarding";

pub const CONSENT_MESSAGE: &str = "Click forwarding sends every left click on the thumbnail \
to the mirrored window, as if you had clicked the window itself.\n\n\
While it is active the thumbnail can no longer be used to move or resize the overlay. \
Turn it off again from the context menu.\n\n\
Enable click forwarding?";

/// Governs permission to forward thumbnail clicks to the target window
#[derive(Debug, Default, Clone, Copy)]
pub struct ClickForwardingGate;

impl ClickForwardingGate {
    pub fn new() -> Self {
        Self
    }

    pub fn is_enabled(&self, surface: &ThumbnailSurface) -> bool {
        surface.report_clicks
    }

    /// Enable or disable forwarding.
    ///
    /// The first enable ever asks for confirmation; declining leaves
    /// forwarding off and asks again next time. Returns the resulting state.
    pub fn set_enabled(
        &self,
        enable: bool,
        platform: &mut impl PlatformAdapter,
        config: &mut impl PersistedConfig,
        surface: &mut ThumbnailSurface,
    ) -> bool {
        if enable && config.first_time_click_forwarding() {
            if !platform.confirm(CONSENT_TITLE, CONSENT_MESSAGE) {
                log::info!("Click forwarding declined");
                return surface.report_clicks;
            }

            config.clear_first_time_click_forwarding();
        }

        surface.report_clicks = enable;
        log::info!("Click forwarding {}", if enable { "enabled" } else { "disabled" });
        enable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, FakePlatform, FakeSettings};

    #[test]
    fn test_first_enable_declined() {
        let mut platform = FakePlatform::new();
        let mut settings = FakeSettings { first_time_click_forwarding: true };
        let mut surface = ThumbnailSurface::default();

        platform.confirm_answer = false;
        let enabled = ClickForwardingGate::new().set_enabled(true, &mut platform, &mut settings, &mut surface);

        assert!(!enabled);
        assert!(!surface.report_clicks);
        assert!(settings.first_time_click_forwarding);
        assert_eq!(platform.count(&Event::Confirm), 1);
    }

    #[test]
    fn test_declined_dialog_reappears() {
        let mut platform = FakePlatform::new();
        let mut settings = FakeSettings { first_time_click_forwarding: true };
        let mut surface = ThumbnailSurface::default();
        let gate = ClickForwardingGate::new();

        gate.set_enabled(true, &mut platform, &mut settings, &mut surface);
        gate.set_enabled(true, &mut platform, &mut settings, &mut surface);

        assert_eq!(platform.count(&Event::Confirm), 2);
        assert!(!surface.report_clicks);
    }

    #[test]
    fn test_first_enable_accepted_is_permanent() {
        let mut platform = FakePlatform::new();
        let mut settings = FakeSettings { first_time_click_forwarding: true };
        let mut surface = ThumbnailSurface::default();
        let gate = ClickForwardingGate::new();

        platform.confirm_answer = true;
        assert!(gate.set_enabled(true, &mut platform, &mut settings, &mut surface));
        assert!(surface.report_clicks);
        assert!(!settings.first_time_click_forwarding);

        // Later toggles never ask again
        gate.set_enabled(false, &mut platform, &mut settings, &mut surface);
        assert!(!surface.report_clicks);
        platform.confirm_answer = false;
        gate.set_enabled(true, &mut platform, &mut settings, &mut surface);
        assert!(surface.report_clicks);
        assert_eq!(platform.count(&Event::Confirm), 1);
    }

    #[test]
    fn test_disable_never_asks() {
        let mut platform = FakePlatform::new();
        let mut settings = FakeSettings { first_time_click_forwarding: true };
        let mut surface = ThumbnailSurface { report_clicks: true, ..Default::default() };

        let gate = ClickForwardingGate::new();
        assert!(!gate.set_enabled(false, &mut platform, &mut settings, &mut surface));
        assert!(!gate.is_enabled(&surface));
        assert_eq!(platform.count(&Event::Confirm), 0);
        assert!(settings.first_time_click_forwarding);
    }
}
