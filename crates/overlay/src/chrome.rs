//! Window chrome toggling with frame compensation

use crate::platform::PlatformAdapter;
use crate::state::{BorderStyle, ThumbnailSurface};

/// Shows and hides window decorations without moving the visible content
#[derive(Debug, Clone, Copy)]
pub struct ChromeController {
    default_style: BorderStyle,
}

impl ChromeController {
    pub fn new(default_style: BorderStyle) -> Self {
        Self { default_style }
    }

    pub fn is_chrome_visible(&self, platform: &impl PlatformAdapter) -> bool {
        platform.border_style() == self.default_style
    }

    /// Hiding is refused while no thumbnail is shown, since a borderless
    /// empty window cannot be found or grabbed.
    pub fn set_chrome_visible(
        &self,
        platform: &mut impl PlatformAdapter,
        surface: &ThumbnailSurface,
        visible: bool,
    ) {
        if !visible && !surface.showing_thumbnail {
            return;
        }
        if visible == self.is_chrome_visible(platform) {
            return;
        }

        let frame = platform.frame_border_thickness();
        let (dx, dy) = (frame.width as i32, frame.height as i32);
        let location = platform.location();

        if visible {
            platform.set_location(location.offset(-dx, -dy));
            platform.set_border_style(self.default_style);
        } else {
            platform.set_location(location.offset(dx, dy));
            platform.set_border_style(BorderStyle::None);
        }
        log::info!("Chrome {}", if visible { "shown" } else { "hidden" });
        log::debug!("Frame compensation {}x{}", dx, dy);

        platform.notify_window_state_changed();
        platform.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, FakePlatform};
    use capture::{Point, Size};

    fn showing() -> ThumbnailSurface {
        ThumbnailSurface {
            showing_thumbnail: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_hide_shifts_inward() {
        let mut platform = FakePlatform::new();
        platform.frame_border = Size::new(8, 6);
        let chrome = ChromeController::new(BorderStyle::Sizable);

        chrome.set_chrome_visible(&mut platform, &showing(), false);

        assert_eq!(platform.state.location(), Point::new(108, 106));
        assert_eq!(platform.state.border_style, BorderStyle::None);
        assert!(!chrome.is_chrome_visible(&platform));
        assert_eq!(&platform.events[platform.events.len() - 2..], &[Event::StateChanged, Event::Invalidate]);
    }

    #[test]
    fn test_round_trip_restores_location() {
        let mut platform = FakePlatform::new();
        platform.frame_border = Size::new(8, 6);
        let chrome = ChromeController::new(BorderStyle::Sizable);
        let surface = showing();

        chrome.set_chrome_visible(&mut platform, &surface, false);
        chrome.set_chrome_visible(&mut platform, &surface, true);

        assert_eq!(platform.state.location(), Point::new(100, 100));
        assert_eq!(platform.state.border_style, BorderStyle::Sizable);
        assert!(chrome.is_chrome_visible(&platform));
        assert_eq!(platform.count(&Event::StateChanged), 2);
    }

    #[test]
    fn test_hide_without_thumbnail_is_ignored() {
        let mut platform = FakePlatform::new();
        let chrome = ChromeController::new(BorderStyle::Sizable);

        chrome.set_chrome_visible(&mut platform, &ThumbnailSurface::default(), false);

        assert_eq!(platform.state.location(), Point::new(100, 100));
        assert_eq!(platform.state.border_style, BorderStyle::Sizable);
        assert!(platform.events.is_empty());
    }

    #[test]
    fn test_show_allowed_without_thumbnail() {
        let mut platform = FakePlatform::new();
        let chrome = ChromeController::new(BorderStyle::Sizable);

        chrome.set_chrome_visible(&mut platform, &showing(), false);
        chrome.set_chrome_visible(&mut platform, &ThumbnailSurface::default(), true);

        assert!(chrome.is_chrome_visible(&platform));
        assert_eq!(platform.state.location(), Point::new(100, 100));
    }

    #[test]
    fn test_repeated_hide_does_not_drift() {
        let mut platform = FakePlatform::new();
        let chrome = ChromeController::new(BorderStyle::Sizable);
        let surface = showing();

        chrome.set_chrome_visible(&mut platform, &surface, false);
        chrome.set_chrome_visible(&mut platform, &surface, false);
        chrome.set_chrome_visible(&mut platform, &surface, true);
        chrome.set_chrome_visible(&mut platform, &surface, true);

        assert_eq!(platform.state.location(), Point::new(100, 100));
        assert_eq!(platform.count(&Event::StateChanged), 2);
    }
}
