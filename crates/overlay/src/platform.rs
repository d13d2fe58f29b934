//! Platform capabilities used by the overlay controllers

use crate::state::{BorderStyle, TransparencyKey};
use crate::OverlayResult;
use capture::{PixelBuffer, Point, Rect, Size};
use std::time::{Duration, Instant};

/// Identifier of a window timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub usize);

/// Queries and actions on the overlay window and the desktop it lives on.
///
/// All calls happen on the UI thread that owns the window.
pub trait PlatformAdapter {
    fn opacity(&self) -> f64;
    fn set_opacity(&mut self, opacity: f64);

    fn set_transparency_key(&mut self, key: TransparencyKey);

    fn border_style(&self) -> BorderStyle;
    fn set_border_style(&mut self, style: BorderStyle);

    /// Outer window rectangle in screen coordinates
    fn bounds(&self) -> Rect;

    fn location(&self) -> Point {
        self.bounds().origin()
    }
    fn set_location(&mut self, location: Point);

    fn set_topmost(&mut self, topmost: bool);

    /// Bring the window to the foreground
    fn activate(&mut self);

    /// Request a redraw
    fn invalidate(&mut self);

    /// Usable area of the monitor the window is on
    fn work_area(&self) -> Rect;

    /// Thickness of a sizable window frame
    fn frame_border_thickness(&self) -> Size;

    fn cursor_position(&self) -> Point;

    /// Hook for chrome and taskbar integration after the window state changed
    fn notify_window_state_changed(&mut self);

    fn set_clipboard_image(&mut self, image: &PixelBuffer) -> OverlayResult<()>;

    /// Start a repeating timer; ticks are delivered by the event loop
    fn start_timer(&mut self, id: TimerId, period: Duration);
    fn stop_timer(&mut self, id: TimerId);

    fn now(&self) -> Instant;

    /// Blocking Yes/No question, `true` on Yes
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

/// Persisted user settings consulted by the overlay
pub trait PersistedConfig {
    fn first_time_click_forwarding(&self) -> bool;

    /// Permanently record that click forwarding was explained and accepted
    fn clear_first_time_click_forwarding(&mut self);
}
