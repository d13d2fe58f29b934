//! Window capture module for TopLens
//!
//! Provides geometry types, pixel buffers and full-content capture of
//! top-level windows.

pub mod buffer;
#[cfg(windows)]
pub mod window;

pub use buffer::PixelBuffer;
#[cfg(windows)]
pub use window::{enumerate_windows, WindowInfo, WindowTarget};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("Invalid window size: {width}x{height}")]
    InvalidSize { width: i64, height: i64 },

    #[error("Failed to render window content")]
    RenderFailed,

    #[error("Target window is gone")]
    TargetGone,
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Something whose on-screen pixels can be captured.
///
/// Implementations hold a weak reference to the window: the window may be
/// destroyed at any time, in which case every call fails.
pub trait CaptureSource {
    /// Current screen rectangle of the source
    fn screen_rect(&self) -> CaptureResult<Rect>;

    /// Render the full content of the source into `buffer`, including
    /// content that is composited off-screen or obscured by other windows.
    fn render_full_content(&self, buffer: &mut PixelBuffer) -> CaptureResult<()>;
}

/// Point in physical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by `dx`, `dy`
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Size in physical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Rectangle in physical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from window edges, rejecting non-positive extents
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> CaptureResult<Self> {
        let width = right as i64 - left as i64;
        let height = bottom as i64 - top as i64;

        if width <= 0 || height <= 0 {
            return Err(CaptureError::InvalidSize { width, height });
        }

        Ok(Self::new(left, top, width as u32, height as u32))
    }

    /// Right edge, saturating at `i32::MAX`
    pub fn right(&self) -> i32 {
        saturating_edge(self.x, self.width)
    }

    /// Bottom edge, saturating at `i32::MAX`
    pub fn bottom(&self) -> i32 {
        saturating_edge(self.y, self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.contains(point.x, point.y)
    }

    /// Empty rectangles intersect nothing
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlapping area of both rectangles, `None` when it is empty
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        let width = (right as i64 - x as i64) as u32;
        let height = (bottom as i64 - y as i64) as u32;
        Some(Rect::new(x, y, width, height))
    }
}

fn saturating_edge(start: i32, extent: u32) -> i32 {
    (start as i64 + extent as i64).min(i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_rejects_empty() {
        assert!(matches!(
            Rect::from_edges(10, 10, 10, 50),
            Err(CaptureError::InvalidSize { width: 0, height: 40 })
        ));
        assert!(Rect::from_edges(10, 10, 5, 50).is_err());

        let rect = Rect::from_edges(-20, 5, 100, 65).unwrap();
        assert_eq!(rect, Rect::new(-20, 5, 120, 60));
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(9, 9));
        assert!(!rect.contains(10, 5));
        assert!(!rect.contains_point(Point::new(5, -1)));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 100, 80);
        let b = Rect::new(60, 50, 100, 100);
        assert_eq!(a.intersection(&b), Some(Rect::new(60, 50, 40, 30)));

        let inside = Rect::new(10, 10, 20, 20);
        assert_eq!(a.intersection(&inside), Some(inside));

        let outside = Rect::new(100, 0, 10, 10);
        assert_eq!(a.intersection(&outside), None);
    }

    #[test]
    fn test_empty_rect_has_no_intersection() {
        let bounds = Rect::new(0, 0, 640, 480);

        assert!(!bounds.intersects(&Rect::new(10, 10, 0, 50)));
        assert_eq!(bounds.intersection(&Rect::new(10, 10, 0, 50)), None);
        assert_eq!(bounds.intersection(&Rect::new(10, 10, 50, 0)), None);
        assert_eq!(Rect::new(10, 10, 0, 0).intersection(&bounds), None);
    }

    #[test]
    fn test_huge_extents_saturate() {
        let huge = Rect::new(100, 0, i32::MAX as u32, u32::MAX);
        assert_eq!(huge.right(), i32::MAX);
        assert_eq!(huge.bottom(), i32::MAX);

        let bounds = Rect::new(0, 0, 640, 480);
        assert_eq!(huge.intersection(&bounds), Some(Rect::new(100, 0, 540, 480)));
        assert!(huge.contains(i32::MAX - 1, 5));
    }
}
