//! Overlay window state and thumbnail surface records

use capture::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Fully opaque window opacity
pub const OPAQUE: f64 = 1.0;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0x00BBGGRR` layout used by GDI
    pub fn to_colorref(&self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }
}

/// Color-key transparency mode of the window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransparencyKey {
    /// No color is keyed out
    #[default]
    None,
    /// Pixels of this color are invisible and ignore pointer input
    Color(Color),
}

/// Window decoration style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderStyle {
    /// Resizable frame with title bar
    #[default]
    Sizable,
    /// No decorations
    None,
}

/// Snapshot of the OS-visible state of the overlay window
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayWindowState {
    pub opacity: f64,
    pub transparency_key: TransparencyKey,
    pub border_style: BorderStyle,
    pub bounds: Rect,
    pub topmost: bool,
}

impl OverlayWindowState {
    pub fn location(&self) -> Point {
        self.bounds.origin()
    }
}

impl Default for OverlayWindowState {
    fn default() -> Self {
        Self {
            opacity: OPAQUE,
            transparency_key: TransparencyKey::None,
            border_style: BorderStyle::Sizable,
            bounds: Rect::new(0, 0, 400, 300),
            topmost: true,
        }
    }
}

/// Screen anchor the window can be locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenPosition {
    TopLeft,
    TopRight,
    Center,
    BottomLeft,
    BottomRight,
}

impl ScreenPosition {
    pub const ALL: [ScreenPosition; 5] = [
        ScreenPosition::TopLeft,
        ScreenPosition::TopRight,
        ScreenPosition::Center,
        ScreenPosition::BottomLeft,
        ScreenPosition::BottomRight,
    ];

    /// Window location that places a window of `size` at this anchor
    pub fn resolve(&self, size: Size, work_area: Rect) -> Point {
        let left = work_area.x;
        let top = work_area.y;
        let right = work_area.right() - size.width as i32;
        let bottom = work_area.bottom() - size.height as i32;

        match self {
            ScreenPosition::TopLeft => Point::new(left, top),
            ScreenPosition::TopRight => Point::new(right, top),
            ScreenPosition::Center => Point::new(
                left + (work_area.width as i32 - size.width as i32) / 2,
                top + (work_area.height as i32 - size.height as i32) / 2,
            ),
            ScreenPosition::BottomLeft => Point::new(left, bottom),
            ScreenPosition::BottomRight => Point::new(right, bottom),
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            ScreenPosition::TopLeft => "Top left",
            ScreenPosition::TopRight => "Top right",
            ScreenPosition::Center => "Center",
            ScreenPosition::BottomLeft => "Bottom left",
            ScreenPosition::BottomRight => "Bottom right",
        }
    }
}

/// Insets from each edge of the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// User-selected part of the thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThumbnailRegion {
    /// Fixed rectangle in source pixels
    Absolute(Rect),
    /// Insets that follow the source when it is resized
    Relative(Padding),
}

impl ThumbnailRegion {
    /// Region in source pixel coordinates for a source of `source_size`
    pub fn compute_rect(&self, source_size: Size) -> Rect {
        match self {
            ThumbnailRegion::Absolute(rect) => *rect,
            ThumbnailRegion::Relative(padding) => Rect::new(
                padding.left.min(i32::MAX as u32) as i32,
                padding.top.min(i32::MAX as u32) as i32,
                source_size.width.saturating_sub(padding.left.saturating_add(padding.right)),
                source_size.height.saturating_sub(padding.top.saturating_add(padding.bottom)),
            ),
        }
    }
}

/// State shared with the thumbnail rendering surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailSurface {
    pub showing_thumbnail: bool,
    pub report_clicks: bool,
    pub selected_region: Option<ThumbnailRegion>,
    pub constrain_to_region: bool,
    pub original_size: Size,
}

impl ThumbnailSurface {
    /// Region operations should be constrained to, if any
    pub fn active_region(&self) -> Option<&ThumbnailRegion> {
        if self.constrain_to_region {
            self.selected_region.as_ref()
        } else {
            None
        }
    }
}
