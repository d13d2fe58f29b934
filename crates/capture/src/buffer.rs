//! Owned pixel buffers

use crate::{Rect, Size};

/// Top-down 32bpp BGRA pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PixelBuffer {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Allocate a zeroed buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * Self::BYTES_PER_PIXEL],
            width,
            height,
        }
    }

    /// Allocate a buffer matching `size`
    pub fn with_size(size: Size) -> Self {
        Self::new(size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Buffer bounds anchored at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }

    /// BGRA value of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let offset = y as usize * self.stride() + x as usize * Self::BYTES_PER_PIXEL;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[offset..offset + Self::BYTES_PER_PIXEL]);
        Some(px)
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u8]> {
        self.data.chunks_exact(self.stride().max(1))
    }

    /// Crop to rectangle, clamped to the buffer bounds
    pub fn crop(&self, rect: &Rect) -> PixelBuffer {
        let src_x = rect.x.max(0) as u32;
        let src_y = rect.y.max(0) as u32;
        let crop_width = rect.width.min(self.width.saturating_sub(src_x));
        let crop_height = rect.height.min(self.height.saturating_sub(src_y));

        let row_bytes = crop_width as usize * Self::BYTES_PER_PIXEL;
        let mut cropped_data = Vec::with_capacity(row_bytes * crop_height as usize);

        for y in 0..crop_height {
            let src_offset = (src_y + y) as usize * self.stride() + src_x as usize * Self::BYTES_PER_PIXEL;
            cropped_data.extend_from_slice(&self.data[src_offset..src_offset + row_bytes]);
        }

        PixelBuffer {
            data: cropped_data,
            width: crop_width,
            height: crop_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let offset = (y * width + x) as usize * 4;
                buffer.data[offset] = x as u8;
                buffer.data[offset + 1] = y as u8;
                buffer.data[offset + 3] = 0xFF;
            }
        }
        buffer
    }

    #[test]
    fn test_new_is_zeroed() {
        let buffer = PixelBuffer::new(3, 2);
        assert_eq!(buffer.data.len(), 24);
        assert!(buffer.data.iter().all(|b| *b == 0));
        assert_eq!(buffer.bounds(), Rect::new(0, 0, 3, 2));
    }

    #[test]
    fn test_crop_copies_region() {
        let buffer = gradient(8, 6);
        let cropped = buffer.crop(&Rect::new(2, 3, 4, 2));

        assert_eq!(cropped.size(), Size::new(4, 2));
        assert_eq!(cropped.pixel(0, 0), Some([2, 3, 0, 0xFF]));
        assert_eq!(cropped.pixel(3, 1), Some([5, 4, 0, 0xFF]));
        assert_eq!(cropped.pixel(4, 0), None);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let buffer = gradient(8, 6);
        let cropped = buffer.crop(&Rect::new(6, 4, 10, 10));

        assert_eq!(cropped.size(), Size::new(2, 2));
        assert_eq!(cropped.pixel(1, 1), Some([7, 5, 0, 0xFF]));
    }

    #[test]
    fn test_rows() {
        let buffer = gradient(2, 3);
        let rows: Vec<&[u8]> = buffer.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][1], 2);
    }
}
