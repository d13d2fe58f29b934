//! Packed DIB encoding (the `CF_DIB` clipboard format)

use crate::{ExportError, ExportResult};
use capture::PixelBuffer;
use image::codecs::bmp::BmpEncoder;
use image::RgbImage;

/// Size of the `BITMAPFILEHEADER` that precedes a DIB in a .bmp file
const BITMAP_FILE_HEADER_SIZE: usize = 14;

/// Size of the `BITMAPINFOHEADER` written for 24bpp images
pub const BITMAP_INFO_HEADER_SIZE: usize = 40;

/// Convert BGRA data to an RGB image, dropping alpha
fn to_rgb_image(image: &PixelBuffer) -> ExportResult<RgbImage> {
    let rgb: Vec<u8> = image
        .data
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect();

    RgbImage::from_raw(image.width, image.height, rgb).ok_or(ExportError::TooLarge {
        width: image.width,
        height: image.height,
    })
}

/// Encode a BGRA buffer as a packed bottom-up 24bpp DIB.
///
/// The result is a `BITMAPINFOHEADER` immediately followed by the pixel rows,
/// last row first.
pub fn encode_dib(image: &PixelBuffer) -> ExportResult<Vec<u8>> {
    if image.width == 0 || image.height == 0 {
        return Err(ExportError::EmptyImage);
    }
    if image.width > i32::MAX as u32 || image.height > i32::MAX as u32 {
        return Err(ExportError::TooLarge {
            width: image.width,
            height: image.height,
        });
    }

    let rgb = to_rgb_image(image)?;

    let mut bmp = Vec::new();
    rgb.write_with_encoder(BmpEncoder::new(&mut bmp))?;

    // CF_DIB is the .bmp file without its file header
    Ok(bmp.split_off(BITMAP_FILE_HEADER_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_i32(bytes: &[u8], offset: usize) -> i32 {
        i32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_header_fields() {
        let image = PixelBuffer::new(5, 3);
        let dib = encode_dib(&image).unwrap();

        // 15 bytes per row, padded to 16
        assert_eq!(dib.len(), BITMAP_INFO_HEADER_SIZE + 16 * 3);
        assert_eq!(read_i32(&dib, 0), 40);
        assert_eq!(read_i32(&dib, 4), 5);
        assert_eq!(read_i32(&dib, 8), 3);
        assert_eq!(u16::from_le_bytes([dib[12], dib[13]]), 1);
        assert_eq!(u16::from_le_bytes([dib[14], dib[15]]), 24);
    }

    #[test]
    fn test_rows_are_bottom_up_bgr() {
        let mut image = PixelBuffer::new(1, 2);
        image.data[..4].copy_from_slice(&[1, 2, 3, 4]);
        image.data[4..].copy_from_slice(&[5, 6, 7, 8]);

        let dib = encode_dib(&image).unwrap();
        let pixels = &dib[BITMAP_INFO_HEADER_SIZE..];
        assert_eq!(pixels, &[5, 6, 7, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_empty_image_rejected() {
        let image = PixelBuffer::new(0, 10);
        assert!(matches!(encode_dib(&image), Err(ExportError::EmptyImage)));
    }
}
