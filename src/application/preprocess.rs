use image::{imageops::FilterType, DynamicImage, ImageReader};
use ndarray::Array4;
use std::io::Cursor;

use crate::domain::errors::{DomainError, DomainResult};

/// Decodifica en dos fases: primero formato y cabecera, luego el bitmap completo
/// (la cabecera sola no detecta datos de píxel truncados).
pub fn decode_image(bytes: &[u8]) -> DomainResult<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DomainError::CorruptedImage(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DomainError::CorruptedImage("unrecognized image format".into()));
    }
    let (w, h) = reader
        .into_dimensions()
        .map_err(|e| DomainError::CorruptedImage(e.to_string()))?;
    if w == 0 || h == 0 {
        return Err(DomainError::CorruptedImage(format!("empty image {w}x{h}")));
    }

    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DomainError::CorruptedImage(e.to_string()))?
        .decode()
        .map_err(|e| DomainError::CorruptedImage(e.to_string()))
}

/// Imagen -> tensor NHWC `[1, size, size, 3]` con valores en [0, 1].
pub fn preprocess(image: &DynamicImage, target_size: u32) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(&rgb, target_size, target_size, FilterType::CatmullRom);
    let s = target_size as usize;

    Array4::<f32>::from_shape_fn((1, s, s, 3), |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn assert_tensor(t: &Array4<f32>, size: usize) {
        assert_eq!(t.shape(), &[1, size, size, 3]);
        assert!(t.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn rgba_and_grayscale_become_three_channels() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(31, 17, Rgba([255, 0, 128, 10])));
        assert_tensor(&preprocess(&rgba, 24), 24);

        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 80, Luma([200])));
        let t = preprocess(&gray, 16);
        assert_tensor(&t, 16);
        let px = (t[[0, 3, 3, 0]], t[[0, 3, 3, 1]], t[[0, 3, 3, 2]]);
        assert_eq!(px.0, px.1);
        assert_eq!(px.1, px.2);
    }

    #[test]
    fn scales_by_255() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 51])));
        let t = preprocess(&img, 8);
        assert_eq!(t[[0, 0, 0, 0]], 1.0);
        assert_eq!(t[[0, 0, 0, 1]], 0.0);
        assert!((t[[0, 7, 7, 2]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn sixteen_bit_images_stay_in_range() {
        let px = Rgb([65535u16, 0, 30000]);
        let img = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(10, 10, px));
        assert_tensor(&preprocess(&img, 12), 12);
    }

    #[test]
    fn preprocess_is_deterministic() {
        let img =
            DynamicImage::ImageRgb8(RgbImage::from_fn(40, 30, |x, y| Rgb([x as u8, y as u8, 7])));
        assert_eq!(preprocess(&img, 20), preprocess(&img, 20));
    }

    #[test]
    fn decodes_valid_png() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([1, 2, 3])));
        let decoded = decode_image(&encode(&img, ImageFormat::Png)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn rejects_text_bytes() {
        let err = decode_image(b"just some notes, not a picture").unwrap_err();
        assert_eq!(err.code(), "CORRUPTED_IMAGE");
    }

    #[test]
    fn rejects_truncated_png() {
        let rgb = RgbImage::from_fn(64, 64, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
        let img = DynamicImage::ImageRgb8(rgb);
        let bytes = encode(&img, ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];
        assert_eq!(decode_image(truncated).unwrap_err().code(), "CORRUPTED_IMAGE");
    }
}
