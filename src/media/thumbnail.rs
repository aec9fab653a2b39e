use image::imageops::FilterType;
use tokio::task;

/// Longest edge of gallery grid thumbnails
const THUMBNAIL_SIZE: u32 = 320;

/// Decoded RGBA pixels, ready to hand to the image widget
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode fetched photo bytes and shrink them for the grid
///
/// Decoding is CPU-bound, so it runs on the blocking pool.
pub async fn make_thumbnail(bytes: Vec<u8>) -> Result<Thumbnail, String> {
    task::spawn_blocking(move || make_thumbnail_blocking(&bytes))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

fn make_thumbnail_blocking(bytes: &[u8]) -> Result<Thumbnail, String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    // Small images are only converted, never enlarged
    let img = if img.width() > THUMBNAIL_SIZE || img.height() > THUMBNAIL_SIZE {
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([255, 105, 180, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_large_image_is_shrunk() {
        let thumb = make_thumbnail(png(1280, 640)).await.unwrap();
        assert_eq!(thumb.width, THUMBNAIL_SIZE);
        assert_eq!(thumb.height, THUMBNAIL_SIZE / 2);
        assert_eq!(thumb.pixels.len(), (thumb.width * thumb.height * 4) as usize);
    }

    #[tokio::test]
    async fn test_small_image_keeps_size() {
        let thumb = make_thumbnail(png(40, 30)).await.unwrap();
        assert_eq!((thumb.width, thumb.height), (40, 30));
    }

    #[tokio::test]
    async fn test_garbage_is_an_error() {
        let result = make_thumbnail(b"definitely not a jpeg".to_vec()).await;
        assert!(result.is_err());
    }
}
