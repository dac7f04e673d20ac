use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::config::ACCEPTED_EXTENSIONS;
use crate::error::{Error, Result};

const ACCEPTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::WebP,
];

/// 解码上传的图像数据并转换为RGB
///
/// 格式根据文件头识别，只接受 JPEG、PNG、BMP、WEBP。
///
/// # 错误处理
/// 格式无法识别或不被接受时返回 `Error::UnsupportedFormat`，
/// 数据损坏时返回 `Error::Image`
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let format = image::guess_format(bytes)
        .map_err(|_| Error::UnsupportedFormat("无法识别的图像数据".to_string()))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(Error::UnsupportedFormat(format!("{:?}", format)));
    }
    let img = image::load_from_memory_with_format(bytes, format)?;
    Ok(img.to_rgb8())
}

/// 加载图像文件
///
/// # 参数
/// * `path` - 图像文件路径，扩展名须为 jpg/jpeg/png/bmp/webp
///
/// # 返回值
/// 返回RGB图像
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::UnsupportedFormat(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let img = decode_image(&bytes)?;
    log::debug!("已加载 {}: {}x{}", path.display(), img.width(), img.height());
    Ok(img)
}

/// 保存图像，格式由扩展名决定
pub fn save_image(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path.as_ref())?;
    Ok(())
}

/// 将图像编码为PNG字节
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbImage {
        RgbImage::from_fn(6, 4, |x, y| image::Rgb([x as u8 * 40, y as u8 * 60, 200]))
    }

    #[test]
    fn decodes_png_bytes() {
        let bytes = encode_png(&sample()).unwrap();
        assert_eq!(decode_image(&bytes).unwrap(), sample());
    }

    #[test]
    fn rejects_gif() {
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        assert!(matches!(decode_image(gif), Err(Error::UnsupportedFormat(f)) if f == "Gif"));
    }

    #[test]
    fn rejects_unknown_bytes() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn checks_extension_before_reading() {
        assert!(matches!(
            load_image("/nonexistent/rider.tiff"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(load_image("/nonexistent/rider.png"), Err(Error::Io(_))));
    }

    #[test]
    fn saves_and_loads_bmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rider.bmp");
        save_image(&sample(), &path).unwrap();
        assert_eq!(load_image(&path).unwrap(), sample());
    }
}
