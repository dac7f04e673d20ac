use image::RgbImage;
use raqote::{BlendMode, DrawOptions, DrawTarget, LineJoin, PathBuilder, SolidSource, Source, StrokeStyle};

use crate::config::{
    HELMET_CLASS_LABEL, LABEL_BACKGROUND_ALPHA, LABEL_PADDING, NEGATIVE_COLOR, POSITIVE_COLOR,
    STROKE_WIDTH, TEXT_COLOR,
};
use crate::error::Result;
use crate::helmet::bounds::{BoundingBox, DetectionResult};
use crate::helmet::font::{default_font, FontResource, GlyphMask, TextExtent};

/// 标注样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatorStyle {
    /// 边框线宽（向框内绘制）
    pub stroke_width: u32,
    /// 标签文字四周的留白
    pub padding: u32,
    /// 标签背景的不透明度
    pub background_alpha: u8,
    pub positive_color: [u8; 3],
    pub negative_color: [u8; 3],
    pub text_color: [u8; 3],
}

impl Default for AnnotatorStyle {
    fn default() -> Self {
        Self {
            stroke_width: STROKE_WIDTH,
            padding: LABEL_PADDING,
            background_alpha: LABEL_BACKGROUND_ALPHA,
            positive_color: POSITIVE_COLOR,
            negative_color: NEGATIVE_COLOR,
            text_color: TEXT_COLOR,
        }
    }
}

impl AnnotatorStyle {
    /// 根据类别选择颜色：helmet类别用绿色，其他类别用红色
    pub fn color_for(&self, label: &str) -> [u8; 3] {
        if label.to_lowercase() == HELMET_CLASS_LABEL {
            self.positive_color
        } else {
            self.negative_color
        }
    }
}

/// 边界框的标签文字，例如 "helmet 92%"
pub fn label_text(bbox: &BoundingBox) -> String {
    format!("{} {}%", bbox.label(), (bbox.score() * 100.0).round() as u32)
}

/// 生成预乘alpha的纯色
fn solid(rgb: [u8; 3], alpha: u8) -> SolidSource {
    let premultiply = |c: u8| ((c as u32 * alpha as u32 + 127) / 255) as u8;
    SolidSource {
        r: premultiply(rgb[0]),
        g: premultiply(rgb[1]),
        b: premultiply(rgb[2]),
        a: alpha,
    }
}

/// 检测结果标注器
///
/// 在透明叠加层上绘制边框和标签，再以 src-over 方式合成到原图副本上。
#[derive(Debug, Clone)]
pub struct Annotator {
    font: FontResource,
    style: AnnotatorStyle,
}

impl Annotator {
    pub fn new(font: FontResource) -> Self {
        Self { font, style: AnnotatorStyle::default() }
    }

    /// 使用内置字体创建标注器
    pub fn with_default_font() -> Result<Self> {
        Ok(Self::new(default_font()?))
    }

    pub fn with_style(mut self, style: AnnotatorStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &AnnotatorStyle {
        &self.style
    }

    pub fn font(&self) -> &FontResource {
        &self.font
    }

    /// 在图像上绘制检测结果
    ///
    /// # 参数
    /// * `image` - 原始图像，不会被修改
    /// * `result` - 检测结果
    ///
    /// # 返回值
    /// 返回绘制了边框和标签的新图像。超出画布的部分会被裁掉。
    pub fn annotate(&self, image: &RgbImage, result: &DetectionResult) -> RgbImage {
        let (width, height) = image.dimensions();
        if result.is_empty() || width == 0 || height == 0 {
            return image.clone();
        }

        // 边框和标签都从 (x1, 标签顶边) 向右下延伸，起点在画布外的整体不可见
        let visible: Vec<_> = result
            .boxes()
            .iter()
            .map(|bbox| {
                let text = label_text(bbox);
                let extent = self.font.measure(&text);
                (bbox, text, extent)
            })
            .filter(|(bbox, _, extent)| {
                let (left, top, _, _) = self.label_rect(bbox, *extent);
                left < width && top < height
            })
            .collect();
        if visible.is_empty() {
            log::debug!("{} 个边界框均在画布之外", result.boxes().len());
            return image.clone();
        }

        let mut base = DrawTarget::new(width as i32, height as i32);
        for (dst, pixel) in base.get_data_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b] = pixel.0;
            *dst = u32::from_le_bytes([b, g, r, 0xFF]);
        }

        let mut overlay = DrawTarget::new(width as i32, height as i32);
        for (bbox, text, extent) in &visible {
            let color = self.style.color_for(bbox.label());
            self.draw_box(&mut overlay, bbox, color, width, height);
            self.draw_label(&mut overlay, bbox, text, *extent, color, width, height);
        }
        log::debug!("绘制了 {} 个边界框", visible.len());

        let layer = raqote::Image {
            width: width as i32,
            height: height as i32,
            data: overlay.get_data(),
        };
        base.draw_image_at(0.0, 0.0, &layer, &DrawOptions::new());

        to_rgb_image(&base, width, height)
    }

    /// 标签背景矩形 (left, top, right, bottom)，包含端点，上边缘截到 y = 0
    fn label_rect(&self, bbox: &BoundingBox, extent: TextExtent) -> (u32, u32, u32, u32) {
        let pad2 = self.style.padding.saturating_mul(2);
        let left = bbox.x1();
        let top = bbox.y1().saturating_sub(extent.height.saturating_add(pad2));
        let right = left.saturating_add(extent.width.saturating_add(pad2));
        (left, top, right, bbox.y1())
    }

    /// 绘制边框，线条完全落在框内
    fn draw_box(&self, dt: &mut DrawTarget, bbox: &BoundingBox, color: [u8; 3], width: u32, height: u32) {
        let (x1, y1) = (bbox.x1(), bbox.y1());
        if x1 >= width || y1 >= height {
            return;
        }
        let stroke = self.style.stroke_width;
        // 右下角截到画布外一个线宽处，被截掉的边仍然不可见
        let x2 = bbox.x2().min(width.saturating_add(stroke));
        let y2 = bbox.y2().min(height.saturating_add(stroke));

        let source = Source::Solid(solid(color, 0xFF));
        let stroke = stroke as f32;
        let (x, y) = (x1 as f32, y1 as f32);
        let (w, h) = ((x2 - x1 + 1) as f32, (y2 - y1 + 1) as f32);

        if w <= stroke || h <= stroke {
            // 框比线宽还小，直接填满
            dt.fill_rect(x, y, w, h, &source, &DrawOptions::new());
            return;
        }

        let mut pb = PathBuilder::new();
        pb.rect(x + stroke / 2.0, y + stroke / 2.0, w - stroke, h - stroke);
        let path = pb.finish();
        dt.stroke(
            &path,
            &source,
            &StrokeStyle {
                join: LineJoin::Miter,
                width: stroke,
                ..StrokeStyle::default()
            },
            &DrawOptions::new(),
        );
    }

    /// 在框的上边缘之上绘制半透明背景和白色文字
    #[allow(clippy::too_many_arguments)]
    fn draw_label(
        &self,
        dt: &mut DrawTarget,
        bbox: &BoundingBox,
        text: &str,
        extent: TextExtent,
        color: [u8; 3],
        width: u32,
        height: u32,
    ) {
        let pad = self.style.padding;
        let (left, top, right, bottom) = self.label_rect(bbox, extent);
        if left >= width || top >= height {
            return;
        }
        let (right, bottom) = (right.min(width - 1), bottom.min(height - 1));

        // 叠加层上的背景直接覆盖之前的像素，合成时才与原图混合
        dt.fill_rect(
            left as f32,
            top as f32,
            (right - left + 1) as f32,
            (bottom - top + 1) as f32,
            &Source::Solid(solid(color, self.style.background_alpha)),
            &DrawOptions {
                blend_mode: BlendMode::Src,
                ..DrawOptions::new()
            },
        );

        let mask = self.font.rasterize(text);
        self.draw_text(dt, &mask, left.saturating_add(pad), top.saturating_add(pad));
    }

    fn draw_text(&self, dt: &mut DrawTarget, mask: &GlyphMask, x: u32, y: u32) {
        if mask.is_empty() {
            return;
        }
        let text_color = self.style.text_color;
        let pixels: Vec<u32> = mask
            .data
            .iter()
            .map(|&coverage| {
                let SolidSource { r, g, b, a } = solid(text_color, coverage);
                u32::from_le_bytes([b, g, r, a])
            })
            .collect();
        let glyphs = raqote::Image {
            width: mask.width as i32,
            height: mask.height as i32,
            data: &pixels,
        };
        dt.draw_image_at(x as f32, y as f32, &glyphs, &DrawOptions::new());
    }
}

/// 将DrawTarget的预乘ARGB数据转换回RGB图像
fn to_rgb_image(dt: &DrawTarget, width: u32, height: u32) -> RgbImage {
    let mut out = RgbImage::new(width, height);
    for (pixel, &argb) in out.pixels_mut().zip(dt.get_data()) {
        let [b, g, r, a] = argb.to_le_bytes();
        let unpremultiply = |c: u8| match a {
            0 => 0,
            0xFF => c,
            _ => ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8,
        };
        pixel.0 = [unpremultiply(r), unpremultiply(g), unpremultiply(b)];
    }
    out
}

/// 使用内置字体和默认样式在图像上绘制检测结果
///
/// # 示例
///
/// ```
/// use helmet_detect::{draw_detections, HelmetDetector, PlaceholderDetector};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let image = image::RgbImage::new(320, 240);
/// let result = PlaceholderDetector::new().detect(&image)?;
/// let annotated = draw_detections(&image, &result)?;
/// assert_eq!(annotated.dimensions(), image.dimensions());
/// # Ok(())
/// # }
/// ```
pub fn draw_detections(image: &RgbImage, result: &DetectionResult) -> Result<RgbImage> {
    Ok(Annotator::with_default_font()?.annotate(image, result))
}
