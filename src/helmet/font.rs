//! 标签文字使用的字体资源
//!
//! 可以从文件加载指定字体；文件不存在或无法解析时回退到内置的 DejaVu Sans。

use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, OutlinedGlyph, PxScale, Rect, ScaleFont};

use crate::config::DEFAULT_FONT_SIZE;
use crate::error::{Error, Result};

static BUILTIN_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// 文字墨迹的像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// 文字的8位覆盖率遮罩，原点为墨迹左上角
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl GlyphMask {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// 字体资源
#[derive(Clone)]
pub struct FontResource {
    font: FontArc,
    /// 每em的像素数
    px_per_em: f32,
}

impl FontResource {
    /// 内置字体
    pub fn builtin(px_per_em: f32) -> Result<Self> {
        check_size(px_per_em)?;
        let font = FontArc::try_from_slice(BUILTIN_FONT)
            .map_err(|e| Error::Font(format!("内置字体: {}", e)))?;
        Ok(Self { font, px_per_em })
    }

    /// 从TrueType/OpenType字体数据创建
    pub fn from_bytes(data: Vec<u8>, px_per_em: f32) -> Result<Self> {
        check_size(px_per_em)?;
        let font = FontArc::try_from_vec(data).map_err(|e| Error::Font(e.to_string()))?;
        Ok(Self { font, px_per_em })
    }

    /// 从字体文件加载
    pub fn from_path(path: impl AsRef<Path>, px_per_em: f32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("无法读取 {}: {}", path.display(), e)))?;
        Self::from_bytes(data, px_per_em)
            .map_err(|e| Error::Font(format!("{}: {}", path.display(), e)))
    }

    /// 优先加载指定字体，失败时回退到内置字体
    ///
    /// # 参数
    /// * `path` - 可选的字体文件路径
    /// * `px_per_em` - 字号（每em的像素数）
    pub fn load_or_default(path: Option<&Path>, px_per_em: f32) -> Result<Self> {
        if let Some(path) = path {
            match Self::from_path(path, px_per_em) {
                Ok(font) => return Ok(font),
                Err(e) => log::warn!("{}，改用内置字体", e),
            }
        }
        Self::builtin(px_per_em)
    }

    pub fn px_per_em(&self) -> f32 {
        self.px_per_em
    }

    fn scale(&self) -> PxScale {
        // PxScale 以字体高度（ascent - descent）为单位，需要从em换算
        match self.font.units_per_em() {
            Some(units_per_em) => {
                PxScale::from(self.px_per_em * self.font.height_unscaled() / units_per_em)
            }
            None => PxScale::from(self.px_per_em),
        }
    }

    /// 单行排版，基线位于 y = ascent
    fn layout(&self, text: &str) -> Vec<OutlinedGlyph> {
        let scale = self.scale();
        let scaled = self.font.as_scaled(scale);
        let mut caret = point(0.0, scaled.ascent());
        let mut previous: Option<GlyphId> = None;
        let mut outlined = Vec::with_capacity(text.len());

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);
            if let Some(glyph) = self.font.outline_glyph(glyph) {
                outlined.push(glyph);
            }
        }
        outlined
    }

    fn ink_bounds(glyphs: &[OutlinedGlyph]) -> Option<Rect> {
        glyphs.iter().map(OutlinedGlyph::px_bounds).reduce(|acc, b| Rect {
            min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
            max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
        })
    }

    /// 测量文字墨迹尺寸
    pub fn measure(&self, text: &str) -> TextExtent {
        match Self::ink_bounds(&self.layout(text)) {
            Some(bounds) => TextExtent {
                width: (bounds.max.x - bounds.min.x).max(0.0) as u32,
                height: (bounds.max.y - bounds.min.y).max(0.0) as u32,
            },
            None => TextExtent::default(),
        }
    }

    /// 将文字栅格化为覆盖率遮罩
    pub fn rasterize(&self, text: &str) -> GlyphMask {
        let glyphs = self.layout(text);
        let Some(bounds) = Self::ink_bounds(&glyphs) else {
            return GlyphMask::default();
        };
        let width = (bounds.max.x - bounds.min.x).max(0.0) as u32;
        let height = (bounds.max.y - bounds.min.y).max(0.0) as u32;
        let Some(len) = (width as usize).checked_mul(height as usize) else {
            log::warn!("文字遮罩过大 ({}x{})，跳过绘制", width, height);
            return GlyphMask::default();
        };
        let mut data = vec![0u8; len];

        for glyph in &glyphs {
            let glyph_bounds = glyph.px_bounds();
            let offset_x = (glyph_bounds.min.x - bounds.min.x) as u32;
            let offset_y = (glyph_bounds.min.y - bounds.min.y) as u32;
            glyph.draw(|x, y, coverage| {
                let (px, py) = (offset_x.saturating_add(x), offset_y.saturating_add(y));
                if px < width && py < height {
                    let idx = py as usize * width as usize + px as usize;
                    let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    // 相邻字形可能重叠，取较大值
                    data[idx] = data[idx].max(value);
                }
            });
        }

        GlyphMask { width, height, data }
    }
}

/// 字号必须是有限的正数
fn check_size(px_per_em: f32) -> Result<()> {
    if px_per_em.is_finite() && px_per_em > 0.0 {
        Ok(())
    } else {
        Err(Error::Font(format!("无效的字号: {}", px_per_em)))
    }
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource")
            .field("px_per_em", &self.px_per_em)
            .finish()
    }
}

/// 默认字号的内置字体
pub fn default_font() -> Result<FontResource> {
    FontResource::builtin(DEFAULT_FONT_SIZE)
}
