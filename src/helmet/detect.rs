use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use serde_json::json;

use crate::config::{
    BOX_SIZE_RATIO, DEFAULT_CONFIDENCE, DEFAULT_DECISION_LABEL, HELMET_CLASS_LABEL,
    PLACEHOLDER_NOTE,
};
use crate::error::{Error, Result};
use crate::helmet::bounds::{BoundingBox, DetectionResult, RawMetadata};

/// 头盔检测器接口
///
/// 给定一张RGB图像，输出一次检测结果。实现必须是纯函数：
/// 相同配置下同一张图像总是得到相同的结果。
pub trait HelmetDetector: Send + Sync {
    /// 检测器名称，用于日志和元数据
    fn name(&self) -> &str;

    /// 对图像执行检测
    ///
    /// # 错误处理
    /// 图像宽或高为0时返回 `Error::InvalidImage`
    fn detect(&self, image: &RgbImage) -> Result<DetectionResult>;
}

/// 占位检测器
///
/// 不做任何推理，总是返回一个位于图像中心、边长为短边一半的边界框，
/// 以及固定的判定和置信度。
///
/// # 示例
///
/// ```
/// use helmet_detect::{HelmetDetector, PlaceholderDetector};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let image = image::RgbImage::new(200, 100);
/// let detector = PlaceholderDetector::new().with_confidence(80.0);
/// let result = detector.detect(&image)?;
/// assert_eq!(result.boxes().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderDetector {
    /// 整体判定文本
    label: String,
    /// 整体置信度 (0 - 100)
    confidence: f32,
}

impl PlaceholderDetector {
    pub fn new() -> Self {
        Self {
            label: DEFAULT_DECISION_LABEL.to_string(),
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    /// 设置整体判定文本
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// 设置整体置信度 (0 - 100)
    ///
    /// 越界的值不会在这里报错，而是在 `detect` 时返回 `Error::ConfidenceOutOfRange`
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl Default for PlaceholderDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// 计算位于图像中心、边长为短边一半的方框
///
/// 返回 (x1, y1, x2, y2)，坐标已限制在图像范围内
pub fn center_box(width: u32, height: u32) -> (u32, u32, u32, u32) {
    let size = (width.min(height) as f64 * BOX_SIZE_RATIO).floor() as u32;
    let (cx, cy) = (width / 2, height / 2);
    let x1 = cx.saturating_sub(size / 2);
    let y1 = cy.saturating_sub(size / 2);
    let x2 = (x1 + size).min(width.saturating_sub(1));
    let y2 = (y1 + size).min(height.saturating_sub(1));
    (x1, y1, x2, y2)
}

impl HelmetDetector for PlaceholderDetector {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn detect(&self, image: &RgbImage) -> Result<DetectionResult> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidImage { width, height });
        }

        let (x1, y1, x2, y2) = center_box(width, height);
        let score = self.confidence / 100.0;
        if !(0.0..=1.0).contains(&score) {
            return Err(Error::ConfidenceOutOfRange(self.confidence));
        }
        let bbox = BoundingBox::clamped(x1, y1, x2, y2, HELMET_CLASS_LABEL, score, width, height)?;
        log::debug!(
            "占位检测: 图像 {}x{} -> 边界框 ({}, {}, {}, {})",
            width, height, x1, y1, x2, y2
        );

        let mut raw = RawMetadata::new();
        raw.insert("note".to_string(), json!(PLACEHOLDER_NOTE));
        raw.insert("detector".to_string(), json!(self.name()));

        DetectionResult::new(self.label.clone(), self.confidence, vec![bbox], raw)
    }
}

/// 可选的检测器种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorKind {
    #[default]
    Placeholder,
}

impl FromStr for DetectorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" | "dummy" => Ok(DetectorKind::Placeholder),
            other => Err(Error::UnknownDetector(other.to_string())),
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorKind::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// 构造检测器时使用的通用参数
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorSettings {
    pub label: String,
    pub confidence: f32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            label: DEFAULT_DECISION_LABEL.to_string(),
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

/// 根据种类构造检测器
pub fn build_detector(kind: DetectorKind, settings: &DetectorSettings) -> Box<dyn HelmetDetector> {
    match kind {
        DetectorKind::Placeholder => Box::new(
            PlaceholderDetector::new()
                .with_label(settings.label.clone())
                .with_confidence(settings.confidence),
        ),
    }
}
