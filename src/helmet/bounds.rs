use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};

/// 检测器附带的实现相关元数据，标注绘制时不读取
pub type RawMetadata = BTreeMap<String, serde_json::Value>;

/// 边界框结构
///
/// 表示一个检测到的目标：矩形区域（像素坐标，包含端点）、类别名称和得分。
/// 构造后不可修改。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    label: String,
    score: f32,
}

impl BoundingBox {
    /// 创建一个新的边界框
    ///
    /// # 参数
    /// * `x1`, `y1` - 左上角坐标
    /// * `x2`, `y2` - 右下角坐标
    /// * `label` - 类别名称，例如 "helmet"
    /// * `score` - 得分，范围 [0, 1]
    ///
    /// # 错误处理
    /// 坐标顺序错误返回 `Error::InvalidBox`，得分越界返回 `Error::ScoreOutOfRange`
    pub fn new(
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        label: impl Into<String>,
        score: f32,
    ) -> Result<Self> {
        if x1 > x2 || y1 > y2 {
            return Err(Error::InvalidBox { x1, y1, x2, y2 });
        }
        if !(0.0..=1.0).contains(&score) {
            return Err(Error::ScoreOutOfRange(score));
        }
        Ok(Self { x1, y1, x2, y2, label: label.into(), score })
    }

    /// 创建边界框，并把坐标限制在 `width` x `height` 的图像范围内
    #[allow(clippy::too_many_arguments)]
    pub fn clamped(
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        label: impl Into<String>,
        score: f32,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImage { width, height });
        }
        let (max_x, max_y) = (width - 1, height - 1);
        Self::new(
            x1.min(max_x),
            y1.min(max_y),
            x2.min(max_x),
            y2.min(max_y),
            label,
            score,
        )
    }

    pub fn x1(&self) -> u32 {
        self.x1
    }

    pub fn y1(&self) -> u32 {
        self.y1
    }

    pub fn x2(&self) -> u32 {
        self.x2
    }

    pub fn y2(&self) -> u32 {
        self.y2
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// 边界框覆盖的像素列数
    pub fn width(&self) -> u32 {
        (self.x2 - self.x1).saturating_add(1)
    }

    /// 边界框覆盖的像素行数
    pub fn height(&self) -> u32 {
        (self.y2 - self.y1).saturating_add(1)
    }

    /// 中心点坐标
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x1 as f64 + self.x2 as f64) as f32 / 2.0,
            (self.y1 as f64 + self.y2 as f64) as f32 / 2.0,
        )
    }
}

/// 检测结果结构
///
/// 一次检测调用的完整输出：整体判定、整体置信度（0-100，与边界框得分的
/// 0-1 量纲不同）、按绘制顺序排列的边界框，以及检测器自定义的元数据。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    label: String,
    confidence: f32,
    boxes: Vec<BoundingBox>,
    raw: RawMetadata,
}

impl DetectionResult {
    /// 创建一个新的检测结果
    ///
    /// # 错误处理
    /// 置信度不在 [0, 100] 范围内时返回 `Error::ConfidenceOutOfRange`
    pub fn new(
        label: impl Into<String>,
        confidence: f32,
        boxes: Vec<BoundingBox>,
        raw: RawMetadata,
    ) -> Result<Self> {
        if !(0.0..=100.0).contains(&confidence) {
            return Err(Error::ConfidenceOutOfRange(confidence));
        }
        Ok(Self { label: label.into(), confidence, boxes, raw })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn raw(&self) -> &RawMetadata {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
