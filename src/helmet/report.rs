//! 检测结果的文字报告
//!
//! 对应演示页面上的"判定"和"详情"两部分：一段简短的判定摘要，
//! 以及包含全部边界框的JSON详情。元数据 `raw` 不出现在详情中。

use serde_json::{json, Value};

use crate::helmet::bounds::DetectionResult;

/// 进度条使用的整数置信度 (0 - 100)，向下取整
pub fn confidence_percent(result: &DetectionResult) -> u8 {
    result.confidence().clamp(0.0, 100.0) as u8
}

/// 判定摘要
pub fn summary(result: &DetectionResult) -> String {
    format!(
        "Decision: {}\nConfidence: {:.0} / 100",
        result.label(),
        result.confidence()
    )
}

/// JSON详情
pub fn details(result: &DetectionResult) -> Value {
    json!({
        "label": result.label(),
        "confidence": result.confidence(),
        "boxes": result.boxes(),
    })
}
