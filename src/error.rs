//! 错误类型

use thiserror::Error;

/// 检测与标注过程中可能出现的错误
#[derive(Debug, Error)]
pub enum Error {
    /// 图像宽或高为0
    #[error("无效图像: 尺寸为 {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// 检测器输出了无法识别的类别，留给真实模型使用
    #[error("不支持的类别标签: {0}")]
    UnsupportedLabel(String),

    #[error("边界框坐标顺序错误: ({x1}, {y1}, {x2}, {y2})")]
    InvalidBox { x1: u32, y1: u32, x2: u32, y2: u32 },

    #[error("边界框得分超出 [0, 1] 范围: {0}")]
    ScoreOutOfRange(f32),

    #[error("整体置信度超出 [0, 100] 范围: {0}")]
    ConfidenceOutOfRange(f32),

    #[error("未知的检测器: {0}")]
    UnknownDetector(String),

    #[error("不支持的图像格式: {0}")]
    UnsupportedFormat(String),

    #[error("图像编解码失败: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("字体加载失败: {0}")]
    Font(String),
}

pub type Result<T> = std::result::Result<T, Error>;
