//! Helmet模块 - 头盔佩戴检测与结果标注
//!
//! 该模块提供：
//! - 检测结果数据结构（边界框、整体判定）
//! - 可替换的检测器接口及占位实现
//! - 在图像上绘制边框和标签
//! - 上传图像的解码与结果报告
//!
//! # 工作流程
//!
//! 1. 使用load_image或decode_image得到RGB图像
//! 2. 创建检测器并调用detect得到DetectionResult
//! 3. 使用Annotator::annotate（或draw_detections）绘制结果
//!
//! # 示例
//!
//! ```
//! use helmet_detect::{Annotator, HelmetDetector, PlaceholderDetector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = image::RgbImage::new(200, 100);
//! let detector = PlaceholderDetector::new();
//! let result = detector.detect(&image)?;
//!
//! let annotator = Annotator::with_default_font()?;
//! let annotated = annotator.annotate(&image, &result);
//! assert_eq!(annotated.dimensions(), (200, 100));
//! # Ok(())
//! # }
//! ```

pub mod bounds;
pub mod detect;
pub mod draw;
pub mod font;
pub mod image;
pub mod report;

// 重新导出常用类型和函数
pub use bounds::{BoundingBox, DetectionResult, RawMetadata};
pub use detect::{build_detector, center_box, DetectorKind, DetectorSettings, HelmetDetector, PlaceholderDetector};
pub use draw::{draw_detections, label_text, Annotator, AnnotatorStyle};
pub use font::{FontResource, GlyphMask, TextExtent};
pub use self::image::{decode_image, encode_png, load_image, save_image};
