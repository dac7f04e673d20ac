pub mod config;
pub mod error;
pub mod helmet;

// 重新导出helmet模块中的常用类型和函数
pub use error::{Error, Result};
pub use helmet::{BoundingBox, DetectionResult, RawMetadata};
pub use helmet::{HelmetDetector, PlaceholderDetector, DetectorKind, DetectorSettings, build_detector};
pub use helmet::{Annotator, AnnotatorStyle, FontResource, draw_detections};
pub use helmet::{decode_image, load_image, save_image};
