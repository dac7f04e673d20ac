// 占位检测器配置
pub const HELMET_CLASS_LABEL: &str = "helmet";
pub const DEFAULT_DECISION_LABEL: &str = "Wearing Helmet";
pub const DEFAULT_CONFIDENCE: f32 = 92.0;
pub const BOX_SIZE_RATIO: f64 = 0.5;
pub const PLACEHOLDER_NOTE: &str = "This is a dummy output. Replace with real model integration.";

// 标注绘制配置
pub const STROKE_WIDTH: u32 = 4;
pub const LABEL_PADDING: u32 = 4;
pub const LABEL_BACKGROUND_ALPHA: u8 = 80;
pub const POSITIVE_COLOR: [u8; 3] = [34, 197, 94];  // 绿色 - helmet类别
pub const NEGATIVE_COLOR: [u8; 3] = [239, 68, 68];  // 红色 - 其他类别
pub const TEXT_COLOR: [u8; 3] = [255, 255, 255];
pub const DEFAULT_FONT_SIZE: f32 = 14.0;
pub const FONT_SIZE_RANGE: (f32, f32) = (1.0, 512.0);  // 命令行允许的字号范围

// 可接受的上传图像格式
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];
