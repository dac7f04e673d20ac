use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use helmet_detect::config::{
    DEFAULT_CONFIDENCE, DEFAULT_DECISION_LABEL, DEFAULT_FONT_SIZE, FONT_SIZE_RANGE,
};
use helmet_detect::helmet::report;
use helmet_detect::{
    build_detector, load_image, save_image, Annotator, DetectorKind, DetectorSettings,
    FontResource,
};

#[derive(Parser, Debug)]
#[command(name = "helmet-detect")]
#[command(about = "检测骑手是否佩戴头盔，并在图像上标注结果")]
struct Args {
    /// 输入图像 (jpg, jpeg, png, bmp, webp)
    input: PathBuf,

    /// 标注结果的保存路径，默认为 <输入文件名>_annotated.png
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 标签字体文件，不可用时使用内置字体
    #[arg(long)]
    font: Option<PathBuf>,

    /// 标签字号（每em像素数）
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE, value_parser = parse_font_size)]
    font_size: f32,

    /// 检测器
    #[arg(long, default_value = "placeholder")]
    detector: DetectorKind,

    /// 占位检测器的判定文本
    #[arg(long, default_value = DEFAULT_DECISION_LABEL)]
    label: String,

    /// 占位检测器的置信度 (0 - 100)
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f32,

    /// 同时输出JSON格式的检测详情
    #[arg(long)]
    json: bool,
}

fn parse_font_size(s: &str) -> std::result::Result<f32, String> {
    let size: f32 = s.parse().map_err(|_| format!("不是有效的数字: {}", s))?;
    let (min, max) = FONT_SIZE_RANGE;
    if (min..=max).contains(&size) {
        Ok(size)
    } else {
        Err(format!("字号必须在 {} 到 {} 之间", min, max))
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}_annotated.png", stem))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let image = load_image(&args.input)
        .with_context(|| format!("无法加载图像 {}", args.input.display()))?;
    log::info!("图像已加载: {}x{}", image.width(), image.height());

    let settings = DetectorSettings {
        label: args.label.clone(),
        confidence: args.confidence,
    };
    let detector = build_detector(args.detector, &settings);
    let result = detector
        .detect(&image)
        .with_context(|| format!("检测器 {} 执行失败", detector.name()))?;
    log::info!("检测到 {} 个目标", result.boxes().len());

    let font = FontResource::load_or_default(args.font.as_deref(), args.font_size)?;
    let annotated = Annotator::new(font).annotate(&image, &result);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    save_image(&annotated, &output)
        .with_context(|| format!("无法保存结果 {}", output.display()))?;
    log::info!("结果已保存到: {}", output.display());

    println!("{}", report::summary(&result));
    println!("Progress: {}%", report::confidence_percent(&result));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report::details(&result))?);
    }

    Ok(())
}
