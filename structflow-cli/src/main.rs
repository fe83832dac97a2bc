use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use structflow::image::io::{load_image, save_image};
use structflow::{
    describe_keypoints, draw_flow, mark_corners, FlowConfig, FlowEstimator, HarrisConfig,
    HarrisDetector, Image, Keypoint,
};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "StructFlow CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Mode {
    #[default]
    Corners,
    Flow,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct HarrisConfigJson {
    sigma: f32,
    threshold: f32,
    nms_radius: usize,
    parallel: bool,
}

impl Default for HarrisConfigJson {
    fn default() -> Self {
        let cfg = HarrisConfig::default();
        Self {
            sigma: cfg.sigma,
            threshold: cfg.threshold,
            nms_radius: cfg.nms_radius,
            parallel: cfg.parallel,
        }
    }
}

impl From<&HarrisConfigJson> for HarrisConfig {
    fn from(value: &HarrisConfigJson) -> Self {
        Self {
            sigma: value.sigma,
            threshold: value.threshold,
            nms_radius: value.nms_radius,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FlowConfigJson {
    smooth_window: usize,
    stride: usize,
    max_speed: f32,
    post_sigma: f32,
    parallel: bool,
    draw_scale: f32,
}

impl Default for FlowConfigJson {
    fn default() -> Self {
        let cfg = FlowConfig::default();
        Self {
            smooth_window: cfg.smooth_window,
            stride: cfg.stride,
            max_speed: cfg.max_speed,
            post_sigma: cfg.post_sigma,
            parallel: cfg.parallel,
            draw_scale: cfg.smooth_window as f32,
        }
    }
}

impl From<&FlowConfigJson> for FlowConfig {
    fn from(value: &FlowConfigJson) -> Self {
        Self {
            smooth_window: value.smooth_window,
            stride: value.stride,
            max_speed: value.max_speed,
            post_sigma: value.post_sigma,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    mode: Mode,
    image_path: String,
    previous_path: Option<String>,
    output_path: Option<String>,
    overlay_path: Option<String>,
    harris: HarrisConfigJson,
    flow: FlowConfigJson,
}

#[derive(Debug, Serialize)]
struct CornerRecord {
    x: usize,
    y: usize,
    score: f32,
}

impl From<Keypoint> for CornerRecord {
    fn from(value: Keypoint) -> Self {
        Self {
            x: value.x,
            y: value.y,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct CornersOutput {
    count: usize,
    corners: Vec<CornerRecord>,
}

#[derive(Debug, Serialize)]
struct FlowOutput {
    width: usize,
    height: usize,
    stride: usize,
    vx: Vec<f32>,
    vy: Vec<f32>,
}

/// Promotes a grayscale frame to RGB so overlays can be drawn in color.
fn to_rgb(image: &Image) -> Image {
    if image.channels() == 3 {
        return image.clone();
    }
    Image::from_fn(image.width(), image.height(), 3, |x, y, _| {
        image.get(x as isize, y as isize, 0)
    })
}

fn run_corners(config: &Config, image: &Image) -> Result<String, Box<dyn std::error::Error>> {
    let detector = HarrisDetector::new(HarrisConfig::from(&config.harris))?;
    let keypoints = detector.keypoints(image)?;
    tracing::info!(count = keypoints.len(), "corners detected");

    if let Some(path) = &config.overlay_path {
        let descriptors = describe_keypoints(image, &keypoints);
        let mut overlay = to_rgb(image);
        mark_corners(&mut overlay, &descriptors);
        save_image(&overlay, path)?;
    }

    let output = CornersOutput {
        count: keypoints.len(),
        corners: keypoints.into_iter().map(CornerRecord::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn run_flow(config: &Config, image: &Image) -> Result<String, Box<dyn std::error::Error>> {
    let Some(previous_path) = &config.previous_path else {
        return Err("previous_path must be set in flow mode".into());
    };
    let previous = load_image(previous_path)?;
    let estimator = FlowEstimator::new(FlowConfig::from(&config.flow))?;
    let field = estimator.compute(image, &previous)?;
    tracing::info!(width = field.width(), height = field.height(), "flow computed");

    if let Some(path) = &config.overlay_path {
        let mut overlay = to_rgb(image);
        draw_flow(&mut overlay, &field, config.flow.draw_scale)?;
        save_image(&overlay, path)?;
    }

    let output = FlowOutput {
        width: field.width(),
        height: field.height(),
        stride: config.flow.stride,
        vx: field.channel(0).unwrap_or_default().to_vec(),
        vy: field.channel(1).unwrap_or_default().to_vec(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("structflow=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let image = load_image(&config.image_path)?;
    let json = match config.mode {
        Mode::Corners => run_corners(&config, &image)?,
        Mode::Flow => run_flow(&config, &image)?,
    };

    match &config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
