//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "adscan",
    author,
    version,
    about = "AdScan: find advertisement segments in recorded video"
)]
pub struct Cli {
    /// Video file to scan
    #[arg(required = true, value_name = "VIDEO")]
    pub input: PathBuf,

    /// Path to the ad classifier ONNX model
    #[arg(short, long, value_name = "MODEL_PATH")]
    pub model: PathBuf,

    /// Name the model is registered under (used in logs)
    #[arg(long, value_name = "NAME", default_value = "ad-classifier")]
    pub model_name: String,

    /// Graph input name of the ONNX model
    #[arg(long, value_name = "NAME", default_value = "input")]
    pub model_input: String,

    // --- Segmentation ---
    /// Scene change threshold on a 0-100 scale
    #[arg(long, value_name = "SCORE", default_value_t = 65.0)]
    pub scene_threshold: f64,

    /// Minimum scene length in frames
    #[arg(long, value_name = "FRAMES", default_value_t = 15)]
    pub min_scene_frames: u64,

    // --- Scoring ---
    /// Seconds between classified samples within a scene
    #[arg(long, value_name = "SECONDS", default_value_t = 0.5)]
    pub interval: f64,

    /// Weight samples by their position in the scene (later = heavier)
    #[arg(long)]
    pub weighted: bool,

    /// Worker threads for scene scoring (default: min(cpu count, 4))
    #[arg(long, value_name = "COUNT")]
    pub threads: Option<usize>,

    // --- Decision ---
    /// Base ad score threshold
    #[arg(long, value_name = "SCORE", default_value_t = 12.5)]
    pub base_threshold: f64,

    /// Threshold reduction next to scenes over the base threshold
    #[arg(long, value_name = "SCORE", default_value_t = 10.0)]
    pub boost: f64,

    // --- Output ---
    /// Emit the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
