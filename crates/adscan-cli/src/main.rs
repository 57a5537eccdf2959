//! adscan: scan a video file for advertisement segments.
//!
//! Wires the detection pipeline to the terminal: probe the input, load
//! the classifier, run detection, print the per-scene score table and
//! the final ad ranges.

mod cli;

use adscan_detect::{
    detect_ad_segments, CancelToken, DecisionParams, DetectConfig, FrameClassifier,
    ModelRegistry, OnnxFrameClassifier, ScoreMode, ScoreOptions, SegmenterConfig,
};
use adscan_media::FfmpegSourceFactory;
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();

    let factory = FfmpegSourceFactory::new(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let probe = factory.probe();
    info!(
        duration = probe.duration_secs,
        width = probe.width,
        height = probe.height,
        %probe.frame_rate,
        "Scanning video"
    );

    let registry = ModelRegistry::new();
    let classifier = registry.get_or_load(&args.model_name, || {
        let classifier = OnnxFrameClassifier::load(&args.model, &args.model_name)?
            .with_input_name(&args.model_input);
        Ok(Arc::new(classifier) as Arc<dyn FrameClassifier>)
    })?;

    let config = DetectConfig {
        segmenter: SegmenterConfig {
            change_threshold: args.scene_threshold,
            min_scene_frames: args.min_scene_frames,
            sample_step: None,
        },
        score: ScoreOptions {
            sample_interval: args.interval,
            mode: if args.weighted {
                ScoreMode::TimeWeighted
            } else {
                ScoreMode::Unweighted
            },
        },
        decision: DecisionParams {
            base_threshold: args.base_threshold,
            boost: args.boost,
        },
        threads: args.threads,
    };

    let report = detect_ad_segments(
        &factory,
        classifier.as_ref(),
        &config,
        &CancelToken::new(),
    )?;

    if args.json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &report.score_rows())?;
        println!();
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &adscan_detect::AdReport) {
    println!("{:>3}  {:>9} – {:<9}  {:>6}  {}", "#", "start", "end", "score", "verdict");
    for (i, row) in report.score_rows().iter().enumerate() {
        println!(
            "{:>3}  {:>9} – {:<9}  {:>6.1}  {}",
            i,
            format_time(row.start),
            format_time(row.end),
            row.score,
            if row.is_ad { "AD" } else { "" }
        );
    }
    println!();
    if report.ad_ranges.is_empty() {
        println!("No advertisement segments detected.");
    } else {
        println!(
            "{} ad segment(s), {} total:",
            report.ad_ranges.len(),
            format_time(report.total_ad_seconds())
        );
        for range in &report.ad_ranges {
            println!(
                "  {} – {}",
                format_time(range.start.to_seconds_f64()),
                format_time(range.end.to_seconds_f64())
            );
        }
    }
}

/// Format seconds as `MM:SS` (or `H:MM:SS` past an hour).
fn format_time(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
