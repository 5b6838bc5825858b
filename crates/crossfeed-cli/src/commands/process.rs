//! File-based crossfeed processing command.

use crate::wav::{StereoSamples, read_wav_stereo, write_wav_stereo};
use anyhow::Context;
use clap::Args;
use crossfeed_core::{
    ANGLE, AudioProcessor, CROSSFEED_GAIN, CrossfeedEngine, CrossfeedParams, OUTPUT_GAIN,
    ParamDescriptor, ProcessSpec, linear_to_db,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output gain in dB (-12 to 6)
    #[arg(long, default_value_t = OUTPUT_GAIN.default, allow_negative_numbers = true)]
    gain: f32,

    /// Crossfeed gain in dB (-9 to 0)
    #[arg(long, default_value_t = CROSSFEED_GAIN.default, allow_negative_numbers = true)]
    crossfeed: f32,

    /// Virtual speaker angle in degrees (30 to 90)
    #[arg(long, default_value_t = ANGLE.default)]
    angle: f32,

    /// Pass the audio through unprocessed
    #[arg(long)]
    bypass: bool,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Remove the engine latency so output lines up with input
    #[arg(long)]
    compensate_latency: bool,
}

/// Warn when a value will be clamped into its parameter range.
fn check_range(descriptor: &ParamDescriptor, value: f32) {
    if !descriptor.contains(value) {
        tracing::warn!(
            param = descriptor.short_name,
            value,
            min = descriptor.min,
            max = descriptor.max,
            "value out of range, clamping"
        );
    }
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be greater than 0");
    }
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("--bit-depth must be 16, 24 or 32, got {}", args.bit_depth);
    }

    // Read input file
    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;
    let frames = samples.len();

    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f32 / sample_rate
    );
    match spec.channels {
        1 => tracing::info!("mono input duplicated to both channels"),
        2 => {}
        n => tracing::info!(channels = n, "using the first two channels"),
    }
    if samples.is_empty() {
        anyhow::bail!("{} contains no audio", args.input.display());
    }

    // Configure engine
    check_range(&OUTPUT_GAIN, args.gain);
    check_range(&CROSSFEED_GAIN, args.crossfeed);
    check_range(&ANGLE, args.angle);

    let params = Arc::new(CrossfeedParams::default());
    params.set_gain_db(args.gain);
    params.set_crossfeed_db(args.crossfeed);
    params.set_angle_deg(args.angle);
    params.set_bypass(args.bypass);

    let mut engine = CrossfeedEngine::new(Arc::clone(&params));
    engine
        .prepare(ProcessSpec::stereo(sample_rate, args.block_size))
        .context("failed to prepare crossfeed engine")?;

    let snapshot = params.snapshot();
    tracing::info!(
        gain_db = snapshot.gain_db,
        crossfeed_db = snapshot.crossfeed_db,
        angle_deg = snapshot.angle_deg,
        bypass = snapshot.bypass,
        latency = engine.latency_samples(),
        block_size = args.block_size,
        "engine configured"
    );

    let input_stats = Stats::measure(&samples);

    // Extra silent frames flush the delayed tail out before the head is trimmed.
    let latency = if args.compensate_latency {
        engine.latency_samples()
    } else {
        0
    };
    samples.left.resize(frames + latency, 0.0);
    samples.right.resize(frames + latency, 0.0);

    // Process with progress bar
    println!("Processing...");
    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let block_size = args.block_size;
    let total = samples.len();
    for (i, (left, right)) in samples
        .left
        .chunks_mut(block_size)
        .zip(samples.right.chunks_mut(block_size))
        .enumerate()
    {
        engine.process_block(left, right);
        pb.set_position(((i + 1) * block_size).min(total) as u64);
    }
    pb.finish_with_message("done");
    engine.release();

    samples.left.drain(..latency);
    samples.right.drain(..latency);

    // Calculate stats
    let output_stats = Stats::measure(&samples);
    println!("\nStats:");
    println!("  Input:  {input_stats}");
    println!("  Output: {output_stats}");
    if latency > 0 {
        println!("  Latency compensated: {latency} samples");
    }

    // Write output file
    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &samples, spec.sample_rate, args.bit_depth)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

/// Level summary across both channels.
struct Stats {
    rms: f32,
    peak: f32,
}

impl Stats {
    fn measure(samples: &StereoSamples) -> Self {
        let all = || samples.left.iter().chain(samples.right.iter());
        let count = samples.left.len() + samples.right.len();
        let rms = if count == 0 {
            0.0
        } else {
            (all().map(|s| s * s).sum::<f32>() / count as f32).sqrt()
        };
        let peak = all().map(|s| s.abs()).fold(0.0, f32::max);
        Self { rms, peak }
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RMS {:.1} dB, Peak {:.1} dB",
            linear_to_db(self.rms),
            linear_to_db(self.peak)
        )
    }
}
