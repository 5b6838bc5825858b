//! Display parameters and the filter values derived at a sample rate.

use anyhow::Context;
use clap::Args;
use crossfeed_core::{AudioProcessor, CrossfeedEngine, DESCRIPTORS, ParamUnit, ProcessSpec};

/// Display engine information.
#[derive(Args)]
pub struct InfoArgs {
    /// Sample rate to derive filter values at
    #[arg(long, default_value = "44100")]
    pub sample_rate: u32,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let sample_rate = args.sample_rate as f32;
    let mut engine = CrossfeedEngine::default();
    engine
        .prepare(ProcessSpec::stereo(sample_rate, 512))
        .with_context(|| format!("cannot prepare at {} Hz", args.sample_rate))?;

    println!("Parameters:");
    println!(
        "  {:<16} {:<8} {:>8} {:>8} {:>8}",
        "Name", "ID", "Min", "Max", "Default"
    );
    for d in DESCRIPTORS {
        let (min, max, default) = match d.unit {
            ParamUnit::Toggle => (
                "off".to_string(),
                "on".to_string(),
                if d.default > 0.5 { "on" } else { "off" }.to_string(),
            ),
            unit => (
                format!("{:.1}{}", d.min, unit.suffix()),
                format!("{:.1}{}", d.max, unit.suffix()),
                format!("{:.1}{}", d.default, unit.suffix()),
            ),
        };
        println!(
            "  {:<16} {:<8} {:>8} {:>8} {:>8}",
            d.name, d.short_name, min, max, default
        );
    }

    let config = engine.config();
    let latency = engine.latency_samples();
    let (itd_min, itd_max) = engine.itd_range();
    let to_ms = |samples: usize| samples as f32 * 1000.0 / sample_rate;

    println!("\nAt {} Hz:", args.sample_rate);
    println!("  Crossfeed cutoff: {} Hz", config.cutoff_hz);
    println!("  Lowpass pole:     {:.6}", engine.lowpass_pole());
    println!(
        "  Latency:          {} samples ({:.3} ms)",
        latency,
        to_ms(latency)
    );
    println!(
        "  ITD range:        {}..{} samples ({:.3}..{:.3} ms)",
        itd_min,
        itd_max,
        to_ms(itd_min),
        to_ms(itd_max)
    );

    engine.release();
    Ok(())
}
