//! Integration tests for crossfeed-cli.
//!
//! Tests cover the CLI binary invocation and end-to-end file processing
//! workflows on WAV files in a temporary directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Helper to get the path to the `crossfeed` binary built by cargo.
fn crossfeed_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_crossfeed"))
}

fn write_float_wav(path: &Path, channels: u16, sample_rate: u32, interleaved: &[f32]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in interleaved {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

/// Reads a float WAV back as (spec, left, right).
fn read_stereo(path: &Path) -> (hound::WavSpec, Vec<f32>, Vec<f32>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
    let left = samples.iter().step_by(2).copied().collect();
    let right = samples.iter().skip(1).step_by(2).copied().collect();
    (spec, left, right)
}

/// Interleaved stereo with an impulse on the left channel at `at`.
fn left_impulse(frames: usize, at: usize) -> Vec<f32> {
    let mut data = vec![0.0f32; frames * 2];
    data[at * 2] = 1.0;
    data
}

fn sine_stereo(frames: usize) -> Vec<f32> {
    (0..frames)
        .flat_map(|i| {
            let t = i as f32 / 44100.0;
            [
                (std::f32::consts::TAU * 440.0 * t).sin() * 0.5,
                (std::f32::consts::TAU * 660.0 * t).sin() * 0.3,
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// `crossfeed info`
// ---------------------------------------------------------------------------

#[test]
fn cli_info_lists_parameters_and_latency() {
    let output = crossfeed_bin()
        .arg("info")
        .output()
        .expect("failed to run crossfeed info");
    assert!(output.status.success(), "crossfeed info failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["Gain", "Crossfeed Gain", "Angle", "Bypass"] {
        assert!(stdout.contains(name), "info should list '{name}'");
    }
    assert!(stdout.contains("At 44100 Hz"));
    assert!(stdout.contains("10 samples"), "latency at 44.1 kHz:\n{stdout}");
    assert!(stdout.contains("5..14 samples"), "ITD range at 44.1 kHz:\n{stdout}");
}

#[test]
fn cli_info_at_96k() {
    let output = crossfeed_bin()
        .args(["info", "--sample-rate", "96000"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("21 samples"), "{stdout}");
}

#[test]
fn cli_info_rejects_zero_rate() {
    let output = crossfeed_bin()
        .args(["info", "--sample-rate", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_info_rejects_rate_below_cutoff_nyquist() {
    let output = crossfeed_bin()
        .args(["info", "--sample-rate", "700"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot prepare at 700 Hz"), "{stderr}");
}

// ---------------------------------------------------------------------------
// `crossfeed process`
// ---------------------------------------------------------------------------

#[test]
fn cli_process_writes_stereo_of_same_length() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_float_wav(&input, 2, 44100, &sine_stereo(4410));

    let result = crossfeed_bin()
        .args(["process"])
        .arg(&input)
        .arg(&output)
        .output()
        .unwrap();
    assert!(
        result.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let (spec, left, right) = read_stereo(&output);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(left.len(), 4410);
    assert_eq!(right.len(), 4410);
    assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Stats:"));
}

#[test]
fn cli_process_output_carries_latency() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("impulse.wav");
    let output = dir.path().join("out.wav");
    write_float_wav(&input, 2, 44100, &left_impulse(1000, 100));

    let result = crossfeed_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .output()
        .unwrap();
    assert!(result.status.success());

    let (_, left, _) = read_stereo(&output);
    let first = left.iter().position(|&s| s != 0.0).unwrap();
    assert_eq!(first, 110);
}

#[test]
fn cli_process_compensates_latency() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("impulse.wav");
    let output = dir.path().join("out.wav");
    write_float_wav(&input, 2, 44100, &left_impulse(1000, 100));

    let result = crossfeed_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .arg("--compensate-latency")
        .output()
        .unwrap();
    assert!(result.status.success());

    let (_, left, right) = read_stereo(&output);
    assert_eq!(left.len(), 1000);
    assert_eq!(right.len(), 1000);
    let first = left.iter().position(|&s| s != 0.0).unwrap();
    assert_eq!(first, 100);
}

#[test]
fn cli_process_bypass_is_transparent() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    let data = sine_stereo(2000);
    write_float_wav(&input, 2, 44100, &data);

    let result = crossfeed_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .arg("--bypass")
        .output()
        .unwrap();
    assert!(result.status.success());

    let (_, left, right) = read_stereo(&output);
    let interleaved: Vec<f32> = left
        .iter()
        .zip(right.iter())
        .flat_map(|(&l, &r)| [l, r])
        .collect();
    assert_eq!(interleaved, data);
}

#[test]
fn cli_process_mono_input_gives_identical_channels() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("mono.wav");
    let output = dir.path().join("out.wav");
    let mono: Vec<f32> = (0..3000)
        .map(|i| (i as f32 * 0.05).sin() * 0.4)
        .collect();
    write_float_wav(&input, 1, 48000, &mono);

    let result = crossfeed_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--angle", "80", "--crossfeed=-3", "--block-size", "100"])
        .output()
        .unwrap();
    assert!(result.status.success());

    let (spec, left, right) = read_stereo(&output);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(left, right);
}

#[test]
fn cli_process_16bit_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_float_wav(&input, 2, 44100, &sine_stereo(1000));

    let result = crossfeed_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--bit-depth", "16", "--gain", "-6"])
        .output()
        .unwrap();
    assert!(result.status.success());

    let reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 16);
    assert_eq!(reader.spec().sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration(), 1000);
}

#[test]
fn cli_process_rejects_bad_arguments() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_float_wav(&input, 2, 44100, &sine_stereo(100));

    let bad_depth = crossfeed_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--bit-depth", "8"])
        .output()
        .unwrap();
    assert!(!bad_depth.status.success());

    let zero_block = crossfeed_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--block-size", "0"])
        .output()
        .unwrap();
    assert!(!zero_block.status.success());

    let missing = crossfeed_bin()
        .arg("process")
        .arg(dir.path().join("missing.wav"))
        .arg(&output)
        .output()
        .unwrap();
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("failed to read"));
}
