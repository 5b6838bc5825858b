//! Stereo WAV file reading and writing.

use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Error types for WAV I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output bit depth other than 16, 24 or 32.
    #[error("unsupported bit depth {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),
}

/// Result alias for WAV I/O.
pub type Result<T> = std::result::Result<T, Error>;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of channels in the file.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is written as float).
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Split-channel stereo audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Duplicates a mono signal to both channels.
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
        }
    }

    /// Takes the first two channels of interleaved frames.
    ///
    /// A single-channel stream is duplicated.
    pub fn from_interleaved(samples: &[f32], channels: usize) -> Self {
        let frames = samples.len() / channels;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for frame in samples.chunks_exact(channels) {
            left.push(frame[0]);
            right.push(frame.get(1).copied().unwrap_or(frame[0]));
        }
        Self { left, right }
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Read a WAV file as stereo.
///
/// Mono files are duplicated to both channels. Files with more than two
/// channels use the first two. The returned spec describes the file as found
/// on disk.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let stereo = match spec.channels {
        1 => StereoSamples::from_mono(interleaved),
        n => StereoSamples::from_interleaved(&interleaved, usize::from(n)),
    };

    Ok((stereo, spec))
}

/// Write stereo samples to a WAV file at the given rate and bit depth.
///
/// Integer formats are clamped to full scale.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    sample_rate: u32,
    bits_per_sample: u16,
) -> Result<()> {
    if !matches!(bits_per_sample, 16 | 24 | 32) {
        return Err(Error::UnsupportedBitDepth(bits_per_sample));
    }

    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample,
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if bits_per_sample == 32 {
        for (&l, &r) in samples.left.iter().zip(samples.right.iter()) {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
    } else {
        let max_val = (1i32 << (bits_per_sample - 1)) as f32;
        let quantize = |x: f32| (x * max_val).clamp(-max_val, max_val - 1.0) as i32;
        for (&l, &r) in samples.left.iter().zip(samples.right.iter()) {
            writer.write_sample(quantize(l))?;
            writer.write_sample(quantize(r))?;
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_raw(path: &Path, channels: u16, frames: &[f32]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in frames {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_stereo_roundtrip_f32() {
        let left: Vec<f32> = (0..500).map(|i| (i as f32 / 50.0).sin()).collect();
        let right: Vec<f32> = left.iter().map(|x| -x * 0.5).collect();
        let samples = StereoSamples { left, right };

        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, 48000, 32).unwrap();
        let (loaded, spec) = read_wav_stereo(file.path()).unwrap();

        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(loaded, samples);
    }

    #[test]
    fn test_stereo_roundtrip_16bit() {
        let samples = StereoSamples {
            left: vec![0.5, -0.25, 0.0],
            right: vec![-0.5, 0.25, 0.999],
        };
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, 44100, 16).unwrap();
        let (loaded, spec) = read_wav_stereo(file.path()).unwrap();

        assert_eq!(spec.bits_per_sample, 16);
        for (a, b) in loaded.left.iter().zip(samples.left.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
        for (a, b) in loaded.right.iter().zip(samples.right.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_mono_is_duplicated() {
        let file = NamedTempFile::new().unwrap();
        write_raw(file.path(), 1, &[0.1, 0.2, 0.3]);
        let (loaded, spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(spec.channels, 1);
        assert_eq!(loaded.left, [0.1, 0.2, 0.3]);
        assert_eq!(loaded.left, loaded.right);
    }

    #[test]
    fn test_multichannel_uses_first_two() {
        let file = NamedTempFile::new().unwrap();
        write_raw(file.path(), 4, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let (loaded, _) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(loaded.left, [1.0, 5.0]);
        assert_eq!(loaded.right, [2.0, 6.0]);
    }

    #[test]
    fn test_rejects_unsupported_bit_depth() {
        let file = NamedTempFile::new().unwrap();
        let samples = StereoSamples {
            left: vec![0.0],
            right: vec![0.0],
        };
        let err = write_wav_stereo(file.path(), &samples, 44100, 8).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBitDepth(8)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_wav_stereo("/nonexistent/input.wav").is_err());
    }
}
