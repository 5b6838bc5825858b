//! Integer-sample delay lines.
//!
//! Provides a circular-buffer delay line with independent read and write
//! cursors, and a multi-channel wrapper that applies one delay length to every
//! channel. The engine uses two [`MultiChannelDelay`]s: one fixed-length line
//! that compensates the lowpass group delay on the dry path, and one whose
//! length tracks the steering angle (interaural time difference).
//!
//! # Types
//!
//! - [`DelayLine`] - Single channel, integer delay, push/pop interface
//! - [`MultiChannelDelay`] - One `DelayLine` per channel, delay in samples or seconds
//!
//! # Cursor layout
//!
//! Both cursors move *downwards* through the buffer, wrapping from 0 to
//! `capacity - 1`. The delay is encoded once, in their distance:
//!
//! ```text
//! read_pos = (write_pos + delay) % capacity
//! ```
//!
//! so the per-sample path is one store, one load and two decrements with no
//! offset arithmetic.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;
use libm::{ceilf, floorf};

use crate::{PrepareError, ProcessSpec};

/// Default maximum delay of a [`MultiChannelDelay`] before it is configured.
pub const DEFAULT_MAX_DELAY_SAMPLES: usize = 150;

/// Single-channel circular delay line with integer delay.
///
/// Interleaving [`push`](Self::push) and [`pop`](Self::pop) yields the input
/// delayed by exactly [`delay_samples`](Self::delay_samples). With a delay of
/// 0, `pop` returns the sample that was just pushed.
///
/// # Memory
///
/// The buffer is allocated by [`resize`](Self::resize) and never reallocates
/// afterwards. `push`/`pop` do not allocate.
///
/// # Example
///
/// ```rust
/// use crossfeed_core::DelayLine;
///
/// let mut line = DelayLine::new();
/// line.resize(4).unwrap();
/// line.set_delay_samples(2);
///
/// let out: Vec<f32> = [1.0, 2.0, 3.0, 4.0]
///     .iter()
///     .map(|&x| {
///         line.push(x);
///         line.pop()
///     })
///     .collect();
/// assert_eq!(out, [0.0, 0.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DelayLine {
    buffer: Vec<f32>,
    delay: usize,
    write_pos: usize,
    read_pos: usize,
}

impl DelayLine {
    /// Creates an empty (zero-capacity) delay line. Call [`resize`](Self::resize)
    /// before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocates the buffer to `capacity` samples, zero-filled, cursors reset.
    ///
    /// # Errors
    ///
    /// Returns [`PrepareError::Allocation`] if the buffer cannot be allocated.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or if the current delay does not fit.
    pub fn resize(&mut self, capacity: usize) -> Result<(), PrepareError> {
        assert!(capacity > 0, "Delay size must be > 0");
        assert!(
            self.delay < capacity,
            "Delay of {} samples does not fit capacity {capacity}",
            self.delay
        );

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(PrepareError::allocation("delay line buffer"))?;
        buffer.resize(capacity, 0.0);
        self.buffer = buffer;
        self.clear();
        Ok(())
    }

    /// Zero-fills the buffer and resets the cursors, keeping the delay length.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.read_pos = self.delay;
    }

    /// Sets the delay length in samples.
    ///
    /// Future pops lag future pushes by exactly `delay` samples. Samples
    /// already in the buffer are reused, so shortening or lengthening the delay
    /// mid-stream does not clear history.
    ///
    /// # Panics
    ///
    /// Panics if `delay >= capacity()`.
    #[inline]
    pub fn set_delay_samples(&mut self, delay: usize) {
        assert!(
            delay < self.buffer.len(),
            "Delay of {delay} samples exceeds capacity {}",
            self.buffer.len()
        );
        self.delay = delay;
        self.read_pos = (self.write_pos + delay) % self.buffer.len();
    }

    /// Returns the delay length in samples.
    pub fn delay_samples(&self) -> usize {
        self.delay
    }

    /// Returns the buffer capacity in samples (max delay + 1).
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Writes a sample and moves the write cursor back one slot.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = if self.write_pos == 0 {
            self.buffer.len() - 1
        } else {
            self.write_pos - 1
        };
    }

    /// Reads the delayed sample and moves the read cursor back one slot.
    #[inline]
    pub fn pop(&mut self) -> f32 {
        let sample = self.buffer[self.read_pos];
        self.read_pos = if self.read_pos == 0 {
            self.buffer.len() - 1
        } else {
            self.read_pos - 1
        };
        sample
    }
}

/// One [`DelayLine`] per channel sharing a single delay length.
///
/// The maximum delay fixes every line's capacity (`max + 1`). Changing it
/// reallocates, so it belongs in `prepare`; changing the delay length itself
/// is cheap and happens per block.
///
/// # Example
///
/// ```rust
/// use crossfeed_core::{MultiChannelDelay, ProcessSpec};
///
/// let mut delay = MultiChannelDelay::new();
/// delay.prepare(&ProcessSpec::stereo(48000.0, 64)).unwrap();
/// delay.set_max_delay_samples(32).unwrap();
/// delay.set_delay_samples(1);
///
/// let mut left = [1.0, 0.0, 0.0];
/// let mut right = [0.0, 1.0, 0.0];
/// delay.process(&mut [&mut left, &mut right]);
/// assert_eq!(left, [0.0, 1.0, 0.0]);
/// assert_eq!(right, [0.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct MultiChannelDelay {
    lines: Vec<DelayLine>,
    delay: usize,
    max_delay: usize,
    sample_rate: f32,
}

impl MultiChannelDelay {
    /// Creates an unprepared delay with a maximum of
    /// [`DEFAULT_MAX_DELAY_SAMPLES`] and a 44.1 kHz sample rate.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            delay: 0,
            max_delay: DEFAULT_MAX_DELAY_SAMPLES,
            sample_rate: 44100.0,
        }
    }

    /// Allocates one cleared line per channel, sized to the current maximum
    /// delay, and adopts the negotiated sample rate.
    ///
    /// # Errors
    ///
    /// Returns [`PrepareError::Allocation`] if any buffer cannot be allocated.
    pub fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        self.prepare_with_max_delay(spec, self.max_delay)
    }

    /// Like [`prepare`](Self::prepare), but sizes the new lines for `max`
    /// samples of delay. Each buffer is allocated once.
    ///
    /// # Errors
    ///
    /// See [`set_max_delay_samples`](Self::set_max_delay_samples).
    ///
    /// # Panics
    ///
    /// Panics if the current delay exceeds `max`.
    pub fn prepare_with_max_delay(
        &mut self,
        spec: &ProcessSpec,
        max: usize,
    ) -> Result<(), PrepareError> {
        self.lines.clear();
        self.lines
            .try_reserve_exact(spec.channels)
            .map_err(PrepareError::allocation("delay channel list"))?;
        self.lines.resize_with(spec.channels, DelayLine::new);
        self.sample_rate = spec.sample_rate;
        self.set_max_delay_samples(max)
    }

    /// Releases every line's buffer.
    pub fn release(&mut self) {
        self.lines = Vec::new();
    }

    /// Clears every line.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Resizes every line to `max + 1` samples and clears it.
    ///
    /// Cold path: reallocates. Call from `prepare`, never while streaming.
    ///
    /// # Errors
    ///
    /// Returns [`PrepareError::DelayTooLong`] if `max + 1` overflows, or
    /// [`PrepareError::Allocation`] if any buffer cannot be allocated.
    ///
    /// # Panics
    ///
    /// Panics if the current delay exceeds `max`.
    pub fn set_max_delay_samples(&mut self, max: usize) -> Result<(), PrepareError> {
        assert!(
            self.delay <= max,
            "Current delay {} exceeds new maximum {max}",
            self.delay
        );
        let capacity = max.checked_add(1).ok_or(PrepareError::DelayTooLong(max))?;
        self.max_delay = max;
        for line in &mut self.lines {
            line.resize(capacity)?;
            line.set_delay_samples(self.delay);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            max_delay = max,
            channels = self.lines.len(),
            "delay lines resized"
        );

        Ok(())
    }

    /// Sets the maximum delay in seconds, rounded up to whole samples.
    ///
    /// # Errors
    ///
    /// See [`set_max_delay_samples`](Self::set_max_delay_samples).
    pub fn set_max_delay_seconds(&mut self, seconds: f32) -> Result<(), PrepareError> {
        self.set_max_delay_samples(ceilf(seconds * self.sample_rate) as usize)
    }

    /// Returns the maximum delay in samples.
    pub fn max_delay_samples(&self) -> usize {
        self.max_delay
    }

    /// Returns the maximum delay in seconds.
    pub fn max_delay_seconds(&self) -> f32 {
        self.max_delay as f32 / self.sample_rate
    }

    /// Sets the delay of every channel, in samples.
    ///
    /// # Panics
    ///
    /// Panics if `delay` exceeds the maximum delay.
    #[inline]
    pub fn set_delay_samples(&mut self, delay: usize) {
        assert!(
            delay <= self.max_delay,
            "Delay {delay} exceeds maximum {}",
            self.max_delay
        );
        self.delay = delay;
        for line in &mut self.lines {
            line.set_delay_samples(delay);
        }
    }

    /// Sets the delay of every channel in seconds, rounded down to whole samples.
    ///
    /// Uses the sample rate from the last [`prepare`](Self::prepare).
    pub fn set_delay_seconds(&mut self, seconds: f32) {
        self.set_delay_samples(floorf(seconds * self.sample_rate) as usize);
    }

    /// Returns the current delay in samples.
    pub fn delay_samples(&self) -> usize {
        self.delay
    }

    /// Returns the current delay in seconds.
    pub fn delay_seconds(&self) -> f32 {
        self.delay as f32 / self.sample_rate
    }

    /// Returns the number of prepared channels.
    pub fn channels(&self) -> usize {
        self.lines.len()
    }

    /// Delays every channel in place.
    ///
    /// # Panics
    ///
    /// Panics if `channels.len()` differs from the prepared channel count.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) {
        self.process_internal::<false>(channels);
    }

    /// Runs the lines without applying the delay.
    ///
    /// Every sample is still pushed and popped, so the lines hold the same
    /// history as in [`process`](Self::process), but the output is the
    /// undelayed input. Switching back resumes with a correctly-filled line.
    ///
    /// # Panics
    ///
    /// Panics if `channels.len()` differs from the prepared channel count.
    pub fn process_bypassed(&mut self, channels: &mut [&mut [f32]]) {
        self.process_internal::<true>(channels);
    }

    #[inline]
    fn process_internal<const BYPASSED: bool>(&mut self, channels: &mut [&mut [f32]]) {
        assert_eq!(
            channels.len(),
            self.lines.len(),
            "Channel count must match prepared delay lines"
        );

        for (samples, line) in channels.iter_mut().zip(self.lines.iter_mut()) {
            for sample in samples.iter_mut() {
                line.push(*sample);
                let delayed = line.pop();
                if !BYPASSED {
                    *sample = delayed;
                }
            }
        }
    }
}

impl Default for MultiChannelDelay {
    fn default() -> Self {
        Self::new()
    }
}
