//! Host-facing processor capability.
//!
//! The [`AudioProcessor`] trait is the seam between the DSP core and whatever
//! host adaptation layer drives it (a plugin shell, the offline CLI, a test).
//! The host negotiates a [`ProcessSpec`], calls [`prepare`](AudioProcessor::prepare)
//! once, then calls one of the `process_block*` methods per audio block.
//!
//! ## Design Decisions
//!
//! - **Stereo, split channels**: Blocks arrive as separate left/right slices
//!   mutated in place, matching how hosts hand out per-channel pointers.
//!
//! - **Object-safe**: Hosts may hold a `Box<dyn AudioProcessor>`.
//!
//! - **No allocations**: Only `prepare` and `release` may allocate or free.
//!   The `process_block*` methods are real-time safe and infallible.

use crate::PrepareError;

/// Processing configuration negotiated by the host before playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz (e.g., 44100.0, 48000.0).
    pub sample_rate: f32,
    /// Largest block the host will pass to `process_block`.
    pub max_block_size: usize,
    /// Number of channels in the main bus.
    pub channels: usize,
}

impl ProcessSpec {
    /// Stereo spec at the given sample rate and maximum block size.
    pub fn stereo(sample_rate: f32, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            channels: 2,
        }
    }
}

/// Lifecycle and processing capability implemented by the engine.
///
/// # Example
///
/// ```rust
/// use crossfeed_core::{AudioProcessor, CrossfeedEngine, ProcessSpec};
///
/// let mut engine = CrossfeedEngine::default();
/// engine.prepare(ProcessSpec::stereo(48000.0, 256)).unwrap();
///
/// let mut left = [0.0f32; 256];
/// let mut right = [0.0f32; 256];
/// engine.process_block(&mut left, &mut right);
///
/// // The host delays everything else by this much.
/// let latency = engine.latency_samples();
/// assert!(latency > 0);
///
/// engine.release();
/// ```
pub trait AudioProcessor {
    /// Allocate and configure all state for the given spec.
    ///
    /// May be called again with a new spec; all state is rebuilt and cleared.
    /// On error the processor is left unprepared.
    fn prepare(&mut self, spec: ProcessSpec) -> Result<(), PrepareError>;

    /// Clear state and free the buffers allocated by `prepare`.
    fn release(&mut self);

    /// Process one block in place.
    ///
    /// # Panics
    ///
    /// Panics if called before `prepare`, if the slices differ in length, or
    /// if they exceed the prepared maximum block size.
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]);

    /// Process one block while the host has the effect bypassed.
    ///
    /// The block passes through untouched.
    fn process_block_bypassed(&mut self, left: &mut [f32], right: &mut [f32]);

    /// Report processing latency in samples.
    ///
    /// Constant between calls to `prepare`. Hosts use it for plugin delay
    /// compensation.
    fn latency_samples(&self) -> usize;
}
