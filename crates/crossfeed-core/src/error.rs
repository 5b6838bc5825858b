//! Error types for engine preparation.
//!
//! Only configuration time is fallible. Misuse of the primitives (a delay
//! longer than the line, processing before `prepare`) is a logic error and
//! panics instead; the per-block path has no error type at all.

use alloc::collections::TryReserveError;
use thiserror::Error;

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

/// Errors returned by [`AudioProcessor::prepare`](crate::AudioProcessor::prepare)
/// and delay-line resizing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    /// The host offered a channel layout other than stereo.
    #[error("unsupported channel count {0}: crossfeed requires exactly 2 channels")]
    UnsupportedChannelCount(usize),

    /// Sample rate was not finite or not above twice the crossfeed cutoff.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Maximum block size was zero.
    #[error("invalid maximum block size: {0}")]
    InvalidBlockSize(usize),

    /// A delay line cannot hold the requested maximum delay.
    #[error("delay of {0} samples is too long")]
    DelayTooLong(usize),

    /// A buffer could not be allocated.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        /// Which buffer was being sized.
        what: &'static str,
        /// Underlying allocator error.
        #[source]
        source: TryReserveError,
    },
}

impl PrepareError {
    pub(crate) fn allocation(what: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| Self::Allocation { what, source }
    }
}
