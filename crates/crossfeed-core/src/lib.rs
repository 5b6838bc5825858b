//! Crossfeed Core - headphone crossfeed DSP
//!
//! On loudspeakers each ear hears both speakers, the far one slightly later
//! and duller because the head is in the way. Headphones remove that
//! acoustic crosstalk. This crate models it: each channel receives a
//! lowpassed, interaurally delayed and attenuated copy of the other,
//! followed by mid/side shelving that restores the tonal and spatial balance.
//!
//! # Core Abstractions
//!
//! ## Engine
//!
//! - [`CrossfeedEngine`] - The full per-block pipeline with bypass handling
//! - [`AudioProcessor`] - Host lifecycle: prepare, process, latency, release
//! - [`CrossfeedParams`] - Lock-free parameter store shared with the control thread
//! - [`CrossfeedConfig`] - Construction-time model constants
//!
//! ## Filters
//!
//! - [`FirstOrderFilter`] - First-order IIR section (lowpass and shelves)
//! - [`StereoFilter`] - Two sections sharing one coefficient set
//! - [`coefficients`] - Analytic coefficient design from the crossfeed cutoff
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Single-channel integer delay, push/pop interface
//! - [`MultiChannelDelay`] - One delay length across every channel
//!
//! ## Utilities
//!
//! - [`LookupTable`] - Interpolated function tables for per-block control math
//! - Mid/side: [`to_mid_side`], [`from_mid_side`], [`transcode_block`]
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`half_angle_sin`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! crossfeed-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to get `debug`-level events from `prepare`
//! and `release`. Nothing on the per-block path logs.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use crossfeed_core::{AudioProcessor, CrossfeedEngine, CrossfeedParams, ProcessSpec};
//!
//! let params = Arc::new(CrossfeedParams::default());
//! let mut engine = CrossfeedEngine::new(Arc::clone(&params));
//! engine.prepare(ProcessSpec::stereo(48000.0, 128)).unwrap();
//!
//! // Any thread may move parameters; the next block picks them up.
//! params.set_crossfeed_db(-6.0);
//!
//! let mut left = vec![0.25f32; 128];
//! let mut right = vec![-0.25f32; 128];
//! engine.process_block(&mut left, &mut right);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: Allocation only in `prepare`; blocks never allocate, lock or fail
//! - **Panics on misuse**: Bad delay lengths or unprepared processing are logic errors
//! - **Minimal dependencies**: `libm` for math, `thiserror` for the one error type

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod coefficients;
pub mod config;
pub mod delay;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod math;
pub mod mid_side;
pub mod one_pole;
pub mod param;
pub mod processor;

// Re-export main types at crate root
pub use coefficients::{
    FirstOrderCoefficients, MID_SHELF_TRIM_DB, SIDE_SHELF_TRIM_DB, group_delay_samples,
    lowpass_coefficients, lowpass_pole, mid_shelf_coefficients, side_shelf_coefficients,
};
pub use config::CrossfeedConfig;
pub use delay::{DEFAULT_MAX_DELAY_SAMPLES, DelayLine, MultiChannelDelay};
pub use engine::{BypassState, CrossfeedEngine};
pub use error::PrepareError;
pub use lookup::LookupTable;
pub use math::{db_to_linear, flush_denormal, half_angle_sin, linear_to_db};
pub use mid_side::{from_mid_side, to_mid_side, transcode_block};
pub use one_pole::{FirstOrderFilter, StereoFilter};
pub use param::{
    ANGLE, AtomicParam, BYPASS, CROSSFEED_GAIN, CrossfeedParams, DESCRIPTORS, OUTPUT_GAIN,
    ParamDescriptor, ParamSnapshot, ParamUnit,
};
pub use processor::{AudioProcessor, ProcessSpec};
