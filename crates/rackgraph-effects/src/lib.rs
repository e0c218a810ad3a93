//! Rackgraph Effects - Leaf effect implementations
//!
//! Every effect implements [`rackgraph_core::Effect`] and reads its
//! parameters from a configuration node through the three-tier resolver.
//! Each module also exports a `PARAMS` table of
//! [`ParamDescriptor`](rackgraph_core::ParamDescriptor)s that the registry
//! publishes alongside the effect.
//!
//! - [`Gain`] - Smoothed linear gain (`gain` or `gain_db`)
//! - [`Filter`] - RBJ biquad, low/high/band-pass
//! - [`Compressor`] - Feed-forward hard-knee compressor
//! - [`Limiter`] - Instant-attack peak limiter
//! - [`Delay`] - Feedback delay
//! - [`Drive`] - Arctangent waveshaper
//! - [`Phaser`] - Four-stage allpass phaser
//! - [`Chorus`] - Modulated-delay chorus
//! - [`Reverb`] - Freeverb-style comb/allpass reverb
//! - [`NoiseGate`] - Downward expander
//! - [`LadderFilter`] - Four-pole ladder filter
//! - [`Panner`] - Stereo pan laws
//!
//! None of these aim at bit-level fidelity with any particular product; they
//! are small, allocation-free in `process`, and stable for every parameter in
//! range.
//!
//! ## Example
//!
//! ```rust
//! use rackgraph_core::{AudioBuffer, ConfigNode, Effect, ProcessSpec};
//! use rackgraph_effects::Delay;
//!
//! let mut delay = Delay::new();
//! delay.configure(
//!     &ConfigNode::new("Effect")
//!         .with_attribute("time", 0.25)
//!         .with_child(ConfigNode::new("mix").with_attribute("value", 0.3)),
//! );
//! delay.prepare(&ProcessSpec::default());
//!
//! let mut buffer = AudioBuffer::new(2, 512);
//! delay.process(&mut buffer);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chorus;
pub mod compressor;
pub mod delay;
pub mod drive;
pub mod dsp;
pub mod filter;
pub mod gain;
pub mod ladder;
pub mod limiter;
pub mod noise_gate;
pub mod panner;
pub mod phaser;
pub mod reverb;

pub use chorus::Chorus;
pub use compressor::Compressor;
pub use delay::Delay;
pub use drive::Drive;
pub use dsp::BiquadKind;
pub use filter::Filter;
pub use gain::Gain;
pub use ladder::{LadderFilter, LadderMode};
pub use limiter::Limiter;
pub use noise_gate::NoiseGate;
pub use panner::{PanRule, Panner};
pub use phaser::Phaser;
pub use reverb::Reverb;
