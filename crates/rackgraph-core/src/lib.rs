//! Rackgraph Core - configuration tree and node graph runtime
//!
//! This crate holds the pieces every other rackgraph crate agrees on: the
//! format-agnostic configuration tree, the parameter resolver that leaf
//! effects use to read it, and the runtime node graph that the audio thread
//! walks on every block.
//!
//! # Core Abstractions
//!
//! ## Configuration
//!
//! - [`ConfigNode`] - Ordered, attributed tree produced by the format adapters
//! - [`ScalarValue`] - Number, text or boolean attribute value
//! - [`resolve`] / [`param_f32`] / [`param_value`] - Three-tier parameter lookup
//!
//! ## Processing
//!
//! - [`ProcessSpec`] - Sample rate, maximum block size and channel count
//! - [`AudioBuffer`] - Planar multi-channel buffer with fixed capacity
//! - [`Effect`] - Object-safe trait implemented by every leaf effect
//! - [`ParamDescriptor`] - Static metadata for one configurable parameter
//!
//! ## Node Graph
//!
//! - [`AudioNode`] - `prepare` / `process` / `reset` capability set
//! - [`EffectNode`] - Wraps exactly one leaf effect
//! - [`GroupNode`] - Series or parallel composition with a repeat count
//! - [`Topology`] - Read-only description of a built graph
//!
//! # Example
//!
//! ```rust
//! use rackgraph_core::{ConfigNode, param_f32};
//!
//! let node = ConfigNode::new("Effect")
//!     .with_attribute("type", "Gain")
//!     .with_child(ConfigNode::new("gain_db").with_attribute("value", -6.0));
//!
//! assert_eq!(param_f32(&node, "gain_db", 0.0), -6.0);
//! ```
//!
//! # no_std Support
//!
//! The crate only needs `alloc`. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! rackgraph-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod buffer;
pub mod effect;
pub mod graph;
pub mod math;
pub mod param_info;
pub mod resolve;
pub mod tree;

pub use buffer::AudioBuffer;
pub use effect::{Effect, ProcessSpec};
pub use graph::{AudioNode, EffectNode, GroupMode, GroupNode, Topology};
pub use math::{db_to_linear, flush_denormal, linear_to_db, wet_dry_mix};
pub use param_info::{ParamDescriptor, ParamUnit};
pub use resolve::{has_param, param_bool, param_f32, param_str, param_u32, param_value, resolve};
pub use tree::{ConfigNode, GROUP_TAG, ROOT_TAG, ScalarValue, TYPE_KEY};
