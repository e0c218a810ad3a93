//! Graph builder and hot-swapping chain controller for rackgraph.
//!
//! This crate ties the pieces together: configuration text parsed by
//! `rackgraph-config` is compiled by the [`GraphBuilder`] into a tree of
//! [`AudioNode`](rackgraph_core::AudioNode)s using the effects in
//! `rackgraph-registry`, and the [`ChainController`] swaps that graph into a
//! running audio stream without blocking the audio thread.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rackgraph_core::{AudioBuffer, ProcessSpec};
//! use rackgraph_engine::{ChainController, ChainSnapshot};
//!
//! let chain = Arc::new(ChainController::new());
//! chain.prepare(&ProcessSpec::new(48000.0, 512, 2));
//!
//! chain.add_listener(Arc::new(|snapshot: &ChainSnapshot| {
//!     println!("generation {}:\n{}", snapshot.generation, snapshot.topology);
//! }));
//!
//! chain
//!     .load_from_yaml(
//!         r"
//! - type: Compressor
//!   threshold: -18
//! - type: Group
//!   mode: parallel
//!   children:
//!     - type: Gain
//!       gain_db: -3
//!     - type: Delay
//!       time: 0.25
//!       mix: 1.0
//! ",
//!     )
//!     .unwrap();
//!
//! // Audio thread
//! let mut buffer = AudioBuffer::new(2, 512);
//! chain.process(&mut buffer);
//! ```

mod builder;
mod controller;
mod error;
mod listener;
mod reclaim;

pub use builder::{BoxedNode, GraphBuilder, MODE_KEY, REPEAT_KEY};
pub use controller::ChainController;
pub use error::{BuildError, LoadError};
pub use listener::{ChainListener, ChainSnapshot, ListenerId};
pub use reclaim::RetireList;
