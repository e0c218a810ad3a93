//! Executable node graph.
//!
//! The graph builder compiles a configuration tree into a tree of
//! [`AudioNode`] trait objects:
//!
//! - [`EffectNode`] wraps exactly one leaf [`Effect`](crate::Effect).
//! - [`GroupNode`] owns an ordered list of child nodes and runs them in
//!   [`GroupMode::Series`] or [`GroupMode::Parallel`], `repeat` times per block.
//!
//! A graph is prepared in full before it is published to the audio thread, so
//! no partially initialised node is ever reachable from a live root. After
//! `prepare`, `process` performs no allocation.
//!
//! # Example
//!
//! ```rust
//! use rackgraph_core::graph::{AudioNode, EffectNode, GroupNode};
//! use rackgraph_core::{AudioBuffer, ConfigNode, Effect, ProcessSpec};
//!
//! struct Scale(f32);
//!
//! impl Effect for Scale {
//!     fn prepare(&mut self, _spec: &ProcessSpec) {}
//!     fn process(&mut self, buffer: &mut AudioBuffer) {
//!         buffer.apply_gain(self.0);
//!     }
//!     fn reset(&mut self) {}
//!     fn configure(&mut self, _node: &ConfigNode) {}
//! }
//!
//! let mut group = GroupNode::parallel()
//!     .with_child(Box::new(EffectNode::new("Scale", Box::new(Scale(0.5)))))
//!     .with_child(Box::new(EffectNode::new("Scale", Box::new(Scale(0.25)))));
//!
//! group.prepare(&ProcessSpec::new(48000.0, 4, 1));
//! let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 4]]);
//! group.process(&mut buffer);
//! assert_eq!(buffer.channel(0), &[0.75; 4]);
//! ```

mod effect_node;
mod group;
mod node;

pub use effect_node::EffectNode;
pub use group::{GroupMode, GroupNode};
pub use node::{AudioNode, Topology};
