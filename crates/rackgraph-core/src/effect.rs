//! Leaf effect trait and processing context.
//!
//! The [`Effect`] trait is the boundary between the graph runtime and the
//! DSP inside a leaf. The runtime never looks inside an effect: it configures
//! it once from its descriptor subtree, prepares it for a [`ProcessSpec`] and
//! then hands it whole blocks.
//!
//! ## Design Decisions
//!
//! - **Block processing**: Effects see a planar [`AudioBuffer`] per call so
//!   stereo effects (panner, reverb width) can couple channels.
//!
//! - **Object-safe**: The registry returns `Box<dyn Effect + Send>`, so the
//!   set of effect types stays open.
//!
//! - **No allocations in `process`**: Any state sized by the sample rate or
//!   channel count is allocated in [`Effect::prepare`].

use crate::buffer::AudioBuffer;
use crate::tree::ConfigNode;

/// Audio processing context handed to `prepare`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block `process` will be called with.
    pub maximum_block_size: usize,
    /// Number of channels.
    pub num_channels: usize,
}

impl ProcessSpec {
    /// Create a spec.
    pub const fn new(sample_rate: f32, maximum_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            maximum_block_size,
            num_channels,
        }
    }
}

impl Default for ProcessSpec {
    /// 44.1 kHz, 512-sample blocks, stereo.
    fn default() -> Self {
        Self::new(44100.0, 512, 2)
    }
}

/// Core trait for all leaf effects.
///
/// Call order: [`configure`](Effect::configure) (once, by the graph
/// builder), [`prepare`](Effect::prepare) (at least once), then any number of
/// [`process`](Effect::process) and [`reset`](Effect::reset) calls.
///
/// # Example
///
/// ```rust
/// use rackgraph_core::{AudioBuffer, ConfigNode, Effect, ProcessSpec, param_f32};
///
/// struct Scale {
///     factor: f32,
/// }
///
/// impl Effect for Scale {
///     fn prepare(&mut self, _spec: &ProcessSpec) {}
///
///     fn process(&mut self, buffer: &mut AudioBuffer) {
///         buffer.apply_gain(self.factor);
///     }
///
///     fn reset(&mut self) {}
///
///     fn configure(&mut self, node: &ConfigNode) {
///         self.factor = param_f32(node, "factor", self.factor);
///     }
/// }
///
/// let mut fx = Scale { factor: 1.0 };
/// fx.configure(&ConfigNode::new("Effect").with_attribute("factor", 0.5));
/// let mut buffer = AudioBuffer::from_channels(vec![vec![1.0, 1.0]]);
/// fx.process(&mut buffer);
/// assert_eq!(buffer.channel(0), &[0.5, 0.5]);
/// ```
pub trait Effect {
    /// Allocate state and derive coefficients for `spec`.
    ///
    /// May be called again with a different spec; it must fully replace any
    /// state derived from the previous one.
    fn prepare(&mut self, spec: &ProcessSpec);

    /// Process one block in place.
    ///
    /// Effects must cope with buffers carrying fewer or more channels than
    /// prepared, touching only the channels they have state for.
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Clear DSP history (delay lines, envelopes, filter state) without
    /// changing parameters.
    fn reset(&mut self);

    /// Read parameters from the effect's descriptor subtree.
    ///
    /// Unknown attributes are ignored. Parameters the descriptor does not
    /// mention keep their current value.
    fn configure(&mut self, node: &ConfigNode);

    /// Processing latency in samples. Most effects have none.
    fn latency_samples(&self) -> usize {
        0
    }
}
