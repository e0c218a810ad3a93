//! Leaf node wrapping one effect.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String};

use super::node::{AudioNode, Topology};
use crate::buffer::AudioBuffer;
use crate::effect::{Effect, ProcessSpec};

/// Graph node that owns exactly one leaf effect.
pub struct EffectNode {
    type_name: String,
    effect: Box<dyn Effect + Send>,
    prepared: bool,
}

impl EffectNode {
    /// Wrap an already configured effect.
    pub fn new(type_name: impl Into<String>, effect: Box<dyn Effect + Send>) -> Self {
        Self {
            type_name: type_name.into(),
            effect,
            prepared: false,
        }
    }

    /// Registry type name this node was built from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the wrapped effect.
    pub fn effect(&self) -> &(dyn Effect + Send) {
        self.effect.as_ref()
    }
}

impl AudioNode for EffectNode {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.effect.prepare(spec);
        self.prepared = true;
    }

    #[inline]
    fn process(&mut self, buffer: &mut AudioBuffer) {
        self.effect.process(buffer);
    }

    fn reset(&mut self) {
        self.effect.reset();
    }

    fn describe(&self) -> Topology {
        Topology::Effect {
            type_name: self.type_name.clone(),
        }
    }

    fn is_prepared(&self) -> bool {
        self.prepared
    }
}

impl core::fmt::Debug for EffectNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectNode")
            .field("type_name", &self.type_name)
            .field("prepared", &self.prepared)
            .finish_non_exhaustive()
    }
}
