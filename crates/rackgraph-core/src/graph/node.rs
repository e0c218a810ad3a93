//! The polymorphic node abstraction and its read-only description.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, vec::Vec};

use core::fmt;

use super::group::GroupMode;
use crate::buffer::AudioBuffer;
use crate::effect::ProcessSpec;

/// A node of the executable graph.
///
/// States: unprepared until the first [`prepare`](AudioNode::prepare), then
/// prepared for good. `process` and `reset` keep a node prepared.
pub trait AudioNode {
    /// Size scratch state and prepare every descendant for `spec`.
    fn prepare(&mut self, spec: &ProcessSpec);

    /// Process one block in place.
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Clear DSP history in every descendant.
    fn reset(&mut self);

    /// Describe this subtree.
    fn describe(&self) -> Topology;

    /// Whether `prepare` has been called at least once.
    fn is_prepared(&self) -> bool;
}

impl<N: AudioNode + ?Sized> AudioNode for Box<N> {
    fn prepare(&mut self, spec: &ProcessSpec) {
        (**self).prepare(spec);
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        (**self).process(buffer);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn describe(&self) -> Topology {
        (**self).describe()
    }

    fn is_prepared(&self) -> bool {
        (**self).is_prepared()
    }
}

/// Shape of a built graph: effect type names and group layouts.
///
/// Cheap to clone and safe to hand to UI threads; it holds no DSP state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// A leaf effect, named by the registry type it was created from.
    Effect {
        /// Registry type name as written in the configuration.
        type_name: String,
    },
    /// A group node.
    Group {
        /// Series or parallel.
        mode: GroupMode,
        /// Passes per block.
        repeat: u32,
        /// Children in declaration order.
        children: Vec<Topology>,
    },
}

impl Topology {
    /// Number of leaf effects in the subtree.
    pub fn effect_count(&self) -> usize {
        match self {
            Topology::Effect { .. } => 1,
            Topology::Group { children, .. } => children.iter().map(Topology::effect_count).sum(),
        }
    }

    /// Greatest nesting depth; a lone effect has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Topology::Effect { .. } => 1,
            Topology::Group { children, .. } => {
                1 + children.iter().map(Topology::depth).max().unwrap_or(0)
            }
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str("  ")?;
        }
        match self {
            Topology::Effect { type_name } => writeln!(f, "{type_name}"),
            Topology::Group {
                mode,
                repeat,
                children,
            } => {
                writeln!(f, "{mode} x{repeat}")?;
                for child in children {
                    child.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
