//! Compiles configuration trees into executable node graphs.
//!
//! The builder walks the tree depth-first in declaration order:
//!
//! - a `Group` node becomes a [`GroupNode`] (`mode` defaults to series,
//!   `repeat` to 1) whose children are built recursively;
//! - any other node must carry a `type`, which the registry turns into a
//!   leaf effect; the effect is configured from the node and wrapped in an
//!   [`EffectNode`].
//!
//! Children of a chain or group that are neither tagged `Group`/`Effect` nor
//! carry a `type` are metadata (`mode: { value: parallel }`,
//! `ui: { color: red }`) and are not built.
//!
//! The first invalid node aborts the whole build. Nothing is prepared here
//! and the input tree is never modified.

use rackgraph_core::{
    AudioNode, ConfigNode, EffectNode, GroupMode, GroupNode, ScalarValue, TYPE_KEY, resolve,
};
use rackgraph_config::EFFECT_TAG;
use rackgraph_registry::EffectRegistry;

use crate::error::BuildError;

/// Attribute selecting series or parallel processing.
pub const MODE_KEY: &str = "mode";

/// Attribute giving the number of passes per block.
pub const REPEAT_KEY: &str = "repeat";

/// Root graph node as produced by the builder.
pub type BoxedNode = Box<dyn AudioNode + Send>;

/// Registry-driven graph compiler.
///
/// ```rust
/// use rackgraph_core::{AudioBuffer, AudioNode, ConfigNode, ProcessSpec};
/// use rackgraph_engine::GraphBuilder;
/// use rackgraph_config::EFFECT_TAG;
/// use rackgraph_registry::EffectRegistry;
///
/// let registry = EffectRegistry::new();
/// let tree = ConfigNode::new("Chain").with_child(
///     ConfigNode::new("Effect")
///         .with_attribute("type", "Gain")
///         .with_attribute("gain", 0.5),
/// );
///
/// let mut graph = GraphBuilder::new(&registry).build_chain(&tree).unwrap();
/// graph.prepare(&ProcessSpec::new(48000.0, 64, 1));
///
/// let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 4]]);
/// graph.process(&mut buffer);
/// assert_eq!(buffer.channel(0), &[0.5; 4]);
/// ```
#[derive(Clone, Copy)]
pub struct GraphBuilder<'r> {
    registry: &'r EffectRegistry,
}

impl<'r> GraphBuilder<'r> {
    /// Create a builder backed by `registry`.
    pub fn new(registry: &'r EffectRegistry) -> Self {
        Self { registry }
    }

    /// Compile a chain root.
    ///
    /// A root tagged `Group` is built as that group. Any other root is an
    /// implicit series group over its children.
    pub fn build_chain(&self, root: &ConfigNode) -> Result<BoxedNode, BuildError> {
        if root.is_group() {
            return self.build(root);
        }
        let mut chain = GroupNode::series();
        for (i, child) in root.children().iter().enumerate() {
            if is_descriptor(child) {
                chain.push(self.build_at(child, &child_path("/", i))?);
            }
        }
        Ok(Box::new(chain))
    }

    /// Compile a single descriptor (group or effect) and its subtree.
    pub fn build(&self, node: &ConfigNode) -> Result<BoxedNode, BuildError> {
        self.build_at(node, "/")
    }

    fn build_at(&self, node: &ConfigNode, path: &str) -> Result<BoxedNode, BuildError> {
        if node.is_group() {
            self.build_group(node, path)
        } else {
            self.build_effect(node, path)
        }
    }

    fn build_group(&self, node: &ConfigNode, path: &str) -> Result<BoxedNode, BuildError> {
        let mode = group_mode(node, path)?;
        let repeat = group_repeat(node, path)?;

        let mut group = GroupNode::new(mode).with_repeat(repeat);
        for (i, child) in node.children().iter().enumerate() {
            if is_descriptor(child) {
                group.push(self.build_at(child, &child_path(path, i))?);
            }
        }
        if mode == GroupMode::Parallel && group.is_empty() {
            return Err(BuildError::structural(path, "parallel group has no children"));
        }
        Ok(Box::new(group))
    }

    fn build_effect(&self, node: &ConfigNode, path: &str) -> Result<BoxedNode, BuildError> {
        let type_name = match resolve(node, TYPE_KEY) {
            Some(ScalarValue::Text(name)) => name.trim().to_string(),
            Some(other) => other.to_string(),
            None => return Err(BuildError::missing_type(node.tag(), path)),
        };

        let Some(mut effect) = self.registry.create(&type_name) else {
            return Err(BuildError::unknown_type(type_name, path));
        };
        effect.configure(node);
        Ok(Box::new(EffectNode::new(type_name, effect)))
    }
}

fn is_descriptor(child: &ConfigNode) -> bool {
    child.is_group() || child.tag() == EFFECT_TAG || resolve(child, TYPE_KEY).is_some()
}

fn group_mode(node: &ConfigNode, path: &str) -> Result<GroupMode, BuildError> {
    match resolve(node, MODE_KEY) {
        None => Ok(GroupMode::default()),
        Some(value) => value
            .as_str()
            .and_then(GroupMode::parse)
            .ok_or_else(|| BuildError::structural(path, format!("unknown group mode '{value}'"))),
    }
}

fn group_repeat(node: &ConfigNode, path: &str) -> Result<u32, BuildError> {
    let Some(value) = resolve(node, REPEAT_KEY) else {
        return Ok(1);
    };
    match value.as_f64() {
        Some(n) if n >= 1.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => Ok(n as u32),
        _ => Err(BuildError::structural(
            path,
            format!("repeat must be a positive integer, got '{value}'"),
        )),
    }
}

fn child_path(parent: &str, index: usize) -> String {
    if parent == "/" {
        format!("/{index}")
    } else {
        format!("{parent}/{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackgraph_core::{GROUP_TAG, ROOT_TAG, Topology};

    fn fx(type_name: &str) -> ConfigNode {
        ConfigNode::new("Effect").with_attribute(TYPE_KEY, type_name)
    }

    fn group(mode: &str) -> ConfigNode {
        ConfigNode::new(GROUP_TAG).with_attribute(MODE_KEY, mode)
    }

    fn build(tree: &ConfigNode) -> Result<BoxedNode, BuildError> {
        let registry = EffectRegistry::new();
        GraphBuilder::new(&registry).build_chain(tree)
    }

    #[test]
    fn chain_root_is_implicit_series() {
        let tree = ConfigNode::new(ROOT_TAG).with_child(fx("Gain")).with_child(fx("EQ"));
        let topology = build(&tree).unwrap().describe();
        match topology {
            Topology::Group { mode, repeat, children } => {
                assert_eq!(mode, GroupMode::Series);
                assert_eq!(repeat, 1);
                assert_eq!(children.len(), 2);
                assert_eq!(children[1], Topology::Effect { type_name: "EQ".into() });
            }
            other => panic!("expected a group, got {other:?}"),
        }
    }

    #[test]
    fn group_root_builds_as_group() {
        let tree = group("parallel").with_attribute(REPEAT_KEY, 3).with_child(fx("Gain"));
        let topology = build(&tree).unwrap().describe();
        assert!(matches!(
            topology,
            Topology::Group { mode: GroupMode::Parallel, repeat: 3, .. }
        ));
    }

    #[test]
    fn mode_is_case_insensitive_and_defaults_to_series() {
        for (mode, expected) in [("PARALLEL", GroupMode::Parallel), ("Series", GroupMode::Series)] {
            let tree = group(mode).with_child(fx("Gain"));
            let topology = build(&tree).unwrap().describe();
            assert!(matches!(topology, Topology::Group { mode, .. } if mode == expected));
        }
        let tree = ConfigNode::new(GROUP_TAG).with_child(fx("Gain"));
        assert!(matches!(
            build(&tree).unwrap().describe(),
            Topology::Group { mode: GroupMode::Series, .. }
        ));
    }

    #[test]
    fn nested_mode_and_type_values_resolve() {
        let tree = ConfigNode::new(ROOT_TAG).with_child(
            ConfigNode::new(GROUP_TAG)
                .with_child(ConfigNode::new(MODE_KEY).with_attribute("value", "parallel"))
                .with_child(
                    ConfigNode::new("Effect")
                        .with_child(ConfigNode::new(TYPE_KEY).with_attribute("value", "Delay")),
                ),
        );
        let topology = build(&tree).unwrap().describe();
        assert_eq!(topology.effect_count(), 1);
        match topology {
            Topology::Group { children, .. } => assert!(matches!(
                children[0],
                Topology::Group { mode: GroupMode::Parallel, .. }
            )),
            other => panic!("expected a group, got {other:?}"),
        }
    }

    #[test]
    fn metadata_children_are_not_built() {
        let ui = ConfigNode::new("ui").with_attribute("color", "red");
        let tags = ConfigNode::new("tags")
            .with_child(ConfigNode::new("Item").with_attribute("value", "warm"));
        let tree = ConfigNode::new(ROOT_TAG)
            .with_child(ui.clone())
            .with_child(
                group("parallel")
                    .with_child(ui.clone())
                    .with_child(tags.clone())
                    .with_child(fx("Gain"))
                    .with_child(fx("Delay")),
            )
            .with_child(fx("Gain").with_child(ui).with_child(tags));
        let topology = build(&tree).unwrap().describe();
        assert_eq!(topology.effect_count(), 3);
        match topology {
            Topology::Group { children, .. } => {
                assert_eq!(children.len(), 2);
                assert!(matches!(
                    &children[0],
                    Topology::Group { children, .. } if children.len() == 2
                ));
            }
            other => panic!("expected a group, got {other:?}"),
        }
    }

    #[test]
    fn untyped_effect_in_group_is_still_rejected() {
        let tree = ConfigNode::new(ROOT_TAG).with_child(
            group("series").with_child(ConfigNode::new("Effect").with_attribute("gain", 0.5)),
        );
        assert_eq!(build(&tree).err().unwrap(), BuildError::missing_type("Effect", "/0/0"));
    }

    #[test]
    fn unknown_type_reports_path() {
        let tree = ConfigNode::new(ROOT_TAG)
            .with_child(fx("Gain"))
            .with_child(group("series").with_child(fx("Gain")).with_child(fx("Flanger")));
        let err = build(&tree).err().unwrap();
        assert_eq!(err, BuildError::unknown_type("Flanger", "/1/1"));
    }

    #[test]
    fn type_lookup_is_case_sensitive() {
        let tree = ConfigNode::new(ROOT_TAG).with_child(fx("gain"));
        assert!(matches!(build(&tree), Err(BuildError::UnknownType { .. })));
    }

    #[test]
    fn missing_type() {
        let tree = ConfigNode::new(ROOT_TAG)
            .with_child(ConfigNode::new("Effect").with_attribute("gain", 0.5));
        assert_eq!(build(&tree).err().unwrap(), BuildError::missing_type("Effect", "/0"));
    }

    #[test]
    fn structural_errors() {
        let cases = [
            group("diagonal").with_child(fx("Gain")),
            group("parallel"),
            group("series").with_attribute(REPEAT_KEY, 0).with_child(fx("Gain")),
            group("series").with_attribute(REPEAT_KEY, 1.5).with_child(fx("Gain")),
            group("series").with_attribute(REPEAT_KEY, "twice").with_child(fx("Gain")),
            group("series").with_attribute(REPEAT_KEY, -2).with_child(fx("Gain")),
        ];
        for case in cases {
            let tree = ConfigNode::new(ROOT_TAG).with_child(case);
            let err = build(&tree).err().unwrap();
            assert!(
                matches!(err, BuildError::Structural { ref path, .. } if path == "/0"),
                "{err}"
            );
        }
    }

    #[test]
    fn empty_series_group_is_identity() {
        let tree = ConfigNode::new(ROOT_TAG).with_child(group("series"));
        let mut graph = build(&tree).unwrap();
        graph.prepare(&rackgraph_core::ProcessSpec::new(48000.0, 8, 1));
        let mut buffer = rackgraph_core::AudioBuffer::from_channels(vec![vec![0.25; 8]]);
        graph.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[0.25; 8]);
    }

    #[test]
    fn build_does_not_prepare() {
        let tree = ConfigNode::new(ROOT_TAG).with_child(fx("Reverb"));
        assert!(!build(&tree).unwrap().is_prepared());
    }

    #[test]
    fn repeat_text_is_accepted() {
        let tree = group("series").with_attribute(REPEAT_KEY, "4").with_child(fx("Gain"));
        assert!(matches!(build(&tree).unwrap().describe(), Topology::Group { repeat: 4, .. }));
    }
}
