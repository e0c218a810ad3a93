//! Integration tests for the node graph runtime through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rackgraph_core::{
    AudioBuffer, AudioNode, ConfigNode, Effect, EffectNode, GroupMode, GroupNode, ProcessSpec,
    Topology, param_f32,
};

/// Gain effect configured from the tree, like a registry effect would be.
struct TreeGain {
    gain: f32,
    prepared_for: Option<ProcessSpec>,
}

impl TreeGain {
    fn from_node(node: &ConfigNode) -> Self {
        let mut fx = Self {
            gain: 1.0,
            prepared_for: None,
        };
        fx.configure(node);
        fx
    }
}

impl Effect for TreeGain {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.prepared_for = Some(*spec);
    }
    fn process(&mut self, buffer: &mut AudioBuffer) {
        assert!(self.prepared_for.is_some(), "processed before prepare");
        buffer.apply_gain(self.gain);
    }
    fn reset(&mut self) {}
    fn configure(&mut self, node: &ConfigNode) {
        self.gain = param_f32(node, "gain", self.gain);
    }
}

struct Probe(Arc<AtomicUsize>);

impl Effect for Probe {
    fn prepare(&mut self, _spec: &ProcessSpec) {}
    fn process(&mut self, _buffer: &mut AudioBuffer) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
    fn reset(&mut self) {}
    fn configure(&mut self, _node: &ConfigNode) {}
}

fn gain_node(gain: f64) -> Box<dyn AudioNode + Send> {
    let desc = ConfigNode::new("Effect").with_attribute("gain", gain);
    Box::new(EffectNode::new("Gain", Box::new(TreeGain::from_node(&desc))))
}

#[test]
fn nested_groups_compose() {
    // out = ((x * 2) + (x * 3)) * 0.5
    let mut root = GroupNode::series()
        .with_child(Box::new(
            GroupNode::parallel()
                .with_child(gain_node(2.0))
                .with_child(gain_node(3.0)),
        ))
        .with_child(gain_node(0.5));

    root.prepare(&ProcessSpec::new(44100.0, 8, 2));
    let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 8], vec![-1.0; 8]]);
    root.process(&mut buffer);

    assert_eq!(buffer.channel(0), &[2.5; 8]);
    assert_eq!(buffer.channel(1), &[-2.5; 8]);
}

#[test]
fn short_blocks_reuse_scratch() {
    let mut group = GroupNode::parallel()
        .with_child(gain_node(1.0))
        .with_child(gain_node(1.0));
    group.prepare(&ProcessSpec::new(48000.0, 64, 1));

    for len in [64, 1, 17, 64, 3] {
        let mut buffer = AudioBuffer::from_channels(vec![vec![0.25; len]]);
        group.process(&mut buffer);
        assert_eq!(buffer.len(), len);
        assert!(buffer.channel(0).iter().all(|&s| s == 0.5));
    }
}

#[test]
fn parallel_repeat_invokes_each_branch_per_pass() {
    let hits = Arc::new(AtomicUsize::new(0));
    let probe = || -> Box<dyn AudioNode + Send> {
        Box::new(EffectNode::new("Probe", Box::new(Probe(Arc::clone(&hits)))))
    };
    let mut group = GroupNode::parallel()
        .with_repeat(3)
        .with_child(probe())
        .with_child(probe());
    group.prepare(&ProcessSpec::default());

    let mut buffer = AudioBuffer::new(2, 512);
    group.process(&mut buffer);
    assert_eq!(hits.load(Ordering::SeqCst), 6);
}

#[test]
fn describe_reports_shape() {
    let root = GroupNode::series()
        .with_child(gain_node(1.0))
        .with_child(Box::new(
            GroupNode::new(GroupMode::Parallel)
                .with_repeat(2)
                .with_child(gain_node(1.0)),
        ));
    let topo = root.describe();
    assert_eq!(topo.effect_count(), 2);
    assert_eq!(topo.to_string(), "Series x1\n  Gain\n  Parallel x2\n    Gain\n");
    match topo {
        Topology::Group { children, .. } => assert_eq!(children.len(), 2),
        Topology::Effect { .. } => panic!("root should be a group"),
    }
}

#[test]
fn reprepare_replaces_spec() {
    let mut group = GroupNode::parallel().with_child(gain_node(1.0));
    group.prepare(&ProcessSpec::new(44100.0, 4, 1));
    group.prepare(&ProcessSpec::new(96000.0, 16, 2));

    let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 16], vec![1.0; 16]]);
    group.process(&mut buffer);
    assert_eq!(buffer.channel(1), &[1.0; 16]);
}
