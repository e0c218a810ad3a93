//! Property-based tests for the node graph runtime.
//!
//! Uses linear test effects so expected outputs can be computed exactly.

use proptest::prelude::*;
use rackgraph_core::{
    AudioBuffer, AudioNode, ConfigNode, Effect, EffectNode, GroupNode, ProcessSpec, param_f32,
};

struct Scale(f32);

impl Effect for Scale {
    fn prepare(&mut self, _spec: &ProcessSpec) {}
    fn process(&mut self, buffer: &mut AudioBuffer) {
        buffer.apply_gain(self.0);
    }
    fn reset(&mut self) {}
    fn configure(&mut self, _node: &ConfigNode) {}
}

fn scale(g: f32) -> Box<dyn AudioNode + Send> {
    Box::new(EffectNode::new("Scale", Box::new(Scale(g))))
}

fn run(node: &mut dyn AudioNode, input: &[f32]) -> Vec<f32> {
    node.prepare(&ProcessSpec::new(48000.0, input.len(), 1));
    let mut buffer = AudioBuffer::from_channels(vec![input.to_vec()]);
    node.process(&mut buffer);
    buffer.channel(0).to_vec()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A parallel group of two gains outputs exactly `g1*x + g2*x`.
    #[test]
    fn parallel_mix_is_sum_of_branches(
        g1 in -4.0f32..4.0,
        g2 in -4.0f32..4.0,
        input in prop::collection::vec(-1.0f32..=1.0, 1..128),
    ) {
        let mut group = GroupNode::parallel().with_child(scale(g1)).with_child(scale(g2));
        let out = run(&mut group, &input);
        for (x, y) in input.iter().zip(&out) {
            prop_assert_eq!(*y, x * g1 + x * g2);
        }
    }

    /// Regrouping a series of gains does not change the result.
    #[test]
    fn series_is_associative(
        a in -2.0f32..2.0,
        b in -2.0f32..2.0,
        c in -2.0f32..2.0,
        input in prop::collection::vec(-1.0f32..=1.0, 1..64),
    ) {
        let mut left = GroupNode::series()
            .with_child(Box::new(GroupNode::series().with_child(scale(a)).with_child(scale(b))))
            .with_child(scale(c));
        let mut right = GroupNode::series()
            .with_child(scale(a))
            .with_child(Box::new(GroupNode::series().with_child(scale(b)).with_child(scale(c))));
        prop_assert_eq!(run(&mut left, &input), run(&mut right, &input));
    }

    /// Series repeat `n` of a gain equals applying the gain `n` times.
    #[test]
    fn series_repeat_applies_child_n_times(
        g in 0.5f32..1.5,
        repeat in 1u32..6,
        x in -1.0f32..=1.0,
    ) {
        let mut group = GroupNode::series().with_repeat(repeat).with_child(scale(g));
        let out = run(&mut group, &[x]);
        let mut expected = x;
        for _ in 0..repeat {
            expected *= g;
        }
        prop_assert_eq!(out[0], expected);
    }

    /// The resolver reads a value identically as a direct attribute or a nested `value`.
    #[test]
    fn resolver_direct_and_nested_agree(v in -1000.0f64..1000.0) {
        let direct = ConfigNode::new("Effect").with_attribute("k", v);
        let nested = ConfigNode::new("Effect").with_child(
            ConfigNode::new("k")
                .with_attribute("value", v)
                .with_attribute("ui", "knob"),
        );
        prop_assert_eq!(param_f32(&direct, "k", 0.0), param_f32(&nested, "k", 0.0));
    }
}
