//! Composite node: series or parallel composition with a repeat count.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use core::fmt;

use super::node::{AudioNode, Topology};
use crate::buffer::AudioBuffer;
use crate::effect::ProcessSpec;

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupMode {
    /// Children run one after another on the same buffer.
    #[default]
    Series,
    /// Every child gets its own copy of the input; outputs are summed.
    Parallel,
}

impl GroupMode {
    /// Parse a mode name, ASCII case-insensitive.
    ///
    /// ```rust
    /// use rackgraph_core::GroupMode;
    ///
    /// assert_eq!(GroupMode::parse("PARALLEL"), Some(GroupMode::Parallel));
    /// assert_eq!(GroupMode::parse("diagonal"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("series") {
            Some(GroupMode::Series)
        } else if name.eq_ignore_ascii_case("parallel") {
            Some(GroupMode::Parallel)
        } else {
            None
        }
    }

    /// Canonical display name.
    pub const fn name(&self) -> &'static str {
        match self {
            GroupMode::Series => "Series",
            GroupMode::Parallel => "Parallel",
        }
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered composition of child nodes.
///
/// Per `process` call the whole group runs `repeat` passes.
///
/// **Series**: each pass runs every child in order on the caller's buffer.
///
/// **Parallel**: each pass clears `mix`, then for every child copies the
/// current buffer into `temp`, processes `temp` and adds it into `mix`; finally
/// `mix` is written back. A second pass therefore re-splits the already
/// mixed signal. A parallel group with no children outputs silence.
///
/// `temp` and `mix` are sized in [`prepare`](AudioNode::prepare) from the
/// spec's channel count and maximum block size. Blocks longer than that only
/// have their first `maximum_block_size` samples mixed in parallel mode, and
/// channels beyond the prepared count are left untouched.
pub struct GroupNode {
    mode: GroupMode,
    repeat: u32,
    children: Vec<Box<dyn AudioNode + Send>>,
    temp: AudioBuffer,
    mix: AudioBuffer,
    prepared: bool,
}

impl GroupNode {
    /// Create an empty group.
    pub fn new(mode: GroupMode) -> Self {
        Self {
            mode,
            repeat: 1,
            children: Vec::new(),
            temp: AudioBuffer::default(),
            mix: AudioBuffer::default(),
            prepared: false,
        }
    }

    /// Empty series group.
    pub fn series() -> Self {
        Self::new(GroupMode::Series)
    }

    /// Empty parallel group.
    pub fn parallel() -> Self {
        Self::new(GroupMode::Parallel)
    }

    /// Set the pass count. Zero is treated as one.
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat.max(1);
        self
    }

    /// Append a child, builder style.
    pub fn with_child(mut self, child: Box<dyn AudioNode + Send>) -> Self {
        self.push(child);
        self
    }

    /// Append a child.
    pub fn push(&mut self, child: Box<dyn AudioNode + Send>) {
        self.children.push(child);
    }

    /// Composition mode.
    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    /// Passes per block.
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the group has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn process_parallel_pass(&mut self, buffer: &mut AudioBuffer) {
        self.mix.set_len(buffer.len());
        self.mix.clear();
        for child in &mut self.children {
            self.temp.copy_from(buffer);
            child.process(&mut self.temp);
            self.mix.accumulate_from(&self.temp);
        }
        buffer.fill_from(&self.mix);
    }
}

impl Default for GroupNode {
    fn default() -> Self {
        Self::series()
    }
}

impl AudioNode for GroupNode {
    fn prepare(&mut self, spec: &ProcessSpec) {
        if self.mode == GroupMode::Parallel {
            self.temp = AudioBuffer::new(spec.num_channels, spec.maximum_block_size);
            self.mix = AudioBuffer::new(spec.num_channels, spec.maximum_block_size);
        }
        for child in &mut self.children {
            child.prepare(spec);
        }
        self.prepared = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "group_prepare: {} x{} with {} children at {} Hz / {} samples",
            self.mode,
            self.repeat,
            self.children.len(),
            spec.sample_rate,
            spec.maximum_block_size
        );
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        match self.mode {
            GroupMode::Series => {
                for _ in 0..self.repeat {
                    for child in &mut self.children {
                        child.process(buffer);
                    }
                }
            }
            GroupMode::Parallel => {
                for _ in 0..self.repeat {
                    self.process_parallel_pass(buffer);
                }
            }
        }
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }

    fn describe(&self) -> Topology {
        Topology::Group {
            mode: self.mode,
            repeat: self.repeat,
            children: self.children.iter().map(|c| c.describe()).collect(),
        }
    }

    fn is_prepared(&self) -> bool {
        self.prepared
    }
}

impl fmt::Debug for GroupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupNode")
            .field("mode", &self.mode)
            .field("repeat", &self.repeat)
            .field("children", &self.children.len())
            .field("prepared", &self.prepared)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use crate::graph::EffectNode;
    use crate::tree::ConfigNode;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scale(f32);

    impl Effect for Scale {
        fn prepare(&mut self, _spec: &ProcessSpec) {}
        fn process(&mut self, buffer: &mut AudioBuffer) {
            buffer.apply_gain(self.0);
        }
        fn reset(&mut self) {}
        fn configure(&mut self, _node: &ConfigNode) {}
    }

    struct Offset(f32);

    impl Effect for Offset {
        fn prepare(&mut self, _spec: &ProcessSpec) {}
        fn process(&mut self, buffer: &mut AudioBuffer) {
            for ch in buffer.channels_mut() {
                for s in ch {
                    *s += self.0;
                }
            }
        }
        fn reset(&mut self) {}
        fn configure(&mut self, _node: &ConfigNode) {}
    }

    struct Counter {
        calls: Arc<AtomicUsize>,
        resets: Arc<AtomicUsize>,
    }

    impl Effect for Counter {
        fn prepare(&mut self, _spec: &ProcessSpec) {}
        fn process(&mut self, _buffer: &mut AudioBuffer) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
        fn reset(&mut self) {
            self.resets.fetch_add(1, Ordering::Relaxed);
        }
        fn configure(&mut self, _node: &ConfigNode) {}
    }

    fn node(effect: impl Effect + Send + 'static) -> Box<dyn AudioNode + Send> {
        Box::new(EffectNode::new("Test", Box::new(effect)))
    }

    fn spec(channels: usize, block: usize) -> ProcessSpec {
        ProcessSpec::new(48000.0, block, channels)
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(GroupMode::parse("series"), Some(GroupMode::Series));
        assert_eq!(GroupMode::parse(" Parallel "), Some(GroupMode::Parallel));
        assert_eq!(GroupMode::parse(""), None);
        assert_eq!(GroupMode::default(), GroupMode::Series);
    }

    #[test]
    fn test_series_order() {
        let mut a = GroupNode::series()
            .with_child(node(Offset(1.0)))
            .with_child(node(Scale(2.0)));
        let mut b = GroupNode::series()
            .with_child(node(Scale(2.0)))
            .with_child(node(Offset(1.0)));
        a.prepare(&spec(1, 2));
        b.prepare(&spec(1, 2));

        let mut buf_a = AudioBuffer::from_channels(vec![vec![1.0, 1.0]]);
        let mut buf_b = buf_a.clone();
        a.process(&mut buf_a);
        b.process(&mut buf_b);
        assert_eq!(buf_a.channel(0), &[4.0, 4.0]);
        assert_eq!(buf_b.channel(0), &[3.0, 3.0]);
    }

    #[test]
    fn test_parallel_sums_branches() {
        let mut group = GroupNode::parallel()
            .with_child(node(Scale(0.5)))
            .with_child(node(Scale(2.0)));
        group.prepare(&spec(2, 4));

        let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 4], vec![-2.0; 4]]);
        group.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[2.5; 4]);
        assert_eq!(buffer.channel(1), &[-5.0; 4]);
    }

    #[test]
    fn test_parallel_repeat_resplits_mix() {
        let mut group = GroupNode::parallel()
            .with_repeat(2)
            .with_child(node(Scale(1.0)))
            .with_child(node(Scale(1.0)));
        group.prepare(&spec(1, 1));

        let mut buffer = AudioBuffer::from_channels(vec![vec![1.0]]);
        group.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[4.0]);
    }

    #[test]
    fn test_series_repeat_counts_calls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resets = Arc::new(AtomicUsize::new(0));
        let mut group = GroupNode::series().with_repeat(3).with_child(node(Counter {
            calls: Arc::clone(&calls),
            resets: Arc::clone(&resets),
        }));
        group.prepare(&spec(2, 8));

        let mut buffer = AudioBuffer::new(2, 8);
        group.process(&mut buffer);
        assert_eq!(calls.load(Ordering::Relaxed), 3);

        group.reset();
        assert_eq!(resets.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_empty_series_is_identity() {
        let mut group = GroupNode::series().with_repeat(4);
        group.prepare(&spec(1, 3));
        let mut buffer = AudioBuffer::from_channels(vec![vec![0.1, 0.2, 0.3]]);
        group.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_oversized_block_clamps_to_capacity() {
        let mut group = GroupNode::parallel().with_child(node(Scale(0.0)));
        group.prepare(&spec(1, 2));
        let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 4]]);
        group.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_extra_host_channels_pass_through() {
        let mut group = GroupNode::parallel().with_child(node(Scale(3.0)));
        group.prepare(&spec(1, 2));
        let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 2], vec![7.0; 2]]);
        group.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[3.0; 2]);
        assert_eq!(buffer.channel(1), &[7.0; 2]);
    }

    #[test]
    fn test_prepare_state_and_describe() {
        let mut group = GroupNode::parallel()
            .with_repeat(0)
            .with_child(node(Scale(1.0)));
        assert!(!group.is_prepared());
        group.prepare(&spec(2, 16));
        assert!(group.is_prepared());
        assert_eq!(group.repeat(), 1);
        assert_eq!(
            group.describe(),
            Topology::Group {
                mode: GroupMode::Parallel,
                repeat: 1,
                children: vec![Topology::Effect {
                    type_name: "Test".into()
                }],
            }
        );
    }
}
