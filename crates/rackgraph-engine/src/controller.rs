//! Hot-swapping chain controller.
//!
//! [`ChainController`] is shared between the audio-render thread and a
//! control thread.
//!
//! | Thread | Calls |
//! |--------|-------|
//! | audio | [`prepare`](ChainController::prepare), [`process`](ChainController::process) |
//! | control | `load_from*`, [`collect_garbage`](ChainController::collect_garbage), listeners |
//! | any | [`reset`](ChainController::reset), `current_*`, [`generation`](ChainController::generation) |
//!
//! # Publication
//!
//! A load builds and prepares the new graph off to the side, then publishes
//! it with a single `ArcSwapOption` store. The next `process` call picks it
//! up; a `process` call already running finishes on the old graph. Loads
//! are serialised by a `parking_lot::Mutex` that `process` never takes.
//!
//! Each published graph lives in its own cell. Only the audio thread ever
//! locks that cell once it is published, and `process` only ever `try_lock`s
//! it, so rendering never waits on the control thread. `reset` never locks
//! the cell: it raises a flag the next `process` call acts on.
//!
//! Replaced graphs go to a [`RetireList`] and are dropped by the control
//! thread, never by the audio thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use rackgraph_config::ConfigError;
use rackgraph_core::{AudioBuffer, AudioNode, ConfigNode, ProcessSpec, Topology};
use rackgraph_registry::EffectRegistry;

use crate::builder::{BoxedNode, GraphBuilder};
use crate::error::LoadError;
use crate::listener::{ChainListener, ChainSnapshot, ListenerId, ListenerSet};
use crate::reclaim::RetireList;

/// A published graph.
struct GraphSlot {
    root: Mutex<BoxedNode>,
}

/// State touched only under the control lock.
struct ControlState {
    spec: ProcessSpec,
    retired: RetireList<GraphSlot>,
    listeners: ListenerSet,
}

/// Owner of the live processing graph.
///
/// Starts empty; with no graph loaded, `process` leaves the buffer untouched.
///
/// ```rust
/// use rackgraph_core::{AudioBuffer, ProcessSpec};
/// use rackgraph_engine::ChainController;
///
/// let chain = ChainController::new();
/// chain.prepare(&ProcessSpec::new(48000.0, 256, 2));
///
/// chain.load_from_yaml("- type: Gain\n  gain: 0.5\n").unwrap();
///
/// let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 4], vec![1.0; 4]]);
/// chain.process(&mut buffer);
/// assert_eq!(buffer.channel(0), &[0.5; 4]);
///
/// // A rejected load keeps the previous graph live.
/// assert!(chain.load_from_yaml("- type: Flanger\n").is_err());
/// assert_eq!(chain.generation(), 1);
/// ```
pub struct ChainController {
    registry: EffectRegistry,
    graph: ArcSwapOption<GraphSlot>,
    snapshot: ArcSwapOption<ChainSnapshot>,
    generation: AtomicU64,
    reset_pending: AtomicBool,
    control: Mutex<ControlState>,
}

impl Default for ChainController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainController {
    /// Empty controller using the built-in effect registry.
    pub fn new() -> Self {
        Self::with_registry(EffectRegistry::new())
    }

    /// Empty controller using `registry` to resolve effect types.
    pub fn with_registry(registry: EffectRegistry) -> Self {
        Self {
            registry,
            graph: ArcSwapOption::empty(),
            snapshot: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
            reset_pending: AtomicBool::new(false),
            control: Mutex::new(ControlState {
                spec: ProcessSpec::default(),
                retired: RetireList::new(),
                listeners: ListenerSet::default(),
            }),
        }
    }

    /// Registry used to resolve effect types.
    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    // ── Audio thread ────────────────────────────────────────────────────────

    /// Store `spec` for future loads and prepare the live graph with it.
    ///
    /// This locks the live graph, so call it from the audio thread or while
    /// rendering is stopped. A `process` call that overlaps it on another
    /// thread passes its block through unprocessed.
    pub fn prepare(&self, spec: &ProcessSpec) {
        let mut control = self.control.lock();
        control.spec = *spec;
        if let Some(slot) = self.graph.load_full() {
            slot.root.lock().prepare(spec);
        }
        tracing::debug!(
            "chain_prepare: {} Hz, block {}, {} channels",
            spec.sample_rate,
            spec.maximum_block_size,
            spec.num_channels
        );
    }

    /// Process one block in place. Passes the buffer through when no graph
    /// is loaded. Never blocks.
    #[inline]
    pub fn process(&self, buffer: &mut AudioBuffer) {
        let graph = self.graph.load();
        if let Some(slot) = &*graph
            && let Some(mut root) = slot.root.try_lock()
        {
            if self.reset_pending.swap(false, Ordering::AcqRel) {
                root.reset();
            }
            root.process(buffer);
        }
    }

    /// Clear DSP state of the live graph before the next processed block.
    ///
    /// Safe from any thread: it only raises a flag, so it never contends
    /// with `process` for the graph.
    pub fn reset(&self) {
        self.reset_pending.store(true, Ordering::Release);
    }

    /// Whether a `reset` is waiting for the next `process` call.
    pub fn reset_pending(&self) -> bool {
        self.reset_pending.load(Ordering::Acquire)
    }

    // ── Control thread ──────────────────────────────────────────────────────

    /// Build, prepare and publish a graph for `tree`.
    ///
    /// On error nothing changes: the previous graph stays live and no
    /// listener is called.
    pub fn load_from(&self, tree: ConfigNode) -> Result<(), LoadError> {
        let (snapshot, listeners) = {
            let mut control = self.control.lock();

            let mut root = GraphBuilder::new(&self.registry)
                .build_chain(&tree)
                .inspect_err(|e| tracing::warn!("chain_load: rejected: {e}"))?;
            root.prepare(&control.spec);
            let topology = root.describe();

            let generation = self.generation.load(Ordering::Acquire) + 1;
            let snapshot = Arc::new(ChainSnapshot {
                generation,
                config: Arc::new(tree),
                topology,
            });

            let previous = self.graph.swap(Some(Arc::new(GraphSlot {
                root: Mutex::new(root),
            })));
            self.snapshot.store(Some(Arc::clone(&snapshot)));
            self.generation.store(generation, Ordering::Release);

            if let Some(previous) = previous {
                control.retired.retire(previous);
            }
            control.retired.collect();

            tracing::info!(
                "chain_load: generation {generation} live ({} effects)",
                snapshot.topology.effect_count()
            );
            (snapshot, control.listeners.snapshot())
        };

        for listener in listeners {
            listener.chain_changed(&snapshot);
        }
        Ok(())
    }

    /// Parse YAML and load it.
    pub fn load_from_yaml(&self, text: &str) -> Result<(), LoadError> {
        self.load_parsed(rackgraph_config::parse_yaml(text))
    }

    /// Parse JSON and load it.
    pub fn load_from_json(&self, text: &str) -> Result<(), LoadError> {
        self.load_parsed(rackgraph_config::parse_json(text))
    }

    /// Parse XML and load it.
    pub fn load_from_xml(&self, text: &str) -> Result<(), LoadError> {
        self.load_parsed(rackgraph_config::parse_xml(text))
    }

    /// Parse TOML and load it.
    pub fn load_from_toml(&self, text: &str) -> Result<(), LoadError> {
        self.load_parsed(rackgraph_config::parse_toml(text))
    }

    /// Parse text of any supported format (detected from its content) and
    /// load it.
    pub fn load_from_str(&self, text: &str) -> Result<(), LoadError> {
        self.load_parsed(rackgraph_config::parse_str(text))
    }

    /// Read a configuration file and load it.
    pub fn load_from_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), LoadError> {
        self.load_parsed(rackgraph_config::load_file(path))
    }

    fn load_parsed(&self, parsed: Result<ConfigNode, ConfigError>) -> Result<(), LoadError> {
        let tree = parsed.inspect_err(|e| tracing::warn!("chain_load: parse failed: {e}"))?;
        self.load_from(tree)
    }

    /// Drop replaced graphs the audio thread no longer uses. Returns how
    /// many were dropped.
    pub fn collect_garbage(&self) -> usize {
        self.control.lock().retired.collect()
    }

    /// Replaced graphs not yet dropped.
    pub fn pending_reclamation(&self) -> usize {
        self.control.lock().retired.len()
    }

    /// Register a listener for successful loads.
    pub fn add_listener(&self, listener: Arc<dyn ChainListener>) -> ListenerId {
        self.control.lock().listeners.add(listener)
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.control.lock().listeners.remove(id)
    }

    // ── Introspection ───────────────────────────────────────────────────────

    /// Tree the live graph was built from.
    pub fn current_config_tree(&self) -> Option<Arc<ConfigNode>> {
        self.snapshot.load_full().map(|s| Arc::clone(&s.config))
    }

    /// Shape of the live graph.
    pub fn current_topology(&self) -> Option<Topology> {
        self.snapshot.load_full().map(|s| s.topology.clone())
    }

    /// Everything known about the live graph.
    pub fn current_snapshot(&self) -> Option<Arc<ChainSnapshot>> {
        self.snapshot.load_full()
    }

    /// Number of successful loads.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Spec the live graph (and the next one) is prepared with.
    pub fn current_spec(&self) -> ProcessSpec {
        self.control.lock().spec
    }

    /// Whether a graph is loaded.
    pub fn has_graph(&self) -> bool {
        self.graph.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn stereo(value: f32, len: usize) -> AudioBuffer {
        AudioBuffer::from_channels(vec![vec![value; len], vec![value; len]])
    }

    #[test]
    fn empty_controller_passes_through() {
        let chain = ChainController::new();
        assert!(!chain.has_graph());
        assert!(chain.current_config_tree().is_none());
        assert!(chain.current_topology().is_none());

        let mut buffer = stereo(0.3, 16);
        chain.process(&mut buffer);
        assert_eq!(buffer, stereo(0.3, 16));
        chain.reset();
    }

    #[test]
    fn default_spec() {
        let chain = ChainController::new();
        assert_eq!(chain.current_spec(), ProcessSpec::new(44100.0, 512, 2));
    }

    #[test]
    fn load_publishes_and_counts() {
        let chain = ChainController::new();
        chain.prepare(&ProcessSpec::new(48000.0, 64, 2));
        chain.load_from_yaml("- type: Gain\n  gain: 2.0\n").unwrap();
        chain.load_from_json(r#"[{"type": "Gain", "gain": 0.25}]"#).unwrap();
        assert_eq!(chain.generation(), 2);

        let mut buffer = stereo(1.0, 8);
        chain.process(&mut buffer);
        assert_eq!(buffer.channel(1), &[0.25; 8]);

        let tree = chain.current_config_tree().unwrap();
        assert_eq!(tree.children().len(), 1);
        assert_eq!(chain.current_snapshot().unwrap().generation, 2);
    }

    #[test]
    fn parse_failure_never_builds() {
        let chain = ChainController::new();
        let err = chain.load_from_xml("<Chain>").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert_eq!(chain.generation(), 0);
        assert!(!chain.has_graph());
    }

    #[test]
    fn prepare_reaches_live_graph() {
        let chain = ChainController::new();
        chain.load_from_yaml("- type: Gain\n").unwrap();
        let spec = ProcessSpec::new(96000.0, 32, 1);
        chain.prepare(&spec);
        assert_eq!(chain.current_spec(), spec);
        chain.prepare(&spec);

        let mut buffer = AudioBuffer::from_channels(vec![vec![0.5; 32]]);
        chain.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[0.5; 32]);
    }

    #[test]
    fn reset_applies_before_next_block() {
        // 1 ms delay, fully wet: 48 samples at 48 kHz.
        let delayed = || {
            let chain = ChainController::new();
            chain.prepare(&ProcessSpec::new(48000.0, 64, 1));
            chain
                .load_from_yaml("- type: Delay\n  time: 0.001\n  feedback: 0\n  mix: 1\n")
                .unwrap();
            let mut primed = AudioBuffer::from_channels(vec![vec![1.0; 64]]);
            chain.process(&mut primed);
            chain
        };

        let ringing = delayed();
        let mut echo = AudioBuffer::from_channels(vec![vec![0.0; 64]]);
        ringing.process(&mut echo);
        assert!(echo.channel(0).iter().any(|&s| s != 0.0));

        let cleared = delayed();
        cleared.reset();
        assert!(cleared.reset_pending());
        let mut silent = AudioBuffer::from_channels(vec![vec![0.0; 64]]);
        cleared.process(&mut silent);
        assert!(!cleared.reset_pending());
        assert_eq!(silent.channel(0), &[0.0; 64]);
    }

    #[test]
    fn load_from_str_accepts_flow_yaml() {
        let chain = ChainController::new();
        chain.load_from_str("[{type: Gain, gain: 0.5}]").unwrap();
        assert_eq!(chain.current_topology().unwrap().effect_count(), 1);
    }

    #[test]
    fn listener_removal() {
        let chain = ChainController::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = chain.add_listener(Arc::new(move |_: &ChainSnapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        chain.load_from_yaml("- type: Gain\n").unwrap();
        assert!(chain.remove_listener(id));
        chain.load_from_yaml("- type: Gain\n").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!chain.remove_listener(id));
    }

    #[test]
    fn unreferenced_graphs_are_reclaimed_on_load() {
        let chain = ChainController::new();
        for _ in 0..4 {
            chain.load_from_yaml("- type: Reverb\n").unwrap();
        }
        assert_eq!(chain.pending_reclamation(), 0);
        assert_eq!(chain.collect_garbage(), 0);
    }
}
