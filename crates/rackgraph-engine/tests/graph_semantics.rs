//! End-to-end graph semantics: configuration text in, audio out.

use std::sync::atomic::{AtomicUsize, Ordering};

use rackgraph_core::{AudioBuffer, ConfigNode, Effect, GroupMode, ProcessSpec, Topology};
use rackgraph_engine::ChainController;
use rackgraph_registry::{EffectCategory, EffectDescriptor, EffectRegistry};
use tempfile::TempDir;

const BLOCK: usize = 256;

fn spec() -> ProcessSpec {
    ProcessSpec::new(48000.0, BLOCK, 2)
}

fn test_signal() -> AudioBuffer {
    let left = (0..BLOCK).map(|i| ((i as f32) * 0.05).sin() * 0.6).collect();
    let right = (0..BLOCK).map(|i| ((i as f32) * 0.02).sin() * 0.3).collect();
    AudioBuffer::from_channels(vec![left, right])
}

fn render_with(chain: &ChainController) -> AudioBuffer {
    let mut buffer = test_signal();
    chain.process(&mut buffer);
    buffer
}

fn render_yaml(yaml: &str) -> AudioBuffer {
    let chain = ChainController::new();
    chain.prepare(&spec());
    chain.load_from_yaml(yaml).unwrap();
    render_with(&chain)
}

#[test]
fn parallel_gains_sum() {
    let out = render_yaml(
        "
- type: Group
  mode: parallel
  children:
    - type: Gain
      gain: 0.5
    - type: Gain
      gain: 0.25
",
    );
    let input = test_signal();
    for ch in 0..2 {
        for (y, x) in out.channel(ch).iter().zip(input.channel(ch)) {
            assert_eq!(*y, 0.5 * x + 0.25 * x);
        }
    }
}

#[test]
fn group_metadata_is_ignored_like_effect_metadata() {
    let with_metadata = render_yaml(
        "
- type: Group
  mode: parallel
  ui: { color: red }
  tags: [warm, wide]
  children:
    - type: Gain
      gain: 0.5
      ui: { color: blue }
",
    );
    let plain = render_yaml(
        "
- type: Group
  mode: parallel
  children:
    - type: Gain
      gain: 0.5
",
    );
    assert_eq!(with_metadata, plain);
}

#[test]
fn series_order_matters() {
    let gain_then_drive = render_yaml("- type: Gain\n  gain: 4\n- type: Drive\n  drive: 0.8\n");
    let drive_then_gain = render_yaml("- type: Drive\n  drive: 0.8\n- type: Gain\n  gain: 4\n");
    assert_ne!(gain_then_drive, drive_then_gain);
}

#[test]
fn series_repeat_compounds() {
    let out = render_yaml(
        "
- type: Group
  repeat: 3
  children:
    - type: Gain
      gain: 0.5
",
    );
    let input = test_signal();
    for (y, x) in out.channel(0).iter().zip(input.channel(0)) {
        assert_eq!(*y, x * 0.5 * 0.5 * 0.5);
    }
}

#[test]
fn synonyms_render_identically() {
    let eq = render_yaml("- type: EQ\n  mode: HighPass\n  frequency: 2000\n  q: 2\n");
    let filter = render_yaml("- type: Filter\n  mode: HighPass\n  frequency: 2000\n  q: 2\n");
    assert_eq!(eq, filter);

    let gate = render_yaml("- type: Gate\n  threshold: -20\n");
    let noise_gate = render_yaml("- type: NoiseGate\n  threshold: -20\n");
    assert_eq!(gate, noise_gate);
}

#[test]
fn nested_parameter_equals_direct_attribute() {
    let direct = render_yaml("- type: Gain\n  gain_db: -6\n");
    let nested = render_yaml("- type: Gain\n  gain_db:\n    value: -6\n    ui: knob\n");
    let default_only = render_yaml("- type: Gain\n  gain_db:\n    default: -6\n");
    assert_eq!(direct, nested);
    assert_eq!(direct, default_only);

    // A direct attribute wins over a nested one.
    let both = ChainController::new();
    both.prepare(&spec());
    both.load_from(
        ConfigNode::new("Chain").with_child(
            ConfigNode::new("Effect")
                .with_attribute("type", "Gain")
                .with_attribute("gain", 0.2)
                .with_child(ConfigNode::new("gain").with_attribute("value", 0.9)),
        ),
    )
    .unwrap();
    let out = render_with(&both);
    let input = test_signal();
    assert_eq!(out.channel(0)[10], input.channel(0)[10] * 0.2);
}

const YAML: &str = "
- type: Compressor
  threshold: -20
  ratio: 3
- type: Group
  mode: parallel
  children:
    - type: Delay
      time: 0.002
      mix: 1
    - type: LadderFilter
      frequency: 900
      mode: LP24
- type: Panner
  pan: 0.3
";

const JSON: &str = r#"[
  { "type": "Compressor", "threshold": -20, "ratio": 3 },
  { "type": "Group", "mode": "parallel", "children": [
    { "type": "Delay", "time": 0.002, "mix": 1 },
    { "type": "LadderFilter", "frequency": 900, "mode": "LP24" }
  ]},
  { "type": "Panner", "pan": 0.3 }
]"#;

const XML: &str = r#"<Chain>
  <Effect type="Compressor" threshold="-20" ratio="3"/>
  <Group mode="parallel">
    <Effect type="Delay" time="0.002" mix="1"/>
    <Effect type="LadderFilter" frequency="900" mode="LP24"/>
  </Group>
  <Effect type="Panner" pan="0.3"/>
</Chain>"#;

const TOML: &str = r#"
[[effects]]
type = "Compressor"
threshold = -20
ratio = 3

[[effects]]
type = "Group"
mode = "parallel"

[[effects.children]]
type = "Delay"
time = 0.002
mix = 1

[[effects.children]]
type = "LadderFilter"
frequency = 900
mode = "LP24"

[[effects]]
type = "Panner"
pan = 0.3
"#;

#[test]
fn every_format_renders_identically() {
    let reference = render_yaml(YAML);
    let loaders: [(&str, fn(&ChainController) -> Result<(), rackgraph_engine::LoadError>); 5] = [
        ("json", |c| c.load_from_json(JSON)),
        ("xml", |c| c.load_from_xml(XML)),
        ("toml", |c| c.load_from_toml(TOML)),
        ("str/xml", |c| c.load_from_str(XML)),
        ("str/toml", |c| c.load_from_str(TOML)),
    ];
    for (name, load) in loaders {
        let chain = ChainController::new();
        chain.prepare(&spec());
        load(&chain).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(render_with(&chain), reference, "{name}");
    }
}

#[test]
fn load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chain.json");
    std::fs::write(&path, JSON).unwrap();

    let chain = ChainController::new();
    chain.prepare(&spec());
    chain.load_from_file(&path).unwrap();
    assert_eq!(render_with(&chain), render_yaml(YAML));

    let missing = chain.load_from_file(dir.path().join("missing.yaml"));
    assert!(missing.unwrap_err().to_string().contains("failed to read file"));
    assert_eq!(chain.generation(), 1);
}

#[test]
fn topology_reports_live_shape() {
    let chain = ChainController::new();
    chain.load_from_yaml(YAML).unwrap();
    let topology = chain.current_topology().unwrap();
    assert_eq!(topology.effect_count(), 4);
    assert_eq!(topology.depth(), 3);
    match topology {
        Topology::Group { mode, children, .. } => {
            assert_eq!(mode, GroupMode::Series);
            assert_eq!(
                children[0],
                Topology::Effect {
                    type_name: "Compressor".into()
                }
            );
        }
        other => panic!("expected group root, got {other:?}"),
    }
}

#[test]
fn load_uses_last_prepared_spec() {
    let chain = ChainController::new();
    chain.prepare(&ProcessSpec::new(48000.0, 64, 1));
    chain
        .load_from_yaml(
            "
- type: Group
  mode: parallel
  children:
    - type: Gain
      gain: 0.5
",
        )
        .unwrap();

    // The group's scratch buffers were sized for 64 samples on one channel.
    let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 64]]);
    chain.process(&mut buffer);
    assert_eq!(buffer.channel(0), &[0.5; 64]);
}

// ── Invocation counts ─────────────────────────────────────────────────────

static PROCESS_CALLS: AtomicUsize = AtomicUsize::new(0);

struct CountCalls;

impl Effect for CountCalls {
    fn prepare(&mut self, _spec: &ProcessSpec) {}
    fn process(&mut self, _buffer: &mut AudioBuffer) {
        PROCESS_CALLS.fetch_add(1, Ordering::SeqCst);
    }
    fn reset(&mut self) {}
    fn configure(&mut self, _node: &ConfigNode) {}
}

#[test]
fn repeat_invokes_children_once_per_pass() {
    let mut registry = EffectRegistry::new();
    registry.register(
        EffectDescriptor {
            name: "CountCalls",
            aliases: &[],
            description: "Counts process calls",
            category: EffectCategory::Utility,
            params: &[],
            choices: &[],
        },
        || Box::new(CountCalls),
    );
    let chain = ChainController::with_registry(registry);
    chain.prepare(&spec());
    chain
        .load_from_yaml(
            "
- type: Group
  repeat: 3
  children:
    - type: CountCalls
- type: Group
  mode: parallel
  repeat: 2
  children:
    - type: CountCalls
    - type: CountCalls
",
        )
        .unwrap();

    let before = PROCESS_CALLS.load(Ordering::SeqCst);
    render_with(&chain);
    assert_eq!(PROCESS_CALLS.load(Ordering::SeqCst) - before, 3 + 2 * 2);
}
