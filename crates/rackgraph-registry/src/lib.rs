//! Effect registry and factory for rackgraph leaf effects.
//!
//! Maps the `type` names used in configuration files to leaf effect
//! constructors. Lookup is an exact, case-sensitive match against each
//! effect's canonical name and its synonyms (`EQ` for `Filter`, `Gate` for
//! `NoiseGate`, ...). An unknown name is not an error here; the graph builder
//! decides what to do with it.
//!
//! The registry holds no mutable state, so one instance can be shared by any
//! number of threads.
//!
//! # Example
//!
//! ```rust
//! use rackgraph_registry::{EffectCategory, EffectRegistry};
//!
//! let registry = EffectRegistry::new();
//!
//! // Synonyms resolve to the same effect
//! assert_eq!(registry.canonical_name("EQ"), Some("Filter"));
//! assert!(registry.create("MoogFilter").is_some());
//! assert!(registry.create("moogfilter").is_none());
//!
//! for effect in registry.effects_in_category(EffectCategory::Dynamics) {
//!     println!("{}: {}", effect.name, effect.description);
//! }
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! rackgraph-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use rackgraph_core::{Effect, ParamDescriptor};
use rackgraph_effects::{
    Chorus, Compressor, Delay, Drive, Filter, Gain, LadderFilter, Limiter, NoiseGate, Panner,
    Phaser, Reverb,
};

/// Category of audio effect for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Dynamics processing (compressor, limiter, gate)
    Dynamics,
    /// Distortion and saturation effects
    Distortion,
    /// Modulation effects (chorus, phaser)
    Modulation,
    /// Time-based effects (delay, reverb)
    TimeBased,
    /// Filter effects
    Filter,
    /// Utility effects (gain, pan)
    Utility,
}

impl EffectCategory {
    /// All categories, in display order.
    pub const ALL: [EffectCategory; 6] = [
        EffectCategory::Dynamics,
        EffectCategory::Distortion,
        EffectCategory::Modulation,
        EffectCategory::TimeBased,
        EffectCategory::Filter,
        EffectCategory::Utility,
    ];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::Dynamics => "Dynamics",
            EffectCategory::Distortion => "Distortion",
            EffectCategory::Modulation => "Modulation",
            EffectCategory::TimeBased => "Time-Based",
            EffectCategory::Filter => "Filter",
            EffectCategory::Utility => "Utility",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            EffectCategory::Dynamics => "Compressors, limiters and gates",
            EffectCategory::Distortion => "Overdrive and waveshaping effects",
            EffectCategory::Modulation => "Chorus, phaser and other LFO-driven effects",
            EffectCategory::TimeBased => "Delay, reverb, and other time-based effects",
            EffectCategory::Filter => "Biquad and ladder filters",
            EffectCategory::Utility => "Gain stages and panning",
        }
    }

    /// Parse a category name, ASCII case-insensitive. Accepts `time-based`,
    /// `timebased` and `time_based`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|c| {
            name.eq_ignore_ascii_case(c.name())
                || (*c == EffectCategory::TimeBased
                    && (name.eq_ignore_ascii_case("timebased")
                        || name.eq_ignore_ascii_case("time_based")))
        })
    }
}

/// A text-valued parameter and the values it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceParam {
    /// Configuration key.
    pub key: &'static str,
    /// Accepted values (matched ASCII case-insensitively).
    pub options: &'static [&'static str],
    /// Value used when the key is absent or unrecognised.
    pub default: &'static str,
}

/// Describes an effect in the registry.
#[derive(Debug, Clone)]
pub struct EffectDescriptor {
    /// Canonical type name, as used in configuration files.
    pub name: &'static str,
    /// Synonyms accepted in place of `name`.
    pub aliases: &'static [&'static str],
    /// Brief description of the effect.
    pub description: &'static str,
    /// Category for organization.
    pub category: EffectCategory,
    /// Numeric parameters.
    pub params: &'static [ParamDescriptor],
    /// Text parameters.
    pub choices: &'static [ChoiceParam],
}

impl EffectDescriptor {
    /// Whether `type_name` is this effect's name or one of its synonyms.
    pub fn matches(&self, type_name: &str) -> bool {
        self.name == type_name || self.aliases.contains(&type_name)
    }

    /// Look up a numeric parameter by key.
    pub fn param(&self, key: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.key == key)
    }
}

/// Factory function type for creating effects.
pub type EffectFactory = fn() -> Box<dyn Effect + Send>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: EffectDescriptor,
    factory: EffectFactory,
}

/// Registry of all available leaf effects.
pub struct EffectRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Create a new registry with all built-in effects registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(12),
        };
        registry.register_builtin_effects();
        registry
    }

    /// Register all built-in effects.
    fn register_builtin_effects(&mut self) {
        self.register(
            EffectDescriptor {
                name: "Gain",
                aliases: &[],
                description: "Smoothed gain stage (linear or dB)",
                category: EffectCategory::Utility,
                params: rackgraph_effects::gain::PARAMS,
                choices: &[],
            },
            || Box::new(Gain::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Filter",
                aliases: &["EQ"],
                description: "Biquad low-pass, high-pass or band-pass filter",
                category: EffectCategory::Filter,
                params: rackgraph_effects::filter::PARAMS,
                choices: &[ChoiceParam {
                    key: "mode",
                    options: &["LowPass", "HighPass", "BandPass"],
                    default: "LowPass",
                }],
            },
            || Box::new(Filter::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Compressor",
                aliases: &[],
                description: "Feed-forward compressor with linked detection",
                category: EffectCategory::Dynamics,
                params: rackgraph_effects::compressor::PARAMS,
                choices: &[],
            },
            || Box::new(Compressor::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Limiter",
                aliases: &[],
                description: "Instant-attack peak limiter",
                category: EffectCategory::Dynamics,
                params: rackgraph_effects::limiter::PARAMS,
                choices: &[],
            },
            || Box::new(Limiter::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Delay",
                aliases: &[],
                description: "Feedback delay with wet/dry mix",
                category: EffectCategory::TimeBased,
                params: rackgraph_effects::delay::PARAMS,
                choices: &[],
            },
            || Box::new(Delay::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Drive",
                aliases: &["Distortion"],
                description: "Arctangent overdrive",
                category: EffectCategory::Distortion,
                params: rackgraph_effects::drive::PARAMS,
                choices: &[],
            },
            || Box::new(Drive::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Phaser",
                aliases: &[],
                description: "Four-stage allpass phaser with LFO",
                category: EffectCategory::Modulation,
                params: rackgraph_effects::phaser::PARAMS,
                choices: &[],
            },
            || Box::new(Phaser::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Chorus",
                aliases: &[],
                description: "Modulated delay chorus",
                category: EffectCategory::Modulation,
                params: rackgraph_effects::chorus::PARAMS,
                choices: &[],
            },
            || Box::new(Chorus::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Reverb",
                aliases: &[],
                description: "Freeverb-style algorithmic reverb",
                category: EffectCategory::TimeBased,
                params: rackgraph_effects::reverb::PARAMS,
                choices: &[],
            },
            || Box::new(Reverb::new()),
        );

        self.register(
            EffectDescriptor {
                name: "NoiseGate",
                aliases: &["Gate"],
                description: "Downward expander noise gate",
                category: EffectCategory::Dynamics,
                params: rackgraph_effects::noise_gate::PARAMS,
                choices: &[],
            },
            || Box::new(NoiseGate::new()),
        );

        self.register(
            EffectDescriptor {
                name: "LadderFilter",
                aliases: &["MoogFilter"],
                description: "Four-pole ladder filter with saturated resonance",
                category: EffectCategory::Filter,
                params: rackgraph_effects::ladder::PARAMS,
                choices: &[ChoiceParam {
                    key: "mode",
                    options: &["LP12", "LP24", "HP12", "HP24", "BP12", "BP24"],
                    default: "LP12",
                }],
            },
            || Box::new(LadderFilter::new()),
        );

        self.register(
            EffectDescriptor {
                name: "Panner",
                aliases: &["Pan"],
                description: "Stereo panner with selectable pan law",
                category: EffectCategory::Utility,
                params: rackgraph_effects::panner::PARAMS,
                choices: &[ChoiceParam {
                    key: "rule",
                    options: &[
                        "linear", "balanced", "sin3dB", "sin4.5dB", "sin6dB", "square", "sqrt4.5dB",
                    ],
                    default: "balanced",
                }],
            },
            || Box::new(Panner::new()),
        );
    }

    /// Register an effect.
    ///
    /// Lookups scan in registration order, so a name or synonym already
    /// taken by an earlier entry shadows the new one.
    pub fn register(&mut self, descriptor: EffectDescriptor, factory: EffectFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    fn entry(&self, type_name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.matches(type_name))
    }

    /// Create a fresh, unconfigured effect for a type name or synonym.
    ///
    /// Returns `None` for unknown names.
    pub fn create(&self, type_name: &str) -> Option<Box<dyn Effect + Send>> {
        self.entry(type_name).map(|e| (e.factory)())
    }

    /// Get the descriptor for a type name or synonym.
    pub fn get(&self, type_name: &str) -> Option<&EffectDescriptor> {
        self.entry(type_name).map(|e| &e.descriptor)
    }

    /// Canonical name for a type name or synonym.
    pub fn canonical_name(&self, type_name: &str) -> Option<&'static str> {
        self.get(type_name).map(|d| d.name)
    }

    /// Whether a type name or synonym is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entry(type_name).is_some()
    }

    /// Descriptors of all registered effects, in registration order.
    pub fn all_effects(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    /// Descriptors of the effects in one category.
    pub fn effects_in_category(
        &self,
        category: EffectCategory,
    ) -> impl Iterator<Item = &EffectDescriptor> {
        self.all_effects().filter(move |d| d.category == category)
    }

    /// Every accepted type name: canonical names followed by their synonyms.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.all_effects()
            .flat_map(|d| core::iter::once(d.name).chain(d.aliases.iter().copied()))
    }

    /// Number of registered effects (synonyms not counted).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
