//! Effect listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use rackgraph_registry::{EffectCategory, EffectDescriptor, EffectRegistry};

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect (canonical name or synonym)
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,

    /// Only list effects in this category
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let registry = EffectRegistry::new();

    if let Some(name) = &args.effect {
        let effect = registry
            .get(name)
            .or_else(|| {
                registry
                    .all_effects()
                    .find(|e| e.name.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| anyhow::anyhow!("Unknown effect: {}", name))?;
        print_details(effect);
        return Ok(());
    }

    let categories: Vec<EffectCategory> = match &args.category {
        Some(name) => vec![
            EffectCategory::parse(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", name))?,
        ],
        None => EffectCategory::ALL.to_vec(),
    };

    println!("Available Effects");
    println!("=================");

    for category in categories {
        let effects: Vec<&EffectDescriptor> = registry.effects_in_category(category).collect();
        if effects.is_empty() {
            continue;
        }
        println!();
        println!("{}:", category.name());
        for effect in effects {
            println!("  {:15} - {}", effect.name, effect.description);
        }
    }

    println!();
    println!("Use 'rackgraph effects <name>' for detailed parameter info.");
    Ok(())
}

fn print_details(effect: &EffectDescriptor) {
    println!("{}", effect.name);
    println!("{}", "=".repeat(effect.name.len()));
    println!();
    println!("{}", effect.description);
    println!("Category: {}", effect.category.name());
    if !effect.aliases.is_empty() {
        println!("Also accepted as: {}", effect.aliases.join(", "));
    }
    println!();

    if effect.params.is_empty() && effect.choices.is_empty() {
        println!("No parameters.");
        return;
    }

    println!("Parameters:");
    println!();
    println!(
        "  {:14}  {:22}  {:10}  {}",
        "Key", "Name", "Default", "Range"
    );
    println!(
        "  {:14}  {:22}  {:10}  {}",
        "---", "----", "-------", "-----"
    );
    for param in effect.params {
        let unit = param.unit.suffix();
        println!(
            "  {:14}  {:22}  {:10}  {}..{} {}",
            param.key, param.name, param.default, param.min, param.max, unit
        );
    }
    for choice in effect.choices {
        println!(
            "  {:14}  {:22}  {:10}  {}",
            choice.key,
            "(choice)",
            choice.default,
            choice.options.join(" | ")
        );
    }

    println!();
    println!("Example:");
    println!();
    println!("  effects:");
    println!("    - type: {}", effect.name);
    for param in effect.params.iter().take(2) {
        println!("      {}: {}", param.key, param.default);
    }
}
