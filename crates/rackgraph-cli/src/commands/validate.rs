//! Configuration validation command.

use std::path::PathBuf;

use clap::Args;
use rackgraph_engine::GraphBuilder;
use rackgraph_registry::EffectRegistry;

#[derive(Args)]
pub struct ValidateArgs {
    /// Configuration files to check
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let registry = EffectRegistry::new();
    let builder = GraphBuilder::new(&registry);
    let mut failures = 0;

    for path in &args.files {
        let result = rackgraph_config::load_file(path)
            .map_err(anyhow::Error::from)
            .and_then(|tree| builder.build_chain(&tree).map_err(anyhow::Error::from));

        match result {
            Ok(graph) => {
                println!(
                    "ok    {} ({} effects)",
                    path.display(),
                    graph.describe().effect_count()
                );
            }
            Err(e) => {
                failures += 1;
                println!("error {}: {e}", path.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} file(s) failed validation", args.files.len());
    }
    Ok(())
}
