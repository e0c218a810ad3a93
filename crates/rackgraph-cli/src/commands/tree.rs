//! Configuration tree and graph inspection command.

use std::path::PathBuf;

use clap::Args;
use rackgraph_engine::GraphBuilder;
use rackgraph_registry::EffectRegistry;

#[derive(Args)]
pub struct TreeArgs {
    /// Configuration file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Only print the built graph
    #[arg(long)]
    graph_only: bool,
}

pub fn run(args: TreeArgs) -> anyhow::Result<()> {
    let tree = rackgraph_config::load_file(&args.file)?;
    let registry = EffectRegistry::new();
    let topology = GraphBuilder::new(&registry).build_chain(&tree)?.describe();

    if !args.graph_only {
        println!("Configuration");
        println!("=============");
        print!("{tree}");
        println!();
    }
    println!("Graph");
    println!("=====");
    print!("{topology}");
    Ok(())
}
