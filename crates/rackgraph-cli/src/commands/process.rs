//! File-based chain processing command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rackgraph_core::{AudioBuffer, ProcessSpec, linear_to_db};
use rackgraph_engine::ChainController;

use crate::wav::{WavSpec, read_wav, write_wav};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Chain configuration (YAML, JSON, XML or TOML)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Processing block size
    #[arg(long, default_value = "512", value_parser = clap::value_parser!(u32).range(1..=65536))]
    block_size: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = ["16", "24", "32"])]
    bit_depth: String,

    /// Seconds of silence appended so reverb and delay tails ring out
    #[arg(long, default_value = "0")]
    tail: f32,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let bit_depth: u16 = args.bit_depth.parse()?;
    let block_size = args.block_size as usize;

    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let channels = input.num_channels();
    if channels == 0 {
        anyhow::bail!("{} has no audio channels", args.input.display());
    }

    let tail_frames = (args.tail.max(0.0) * spec.sample_rate as f32) as usize;
    let total_frames = input.len() + tail_frames;
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        input.len(),
        channels,
        spec.sample_rate,
        input.len() as f32 / spec.sample_rate as f32
    );

    let chain = ChainController::new();
    chain.prepare(&ProcessSpec::new(
        spec.sample_rate as f32,
        block_size,
        channels,
    ));
    chain
        .load_from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    if let Some(topology) = chain.current_topology() {
        println!(
            "Processing with {} effect(s) from {}...",
            topology.effect_count(),
            args.config.display()
        );
    }

    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output = AudioBuffer::new(channels, total_frames);
    let mut block = AudioBuffer::new(channels, block_size);
    let mut start = 0;
    while start < total_frames {
        let len = block_size.min(total_frames - start);
        load_block(&mut block, &input, start, len);

        chain.process(&mut block);

        for ch in 0..channels {
            output.channel_mut(ch)[start..start + len].copy_from_slice(block.channel(ch));
        }
        start += len;
        pb.set_position(start as u64);
    }
    pb.finish_with_message("done");
    tracing::debug!(
        "process: {} frames in blocks of {block_size}, {tail_frames} tail",
        total_frames
    );

    println!("\nStats:");
    println!("  Input:  Peak {:.1} dB", linear_to_db(peak(&input)));
    println!("  Output: Peak {:.1} dB", linear_to_db(peak(&output)));

    let out_spec = WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

/// Fill `block` with `len` frames of `input` from `start`, zero-padding past
/// the end of the input.
fn load_block(block: &mut AudioBuffer, input: &AudioBuffer, start: usize, len: usize) {
    block.set_len(len);
    let from = start.min(input.len());
    let available = (input.len() - from).min(len);
    for ch in 0..block.num_channels().min(input.num_channels()) {
        let dst = block.channel_mut(ch);
        dst[..available].copy_from_slice(&input.channel(ch)[from..from + available]);
        dst[available..].fill(0.0);
    }
}

fn peak(buffer: &AudioBuffer) -> f32 {
    (0..buffer.num_channels())
        .flat_map(|ch| buffer.channel(ch).iter())
        .fold(0.0, |peak: f32, s| peak.max(s.abs()))
}
