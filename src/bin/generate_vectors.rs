use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;
use zkfocil_vectors::{
    config::Config, GeneratorInputs, GeneratorSettings, HashFunction, OutputFormat,
    VectorGenerator, VectorRecord,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate zkFOCIL circuit test vectors", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Secret key as hex (any length, reduced modulo the group order).
    #[arg(short, long)]
    secret_key: Option<String>,

    /// Block parameters as 32 bytes of hex.
    #[arg(short, long)]
    block_params: Option<String>,

    /// Text encoding printed to stdout: `test` or `toml`.
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Path of the JSON record.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    leaf_count: Option<usize>,

    #[arg(long)]
    target_index: Option<usize>,

    #[arg(long)]
    tree_depth: Option<usize>,

    #[arg(long)]
    hash: Option<HashFunction>,

    /// Seed for reproducible random inputs.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn apply_to(&self, config: &mut Config) {
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(output) = &self.output {
            config.output.json_file = output.clone();
        }
        if let Some(leaf_count) = self.leaf_count {
            config.tree.leaf_count = leaf_count;
        }
        if let Some(depth) = self.tree_depth {
            config.tree.depth = depth;
        }
        if let Some(hash) = self.hash {
            config.tree.hash = hash;
        }
        if self.seed.is_some() {
            config.generator.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };
    args.apply_to(&mut config);
    debug!("Effective config: {:?}", config);

    let settings = GeneratorSettings::from(&config);
    let inputs = GeneratorInputs {
        secret_key_hex: args.secret_key.clone(),
        block_params_hex: args.block_params.clone(),
        target_index: args.target_index,
    };

    let vector = match config.generator.seed {
        Some(seed) => {
            info!("Using seeded randomness (seed {seed})");
            VectorGenerator::from_seed(settings, seed).generate(&inputs)
        }
        None => VectorGenerator::unseeded(settings).generate(&inputs),
    }
    .context("Failed to generate test vector")?;

    let rendered = config
        .output
        .format
        .render(&vector)
        .context("Failed to render test vector")?;
    let record = VectorRecord::from(&vector);

    println!("{rendered}");

    info!("Writing test vector to: {}", config.output.json_file.display());
    record.save_to_file(&config.output.json_file)?;

    info!("Key image x: {}", record.expected.key_image.x);
    info!("Validator root: {}", record.inputs.validator_root);

    Ok(())
}
