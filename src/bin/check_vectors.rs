use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use zkfocil_vectors::{HashFunction, TestVector, VectorRecord};

/// Default maximum size of a vector file (1MB).
/// A depth-20 record is a few kilobytes; anything larger is not a vector file.
const DEFAULT_MAX_VECTOR_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Parser, Debug)]
#[command(author, version, about = "Check a zkFOCIL test vector record", long_about = None)]
struct Args {
    #[arg(short, long)]
    vector_file: PathBuf,

    /// Hash used for leaves and tree nodes when the record was generated.
    #[arg(long, default_value = "blake2s")]
    hash: HashFunction,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Loading test vector from: {}", args.vector_file.display());
    let metadata = std::fs::metadata(&args.vector_file)
        .context("Failed to read vector file metadata")?;
    if metadata.len() > DEFAULT_MAX_VECTOR_FILE_SIZE {
        return Err(anyhow::anyhow!(
            "Vector file too large: {} bytes (max {} bytes)",
            metadata.len(),
            DEFAULT_MAX_VECTOR_FILE_SIZE
        ));
    }

    let record = VectorRecord::load_from_file(&args.vector_file)?;
    let vector = TestVector::try_from(&record).context("Malformed test vector record")?;

    match vector.validate(&args.hash) {
        Ok(()) => {
            info!("Test vector check PASSED");
            info!("Tree depth: {}, path depth: {}", vector.tree_depth, vector.path_depth());
            Ok(())
        }
        Err(e) => {
            error!("Test vector check FAILED: {e}");
            Err(e)
        }
    }
}
