//! Checksum command - Digest all rows instead of writing files
//!
//! Prints one digest per worker. A whole-table run prints a single line.

use anyhow::Result;
use clap::Args;
use unload_config::Config;
use unload_pipeline::OutputMode;
use unload_protocol::HashAlgorithm;

use super::{ExtractArgs, run_extraction};

/// Checksum command arguments
#[derive(Args, Debug, Default)]
pub struct ChecksumArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// Hash algorithm (md5, sha256)
    #[arg(short, long)]
    algorithm: Option<HashAlgorithm>,
}

/// Run the checksum command
pub async fn run(args: ChecksumArgs, mut config: Config) -> Result<()> {
    args.extract.apply(&mut config);
    if let Some(algorithm) = args.algorithm {
        config.digest.algorithm = algorithm;
    }

    let report = run_extraction(&config, OutputMode::Digest).await?;

    let digests = report.digests();
    match digests.as_slice() {
        [(_, digest)] => println!("{digest}"),
        _ => {
            for (worker, digest) in &digests {
                println!("worker {worker}: {digest}");
            }
        }
    }
    tracing::info!(
        algorithm = config.digest.algorithm.as_str(),
        rows = report.rows(),
        "checksum finished"
    );
    Ok(())
}
