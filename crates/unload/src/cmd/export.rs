//! Export command - Write rows to rotating delimited files

use anyhow::Result;
use clap::Args;
use unload_config::Config;
use unload_pipeline::OutputMode;
use unload_protocol::QuoteScope;

use super::{ExtractArgs, run_extraction};

/// Export command arguments
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// Output path prefix (default: query file name without extension)
    #[arg(short, long)]
    base_name: Option<String>,

    /// Target size of each output file in MB
    #[arg(long, value_name = "MB")]
    max_size: Option<u64>,

    /// Gzip each file once it is closed
    #[arg(long)]
    compress: bool,

    /// Write values without quotes
    #[arg(long, conflicts_with = "quote_all")]
    no_quote: bool,

    /// Quote numbers too
    #[arg(long)]
    quote_all: bool,
}

impl ExportArgs {
    fn apply(self, config: &mut Config) {
        self.extract.apply(config);
        if let Some(base_name) = self.base_name {
            config.output.base_name = Some(base_name);
        }
        if let Some(mb) = self.max_size {
            config.output.max_file_size_mb = mb;
        }
        if self.compress {
            config.output.compress = true;
        }
        if self.no_quote {
            config.output.quote = false;
        }
        if self.quote_all {
            config.output.quote = true;
            config.output.quote_scope = QuoteScope::All;
        }
    }
}

/// Run the export command
pub async fn run(args: ExportArgs, mut config: Config) -> Result<()> {
    args.apply(&mut config);

    let report = run_extraction(&config, OutputMode::Files).await?;

    println!(
        "exported {} rows to {} file(s) in {:.1}s",
        report.rows(),
        report.files().len(),
        report.elapsed.as_secs_f64()
    );
    for path in report.files() {
        println!("  {}", path.display());
    }
    Ok(())
}
