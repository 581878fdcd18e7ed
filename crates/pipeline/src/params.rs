//! Immutable run parameters
//!
//! Built once from the configuration and shared read-only by every worker.

use unload_config::Config;
use unload_protocol::{Codec, Dialect};
use unload_sinks::{DigestSinkConfig, FileSinkConfig, SinkConfig};

use crate::error::Result;

/// Where rows end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Rotating delimited files
    Files,
    /// One digest per worker
    Digest,
}

/// Run parameters
#[derive(Debug, Clone)]
pub struct Params {
    /// Query text; ranged queries take the bounds as two positional parameters
    pub query: String,
    pub dialect: Dialect,
    /// Statements run by each worker after connecting
    pub session_init: Vec<String>,
    pub parallel: usize,
    /// Inclusive partition key bounds; `None` runs the whole table once
    pub range: Option<(i64, i64)>,
    pub batch_size: u64,
    pub codec: Codec,
    pub sink: SinkConfig,
}

impl Params {
    /// Resolve configuration into run parameters
    ///
    /// Reads the query file when one is configured.
    pub fn from_config(config: &Config, mode: OutputMode) -> Result<Self> {
        config.validate()?;

        let dialect = config.source.dialect();
        let output = &config.output;
        let codec = Codec::new(output.delimiter)
            .with_quote(output.quote)
            .with_quote_scope(output.quote_scope)
            .with_fraction(dialect.type_table().fraction());

        let sink = match mode {
            OutputMode::Files => SinkConfig::File(FileSinkConfig {
                base_name: config.base_name(),
                delimiter: output.delimiter,
                max_file_size_mb: output.max_file_size_mb,
                compress: output.compress,
                size_check_interval: output.size_check_interval,
                compression_ratio: output.compression_ratio,
                buffer_size: output.buffer_size,
            }),
            OutputMode::Digest => SinkConfig::Digest(DigestSinkConfig {
                algorithm: config.digest.algorithm,
                delimiter: output.delimiter,
            }),
        };

        Ok(Self {
            query: config.query_text()?,
            dialect,
            session_init: config.source.session_statements(),
            parallel: config.extract.parallel,
            range: config.extract.range(),
            batch_size: config.extract.batch_size,
            codec,
            sink,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use unload_protocol::{Delimiter, HashAlgorithm};

    fn config(extra: &str) -> Config {
        let toml = format!(
            "[source]\nurl = \"memory:\"\ndialect = \"sqlite\"\n[extract]\nquery = \"SELECT 1\"\n{extra}"
        );
        Config::from_str(&toml).unwrap()
    }

    #[test]
    fn test_file_params_from_config() {
        let config = config("parallel = 2\nrange_start = 1\nrange_end = 9\n[output]\nbase_name = \"out\"\ndelimiter = \"comma\"\ncompress = true");
        let params = Params::from_config(&config, OutputMode::Files).unwrap();

        assert_eq!(params.range, Some((1, 9)));
        assert_eq!(params.parallel, 2);
        assert_eq!(params.codec.delimiter(), Delimiter::Comma);
        assert!(params.session_init.is_empty());
        match params.sink {
            SinkConfig::File(file) => {
                assert_eq!(file.base_name, "out");
                assert!(file.compress);
                assert_eq!(file.delimiter, Delimiter::Comma);
            }
            other => panic!("unexpected sink {}", other.kind()),
        }
    }

    #[test]
    fn test_digest_params_from_config() {
        let config = config("[digest]\nalgorithm = \"sha256\"");
        let params = Params::from_config(&config, OutputMode::Digest).unwrap();

        assert_eq!(params.range, None);
        match params.sink {
            SinkConfig::Digest(digest) => assert_eq!(digest.algorithm, HashAlgorithm::Sha256),
            other => panic!("unexpected sink {}", other.kind()),
        }
    }

    #[test]
    fn test_incomplete_config_rejected() {
        let config = Config::from_str("[extract]\nquery = \"SELECT 1\"").unwrap();
        assert!(Params::from_config(&config, OutputMode::Files).is_err());
    }
}
