//! Configuration validation
//!
//! Two passes:
//! - value checks, run on every parse (counts, ratios, range bounds)
//! - completeness checks, run once CLI overrides are merged
//!   (source url, exactly one query)

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate field values
pub fn validate_config(config: &Config) -> Result<()> {
    validate_extract(config)?;
    validate_output(config)?;
    Ok(())
}

/// Validate that everything a run needs is present
pub fn validate_complete(config: &Config) -> Result<()> {
    validate_config(config)?;

    if config.source.url.trim().is_empty() {
        return Err(ConfigError::missing_field("source", "url"));
    }

    match (&config.extract.query, &config.extract.query_file) {
        (None, None) => Err(ConfigError::missing_field("extract", "query")),
        (Some(_), Some(_)) => Err(ConfigError::invalid_value(
            "extract",
            "query",
            "set either query or query_file, not both",
        )),
        _ => Ok(()),
    }
}

fn validate_extract(config: &Config) -> Result<()> {
    let extract = &config.extract;

    if extract.parallel == 0 {
        return Err(ConfigError::invalid_value(
            "extract",
            "parallel",
            "must be at least 1",
        ));
    }

    if extract.batch_size == 0 {
        return Err(ConfigError::invalid_value(
            "extract",
            "batch_size",
            "must be at least 1",
        ));
    }

    // end < start is allowed and yields zero partitions
    match (extract.range_start, extract.range_end) {
        (Some(_), None) => Err(ConfigError::MalformedRange(
            "range_start given without range_end".into(),
        )),
        (None, Some(_)) => Err(ConfigError::MalformedRange(
            "range_end given without range_start".into(),
        )),
        _ => Ok(()),
    }
}

fn validate_output(config: &Config) -> Result<()> {
    let output = &config.output;

    if output.max_file_size_mb == 0 {
        return Err(ConfigError::invalid_value(
            "output",
            "max_file_size_mb",
            "must be at least 1",
        ));
    }

    if output.size_check_interval == 0 {
        return Err(ConfigError::invalid_value(
            "output",
            "size_check_interval",
            "must be at least 1",
        ));
    }

    let ratio = output.compression_ratio;
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(ConfigError::invalid_value(
            "output",
            "compression_ratio",
            format!("{ratio} is outside (0, 1]"),
        ));
    }

    if output.buffer_size == 0 {
        return Err(ConfigError::invalid_value(
            "output",
            "buffer_size",
            "must be at least 1",
        ));
    }

    if let Some(base) = &output.base_name
        && base.trim().is_empty()
    {
        return Err(ConfigError::invalid_value(
            "output",
            "base_name",
            "must not be empty",
        ));
    }

    Ok(())
}
