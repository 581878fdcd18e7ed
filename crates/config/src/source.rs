//! Source database configuration

use serde::Deserialize;
use unload_protocol::Dialect;

/// Where rows come from
///
/// ```toml
/// [source]
/// url = "sqlite://warehouse.db"
/// dialect = "sqlite"
/// session_init = ["PRAGMA query_only = ON"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Connection URL handed to the connector
    pub url: String,

    /// Type table used to build column descriptors; inferred from the url
    /// scheme when unset
    pub dialect: Option<Dialect>,

    /// Statements each worker runs right after connecting
    pub session_init: Vec<String>,
}

impl SourceConfig {
    /// Session statements every Oracle worker issues unless overridden
    pub fn oracle_session_defaults() -> Vec<String> {
        vec![
            "alter session set time_zone='UTC'".to_string(),
            "alter session set NLS_NUMERIC_CHARACTERS = '. '".to_string(),
        ]
    }

    /// Configured dialect, else the one the url scheme implies
    ///
    /// `sqlite:` and `memory:` urls use the sqlite table, `snowflake:` the
    /// snowflake table; anything else is taken as Oracle.
    pub fn dialect(&self) -> Dialect {
        if let Some(dialect) = self.dialect {
            return dialect;
        }
        let scheme = self
            .url
            .split_once(':')
            .map_or("", |(scheme, _)| scheme)
            .to_ascii_lowercase();
        match scheme.as_str() {
            "sqlite" | "memory" => Dialect::Sqlite,
            "snowflake" => Dialect::Snowflake,
            _ => Dialect::Oracle,
        }
    }

    /// Session statements to run, falling back to dialect defaults
    pub fn session_statements(&self) -> Vec<String> {
        if self.session_init.is_empty() && self.dialect() == Dialect::Oracle {
            return Self::oracle_session_defaults();
        }
        self.session_init.clone()
    }
}
