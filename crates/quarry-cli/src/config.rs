//! Command line configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QUARRY_LOG_LEVEL` | info | Log level |
//! | `QUARRY_DEFAULT_LIMIT` | 200 | Page size when a request sets none |
//! | `QUARRY_DEFAULT_OFFSET` | 0 | Offset when a request sets none |
//! | `QUARRY_NESTED_MARKER` | nst: | Prefix marking subquery operation codes |
//! | `QUARRY_MAX_NESTING_DEPTH` | 4 | Deepest allowed subquery nesting |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quarry::EngineConfig;

/// Command line configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "quarry")]
#[command(about = "Builds backend queries from JSON filter requests")]
pub struct CliConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "QUARRY_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Page size used when a request sets none.
    #[arg(long, env = "QUARRY_DEFAULT_LIMIT", default_value = "200", global = true)]
    pub default_limit: u32,

    /// Offset used when a request sets none.
    #[arg(long, env = "QUARRY_DEFAULT_OFFSET", default_value = "0", global = true)]
    pub default_offset: u64,

    /// Prefix marking subquery operation codes.
    #[arg(long, env = "QUARRY_NESTED_MARKER", default_value = "nst:", global = true)]
    pub nested_marker: String,

    /// Deepest allowed subquery nesting.
    #[arg(long, env = "QUARRY_MAX_NESTING_DEPTH", default_value = "4", global = true)]
    pub max_nesting_depth: usize,

    /// What to build.
    #[command(subcommand)]
    pub command: Command,
}

/// Output backends.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print a parameterised SQL statement.
    Sql {
        /// Table to select from.
        #[arg(long)]
        table: String,

        /// Columns to select; all when empty.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Print a document query.
    Document {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Evaluate a request against JSON rows and print the matches.
    Eval {
        /// File holding a JSON array of row objects.
        #[arg(long)]
        rows: PathBuf,

        #[command(flatten)]
        request: RequestArgs,
    },
}

/// Arguments shared by every command.
#[derive(Debug, Clone, clap::Args)]
pub struct RequestArgs {
    /// Request file, or `-` for standard input.
    pub request: PathBuf,

    /// Fields the request may sort by (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub sort_fields: Vec<String>,
}

impl CliConfig {
    /// Returns the engine configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_default_limit(self.default_limit)
            .with_default_offset(self.default_offset)
            .with_nested_marker(self.nested_marker.clone())
            .with_max_nesting_depth(self.max_nesting_depth)
    }

    /// Returns the request arguments of the selected command.
    pub fn request(&self) -> &RequestArgs {
        match &self.command {
            Command::Sql { request, .. }
            | Command::Document { request }
            | Command::Eval { request, .. } => request,
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_limit == 0 {
            errors.push("Default limit cannot be 0".to_string());
        }

        if self.nested_marker.trim().is_empty() {
            errors.push("Nested marker cannot be blank".to_string());
        }

        if let Command::Sql { table, .. } = &self.command
            && table.trim().is_empty()
        {
            errors.push("Table cannot be blank".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sql_command() {
        let config = CliConfig::try_parse_from([
            "quarry",
            "sql",
            "--table",
            "orders",
            "--sort-fields",
            "id,createdAt",
            "request.json",
        ])
        .unwrap();

        assert_eq!(config.default_limit, 200);
        assert_eq!(config.nested_marker, "nst:");
        assert_eq!(config.request().sort_fields, vec!["id", "createdAt"]);
        assert_eq!(config.request().request, PathBuf::from("request.json"));
        assert!(matches!(config.command, Command::Sql { ref table, .. } if table == "orders"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_config_from_flags() {
        let config = CliConfig::try_parse_from([
            "quarry",
            "document",
            "--default-limit",
            "25",
            "--nested-marker",
            "sub.",
            "-",
        ])
        .unwrap();

        let engine = config.engine_config();
        assert_eq!(engine.default_limit, 25);
        assert_eq!(engine.nested_marker, "sub.");
        assert!(config.request().sort_fields.is_empty());
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = CliConfig::try_parse_from([
            "quarry",
            "eval",
            "--rows",
            "rows.json",
            "--default-limit",
            "0",
            "request.json",
        ])
        .unwrap();

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("limit")));
    }
}
