//! Command line argument parsing for the Pilum CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Pilum - compose and inspect search predicates
#[derive(Parser, Debug, Clone)]
#[command(name = "pilum")]
#[command(about = "Compose and inspect full-text search predicates")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PilumArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PilumArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse a JSON query against a schema and print the resulting predicate
    Render(RenderArgs),

    /// List the fields of a schema with the predicates they accept
    Fields(FieldsArgs),
}

/// Arguments for rendering a query
#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// Schema definition file path (JSON)
    #[arg(short, long, value_name = "SCHEMA_FILE", env = "PILUM_SCHEMA")]
    pub schema: PathBuf,

    /// Query file path (JSON); read from stdin when omitted
    #[arg(value_name = "QUERY_FILE")]
    pub query_file: Option<PathBuf>,

    /// Query-level parameter, as NAME=VALUE (repeatable)
    #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

/// Arguments for listing fields
#[derive(Parser, Debug, Clone)]
pub struct FieldsArgs {
    /// Schema definition file path (JSON)
    #[arg(short, long, value_name = "SCHEMA_FILE", env = "PILUM_SCHEMA")]
    pub schema: PathBuf,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let args = PilumArgs::try_parse_from(["pilum", "fields", "-s", "schema.json"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args =
            PilumArgs::try_parse_from(["pilum", "-vv", "fields", "-s", "schema.json"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            PilumArgs::try_parse_from(["pilum", "--quiet", "fields", "-s", "schema.json"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_render_args() {
        let args = PilumArgs::try_parse_from([
            "pilum",
            "--format",
            "json",
            "render",
            "--schema",
            "schema.json",
            "query.json",
            "-p",
            "since=2020",
        ])
        .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);

        if let Command::Render(render) = args.command {
            assert_eq!(render.query_file, Some(PathBuf::from("query.json")));
            assert_eq!(render.params, vec![("since".to_string(), "2020".to_string())]);
        } else {
            panic!("Expected Render command");
        }
    }

    #[test]
    fn test_invalid_param() {
        let result = PilumArgs::try_parse_from([
            "pilum",
            "render",
            "--schema",
            "schema.json",
            "-p",
            "novalue",
        ]);
        assert!(result.is_err());
    }
}
