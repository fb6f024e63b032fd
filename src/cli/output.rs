//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, PilumArgs};
use crate::error::Result;
use crate::query::predicate::SearchPredicate;

/// Result of the `render` command.
#[derive(Debug, Serialize)]
pub struct RenderResult {
    /// Compact, Lucene-like rendering of the predicate.
    pub rendered: String,
    /// Fields the predicate targets.
    pub fields: Vec<String>,
    /// The predicate tree.
    pub predicate: SearchPredicate,
}

/// One line of the `fields` command.
#[derive(Debug, Serialize)]
pub struct FieldInfo {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub searchable: bool,
    pub analyzer: Option<String>,
    pub nested_path: Option<String>,
    pub predicates: Vec<&'static str>,
}

/// Result of the `fields` command.
#[derive(Debug, Serialize)]
pub struct FieldsResult {
    pub fields: Vec<FieldInfo>,
    pub named_predicates: usize,
}

/// Output the result of `render`.
pub fn output_render(result: &RenderResult, args: &PilumArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("Fields: {}", result.fields.join(", "));
            }
            println!("{}", result.rendered);
            Ok(())
        }
    }
}

/// Output the result of `fields`.
pub fn output_fields(result: &FieldsResult, args: &PilumArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("Schema Fields:");
                println!("══════════════");
            }

            let width = result
                .fields
                .iter()
                .map(|field| field.path.len())
                .max()
                .unwrap_or(0);
            for field in &result.fields {
                let mut line = format!("{:<width$}  {:<9}", field.path, field.kind);
                if !field.searchable {
                    line.push_str("  (not searchable)");
                }
                line.push_str("  ");
                line.push_str(&field.predicates.join(", "));
                println!("{}", line.trim_end());
            }

            if args.verbosity() > 1 {
                println!();
                println!("Named predicates: {}", result.named_predicates);
            }
            Ok(())
        }
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &PilumArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
