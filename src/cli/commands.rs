//! Command implementations for the Pilum CLI.

use std::fs;
use std::io::{self, Read};

use tracing::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::dsl::SearchPredicateFactory;
use crate::error::Result;
use crate::parser;
use crate::schema::IndexSchema;
use crate::value::FieldValue;

/// Execute a CLI command.
pub fn execute_command(args: PilumArgs) -> Result<()> {
    match &args.command {
        Command::Render(render_args) => render_query(render_args, &args),
        Command::Fields(fields_args) => list_fields(fields_args, &args),
    }
}

/// Parse a query and print the predicate it builds.
fn render_query(args: &RenderArgs, cli_args: &PilumArgs) -> Result<()> {
    info!(schema = %args.schema.display(), "loading schema");
    let schema = IndexSchema::from_path(&args.schema)?;

    let query = match &args.query_file {
        Some(path) => {
            debug!(query = %path.display(), "reading query file");
            fs::read_to_string(path)?
        }
        None => {
            debug!("reading query from stdin");
            let mut query = String::new();
            io::stdin().read_to_string(&mut query)?;
            query
        }
    };

    let mut factory = SearchPredicateFactory::new(&schema);
    for (name, value) in &args.params {
        factory = factory.with_param(name.as_str(), parse_param_value(value));
    }

    let predicate = parser::parse_str(&factory, &query)?;
    let fields = predicate.fields().into_iter().map(str::to_string).collect();
    let result = RenderResult {
        rendered: predicate.to_string(),
        fields,
        predicate,
    };
    output_render(&result, cli_args)
}

/// Print every field of a schema with the predicates it accepts.
fn list_fields(args: &FieldsArgs, cli_args: &PilumArgs) -> Result<()> {
    info!(schema = %args.schema.display(), "loading schema");
    let schema = IndexSchema::from_path(&args.schema)?;

    let fields = schema
        .fields()
        .map(|field| FieldInfo {
            path: field.path().to_string(),
            kind: field.kind().to_string(),
            searchable: field.is_searchable(),
            analyzer: field.analyzer().map(str::to_string),
            nested_path: field.nested_path().map(str::to_string),
            predicates: field.supported_predicates(),
        })
        .collect();

    let result = FieldsResult {
        fields,
        named_predicates: schema.named_predicate_paths().count(),
    };
    output_fields(&result, cli_args)
}

/// Command-line parameters are typed by shape: integer, float, boolean, text.
fn parse_param_value(raw: &str) -> FieldValue {
    if let Ok(i) = raw.parse::<i64>() {
        FieldValue::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        FieldValue::Float(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        FieldValue::Boolean(b)
    } else {
        FieldValue::Text(raw.to_string())
    }
}
