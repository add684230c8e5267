//! Quarry command line tool.
//!
//! Reads a JSON filter request and prints the SQL statement, document query
//! or matching rows it resolves to.

mod config;
mod request;

use clap::Parser;
use quarry::backends::document::{DocumentOperationProvider, DocumentQueryBuilder};
use quarry::backends::memory::{MemoryOperationProvider, MemoryQuery};
use quarry::backends::sql::{SqlOperationProvider, SqlQueryBuilder};
use quarry::{FilterResult, OperationProvider, OperationService, SearchPlan};
use serde_json::Value;
use tracing::info;

use config::{CliConfig, Command};
use request::{Request, read_request, read_rows};

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level`. Logs go to standard error so
/// that standard output carries only the result.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quarry={},quarry_cli={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Builds the plan of either request shape.
fn build_plan<P: OperationProvider>(
    service: &OperationService<P>,
    request: &Request,
    sort_fields: &[String],
) -> FilterResult<SearchPlan<P::Fragment>> {
    match request {
        Request::Common(shell) => service.build_common(shell, sort_fields),
        Request::Multiple(shell) => service.build_multiple(shell, sort_fields),
    }
}

fn run(config: &CliConfig) -> anyhow::Result<Value> {
    let args = config.request();
    let request = read_request(&args.request)?;
    let engine = config.engine_config();

    let output = match &config.command {
        Command::Sql { table, columns, .. } => {
            let service =
                OperationService::new(SqlOperationProvider::new(table)).with_config(engine);
            let plan = build_plan(&service, &request, &args.sort_fields)?;
            let statement = SqlQueryBuilder::new(table)
                .with_columns(columns.iter().cloned())
                .build(&plan.predicate, &plan.page);
            serde_json::to_value(statement)?
        }
        Command::Document { .. } => {
            let service =
                OperationService::new(DocumentOperationProvider::new()).with_config(engine);
            let plan = build_plan(&service, &request, &args.sort_fields)?;
            DocumentQueryBuilder::new()
                .build(plan.predicate, &plan.page)
                .to_json()
        }
        Command::Eval { rows, .. } => {
            let rows = read_rows(rows)?;
            let service =
                OperationService::new(MemoryOperationProvider::new()).with_config(engine);
            let plan = build_plan(&service, &request, &args.sort_fields)?;
            let matched = MemoryQuery::new(&rows).execute(&plan.predicate, &plan.page);
            info!(rows = rows.len(), matched = matched.len(), "Evaluated request");
            Value::Array(matched.into_iter().cloned().collect())
        }
    };

    Ok(output)
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        default_limit = config.default_limit,
        nested_marker = %config.nested_marker,
        max_nesting_depth = config.max_nesting_depth,
        "Building query"
    );

    let output = run(&config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
