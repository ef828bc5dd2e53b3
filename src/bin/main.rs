//! sqlcrawl CLI - Crawl a database catalog into a schema model
//!
//! Usage:
//!   sqlcrawl crawl [--connection <name> | --url <url>] [--pattern <regex>]... [--target json|rust] [--out <dir>]
//!   sqlcrawl tables [--connection <name> | --url <url>] [--pattern <regex>]...
//!
//! Examples:
//!   sqlcrawl crawl --url sqlite:app.db
//!   sqlcrawl crawl --url sqlite:app.db --pattern 'USER_.*' --target rust --out generated --package db.model
//!   sqlcrawl tables --connection production
//!
//! Without `--connection` or `--url`, `SQLCRAWL_DB_URL` is used, then the
//! default connection from `sqlcrawl.toml`. Set `RUST_LOG` to see crawl logs.

use clap::{Args, Parser, Subcommand};
use sqlcrawl::config::{ConnectionConfig, OutputSettings, Settings};
use sqlcrawl::metadata::SqliteConnector;
use sqlcrawl::writer::{writer_for, JsonWriter};
use sqlcrawl::Schema;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlcrawl")]
#[command(about = "sqlcrawl - Crawl a database catalog into a schema model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the catalog and write the schema
    Crawl {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Output target ("json" or "rust"); defaults to the config file's
        #[arg(short, long)]
        target: Option<String>,

        /// Directory to write into; prints JSON to stdout if not set
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Dotted package path for generated sources
        #[arg(long)]
        package: Option<String>,
    },

    /// List the tables a crawl would include
    Tables {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

#[derive(Args)]
struct ConnectionArgs {
    /// Named connection from sqlcrawl.toml
    #[arg(short, long, conflicts_with = "url")]
    connection: Option<String>,

    /// Connection URL (e.g. sqlite:app.db)
    #[arg(short, long)]
    url: Option<String>,

    /// Principal to connect as
    #[arg(long)]
    user: Option<String>,

    /// Credential for the principal
    #[arg(long)]
    password: Option<String>,

    /// Table-name pattern (full match, repeatable)
    #[arg(short, long = "pattern")]
    patterns: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            connection,
            target,
            out,
            package,
        } => cmd_crawl(connection, target, out, package),
        Commands::Tables { connection } => cmd_tables(connection),
    }
}

fn cmd_crawl(
    args: ConnectionArgs,
    target: Option<String>,
    out: Option<PathBuf>,
    package: Option<String>,
) -> ExitCode {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let schema = match crawl_schema(&settings, args) {
        Some(schema) => schema,
        None => return ExitCode::FAILURE,
    };

    let output = merge_output(&settings.output, target, out, package);
    match &output.directory {
        Some(dir) => {
            let writer = match writer_for(&output.target, output.package.as_deref()) {
                Ok(w) => w,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            match writer.write(&schema, dir) {
                Ok(paths) => {
                    for path in paths {
                        println!("{}", path.display());
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error writing schema: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        None => match JsonWriter::default().render(&schema) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error rendering schema: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn cmd_tables(args: ConnectionArgs) -> ExitCode {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(schema) = crawl_schema(&settings, args) else {
        return ExitCode::FAILURE;
    };

    if let Some(driver) = &schema.driver_name {
        println!(
            "Driver: {} {}",
            driver,
            schema.driver_version.as_deref().unwrap_or("")
        );
        println!();
    }

    if schema.tables.is_empty() {
        println!("No tables matched.");
    } else {
        println!("Tables:");
        for table in &schema.tables {
            match &table.sequence_name {
                Some(seq) => println!(
                    "  - {} ({} columns, sequence: {})",
                    table.table_name,
                    table.columns.len(),
                    seq
                ),
                None => println!("  - {} ({} columns)", table.table_name, table.columns.len()),
            }
        }
    }
    ExitCode::SUCCESS
}

/// Resolve the connection and run the crawl, reporting failures on stderr.
fn crawl_schema(settings: &Settings, args: ConnectionArgs) -> Option<Schema> {
    let config = match resolve_connection(settings, args) {
        Ok(c) => c,
        Err(message) => {
            eprintln!("Error: {}", message);
            return None;
        }
    };

    match sqlcrawl::crawl(&SqliteConnector, &config) {
        Ok(schema) => Some(schema),
        Err(e) => {
            eprintln!("Crawl failed: {}", e);
            None
        }
    }
}

fn resolve_connection(
    settings: &Settings,
    args: ConnectionArgs,
) -> Result<ConnectionConfig, String> {
    let mut config = if let Some(name) = &args.connection {
        settings
            .get_connection(name)
            .and_then(|c| c.to_config())
            .map_err(|e| e.to_string())?
    } else if let Some(url) = &args.url {
        ConnectionConfig::new(url.clone())
    } else if std::env::var_os("SQLCRAWL_DB_URL").is_some() {
        ConnectionConfig::from_env().map_err(|e| e.to_string())?
    } else if let Some((_, conn)) = settings.default_connection() {
        conn.to_config().map_err(|e| e.to_string())?
    } else {
        return Err(
            "no connection given; use --url, --connection, SQLCRAWL_DB_URL or sqlcrawl.toml"
                .to_string(),
        );
    };

    if args.user.is_some() {
        config.username = args.user;
    }
    if args.password.is_some() {
        config.password = args.password;
    }
    if !args.patterns.is_empty() {
        config.table_patterns = Some(args.patterns);
    }
    Ok(config)
}

fn merge_output(
    settings: &OutputSettings,
    target: Option<String>,
    out: Option<PathBuf>,
    package: Option<String>,
) -> OutputSettings {
    OutputSettings {
        target: target.unwrap_or_else(|| settings.target.clone()),
        directory: out.or_else(|| settings.directory.clone()),
        package: package.or_else(|| settings.package.clone()),
    }
}
