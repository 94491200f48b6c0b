//! milestone CLI - generate ingestion SQL from an ingest file
//!
//! Usage:
//!   milestone generate <ingest.toml> [--dialect <dialect>] [--output sql|json]
//!   milestone validate <ingest.toml>
//!   milestone capabilities [--dialect <dialect>]
//!
//! Examples:
//!   milestone generate ingest/orders.toml --dialect snowflake
//!   milestone generate ingest/orders.toml --case upper --output json
//!   milestone capabilities --dialect bigquery

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use milestone::config::{IngestFile, Settings};
use milestone::generator::{CaseConversion, GeneratorOptions, GeneratorResult, RelationalGenerator};
use milestone::sql::Dialect;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "milestone")]
#[command(about = "milestone - Generate milestoned ingestion SQL for relational sinks")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to $MILESTONE_CONFIG, then ./milestone.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate SQL for an ingest file
    Generate {
        /// Path to the ingest file
        file: PathBuf,

        /// SQL dialect to generate (overrides the settings file)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Identifier case conversion (overrides the settings file)
        #[arg(long = "case")]
        case_conversion: Option<CaseArg>,

        /// Batch start timestamp, e.g. 2000-01-01T00:00:00
        #[arg(long)]
        timestamp: Option<NaiveDateTime>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// Plan an ingest file without printing SQL
    Validate {
        /// Path to the ingest file
        file: PathBuf,
    },

    /// List the capabilities of a dialect
    Capabilities {
        #[arg(short, long, default_value = "ansi")]
        dialect: DialectArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Ansi,
    Snowflake,
    Bigquery,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Ansi => Dialect::Ansi,
            DialectArg::Snowflake => Dialect::Snowflake,
            DialectArg::Bigquery => Dialect::BigQuery,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CaseArg {
    None,
    Upper,
    Lower,
}

impl From<CaseArg> for CaseConversion {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::None => CaseConversion::None,
            CaseArg::Upper => CaseConversion::Upper,
            CaseArg::Lower => CaseConversion::Lower,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// SQL statements grouped by section
    Sql,
    /// The full result as JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    milestone::logging::init(cli.verbose);

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let options = match settings.generator.to_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Invalid settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Generate {
            file,
            dialect,
            case_conversion,
            timestamp,
            output,
        } => {
            let mut options = options;
            if let Some(dialect) = dialect {
                options = options.with_dialect(dialect.into());
            }
            if let Some(case_conversion) = case_conversion {
                options = options.with_case_conversion(case_conversion.into());
            }
            if let Some(timestamp) = timestamp {
                options = options.with_batch_start_timestamp(timestamp);
            }
            cmd_generate(file, options, output)
        }
        Commands::Validate { file } => cmd_validate(file, options),
        Commands::Capabilities { dialect } => cmd_capabilities(dialect.into()),
    }
}

fn load_ingest_file(file: &Path) -> Option<IngestFile> {
    match IngestFile::from_file(file) {
        Ok(ingest) => Some(ingest),
        Err(e) => {
            eprintln!("Error reading ingest file '{}': {}", file.display(), e);
            None
        }
    }
}

fn cmd_generate(file: PathBuf, options: GeneratorOptions, output: OutputFormat) -> ExitCode {
    let Some(ingest) = load_ingest_file(&file) else {
        return ExitCode::FAILURE;
    };

    let generator = RelationalGenerator::new(ingest.ingest_mode, options);
    let results = if ingest.data_splits.is_empty() {
        generator.generate(&ingest.datasets).map(|r| vec![r])
    } else {
        generator.generate_with_splits(&ingest.datasets, &ingest.data_splits)
    };

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Generation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Sql => {
            for (i, result) in results.iter().enumerate() {
                if results.len() > 1 {
                    println!("-- Data split {}: {}", i + 1, ingest.data_splits[i]);
                    println!();
                }
                print_sql(result);
            }
        }
        OutputFormat::Json => {
            let json = if results.len() == 1 {
                serde_json::to_string_pretty(&results[0])
            } else {
                serde_json::to_string_pretty(&results)
            };
            match json {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing result: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }
    ExitCode::SUCCESS
}

fn print_sql(result: &GeneratorResult) {
    let sections = [
        ("Pre-actions", &result.pre_actions),
        ("Initialize lock", &result.initialize_lock),
        ("Acquire lock", &result.acquire_lock),
        ("Ingest", &result.ingest),
        ("Metadata ingest", &result.metadata_ingest),
        ("Post cleanup", &result.post_cleanup),
    ];
    for (title, statements) in sections {
        if statements.is_empty() {
            continue;
        }
        println!("-- {}", title);
        for sql in statements {
            println!("{};", sql);
        }
        println!();
    }

    let statistics = [
        ("Pre-ingest statistics", &result.pre_ingest_statistics),
        ("Post-ingest statistics", &result.post_ingest_statistics),
    ];
    for (title, queries) in statistics {
        if queries.is_empty() {
            continue;
        }
        println!("-- {}", title);
        for (name, sql) in queries {
            println!("-- {}", name);
            println!("{};", sql);
        }
        println!();
    }
}

fn cmd_validate(file: PathBuf, options: GeneratorOptions) -> ExitCode {
    let Some(ingest) = load_ingest_file(&file) else {
        return ExitCode::FAILURE;
    };
    let mode = ingest.ingest_mode.name();
    let generator = RelationalGenerator::new(ingest.ingest_mode, options);
    match generator.generate(&ingest.datasets) {
        Ok(result) => {
            println!(
                "OK: {} ({}, {} statements)",
                file.display(),
                mode,
                result.statements().count()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_capabilities(dialect: Dialect) -> ExitCode {
    println!("{}:", dialect);
    for capability in dialect.capability_set().iter() {
        println!("  - {}", capability);
    }
    ExitCode::SUCCESS
}
