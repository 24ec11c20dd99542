//! sql2blueprint: DDL to migration CLI
//!
//! # Usage
//!
//! ```bash
//! # Import a DDL diff, one migration per statement
//! sql2blueprint database_model/shop_diff.sql
//!
//! # Same file, found from the schema name, squashed into one migration
//! sql2blueprint --schema shop --squash --name import_shop
//!
//! # Show what would be generated
//! sql2blueprint explain database_model/shop_diff.sql
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde::Serialize;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use sql2blueprint::config::{check_indent, diff_file};
use sql2blueprint::prelude::*;
use sql2blueprint::transpiler::{classify, types::COLUMN_TYPES};

#[derive(Parser)]
#[command(name = "sql2blueprint")]
#[command(version)]
#[command(about = "Turn MySQL DDL into schema-builder migrations", long_about = None)]
#[command(after_help = "EXAMPLES:
    sql2blueprint database_model/shop_diff.sql
    sql2blueprint --schema shop --path database/migrations
    sql2blueprint diff.sql --squash --name import_shop --dry-run
    sql2blueprint explain diff.sql --format json")]
struct Cli {
    /// DDL file to import (default: database_model/<schema>_diff.sql)
    file: Option<PathBuf>,

    /// Schema whose diff file is imported when FILE is omitted
    #[arg(short, long, env = "SQL2BLUEPRINT_SCHEMA")]
    schema: Option<String>,

    /// Output directory for migration files
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Write a single migration for the whole file
    #[arg(long)]
    squash: bool,

    /// Name of the squashed migration (implies --squash)
    #[arg(short, long)]
    name: Option<String>,

    /// Custom migration stub
    #[arg(long)]
    stub: Option<PathBuf>,

    /// Base tab level of generated code
    #[arg(long)]
    indent: Option<usize>,

    /// Print the migrations instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// Config file (default: ./sql2blueprint.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a DDL file and show the statements and generated code
    Explain {
        /// The DDL file to explain
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the SQL type reference
    Types,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Explain { file, format }) => explain(file, *format),
        Some(Commands::Types) => {
            show_types();
            Ok(())
        }
        None => import(&cli),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }
}

fn read_statements(file: &Path) -> Result<Vec<Statement>> {
    let sql = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let statements = sql2blueprint::parse(&sql)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    debug!(file = %file.display(), statements = statements.len(), "parsed input");
    Ok(statements)
}

fn import(cli: &Cli) -> Result<()> {
    let (config, config_path) = Config::discover(cli.config.as_deref())?;

    let file = match (&cli.file, &cli.schema) {
        (Some(file), _) => file.clone(),
        (None, Some(schema)) => diff_file(schema),
        (None, None) => config.input_file().context(
            "No input file. Pass FILE, use --schema, or set `schema` in sql2blueprint.toml",
        )?,
    };

    println!("{}", "📝 Importing DDL".cyan().bold());
    println!();
    println!("  {} {}", "Input:".dimmed(), file.display().to_string().yellow());
    if let Some(path) = &config_path {
        println!("  {} {}", "Config:".dimmed(), path.display());
    }

    let statements = read_statements(&file)?;
    if statements.is_empty() {
        println!();
        println!("  {}", "No table statements found.".yellow());
        return Ok(());
    }

    let indent = cli.indent.unwrap_or(config.import.indent);
    check_indent(indent)?;
    let squash = cli.squash || cli.name.is_some() || config.import.squash;
    let squash_name = squash.then(|| {
        cli.name.clone().unwrap_or_else(|| {
            let stem = file.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
            format!("import_{}", stem)
        })
    });

    let stub = match cli.stub.as_ref().or(config.import.stub.as_ref()) {
        Some(path) => Stub::load(path)?,
        None => Stub::default(),
    };

    let pending = plan(&statements, indent, squash_name.as_deref());
    let files = MigrationWriter::new(stub).render(&pending);
    let dir = cli.path.clone().unwrap_or(config.import.path);

    println!();
    if cli.dry_run {
        for file in &files {
            println!("{} {}", "──".dimmed(), dir.join(&file.file_name).display().to_string().cyan());
            println!("{}", file.contents);
        }
        println!(
            "  {} {} migration(s) rendered, nothing written",
            "Dry run:".yellow(),
            files.len()
        );
        return Ok(());
    }

    let written = MigrationWriter::write(&dir, &files)?;
    for path in &written {
        println!("  {} {}", "✓ Created:".green(), path.display());
    }
    println!();
    println!(
        "  {} statement(s) → {} migration(s) in {}",
        statements.len().to_string().cyan(),
        written.len().to_string().cyan(),
        dir.display().to_string().yellow()
    );

    Ok(())
}

#[derive(Serialize)]
struct Explained<'a> {
    statement: &'a Statement,
    migration: Migration,
}

fn explain(file: &Path, format: OutputFormat) -> Result<()> {
    let statements = read_statements(file)?;
    let mut transpiler = Transpiler::with_indent(0);

    if let OutputFormat::Json = format {
        let explained: Vec<Explained> = statements
            .iter()
            .map(|statement| {
                transpiler.handle(statement);
                Explained {
                    statement,
                    migration: transpiler.finish(),
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&explained)?);
        return Ok(());
    }

    println!("{}", "🔍 DDL Explanation".cyan().bold());
    println!();
    println!("{} {}", "File:".dimmed(), file.display().to_string().yellow());

    for (i, statement) in statements.iter().enumerate() {
        println!();
        println!(
            "{} {} {}",
            format!("[{}]", i + 1).dimmed(),
            statement.kind().green().bold(),
            statement.table().white()
        );

        match statement {
            Statement::Create(create) => create.fields.iter().for_each(describe_field),
            Statement::Alter(alter) => {
                for op in &alter.altered {
                    match classify(&op.options, &op.unknown) {
                        Some((kind, _)) => println!(
                            "    • {} {}",
                            kind.to_string().cyan(),
                            op.field.as_deref().unwrap_or_default().white()
                        ),
                        None => println!(
                            "    • {} {}",
                            "unrecognized".yellow(),
                            op.options.join(" ").dimmed()
                        ),
                    }
                }
            }
            Statement::Drop(drop) => {
                for table in &drop.tables {
                    println!("    • {}", table.white());
                }
            }
        }

        transpiler.handle(statement);
        let migration = transpiler.finish();
        println!("  {}", "Up:".green().bold());
        print_block(&migration.up);
        println!("  {}", "Down:".green().bold());
        print_block(&migration.down);
    }

    Ok(())
}

fn describe_field(field: &Field) {
    if let (Some(name), Some(column_type)) = (&field.name, &field.column_type) {
        let mut sql = column_type.name.clone();
        if !column_type.parameters.is_empty() {
            sql = format!("{}({})", sql, column_type.parameters.join(", "));
        }
        let options: Vec<&str> = field.merged_options().map(ColumnOption::name).collect();
        println!(
            "    • {} {} {}",
            name.white(),
            sql.cyan(),
            options.join(" ").dimmed()
        );
    }

    if let Some(key) = &field.key {
        let name = key.name.as_deref().or(field.name.as_deref()).unwrap_or_default();
        println!(
            "    ◆ {} ({}) {}",
            key.key_type.to_string().cyan(),
            key.column_names().join(", ").white(),
            name.dimmed()
        );
    }
}

fn print_block(text: &str) {
    for line in text.lines() {
        println!("    {}", line);
    }
}

fn show_types() {
    println!("{}", "📐 SQL Type Reference".cyan().bold());
    println!();

    println!(
        "{:18} {:16} {}",
        "SQL Type".white().bold(),
        "Call".white().bold(),
        "Arguments".white().bold()
    );
    println!("{}", "─".repeat(50).dimmed());

    for blueprint in COLUMN_TYPES {
        let arguments = if blueprint.takes_length {
            "column, length"
        } else {
            "column"
        };
        println!(
            "{:18} {:16} {}",
            blueprint.sql.cyan().bold(),
            blueprint.call.yellow(),
            arguments.dimmed()
        );
    }
}
