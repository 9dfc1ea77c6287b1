//! Binary entry point for bravozero.
//!
//! This binary provides a command-line interface to the Bravo Zero services.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use bravozero::cli::{self, CommandResult, RecordArgs};
use bravozero::models::{CreateEdgeRequest, RelatedOptions};
use bravozero::observability::{self, LoggingConfig};
use bravozero::{BravoZeroClient, ClientConfig, Environment, Error};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for an action denied by the constitution.
const EXIT_DENIED: u8 = 2;

/// Bravo Zero - governance, memory and filesystem services for AI agents.
#[derive(Parser)]
#[command(name = "bravozero")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "BRAVOZERO_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Deployment environment: production, staging, or development.
    #[arg(short, long, global = true)]
    environment: Option<String>,

    /// Explicit API base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Evaluate an action against the constitution.
    Evaluate {
        /// The action to evaluate.
        action: String,

        /// Evaluation context as a JSON object.
        #[arg(long)]
        context: Option<String>,

        /// Priority: normal, high, or critical.
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Show the global Omega alignment score.
    Omega,

    /// List constitution rules.
    Rules {
        /// Only rules in this category.
        #[arg(long)]
        category: Option<String>,

        /// Only rules with this priority.
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Show a single rule.
    Rule {
        /// Rule identifier.
        id: String,
    },

    /// Show the values database.
    Values,

    /// Memory operations.
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// Bridge file operations.
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },

    /// Print the agent's public key.
    PublicKey,
}

/// Memory subcommands.
#[derive(Subcommand)]
enum MemoryAction {
    /// Record a memory.
    Record {
        /// The content to record.
        content: String,

        /// Memory type: episodic, semantic, procedural, or working.
        #[arg(short = 't', long = "type")]
        memory_type: Option<String>,

        /// Importance between 0.0 and 1.0.
        #[arg(short, long)]
        importance: Option<f64>,

        /// Namespace (defaults to the agent id).
        #[arg(short, long)]
        namespace: Option<String>,

        /// Tags (comma-separated).
        #[arg(long)]
        tags: Option<String>,
    },

    /// Query memories by similarity.
    Query {
        /// The query text.
        query: String,

        /// Maximum number of results.
        #[arg(short, long)]
        limit: Option<u32>,

        /// Minimum relevance.
        #[arg(long)]
        min_relevance: Option<f64>,
    },

    /// Show a memory.
    Get {
        /// Memory identifier.
        id: String,
    },

    /// Delete a memory.
    Delete {
        /// Memory identifier.
        id: String,
    },

    /// Connect two memories.
    Link {
        /// Source memory id.
        source: String,

        /// Target memory id.
        target: String,

        /// Relationship label.
        relationship: String,

        /// Edge strength between 0.0 and 1.0.
        #[arg(short, long)]
        strength: Option<f64>,
    },

    /// List memories linked to a memory.
    Related {
        /// Memory identifier.
        id: String,

        /// Only edges with this relationship.
        #[arg(short, long)]
        relationship: Option<String>,

        /// Only edges at least this strong.
        #[arg(long)]
        min_strength: Option<f64>,

        /// Maximum number of results.
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

/// Bridge file subcommands.
#[derive(Subcommand)]
enum FilesAction {
    /// List a directory.
    List {
        /// Directory path.
        path: String,

        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,

        /// Glob-style filter.
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Print a file.
    Read {
        /// File path.
        path: String,
    },

    /// Show file metadata.
    Info {
        /// File path.
        path: String,
    },

    /// Delete a file.
    Delete {
        /// File path.
        path: String,
    },

    /// Write a text file.
    Write {
        /// File path.
        path: String,

        /// Content to write.
        content: String,

        /// Fail instead of creating missing parent directories.
        #[arg(long)]
        no_create_dirs: bool,
    },

    /// Trigger synchronization.
    Sync {
        /// Path to sync (default `/`).
        path: Option<String>,
    },

    /// Show sync status.
    Status {
        /// Path to check (default `/`).
        path: Option<String>,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    if let Some(environment) = cli.environment.as_deref() {
        config.environment = Environment::parse(environment);
    }
    if let Some(base_url) = cli.base_url.clone() {
        config.base_url = Some(base_url);
    }

    let logging = LoggingConfig::from_settings(Some(&config.logging), cli.verbose);
    if let Err(e) = observability::init(logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let client = match BravoZeroClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        },
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run_command(&client, cli.command, &mut out).await;
    out.flush().ok();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(Error::ConstitutionDenied { reasoning, .. }) = e.downcast_ref::<Error>() {
                eprintln!("Denied: {reasoning}");
                return ExitCode::from(EXIT_DENIED);
            }
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command<W: Write>(
    client: &BravoZeroClient,
    command: Commands,
    out: &mut W,
) -> CommandResult {
    match command {
        Commands::Evaluate {
            action,
            context,
            priority,
        } => cli::cmd_evaluate(client, action, context.as_deref(), priority.as_deref(), out).await,

        Commands::Omega => cli::cmd_omega(client, out).await,

        Commands::Rules { category, priority } => {
            cli::cmd_rules(client, category, priority.as_deref(), out).await
        },

        Commands::Rule { id } => cli::cmd_rule(client, &id, out).await,

        Commands::Values => cli::cmd_values(client, out).await,

        Commands::Memory { action } => run_memory(client, action, out).await,

        Commands::Files { action } => run_files(client, action, out).await,

        Commands::PublicKey => cli::cmd_public_key(client, out),
    }
}

async fn run_memory<W: Write>(
    client: &BravoZeroClient,
    action: MemoryAction,
    out: &mut W,
) -> CommandResult {
    match action {
        MemoryAction::Record {
            content,
            memory_type,
            importance,
            namespace,
            tags,
        } => {
            let args = RecordArgs {
                content,
                memory_type,
                importance,
                namespace,
                tags,
            };
            cli::cmd_memory_record(client, args, out).await
        },

        MemoryAction::Query {
            query,
            limit,
            min_relevance,
        } => cli::cmd_memory_query(client, query, limit, min_relevance, out).await,

        MemoryAction::Get { id } => cli::cmd_memory_get(client, &id, out).await,

        MemoryAction::Delete { id } => cli::cmd_memory_delete(client, &id, out).await,

        MemoryAction::Link {
            source,
            target,
            relationship,
            strength,
        } => {
            let mut request = CreateEdgeRequest::new(source, target, relationship);
            if let Some(strength) = strength {
                request = request.with_strength(strength);
            }
            cli::cmd_memory_link(client, request, out).await
        },

        MemoryAction::Related {
            id,
            relationship,
            min_strength,
            limit,
        } => {
            let options = RelatedOptions {
                relationship,
                min_strength,
                limit,
            };
            cli::cmd_memory_related(client, &id, &options, out).await
        },
    }
}

async fn run_files<W: Write>(
    client: &BravoZeroClient,
    action: FilesAction,
    out: &mut W,
) -> CommandResult {
    match action {
        FilesAction::List {
            path,
            recursive,
            pattern,
        } => cli::cmd_files_list(client, &path, recursive, pattern, out).await,

        FilesAction::Read { path } => cli::cmd_files_read(client, &path, out).await,

        FilesAction::Info { path } => cli::cmd_files_info(client, &path, out).await,

        FilesAction::Delete { path } => cli::cmd_files_delete(client, &path, out).await,

        FilesAction::Write {
            path,
            content,
            no_create_dirs,
        } => cli::cmd_files_write(client, &path, &content, !no_create_dirs, out).await,

        FilesAction::Sync { path } => cli::cmd_files_sync(client, path.as_deref(), out).await,

        FilesAction::Status { path } => cli::cmd_files_status(client, path.as_deref(), out).await,
    }
}

/// Loads configuration from an explicit file or the default location.
fn load_config(path: Option<&std::path::Path>) -> bravozero::Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::load_from_file(path),
        None => ClientConfig::load_default(),
    }
}
