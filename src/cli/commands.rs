//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paged API client for AWS-style JSON services
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Operation catalog: a built-in name or a YAML file
    #[arg(short, long, global = true, default_value = "billingconductor")]
    pub catalog: String,

    /// Settings file (YAML)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Service endpoint (overrides settings and the catalog default)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Extra request header as KEY=VALUE (repeatable)
    #[arg(long = "header", global = true)]
    pub headers: Vec<String>,

    /// Iteration mode: default or legacy
    #[arg(long, global = true)]
    pub iteration_mode: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the operations in the catalog
    Operations,

    /// Run a paged list operation
    List {
        /// Operation name (e.g., ListBillingGroups)
        operation: String,

        /// Parameter as NAME=VALUE; VALUE is parsed as JSON when valid, except a bare null (repeatable)
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Base request body (JSON object)
        #[arg(long)]
        body_json: Option<String>,

        /// Continuation token to resume from (fetches a single page)
        #[arg(long)]
        next_token: Option<String>,

        /// Fetch a single page and print the next token
        #[arg(long)]
        no_auto_iteration: bool,

        /// Page size sent to the service
        #[arg(long)]
        max_results: Option<u32>,

        /// Output selection: `*`, `^Param` or a dot path
        #[arg(long)]
        select: Option<String>,
    },

    /// Run a single-call operation
    Invoke {
        /// Operation name (e.g., DeleteBillingGroup)
        operation: String,

        /// Parameter as NAME=VALUE; VALUE is parsed as JSON when valid, except a bare null (repeatable)
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Base request body (JSON object)
        #[arg(long)]
        body_json: Option<String>,

        /// Tag as KEY=VALUE (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Tag key to remove (repeatable)
        #[arg(long = "tag-key")]
        tag_keys: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,

        /// Output selection: `*`, `^Param` or a dot path
        #[arg(long)]
        select: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Human-readable output
    Pretty,
}
