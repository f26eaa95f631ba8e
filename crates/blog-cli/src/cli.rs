use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blogd", about = "Blog service RPC server", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the blog service
    Serve(OverrideArgs),
    /// Print the effective configuration as TOML
    Config(OverrideArgs),
    /// Rewrite the file store's journal down to its live documents
    Compact(OverrideArgs),
}

/// Flags that take precedence over the configuration file.
#[derive(Args, Clone, Debug, Default)]
pub struct OverrideArgs {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Journal path; selects the file-backed store
    #[arg(long)]
    pub data: Option<PathBuf>,
}
