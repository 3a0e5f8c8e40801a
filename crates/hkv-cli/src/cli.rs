use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hkv",
    about = "HKV: serialized values under namespaced keys in a hierarchical container",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Container file; without one (here or in --config) the store is disabled
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Namespace prefix inside the container
    #[arg(short, long, global = true)]
    pub prefix: Option<String>,

    /// TOML store configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a JSON value under a key
    Put(PutArgs),
    /// Print the value stored under a key
    Get(GetArgs),
    /// Report whether a key is absent, a value, or a group
    Contains(KeyArgs),
    /// Remove a key
    Rm(RmArgs),
    /// List every key in the namespace
    Ls(LsArgs),
    /// Write, reopen and read back a sample container
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct PutArgs {
    pub key: String,
    /// JSON text of the value
    pub value: String,
    /// Fail instead of replacing an existing value
    #[arg(long)]
    pub no_overwrite: bool,
    /// Allow replacing a group and everything under it
    #[arg(long)]
    pub replace_group: bool,
    /// zstd level for this value
    #[arg(long, conflicts_with = "uncompressed")]
    pub level: Option<i32>,
    /// Store the value without compression
    #[arg(long)]
    pub uncompressed: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
    /// Print the stored bytes as hex instead of decoding them
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct RmArgs {
    pub key: String,
    /// Also remove groups with everything under them
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Args)]
pub struct LsArgs {
    /// Show stored and original sizes
    #[arg(short, long)]
    pub long: bool,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Container file for the demo (defaults to --file, then database.hkv)
    pub path: Option<PathBuf>,
}
