use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vecta",
    about = "Inspect and edit stored vecta vectors",
    version,
    after_help = "ADDR is a retrieval string such as json:./config:app or yaml:/etc/app:settings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the value stored under a key
    Get(GetArgs),
    /// Store a value under a key, creating the vector if needed
    Set(SetArgs),
    /// List items in key order
    List(ListArgs),
    /// Delete a key or a whole subtree
    Delete(DeleteArgs),
    /// Copy a vector from one address to another
    Convert(ConvertArgs),
    /// Print a vector as JSON
    Show(ShowArgs),
}

/// How `set` interprets its value argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ValueKind {
    #[default]
    String,
    /// Comma-separated list
    Strings,
    Bool,
    Int,
    Float,
    /// Any JSON value, classified the way decoding classifies it
    Json,
}

#[derive(Args)]
pub struct GetArgs {
    pub addr: String,
    pub key: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub addr: String,
    pub key: String,
    pub value: String,
    #[arg(short, long, value_enum, default_value_t = ValueKind::String)]
    pub kind: ValueKind,
}

#[derive(Args)]
pub struct ListArgs {
    pub addr: String,
    #[arg(short, long)]
    pub prefix: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub addr: String,
    pub key: String,
    /// Delete every key under KEY as a prefix
    #[arg(long)]
    pub subtree: bool,
}

#[derive(Args)]
pub struct ConvertArgs {
    pub from: String,
    pub to: String,
}

#[derive(Args)]
pub struct ShowArgs {
    pub addr: String,
    /// Single-line output
    #[arg(long)]
    pub compact: bool,
}
