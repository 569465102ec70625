use clap::Parser;
use core_logic::Chain;
use std::path::PathBuf;

/// Show every asset a wallet holds across Alchemy-supported networks.
#[derive(Parser, Debug, Clone)]
#[command(name = "show-wallet-assets", author, version, about, long_about = None)]
pub struct Args {
    /// Alchemy API key
    #[arg(long)]
    pub api_key: String,

    /// Wallet address (0x... for EVM networks, base58 for Solana)
    #[arg(long)]
    pub wallet: String,

    /// Networks to scan, in order
    #[arg(long, required = true, num_args = 1.., value_enum, ignore_case = true)]
    pub networks: Vec<Chain>,

    /// Report path; a timestamp is inserted before the extension. Prints to stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional TOML file with timeout and retry settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also write a DEBUG log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Show debug output on the console
    #[arg(short, long)]
    pub verbose: bool,
}
