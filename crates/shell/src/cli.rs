use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "warren")]
#[command(about = "Multi-session tab-group browser shell")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Address loaded into tabs created without an explicit url
    #[arg(long, value_name = "URL", default_value = warren::DEFAULT_HOMEPAGE)]
    pub homepage: String,

    /// Initial host window width
    #[arg(long, default_value = "1200")]
    pub width: u32,

    /// Initial host window height
    #[arg(long, default_value = "800")]
    pub height: u32,

    /// History file (defaults to the platform data directory)
    #[arg(long, value_name = "FILE")]
    pub history_file: Option<PathBuf>,

    /// Disable history recording entirely
    #[arg(long)]
    pub no_history: bool,
}
