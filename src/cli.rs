use clap::Parser;
use std::path::PathBuf;

/// Serve a single-page application's build output
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on [default: 3000]. The PORT environment variable takes precedence.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Serve this directory instead of the bundled assets
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Configuration file, with or without extension (optional)
    #[arg(short, long, value_name = "FILE", default_value = "config")]
    pub config: String,
}
