use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "qed")]
#[command(version = "0.1.0")]
#[command(about = "Replay keystrokes against a gap-buffer document and print the result")]
pub struct CliArgs {
    /// Initial document text (`\n` separates lines)
    #[arg(long, short = 't')]
    pub text: Option<String>,

    /// Key script to replay, e.g. "Hello<Enter><Up><End>"
    #[arg(long, short = 'k')]
    pub keys: Option<String>,

    /// Config file (defaults to the first of the standard locations that exists)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Override the initial gap capacity from the config
    #[arg(long)]
    pub initial_gap: Option<usize>,

    /// Mark the point with `|` in the printed output
    #[arg(long, short = 'p')]
    pub show_point: bool,
}

impl CliArgs {
    /// Text of the document before any keys are replayed.
    pub fn initial_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

pub fn parse_args() -> Result<CliArgs, Box<dyn std::error::Error>> {
    Ok(CliArgs::parse())
}
