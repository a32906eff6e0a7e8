use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "wordfreq",
    about = "Fetch a text document and chart its 20 most frequent words",
    version,
    long_about = None
)]
pub struct Args {
    /// Document to analyze
    #[arg(short, long)]
    pub url: Option<String>,

    /// Number of words to rank
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Directory receiving histogram-data.csv
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// RON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Do not count the empty words produced by leading or trailing separators
    #[arg(long)]
    pub drop_empty_tokens: bool,

    /// Fetch, print, export and exit
    #[arg(long)]
    pub once: bool,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (also echoed to the terminal)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Command-line flags override the configuration file.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.drop_empty_tokens {
            config.drop_empty_tokens = true;
        }
    }
}
