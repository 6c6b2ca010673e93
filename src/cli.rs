use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "trawl", about = "Collect job listings from a paginated search page")]
pub struct Cli {
    /// What to search for
    #[arg(value_parser = non_blank)]
    pub query: String,

    /// Stop after this many result pages
    #[arg(short = 'p', long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: u32,

    /// Directory for the report, backup and snapshot
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
}

fn non_blank(s: &str) -> Result<String, String> {
    match s.trim().is_empty() {
        true => Err("query must not be empty".to_string()),
        false => Ok(s.trim().to_string()),
    }
}
