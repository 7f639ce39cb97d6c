use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Lineup file listing channel metadata and stream URLs
    #[arg(short, long, default_value = "streams.txt")]
    pub input: PathBuf,

    /// Where to write the XMLTV guide document
    #[arg(long, default_value = "epg.xml")]
    pub epg_output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}
