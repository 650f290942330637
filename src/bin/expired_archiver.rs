use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use expired_archiver::{SweepConfig, Sweeper};

#[derive(Parser)]
#[command(name = "expired-archiver")]
#[command(about = "Move files past an expiration date to an archive")]
struct Cli {
    /// Number of days since last modification or status change to consider
    /// expired (negative values expire everything)
    #[arg(allow_negative_numbers = true)]
    expiration_in_days: i64,

    /// Absolute path of the directory to be archived
    path: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let now = SystemTime::now();

    let config = SweepConfig::new(&cli.path).with_expiration_days(cli.expiration_in_days);
    let mut sweeper = Sweeper::new(config);
    let stdout = std::io::stdout();
    let stats = sweeper
        .run_once(now, &mut stdout.lock())
        .with_context(|| format!("archiving expired entries in {}", cli.path.display()))?;

    info!("{}", stats.summary());
    Ok(())
}
