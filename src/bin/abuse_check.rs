use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use threat_intel_pipeline::abuseipdb::AbuseIpDbClient;
use threat_intel_pipeline::config::{Settings, DEFAULT_CONFIG_FILE};
use threat_intel_pipeline::core::RateGovernor;
use threat_intel_pipeline::enrichment::EnrichmentDriver;
use threat_intel_pipeline::rdap::RdapResolver;
use threat_intel_pipeline::utils::init_logging;

#[derive(Parser, Debug)]
#[command(name = "abuse-check")]
#[command(about = "Report AbuseIPDB reputation and network owner for a list of IPs")]
#[command(version)]
struct Args {
    /// Newline-delimited IP list, `-` for stdin
    #[arg(default_value = "entrada.txt")]
    input: PathBuf,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    init_logging(&settings.logging)?;
    settings.reputation.validate()?;

    let lines = read_lines(&args.input)?;
    tracing::info!(count = lines.len(), input = %args.input.display(), "IP list loaded");

    let driver = EnrichmentDriver::new(
        AbuseIpDbClient::new(&settings.reputation)?,
        RdapResolver::new(&settings.rdap)?,
        RateGovernor::per_minute(settings.reputation.requests_per_minute)?,
    );

    let stdout = io::stdout();
    driver.run(&lines, &mut stdout.lock()).await?;
    Ok(())
}

fn read_lines(input: &Path) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = if input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
        Box::new(BufReader::new(file))
    };

    reader
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("reading IP list")
}
