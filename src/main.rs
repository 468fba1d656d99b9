use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use threat_intel_pipeline::cloudflare::{CloudflareClient, CloudflareListsManager};
use threat_intel_pipeline::config::{Settings, DEFAULT_CONFIG_FILE};
use threat_intel_pipeline::service::{extract_client_ip, write_outcome, BlockingService, EXIT_FAILED};
use threat_intel_pipeline::utils::{init_logging, IntelResult};

#[derive(Parser, Debug)]
#[command(name = "cloudflare-blocker")]
#[command(about = "Add an IP to a pre-existing Cloudflare account IP list")]
#[command(version)]
struct Args {
    /// IP to block; read from a JSON alert on stdin when omitted
    ip: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let settings = match Settings::load_from(&args.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let ip = match args.ip {
        Some(ip) => ip,
        None => match extract_client_ip(io::stdin().lock()) {
            Ok(ip) => ip,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let service = match build_service(&settings) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("{}", e);
            return report(&ip, &settings.cloudflare.list_name, false);
        }
    };

    let blocked = match service.block_ip(&ip).await {
        Ok(receipt) => {
            tracing::debug!(list_id = %receipt.list_id, "block confirmed");
            true
        }
        Err(failure) => {
            // already logged by the failing step
            tracing::debug!(stage = %failure.stage, "block aborted");
            false
        }
    };
    report(&ip, service.list_name(), blocked)
}

fn report(ip: &str, list_name: &str, blocked: bool) -> ExitCode {
    let code =
        write_outcome(&mut io::stdout().lock(), ip, list_name, blocked).unwrap_or(EXIT_FAILED);
    ExitCode::from(code)
}

fn build_service(
    settings: &Settings,
) -> IntelResult<BlockingService<CloudflareListsManager, CloudflareListsManager>> {
    let cloudflare = &settings.cloudflare;
    cloudflare.validate()?;

    let lists = CloudflareListsManager::new(CloudflareClient::new(cloudflare)?, cloudflare);
    Ok(BlockingService::new(lists.clone(), lists, cloudflare.list_name.clone()))
}
