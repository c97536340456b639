// # ddns-update - one-shot zone-wide DDNS updater
//
// The binary is a thin integration layer. It is responsible for:
// 1. Loading `.env` and reading configuration from environment variables
// 2. Initializing logging and a current-thread tokio runtime
// 3. Wiring the HTTP IP source, the Cloudflare provider and the file cache
// 4. Running one update pass and mapping the outcome to an exit code
//
// Scheduling is external: run it from cron or a systemd timer.
//
// ## Configuration
//
// - `CLOUDFLARE_API_TOKEN`: API token (Zone:Read, DNS:Edit)
// - `DDNS_SUBDOMAINS`: Comma-separated labels, `@` = bare domain (default `@`)
// - `DDNS_CREATE_IF_MISSING`: Create absent A records (default `false`)
// - `DDNS_IP_CACHE_PATH`: Last propagated IP (default `last_ip.txt`)
// - `DDNS_IP_ECHO_URL`: Public IP echo service (default `https://api.ipify.org`)
// - `DDNS_API_BASE_URL`: Cloudflare API root (default `https://api.cloudflare.com/client/v4`)
// - `DDNS_RECORD_TTL`: TTL for written records, 1 = automatic (default `1`)
// - `DDNS_RECORD_PROXIED`: Proxied flag for written records (default `true`)
// - `DDNS_MODE`: `live` (default) or `dry-run` to log writes instead of sending them
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=your_token
// export DDNS_SUBDOMAINS=@,www
// export DDNS_IP_CACHE_PATH=/var/lib/ddns/last_ip.txt
//
// ddns-update
// ```

mod settings;

use anyhow::Result;
use ddns_core::{DdnsEngine, FileIpCache, RunConfig, RunReport};
use ddns_ip_http::HttpIpSource;
use ddns_provider_cloudflare::CloudflareProvider;
use settings::Settings;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible run endings
///
/// - 0: Run completed (including no-op runs and per-record failures)
/// - 1: Configuration or startup error
/// - 2: Run aborted (IP resolution, zone listing or cache write failed)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Run completed
    Completed = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Run aborted before completion
    FatalError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddns-update");
    info!(
        "Configuration loaded: {} subdomain(s), create_if_missing={}, cache={}",
        settings.run.subdomains.len(),
        settings.run.create_if_missing,
        settings.run.ip_cache_path.display()
    );

    if settings.run.api_token.is_empty() {
        warn!("CLOUDFLARE_API_TOKEN is not set; provider requests will be rejected");
    }

    let engine = match build_engine(settings.run) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::FatalError.into();
        }
    };

    let code = rt.block_on(async {
        match engine.run_once().await {
            Ok(report) => {
                log_report(&report);
                DdnsExitCode::Completed
            }
            Err(e) => {
                error!("Run aborted: {}", e);
                DdnsExitCode::FatalError
            }
        }
    });

    code.into()
}

/// Wire the production components around `config`
fn build_engine(config: RunConfig) -> Result<DdnsEngine> {
    let ip_source = HttpIpSource::new(config.ip_echo_url.clone())?;
    let provider = CloudflareProvider::new(
        config.api_token.clone(),
        config.api_base_url.clone(),
        config.dry_run,
    )?;
    let cache = FileIpCache::new(&config.ip_cache_path);

    let engine = DdnsEngine::new(
        Box::new(ip_source),
        Box::new(provider),
        Box::new(cache),
        config,
    )?;

    Ok(engine)
}

fn log_report(report: &RunReport) {
    match report {
        RunReport::Unchanged { ip } => {
            info!("Done: {} is already propagated", ip);
        }
        RunReport::Propagated { ip, persisted, .. } => {
            let summary = report.summary();
            info!("Done: {} propagated across {}", ip, summary);

            if !summary.failed_zones.is_empty() {
                warn!("{} zone(s) stopped on an error", summary.failed_zones.len());
            }

            if !persisted {
                info!("[DRY-RUN] IP cache left untouched");
            }
        }
    }
}
