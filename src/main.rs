use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use bridge_warden::config::Config;
use bridge_warden::endpoint::HttpEndpoint;
use bridge_warden::registry::ContractRegistry;
use bridge_warden::scanner::BlockScanner;
use bridge_warden::submitter::TransactionSubmitter;
use bridge_warden::types::Role;

/// Two-way bridge relayer: scans one chain for bridge events and mirrors
/// them as signed calls on the counterpart chain.
#[derive(Parser, Debug)]
#[command(name = "bridge-warden", version)]
struct Cli {
    /// Chain role to scan: "source" for Deposits, "destination" for Unwraps
    role: String,

    /// Path to the contract metadata file (overrides CONTRACT_INFO)
    #[arg(long)]
    contract_info: Option<String>,

    /// Keep polling for new blocks after the initial window
    #[arg(long)]
    watch: bool,
}

fn main() -> eyre::Result<()> {
    // Install color-eyre for better error reporting
    color_eyre::install()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> eyre::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let role = Role::from_str(&cli.role)?;

    let config = Config::load()?;
    tracing::info!(
        source_chain = %config.source.chain,
        destination_chain = %config.destination.chain,
        window = config.scan.window,
        "Configuration loaded"
    );

    let metadata_path = cli
        .contract_info
        .unwrap_or_else(|| config.contract_info.clone());
    let registry = ContractRegistry::load(Path::new(&metadata_path))?;

    let binding = registry.resolve(role)?;
    let counterpart = registry.resolve(role.opposite())?;
    tracing::info!(
        role = %role,
        contract = %binding.address,
        warden = %binding.operating_address,
        "Contract bindings resolved"
    );

    let home = HttpEndpoint::connect(config.network(role))?;
    let remote = HttpEndpoint::connect(config.network(role.opposite()))?;
    let submitter = TransactionSubmitter::new(config.scan.gas_limit);
    let scanner = BlockScanner::new(
        &binding,
        &counterpart,
        &home,
        &remote,
        &submitter,
        config.scan.window,
    );

    if cli.watch {
        let poll_interval = Duration::from_millis(config.scan.poll_interval_ms);
        tokio::select! {
            _ = scanner.run(poll_interval) => {}
            _ = wait_for_shutdown_signal() => {
                tracing::info!("Shutting down");
            }
        }
        return Ok(());
    }

    let summary = scanner.scan().await?;
    tracing::info!(
        role = %role,
        from_block = summary.from_block,
        to_block = summary.to_block,
        blocks_scanned = summary.blocks_scanned,
        blocks_failed = summary.blocks_failed,
        logs_seen = summary.logs_seen,
        relayed = summary.relayed,
        failed = summary.submission_failures,
        decode_failures = summary.decode_failures,
        unrecognized = summary.unrecognized,
        "Scan complete"
    );
    Ok(())
}

/// Initialize tracing/logging with structured output
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bridge_warden=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Wait for shutdown signals (SIGINT/SIGTERM)
async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
