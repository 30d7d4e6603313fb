//! Storefront CLI server
//!
//! ```sh
//! # Run with default config (~/.config/storefront/config.toml)
//! storefront-service
//!
//! # Custom config path, resolve services through the container
//! storefront-service --config /etc/storefront/config.toml --wiring container
//!
//! # Validate config without starting
//! storefront-service --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use storefront::config::{AppConfig, WiringMode, CONFIG_PATH_ENV};
use storefront::server::{init_tracing, ServerHandle, ServerOptions};

/// Featured products storefront.
#[derive(Parser, Debug)]
#[command(
    name = "storefront-service",
    version,
    about = "Featured products priced per customer",
    long_about = "Storefront: HTML page and JSON API listing featured products, \
                  converted into the customer's currency and discounted for \
                  preferred customers.\n\n\
                  Default config: ~/.config/storefront/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override how services are wired (pure, container).
    #[arg(long)]
    wiring: Option<WiringMode>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip stocking an empty catalog with demo products.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(storefront::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return check(&cli, &config_path, loaded);
    }

    let mut config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(&cli, &mut config);

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed_demo_catalog: !cli.no_seed,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start storefront: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;

    ExitCode::SUCCESS
}

fn apply_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(mode) = cli.wiring {
        config.wiring.mode = mode;
    }
}

fn check(
    cli: &Cli,
    config_path: &std::path::Path,
    loaded: Result<AppConfig, storefront::config::ConfigError>,
) -> ExitCode {
    let mut config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(cli, &mut config);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    println!("Configuration is valid");
    println!("   Config file : {}", config_path.display());
    println!("   Address     : {}", config.server.address());
    println!("   Database    : {}", config.database.connection_url());
    println!("   Wiring      : {}", config.wiring.mode);
    println!("   Converter   : {:?}", config.converter.kind);
    println!("   Log level   : {}", config.logging.level);
    ExitCode::SUCCESS
}
