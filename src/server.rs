//! Storefront server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: database init, migrations,
//! demo seeding, wiring, the HTTP server and graceful shutdown.

use std::net::SocketAddr;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::composition;
use crate::config::AppConfig;
use crate::domain::{Currency, DomainResult, Money, NewProduct, ProductCatalog};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmProductRepository};
use crate::interfaces::http::create_router;
use crate::support::errors::AppError;
use crate::support::shutdown::ShutdownCoordinator;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the storefront.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Stock an empty catalog with demo products (default: true).
    pub seed_demo_catalog: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            seed_demo_catalog: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running storefront.
///
/// ```rust,no_run
/// use storefront::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the HTTP server is bound to.
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the storefront with the given options.
    ///
    /// 1. Connect to the database and run migrations
    /// 2. Seed the demo catalog when it is empty (if enabled)
    /// 3. Wire the services in the configured mode
    /// 4. Serve HTTP until shutdown is triggered
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting storefront...");

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig {
            url: app_cfg.database.connection_url(),
            max_connections: app_cfg.database.max_connections,
        };
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        if opts.seed_demo_catalog {
            let catalog = SeaOrmProductRepository::new(db.clone());
            let seeded = seed_demo_catalog(&catalog).await?;
            if seeded > 0 {
                info!("Seeded {} demo products", seeded);
            }
        }

        // ── Services ───────────────────────────────────────────
        let services =
            composition::compose(app_cfg.wiring.mode, db.clone(), &app_cfg.converter)?;
        let router = create_router(services, Some(db.clone()));

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout_secs);
        let shutdown_signal = shutdown.signal();

        // ── HTTP server ────────────────────────────────────────
        let addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Storefront listening on http://{}", local_addr);
        info!("OpenAPI document at http://{}/api-docs/openapi.json", local_addr);

        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("HTTP server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("HTTP server error: {}", e);
            }
        });

        Ok(Self {
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown without waiting for it.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop, then close the database.
    ///
    /// In-flight requests get `shutdown_timeout_secs` to finish.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        shutdown.signal().wait().await;
        info!("Waiting for in-flight requests...");

        let drained = shutdown
            .run_with_timeout(async {
                match api_task.await {
                    Ok(()) => info!("HTTP server stopped"),
                    Err(e) => error!("HTTP server task panicked: {}", e),
                }
            })
            .await;
        if !drained {
            warn!("Abandoning in-flight requests");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Storefront shutdown complete");
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Stock an empty catalog with a few demo products.
///
/// Returns how many products were added; a catalog that already holds
/// anything is left alone.
pub async fn seed_demo_catalog(catalog: &dyn ProductCatalog) -> DomainResult<usize> {
    if catalog.count().await? > 0 {
        return Ok(0);
    }

    let demo = [
        ("Widget", Decimal::new(1000, 2), true),
        ("Gadget", Decimal::new(2499, 2), true),
        ("Gizmo", Decimal::new(500, 2), false),
    ];
    for (name, amount, is_featured) in demo {
        catalog
            .add_product(NewProduct {
                name: name.to_string(),
                unit_price: Money::new(amount, Currency::usd()),
                is_featured,
            })
            .await?;
    }
    Ok(demo.len())
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WiringMode;
    use crate::domain::{AnonymousUser, ProductRepository};
    use crate::infrastructure::InMemoryProductRepository;

    #[tokio::test]
    async fn test_seed_only_fills_empty_catalog() {
        let catalog = InMemoryProductRepository::new();

        assert_eq!(seed_demo_catalog(&catalog).await.unwrap(), 3);
        assert_eq!(seed_demo_catalog(&catalog).await.unwrap(), 0);
        assert_eq!(catalog.count().await.unwrap(), 3);

        let featured = catalog.get_featured_products().await.unwrap();
        let names: Vec<&str> = featured.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gadget"]);
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        let opts = ServerOptions {
            config,
            ..ServerOptions::default()
        };

        let err = ServerHandle::start(opts).await.err();
        assert!(matches!(err, Some(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_start_serves_until_shutdown() {
        let free_port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = free_port;
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;

        let handle = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await
        .unwrap();
        assert_eq!(handle.local_addr.port(), free_port);

        handle.trigger_shutdown();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_services_see_seeded_catalog() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let catalog = SeaOrmProductRepository::new(db.clone());
        seed_demo_catalog(&catalog).await.unwrap();

        let services = composition::compose(
            WiringMode::Pure,
            db,
            &crate::config::ConverterConfig::default(),
        )
        .unwrap();
        let products = services
            .products
            .get_featured_products(&AnonymousUser)
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].unit_price.to_string(), "10.00USD");
    }
}
