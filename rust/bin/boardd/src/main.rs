//! `boardd`: the board server binary.
//!
//! Usage:
//!   boardd -c <context-name-or-path> [--listen <addr>]
//!   boardd --hash-password <password>
//!
//! The context name resolves to `/etc/board/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use board_core::Module;
use board_sql::SQLStore;
use config::ServerConfig;

/// Board server.
#[derive(Parser, Debug)]
#[command(name = "boardd", about = "Board server: members, posts and comments")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required_unless_present = "hash_password")]
    config: Option<String>,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8000")]
    listen: String,

    /// Print the argon2id hash of a password (for the [admin] section) and exit.
    #[arg(long = "hash-password", value_name = "PASSWORD")]
    hash_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Some(password) = &cli.hash_password {
        let hash = auth::service::password::hash(password)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        println!("{}", hash);
        return Ok(());
    }

    // Load server configuration.
    let context = cli
        .config
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--config is required"))?;
    let config_path = ServerConfig::resolve_path(context);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = board_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    let sqlite_path = core_config.resolve_sqlite_path();
    let sql: Arc<dyn SQLStore> = Arc::new(
        board_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    info!("SQL store at {}", sqlite_path.display());

    // Auth first: the post schema reads member names.
    let auth_config = auth::service::AuthConfig {
        jwt_secret: server_config.jwt.secret.clone(),
        token_ttl_secs: server_config.jwt.expire_secs,
    };
    let auth_module = auth::AuthModule::new(Arc::clone(&sql), auth_config)?;
    info!("Auth module initialized");

    bootstrap::ensure_admin(&server_config, auth_module.service())?;

    let post_module = post::PostModule::new(Arc::clone(&sql))?;
    info!("Post module initialized");

    let modules: [&dyn Module; 2] = [&auth_module, &post_module];
    let app = routes::build_router(&modules, auth_module.resolver());

    // Start server.
    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("Board server listening on {}", core_config.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
