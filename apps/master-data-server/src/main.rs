use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use master_data::{config::MasterDataConfig, MasterData};
use mimalloc::MiMalloc;
use modkit_db::{ConnectOpts, DbHandle};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MASTER_DATA: &str = "master_data";
const API_INGRESS: &str = "api_ingress";

/// Master data server: CRUD and dynamic listing for roles, biodata, users and modules
#[derive(Parser)]
#[command(name = "master-data-server")]
#[command(about = "Master data server: CRUD and dynamic listing over REST")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("Master data server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

/// Module sections decoded strictly, with the server section applied to the ingress.
struct ModuleConfigs {
    master_data: MasterDataConfig,
    ingress: ApiIngressConfig,
}

fn module_configs(config: &AppConfig) -> Result<ModuleConfigs> {
    let master_data: MasterDataConfig = config.module_config_or_default(MASTER_DATA)?;
    let mut ingress: ApiIngressConfig = config.module_config_or_default(API_INGRESS)?;
    ingress.bind_addr = format!("{}:{}", config.server.host, config.server.port);
    if config.server.timeout_sec > 0 {
        ingress.request_timeout_secs = config.server.timeout_sec;
    }
    ingress
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("invalid bind address '{}'", ingress.bind_addr))?;
    Ok(ModuleConfigs {
        master_data,
        ingress,
    })
}

fn database_config(config: &AppConfig) -> Result<&DatabaseConfig> {
    let db = config
        .database
        .as_ref()
        .context("database section is not configured")?;
    if db.url.trim().is_empty() {
        return Err(anyhow!("database.url is empty"));
    }
    DbHandle::detect(&db.url)?;
    Ok(db)
}

/// Relative SQLite paths resolve against the home dir; `sqlite::memory:` stays as is.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.contains(":memory:") {
        return Ok(dsn.to_string());
    }
    let Some(rest) = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
    else {
        return Ok(dsn.to_string());
    };
    let (path_str, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path_str.is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }

    let mut p = PathBuf::from(path_str);
    if p.is_relative() {
        p = base_dir.join(p);
    }
    // Rebuild DSN with absolute path and normalized slashes
    let mut out = format!("sqlite://{}", p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

async fn connect_db(config: &AppConfig) -> Result<DbHandle> {
    let db_config = database_config(config)?;
    let dsn = absolutize_sqlite_dsn(db_config.url.trim(), &config.home_dir())?;
    let opts = ConnectOpts {
        max_conns: db_config.max_conns,
        acquire_timeout: Some(Duration::from_secs(5)),
        busy_timeout_ms: db_config.busy_timeout_ms.unwrap_or(5000),
        ..Default::default()
    };
    let db = DbHandle::connect(&dsn, opts)
        .await
        .with_context(|| format!("cannot connect to {}", db_config.url))?;
    tracing::info!(engine = ?db.engine(), "Connected to database");
    Ok(db)
}

async fn run_server(config: AppConfig) -> Result<()> {
    let modules = module_configs(&config)?;
    let db = connect_db(&config).await?;
    let cancel = CancellationToken::new();

    let master_data = MasterData::new();
    master_data.migrate(&db).await?;
    master_data.init(&modules.master_data, &db, cancel.child_token())?;

    let ingress = ApiIngress::new(modules.ingress);
    let router = master_data.register_rest(Router::new(), &ingress)?;
    let router = ingress.finalize_router(router)?;

    tokio::spawn(shutdown_on_signal(cancel.clone()));
    let served = ingress.serve(router, cancel).await;

    db.close().await;
    tracing::info!("Master data server stopped");
    served
}

async fn shutdown_on_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Shutdown signal received");
    cancel.cancel();
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    module_configs(config)?;
    database_config(config)?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}
