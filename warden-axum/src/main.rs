use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use warden::{
    Env, MailerConfig, RepositoryProvider, SqliteRepositoryProvider, Warden, WardenConfig,
    WardenMailer,
    repositories::{AppRepositoryProvider, UserRepositoryProvider},
};

/// Command line interface for Warden
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API until Ctrl-C
    Serve,
    /// Run database migrations
    Migrate,
    /// Manage token-signing apps
    App {
        #[command(subcommand)]
        command: AppCommands,
    },
    /// Grant or revoke admin rights
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Print version information
    Version,
}

#[derive(Subcommand)]
enum AppCommands {
    /// Register an app and print its id
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        secret: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    Grant { email: String },
    Revoke { email: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("Warden v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let path = WardenConfig::resolve_path(cli.config)?;
    let config = WardenConfig::load(&path)?;
    init_tracing(config.env);
    info!(config = %path.display(), env = ?config.env, "Loaded config");

    if let Some(parent) = config.storage_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create storage directory {}", parent.display())
        })?;
    }
    let repositories = Arc::new(SqliteRepositoryProvider::connect(&config.storage_path).await?);

    let result = run(cli.command, &config, repositories.clone()).await;
    repositories.close().await;
    result
}

async fn run(
    command: Commands,
    config: &WardenConfig,
    repositories: Arc<SqliteRepositoryProvider>,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve => serve(config, repositories).await,
        Commands::Migrate => {
            info!("Running migrations...");
            repositories.migrate().await?;
            info!("Migrations complete");
            Ok(())
        }
        Commands::App {
            command: AppCommands::Add { name, secret },
        } => {
            let id = repositories.app().insert(&name, &secret).await?;
            println!("{id}");
            Ok(())
        }
        Commands::Admin { command } => {
            let (email, is_admin) = match command {
                AdminCommands::Grant { email } => (email, true),
                AdminCommands::Revoke { email } => (email, false),
            };
            let user_id = repositories.user().set_admin(&email, is_admin).await?;
            info!(user_id, email = %email, is_admin, "Updated admin flag");
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

async fn serve(
    config: &WardenConfig,
    repositories: Arc<SqliteRepositoryProvider>,
) -> anyhow::Result<()> {
    let mailer_config = match &config.mailer {
        Some(mailer) => mailer.clone(),
        None => MailerConfig::from_env()?,
    };
    let mailer = WardenMailer::from_config(&mailer_config)?;

    let warden = Arc::new(
        Warden::new(repositories)
            .with_config(config)
            .with_mailer(mailer),
    );

    let app = axum::Router::new().merge(warden_axum::routes(warden).build());

    let listener = tokio::net::TcpListener::bind(config.http.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.http.addr))?;
    info!(addr = %config.http.addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gracefully shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn init_tracing(env: Env) {
    let default = match env {
        Env::Local | Env::Dev => "debug",
        Env::Prod => "info",
    };
    // RUST_LOG=
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match env {
        Env::Local => builder.pretty().init(),
        Env::Dev => builder.with_target(false).init(),
        Env::Prod => builder.json().init(),
    }
}
