//! Authgate Server Entry Point

use authgate::config::AuthConfig;
use authgate::{db, logging, server, AppState};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "authgate")]
#[command(version, about = "Authentication-gated HTTP API with async audit logging", long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
  AUTHGATE_JWT_SECRET          Secret key for signing access tokens (required)
  AUTHGATE_TOKEN_TTL_MINUTES   Access token lifetime in minutes (default: 30)
  AUTHGATE_AUDIT_BUFFER_CAPACITY
                               Audit log channel capacity (default: 10000)
  RUST_LOG                     Log filter (default: info)"#)]
struct Cli {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "AUTHGATE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "AUTHGATE_PORT")]
    port: u16,

    /// SQLite database URL
    #[arg(
        long,
        default_value = "sqlite://authgate.db",
        env = "AUTHGATE_DATABASE_URL"
    )]
    database_url: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let auth_config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let pool = match db::migrations::initialize_database(&cli.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };
    info!("Database ready: {}", cli.database_url);

    let state = AppState::new(pool, auth_config);
    let bind_addr = format!("{}:{}", cli.host, cli.port);

    if let Err(e) = server::run(state, &bind_addr).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
