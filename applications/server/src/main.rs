/// DevHub Server - developer profiles and posts
use clap::{Parser, Subcommand};
use devhub_core::types::{gravatar_url, CreateUser, RegisterInput};
use devhub_core::validation::{validate_register, Registration};
use devhub_core::Storage;
use devhub_server::{config::ServerConfig, create_router, services::AuthService, state::AppState};
use devhub_storage::LocalStorageContext;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devhub-server")]
#[command(about = "DevHub developer network server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Login email
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devhub_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config)?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            name,
            email,
            password,
        } => add_user(&config, name, email, &password).await?,
        Commands::ListUsers => list_users(&config).await?,
    }

    Ok(())
}

async fn open_storage(config: &ServerConfig) -> anyhow::Result<LocalStorageContext> {
    let pool = devhub_storage::create_pool(&config.storage.database_url).await?;
    devhub_storage::run_migrations(&pool).await?;
    Ok(LocalStorageContext::new(pool))
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.bcrypt_cost,
    )
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting DevHub Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let db = Arc::new(open_storage(&config).await?);
    tracing::info!("Database connected");

    let auth_service = Arc::new(auth_service(&config));

    let app = create_router(AppState::new(db, auth_service));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config: &ServerConfig,
    name: String,
    email: String,
    password: &str,
) -> anyhow::Result<()> {
    let account = registration(name, email, password)?;

    let db = open_storage(config).await?;
    let password_hash = auth_service(config).hash_password(&account.password)?;

    let user = db
        .create_user(CreateUser {
            avatar: gravatar_url(&account.email),
            name: account.name,
            email: account.email,
            password_hash,
        })
        .await?;

    println!("Created user {} ({})", user.id, user.email);

    Ok(())
}

/// Apply the same rules as `POST /api/auth/register`
fn registration(name: String, email: String, password: &str) -> anyhow::Result<Registration> {
    validate_register(&RegisterInput {
        name: Some(name),
        email: Some(email),
        password: Some(password.to_string()),
        password2: Some(password.to_string()),
    })
    .map_err(|errors| anyhow::anyhow!("Invalid user: {}", errors))
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let db = open_storage(config).await?;
    let users = db.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}>", user.id, user.name, user.email);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_accepts_valid_account() {
        let registration =
            registration(" Jane Doe ".into(), "jane@example.com".into(), "secret123").unwrap();
        assert_eq!(registration.name, "Jane Doe");
        assert_eq!(registration.email, "jane@example.com");
    }

    #[test]
    fn registration_rejects_what_the_api_rejects() {
        let err = registration("Jane".into(), "not-an-email".into(), "secret123").unwrap_err();
        assert!(err.to_string().contains("Email is invalid"));

        let err = registration("Jane".into(), "jane@example.com".into(), "x").unwrap_err();
        assert!(err.to_string().contains("password"));

        assert!(registration("J".into(), "jane@example.com".into(), "secret123").is_err());
    }
}
