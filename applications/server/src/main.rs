//! Chorus Server - music-library web service
use chorus_core::types::Role;
use chorus_server::{
    config::ServerConfig,
    router::create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chorus-server")]
#[command(about = "Chorus music-library server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user account
    AddUser {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chorus_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            serve().await?;
        }
        Commands::AddUser {
            name,
            email,
            password,
            admin,
        } => {
            add_user(&name, &email, &password, admin).await?;
        }
        Commands::ListUsers => {
            list_users().await?;
        }
    }

    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;
    config.validate()?;

    tracing::info!("Starting Chorus Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = chorus_storage::create_pool(&config.storage.database_url).await?;
    chorus_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    // Initialize media storage
    let files = FileStorage::new(config.storage.media_storage_path.clone());
    files.initialize().await?;
    let files = Arc::new(files);
    tracing::info!("Media storage initialized");

    // Initialize auth service
    let auth = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_hours,
    ));
    tracing::info!("Auth service initialized");

    // Build application state and router
    let app_state = AppState::new(pool, auth, files, config.uploads);
    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(name: &str, email: &str, password: &str, admin: bool) -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    let pool = chorus_storage::create_pool(&config.storage.database_url).await?;
    chorus_storage::run_migrations(&pool).await?;

    let auth = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_hours,
    );

    let password_hash = auth.hash_password(password)?;
    let role = if admin { Role::Admin } else { Role::User };

    let user = chorus_storage::users::create(&pool, name, email, role, &password_hash).await?;

    println!(
        "Created user {} <{}> with role {}",
        user.name,
        user.email,
        user.role.as_str()
    );

    Ok(())
}

async fn list_users() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    let pool = chorus_storage::create_pool(&config.storage.database_url).await?;
    chorus_storage::run_migrations(&pool).await?;

    let users = chorus_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {} <{}> ({})",
            user.id,
            user.name,
            user.email,
            user.role.as_str()
        );
    }

    Ok(())
}
