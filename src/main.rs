use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use family_budget::infrastructure::{
    AppState, auth, config::Config, db, scheduler, seed, server,
};

/// Value following `--profile` on the command line
fn profile_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let pos = args.iter().position(|arg| arg == "--profile")?;
    args.get(pos + 1).cloned()
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "family_budget=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = match profile_arg() {
        Some(profile) => Config::for_profile(Some(profile)),
        None => Config::from_env(),
    };
    tracing::debug!("Using profile '{}'", config.profile);

    match config.signing_secret() {
        Ok(secret) => auth::install_jwt_secret(secret),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");
    let state = AppState::with_settings(db, config.settings());

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&state).await {
            tracing::error!("Failed to seed data: {}", e);
        }
    }

    scheduler::start_regular_payment_scheduler(
        state.clone(),
        config.regular_payment_interval_secs,
    );

    let app = server::build_router(state, &config);

    // Find available port
    let port = server::find_available_port(config.port).expect("Failed to find available port");
    if port != config.port {
        tracing::warn!(
            "Preferred port {} was not available, using port {} instead",
            config.port,
            port
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Family budget server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
