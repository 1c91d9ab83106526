use dotenv::dotenv;
use tracing::{info, warn};
use voltline_backend::app::app::App;
use voltline_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Load environment variables before the logger reads LOG_DIR and friends
    let env_loaded = dotenv();

    // Keep the guards alive for the whole process, otherwise file logs are dropped
    let _logger = match Logger::new() {
        Ok(logger) => Some(logger),
        Err(e) => {
            eprintln!("Failed to set up file logging ({e}), falling back to console only");
            let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .init();
            None
        }
    };

    info!("🚀 Starting Voltline Backend Application");

    match env_loaded {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to build application: {e}");
            std::process::exit(1);
        }
    };
    app.start().await;
}
