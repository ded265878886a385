use reelay::{Config, Server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), reelay::Error> {
    // A missing .env file is normal in production.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("failed to load .env: {e}");
        }
    }

    let config = Config::from_env()?;
    info!(
        listen = %config.listen,
        upstream = %config.upstream_base,
        static_dir = %config.static_dir.display(),
        "starting reelay"
    );
    if config.credential.is_some() {
        info!("TMDB API key loaded: YES");
    } else {
        warn!("TMDB API key loaded: NO, relay routes will answer 400 until TMDB_API_KEY is set");
    }

    let app = reelay::app(&config)?;
    Server::bind(config.listen).serve(app).await
}
