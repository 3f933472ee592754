use std::sync::Arc;

use movie_scout::{
    app::App,
    config::Config,
    services::{images::ImageUrls, FavoritesStore, MovieProvider, TmdbProvider},
    storage,
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the listing on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("movie_scout=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let provider: Arc<dyn MovieProvider> = Arc::new(TmdbProvider::from_config(&config));
    let favorites = FavoritesStore::load(storage::open(&config)?);
    let images = ImageUrls::new(config.tmdb_image_url.clone());

    tracing::info!(
        provider = provider.name(),
        debounce_ms = config.search_debounce_ms,
        "Starting movie-scout"
    );

    let app = App::new(provider, favorites, images, config.search_debounce());
    app.run(BufReader::new(tokio::io::stdin())).await
}
