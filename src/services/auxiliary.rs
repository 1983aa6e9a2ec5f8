/// One-shot startup fetches for the genre catalog and the weekly trending list.
///
/// Best effort: failures are logged and leave the default (empty) value in
/// place. They never touch the orchestrator's outcome.
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{
    models::{GenreCatalog, Movie},
    services::{
        client::CatalogClient,
        endpoint::{Endpoint, QueryParams},
    },
};

/// Number of trending titles kept for the "top movies" strip
pub const TRENDING_LIMIT: usize = 4;

pub async fn fetch_genre_catalog(client: &CatalogClient) -> GenreCatalog {
    match client.fetch_genres().await {
        Ok(genres) => {
            tracing::info!(genres = genres.len(), "Genre catalog loaded");
            GenreCatalog::new(genres)
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching genres");
            GenreCatalog::default()
        }
    }
}

pub async fn fetch_trending(client: &CatalogClient) -> Vec<Movie> {
    match client
        .fetch_listing(Endpoint::TrendingWeekly, &QueryParams::new())
        .await
    {
        Ok(listing) => {
            let top: Vec<Movie> = listing.results.into_iter().take(TRENDING_LIMIT).collect();
            tracing::info!(movies = top.len(), "Trending movies loaded");
            top
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching top movies");
            Vec::new()
        }
    }
}

/// Receivers for the auxiliary data; each starts empty and is filled at
/// most once
pub struct AuxiliaryData {
    pub genres: watch::Receiver<GenreCatalog>,
    pub trending: watch::Receiver<Vec<Movie>>,
    tasks: Vec<JoinHandle<()>>,
}

impl AuxiliaryData {
    /// Waits for both fetches to finish
    pub async fn settled(&mut self) {
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Auxiliary fetch task ended abnormally");
            }
        }
    }
}

/// Starts both fetches as independent tasks
pub fn spawn_auxiliary_fetchers(client: &CatalogClient) -> AuxiliaryData {
    let (genres_tx, genres) = watch::channel(GenreCatalog::default());
    let (trending_tx, trending) = watch::channel(Vec::new());

    let genre_client = client.clone();
    let genre_task = tokio::spawn(async move {
        let catalog = fetch_genre_catalog(&genre_client).await;
        genres_tx.send_replace(catalog);
    });

    let trending_client = client.clone();
    let trending_task = tokio::spawn(async move {
        let movies = fetch_trending(&trending_client).await;
        trending_tx.send_replace(movies);
    });

    AuxiliaryData {
        genres,
        trending,
        tasks: vec![genre_task, trending_task],
    }
}
