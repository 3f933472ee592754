use crate::{
    error::AppResult,
    models::{CastMember, MovieDetails, MovieId, VideoRef},
    services::{providers::MovieProvider, trailer::youtube_trailers},
};

/// Number of cast members shown on the detail page
pub const TOP_CAST: usize = 6;

/// Everything the movie detail page shows
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailView {
    pub details: MovieDetails,
    pub top_cast: Vec<CastMember>,
    pub trailers: Vec<VideoRef>,
}

/// Loads details, credits and videos concurrently.
///
/// Only the details are required. Missing credits or videos leave the
/// corresponding section empty.
pub async fn load_movie_detail(
    provider: &dyn MovieProvider,
    id: MovieId,
) -> AppResult<MovieDetailView> {
    let (details, credits, videos) = tokio::join!(
        provider.get_movie_details(id),
        provider.get_movie_credits(id),
        provider.get_movie_videos(id),
    );

    let details = details?;

    let top_cast = match credits {
        Ok(credits) => credits.cast.into_iter().take(TOP_CAST).collect(),
        Err(e) => {
            tracing::warn!(error = %e, movie_id = %id, "Failed to fetch credits");
            Vec::new()
        }
    };

    let trailers = match videos {
        Ok(videos) => youtube_trailers(videos),
        Err(e) => {
            tracing::warn!(error = %e, movie_id = %id, "Failed to fetch videos");
            Vec::new()
        }
    };

    Ok(MovieDetailView {
        details,
        top_cast,
        trailers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Credits;
    use crate::services::providers::MockMovieProvider;

    fn details(id: MovieId) -> MovieDetails {
        MovieDetails {
            id,
            title: "Inception".to_string(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: "2010-07-15".to_string(),
            vote_average: 8.4,
            runtime: Some(148),
            genres: vec![],
            tagline: None,
        }
    }

    fn cast(count: u64) -> Credits {
        Credits {
            cast: (1..=count)
                .map(|id| CastMember {
                    id,
                    name: format!("Actor {}", id),
                    character: format!("Role {}", id),
                    profile_path: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_load_detail_truncates_cast() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_get_movie_details()
            .returning(|id| Ok(details(id)));
        provider
            .expect_get_movie_credits()
            .returning(|_| Ok(cast(10)));
        provider.expect_get_movie_videos().returning(|_| Ok(vec![]));

        let view = load_movie_detail(&provider, MovieId(27205)).await.unwrap();
        assert_eq!(view.details.id, MovieId(27205));
        assert_eq!(view.top_cast.len(), TOP_CAST);
        assert_eq!(view.top_cast[0].name, "Actor 1");
    }

    #[tokio::test]
    async fn test_load_detail_tolerates_missing_credits() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_get_movie_details()
            .returning(|id| Ok(details(id)));
        provider
            .expect_get_movie_credits()
            .returning(|_| Err(AppError::ExternalApi("timeout".to_string())));
        provider
            .expect_get_movie_videos()
            .returning(|_| Err(AppError::ExternalApi("timeout".to_string())));

        let view = load_movie_detail(&provider, MovieId(1)).await.unwrap();
        assert!(view.top_cast.is_empty());
        assert!(view.trailers.is_empty());
    }

    #[tokio::test]
    async fn test_load_detail_not_found() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_get_movie_details()
            .returning(|_| Err(AppError::NotFound("TMDB resource /movie/0".to_string())));
        provider
            .expect_get_movie_credits()
            .returning(|_| Ok(Credits::default()));
        provider.expect_get_movie_videos().returning(|_| Ok(vec![]));

        let result = load_movie_detail(&provider, MovieId(0)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
