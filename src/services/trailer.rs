use crate::{
    models::{MovieId, VideoRef},
    services::providers::MovieProvider,
};

/// Keeps only the videos the embedded viewer can play, in service order
pub fn youtube_trailers(videos: Vec<VideoRef>) -> Vec<VideoRef> {
    videos
        .into_iter()
        .filter(VideoRef::is_youtube_trailer)
        .collect()
}

/// First playable trailer for a movie. Lookup failures yield `None`.
pub async fn find_trailer(provider: &dyn MovieProvider, id: MovieId) -> Option<VideoRef> {
    match provider.get_movie_videos(id).await {
        Ok(videos) => {
            let trailer = youtube_trailers(videos).into_iter().next();
            if trailer.is_none() {
                tracing::info!(movie_id = %id, "Trailer not available");
            }
            trailer
        }
        Err(e) => {
            tracing::warn!(error = %e, movie_id = %id, "Failed to fetch trailer");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockMovieProvider;

    fn video(key: &str, site: &str, video_type: &str) -> VideoRef {
        VideoRef {
            id: key.to_string(),
            key: key.to_string(),
            name: format!("{} {}", site, video_type),
            site: site.to_string(),
            video_type: video_type.to_string(),
        }
    }

    #[test]
    fn test_youtube_trailers_filter() {
        let videos = vec![
            video("teaser", "YouTube", "Teaser"),
            video("main", "YouTube", "Trailer"),
            video("vimeo", "Vimeo", "Trailer"),
            video("second", "YouTube", "Trailer"),
        ];

        let keys: Vec<_> = youtube_trailers(videos)
            .into_iter()
            .map(|v| v.key)
            .collect();
        assert_eq!(keys, vec!["main", "second"]);
    }

    #[tokio::test]
    async fn test_find_trailer_picks_first() {
        let mut provider = MockMovieProvider::new();
        provider.expect_get_movie_videos().returning(|_| {
            Ok(vec![
                video("featurette", "YouTube", "Featurette"),
                video("main", "YouTube", "Trailer"),
            ])
        });

        let trailer = find_trailer(&provider, MovieId(27205)).await;
        assert_eq!(trailer.map(|v| v.key), Some("main".to_string()));
    }

    #[tokio::test]
    async fn test_find_trailer_none_available() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_get_movie_videos()
            .returning(|_| Ok(vec![video("clip", "YouTube", "Clip")]));

        assert_eq!(find_trailer(&provider, MovieId(1)).await, None);
    }

    #[tokio::test]
    async fn test_find_trailer_error_yields_none() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_get_movie_videos()
            .returning(|_| Err(AppError::ExternalApi("timeout".to_string())));

        assert_eq!(find_trailer(&provider, MovieId(1)).await, None);
    }
}
