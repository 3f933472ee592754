use serde::{Deserialize, Serialize};

const YOUTUBE_SITE: &str = "YouTube";
const TRAILER_TYPE: &str = "Trailer";

/// A video attached to a movie (trailer, teaser, featurette, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRef {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl VideoRef {
    /// Only YouTube trailers are playable in the embedded viewer
    pub fn is_youtube_trailer(&self) -> bool {
        self.video_type == TRAILER_TYPE && self.site == YOUTUBE_SITE
    }

    pub fn embed_url(&self) -> String {
        format!(
            "https://www.youtube.com/embed/{}?autoplay=1&controls=1&showinfo=0&rel=0",
            self.key
        )
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}
