use std::fmt::Display;

/// Image widths offered by the TMDB CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    W92,
    W185,
    #[default]
    W500,
    W1280,
    Original,
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = match self {
            ImageSize::W92 => "w92",
            ImageSize::W185 => "w185",
            ImageSize::W500 => "w500",
            ImageSize::W1280 => "w1280",
            ImageSize::Original => "original",
        };
        write!(f, "{}", size)
    }
}

/// Formats poster, backdrop and profile paths into CDN URLs
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `None` when the movie has no image; callers show a placeholder
    pub fn url(&self, path: Option<&str>, size: ImageSize) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        let separator = if path.starts_with('/') { "" } else { "/" };
        Some(format!("{}/{}{}{}", self.base_url, size, separator, path))
    }
}
