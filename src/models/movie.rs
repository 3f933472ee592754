use serde::{Deserialize, Serialize};

use super::{rating_label, release_year, MovieId, MovieSummary};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Full record for the movie detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: String,
    pub release_date: String,
    pub vote_average: f64,
    pub runtime: Option<u32>,
    pub genres: Vec<Genre>,
    pub tagline: Option<String>,
}

impl MovieDetails {
    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.release_date)
    }

    pub fn rating_label(&self) -> String {
        rating_label(self.vote_average)
    }

    /// Runtime as displayed on the detail page, e.g. `148 min`
    pub fn runtime_label(&self) -> Option<String> {
        self.runtime
            .filter(|minutes| *minutes > 0)
            .map(|minutes| format!("{} min", minutes))
    }

    pub fn primary_genre(&self) -> &str {
        self.genres.first().map(|g| g.name.as_str()).unwrap_or("N/A")
    }
}

impl From<&MovieDetails> for MovieSummary {
    fn from(details: &MovieDetails) -> Self {
        MovieSummary {
            id: details.id,
            title: details.title.clone(),
            poster_path: details.poster_path.clone(),
            backdrop_path: details.backdrop_path.clone(),
            overview: details.overview.clone(),
            release_date: details.release_date.clone(),
            vote_average: details.vote_average,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    pub cast: Vec<CastMember>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> MovieDetails {
        MovieDetails {
            id: MovieId(27205),
            title: "Inception".to_string(),
            poster_path: Some("/inception.jpg".to_string()),
            backdrop_path: None,
            overview: "A thief who steals corporate secrets".to_string(),
            release_date: "2010-07-15".to_string(),
            vote_average: 8.369,
            runtime: Some(148),
            genres: vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                },
            ],
            tagline: Some("Your mind is the scene of the crime.".to_string()),
        }
    }

    #[test]
    fn test_labels() {
        let movie = inception();
        assert_eq!(movie.runtime_label(), Some("148 min".to_string()));
        assert_eq!(movie.rating_label(), "8.4/10");
        assert_eq!(movie.primary_genre(), "Action");
        assert_eq!(movie.release_year(), Some(2010));
    }

    #[test]
    fn test_primary_genre_fallback() {
        let movie = MovieDetails {
            genres: vec![],
            runtime: Some(0),
            ..inception()
        };
        assert_eq!(movie.primary_genre(), "N/A");
        assert_eq!(movie.runtime_label(), None);
    }

    #[test]
    fn test_details_to_summary() {
        let summary = MovieSummary::from(&inception());
        assert_eq!(summary.id, MovieId(27205));
        assert_eq!(summary.title, "Inception");
        assert_eq!(summary.poster_path, Some("/inception.jpg".to_string()));
        assert_eq!(summary.vote_average, 8.369);
    }
}
