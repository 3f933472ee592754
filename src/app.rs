//! Line-oriented terminal front end.
//!
//! Owns the search session, the favorites store and the upcoming feed, all
//! handed in by `main`. Plain input lines are treated as the search box
//! contents; lines starting with `:` are commands.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieSummary},
    services::{
        feed::{load_trending, spotlight},
        images::{ImageSize, ImageUrls},
        movie_detail::{load_movie_detail, MovieDetailView},
        providers::MovieProvider,
        search::{SearchPhase, SearchState},
        trailer::find_trailer,
        FavoritesStore, SearchSession, UpcomingFeed,
    },
};

pub const HELP: &str = "\
Type to search movies. Commands:
  :more          load the next page of search results
  :retry         run the current search again
  :fav <n>       toggle favorite for row n of the last list
  :favs          show favorites
  :trending      show movies trending this week
  :upcoming      show new releases (repeat to load more)
  :movie <id>    show movie details
  :trailer <id>  show the trailer link for a movie
  :clear         clear the search
  :help          show this help
  :quit          exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// New contents of the search box
    Search(String),
    More,
    Retry,
    ToggleFavorite(usize),
    Favorites,
    Trending,
    Upcoming,
    Movie(MovieId),
    Trailer(MovieId),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Command::Search(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match name {
            "more" => Ok(Command::More),
            "retry" => Ok(Command::Retry),
            "fav" => Ok(Command::ToggleFavorite(parse_arg(name, arg)?)),
            "favs" => Ok(Command::Favorites),
            "trending" => Ok(Command::Trending),
            "upcoming" => Ok(Command::Upcoming),
            "movie" => Ok(Command::Movie(MovieId(parse_arg(name, arg)?))),
            "trailer" => Ok(Command::Trailer(MovieId(parse_arg(name, arg)?))),
            "clear" => Ok(Command::Search(String::new())),
            "help" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(AppError::InvalidInput(format!(
                "Unknown command :{} (try :help)",
                other
            ))),
        }
    }
}

fn parse_arg<T: FromStr>(name: &str, arg: Option<&str>) -> AppResult<T> {
    arg.and_then(|a| a.parse().ok()).ok_or_else(|| {
        AppError::InvalidInput(format!(":{} needs a numeric argument", name))
    })
}

/// Outcome of handling one command
#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue(Vec<String>),
    Quit,
}

pub struct App {
    provider: Arc<dyn MovieProvider>,
    images: ImageUrls,
    search: SearchSession,
    favorites: FavoritesStore,
    upcoming: UpcomingFeed,
    /// Rows of the last rendered list, addressed by `:fav <n>`
    listed: Vec<MovieSummary>,
}

impl App {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        favorites: FavoritesStore,
        images: ImageUrls,
        debounce: Duration,
    ) -> Self {
        Self {
            search: SearchSession::new(provider.clone(), debounce),
            upcoming: UpcomingFeed::new(provider.clone()),
            provider,
            images,
            favorites,
            listed: Vec::new(),
        }
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Reads commands from `input` until EOF or `:quit`, printing search
    /// results and favorite notifications as they arrive.
    pub async fn run<R>(mut self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut search_updates = self.search.subscribe();
        let mut favorite_events = self.favorites.subscribe();

        println!("{}", HELP);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let output = match line.parse::<Command>() {
                        Ok(command) => self.handle(command).await,
                        Err(e) => Flow::Continue(vec![e.to_string()]),
                    };
                    match output {
                        Flow::Continue(output) => print_lines(&output),
                        Flow::Quit => break,
                    }
                }
                Ok(()) = search_updates.changed() => {
                    let state = search_updates.borrow_and_update().clone();
                    let output = self.render_search(&state);
                    print_lines(&output);
                }
                Ok(event) = favorite_events.recv() => {
                    println!("♥ {}", event);
                }
            }
        }

        tracing::info!(favorites = self.favorites.len(), "Session ended");
        Ok(())
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        let output = match command {
            Command::Search(query) => {
                self.search.set_query(query);
                Vec::new()
            }
            Command::More => {
                if self.search.load_next_page() {
                    Vec::new()
                } else {
                    vec!["Nothing more to load.".to_string()]
                }
            }
            Command::Retry => {
                if self.search.retry() {
                    Vec::new()
                } else {
                    vec!["Nothing to retry.".to_string()]
                }
            }
            Command::ToggleFavorite(row) => self.toggle_favorite(row),
            Command::Favorites => {
                let favorites = self.favorites.favorites().to_vec();
                if favorites.is_empty() {
                    self.listed.clear();
                    vec!["You don't have a favorite movie yet".to_string()]
                } else {
                    self.render_list("Favorites", favorites)
                }
            }
            Command::Trending => self.show_trending().await,
            Command::Upcoming => self.show_upcoming().await,
            Command::Movie(id) => self.show_movie(id).await,
            Command::Trailer(id) => match find_trailer(self.provider.as_ref(), id).await {
                Some(trailer) => vec![
                    format!("{}: {}", trailer.name, trailer.watch_url()),
                    format!("Embed: {}", trailer.embed_url()),
                ],
                None => vec!["Trailer not available".to_string()],
            },
            Command::Help => vec![HELP.to_string()],
            Command::Quit => return Flow::Quit,
        };
        Flow::Continue(output)
    }

    fn toggle_favorite(&mut self, row: usize) -> Vec<String> {
        let Some(movie) = row.checked_sub(1).and_then(|i| self.listed.get(i)).cloned() else {
            return vec![format!("No row {} in the last list.", row)];
        };

        match self.favorites.toggle(movie) {
            // The notification itself arrives through the event subscription
            Ok(_) => Vec::new(),
            Err(e) => vec![format!("Could not update favorites: {}", e)],
        }
    }

    async fn show_trending(&mut self) -> Vec<String> {
        let trending = load_trending(self.provider.as_ref()).await;
        let mut output = Vec::new();

        if let Some(hero) = spotlight(&trending) {
            output.push(format!("Spotlight: {}", hero.title));
            if !hero.overview.is_empty() {
                output.push(format!("  {}", hero.overview));
            }
            if let Some(url) = self
                .images
                .url(hero.backdrop_path.as_deref(), ImageSize::W1280)
            {
                output.push(format!("  {}", url));
            }
        }

        output.extend(self.render_list("Trending Now", trending));
        output
    }

    async fn show_upcoming(&mut self) -> Vec<String> {
        let mut output = Vec::new();
        if !self.upcoming.load_next_page().await {
            if let Some(error) = self.upcoming.last_error() {
                output.push(format!("Could not load new releases: {}", error));
            }
        }

        output.extend(self.render_list("New Release", self.upcoming.movies().to_vec()));
        if self.upcoming.has_more() {
            output.push("-- :upcoming to load more --".to_string());
        }
        output
    }

    async fn show_movie(&mut self, id: MovieId) -> Vec<String> {
        match load_movie_detail(self.provider.as_ref(), id).await {
            Ok(view) => {
                let output = render_detail(&view, &self.images, &self.favorites);
                self.listed = vec![MovieSummary::from(&view.details)];
                output
            }
            Err(AppError::NotFound(_)) => vec!["Movie not found".to_string()],
            Err(e) if e.is_network() => vec![format!(
                "Could not reach the movie service, try :movie {} again ({})",
                id, e
            )],
            Err(e) => vec![format!("Could not load movie {}: {}", id, e)],
        }
    }

    /// Lines for the current search state. Nothing is shown while the query
    /// is still being typed.
    pub fn render_search(&mut self, state: &SearchState) -> Vec<String> {
        if state.query.trim().is_empty() {
            self.listed.clear();
            return Vec::new();
        }

        match state.phase {
            SearchPhase::Debouncing => Vec::new(),
            SearchPhase::Fetching { page: 1 } => vec!["Searching...".to_string()],
            SearchPhase::Fetching { .. } => vec!["Loading more...".to_string()],
            SearchPhase::Idle if state.results.is_empty() => {
                self.listed.clear();
                vec!["No results found.".to_string()]
            }
            SearchPhase::Idle => {
                let title = format!("Results for \"{}\"", state.query);
                let mut output = self.render_list(&title, state.results.clone());
                if state.has_more {
                    output.push("-- :more for more results --".to_string());
                }
                output
            }
        }
    }

    fn render_list(&mut self, title: &str, movies: Vec<MovieSummary>) -> Vec<String> {
        let mut output = vec![format!("== {} ==", title)];
        output.extend(
            movies
                .iter()
                .enumerate()
                .map(|(i, movie)| render_row(i + 1, movie, self.favorites.is_favorite(movie.id))),
        );
        self.listed = movies;
        output
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// One list row, e.g. `  3. Dune (2021)  7.8/10  [id 438631] ♥`
pub fn render_row(index: usize, movie: &MovieSummary, favorite: bool) -> String {
    let year = movie
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let heart = if favorite { " ♥" } else { "" };
    format!(
        "{:>3}. {}{}  {}  [id {}]{}",
        index,
        movie.title,
        year,
        movie.rating_label(),
        movie.id,
        heart
    )
}

fn render_detail(
    view: &MovieDetailView,
    images: &ImageUrls,
    favorites: &FavoritesStore,
) -> Vec<String> {
    let details = &view.details;
    let year = details
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();

    let mut output = vec![format!("== {}{} ==", details.title, year)];
    if let Some(tagline) = &details.tagline {
        output.push(format!("\"{}\"", tagline));
    }

    let mut facts = vec![details.rating_label(), details.primary_genre().to_string()];
    if let Some(runtime) = details.runtime_label() {
        facts.push(runtime);
    }
    output.push(facts.join(" | "));

    if !details.overview.is_empty() {
        output.push(details.overview.clone());
    }
    if let Some(url) = images.url(details.poster_path.as_deref(), ImageSize::W500) {
        output.push(format!("Poster: {}", url));
    }

    if !view.top_cast.is_empty() {
        output.push("Cast:".to_string());
        output.extend(view.top_cast.iter().map(|member| {
            if member.character.is_empty() {
                format!("  {}", member.name)
            } else {
                format!("  {} as {}", member.name, member.character)
            }
        }));
    }

    if let Some(trailer) = view.trailers.first() {
        output.push(format!("Trailer: {}", trailer.watch_url()));
    }

    let favorite = if favorites.is_favorite(details.id) {
        "♥ In your favorites (:fav 1 to remove)"
    } else {
        "(:fav 1 to add to favorites)"
    };
    output.push(favorite.to_string());
    output
}
