//! Song filtering and recommendation.
//!
//! Everything here is a pure function over a slice of [`Song`]s. Results
//! borrow from the catalog; callers clone what they keep.

use log::debug;
use std::fmt;

use crate::history::UserHistory;
use crate::song::Song;

/// How many songs a recommendation returns unless told otherwise.
pub const DEFAULT_COUNT: usize = 10;

/// Size of the candidate pool built from listening history.
pub const HISTORY_POOL_SIZE: usize = 20;

/// Default cut-off for [`filter_by_popularity_threshold`].
pub const DEFAULT_POPULARITY_THRESHOLD: u8 = 80;

/// What a recommendation is based on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    Mood(String),
    Genre(String),
    GenreAndMood { genre: String, mood: String },
    /// No explicit filter: use the user's listening history.
    History,
}

impl Criteria {
    /// Pick the criteria matching whichever filters were supplied.
    #[must_use]
    pub fn from_options(genre: Option<String>, mood: Option<String>) -> Self {
        match (genre, mood) {
            (Some(genre), Some(mood)) => Self::GenreAndMood { genre, mood },
            (Some(genre), None) => Self::Genre(genre),
            (None, Some(mood)) => Self::Mood(mood),
            (None, None) => Self::History,
        }
    }

    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        match self {
            Self::Genre(genre) | Self::GenreAndMood { genre, .. } => Some(genre.as_str()),
            Self::Mood(_) | Self::History => None,
        }
    }

    #[must_use]
    pub fn mood(&self) -> Option<&str> {
        match self {
            Self::Mood(mood) | Self::GenreAndMood { mood, .. } => Some(mood.as_str()),
            Self::Genre(_) | Self::History => None,
        }
    }

    /// `"Genre: Rock, Mood: Any"` style summary used in reports.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "Genre: {}, Mood: {}",
            self.genre().unwrap_or("Any"),
            self.mood().unwrap_or("Any")
        )
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[must_use]
pub fn filter_by_genre<'a>(songs: &'a [Song], genre: &str) -> Vec<&'a Song> {
    songs.iter().filter(|s| s.matches_genre(genre)).collect()
}

#[must_use]
pub fn filter_by_mood<'a>(songs: &'a [Song], mood: &str) -> Vec<&'a Song> {
    songs.iter().filter(|s| s.matches_mood(mood)).collect()
}

#[must_use]
pub fn filter_by_genre_and_mood<'a>(songs: &'a [Song], genre: &str, mood: &str) -> Vec<&'a Song> {
    songs
        .iter()
        .filter(|s| s.matches_genre(genre) && s.matches_mood(mood))
        .collect()
}

/// Songs with popularity at or above `min_popularity`.
#[must_use]
pub fn filter_by_popularity_threshold(songs: &[Song], min_popularity: u8) -> Vec<&Song> {
    songs.iter().filter(|s| s.popularity >= min_popularity).collect()
}

/// Most popular first. Equal popularity keeps the incoming order.
#[must_use]
pub fn sort_by_popularity(mut songs: Vec<&Song>) -> Vec<&Song> {
    songs.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    songs
}

/// The `n` most popular songs.
#[must_use]
pub fn top_songs(songs: &[Song], n: usize) -> Vec<&Song> {
    let mut sorted = sort_by_popularity(songs.iter().collect());
    sorted.truncate(n);
    sorted
}

/// Songs whose name or artist contains `keyword`, ignoring case.
#[must_use]
pub fn search<'a>(songs: &'a [Song], keyword: &str) -> Vec<&'a Song> {
    songs.iter().filter(|s| s.matches_keyword(keyword)).collect()
}

/// Filter by `criteria`, sort by popularity and keep the first `count`.
#[must_use]
pub fn recommend<'a>(
    catalog: &'a [Song],
    criteria: &Criteria,
    history: &UserHistory<'_>,
    count: usize,
) -> Vec<&'a Song> {
    let candidates = match criteria {
        Criteria::GenreAndMood { genre, mood } => filter_by_genre_and_mood(catalog, genre, mood),
        Criteria::Genre(genre) => filter_by_genre(catalog, genre),
        Criteria::Mood(mood) => filter_by_mood(catalog, mood),
        Criteria::History => recommend_from_history(catalog, history),
    };
    debug!("{} candidates for {criteria}", candidates.len());

    let mut recommended = sort_by_popularity(candidates);
    recommended.truncate(count);
    recommended
}

/// Recommend from the user's favourite genre and mood, skipping songs
/// already listened to.
///
/// Without any history this falls back to the most popular songs. The pool
/// is filled from genre+mood matches first, then genre, then mood, up to
/// [`HISTORY_POOL_SIZE`]. An empty pool means the whole catalog.
#[must_use]
pub fn recommend_from_history<'a>(catalog: &'a [Song], history: &UserHistory<'_>) -> Vec<&'a Song> {
    if history.is_empty() {
        return top_songs(catalog, HISTORY_POOL_SIZE);
    }

    let top_genre = history.favorite_genre();
    let top_mood = history.favorite_mood();
    let listened = history.listened_names();
    debug!("History favourites: genre={top_genre:?} mood={top_mood:?}");

    let unheard = |song: &&Song| !listened.contains(song.song_name.as_str());
    let mut pool: Vec<&Song> = Vec::new();

    if let (Some(genre), Some(mood)) = (&top_genre, &top_mood) {
        pool.extend(filter_by_genre_and_mood(catalog, genre, mood).into_iter().filter(unheard));
    }

    if let Some(genre) = top_genre.as_deref().filter(|_| pool.len() < HISTORY_POOL_SIZE) {
        let extra: Vec<&Song> = filter_by_genre(catalog, genre)
            .into_iter()
            .filter(|s| unheard(s) && !pool.contains(s))
            .collect();
        pool.extend(extra);
    }

    if let Some(mood) = top_mood.as_deref().filter(|_| pool.len() < HISTORY_POOL_SIZE) {
        let extra: Vec<&Song> = filter_by_mood(catalog, mood)
            .into_iter()
            .filter(|s| unheard(s) && !pool.contains(s))
            .collect();
        pool.extend(extra);
    }

    if pool.is_empty() {
        catalog.iter().collect()
    } else {
        pool
    }
}
