//! # Song Module
//!
//! The song record shared by the catalog, playlists and reports, plus the
//! helpers that turn free-form user input into mood and genre labels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest popularity a song can carry.
pub const MAX_POPULARITY: u8 = 100;

/// Moods offered as numbered menu choices. Custom moods are still accepted.
pub const KNOWN_MOODS: [&str; 5] = ["Happy", "Sad", "Energetic", "Calm", "Romantic"];

/// Genres offered as numbered menu choices. Custom genres are still accepted.
pub const KNOWN_GENRES: [&str; 6] = ["Pop", "Rock", "Hip-Hop", "Electronic", "Jazz", "Classical"];

/// Reasons a catalog row cannot become a [`Song`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SongError {
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),
    #[error("invalid popularity value: {0}")]
    InvalidPopularity(String),
    #[error("popularity {0} is outside 0..=100")]
    PopularityOutOfRange(i64),
}

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    pub song_name: String,
    pub artist: String,
    pub genre: String,
    pub mood: String,
    /// Popularity score in `0..=100`.
    pub popularity: u8,
}

impl Song {
    /// Build a song, rejecting blank text fields and popularity outside `0..=100`.
    ///
    /// Text fields are trimmed before they are stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodmix::song::Song;
    ///
    /// let song = Song::new("Levitating", "Dua Lipa", "Pop", "Happy", 92)?;
    /// assert_eq!(song.popularity, 92);
    /// assert!(Song::new("", "Dua Lipa", "Pop", "Happy", 92).is_err());
    /// # Ok::<(), moodmix::song::SongError>(())
    /// ```
    pub fn new(
        song_name: &str,
        artist: &str,
        genre: &str,
        mood: &str,
        popularity: i64,
    ) -> Result<Self, SongError> {
        let popularity = u8::try_from(popularity)
            .ok()
            .filter(|p| *p <= MAX_POPULARITY)
            .ok_or(SongError::PopularityOutOfRange(popularity))?;

        Ok(Self {
            song_name: required("song_name", song_name)?,
            artist: required("artist", artist)?,
            genre: required("genre", genre)?,
            mood: required("mood", mood)?,
            popularity,
        })
    }

    /// Case-insensitive genre comparison.
    #[must_use]
    pub fn matches_genre(&self, genre: &str) -> bool {
        self.genre.to_lowercase() == genre.to_lowercase()
    }

    /// Case-insensitive mood comparison.
    #[must_use]
    pub fn matches_mood(&self, mood: &str) -> bool {
        self.mood.to_lowercase() == mood.to_lowercase()
    }

    /// True when `keyword` occurs in the song name or the artist, ignoring case.
    #[must_use]
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.song_name.to_lowercase().contains(&keyword)
            || self.artist.to_lowercase().contains(&keyword)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, SongError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SongError::MissingField(field));
    }
    Ok(value.to_string())
}

/// Parse a popularity cell. Whitespace around the number is ignored.
pub fn parse_popularity(raw: &str) -> Result<i64, SongError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SongError::InvalidPopularity(raw.to_string()))
}

/// Normalize a typed mood: letters only, first letter upper-cased, rest lower.
///
/// Returns `None` for anything that isn't purely alphabetic.
#[must_use]
pub fn normalize_mood(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(char::is_alphabetic) {
        return None;
    }
    let mut chars = input.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect())
}

/// Normalize a typed genre: letters and hyphens, each word title-cased.
///
/// `"hip-hop"` becomes `"Hip-Hop"`.
#[must_use]
pub fn normalize_genre(input: &str) -> Option<String> {
    let input = input.trim();
    let letters: String = input.chars().filter(|c| *c != '-').collect();
    if letters.is_empty() || !letters.chars().all(char::is_alphabetic) {
        return None;
    }

    let mut out = String::with_capacity(input.len());
    let mut word_start = true;
    for c in input.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song() -> Song {
        Song::new("Blinding Lights", "The Weeknd", "Pop", "Energetic", 95).unwrap()
    }

    #[test]
    fn test_new_trims_fields() {
        let song = Song::new("  Clair de Lune ", "Debussy", " Classical", "Calm ", 70).unwrap();
        assert_eq!(song.song_name, "Clair de Lune");
        assert_eq!(song.genre, "Classical");
        assert_eq!(song.mood, "Calm");
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        assert_eq!(
            Song::new("Song", "   ", "Pop", "Happy", 50),
            Err(SongError::MissingField("artist"))
        );
        assert_eq!(
            Song::new("Song", "Artist", "Pop", "", 50),
            Err(SongError::MissingField("mood"))
        );
    }

    #[test]
    fn test_popularity_bounds() {
        assert!(Song::new("a", "b", "c", "d", 0).is_ok());
        assert!(Song::new("a", "b", "c", "d", 100).is_ok());
        assert_eq!(
            Song::new("a", "b", "c", "d", 101),
            Err(SongError::PopularityOutOfRange(101))
        );
        assert_eq!(
            Song::new("a", "b", "c", "d", -1),
            Err(SongError::PopularityOutOfRange(-1))
        );
    }

    #[test]
    fn test_parse_popularity() {
        assert_eq!(parse_popularity(" 87 "), Ok(87));
        assert_eq!(
            parse_popularity("high"),
            Err(SongError::InvalidPopularity("high".to_string()))
        );
    }

    #[test]
    fn test_matching_ignores_case() {
        let song = song();
        assert!(song.matches_genre("pop"));
        assert!(song.matches_mood("ENERGETIC"));
        assert!(!song.matches_mood("Calm"));
        assert!(song.matches_keyword("weeknd"));
        assert!(song.matches_keyword("LIGHTS"));
        assert!(!song.matches_keyword("drake"));
    }

    #[test]
    fn test_normalize_mood() {
        assert_eq!(normalize_mood("calm"), Some("Calm".to_string()));
        assert_eq!(normalize_mood("sAD"), Some("Sad".to_string()));
        assert_eq!(normalize_mood("very calm"), None);
        assert_eq!(normalize_mood("3"), None);
        assert_eq!(normalize_mood(""), None);
    }

    #[test]
    fn test_normalize_genre() {
        assert_eq!(normalize_genre("hip-hop"), Some("Hip-Hop".to_string()));
        assert_eq!(normalize_genre("JAZZ"), Some("Jazz".to_string()));
        assert_eq!(normalize_genre("-"), None);
        assert_eq!(normalize_genre("r&b"), None);
    }
}
