//! Recommendation reports, as plain text files or JSON.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::TIMESTAMP_FORMAT;
use crate::song::Song;
use crate::stats::Tally;

const RULE_WIDTH: usize = 60;

/// Snapshot of one recommendation run.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub username: String,
    pub generated_at: String,
    pub criteria: String,
    pub total: usize,
    pub average_popularity: Option<f64>,
    pub genres: Tally,
    pub moods: Tally,
    pub songs: Vec<Song>,
    #[serde(skip)]
    stamp: String,
}

impl RecommendationReport {
    #[must_use]
    pub fn new(
        username: &str,
        criteria: &str,
        songs: &[Song],
        generated_at: NaiveDateTime,
    ) -> Self {
        let average_popularity = if songs.is_empty() {
            None
        } else {
            let sum: u32 = songs.iter().map(|s| u32::from(s.popularity)).sum();
            Some(f64::from(sum) / songs.len() as f64)
        };

        Self {
            username: username.to_string(),
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            criteria: criteria.to_string(),
            total: songs.len(),
            average_popularity,
            genres: Tally::from_labels(songs.iter().map(|s| s.genre.as_str())),
            moods: Tally::from_labels(songs.iter().map(|s| s.mood.as_str())),
            songs: songs.to_vec(),
            stamp: generated_at.format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// The report as it is printed and saved.
    #[must_use]
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "MUSIC RECOMMENDATION REPORT");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "User: {}", self.username);
        let _ = writeln!(out, "Date: {}", self.generated_at);
        let _ = writeln!(out, "Criteria: {}", self.criteria);
        let _ = writeln!(out, "Total Songs Recommended: {}", self.total);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);

        match self.average_popularity {
            Some(average) => {
                let _ = writeln!(out, "STATISTICS:");
                let _ = writeln!(out, "   Average Popularity: {average:.2}/100");
                let _ = writeln!(out, "   Genres: {}", summarize(&self.genres));
                let _ = writeln!(out, "   Moods: {}", summarize(&self.moods));
                let _ = writeln!(out);
                let _ = writeln!(out, "RECOMMENDED SONGS:");
                let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
                for (idx, song) in self.songs.iter().enumerate() {
                    let _ = writeln!(out, "{}. {}", idx + 1, song.song_name);
                    let _ = writeln!(out, "   Artist: {}", song.artist);
                    let _ = writeln!(
                        out,
                        "   Genre: {} | Mood: {} | Popularity: {}/100",
                        song.genre, song.mood, song.popularity
                    );
                    let _ = writeln!(out);
                }
            }
            None => {
                let _ = writeln!(out, "No songs found matching your criteria!");
            }
        }

        let _ = write!(out, "{rule}");
        out
    }

    /// `recommendation_report_<user>_<YYYYmmdd_HHMMSS>.txt`
    #[must_use]
    pub fn file_name(&self) -> String {
        let user: String = self
            .username
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("recommendation_report_{user}_{}.txt", self.stamp)
    }

    /// Write the rendered report into `dir` and return the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.render())
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(path)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

fn summarize(tally: &Tally) -> String {
    let parts: Vec<String> = tally
        .entries()
        .iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 24).unwrap().and_hms_opt(8, 5, 9).unwrap()
    }

    fn songs() -> Vec<Song> {
        vec![
            Song::new("Levitating", "Dua Lipa", "Pop", "Happy", 92).unwrap(),
            Song::new("Happy", "Pharrell Williams", "Pop", "Happy", 87).unwrap(),
        ]
    }

    fn pop_report() -> RecommendationReport {
        RecommendationReport::new("ana", "Genre: Pop, Mood: Any", &songs(), generated_at())
    }

    #[test]
    fn test_render_lists_songs_and_statistics() {
        let report = pop_report();
        let text = report.render();
        assert!(text.contains("User: ana"));
        assert!(text.contains("Date: 2024-12-24 08:05:09"));
        assert!(text.contains("Total Songs Recommended: 2"));
        assert!(text.contains("Average Popularity: 89.50/100"));
        assert!(text.contains("Genres: {Pop: 2}"));
        assert!(text.contains("2. Happy"));
        assert!(text.contains("Genre: Pop | Mood: Happy | Popularity: 92/100"));
    }

    #[test]
    fn test_render_empty_report() {
        let report = RecommendationReport::new("ana", "Genre: Any, Mood: Sad", &[], generated_at());
        let text = report.render();
        assert!(text.contains("No songs found matching your criteria!"));
        assert!(!text.contains("STATISTICS"));
    }

    #[test]
    fn test_save_uses_timestamped_name() {
        let dir = TempDir::new().unwrap();
        let report = pop_report();
        let path = report.save(dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap(),
            "recommendation_report_ana_20241224_080509.txt"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), report.render());
    }

    #[test]
    fn test_json_export() {
        let report = pop_report();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["songs"][0]["song_name"], "Levitating");
        assert!(value.get("stamp").is_none());
    }
}
