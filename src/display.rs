//! Terminal tables for song lists.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};

use crate::playlist::PlaylistStats;
use crate::session::Recommendation;
use crate::song::Song;
use crate::stats::Tally;

const NAME_WIDTH: usize = 30;
const ARTIST_WIDTH: usize = 20;

/// Numbered table of `songs`. Long names and artists are cut with `..`.
#[must_use]
pub fn songs_table(songs: &[&Song]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Song Name", "Artist", "Genre", "Mood", "Pop"]);

    for (idx, song) in songs.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(truncate(&song.song_name, NAME_WIDTH)),
            Cell::new(truncate(&song.artist, ARTIST_WIDTH)),
            Cell::new(&song.genre),
            Cell::new(&song.mood),
            Cell::new(song.popularity).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Print a titled song table, or a short notice when there is nothing to show.
pub fn print_songs(title: &str, songs: &[&Song]) {
    if songs.is_empty() {
        println!("\nNo {} to display!", title.to_lowercase());
        return;
    }
    println!("\n{}", title.to_uppercase());
    println!("{}", songs_table(songs));
}

/// Print the statistics view for a playlist.
pub fn print_statistics(stats: &PlaylistStats) {
    let rule = "=".repeat(60);
    println!("\n{rule}");
    println!("PLAYLIST STATISTICS");
    println!("{rule}");
    println!("Total Songs: {}", stats.total);
    println!("Average Popularity: {:.2}/100", stats.average_popularity);
    print_breakdown("Genre Breakdown", &stats.genres);
    print_breakdown("Mood Breakdown", &stats.moods);

    println!("\nTop {} Most Popular Songs:", stats.top_songs.len());
    for (idx, song) in stats.top_songs.iter().enumerate() {
        println!(
            "  {}. {} - {} ({}/100)",
            idx + 1,
            song.song_name,
            song.artist,
            song.popularity
        );
    }
    println!("{rule}\n");
}

fn print_breakdown(title: &str, tally: &Tally) {
    println!("\n{title}:");
    for (label, count) in tally.entries() {
        println!("  {label}: {count} songs ({:.1}%)", tally.percentage(*count));
    }
}

/// Print a recommendation: the song table, the report and where it was saved.
pub fn print_recommendation(recommendation: &Recommendation) {
    println!(
        "\nRecommendation generated in {:.4} seconds",
        recommendation.elapsed.as_secs_f64()
    );
    if recommendation.songs.is_empty() {
        println!("No songs found matching your criteria. Try different filters!");
        return;
    }

    println!("Found {} songs matching your criteria!", recommendation.songs.len());
    let songs: Vec<&Song> = recommendation.songs.iter().collect();
    print_songs("Recommended Songs", &songs);
    println!("{}", recommendation.report.render());
    if let Some(path) = &recommendation.report_path {
        println!("\nReport saved to {}", path.display());
    }
}

/// Keep `text` under `width` characters, ending in `..` when shortened.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(2)).collect();
    format!("{kept}..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 30), "Short");
        let long = "A".repeat(31);
        let cut = truncate(&long, 30);
        assert_eq!(cut.chars().count(), 30);
        assert!(cut.ends_with(".."));
        assert_eq!(truncate(&"B".repeat(30), 30), "B".repeat(30));
    }

    #[test]
    fn test_table_rows() {
        let songs = [
            Song::new("Bohemian Rhapsody", "Queen", "Rock", "Energetic", 96).unwrap(),
            Song::new("Clair de Lune", "Claude Debussy", "Classical", "Calm", 71).unwrap(),
        ];
        let refs: Vec<&Song> = songs.iter().collect();
        let rendered = songs_table(&refs).to_string();
        assert!(rendered.contains("Song Name"));
        assert!(rendered.contains("Bohemian Rhapsody"));
        assert!(rendered.contains("Claude Debussy"));
        assert!(rendered.contains("96"));
    }
}
