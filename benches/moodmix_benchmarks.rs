//! # moodmix Performance Benchmarks
//!
//! Benchmarks for the catalog and recommendation paths.
//!
//! ## Benchmark Categories
//!
//! - **Catalog Loading**: CSV parsing and validation
//! - **Filtering**: Genre, mood and combined filters with ranking
//! - **History Recommendations**: Favourite detection and pool building
//! - **Statistics**: Tallies over playlists
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench filtering
//! ```

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::fmt::Write as _;
use std::hint::black_box;
use tempfile::TempDir;

use moodmix::catalog::Catalog;
use moodmix::history::History;
use moodmix::playlist::PlaylistStats;
use moodmix::recommend;
use moodmix::song::{Song, KNOWN_GENRES, KNOWN_MOODS};

/// Deterministic catalog cycling through every known genre and mood.
fn create_test_songs(count: usize) -> Vec<Song> {
    (0..count)
        .map(|i| {
            Song::new(
                &format!("Song {i}"),
                &format!("Artist {}", i % 97),
                KNOWN_GENRES[i % KNOWN_GENRES.len()],
                KNOWN_MOODS[(i / 3) % KNOWN_MOODS.len()],
                ((i * 37) % 101) as i64,
            )
            .expect("generated songs are valid")
        })
        .collect()
}

fn catalog_csv(songs: &[Song]) -> String {
    let mut csv = String::from("song_name,artist,genre,mood,popularity\n");
    for song in songs {
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            song.song_name, song.artist, song.genre, song.mood, song.popularity
        );
    }
    csv
}

fn benchmark_catalog_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_loading");

    for size in [100, 1000, 10000].iter() {
        let csv = catalog_csv(&create_test_songs(*size));
        group.bench_with_input(BenchmarkId::new("from_reader", size), &csv, |b, csv| {
            b.iter(|| Catalog::from_reader(black_box(csv.as_bytes())).expect("catalog parses"))
        });
    }

    group.finish();
}

fn benchmark_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtering");
    let songs = create_test_songs(10000);

    group.bench_function("genre", |b| {
        b.iter(|| recommend::filter_by_genre(black_box(&songs), black_box("rock")))
    });

    group.bench_function("genre_and_mood_ranked", |b| {
        b.iter(|| {
            let matches = recommend::filter_by_genre_and_mood(black_box(&songs), "Pop", "Happy");
            recommend::sort_by_popularity(matches)
        })
    });

    group.bench_function("popularity_threshold", |b| {
        b.iter(|| {
            recommend::filter_by_popularity_threshold(
                black_box(&songs),
                recommend::DEFAULT_POPULARITY_THRESHOLD,
            )
        })
    });

    group.bench_function("keyword_search", |b| {
        b.iter(|| recommend::search(black_box(&songs), black_box("artist 42")))
    });

    for size in [100, 1000, 10000].iter() {
        let songs = create_test_songs(*size);
        group.bench_with_input(BenchmarkId::new("top_songs", size), &songs, |b, songs| {
            b.iter(|| recommend::top_songs(black_box(songs), 10))
        });
    }

    group.finish();
}

fn benchmark_history_recommendations(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_recommendations");
    let songs = create_test_songs(5000);
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut history = History::load(&temp_dir.path().join("history.csv")).expect("history loads");
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid timestamp");

    for song in songs.iter().step_by(50) {
        history.append("bench", song, at).expect("history appends");
    }

    group.bench_function("smart_recommendation", |b| {
        b.iter(|| {
            let user = history.for_user(black_box("bench"));
            recommend::recommend_from_history(black_box(&songs), &user)
                .into_iter()
                .take(recommend::DEFAULT_COUNT)
                .count()
        })
    });

    group.bench_function("favorites", |b| {
        b.iter(|| {
            let user = history.for_user(black_box("bench"));
            (user.favorite_genre(), user.favorite_mood())
        })
    });

    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");
    let songs = create_test_songs(1000);

    group.bench_function("playlist_stats_1000", |b| {
        b.iter_batched(
            || songs.clone(),
            |songs| PlaylistStats::from_songs(black_box(&songs)),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// Group all benchmarks
criterion_group!(
    benches,
    benchmark_catalog_loading,
    benchmark_filtering,
    benchmark_history_recommendations,
    benchmark_statistics
);

criterion_main!(benches);
