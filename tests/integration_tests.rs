//! # Integration Tests for moodmix
//!
//! End-to-end tests that drive the `moodmix` binary against a temporary
//! catalog and data directory, plus library-level workflows across modules.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const CATALOG: &str = "\
song_name,artist,genre,mood,popularity
Happy,Pharrell Williams,Pop,Happy,87
Levitating,Dua Lipa,Pop,Happy,92
Someone Like You,Adele,Pop,Sad,88
Bohemian Rhapsody,Queen,Rock,Energetic,96
Africa,Toto,Rock,Happy,85
Take Five,Dave Brubeck,Jazz,Calm,70
Clair de Lune,Claude Debussy,Classical,Calm,68
Broken Row,Nobody,Pop,Happy,abc
";

/// Test helper creating a catalog file and an empty data directory
fn create_test_workspace() -> Result<(TempDir, PathBuf, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let catalog = temp_dir.path().join("songs.csv");
    fs::write(&catalog, CATALOG)?;
    let data_dir = temp_dir.path().join("data");
    Ok((temp_dir, catalog, data_dir))
}

fn moodmix(catalog: &Path, data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_moodmix"))
        .arg("--catalog")
        .arg(catalog)
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("MOODMIX_USER")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run moodmix")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_cli_help_displays_correctly() {
        let output = Command::new(env!("CARGO_BIN_EXE_moodmix"))
            .arg("--help")
            .output()
            .expect("Failed to run help command");

        let stdout = stdout(&output);
        assert!(output.status.success());
        assert!(stdout.contains("moodmix"));
        assert!(stdout.contains("recommend"));
        assert!(stdout.contains("track"));
        assert!(stdout.contains("chart"));
        assert!(!stdout.contains("complete-songs"));
    }

    #[test]
    fn test_completion_generation() {
        let output = Command::new(env!("CARGO_BIN_EXE_moodmix"))
            .args(["completion", "bash"])
            .output()
            .expect("Failed to run completion command");

        assert!(output.status.success());
        let stdout = stdout(&output);
        assert!(stdout.contains("_moodmix"));
        assert!(stdout.contains("complete"));
    }

    #[test]
    fn test_complete_songs_lists_catalog() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let output = moodmix(&catalog, &data_dir, &["complete-songs"]);

        assert!(output.status.success());
        let stdout = stdout(&output);
        assert!(stdout.contains("\"Take Five\""));
        assert!(stdout.lines().any(|l| l == "Levitating"));
        assert!(!data_dir.exists());
        Ok(())
    }

    #[test]
    fn test_top_orders_by_popularity() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let output = moodmix(&catalog, &data_dir, &["top", "-n", "2"]);

        assert!(output.status.success());
        let stdout = stdout(&output);
        let queen = stdout.find("Bohemian Rhapsody").expect("top song listed");
        let dua = stdout.find("Levitating").expect("second song listed");
        assert!(queen < dua);
        assert!(!stdout.contains("Take Five"));
        Ok(())
    }

    #[test]
    fn test_search_matches_artist() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;

        let output = moodmix(&catalog, &data_dir, &["search", "dua"]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("Levitating"));

        let output = moodmix(&catalog, &data_dir, &["search", "nothing-like-this"]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("No songs found matching"));
        Ok(())
    }

    #[test]
    fn test_recommend_saves_playlist_and_report() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let output = moodmix(
            &catalog,
            &data_dir,
            &["--user", "ana", "recommend", "--mood", "happy", "--genre", "pop", "--save"],
        );

        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        let stdout = stdout(&output);
        assert!(stdout.contains("Found 2 songs matching your criteria!"));
        assert!(stdout.contains("Criteria: Genre: pop, Mood: happy"));

        let playlist = data_dir.join("playlist_ana_happy.csv");
        let saved = fs::read_to_string(&playlist)?;
        assert!(saved.starts_with("username,song_name,artist,genre,mood,popularity"));
        assert!(saved.contains("ana,Levitating,Dua Lipa,Pop,Happy,92"));

        let reports = fs::read_dir(&data_dir)?
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("recommendation_report_ana_"))
            .count();
        assert_eq!(reports, 1);
        Ok(())
    }

    #[test]
    fn test_recommend_without_user_fails() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let output = moodmix(&catalog, &data_dir, &["recommend", "--mood", "happy"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("--user"));
        Ok(())
    }

    #[test]
    fn test_blank_user_is_rejected() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let output = moodmix(&catalog, &data_dir, &["--user", "   ", "track", "Africa"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("needs a user"));
        assert!(!data_dir.join("playlist_history.csv").exists());
        Ok(())
    }

    #[test]
    fn test_recommend_json_without_report() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let output = moodmix(
            &catalog,
            &data_dir,
            &["--user", "ana", "--no-report", "recommend", "--genre", "jazz", "--json"],
        );

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;
        assert_eq!(json["username"], "ana");
        assert_eq!(json["total"], 1);
        assert_eq!(json["songs"][0]["song_name"], "Take Five");

        let reports = fs::read_dir(&data_dir)?
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("recommendation_report_"))
            .count();
        assert_eq!(reports, 0);
        Ok(())
    }

    #[test]
    fn test_track_then_history() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;

        let output = moodmix(&catalog, &data_dir, &["--user", "ana", "track", "take five"]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        assert!(stdout(&output).contains("'Take Five' added to ana's listening history"));

        let output = moodmix(&catalog, &data_dir, &["--user", "ana", "track", "Not A Song"]);
        assert!(!output.status.success());

        let history = fs::read_to_string(data_dir.join("playlist_history.csv"))?;
        assert!(history.starts_with("username,song_name,timestamp,genre,mood"));
        assert_eq!(history.lines().count(), 2);

        let output = moodmix(&catalog, &data_dir, &["--user", "ana", "history"]);
        let profile = stdout(&output);
        assert!(profile.contains("Favorite Genre: Jazz"));
        assert!(profile.contains("1. Take Five (Jazz)"));

        let output = moodmix(&catalog, &data_dir, &["--user", "bo", "history"]);
        assert!(stdout(&output).contains("No listening history found for this user."));
        Ok(())
    }

    #[test]
    fn test_smart_recommendation_skips_listened() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        moodmix(&catalog, &data_dir, &["--user", "ana", "track", "Levitating"]);

        let output = moodmix(
            &catalog,
            &data_dir,
            &["--user", "ana", "--no-report", "recommend", "--json"],
        );
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;
        let names: Vec<&str> = json["songs"]
            .as_array()
            .expect("songs array")
            .iter()
            .filter_map(|s| s["song_name"].as_str())
            .collect();
        assert_eq!(names, vec!["Someone Like You", "Happy", "Africa"]);
        Ok(())
    }

    #[test]
    fn test_stats_and_chart_for_saved_playlist() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let saved = moodmix(
            &catalog,
            &data_dir,
            &["--user", "ana", "recommend", "--mood", "happy", "--save", "mix"],
        );
        assert!(saved.status.success());
        let playlist = data_dir.join("mix.csv");
        let playlist_arg = playlist.to_string_lossy().into_owned();

        let output = moodmix(&catalog, &data_dir, &["stats", &playlist_arg]);
        assert!(output.status.success());
        let stdout = stdout(&output);
        assert!(stdout.contains("Total Songs: 3"));
        assert!(stdout.contains("Pop: 2 songs (66.7%)"));
        assert!(stdout.contains("Happy: 3 songs (100.0%)"));

        let output = moodmix(&catalog, &data_dir, &["chart", "pie", &playlist_arg]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        assert!(data_dir.join("mood_distribution.svg").exists());
        Ok(())
    }

    #[test]
    fn test_config_prints_resolved_paths() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let output = moodmix(&catalog, &data_dir, &["--no-report", "config"]);

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;
        assert_eq!(json["write_reports"], false);
        assert_eq!(
            PathBuf::from(json["history_path"].as_str().expect("history path")),
            data_dir.join("playlist_history.csv")
        );
        Ok(())
    }

    #[test]
    fn test_missing_catalog_is_an_error() -> Result<()> {
        let (temp, _catalog, data_dir) = create_test_workspace()?;
        let output = moodmix(&temp.path().join("absent.csv"), &data_dir, &["browse"]);
        assert!(!output.status.success());
        Ok(())
    }
}

#[cfg(test)]
mod workflow_tests {
    use super::*;
    use moodmix::catalog::Catalog;
    use moodmix::config::RuntimeConfig;
    use moodmix::playlist::{Playlist, LOADED_MOOD};
    use moodmix::recommend::{self, Criteria};
    use moodmix::session::Session;

    #[test]
    fn test_catalog_skips_invalid_rows() -> Result<()> {
        let (_temp, catalog, _data_dir) = create_test_workspace()?;
        let catalog = Catalog::load(&catalog)?;

        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.skipped().len(), 1);
        assert!(!catalog.contains_song_named("Broken Row"));
        assert_eq!(
            recommend::filter_by_popularity_threshold(catalog.songs(), 88).len(),
            3
        );
        Ok(())
    }

    #[test]
    fn test_session_round_trip_through_saved_playlist() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let config = RuntimeConfig::new(catalog, Some(data_dir))?.without_reports();
        let mut session = Session::start(config, "ana", "Calm")?;

        let result = session.recommend(Criteria::Mood("Calm".into()), 10)?;
        assert_eq!(result.songs.len(), 2);
        assert!(result.report_path.is_none());

        let path = session.save_playlist(None)?;
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("playlist_ana_calm.csv")
        );

        let loaded = Playlist::load(&path)?;
        assert_eq!(loaded.username(), "ana");
        assert_eq!(loaded.mood(), LOADED_MOOD);
        assert_eq!(loaded.songs(), session.playlist().songs());
        Ok(())
    }

    #[test]
    fn test_history_shared_between_users() -> Result<()> {
        let (_temp, catalog, data_dir) = create_test_workspace()?;
        let config = RuntimeConfig::new(catalog, Some(data_dir))?;

        let mut ana = Session::start(config.clone(), "ana", "Happy")?;
        let song = ana.search("africa")[0].clone();
        ana.track(&song)?;

        let bo = Session::start(config, "bo", "Sad")?;
        assert_eq!(bo.history().len(), 1);
        assert!(bo.history().for_user("bo").is_empty());
        assert_eq!(bo.history().for_user("ana").len(), 1);
        Ok(())
    }
}
