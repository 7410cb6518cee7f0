//! # Shell Completion Module
//!
//! This module provides shell completion functionality for moodmix:
//! - Generation of completion scripts for various shells
//! - Song name candidates from the catalog, for `track`
//!
//! ## Usage
//!
//! ```bash
//! # Generate bash completions
//! moodmix completion bash > ~/.local/share/bash-completion/completions/moodmix
//!
//! # Generate zsh completions
//! moodmix completion zsh > ~/.config/zsh/completions/_moodmix
//! ```

use anyhow::Result;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io;
use std::path::Path;

use crate::catalog::Catalog;

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Convert our Shell enum to clap_complete's Shell enum
#[must_use]
pub fn shell_to_completion_shell(shell: &crate::cli::Shell) -> CompletionShell {
    match shell {
        crate::cli::Shell::Bash => CompletionShell::Bash,
        crate::cli::Shell::Zsh => CompletionShell::Zsh,
        crate::cli::Shell::Fish => CompletionShell::Fish,
        crate::cli::Shell::PowerShell => CompletionShell::PowerShell,
        crate::cli::Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Song names from the catalog at `catalog_path`, sorted and de-duplicated.
///
/// A missing or unreadable catalog yields no candidates rather than an error,
/// so completion never prints noise into the shell.
pub fn get_song_completions(catalog_path: &Path) -> Result<Vec<String>> {
    let Ok(catalog) = Catalog::load(catalog_path) else {
        return Ok(Vec::new());
    };

    let mut names: Vec<String> = catalog.songs().iter().map(|s| s.song_name.clone()).collect();
    names.sort();
    names.dedup();
    Ok(names)
}

/// Print song completions one per line, quoting names with whitespace.
pub fn print_song_completions(catalog_path: &Path) -> Result<()> {
    for name in get_song_completions(catalog_path)? {
        println!("{}", quote_for_shell(&name));
    }
    Ok(())
}

fn quote_for_shell(name: &str) -> String {
    if name.contains(char::is_whitespace) || name.contains('"') {
        format!("\"{}\"", name.replace('"', "\\\""))
    } else {
        name.to_string()
    }
}
