//! Frequency tallies for genre and mood breakdowns.

use serde::Serialize;

/// Ordered label counts. Most frequent first; ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    entries: Vec<(String, usize)>,
    total: usize,
}

impl Tally {
    /// Count every label. Labels are compared exactly, case included.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries: Vec<(String, usize)> = Vec::new();
        let mut total = 0;

        for label in labels {
            total += 1;
            match entries.iter_mut().find(|(existing, _)| existing == label) {
                Some((_, count)) => *count += 1,
                None => entries.push((label.to_string(), 1)),
            }
        }

        // Stable sort keeps first occurrence ahead on equal counts.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries, total }
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    /// Number of labels counted, duplicates included.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    #[must_use]
    pub fn most_common(&self) -> Option<&str> {
        self.entries.first().map(|(label, _)| label.as_str())
    }

    #[must_use]
    pub fn max_count(&self) -> usize {
        self.entries.first().map_or(0, |(_, count)| *count)
    }

    /// Share of `count` in the tally, as a percentage.
    #[must_use]
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 / self.total as f64 * 100.0
    }
}
