//! # Chart Module
//!
//! Genre bar charts and mood pie charts for a playlist.
//!
//! Every chart has two renderings: a text version printed to the terminal,
//! and an SVG file drawn with `plotters`. The SVG files land in the data
//! directory under [`ChartKind::file_name`].

use anyhow::{anyhow, bail, Result};
use log::info;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::fmt::Write as _;
use std::path::Path;

use crate::stats::Tally;

const CHART_SIZE: (u32, u32) = (1000, 640);
const ANALYSIS_SIZE: (u32, u32) = (1600, 640);
const TEXT_WIDTH: usize = 40;

const BAR_COLORS: [RGBColor; 5] = [
    RGBColor(0xFF, 0x6B, 0x6B),
    RGBColor(0x4E, 0xCD, 0xC4),
    RGBColor(0x45, 0xB7, 0xD1),
    RGBColor(0xFF, 0xA0, 0x7A),
    RGBColor(0x98, 0xD8, 0xC8),
];

const PIE_COLORS: [RGBColor; 5] = [
    RGBColor(0xFF, 0xD9, 0x3D),
    RGBColor(0x6B, 0xCB, 0x77),
    RGBColor(0x4D, 0x96, 0xFF),
    RGBColor(0xFF, 0x6B, 0x9D),
    RGBColor(0xC7, 0x80, 0xFA),
];

const SLICE_GLYPHS: [char; 5] = ['█', '▓', '▒', '░', '#'];

/// Which chart to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Bar chart of genres.
    GenreBar,
    /// Pie chart of moods.
    MoodPie,
    /// Both charts side by side.
    Analysis,
}

impl ChartKind {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::GenreBar => "genre_preferences.svg",
            Self::MoodPie => "mood_distribution.svg",
            Self::Analysis => "playlist_analysis.svg",
        }
    }
}

/// Horizontal text bars, one line per label, scaled to the largest count.
#[must_use]
pub fn render_bar(tally: &Tally, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let label_width = label_width(tally);
    let max = tally.max_count().max(1);

    for (label, count) in tally.entries() {
        let len = (count * TEXT_WIDTH).div_ceil(max);
        let _ = writeln!(out, "{label:<label_width$} {} {count}", "█".repeat(len));
    }
    out
}

/// A strip split into slices by share, followed by a legend with percentages.
#[must_use]
pub fn render_pie(tally: &Tally, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    if tally.is_empty() {
        return out;
    }

    let mut strip = String::with_capacity(TEXT_WIDTH);
    let mut running = 0;
    let mut drawn = 0;
    for (idx, (_, count)) in tally.entries().iter().enumerate() {
        running += count;
        // Cumulative rounding keeps the strip exactly TEXT_WIDTH wide.
        let end = (running * TEXT_WIDTH + tally.total() / 2) / tally.total();
        strip.extend(std::iter::repeat(glyph(idx)).take(end - drawn));
        drawn = end;
    }
    let _ = writeln!(out, "[{strip}]");

    let label_width = label_width(tally);
    for (idx, (label, count)) in tally.entries().iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {label:<label_width$} {count:>3} ({:.1}%)",
            glyph(idx),
            tally.percentage(*count)
        );
    }
    out
}

/// Draw the genre bar chart to an SVG file.
pub fn write_bar_chart(genres: &Tally, path: &Path) -> Result<()> {
    ensure_data(genres)?;
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;
    draw_bar(&root, genres, "Genre Distribution in Your Playlist")?;
    root.present().map_err(draw_error)?;
    info!("Genre preference chart saved as {}", path.display());
    Ok(())
}

/// Draw the mood pie chart to an SVG file.
pub fn write_pie_chart(moods: &Tally, path: &Path) -> Result<()> {
    ensure_data(moods)?;
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;
    draw_pie(&root, moods, "Mood Distribution in Your Playlist")?;
    root.present().map_err(draw_error)?;
    info!("Mood distribution chart saved as {}", path.display());
    Ok(())
}

/// Genre bars on the left, mood pie on the right, in one SVG file.
pub fn write_analysis(genres: &Tally, moods: &Tally, path: &Path) -> Result<()> {
    ensure_data(genres)?;
    ensure_data(moods)?;
    let root = SVGBackend::new(path, ANALYSIS_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let panels = root.split_evenly((1, 2));
    draw_bar(&panels[0], genres, "Genre Distribution")?;
    draw_pie(&panels[1], moods, "Mood Distribution")?;

    root.present().map_err(draw_error)?;
    info!("Complete playlist analysis saved as {}", path.display());
    Ok(())
}

fn draw_bar(area: &DrawingArea<SVGBackend<'_>, Shift>, tally: &Tally, title: &str) -> Result<()> {
    let labels: Vec<&str> = tally.entries().iter().map(|(label, _)| label.as_str()).collect();
    let slots = labels.len() as u32;
    let top = tally.max_count() as u32 + 1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0u32..top)
        .map_err(draw_error)?;

    let label_of = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => labels
            .get(*idx as usize)
            .map(ToString::to_string)
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Genre")
        .y_desc("Number of Songs")
        .x_labels(labels.len())
        .x_label_formatter(&label_of)
        .draw()
        .map_err(draw_error)?;

    chart
        .draw_series(tally.entries().iter().enumerate().map(|(idx, (_, count))| {
            let slot = idx as u32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(slot), 0),
                    (SegmentValue::Exact(slot + 1), *count as u32),
                ],
                BAR_COLORS[idx % BAR_COLORS.len()].filled(),
            );
            bar.set_margin(0, 0, 12, 12);
            bar
        }))
        .map_err(draw_error)?;

    Ok(())
}

fn draw_pie(area: &DrawingArea<SVGBackend<'_>, Shift>, tally: &Tally, title: &str) -> Result<()> {
    let area = area.titled(title, ("sans-serif", 28)).map_err(draw_error)?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.36;

    let sizes: Vec<f64> = tally.entries().iter().map(|(_, count)| *count as f64).collect();
    let colors: Vec<RGBColor> =
        (0..sizes.len()).map(|i| PIE_COLORS[i % PIE_COLORS.len()]).collect();
    let labels: Vec<String> = tally.entries().iter().map(|(label, _)| label.clone()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));
    area.draw(&pie).map_err(draw_error)?;

    Ok(())
}

fn ensure_data(tally: &Tally) -> Result<()> {
    if tally.is_empty() {
        bail!("No songs in playlist to visualize");
    }
    Ok(())
}

fn draw_error(err: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("Failed to draw chart: {err}")
}

fn glyph(idx: usize) -> char {
    SLICE_GLYPHS[idx % SLICE_GLYPHS.len()]
}

fn label_width(tally: &Tally) -> usize {
    tally
        .entries()
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
}
