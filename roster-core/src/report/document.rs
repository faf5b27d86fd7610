//! Markdown rendering of the reading report and handing it to the desktop.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::format::bar;

use super::analysis::BookAnalysis;

const BAR_WIDTH: usize = 30;

/// Render the reading report as Markdown.
pub fn render_markdown(
    analysis: &BookAnalysis,
    report_author: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    output.push_str("# Reading report\n\n");
    output.push_str(&format!("## {}\n\n", analysis.title));
    output.push_str(&format!("- **Book author:** {}\n", analysis.author));
    output.push_str(&format!("- **Report author:** {}\n", report_author));
    output.push_str(&format!(
        "- **Generated:** {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("---\n\n");

    output.push_str(&distribution_section(analysis));
    output.push_str(&stats_section(analysis));

    output.push_str("Source: Project Gutenberg\n");
    output
}

fn distribution_section(analysis: &BookAnalysis) -> String {
    let mut section = String::new();
    section.push_str("## Paragraph length distribution\n\n");

    if analysis.distribution.is_empty() {
        section.push_str("_No paragraph of ten words or more was found in the first chapter._\n\n");
        return section;
    }

    let max = analysis.distribution.values().copied().max().unwrap_or(0);
    section.push_str("Words (rounded to tens) against number of paragraphs.\n\n");
    section.push_str("```text\n");
    for (words, paragraphs) in &analysis.distribution {
        section.push_str(&format!(
            "{:>5} │{} {}\n",
            words,
            bar(*paragraphs, max, BAR_WIDTH),
            paragraphs
        ));
    }
    section.push_str("```\n\n");
    section
}

fn stats_section(analysis: &BookAnalysis) -> String {
    let Some(stats) = &analysis.stats else {
        return String::new();
    };

    let mut section = String::new();
    section.push_str("## Statistics\n\n");
    section.push_str(&format!("- Paragraphs: {}\n", stats.paragraphs));
    section.push_str(&format!("- Total words: {}\n", stats.total_words));
    section.push_str(&format!("- Min: {}, Max: {}\n", stats.min, stats.max));
    section.push_str(&format!("- Mean: {}\n\n", stats.mean));
    section
}

/// Write the document, creating parent directories as needed.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "Report written");
    Ok(())
}

/// Open a file with the platform's default handler.
pub fn open_document(path: &Path) -> Result<()> {
    let mut command = opener_command(path);
    let status = command
        .status()
        .map_err(|e| Error::Report(format!("failed to launch opener: {e}")))?;
    if !status.success() {
        return Err(Error::Report(format!("opener exited with {status}")));
    }
    Ok(())
}

#[cfg(target_os = "windows")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
