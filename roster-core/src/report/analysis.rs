//! Book text analysis: title, author and first-chapter paragraph statistics.

use std::collections::BTreeMap;

use crate::config::ReportConfig;

/// Paragraphs shorter than this many words are left out of the statistics
pub const MIN_PARAGRAPH_WORDS: usize = 10;

/// Markers used to locate the metadata and the analyzed chapter
#[derive(Debug, Clone)]
pub struct TextHints {
    pub title_hint: String,
    pub author_hint: String,
    pub chapter_marker: String,
    pub next_chapter_marker: String,
    pub chapter_title: String,
}

impl From<&ReportConfig> for TextHints {
    fn from(config: &ReportConfig) -> Self {
        Self {
            title_hint: config.title_hint.clone(),
            author_hint: config.author_hint.clone(),
            chapter_marker: config.chapter_marker.clone(),
            next_chapter_marker: config.next_chapter_marker.clone(),
            chapter_title: config.chapter_title.clone(),
        }
    }
}

impl Default for TextHints {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

/// Summary statistics over the rounded paragraph word counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphStats {
    pub paragraphs: usize,
    pub total_words: usize,
    pub min: usize,
    pub max: usize,
    /// Integer mean (floor)
    pub mean: usize,
}

/// Everything the reading report needs from the book text
#[derive(Debug, Clone)]
pub struct BookAnalysis {
    pub title: String,
    pub author: String,
    /// Word counts of qualifying paragraphs, rounded down to tens
    pub word_counts: Vec<usize>,
    /// Rounded word count → number of paragraphs
    pub distribution: BTreeMap<usize, usize>,
    /// `None` when no paragraph qualifies
    pub stats: Option<ParagraphStats>,
}

/// Analyze a plain-text book.
pub fn analyze(text: &str, hints: &TextHints) -> BookAnalysis {
    let text = text.replace("\r\n", "\n");

    let title = find_title(&text, &hints.title_hint).unwrap_or_else(|| "Unknown title".to_string());
    let author =
        find_author(&text, &hints.author_hint).unwrap_or_else(|| "Unknown author".to_string());

    let chapter = first_chapter(&text, hints);
    let word_counts: Vec<usize> = paragraphs(&chapter)
        .iter()
        .filter_map(|p| round_to_tens(p.split_whitespace().count()))
        .collect();

    let mut distribution = BTreeMap::new();
    for &wc in &word_counts {
        *distribution.entry(wc).or_insert(0) += 1;
    }

    let stats = paragraph_stats(&word_counts);

    BookAnalysis {
        title,
        author,
        word_counts,
        distribution,
        stats,
    }
}

fn find_title(text: &str, hint: &str) -> Option<String> {
    let hint = hint.to_lowercase();
    text.lines()
        .find(|line| line.trim().to_lowercase().starts_with(&hint))
        .map(|line| line.trim().to_string())
}

fn find_author(text: &str, hint: &str) -> Option<String> {
    let hint = hint.to_lowercase();
    text.lines()
        .find(|line| line.to_lowercase().contains(&hint))
        .map(|line| line.trim().to_string())
}

/// Text of the first chapter.
///
/// The chapter marker first appears in the table of contents, so the chapter
/// body starts after its second occurrence. Empty when the marker occurs
/// fewer than two times or the closing marker is missing.
fn first_chapter(text: &str, hints: &TextHints) -> String {
    let Some((start, _)) = text.match_indices(&hints.chapter_marker).nth(1) else {
        return String::new();
    };
    let body = &text[start + hints.chapter_marker.len()..];

    let Some(end) = body.find(&hints.next_chapter_marker) else {
        return String::new();
    };
    let chapter = &body[..end];

    if hints.chapter_title.is_empty() {
        chapter.to_string()
    } else {
        chapter.replace(&hints.chapter_title, "")
    }
}

fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Round a word count down to tens; counts under ten are discarded
pub fn round_to_tens(words: usize) -> Option<usize> {
    if words >= MIN_PARAGRAPH_WORDS {
        Some(words / 10 * 10)
    } else {
        None
    }
}

fn paragraph_stats(counts: &[usize]) -> Option<ParagraphStats> {
    let min = *counts.iter().min()?;
    let max = *counts.iter().max()?;
    let total: usize = counts.iter().sum();
    Some(ParagraphStats {
        paragraphs: counts.len(),
        total_words: total,
        min,
        max,
        mean: total / counts.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn book() -> String {
        format!(
            "The Project Gutenberg eBook\r\n\r\nAlice's Adventures in Wonderland\r\n\r\nby Lewis Carroll\r\n\r\n\
             Contents\r\n\r\n CHAPTER I.     Down the Rabbit-Hole\r\n CHAPTER II.    The Pool of Tears\r\n\r\n\
             CHAPTER I.\r\nDown the Rabbit-Hole\r\n\r\n{}\r\n\r\n{}\r\n\r\n{}\r\n\r\n{}\r\n\r\n\
             CHAPTER II.\r\nThe Pool of Tears\r\n\r\n{}\r\n",
            words(25),
            words(9),
            words(13),
            words(47),
            words(100),
        )
    }

    #[test]
    fn test_title_and_author() {
        let analysis = analyze(&book(), &TextHints::default());
        assert_eq!(analysis.title, "Alice's Adventures in Wonderland");
        assert_eq!(analysis.author, "by Lewis Carroll");
    }

    #[test]
    fn test_first_chapter_paragraphs_rounded() {
        let analysis = analyze(&book(), &TextHints::default());

        // 9-word paragraph dropped, the rest rounded down to tens
        assert_eq!(analysis.word_counts, vec![20, 10, 40]);
        assert_eq!(analysis.distribution.get(&10), Some(&1));
        assert_eq!(analysis.distribution.get(&20), Some(&1));
        assert_eq!(analysis.distribution.get(&40), Some(&1));

        let stats = analysis.stats.unwrap();
        assert_eq!(stats.paragraphs, 3);
        assert_eq!(stats.total_words, 70);
        assert_eq!(stats.min, 10);
        assert_eq!(stats.max, 40);
        assert_eq!(stats.mean, 23);
    }

    #[test]
    fn test_missing_chapter_yields_no_stats() {
        let text = "Alice in a book without chapters\n\nSome text here.";
        let analysis = analyze(text, &TextHints::default());

        assert_eq!(analysis.title, "Alice in a book without chapters");
        assert_eq!(analysis.author, "Unknown author");
        assert!(analysis.word_counts.is_empty());
        assert!(analysis.stats.is_none());
    }

    #[test]
    fn test_single_marker_is_not_enough() {
        let text = format!("CHAPTER I.\n\n{}\n\nCHAPTER II.\n", words(30));
        let analysis = analyze(&text, &TextHints::default());
        assert!(analysis.stats.is_none());
        assert_eq!(analysis.title, "Unknown title");
    }

    #[test]
    fn test_round_to_tens() {
        assert_eq!(round_to_tens(9), None);
        assert_eq!(round_to_tens(10), Some(10));
        assert_eq!(round_to_tens(59), Some(50));
    }
}
