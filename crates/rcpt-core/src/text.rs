//! Text normalization for raw recognized receipt text.

/// Normalized view over raw recognized text.
///
/// Holds the trimmed, non-empty lines in original casing plus lowercase
/// views for keyword search. Empty input yields an empty line list; there is
/// no failure mode, downstream extractors treat "no lines" as "no data".
#[derive(Debug, Clone, Default)]
pub struct NormalizedText {
    /// Trimmed, non-empty lines in input order.
    pub lines: Vec<String>,
    /// Lowercase counterpart of each line, index-aligned with `lines`.
    pub lower_lines: Vec<String>,
    /// Lowercase full text (lines joined with newlines).
    pub lower: String,
}

impl NormalizedText {
    /// Normalize a raw text string.
    pub fn new(raw: &str) -> Self {
        let lines: Vec<String> = raw
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect();

        let lower_lines: Vec<String> = lines.iter().map(|l| l.to_lowercase()).collect();
        let lower = lower_lines.join("\n");

        Self {
            lines,
            lower_lines,
            lower,
        }
    }

    /// Whether any text survived normalization.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Indices of lines whose lowercase form contains any of `keywords`.
    pub fn lines_containing(&self, keywords: &[&str]) -> Vec<usize> {
        self.lower_lines
            .iter()
            .enumerate()
            .filter(|(_, l)| keywords.iter().any(|k| l.contains(k)))
            .map(|(i, _)| i)
            .collect()
    }
}
