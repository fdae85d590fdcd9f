//! Fuzzy string matching over the biomarker alias dictionary
//!
//! OCR output rarely spells a biomarker name exactly. This module scores
//! candidates against every known alias and canonical code with normalized
//! Levenshtein similarity and returns the best match above a threshold.
//!
//! The dictionary is small (hundreds of entries) so every lookup is a plain
//! O(N·M) scan; normalized alias forms are precomputed once at construction.

use tracing::{debug, trace};

use crate::codes::{ALIAS_TABLE, KNOWN_CODES};
use crate::normalize::normalize;

/// Levenshtein edit distance, char-based dynamic programming
pub fn levenshtein(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    #[allow(clippy::needless_range_loop)]
    for i in 0..=len1 {
        matrix[i][0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[len1][len2]
}

/// Normalized Levenshtein similarity in `[0, 1]`.
///
/// `1 - distance / max(len)`; symmetric; two empty strings score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// A dictionary entry with its precomputed normalized form
#[derive(Debug, Clone)]
struct DictionaryEntry {
    /// Normalized form compared against normalized input
    normalized: String,
    /// Canonical code this entry resolves to
    code: &'static str,
}

/// Fuzzy matcher over the static alias table and known-code set
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    entries: Vec<DictionaryEntry>,
}

impl FuzzyMatcher {
    /// Build the matcher from the compiled-in dictionary.
    ///
    /// Aliases come first, then bare canonical codes; both slices are sorted
    /// at the source so the scan order is pinned.
    pub fn new() -> Self {
        let mut entries: Vec<DictionaryEntry> = ALIAS_TABLE
            .iter()
            .map(|entry| DictionaryEntry {
                normalized: normalize(entry.alias),
                code: entry.code,
            })
            .collect();

        entries.extend(KNOWN_CODES.iter().map(|code| DictionaryEntry {
            normalized: (*code).to_string(),
            code,
        }));

        Self { entries }
    }

    /// Best canonical code for `input` strictly above `threshold`.
    ///
    /// Equal scores resolve to the lexicographically smallest canonical code,
    /// independent of dictionary order.
    pub fn best_match(&self, input: &str, threshold: f64) -> Option<&'static str> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &'static str)> = None;
        for entry in &self.entries {
            let score = similarity(&normalized, &entry.normalized);
            if score <= threshold {
                continue;
            }
            trace!(input = %normalized, candidate = %entry.normalized, score, "Fuzzy candidate");

            best = match best {
                None => Some((score, entry.code)),
                Some((best_score, best_code)) => {
                    if score > best_score || (score == best_score && entry.code < best_code) {
                        Some((score, entry.code))
                    } else {
                        Some((best_score, best_code))
                    }
                }
            };
        }

        if let Some((score, code)) = best {
            debug!(input = %input, code = %code, score, "Fuzzy match found");
        }
        best.map(|(_, code)| code)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}
