use super::{BackendOutcome, BackendRequest, ClassifierBackend};
use crate::config::KeywordRule;
use crate::model::Determination;

const SNIPPET_WINDOW: usize = 80;
const BINARY_PLACEHOLDER: &str = "[File is binary or unreadable]";

/// Keyword-matching classifier with no network dependency. Deterministic:
/// identical content and keyword table always produce the identical outcome.
///
/// Counts keyword occurrences per rule; the rule with the most matches wins,
/// ties broken by table order. Confidence is 50 plus 10 per match, capped at
/// 90. Content with no matches anywhere is treated as transitory at the
/// 50-point baseline.
pub struct HeuristicBackend {
    table: Vec<KeywordRule>,
}

impl HeuristicBackend {
    pub fn new(table: Vec<KeywordRule>) -> Self {
        HeuristicBackend { table }
    }
}

impl ClassifierBackend for HeuristicBackend {
    fn classify(&self, request: &BackendRequest) -> BackendOutcome {
        let text = request.content.to_ascii_lowercase();

        let mut winner: Option<(&KeywordRule, usize)> = None;
        for rule in &self.table {
            let matches: usize = rule
                .keywords
                .iter()
                .map(|kw| text.matches(kw.to_ascii_lowercase().as_str()).count())
                .sum();
            // Strict > keeps the earliest rule on ties.
            if matches > 0 && winner.map_or(true, |(_, best)| matches > best) {
                winner = Some((rule, matches));
            }
        }

        match winner {
            Some((rule, matches)) => {
                let first_match = rule
                    .keywords
                    .iter()
                    .find(|kw| text.contains(kw.to_ascii_lowercase().as_str()))
                    .map(|kw| kw.as_str())
                    .unwrap_or_default();
                let confidence = (50 + (matches * 10).min(40)) as u8;
                let snippet = extract_snippet(&request.content, first_match, SNIPPET_WINDOW);
                BackendOutcome::Success {
                    determination: rule.determination,
                    confidence,
                    insights: format!(
                        "The file includes the keyword '{}', indicating a {} record. \
                         Example text: '{}'.",
                        first_match,
                        rule.determination.as_str().to_lowercase(),
                        snippet
                    ),
                }
            }
            None => {
                let snippet = extract_snippet(&request.content, "", SNIPPET_WINDOW);
                BackendOutcome::Success {
                    determination: Determination::Transitory,
                    confidence: 50,
                    insights: format!(
                        "No retention keywords were found in the sampled text. \
                         The document starts with: '{}'.",
                        snippet
                    ),
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Sanitized snippet around the first occurrence of `keyword`, or the start
/// of the content when the keyword is empty or absent.
fn extract_snippet(content: &str, keyword: &str, window: usize) -> String {
    let mut start = 0;
    if !keyword.is_empty() {
        if let Some(idx) = content
            .to_ascii_lowercase()
            .find(&keyword.to_ascii_lowercase())
        {
            start = idx.saturating_sub(window / 2);
            while start > 0 && !content.is_char_boundary(start) {
                start -= 1;
            }
        }
    }
    let raw: String = content[start..].chars().take(window).collect();
    sanitize_snippet(&raw)
}

/// Printable snippet, or a fixed placeholder for binary/unreadable text.
/// Replacement characters from lossy decoding count as unprintable.
fn sanitize_snippet(text: &str) -> String {
    let snippet = text.replace('\n', " ").trim().to_string();
    if snippet.is_empty() {
        return BINARY_PLACEHOLDER.to_string();
    }
    let total = snippet.chars().count();
    let printable = snippet
        .chars()
        .filter(|c| !c.is_control() && *c != '\u{FFFD}')
        .count();
    if (printable as f64) / (total as f64) < 0.85 {
        return BINARY_PLACEHOLDER.to_string();
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetentionPolicy;

    fn backend() -> HeuristicBackend {
        HeuristicBackend::new(RetentionPolicy::default().keyword_table)
    }

    fn request(content: &str) -> BackendRequest {
        BackendRequest {
            model: "heuristic".to_string(),
            instructions: String::new(),
            content: content.to_string(),
            temperature: 0.0,
        }
    }

    #[test]
    fn test_single_keyword_classifies_transitory() {
        let outcome = backend().classify(&request("This is a temporary memo for routine use."));
        match outcome {
            BackendOutcome::Success {
                determination,
                confidence,
                insights,
            } => {
                assert_eq!(determination, Determination::Transitory);
                // Two matches: "temporary" and "routine" → 50 + 20.
                assert_eq!(confidence, 70);
                assert!(insights.contains("'temporary'"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_official_keywords_map_to_keep() {
        let outcome = backend().classify(&request("Official retention record, permanent."));
        match outcome {
            BackendOutcome::Success { determination, .. } => {
                assert_eq!(determination, Determination::Keep)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_tie_breaks_to_earlier_rule() {
        // One match per rule; TRANSITORY comes first in the default table.
        let outcome = backend().classify(&request("a routine note about an archival box"));
        match outcome {
            BackendOutcome::Success { determination, .. } => {
                assert_eq!(determination, Determination::Transitory)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_confidence_capped_at_ninety() {
        let outcome = backend().classify(&request(&"temporary ".repeat(20)));
        match outcome {
            BackendOutcome::Success { confidence, .. } => assert_eq!(confidence, 90),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_no_keywords_falls_back_to_transitory() {
        let outcome = backend().classify(&request("Nothing schedule-relevant here."));
        match outcome {
            BackendOutcome::Success {
                determination,
                confidence,
                insights,
            } => {
                assert_eq!(determination, Determination::Transitory);
                assert_eq!(confidence, 50);
                assert!(insights.contains("No retention keywords"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_binary_content_snippet_is_placeholder() {
        let garbled: String = std::iter::repeat('\u{FFFD}').take(40).collect();
        let outcome = backend().classify(&request(&garbled));
        match outcome {
            BackendOutcome::Success { insights, .. } => {
                assert!(insights.contains(BINARY_PLACEHOLDER))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_deterministic_across_calls() {
        let first = backend().classify(&request("temporary routine memo"));
        let second = backend().classify(&request("temporary routine memo"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_snippet_centers_on_keyword() {
        let content = format!("{} temporary tail", "padding ".repeat(30));
        let snippet = extract_snippet(&content, "temporary", 40);
        assert!(snippet.contains("temporary"));
    }
}
