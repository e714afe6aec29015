use crate::config::KeywordRule;
use crate::error::Error;
use crate::model::Determination;

/// Weight given to the model's own confidence in the audit blend; the
/// remainder weights keyword evidence.
pub const DEFAULT_MODEL_WEIGHT: f64 = 0.7;

/// Absolute tolerance when re-verifying a persisted blended confidence.
pub const BLEND_TOLERANCE: f64 = 0.01;

/// Final published confidence for one classification, blending the backend's
/// claim with rule-based evidence. Total over all inputs; rules in order:
///
/// 1. DESTROY on a file already past the age threshold is fully certain.
///    DESTROY on a younger file is never trusted above 80.
/// 2. Empty or whitespace-only content carries no evidence, so no
///    confidence, regardless of what the backend claimed.
/// 3. Otherwise the backend confidence, clamped to [1, 100].
pub fn hybrid_confidence(
    backend_confidence: u8,
    determination: Determination,
    content: &str,
    age_exceeded: bool,
) -> u8 {
    if determination == Determination::Destroy {
        if age_exceeded {
            100
        } else {
            backend_confidence.clamp(1, 80)
        }
    } else if content.trim().is_empty() {
        0
    } else {
        backend_confidence.clamp(1, 100)
    }
}

/// Fraction of the label's keywords present in the text, on [0, 1].
/// Presence is binary per keyword; an unknown label scores 0.
pub fn keyword_confidence(text: &str, label: &str, table: &[KeywordRule]) -> f64 {
    let rule = match table.iter().find(|r| r.matches_label(label)) {
        Some(rule) => rule,
        None => return 0.0,
    };
    if rule.keywords.is_empty() {
        return 0.0;
    }
    let lower = text.to_ascii_lowercase();
    let present = rule
        .keywords
        .iter()
        .filter(|kw| lower.contains(kw.to_ascii_lowercase().as_str()))
        .count();
    present as f64 / rule.keywords.len() as f64
}

/// Weighted average of model confidence and keyword confidence, both on
/// [0, 1].
pub fn blended_confidence(
    model_confidence: f64,
    text: &str,
    label: &str,
    table: &[KeywordRule],
    model_weight: f64,
) -> f64 {
    model_weight * model_confidence
        + (1.0 - model_weight) * keyword_confidence(text, label, table)
}

/// Audit check: recompute the blend for a persisted result and require
/// agreement within [`BLEND_TOLERANCE`]. Drift is a validation error, never
/// silently corrected.
pub fn verify_blended(
    recorded: f64,
    model_confidence: f64,
    text: &str,
    label: &str,
    table: &[KeywordRule],
) -> Result<(), Error> {
    let recomputed =
        blended_confidence(model_confidence, text, label, table, DEFAULT_MODEL_WEIGHT);
    if (recomputed - recorded).abs() > BLEND_TOLERANCE {
        return Err(Error::Validation(format!(
            "blended confidence mismatch: expected {:.2}, recorded {:.2}",
            recomputed, recorded
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetentionPolicy;

    #[test]
    fn test_destroy_past_threshold_is_certain() {
        assert_eq!(
            hybrid_confidence(40, Determination::Destroy, "anything", true),
            100
        );
    }

    #[test]
    fn test_destroy_on_young_file_capped_at_eighty() {
        assert_eq!(
            hybrid_confidence(95, Determination::Destroy, "anything", false),
            80
        );
        assert_eq!(
            hybrid_confidence(60, Determination::Destroy, "anything", false),
            60
        );
        assert_eq!(
            hybrid_confidence(0, Determination::Destroy, "anything", false),
            1
        );
    }

    #[test]
    fn test_empty_content_scores_zero() {
        assert_eq!(hybrid_confidence(90, Determination::Keep, "", false), 0);
        assert_eq!(
            hybrid_confidence(90, Determination::Transitory, "  \n\t ", false),
            0
        );
    }

    #[test]
    fn test_backend_confidence_clamped() {
        assert_eq!(hybrid_confidence(0, Determination::Keep, "text", false), 1);
        assert_eq!(
            hybrid_confidence(100, Determination::Keep, "text", false),
            100
        );
        assert_eq!(hybrid_confidence(73, Determination::Keep, "text", false), 73);
    }

    #[test]
    fn test_keyword_confidence_fraction() {
        let table = RetentionPolicy::default().keyword_table;
        // "temporary" and "routine": 2 of 5 TRANSITORY keywords present.
        let score = keyword_confidence(
            "This is a temporary memo for routine use.",
            "TRANSITORY",
            &table,
        );
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_confidence_unknown_label_is_zero() {
        let table = RetentionPolicy::default().keyword_table;
        assert_eq!(keyword_confidence("temporary", "SCHEDULE-9", &table), 0.0);
    }

    #[test]
    fn test_keyword_confidence_by_determination_name() {
        let table = RetentionPolicy::default().keyword_table;
        // KEEP resolves to the OFFICIAL rule.
        let score = keyword_confidence("an official permanent record", "KEEP", &table);
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_blend_recomputation_within_tolerance() {
        let table = RetentionPolicy::default().keyword_table;
        let text = "This is a temporary memo for routine use.";
        let blended = blended_confidence(0.85, text, "TRANSITORY", &table, DEFAULT_MODEL_WEIGHT);
        // 0.7 * 0.85 + 0.3 * 0.4
        assert!((blended - 0.715).abs() < 1e-9);
        assert!(verify_blended(blended, 0.85, text, "TRANSITORY", &table).is_ok());
        assert!(verify_blended(blended + 0.005, 0.85, text, "TRANSITORY", &table).is_ok());
    }

    #[test]
    fn test_blend_drift_is_a_validation_error() {
        let table = RetentionPolicy::default().keyword_table;
        let text = "This is a temporary memo for routine use.";
        let err = verify_blended(0.9, 0.85, text, "TRANSITORY", &table).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
