//! Deterministic analysis fingerprints
//!
//! Two digest profiles over SHA-256. The analysis fingerprint commits to a
//! canonical JSON document (fixed field order, component scores sorted by
//! category name) so that byte-identical inputs always produce the same
//! digest. The verification fingerprint is a compact colon-joined line used
//! to attest an ownership check.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::signal::SignalCategory;

/// Canonical payload behind the analysis fingerprint. Field order is part of
/// the digest contract; do not reorder.
#[derive(Serialize)]
struct AnalysisPayload<'a> {
    project_name: &'a str,
    bundle_id: &'a str,
    overall_score: f64,
    component_scores: BTreeMap<&'static str, f64>,
    generated_at: String,
}

/// Digest over the complete analysis outcome.
pub fn analysis_fingerprint(
    project_name: &str,
    bundle_id: &str,
    overall_score: f64,
    component_scores: impl IntoIterator<Item = (SignalCategory, f64)>,
    generated_at: DateTime<Utc>,
) -> String {
    let payload = AnalysisPayload {
        project_name,
        bundle_id,
        overall_score,
        component_scores: component_scores
            .into_iter()
            .map(|(category, score)| (category.as_str(), score))
            .collect(),
        generated_at: generated_at.to_rfc3339(),
    };

    // Canonical struct serialization cannot fail.
    let canonical =
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"));
    hex_digest(canonical.as_bytes())
}

/// Digest attesting one ownership verification outcome.
pub fn verification_fingerprint(
    project_name: &str,
    username: &str,
    repo: &str,
    average_authenticity: f64,
    final_score: f64,
) -> String {
    let line = format!(
        "{project_name}:{username}:{repo}:{}:{}",
        average_authenticity.round() as i64,
        final_score.round() as i64
    );
    hex_digest(line.as_bytes())
}

fn hex_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_analysis_fingerprint_is_deterministic() {
        let components = vec![
            (SignalCategory::Documents, 90.0),
            (SignalCategory::OnChain, 85.0),
            (SignalCategory::Code, 88.0),
        ];
        let a = analysis_fingerprint("nova", "bundle-7", 87.6, components.clone(), at());
        let b = analysis_fingerprint("nova", "bundle-7", 87.6, components, at());
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_component_order_does_not_matter() {
        let forward = vec![
            (SignalCategory::Documents, 90.0),
            (SignalCategory::Code, 88.0),
        ];
        let reversed = vec![
            (SignalCategory::Code, 88.0),
            (SignalCategory::Documents, 90.0),
        ];
        assert_eq!(
            analysis_fingerprint("nova", "b", 89.0, forward, at()),
            analysis_fingerprint("nova", "b", 89.0, reversed, at())
        );
    }

    #[test]
    fn test_any_field_change_changes_digest() {
        let components = vec![(SignalCategory::Code, 88.0)];
        let base = analysis_fingerprint("nova", "b", 88.0, components.clone(), at());
        assert_ne!(
            base,
            analysis_fingerprint("nova2", "b", 88.0, components.clone(), at())
        );
        assert_ne!(
            base,
            analysis_fingerprint("nova", "b", 88.5, components, at())
        );
    }

    #[test]
    fn test_verification_fingerprint_rounds_scores() {
        // 72.6 and 72.4 round to different integers only on the first.
        let a = verification_fingerprint("nova", "ada", "org/repo", 72.6, 80.0);
        let b = verification_fingerprint("nova", "ada", "org/repo", 73.0, 80.0);
        let c = verification_fingerprint("nova", "ada", "org/repo", 72.4, 80.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
