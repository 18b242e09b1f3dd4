//! Category scorers
//!
//! Pure functions from evidence to a [`RatedSignal`]: a 0–1 score, a 0–1
//! confidence, and the findings that justify them. Every threshold lives in
//! the constant tables at the top of its scorer so tuning never means
//! touching control flow. No scorer does I/O; adapters fetch, scorers judge.

use serde::{Deserialize, Serialize};

use crate::ownership::OwnershipVerdict;
use crate::signal::certificates::{AchievementScore, CertificateSummary};
use crate::signal::documents::{DocumentKind, DocumentMetrics};
use crate::signal::{
    GovernanceSnapshot, MediaFileCheck, RepoMetrics, SignalCategory, SignalResult,
    SocialSnapshot, WalletActivity,
};

/// `(threshold, score_bonus, confidence_bonus, finding)` rows, checked top
/// down; only the first row the value exceeds applies.
type Tier = (u64, f64, f64, &'static str);

const STAR_TIERS: &[Tier] = &[
    (1000, 0.30, 0.20, "Strong community interest"),
    (100, 0.20, 0.15, "Growing community interest"),
    (10, 0.10, 0.10, "Early community interest"),
];

const COMMIT_TIERS: &[Tier] = &[
    (500, 0.20, 0.20, "Very active development"),
    (100, 0.15, 0.15, "Active development"),
    (10, 0.10, 0.10, "Some development activity"),
];

const CONTRIBUTOR_TIERS: &[Tier] = &[
    (20, 0.15, 0.15, "Large contributor base"),
    (5, 0.10, 0.10, "Multiple contributors"),
    (0, 0.05, 0.05, "Single contributor"),
];

const FORK_TIERS: &[Tier] = &[
    (100, 0.15, 0.15, "Widely forked"),
    (10, 0.10, 0.10, "Some forks"),
];

const ISSUE_TIERS: &[Tier] = &[
    (50, 0.10, 0.10, "Active issue tracker"),
    (10, 0.05, 0.05, "Issue tracker in use"),
];

const FOLLOWER_TIERS: &[Tier] = &[
    (10_000, 0.40, 0.30, "Large social following"),
    (1000, 0.30, 0.25, "Established social following"),
    (100, 0.20, 0.20, "Early social following"),
];

/// Weight of the ownership share in the verified-code blend.
const OWNERSHIP_BLEND: f64 = 0.6;

/// Weight of recent activity in the verified-code blend.
const ACTIVITY_BLEND: f64 = 0.4;

/// Confidence bonus when the authenticity verdict passed.
const AUTHENTIC_CONFIDENCE_BONUS: f64 = 0.15;

/// Score and confidence floors for the base and ceilings after bonuses.
const BASE_CONFIDENCE: f64 = 0.2;
const CONFIDENCE_CAP: f64 = 0.9;
const GOVERNANCE_CONFIDENCE_CAP: f64 = 0.8;

/// A scored category on the unit scale, before aggregation rescales it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatedSignal {
    /// 0–1.
    pub score: f64,
    /// 0–1.
    pub confidence: f64,
    pub findings: Vec<String>,
}

impl RatedSignal {
    pub fn new(score: f64, confidence: f64, findings: Vec<String>) -> Self {
        RatedSignal {
            score: score.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            findings,
        }
    }

    /// The neutral stand-in for evidence that was never supplied or could
    /// not be fetched.
    pub fn missing(reason: impl Into<String>) -> Self {
        RatedSignal {
            score: 0.5,
            confidence: 0.3,
            findings: vec![reason.into()],
        }
    }

    /// Rescale to the 0–100 aggregation scale.
    pub fn into_signal(self, category: SignalCategory, details: serde_json::Value) -> SignalResult {
        SignalResult {
            category,
            score: self.score * 100.0,
            confidence: self.confidence,
            findings: self.findings,
            details,
        }
    }
}

fn apply_tiers(
    value: u64,
    tiers: &[Tier],
    score: &mut f64,
    confidence: &mut f64,
    findings: &mut Vec<String>,
) {
    for &(threshold, score_bonus, confidence_bonus, finding) in tiers {
        if value > threshold {
            *score += score_bonus;
            *confidence += confidence_bonus;
            findings.push(format!("{finding} ({value})"));
            return;
        }
    }
}

/// Repository health from public metrics alone, no authorship claims.
pub fn score_repo_activity(metrics: &RepoMetrics) -> RatedSignal {
    let mut score = 0.0;
    let mut confidence = BASE_CONFIDENCE;
    let mut findings = Vec::new();

    apply_tiers(metrics.stars, STAR_TIERS, &mut score, &mut confidence, &mut findings);
    apply_tiers(
        metrics.commits_sampled,
        COMMIT_TIERS,
        &mut score,
        &mut confidence,
        &mut findings,
    );
    apply_tiers(
        metrics.contributors,
        CONTRIBUTOR_TIERS,
        &mut score,
        &mut confidence,
        &mut findings,
    );
    apply_tiers(metrics.forks, FORK_TIERS, &mut score, &mut confidence, &mut findings);
    apply_tiers(
        metrics.open_issues,
        ISSUE_TIERS,
        &mut score,
        &mut confidence,
        &mut findings,
    );

    if metrics.has_license {
        findings.push("Repository carries a license".to_string());
        confidence += 0.05;
    }
    if let Some(ref language) = metrics.language {
        findings.push(format!("Primary language: {language}"));
    }

    RatedSignal::new(score, confidence.min(CONFIDENCE_CAP), findings)
}

/// Code category: repository health blended with verified ownership when an
/// ownership verdict is available.
pub fn score_code(
    metrics: Option<&RepoMetrics>,
    ownership: Option<&OwnershipVerdict>,
) -> RatedSignal {
    match (metrics, ownership) {
        (None, None) => RatedSignal::missing("no code evidence supplied"),
        (Some(m), None) => score_repo_activity(m),
        (None, Some(v)) => {
            let blend = ownership_blend(v);
            let mut confidence = 0.5;
            let mut findings = vec![format!(
                "Verified authorship: {}% ownership, activity score {}",
                v.ownership_score, v.activity_score
            )];
            if v.is_authentic {
                confidence += AUTHENTIC_CONFIDENCE_BONUS;
                findings.push("Authenticity checks passed".to_string());
            }
            RatedSignal::new(blend, confidence, findings)
        }
        (Some(m), Some(v)) => {
            let table = score_repo_activity(m);
            let blend = ownership_blend(v);
            let mut confidence = table.confidence;
            let mut findings = table.findings;
            findings.push(format!(
                "Verified authorship: {}% ownership, activity score {}",
                v.ownership_score, v.activity_score
            ));
            if v.is_authentic {
                confidence += AUTHENTIC_CONFIDENCE_BONUS;
                findings.push("Authenticity checks passed".to_string());
            }
            RatedSignal::new(
                (table.score + blend) / 2.0,
                confidence.min(CONFIDENCE_CAP),
                findings,
            )
        }
    }
}

fn ownership_blend(verdict: &OwnershipVerdict) -> f64 {
    (OWNERSHIP_BLEND * f64::from(verdict.ownership_score)
        + ACTIVITY_BLEND * f64::from(verdict.activity_score))
        / 100.0
}

/// Community presence from self-reported social metrics.
pub fn score_social(snapshot: &SocialSnapshot) -> RatedSignal {
    let mut score = 0.0;
    let mut confidence = BASE_CONFIDENCE;
    let mut findings = Vec::new();

    apply_tiers(
        snapshot.followers,
        FOLLOWER_TIERS,
        &mut score,
        &mut confidence,
        &mut findings,
    );

    if snapshot.engagement_rate > 0.05 {
        score += 0.30;
        confidence += 0.20;
        findings.push("High engagement rate".to_string());
    } else if snapshot.engagement_rate > 0.02 {
        score += 0.20;
        confidence += 0.15;
        findings.push("Healthy engagement rate".to_string());
    }

    if !snapshot.hackathon_entries.is_empty() {
        score += 0.30;
        confidence += 0.30;
        findings.push(format!(
            "Hackathon participation: {}",
            snapshot.hackathon_entries.join(", ")
        ));
    }

    if snapshot.community_mentions > 100 {
        score += 0.20;
        confidence += 0.20;
        findings.push(format!(
            "Community mentions: {}",
            snapshot.community_mentions
        ));
    }

    RatedSignal::new(score, confidence.min(CONFIDENCE_CAP), findings)
}

/// Founder track record and governance transparency.
pub fn score_governance(snapshot: &GovernanceSnapshot) -> RatedSignal {
    let mut score = 0.0;
    let mut confidence = BASE_CONFIDENCE;
    let mut findings = Vec::new();

    if snapshot.previous_projects > 3 {
        score += 0.30;
        confidence += 0.25;
        findings.push(format!(
            "Experienced founder: {} previous projects",
            snapshot.previous_projects
        ));
    } else if snapshot.previous_projects > 0 {
        score += 0.20;
        confidence += 0.20;
        findings.push("Founder has prior projects".to_string());
    }

    if snapshot.verified_code_profile {
        score += 0.20;
        confidence += 0.20;
        findings.push("Verified code-host profile".to_string());
    }
    if snapshot.has_dao {
        score += 0.20;
        confidence += 0.15;
        findings.push("DAO governance in place".to_string());
    }
    if snapshot.transparent_voting {
        score += 0.15;
        confidence += 0.15;
        findings.push("Transparent on-chain voting".to_string());
    }
    if snapshot.public_roadmap {
        score += 0.15;
        confidence += 0.10;
        findings.push("Public roadmap".to_string());
    }

    RatedSignal::new(score, confidence.min(GOVERNANCE_CONFIDENCE_CAP), findings)
}

/// `(threshold, points, finding)` for the wallet point table.
const WALLET_TX_POINTS: &[(u64, f64, &'static str)] = &[
    (100, 40.0, "Very active wallet"),
    (50, 30.0, "Active wallet"),
    (20, 20.0, "Moderately active wallet"),
    (5, 10.0, "Lightly used wallet"),
    (1, 5.0, "Minimal wallet activity"),
];

const WALLET_BALANCE_POINTS: &[(f64, f64, &'static str)] = &[
    (1000.0, 30.0, "Substantial balance"),
    (100.0, 25.0, "Healthy balance"),
    (10.0, 20.0, "Modest balance"),
    (1.0, 15.0, "Small balance"),
    (0.0, 5.0, "Dust balance"),
];

/// Flat bonus for any transaction history at all.
const WALLET_ACTIVE_BONUS: f64 = 30.0;

/// On-chain activity from aggregate wallet figures.
pub fn score_wallet(activity: &WalletActivity) -> RatedSignal {
    let mut points = 0.0;
    let mut confidence: f64 = 0.5;
    let mut findings = Vec::new();

    for &(threshold, tier_points, finding) in WALLET_TX_POINTS {
        if activity.transaction_count >= threshold {
            points += tier_points;
            findings.push(format!("{finding} ({} transactions)", activity.transaction_count));
            break;
        }
    }

    for &(threshold, tier_points, finding) in WALLET_BALANCE_POINTS {
        if activity.balance >= threshold && activity.balance > 0.0 {
            points += tier_points;
            findings.push(finding.to_string());
            break;
        }
    }

    if activity.transaction_count > 0 {
        points += WALLET_ACTIVE_BONUS;
    }

    if activity.transaction_count >= 100 {
        confidence += 0.20;
    } else if activity.transaction_count >= 20 {
        confidence += 0.15;
    } else if activity.transaction_count > 0 {
        confidence += 0.10;
    }
    if activity.balance >= 1.0 {
        confidence += 0.10;
    }
    if activity.contract_interactions > 0 {
        confidence += 0.15;
        findings.push(format!(
            "Contract interactions: {}",
            activity.contract_interactions
        ));
    }

    RatedSignal::new(
        points.min(100.0) / 100.0,
        confidence.min(CONFIDENCE_CAP),
        findings,
    )
}

/// Baseline for submitted media before per-file checks.
const MEDIA_BASE_SCORE: f64 = 0.7;
const MEDIA_BASE_CONFIDENCE: f64 = 0.6;

/// Penalty when a file's manipulation estimate is above the alert line.
const MANIPULATION_ALERT: f64 = 0.3;
const MANIPULATION_PENALTY: f64 = 0.2;

/// Media authenticity from per-file integrity checks.
pub fn score_media(files: &[MediaFileCheck]) -> RatedSignal {
    if files.is_empty() {
        return RatedSignal::missing("no media files submitted");
    }

    let mut score = MEDIA_BASE_SCORE;
    let mut confidence = MEDIA_BASE_CONFIDENCE;
    let mut findings = Vec::new();

    for file in files {
        if file.has_metadata {
            score += 0.05;
        } else {
            findings.push(format!("{}: missing metadata", file.name));
        }
        if file.hash_verified {
            score += 0.05;
            confidence += 0.05;
        }
        if file.manipulation_score < MANIPULATION_ALERT {
            confidence += 0.05;
        } else {
            score -= MANIPULATION_PENALTY;
            findings.push(format!(
                "{}: possible manipulation (estimate {:.2})",
                file.name, file.manipulation_score
            ));
        }
    }

    RatedSignal::new(score, confidence.min(CONFIDENCE_CAP), findings)
}

/// `(threshold, points)` quality rows for PDF structure.
const PDF_PAGE_POINTS: &[(u32, f64)] = &[(20, 20.0), (10, 15.0), (5, 10.0)];
const PDF_WORD_POINTS: &[(u32, f64)] = &[(3000, 20.0), (1500, 15.0), (500, 10.0)];
const PDF_SECTION_POINTS: f64 = 10.0;
const PDF_FLOOR_POINTS: f64 = 5.0;

const VIDEO_SIZE_POINTS: &[(u64, f64)] = &[
    (50_000_000, 85.0),
    (10_000_000, 70.0),
    (1_000_000, 55.0),
];
const VIDEO_FLOOR_POINTS: f64 = 40.0;

const SHEET_POINTS: &[(u32, f64)] = &[(5, 90.0), (3, 75.0), (2, 60.0)];
const SHEET_FLOOR_POINTS: f64 = 45.0;

fn document_quality(doc: &DocumentMetrics) -> f64 {
    match doc.kind {
        DocumentKind::Pdf => {
            let pages = PDF_PAGE_POINTS
                .iter()
                .find(|&&(threshold, _)| doc.page_count >= threshold)
                .map(|&(_, points)| points)
                .unwrap_or(PDF_FLOOR_POINTS);
            let words = PDF_WORD_POINTS
                .iter()
                .find(|&&(threshold, _)| doc.word_count >= threshold)
                .map(|&(_, points)| points)
                .unwrap_or(PDF_FLOOR_POINTS);
            let sections = f64::from(doc.sections.count()) * PDF_SECTION_POINTS;
            (pages + words + sections).min(100.0)
        }
        DocumentKind::Video => VIDEO_SIZE_POINTS
            .iter()
            .find(|&&(threshold, _)| doc.file_size_bytes >= threshold)
            .map(|&(_, points)| points)
            .unwrap_or(VIDEO_FLOOR_POINTS),
        DocumentKind::Spreadsheet => SHEET_POINTS
            .iter()
            .find(|&&(threshold, _)| doc.sheet_count >= threshold)
            .map(|&(_, points)| points)
            .unwrap_or(SHEET_FLOOR_POINTS),
    }
}

/// Document bundle completeness and structure.
pub fn score_documents(documents: &[DocumentMetrics]) -> RatedSignal {
    if documents.is_empty() {
        return RatedSignal::missing("document bundle is empty");
    }

    let mean_quality = documents.iter().map(document_quality).sum::<f64>()
        / documents.len() as f64;
    let confidence = (0.4 + 0.1 * documents.len() as f64).min(CONFIDENCE_CAP);

    let mut findings = vec![format!("{} documents analyzed", documents.len())];
    for doc in documents {
        findings.push(format!(
            "{}: quality {:.0}/100",
            doc.identifier,
            document_quality(doc)
        ));
    }

    RatedSignal::new(mean_quality / 100.0, confidence, findings)
}

/// Achievements category from the blended achievement score.
pub fn score_achievements(
    score: &AchievementScore,
    certificates: Option<&CertificateSummary>,
) -> RatedSignal {
    let mut confidence: f64 = 0.4;
    let mut findings = Vec::new();

    if let Some(summary) = certificates {
        confidence += 0.1;
        findings.push(format!(
            "{} certificates, average authenticity {:.0}",
            summary.total_certificates, summary.average_authenticity
        ));
        if summary.verified_wins > 0 {
            findings.push(format!("{} verified hackathon wins", summary.verified_wins));
        }
    }
    if score.ownership_points > 0.0 {
        confidence += 0.2;
        findings.push("Backed by verified code ownership".to_string());
    }

    RatedSignal::new(score.total / 100.0, confidence.min(CONFIDENCE_CAP), findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_repo() -> RepoMetrics {
        RepoMetrics {
            full_name: "org/nova".to_string(),
            stars: 1543,
            forks: 120,
            open_issues: 60,
            commits_sampled: 600,
            recent_commits_90d: 40,
            contributors: 25,
            has_license: true,
            language: Some("Rust".to_string()),
            last_update: None,
        }
    }

    #[test]
    fn test_strong_repo_saturates_score() {
        let rated = score_repo_activity(&strong_repo());
        // 0.3 + 0.2 + 0.15 + 0.15 + 0.1
        assert!((rated.score - 0.9).abs() < 1e-9);
        assert_eq!(rated.confidence, CONFIDENCE_CAP);
        assert!(rated.findings.iter().any(|f| f.contains("Strong community")));
    }

    #[test]
    fn test_empty_repo_scores_zero() {
        let rated = score_repo_activity(&RepoMetrics::default());
        assert_eq!(rated.score, 0.0);
        assert_eq!(rated.confidence, BASE_CONFIDENCE);
    }

    #[test]
    fn test_tiers_apply_first_match_only() {
        let metrics = RepoMetrics {
            stars: 150,
            ..Default::default()
        };
        let rated = score_repo_activity(&metrics);
        // Only the 100-star tier, not the 10-star tier as well.
        assert!((rated.score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_code_without_evidence_is_neutral() {
        let rated = score_code(None, None);
        assert_eq!(rated.score, 0.5);
        assert_eq!(rated.confidence, 0.3);
    }

    #[test]
    fn test_code_ownership_blend() {
        let verdict = OwnershipVerdict {
            ownership_score: 80,
            activity_score: 50,
            is_authentic: true,
            ..OwnershipVerdict::unverified()
        };
        let rated = score_code(None, Some(&verdict));
        // (0.6*80 + 0.4*50) / 100
        assert!((rated.score - 0.68).abs() < 1e-9);
        assert!((rated.confidence - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_code_blend_averages_with_repo_table() {
        let verdict = OwnershipVerdict {
            ownership_score: 100,
            activity_score: 100,
            ..OwnershipVerdict::unverified()
        };
        let rated = score_code(Some(&strong_repo()), Some(&verdict));
        // (0.9 + 1.0) / 2
        assert!((rated.score - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_social_accumulates_evidence() {
        let snapshot = SocialSnapshot {
            followers: 12_000,
            engagement_rate: 0.06,
            hackathon_entries: vec!["ETHGlobal".to_string()],
            community_mentions: 250,
        };
        let rated = score_social(&snapshot);
        // 0.4 + 0.3 + 0.3 + 0.2, clamped.
        assert_eq!(rated.score, 1.0);
        assert_eq!(rated.confidence, CONFIDENCE_CAP);
    }

    #[test]
    fn test_governance_confidence_is_capped_lower() {
        let snapshot = GovernanceSnapshot {
            previous_projects: 5,
            verified_code_profile: true,
            has_dao: true,
            transparent_voting: true,
            public_roadmap: true,
        };
        let rated = score_governance(&snapshot);
        assert_eq!(rated.score, 1.0);
        // Self-reported evidence never reaches full confidence.
        assert_eq!(rated.confidence, GOVERNANCE_CONFIDENCE_CAP);
    }

    #[test]
    fn test_wallet_point_table() {
        let activity = WalletActivity {
            transaction_count: 60,
            balance: 150.0,
            contract_interactions: 3,
        };
        let rated = score_wallet(&activity);
        // 30 tx points + 25 balance points + 30 active bonus.
        assert!((rated.score - 0.85).abs() < 1e-9);
        assert!(rated.findings.iter().any(|f| f.contains("Contract interactions")));
    }

    #[test]
    fn test_idle_wallet_scores_zero() {
        let rated = score_wallet(&WalletActivity::default());
        assert_eq!(rated.score, 0.0);
        assert_eq!(rated.confidence, 0.5);
    }

    #[test]
    fn test_media_manipulation_penalty() {
        let files = vec![MediaFileCheck {
            name: "demo.mp4".to_string(),
            has_metadata: true,
            hash_verified: true,
            manipulation_score: 0.8,
        }];
        let rated = score_media(&files);
        // 0.7 + 0.05 + 0.05 - 0.2
        assert!((rated.score - 0.6).abs() < 1e-9);
        assert!(rated.findings.iter().any(|f| f.contains("possible manipulation")));
    }

    #[test]
    fn test_media_missing_falls_back_to_neutral() {
        let rated = score_media(&[]);
        assert_eq!(rated.score, 0.5);
        assert_eq!(rated.confidence, 0.3);
    }

    #[test]
    fn test_document_quality_pdf_sections() {
        use crate::signal::documents::SectionFlags;
        let doc = DocumentMetrics {
            identifier: "deck.pdf".to_string(),
            kind: DocumentKind::Pdf,
            page_count: 22,
            word_count: 3200,
            sections: SectionFlags {
                problem: true,
                solution: true,
                market: true,
                team: true,
                traction: true,
                financials: true,
            },
            file_size_bytes: 0,
            sheet_count: 0,
        };
        // 20 + 20 + 60, capped at 100.
        assert_eq!(document_quality(&doc), 100.0);
    }

    #[test]
    fn test_document_quality_video_and_sheets() {
        let video = DocumentMetrics {
            identifier: "demo.mp4".to_string(),
            kind: DocumentKind::Video,
            page_count: 0,
            word_count: 0,
            sections: Default::default(),
            file_size_bytes: 12_000_000,
            sheet_count: 0,
        };
        assert_eq!(document_quality(&video), 70.0);

        let sheet = DocumentMetrics {
            identifier: "financials.xlsx".to_string(),
            kind: DocumentKind::Spreadsheet,
            page_count: 0,
            word_count: 0,
            sections: Default::default(),
            file_size_bytes: 0,
            sheet_count: 4,
        };
        assert_eq!(document_quality(&sheet), 75.0);
    }

    #[test]
    fn test_documents_confidence_grows_with_bundle_size() {
        let doc = DocumentMetrics {
            identifier: "a.pdf".to_string(),
            kind: DocumentKind::Pdf,
            page_count: 10,
            word_count: 1000,
            sections: Default::default(),
            file_size_bytes: 0,
            sheet_count: 0,
        };
        let one = score_documents(&[doc.clone()]);
        let three = score_documents(&[doc.clone(), doc.clone(), doc]);
        assert!(three.confidence > one.confidence);
    }

    #[test]
    fn test_achievements_rescale() {
        let score = AchievementScore {
            total: 75.0,
            certificate_points: 36.0,
            ownership_points: 24.0,
            activity_points: 10.0,
            hackathon_bonus: 5.0,
        };
        let rated = score_achievements(&score, None);
        assert!((rated.score - 0.75).abs() < 1e-9);
        assert!((rated.confidence - 0.6).abs() < 1e-9);
    }
}
