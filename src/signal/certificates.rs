//! Certificate evidence model
//!
//! Readings of award and completion certificates supplied by an external
//! reader, plus the roll-up summary and the achievement score that blends
//! certificate credibility with verified code ownership.

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SignalError;
use crate::ownership::OwnershipVerdict;

/// Organizers whose certificates carry a verification boost.
const KNOWN_HACKATHON_HOSTS: &[&str] = &[
    "ethglobal",
    "devpost",
    "sui foundation",
    "solana foundation",
    "encode club",
    "hackathon.com",
];

/// Credibility boost applied when the issuer is a known organizer.
const KNOWN_HOST_BOOST: f64 = 20.0;

/// Authenticity floor for a certificate to count as a verified win.
const WIN_AUTHENTICITY_FLOOR: f64 = 80.0;

/// Point split of the achievement score.
const CERTIFICATE_POINTS: f64 = 40.0;
const OWNERSHIP_POINTS: f64 = 30.0;
const ACTIVITY_POINTS: f64 = 20.0;
const HACKATHON_POINTS_PER_WIN: f64 = 5.0;
const HACKATHON_POINTS_CAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credibility {
    Low,
    Medium,
    High,
}

/// One certificate as interpreted by the reader collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateReading {
    pub blob_id: String,
    pub document_type: String,
    pub issuing_organization: String,
    pub recipient_name: String,
    pub achievement: String,
    pub date_issued: Option<String>,
    pub verification_code: Option<String>,
    #[serde(default)]
    pub authenticity_indicators: Vec<String>,
    /// 0 to 100.
    pub authenticity_score: f64,
    pub credibility: Credibility,
    #[serde(default)]
    pub detected_issues: Vec<String>,
}

/// Interprets a stored certificate blob into a structured reading.
#[async_trait]
pub trait CertificateReader: Send + Sync {
    async fn read_certificate(&self, blob_id: &str) -> Result<CertificateReading, SignalError>;
}

/// Outcome of checking a reading for a hackathon win.
#[derive(Debug, Clone, Serialize)]
pub struct HackathonCheck {
    pub is_hackathon: bool,
    pub is_win: bool,
    pub known_organizer: bool,
    pub credibility_boost: f64,
    pub verified: bool,
}

pub fn verify_hackathon_win(reading: &CertificateReading) -> HackathonCheck {
    let haystack = format!(
        "{} {}",
        reading.document_type.to_lowercase(),
        reading.achievement.to_lowercase()
    );
    let is_hackathon = haystack.contains("hackathon");
    let is_win = is_hackathon
        && ["winner", "first", "1st", "champion", "won"]
            .iter()
            .any(|k| haystack.contains(k));

    let organizer = reading.issuing_organization.to_lowercase();
    let known_organizer = KNOWN_HACKATHON_HOSTS
        .iter()
        .any(|host| organizer.contains(host));

    let credibility_boost = if is_win && known_organizer {
        KNOWN_HOST_BOOST
    } else {
        0.0
    };

    HackathonCheck {
        is_hackathon,
        is_win,
        known_organizer,
        credibility_boost,
        verified: is_win && reading.authenticity_score + credibility_boost >= WIN_AUTHENTICITY_FLOOR,
    }
}

/// Roll-up over all certificate readings in a submission.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateSummary {
    pub total_certificates: usize,
    /// Mean authenticity over readings, 0 to 100.
    pub average_authenticity: f64,
    pub high_credibility_count: usize,
    pub verified_wins: usize,
    pub verified_organizations: Vec<String>,
    pub achievements: Vec<String>,
    pub overall_credibility: Option<Credibility>,
    pub readings: Vec<CertificateReading>,
}

pub fn summarize(readings: Vec<CertificateReading>) -> CertificateSummary {
    if readings.is_empty() {
        return CertificateSummary {
            total_certificates: 0,
            average_authenticity: 0.0,
            high_credibility_count: 0,
            verified_wins: 0,
            verified_organizations: Vec::new(),
            achievements: Vec::new(),
            overall_credibility: None,
            readings,
        };
    }

    let total = readings.len();
    let average_authenticity =
        readings.iter().map(|r| r.authenticity_score).sum::<f64>() / total as f64;
    let high_credibility_count = readings
        .iter()
        .filter(|r| r.credibility == Credibility::High)
        .count();
    let verified_wins = readings
        .iter()
        .filter(|r| verify_hackathon_win(r).verified)
        .count();

    let mut verified_organizations: Vec<String> = readings
        .iter()
        .filter(|r| r.credibility == Credibility::High)
        .map(|r| r.issuing_organization.clone())
        .collect();
    verified_organizations.sort();
    verified_organizations.dedup();

    let achievements = readings.iter().map(|r| r.achievement.clone()).collect();

    let overall_credibility = if high_credibility_count * 2 >= total {
        Some(Credibility::High)
    } else if readings
        .iter()
        .any(|r| r.credibility >= Credibility::Medium)
    {
        Some(Credibility::Medium)
    } else {
        Some(Credibility::Low)
    };

    CertificateSummary {
        total_certificates: total,
        average_authenticity,
        high_credibility_count,
        verified_wins,
        verified_organizations,
        achievements,
        overall_credibility,
        readings,
    }
}

/// Reads every certificate in the bundle concurrently and rolls the readings
/// up. Unreadable certificates are skipped rather than failing the summary.
pub async fn analyze_certificates(
    reader: &dyn CertificateReader,
    blob_ids: &[String],
) -> CertificateSummary {
    let reads = join_all(blob_ids.iter().map(|id| reader.read_certificate(id))).await;

    let mut readings = Vec::with_capacity(blob_ids.len());
    for (blob_id, read) in blob_ids.iter().zip(reads) {
        match read {
            Ok(reading) => readings.push(reading),
            Err(e) => warn!(blob_id, error = %e, "skipping unreadable certificate"),
        }
    }
    summarize(readings)
}

/// Achievement score on a 0 to 100 scale with its component breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementScore {
    pub total: f64,
    pub certificate_points: f64,
    pub ownership_points: f64,
    pub activity_points: f64,
    pub hackathon_bonus: f64,
}

/// Blends certificate credibility (40), verified ownership (30), recent
/// activity (20) and verified hackathon wins (10) into one score.
pub fn achievement_score(
    certificates: Option<&CertificateSummary>,
    ownership: Option<&OwnershipVerdict>,
) -> AchievementScore {
    let certificate_points = certificates
        .map(|s| s.average_authenticity / 100.0 * CERTIFICATE_POINTS)
        .unwrap_or(0.0);

    let (ownership_points, activity_points) = ownership
        .map(|v| {
            (
                f64::from(v.ownership_score) / 100.0 * OWNERSHIP_POINTS,
                f64::from(v.activity_score) / 100.0 * ACTIVITY_POINTS,
            )
        })
        .unwrap_or((0.0, 0.0));

    let wins = certificates.map(|s| s.verified_wins).unwrap_or(0);
    let hackathon_bonus = (wins as f64 * HACKATHON_POINTS_PER_WIN).min(HACKATHON_POINTS_CAP);

    AchievementScore {
        total: certificate_points + ownership_points + activity_points + hackathon_bonus,
        certificate_points,
        ownership_points,
        activity_points,
        hackathon_bonus,
    }
}
