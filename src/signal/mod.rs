//! Signal sources and their normalized results
//!
//! Every externally-sourced input to the trust computation (code host,
//! ledger, document store, certificate classifier) is an independently
//! fallible *signal*. Each adapter normalizes its raw upstream shape into a
//! [`SignalResult`] so the aggregation engine never sees provider-specific
//! payloads.
//!
//! Adapters are dependency-injected behind async traits; there are no
//! process-wide client singletons. Callers that lack a capability supply the
//! explicit stand-ins from [`unavailable`] rather than omitting a field.

pub mod certificates;
pub mod documents;
pub mod github;
pub mod ledger;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

pub use certificates::{
    AchievementScore, CertificateReader, CertificateReading, CertificateSummary, Credibility,
    HackathonCheck,
};
pub use documents::{BlobStore, DocumentKind, DocumentMetrics};
pub use github::{GithubAdapter, RepoMetrics};
pub use ledger::{LedgerAdapter, LedgerSource, WalletActivity};

/// Fixed grouping of signals with a configured weight in the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    /// Pitch decks, whitepapers, financials, demo material.
    Documents,
    /// Ledger activity for the project's wallet.
    OnChain,
    /// Repository health and verified authorship.
    Code,
    /// Authenticity of uploaded media files.
    Media,
    /// Founder track record and governance transparency.
    Governance,
    /// Community and social presence.
    Social,
    /// Certificates, awards, hackathon wins.
    Achievements,
}

impl SignalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalCategory::Documents => "documents",
            SignalCategory::OnChain => "on_chain",
            SignalCategory::Code => "code",
            SignalCategory::Media => "media",
            SignalCategory::Governance => "governance",
            SignalCategory::Social => "social",
            SignalCategory::Achievements => "achievements",
        }
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output of one adapter call.
///
/// Immutable once produced; consumed by exactly one category scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalResult {
    pub category: SignalCategory,
    /// Category score on the 0–100 scale.
    pub score: f64,
    /// How much evidence backs the score, 0–1.
    pub confidence: f64,
    /// Human-readable observations, in the order they were made.
    pub findings: Vec<String>,
    /// Provider-specific raw detail, kept opaque to the engine.
    pub details: serde_json::Value,
}

impl SignalResult {
    /// The documented stand-in for a signal that could not be fetched:
    /// "unknown" rather than "bad".
    pub fn neutral(category: SignalCategory, reason: impl Into<String>) -> Self {
        SignalResult {
            category,
            score: 50.0,
            confidence: 0.3,
            findings: vec![reason.into()],
            details: serde_json::Value::Null,
        }
    }
}

/// Self-reported social presence, supplied by the caller rather than fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialSnapshot {
    pub followers: u64,
    /// Engagement as a fraction of followers, e.g. 0.03 for 3%.
    pub engagement_rate: f64,
    pub hackathon_entries: Vec<String>,
    pub community_mentions: u64,
}

/// Self-reported founder and governance metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    pub previous_projects: u32,
    pub verified_code_profile: bool,
    pub has_dao: bool,
    pub transparent_voting: bool,
    pub public_roadmap: bool,
}

/// One uploaded media file with the checks already run against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFileCheck {
    pub name: String,
    pub has_metadata: bool,
    pub hash_verified: bool,
    /// Estimated probability of manipulation, 0–1.
    pub manipulation_score: f64,
}

/// Explicit "capability not available" stand-ins.
///
/// The analyzer requires a full adapter set; callers without, say, a ledger
/// endpoint plug these in and the affected category degrades to its neutral
/// default with a clear finding.
pub mod unavailable {
    use super::*;
    use crate::ownership::{CommitRecord, CommitSource};
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone, Copy, Default)]
    pub struct NoLedger;

    #[async_trait]
    impl LedgerSource for NoLedger {
        async fn wallet_activity(&self, _address: &str) -> Result<WalletActivity, SignalError> {
            Err(SignalError::Unavailable("no ledger adapter".into()))
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct NoBlobStore;

    #[async_trait]
    impl BlobStore for NoBlobStore {
        async fn document_metrics(
            &self,
            _bundle_id: &str,
        ) -> Result<Vec<DocumentMetrics>, SignalError> {
            Err(SignalError::Unavailable("no document store adapter".into()))
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct NoCertificateReader;

    #[async_trait]
    impl CertificateReader for NoCertificateReader {
        async fn read_certificate(
            &self,
            _blob_id: &str,
        ) -> Result<CertificateReading, SignalError> {
            Err(SignalError::Unavailable(
                "no certificate classifier".into(),
            ))
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct NoCodeHost;

    #[async_trait]
    impl super::github::CodeHost for NoCodeHost {
        async fn repo_metrics(&self, _repo: &str) -> Result<RepoMetrics, SignalError> {
            Err(SignalError::Unavailable("no code host adapter".into()))
        }
    }

    #[async_trait]
    impl CommitSource for NoCodeHost {
        async fn list_commits(
            &self,
            _repo: &str,
            _since: DateTime<Utc>,
        ) -> Result<Vec<CommitRecord>, SignalError> {
            Err(SignalError::Unavailable("no code host adapter".into()))
        }

        async fn total_repo_commits(&self, _repo: &str) -> Result<u64, SignalError> {
            Err(SignalError::Unavailable("no code host adapter".into()))
        }
    }
}
