//! Ownership verification from commit patterns
//!
//! Establishes whether a claimed author genuinely contributed to a
//! repository, and in what proportion, using only public commit metadata.
//! The verdict feeds the code category of the trust aggregation.
//!
//! Failure asymmetry is deliberate and load-bearing:
//! - the *matched-commit* fetch failing degrades to an all-zero verdict with
//!   `is_authentic = false` (fail-closed: missing authorship evidence must
//!   not grant authenticity);
//! - the *contributor-stats* fetch failing falls back to a neutral 50%
//!   ownership share (fail-open: missing comparison data must not penalize
//!   an author whose commits we did see).

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AuthenticityPolicy;
use crate::error::SignalError;

/// Days of history considered "recent" for the activity score.
const ACTIVITY_WINDOW_DAYS: i64 = 90;

/// Recent commits at which the activity score saturates.
const ACTIVITY_SATURATION: f64 = 10.0;

/// Distinct ISO weeks at which the consistency score saturates (one year).
const CONSISTENCY_SATURATION: f64 = 52.0;

/// Matched commits sampled for signature reporting.
const SIGNATURE_SAMPLE: usize = 10;

/// Read-only snapshot of one commit, as pulled from the code host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    /// Platform account, when the commit is bound to one.
    pub author_login: Option<String>,
    /// Free-text author name from the commit itself.
    pub author_name: String,
    pub authored_at: DateTime<Utc>,
    pub has_signature: bool,
    pub signature_verified: bool,
}

/// Where the verifier gets commit data. Implemented by the code-host
/// adapter; substitutable in tests.
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// All commits in the repository since `since`, newest first. Bounded by
    /// the adapter's page ceiling.
    async fn list_commits(
        &self,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitRecord>, SignalError>;

    /// Total commits in the repository across all contributors.
    async fn total_repo_commits(&self, repo: &str) -> Result<u64, SignalError>;
}

/// GPG-signature counts over the sampled matched commits. Reported as
/// detail; never an authenticity gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignatureSummary {
    pub total_checked: usize,
    pub signed_commits: usize,
    pub verified_signatures: usize,
    pub signature_rate: f64,
    pub verification_rate: f64,
}

/// Authorship verdict for one (repository, claimed identity) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipVerdict {
    pub user_commit_count: u64,
    pub total_repo_commit_count: u64,
    /// Share of repository commits attributable to the claimed author, 0–100.
    pub ownership_score: u32,
    /// Recent-activity level, saturating at 10 commits in 90 days, 0–100.
    pub activity_score: u32,
    /// Spread of commits across ISO weeks of the year, 0–100.
    pub consistency_score: u32,
    pub is_authentic: bool,
    pub first_commit_at: Option<DateTime<Utc>>,
    pub last_commit_at: Option<DateTime<Utc>>,
    /// Matched commits per day over the lookback year.
    pub commit_frequency: f64,
    /// True when the contributor-stats fetch failed and the neutral 50%
    /// fallback produced `ownership_score`.
    pub stats_fallback: bool,
    pub signatures: SignatureSummary,
}

impl OwnershipVerdict {
    /// The fail-closed verdict: no evidence, no authenticity.
    pub fn unverified() -> Self {
        OwnershipVerdict {
            user_commit_count: 0,
            total_repo_commit_count: 0,
            ownership_score: 0,
            activity_score: 0,
            consistency_score: 0,
            is_authentic: false,
            first_commit_at: None,
            last_commit_at: None,
            commit_frequency: 0.0,
            stats_fallback: false,
            signatures: SignatureSummary::default(),
        }
    }
}

/// Commit-pattern verifier over an injected [`CommitSource`].
pub struct OwnershipVerifier {
    commits: Arc<dyn CommitSource>,
    policy: AuthenticityPolicy,
    lookback_days: i64,
}

impl OwnershipVerifier {
    pub fn new(commits: Arc<dyn CommitSource>, policy: AuthenticityPolicy) -> Self {
        OwnershipVerifier {
            commits,
            policy,
            lookback_days: 365,
        }
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Verify the claimed author against the repository's commit history.
    ///
    /// Absence of evidence is encoded as data: this never returns an error.
    pub async fn verify(&self, repo: &str, claimed_username: &str) -> OwnershipVerdict {
        let now = Utc::now();
        self.verify_at(repo, claimed_username, now).await
    }

    /// As [`verify`](Self::verify), with an explicit clock for tests.
    pub async fn verify_at(
        &self,
        repo: &str,
        claimed_username: &str,
        now: DateTime<Utc>,
    ) -> OwnershipVerdict {
        let since = now - Duration::days(self.lookback_days);

        let all_commits = match self.commits.list_commits(repo, since).await {
            Ok(commits) => commits,
            Err(e) => {
                warn!(repo, error = %e, "commit fetch failed, failing closed");
                return OwnershipVerdict::unverified();
            }
        };

        let matched: Vec<&CommitRecord> = all_commits
            .iter()
            .filter(|c| identity_matches(c, claimed_username))
            .collect();

        debug!(
            repo,
            total = all_commits.len(),
            matched = matched.len(),
            "partitioned commits by claimed identity"
        );

        if matched.is_empty() {
            return OwnershipVerdict::unverified();
        }

        let user_commit_count = matched.len() as u64;
        let dates: Vec<DateTime<Utc>> = matched.iter().map(|c| c.authored_at).collect();

        let consistency_score = consistency_score(&dates);
        let activity_score = activity_score(&dates, now);

        let (ownership_score, total_repo_commit_count, stats_fallback) =
            match self.commits.total_repo_commits(repo).await {
                Ok(total) => (ownership_share(user_commit_count, total), total, false),
                Err(e) => {
                    warn!(repo, error = %e, "contributor stats unavailable, using neutral share");
                    (50, user_commit_count, true)
                }
            };

        let is_authentic = user_commit_count >= self.policy.min_matched_commits
            && consistency_score >= self.policy.min_consistency
            && ownership_score >= self.policy.min_ownership;

        OwnershipVerdict {
            user_commit_count,
            total_repo_commit_count,
            ownership_score,
            activity_score,
            consistency_score,
            is_authentic,
            first_commit_at: dates.iter().min().copied(),
            last_commit_at: dates.iter().max().copied(),
            commit_frequency: user_commit_count as f64 / self.lookback_days.max(1) as f64,
            stats_fallback,
            signatures: signature_summary(&matched),
        }
    }
}

/// Case-insensitive match on either the platform login or the free-text
/// commit author name. Both are checked because local git config and the
/// platform account routinely diverge.
fn identity_matches(commit: &CommitRecord, claimed: &str) -> bool {
    if commit.author_name.eq_ignore_ascii_case(claimed) {
        return true;
    }
    commit
        .author_login
        .as_deref()
        .is_some_and(|login| login.eq_ignore_ascii_case(claimed))
}

/// Spread of commits across distinct ISO weeks, saturating at a full year.
///
/// Rewards work spread over time against a single dumped burst faking
/// history. Weeks are keyed by (ISO year, week) so a lookback window
/// spanning New Year cannot alias week numbers.
pub fn consistency_score(dates: &[DateTime<Utc>]) -> u32 {
    if dates.len() < 2 {
        return 0;
    }
    let weeks: HashSet<(i32, u32)> = dates
        .iter()
        .map(|d| {
            let iso = d.iso_week();
            (iso.year(), iso.week())
        })
        .collect();
    let raw = 100.0 * weeks.len() as f64 / CONSISTENCY_SATURATION;
    (raw.round() as u32).min(100)
}

/// Recent-activity level, saturating at ten commits in the last 90 days.
pub fn activity_score(dates: &[DateTime<Utc>], now: DateTime<Utc>) -> u32 {
    let cutoff = now - Duration::days(ACTIVITY_WINDOW_DAYS);
    let recent = dates.iter().filter(|d| **d >= cutoff).count();
    let raw = 100.0 * recent as f64 / ACTIVITY_SATURATION;
    (raw.round() as u32).min(100)
}

/// Contribution share as a percentage of total repository commits.
pub fn ownership_share(user_commits: u64, total_commits: u64) -> u32 {
    if total_commits == 0 {
        return 0;
    }
    let raw = 100.0 * user_commits as f64 / total_commits as f64;
    (raw.round() as u32).min(100)
}

fn signature_summary(matched: &[&CommitRecord]) -> SignatureSummary {
    let sample = &matched[..matched.len().min(SIGNATURE_SAMPLE)];
    let signed = sample.iter().filter(|c| c.has_signature).count();
    let verified = sample.iter().filter(|c| c.signature_verified).count();
    SignatureSummary {
        total_checked: sample.len(),
        signed_commits: signed,
        verified_signatures: verified,
        signature_rate: if sample.is_empty() {
            0.0
        } else {
            100.0 * signed as f64 / sample.len() as f64
        },
        verification_rate: if signed == 0 {
            0.0
        } else {
            100.0 * verified as f64 / signed as f64
        },
    }
}
