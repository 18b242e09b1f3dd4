//! Code-host adapter
//!
//! Fetches repository health metrics and commit history from a
//! GitHub-compatible REST API and normalizes them for the scorers and the
//! ownership verifier. Pagination is bounded by a hard page ceiling: the
//! worst-case API cost per analysis is a policy constant, not a function of
//! repository size.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::AdapterConfig;
use crate::error::{ConfigError, SignalError};
use crate::ownership::{CommitRecord, CommitSource};

/// Commits fetched per page.
const COMMITS_PER_PAGE: usize = 100;

/// Hard ceiling on commit pages per verification call.
const MAX_COMMIT_PAGES: usize = 10;

/// Repository health snapshot consumed by the code category scorer.
#[derive(Debug, Clone, Default, serde::Serialize, Deserialize)]
pub struct RepoMetrics {
    pub full_name: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    /// Commits seen in the most recent sampled page.
    pub commits_sampled: u64,
    /// Sampled commits authored within the last 90 days.
    pub recent_commits_90d: u64,
    pub contributors: u64,
    pub has_license: bool,
    pub language: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Repository-metrics side of the code host.
#[async_trait]
pub trait CodeHost: Send + Sync {
    async fn repo_metrics(&self, repo: &str) -> Result<RepoMetrics, SignalError>;
}

/// REST adapter for the code host. One instance per analysis run or shared;
/// it holds no per-analysis state.
pub struct GithubAdapter {
    client: Client,
    base: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepo {
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    license: Option<serde_json::Value>,
    language: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    sha: String,
    commit: RawCommitInner,
    author: Option<RawAccount>,
}

#[derive(Debug, Deserialize)]
struct RawCommitInner {
    author: RawCommitAuthor,
    #[serde(default)]
    verification: Option<RawVerification>,
}

#[derive(Debug, Deserialize)]
struct RawCommitAuthor {
    name: String,
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawVerification {
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    verified: bool,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawContributorStat {
    total: u64,
}

impl GithubAdapter {
    pub fn new(config: &AdapterConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent("trust-engine")
            .build()
            .map_err(|e| ConfigError::AdapterSetting {
                name: "http_timeout".to_string(),
                reason: e.to_string(),
            })?;

        Ok(GithubAdapter {
            client,
            base: config.code_host_base.trim_end_matches('/').to_string(),
            token: config.code_host_token.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, SignalError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SignalError::Malformed(format!(
                "code host error {status} for {url}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            SignalError::Malformed(format!(
                "failed to parse response from {url}: {e}. First 200 chars: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }
}

fn to_commit_record(raw: RawCommit) -> CommitRecord {
    let verification = raw.commit.verification;
    let (has_signature, signature_verified) = match verification {
        Some(v) => (v.signature.is_some(), v.verified),
        None => (false, false),
    };
    CommitRecord {
        sha: raw.sha,
        author_login: raw.author.map(|a| a.login),
        author_name: raw.commit.author.name,
        authored_at: raw.commit.author.date,
        has_signature,
        signature_verified,
    }
}

#[async_trait]
impl CodeHost for GithubAdapter {
    async fn repo_metrics(&self, repo: &str) -> Result<RepoMetrics, SignalError> {
        let repo_url = format!("{}/repos/{}", self.base, repo);
        let raw: RawRepo = self.get_json(&repo_url).await?;

        // One sampled page of commits is enough for the health metrics; the
        // ownership verifier does its own bounded walk.
        let commits_url = format!(
            "{}/repos/{}/commits?per_page={}",
            self.base, repo, COMMITS_PER_PAGE
        );
        let commits: Vec<RawCommit> = self.get_json(&commits_url).await?;

        let cutoff = Utc::now() - chrono::Duration::days(90);
        let recent = commits
            .iter()
            .filter(|c| c.commit.author.date >= cutoff)
            .count() as u64;

        let contributors_url = format!(
            "{}/repos/{}/contributors?per_page={}",
            self.base, repo, COMMITS_PER_PAGE
        );
        let contributors: Vec<RawAccount> = self.get_json(&contributors_url).await?;

        Ok(RepoMetrics {
            full_name: repo.to_string(),
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            open_issues: raw.open_issues_count,
            commits_sampled: commits.len() as u64,
            recent_commits_90d: recent,
            contributors: contributors.len() as u64,
            has_license: raw.license.is_some(),
            language: raw.language,
            last_update: raw.updated_at,
        })
    }
}

#[async_trait]
impl CommitSource for GithubAdapter {
    async fn list_commits(
        &self,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitRecord>, SignalError> {
        let mut all = Vec::new();

        for page in 1..=MAX_COMMIT_PAGES {
            let url = format!(
                "{}/repos/{}/commits?since={}&per_page={}&page={}",
                self.base,
                repo,
                since.to_rfc3339(),
                COMMITS_PER_PAGE,
                page
            );
            let page_commits: Vec<RawCommit> =
                self.get_json(&url).await?;

            let count = page_commits.len();
            debug!(repo, page, count, "fetched commit page");

            all.extend(page_commits.into_iter().map(to_commit_record));

            if count < COMMITS_PER_PAGE {
                break;
            }
        }

        Ok(all)
    }

    async fn total_repo_commits(&self, repo: &str) -> Result<u64, SignalError> {
        let url = format!("{}/repos/{}/stats/contributors", self.base, repo);
        let stats: Vec<RawContributorStat> =
            self.get_json(&url).await?;
        Ok(stats.iter().map(|s| s.total).sum())
    }
}
