//! Analysis orchestration
//!
//! Runs every signal fetch concurrently under one per-signal timeout, scores
//! each category, and folds the results through the aggregator and the report
//! builder. The pipeline never aborts on a failed signal: a fetch that errors
//! or times out degrades that one category to the neutral default and the
//! analysis completes with the evidence that did arrive.

use std::sync::Arc;

use serde::Serialize;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::aggregate::{AnalysisContext, TrustAggregator, TrustResult};
use crate::config::{AdapterConfig, AggregationProfile};
use crate::error::{AnalysisResult, SignalError};
use crate::fingerprint;
use crate::ownership::{CommitSource, OwnershipVerdict, OwnershipVerifier};
use crate::report::{build_report, RawEvidence, RiskReport};
use crate::scoring;
use crate::signal::certificates::{achievement_score, analyze_certificates};
use crate::signal::github::CodeHost;
use crate::signal::{
    unavailable, BlobStore, CertificateReader, CertificateSummary, GovernanceSnapshot,
    LedgerSource, MediaFileCheck, RepoMetrics, SignalCategory, SignalResult, SocialSnapshot,
    WalletActivity,
};

/// Everything a caller submits for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct ProjectInputs {
    pub project_name: String,
    pub bundle_id: String,
    /// Code-host username or author name the founder claims.
    pub claimed_author: String,
    /// `owner/name` repository slug, when one was submitted.
    pub repository: Option<String>,
    pub wallet_address: Option<String>,
    pub certificate_blob_ids: Vec<String>,
    pub social: Option<SocialSnapshot>,
    pub governance: Option<GovernanceSnapshot>,
    pub media: Vec<MediaFileCheck>,
}

/// The injected collaborator set. Callers without a capability plug in the
/// matching stand-in from [`unavailable`].
#[derive(Clone)]
pub struct Adapters {
    pub code_host: Arc<dyn CodeHost>,
    pub commits: Arc<dyn CommitSource>,
    pub ledger: Arc<dyn LedgerSource>,
    pub documents: Arc<dyn BlobStore>,
    pub certificates: Arc<dyn CertificateReader>,
}

impl Adapters {
    /// A full set of explicit stand-ins; every category degrades to neutral.
    pub fn none() -> Self {
        Adapters {
            code_host: Arc::new(unavailable::NoCodeHost),
            commits: Arc::new(unavailable::NoCodeHost),
            ledger: Arc::new(unavailable::NoLedger),
            documents: Arc::new(unavailable::NoBlobStore),
            certificates: Arc::new(unavailable::NoCertificateReader),
        }
    }
}

/// Complete outcome of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectAnalysis {
    pub result: TrustResult,
    pub report: RiskReport,
    pub ownership: Option<OwnershipVerdict>,
    /// Attestation digest, present when a repository was verified.
    pub verification_fingerprint: Option<String>,
    pub certificates: Option<CertificateSummary>,
}

pub struct TrustAnalyzer {
    adapters: Adapters,
    profile: AggregationProfile,
    config: AdapterConfig,
    aggregator: TrustAggregator,
}

impl TrustAnalyzer {
    pub fn new(adapters: Adapters, profile: AggregationProfile, config: AdapterConfig) -> Self {
        TrustAnalyzer {
            adapters,
            profile,
            config,
            aggregator: TrustAggregator::new(),
        }
    }

    /// Run the full pipeline for one submission.
    pub async fn analyze(&self, inputs: &ProjectInputs) -> AnalysisResult<ProjectAnalysis> {
        let context = AnalysisContext::now(&inputs.project_name, &inputs.bundle_id);
        info!(
            project = %context.project_name,
            profile = self.profile.name(),
            "starting analysis"
        );

        let (metrics, ownership, wallet, documents, certificates) = tokio::join!(
            self.fetch_repo_metrics(inputs),
            self.verify_ownership(inputs),
            self.fetch_wallet(inputs),
            self.fetch_documents(inputs),
            self.read_certificates(inputs),
        );

        let signals = self.build_signals(
            inputs,
            metrics.as_ref(),
            ownership.as_ref(),
            wallet.as_ref(),
            documents.as_deref(),
            certificates.as_ref(),
        );

        let result = self.aggregator.aggregate(&signals, &self.profile, &context)?;

        let evidence = RawEvidence {
            transaction_count: wallet.as_ref().map(|w| w.transaction_count).unwrap_or(0),
            total_commits: ownership
                .as_ref()
                .map(|v| v.total_repo_commit_count)
                .unwrap_or(0),
            contributors: metrics.as_ref().map(|m| m.contributors).unwrap_or(0),
        };
        let report = build_report(&result, &evidence);

        let verification_fingerprint = match (&ownership, &inputs.repository) {
            (Some(_), Some(repo)) => Some(fingerprint::verification_fingerprint(
                &inputs.project_name,
                &inputs.claimed_author,
                repo,
                certificates
                    .as_ref()
                    .map(|s| s.average_authenticity)
                    .unwrap_or(0.0),
                result.overall_score,
            )),
            _ => None,
        };

        info!(
            project = %inputs.project_name,
            overall_score = result.overall_score,
            risk = %result.risk_tier,
            "analysis complete"
        );

        Ok(ProjectAnalysis {
            result,
            report,
            ownership,
            verification_fingerprint,
            certificates,
        })
    }

    async fn fetch_repo_metrics(&self, inputs: &ProjectInputs) -> Option<RepoMetrics> {
        let repo = inputs.repository.as_deref()?;
        match timeout(
            self.config.signal_timeout,
            self.adapters.code_host.repo_metrics(repo),
        )
        .await
        {
            Ok(Ok(metrics)) => Some(metrics),
            Ok(Err(e)) => {
                log_signal_failure("code", &e);
                None
            }
            Err(_) => {
                log_signal_failure("code", &SignalError::Timeout(self.config.signal_timeout));
                None
            }
        }
    }

    async fn verify_ownership(&self, inputs: &ProjectInputs) -> Option<OwnershipVerdict> {
        let repo = inputs.repository.as_deref()?;
        if inputs.claimed_author.is_empty() {
            return None;
        }
        let verifier = OwnershipVerifier::new(
            Arc::clone(&self.adapters.commits),
            self.profile.authenticity,
        )
        .with_lookback_days(self.config.lookback_days);

        match timeout(
            self.config.signal_timeout,
            verifier.verify(repo, &inputs.claimed_author),
        )
        .await
        {
            Ok(verdict) => Some(verdict),
            Err(_) => {
                log_signal_failure("ownership", &SignalError::Timeout(self.config.signal_timeout));
                None
            }
        }
    }

    async fn fetch_wallet(&self, inputs: &ProjectInputs) -> Option<WalletActivity> {
        let address = inputs.wallet_address.as_deref()?;
        match timeout(
            self.config.signal_timeout,
            self.adapters.ledger.wallet_activity(address),
        )
        .await
        {
            Ok(Ok(activity)) => Some(activity),
            Ok(Err(e)) => {
                log_signal_failure("on_chain", &e);
                None
            }
            Err(_) => {
                log_signal_failure("on_chain", &SignalError::Timeout(self.config.signal_timeout));
                None
            }
        }
    }

    async fn fetch_documents(
        &self,
        inputs: &ProjectInputs,
    ) -> Option<Vec<crate::signal::DocumentMetrics>> {
        match timeout(
            self.config.signal_timeout,
            self.adapters.documents.document_metrics(&inputs.bundle_id),
        )
        .await
        {
            Ok(Ok(documents)) => Some(documents),
            Ok(Err(e)) => {
                log_signal_failure("documents", &e);
                None
            }
            Err(_) => {
                log_signal_failure("documents", &SignalError::Timeout(self.config.signal_timeout));
                None
            }
        }
    }

    async fn read_certificates(&self, inputs: &ProjectInputs) -> Option<CertificateSummary> {
        if inputs.certificate_blob_ids.is_empty() {
            return None;
        }
        match timeout(
            self.config.signal_timeout,
            analyze_certificates(
                self.adapters.certificates.as_ref(),
                &inputs.certificate_blob_ids,
            ),
        )
        .await
        {
            Ok(summary) if summary.total_certificates > 0 => Some(summary),
            Ok(_) => None,
            Err(_) => {
                log_signal_failure("achievements", &SignalError::Timeout(self.config.signal_timeout));
                None
            }
        }
    }

    fn build_signals(
        &self,
        inputs: &ProjectInputs,
        metrics: Option<&RepoMetrics>,
        ownership: Option<&OwnershipVerdict>,
        wallet: Option<&WalletActivity>,
        documents: Option<&[crate::signal::DocumentMetrics]>,
        certificates: Option<&CertificateSummary>,
    ) -> Vec<SignalResult> {
        self.profile
            .weights()
            .iter()
            .map(|row| match row.category {
                SignalCategory::Documents => match documents {
                    Some(docs) => scoring::score_documents(docs)
                        .into_signal(row.category, serde_json::Value::Null),
                    None => SignalResult::neutral(row.category, "document bundle unavailable"),
                },
                SignalCategory::OnChain => match wallet {
                    Some(activity) => scoring::score_wallet(activity).into_signal(
                        row.category,
                        serde_json::to_value(activity).unwrap_or_default(),
                    ),
                    None => SignalResult::neutral(row.category, "wallet activity unavailable"),
                },
                SignalCategory::Code => {
                    if metrics.is_none() && ownership.is_none() {
                        SignalResult::neutral(row.category, "code evidence unavailable")
                    } else {
                        scoring::score_code(metrics, ownership).into_signal(
                            row.category,
                            serde_json::to_value(metrics).unwrap_or_default(),
                        )
                    }
                }
                SignalCategory::Media => scoring::score_media(&inputs.media)
                    .into_signal(row.category, serde_json::Value::Null),
                SignalCategory::Governance => match &inputs.governance {
                    Some(snapshot) => scoring::score_governance(snapshot)
                        .into_signal(row.category, serde_json::Value::Null),
                    None => SignalResult::neutral(row.category, "no governance metadata supplied"),
                },
                SignalCategory::Social => match &inputs.social {
                    Some(snapshot) => scoring::score_social(snapshot)
                        .into_signal(row.category, serde_json::Value::Null),
                    None => SignalResult::neutral(row.category, "no social metadata supplied"),
                },
                SignalCategory::Achievements => {
                    if certificates.is_none() && ownership.is_none() {
                        SignalResult::neutral(row.category, "no achievement evidence supplied")
                    } else {
                        let blended = achievement_score(certificates, ownership);
                        scoring::score_achievements(&blended, certificates).into_signal(
                            row.category,
                            serde_json::to_value(&blended).unwrap_or_default(),
                        )
                    }
                }
            })
            .collect()
    }
}

fn log_signal_failure(signal: &str, error: &SignalError) {
    match error {
        SignalError::Unavailable(reason) => {
            info!(signal, reason = %reason, "signal source not configured")
        }
        SignalError::Timeout(budget) => {
            warn!(signal, budget_secs = budget.as_secs(), "signal fetch timed out")
        }
        other => warn!(signal, error = %other, "signal fetch failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::RiskTier;

    #[tokio::test]
    async fn test_analysis_completes_with_no_adapters() {
        let analyzer = TrustAnalyzer::new(
            Adapters::none(),
            AggregationProfile::diligence(),
            AdapterConfig::default(),
        );
        let inputs = ProjectInputs {
            project_name: "nova".to_string(),
            bundle_id: "bundle-7".to_string(),
            claimed_author: "ada".to_string(),
            ..Default::default()
        };

        let analysis = analyzer.analyze(&inputs).await.unwrap();
        // Every category at the neutral 50.
        assert!((analysis.result.overall_score - 50.0).abs() < 1e-9);
        assert_eq!(analysis.result.risk_tier, RiskTier::High);
        assert!(analysis.ownership.is_none());
        assert!(analysis.verification_fingerprint.is_none());
    }

    #[tokio::test]
    async fn test_neutral_categories_carry_reasons() {
        let analyzer = TrustAnalyzer::new(
            Adapters::none(),
            AggregationProfile::realtime(),
            AdapterConfig::default(),
        );
        let inputs = ProjectInputs {
            project_name: "nova".to_string(),
            bundle_id: "bundle-7".to_string(),
            ..Default::default()
        };

        let analysis = analyzer.analyze(&inputs).await.unwrap();
        let social = analysis
            .result
            .breakdown
            .iter()
            .find(|b| b.category == SignalCategory::Social)
            .unwrap();
        assert_eq!(social.score, 50.0);
        assert!(social.findings[0].contains("no social metadata"));
    }
}
