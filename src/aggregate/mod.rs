//! Trust aggregation
//!
//! Folds per-category signal results into one weighted overall score, a risk
//! tier from the profile's cut points, and a confidence tier derived from how
//! much the categories disagree. The aggregator is pure: adapters have
//! already run, and a [`TrustResult`] is complete and immutable once built,
//! fingerprint included.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::AggregationProfile;
use crate::error::AnalysisError;
use crate::fingerprint;
use crate::signal::{SignalCategory, SignalResult};

/// Category-score variance below this is a high-agreement analysis.
const VARIANCE_HIGH_AGREEMENT: f64 = 100.0;

/// Variance below this is moderate agreement; anything above is low.
const VARIANCE_MODERATE_AGREEMENT: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much the category scores agree with the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Population variance of category scores around the overall score.
    pub fn from_variance(variance: f64) -> Self {
        if variance < VARIANCE_HIGH_AGREEMENT {
            ConfidenceTier::High
        } else if variance < VARIANCE_MODERATE_AGREEMENT {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

/// Identity of the submission being analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub project_name: String,
    pub bundle_id: String,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisContext {
    pub fn now(project_name: impl Into<String>, bundle_id: impl Into<String>) -> Self {
        AnalysisContext {
            project_name: project_name.into(),
            bundle_id: bundle_id.into(),
            generated_at: Utc::now(),
        }
    }
}

/// One category's contribution to the overall score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub category: SignalCategory,
    /// Category score, 0–100.
    pub score: f64,
    /// Profile weight as a percentage.
    pub weight_pct: f64,
    /// `score * weight`, the points this category adds to the overall.
    pub contribution: f64,
    pub confidence: f64,
    pub findings: Vec<String>,
}

/// Complete, immutable outcome of one aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustResult {
    pub analysis_id: Uuid,
    pub project_name: String,
    pub bundle_id: String,
    pub profile: String,
    /// Weighted overall score, 0–100.
    pub overall_score: f64,
    pub risk_tier: RiskTier,
    pub confidence_tier: ConfidenceTier,
    /// Population variance behind the confidence tier.
    pub score_variance: f64,
    /// Weighted mean of the per-signal confidences, 0–1.
    pub confidence: f64,
    pub breakdown: Vec<BreakdownRow>,
    pub fingerprint: String,
    pub generated_at: DateTime<Utc>,
}

/// Folds signals into a [`TrustResult`] under one profile.
#[derive(Debug, Clone, Default)]
pub struct TrustAggregator;

impl TrustAggregator {
    pub fn new() -> Self {
        TrustAggregator
    }

    /// Aggregate one signal per profile category.
    ///
    /// Every category the profile weights must be present: the analyzer fills
    /// failed signals with the neutral default before calling this, so a
    /// missing category here is a pipeline bug, not missing evidence.
    pub fn aggregate(
        &self,
        signals: &[SignalResult],
        profile: &AggregationProfile,
        context: &AnalysisContext,
    ) -> Result<TrustResult, AnalysisError> {
        let mut breakdown = Vec::with_capacity(profile.weights().len());
        let mut overall = 0.0;
        let mut confidence = 0.0;

        for row in profile.weights() {
            let signal = signals
                .iter()
                .find(|s| s.category == row.category)
                .ok_or_else(|| {
                    AnalysisError::internal(format!(
                        "profile '{}' weights category '{}' but no signal was supplied",
                        profile.name(),
                        row.category
                    ))
                })?;

            let score = signal.score.clamp(0.0, 100.0);
            let contribution = score * row.weight;
            overall += contribution;
            confidence += signal.confidence.clamp(0.0, 1.0) * row.weight;

            breakdown.push(BreakdownRow {
                category: row.category,
                score,
                weight_pct: row.weight * 100.0,
                contribution,
                confidence: signal.confidence,
                findings: signal.findings.clone(),
            });
        }

        let overall = overall.clamp(0.0, 100.0);
        let variance = population_variance(&breakdown, overall);
        let risk_tier = profile.risk_tier(overall);
        let confidence_tier = ConfidenceTier::from_variance(variance);

        let fingerprint = fingerprint::analysis_fingerprint(
            &context.project_name,
            &context.bundle_id,
            overall,
            breakdown.iter().map(|b| (b.category, b.score)),
            context.generated_at,
        );

        info!(
            project = %context.project_name,
            profile = profile.name(),
            overall_score = overall,
            risk = %risk_tier,
            "aggregated trust score"
        );

        Ok(TrustResult {
            analysis_id: Uuid::new_v4(),
            project_name: context.project_name.clone(),
            bundle_id: context.bundle_id.clone(),
            profile: profile.name().to_string(),
            overall_score: overall,
            risk_tier,
            confidence_tier,
            score_variance: variance,
            confidence,
            breakdown,
            fingerprint,
            generated_at: context.generated_at,
        })
    }
}

fn population_variance(breakdown: &[BreakdownRow], overall: f64) -> f64 {
    if breakdown.is_empty() {
        return 0.0;
    }
    breakdown
        .iter()
        .map(|b| (b.score - overall).powi(2))
        .sum::<f64>()
        / breakdown.len() as f64
}
