//! Risk report generation
//!
//! Turns a [`TrustResult`] plus raw evidence counts into the human-facing
//! report: named risk and positive factors, a fraud-likelihood estimate,
//! milestone credibility, investment readiness, and recommendations. All
//! message text lives in the lookup tables; the builder only selects rows.

use serde::{Deserialize, Serialize};

use crate::aggregate::{ConfidenceTier, RiskTier, TrustResult};
use crate::signal::SignalCategory;

/// Category score below this raises a risk factor.
const RISK_FLOOR: f64 = 50.0;

/// Category score at or above this earns a positive factor.
const POSITIVE_FLOOR: f64 = 80.0;

/// Overall score below this adds a general improvement recommendation.
const IMPROVEMENT_FLOOR: f64 = 80.0;

/// Spread between best and worst category that flags inconsistency.
const CONSISTENCY_SPREAD: f64 = 40.0;

/// Fraud likelihood above this adds a critical factor to the report.
const FRAUD_ALERT: f64 = 70.0;

/// Fraud-likelihood contributions: `(category, score_below, points)`.
const FRAUD_TABLE: &[(SignalCategory, f64, f64)] = &[
    (SignalCategory::Documents, 30.0, 30.0),
    (SignalCategory::OnChain, 20.0, 40.0),
    (SignalCategory::Code, 20.0, 30.0),
];

/// Milestone-credibility deductions.
const FEW_TRANSACTIONS_FLOOR: u64 = 10;
const FEW_TRANSACTIONS_PENALTY: f64 = 20.0;
const FEW_COMMITS_FLOOR: u64 = 50;
const FEW_COMMITS_PENALTY: f64 = 15.0;
const FEW_CONTRIBUTORS_FLOOR: u64 = 2;
const FEW_CONTRIBUTORS_PENALTY: f64 = 15.0;

/// Per-category risk rows: severity is part of the table, never computed
/// from how far below the floor the score fell.
const RISK_MESSAGES: &[(SignalCategory, Severity, &str)] = &[
    (
        SignalCategory::Documents,
        Severity::High,
        "Documentation is thin or incomplete",
    ),
    (
        SignalCategory::OnChain,
        Severity::High,
        "Little verifiable on-chain activity",
    ),
    (
        SignalCategory::Code,
        Severity::Medium,
        "Weak or unverified development activity",
    ),
    (
        SignalCategory::Media,
        Severity::High,
        "Media authenticity could not be established",
    ),
    (
        SignalCategory::Governance,
        Severity::Medium,
        "Governance transparency is lacking",
    ),
    (
        SignalCategory::Social,
        Severity::Low,
        "Minimal community presence",
    ),
    (
        SignalCategory::Achievements,
        Severity::Low,
        "No verifiable achievements",
    ),
];

const POSITIVE_MESSAGES: &[(SignalCategory, &str)] = &[
    (SignalCategory::Documents, "Thorough, well-structured documentation"),
    (SignalCategory::OnChain, "Strong verifiable on-chain track record"),
    (SignalCategory::Code, "Healthy, actively developed codebase"),
    (SignalCategory::Media, "Media passed authenticity checks"),
    (SignalCategory::Governance, "Transparent governance practices"),
    (SignalCategory::Social, "Engaged community following"),
    (SignalCategory::Achievements, "Verified awards and achievements"),
];

const CATEGORY_RECOMMENDATIONS: &[(SignalCategory, &str)] = &[
    (
        SignalCategory::Documents,
        "Request a complete pitch deck, whitepaper, and financial model",
    ),
    (
        SignalCategory::OnChain,
        "Ask for the project's primary wallet addresses and verify activity independently",
    ),
    (
        SignalCategory::Code,
        "Verify repository ownership and review recent commit history",
    ),
    (
        SignalCategory::Media,
        "Request original, unedited media with provenance metadata",
    ),
    (
        SignalCategory::Governance,
        "Ask for governance documentation and voting records",
    ),
    (
        SignalCategory::Social,
        "Cross-check community channels for organic engagement",
    ),
    (
        SignalCategory::Achievements,
        "Ask for verifiable certificates from the issuing organizations",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: Option<SignalCategory>,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositiveFactor {
    pub category: SignalCategory,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentReadiness {
    Ready,
    NearlyReady,
    NotReady,
    NotSuitable,
}

impl InvestmentReadiness {
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score >= 75.0 {
            InvestmentReadiness::Ready
        } else if overall_score >= 60.0 {
            InvestmentReadiness::NearlyReady
        } else if overall_score >= 40.0 {
            InvestmentReadiness::NotReady
        } else {
            InvestmentReadiness::NotSuitable
        }
    }
}

/// Raw evidence counts the report needs beyond the scored categories.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RawEvidence {
    pub transaction_count: u64,
    pub total_commits: u64,
    pub contributors: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub risk_factors: Vec<RiskFactor>,
    pub positive_factors: Vec<PositiveFactor>,
    pub recommendations: Vec<String>,
    /// 0–100 estimate; heuristic, not an accusation.
    pub fraud_likelihood: f64,
    /// 0–100, deductions for thin raw evidence.
    pub milestone_credibility: f64,
    pub investment_readiness: InvestmentReadiness,
}

fn category_score(result: &TrustResult, category: SignalCategory) -> Option<f64> {
    result
        .breakdown
        .iter()
        .find(|b| b.category == category)
        .map(|b| b.score)
}

/// Fraud likelihood from the weakest hard-evidence categories, capped at 100.
pub fn fraud_likelihood(result: &TrustResult) -> f64 {
    let mut likelihood = 0.0;
    for &(category, floor, points) in FRAUD_TABLE {
        if let Some(score) = category_score(result, category) {
            if score < floor {
                likelihood += points;
            }
        }
    }
    likelihood.min(100.0)
}

/// Credibility of claimed milestones given raw activity counts.
pub fn milestone_credibility(evidence: &RawEvidence) -> f64 {
    let mut credibility = 100.0;
    if evidence.transaction_count < FEW_TRANSACTIONS_FLOOR {
        credibility -= FEW_TRANSACTIONS_PENALTY;
    }
    if evidence.total_commits < FEW_COMMITS_FLOOR {
        credibility -= FEW_COMMITS_PENALTY;
    }
    if evidence.contributors < FEW_CONTRIBUTORS_FLOOR {
        credibility -= FEW_CONTRIBUTORS_PENALTY;
    }
    credibility.max(0.0)
}

/// Build the full report for one aggregated result.
pub fn build_report(result: &TrustResult, evidence: &RawEvidence) -> RiskReport {
    let mut risk_factors = Vec::new();
    let mut positive_factors = Vec::new();
    let mut recommendations = Vec::new();

    for row in &result.breakdown {
        if row.score < RISK_FLOOR {
            let (severity, message) = RISK_MESSAGES
                .iter()
                .find(|(category, _, _)| *category == row.category)
                .map(|&(_, severity, message)| (severity, message))
                .unwrap_or((Severity::Medium, "Category scored below the risk floor"));
            risk_factors.push(RiskFactor {
                category: Some(row.category),
                severity,
                message: message.to_string(),
            });
            if let Some((_, recommendation)) = CATEGORY_RECOMMENDATIONS
                .iter()
                .find(|(category, _)| *category == row.category)
            {
                recommendations.push(recommendation.to_string());
            }
        } else if row.score >= POSITIVE_FLOOR {
            let message = POSITIVE_MESSAGES
                .iter()
                .find(|(category, _)| *category == row.category)
                .map(|(_, message)| *message)
                .unwrap_or("Category scored strongly");
            positive_factors.push(PositiveFactor {
                category: row.category,
                message: message.to_string(),
            });
        }
    }

    if !result.breakdown.is_empty() {
        let max = result.breakdown.iter().map(|b| b.score).fold(f64::MIN, f64::max);
        let min = result.breakdown.iter().map(|b| b.score).fold(f64::MAX, f64::min);
        if max - min > CONSISTENCY_SPREAD {
            risk_factors.push(RiskFactor {
                category: None,
                severity: Severity::Medium,
                message: format!(
                    "Inconsistent evidence: category scores spread {:.0} points apart",
                    max - min
                ),
            });
        }
    }

    let fraud = fraud_likelihood(result);
    if fraud > FRAUD_ALERT {
        risk_factors.push(RiskFactor {
            category: None,
            severity: Severity::Critical,
            message: format!("Elevated fraud likelihood ({fraud:.0}/100)"),
        });
    }

    if result.overall_score < IMPROVEMENT_FLOOR {
        recommendations.push(
            "Improve documentation and on-chain transparency to strengthen the overall picture"
                .to_string(),
        );
    }

    if result.confidence_tier == ConfidenceTier::Low {
        recommendations.push(
            "Evidence sources disagree strongly; gather more data before relying on this score"
                .to_string(),
        );
    }

    match result.risk_tier {
        RiskTier::Critical => recommendations.insert(
            0,
            "Do not proceed without independent verification of every claim".to_string(),
        ),
        RiskTier::High => recommendations.insert(
            0,
            "Proceed only after resolving the flagged risk factors".to_string(),
        ),
        RiskTier::Medium => {
            recommendations.push("Address the flagged gaps before a funding decision".to_string())
        }
        RiskTier::Low => {
            if recommendations.is_empty() {
                recommendations
                    .push("Evidence is consistent; standard due diligence applies".to_string());
            }
        }
    }

    RiskReport {
        risk_factors,
        positive_factors,
        recommendations,
        fraud_likelihood: fraud,
        milestone_credibility: milestone_credibility(evidence),
        investment_readiness: InvestmentReadiness::from_score(result.overall_score),
    }
}
