//! Aggregation profiles and adapter configuration
//!
//! A profile fixes the category set, weights, and risk-tier cut points for
//! one aggregation pipeline. Two production profiles exist deliberately:
//! the investment-facing `diligence` profile is stricter than the advisory
//! `realtime` profile, and both are instances of the same engine so the cut
//! points cannot drift apart in parallel code paths.
//!
//! All validation happens here, at construction. Aggregation never checks
//! weights again.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aggregate::RiskTier;
use crate::error::ConfigError;
use crate::signal::SignalCategory;

/// Weight sums may carry float dust from literal arithmetic.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Thresholds a claimed author must clear for an authentic verdict.
///
/// All three must hold independently; a single weak axis fails authenticity
/// even when the others are strong. The defaults are deliberately lenient
/// around the contributor-stats fallback: callers wanting a stricter gate
/// raise these rather than the engine silently tightening them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthenticityPolicy {
    /// Minimum commits matched to the claimed identity.
    pub min_matched_commits: u64,
    /// Minimum consistency score (commit spread over the year), 0–100.
    pub min_consistency: u32,
    /// Minimum ownership score (share of repository commits), 0–100.
    pub min_ownership: u32,
}

impl Default for AuthenticityPolicy {
    fn default() -> Self {
        AuthenticityPolicy {
            min_matched_commits: 5,
            min_consistency: 50,
            min_ownership: 20,
        }
    }
}

/// One row of a profile: a category and its fixed weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub category: SignalCategory,
    pub weight: f64,
}

/// A validated aggregation profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationProfile {
    name: String,
    weights: Vec<CategoryWeight>,
    /// Descending `(minimum_score, tier)` cut points.
    risk_cuts: Vec<(f64, RiskTier)>,
    /// Tier assigned below the last cut point.
    risk_floor: RiskTier,
    pub authenticity: AuthenticityPolicy,
}

impl AggregationProfile {
    /// Build and validate a custom profile.
    pub fn new(
        name: impl Into<String>,
        weights: Vec<(SignalCategory, f64)>,
        risk_cuts: Vec<(f64, RiskTier)>,
        risk_floor: RiskTier,
    ) -> Result<Self, ConfigError> {
        let name = name.into();

        if weights.is_empty() {
            return Err(ConfigError::EmptyProfile { profile: name });
        }

        let mut seen = Vec::with_capacity(weights.len());
        let mut sum = 0.0;
        for &(category, weight) in &weights {
            if seen.contains(&category) {
                return Err(ConfigError::DuplicateCategory {
                    profile: name,
                    category,
                });
            }
            seen.push(category);
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::InvalidWeight {
                    profile: name,
                    category,
                    weight,
                });
            }
            sum += weight;
        }
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { profile: name, sum });
        }

        if risk_cuts.windows(2).any(|w| w[1].0 >= w[0].0) {
            return Err(ConfigError::TierOrder { profile: name });
        }

        Ok(AggregationProfile {
            name,
            weights: weights
                .into_iter()
                .map(|(category, weight)| CategoryWeight { category, weight })
                .collect(),
            risk_cuts,
            risk_floor,
            authenticity: AuthenticityPolicy::default(),
        })
    }

    /// Investment-facing 3-category profile: documents 40%, on-chain 40%,
    /// code 20%, with the stricter four-tier risk ladder.
    pub fn diligence() -> Self {
        AggregationProfile::new(
            "diligence",
            vec![
                (SignalCategory::Documents, 0.40),
                (SignalCategory::OnChain, 0.40),
                (SignalCategory::Code, 0.20),
            ],
            vec![
                (80.0, RiskTier::Low),
                (60.0, RiskTier::Medium),
                (40.0, RiskTier::High),
            ],
            RiskTier::Critical,
        )
        .expect("built-in diligence profile is valid")
    }

    /// Advisory 5-category profile used for live scoring.
    pub fn realtime() -> Self {
        AggregationProfile::new(
            "realtime",
            vec![
                (SignalCategory::Media, 0.30),
                (SignalCategory::Code, 0.20),
                (SignalCategory::Governance, 0.20),
                (SignalCategory::OnChain, 0.20),
                (SignalCategory::Social, 0.10),
            ],
            vec![(75.0, RiskTier::Low), (50.0, RiskTier::Medium)],
            RiskTier::High,
        )
        .expect("built-in realtime profile is valid")
    }

    /// 4-category profile that folds verified achievements into the
    /// diligence weighting.
    pub fn enhanced() -> Self {
        AggregationProfile::new(
            "enhanced",
            vec![
                (SignalCategory::Documents, 0.30),
                (SignalCategory::OnChain, 0.30),
                (SignalCategory::Code, 0.20),
                (SignalCategory::Achievements, 0.20),
            ],
            vec![
                (80.0, RiskTier::Low),
                (60.0, RiskTier::Medium),
                (40.0, RiskTier::High),
            ],
            RiskTier::Critical,
        )
        .expect("built-in enhanced profile is valid")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weights(&self) -> &[CategoryWeight] {
        &self.weights
    }

    pub fn weight_of(&self, category: SignalCategory) -> Option<f64> {
        self.weights
            .iter()
            .find(|w| w.category == category)
            .map(|w| w.weight)
    }

    /// Map an overall score to this profile's risk tier.
    pub fn risk_tier(&self, overall_score: f64) -> RiskTier {
        for &(cut, tier) in &self.risk_cuts {
            if overall_score >= cut {
                return tier;
            }
        }
        self.risk_floor
    }

    pub fn with_authenticity(mut self, policy: AuthenticityPolicy) -> Self {
        self.authenticity = policy;
        self
    }
}

/// Connection settings shared by the network adapters.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Code-host REST API base, e.g. `https://api.github.com`.
    pub code_host_base: String,
    /// Optional bearer token for the code host.
    pub code_host_token: Option<String>,
    /// Ledger JSON-RPC endpoint.
    pub ledger_rpc: String,
    /// Content-addressed blob aggregator base URL.
    pub blob_aggregator: String,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    /// Per-signal budget in the orchestration join.
    pub signal_timeout: Duration,
    /// How far back commit history is considered.
    pub lookback_days: i64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        AdapterConfig {
            code_host_base: "https://api.github.com".to_string(),
            code_host_token: None,
            ledger_rpc: "https://fullnode.testnet.sui.io:443".to_string(),
            blob_aggregator: "https://aggregator.walrus-testnet.walrus.space".to_string(),
            http_timeout: Duration::from_secs(30),
            signal_timeout: Duration::from_secs(45),
            lookback_days: 365,
        }
    }
}

impl AdapterConfig {
    /// Load a `.env` file when one exists, then read the environment.
    pub fn from_env_file() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        AdapterConfig::from_env()
    }

    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = AdapterConfig::default();

        if let Ok(base) = std::env::var("CODE_HOST_API") {
            config.code_host_base = base;
        }
        config.code_host_token = std::env::var("CODE_HOST_TOKEN").ok();
        if let Ok(rpc) = std::env::var("LEDGER_RPC") {
            config.ledger_rpc = rpc;
        }
        if let Ok(aggregator) = std::env::var("BLOB_AGGREGATOR") {
            config.blob_aggregator = aggregator;
        }
        if let Ok(raw) = std::env::var("SIGNAL_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::AdapterSetting {
                name: "SIGNAL_TIMEOUT_SECS".to_string(),
                reason: format!("'{raw}' is not a number of seconds"),
            })?;
            config.signal_timeout = Duration::from_secs(secs);
        }
        if let Ok(raw) = std::env::var("LOOKBACK_DAYS") {
            config.lookback_days = raw.parse().map_err(|_| ConfigError::AdapterSetting {
                name: "LOOKBACK_DAYS".to_string(),
                reason: format!("'{raw}' is not a number of days"),
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_validate() {
        for profile in [
            AggregationProfile::diligence(),
            AggregationProfile::realtime(),
            AggregationProfile::enhanced(),
        ] {
            let sum: f64 = profile.weights().iter().map(|w| w.weight).sum();
            assert!((sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE, "{}", profile.name());
        }
    }

    #[test]
    fn test_bad_weight_sum_rejected() {
        let err = AggregationProfile::new(
            "custom",
            vec![
                (SignalCategory::Documents, 0.5),
                (SignalCategory::Code, 0.4),
            ],
            vec![],
            RiskTier::High,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::WeightSum { .. }));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let err = AggregationProfile::new(
            "custom",
            vec![
                (SignalCategory::Code, 0.5),
                (SignalCategory::Code, 0.5),
            ],
            vec![],
            RiskTier::High,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCategory { .. }));
    }

    #[test]
    fn test_empty_profile_rejected() {
        let err =
            AggregationProfile::new("custom", vec![], vec![], RiskTier::High).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyProfile { .. }));
    }

    #[test]
    fn test_unordered_cuts_rejected() {
        let err = AggregationProfile::new(
            "custom",
            vec![(SignalCategory::Code, 1.0)],
            vec![(50.0, RiskTier::Medium), (80.0, RiskTier::Low)],
            RiskTier::High,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::TierOrder { .. }));
    }

    #[test]
    fn test_diligence_risk_ladder() {
        let profile = AggregationProfile::diligence();
        assert_eq!(profile.risk_tier(85.0), RiskTier::Low);
        assert_eq!(profile.risk_tier(80.0), RiskTier::Low);
        assert_eq!(profile.risk_tier(65.0), RiskTier::Medium);
        assert_eq!(profile.risk_tier(45.0), RiskTier::High);
        assert_eq!(profile.risk_tier(10.0), RiskTier::Critical);
    }

    #[test]
    fn test_realtime_risk_ladder() {
        let profile = AggregationProfile::realtime();
        assert_eq!(profile.risk_tier(75.0), RiskTier::Low);
        assert_eq!(profile.risk_tier(60.0), RiskTier::Medium);
        assert_eq!(profile.risk_tier(30.0), RiskTier::High);
    }

    #[test]
    fn test_authenticity_defaults_preserved() {
        // The lenient defaults are load-bearing policy; see DESIGN.md.
        let policy = AuthenticityPolicy::default();
        assert_eq!(policy.min_matched_commits, 5);
        assert_eq!(policy.min_consistency, 50);
        assert_eq!(policy.min_ownership, 20);
    }
}
