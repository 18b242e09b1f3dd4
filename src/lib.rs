//! trust-engine - Startup Trust Scoring
//!
//! Computes an evidence-backed trust score for an early-stage project from
//! independently fallible signals: documents, on-chain activity, code and
//! verified authorship, media, governance, social presence, and achievements.
//!
//! ## Pipeline
//! All analyses flow through one path:
//! Adapters fetch -> Category scorers -> Weighted aggregation -> Risk report
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trust_engine::{Adapters, AdapterConfig, AggregationProfile, ProjectInputs, TrustAnalyzer};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let analyzer = TrustAnalyzer::new(
//!     Adapters::none(),
//!     AggregationProfile::diligence(),
//!     AdapterConfig::default(),
//! );
//! let inputs = ProjectInputs {
//!     project_name: "nova".to_string(),
//!     bundle_id: "bundle-7".to_string(),
//!     ..Default::default()
//! };
//! let analysis = analyzer.analyze(&inputs).await?;
//! println!("{} -> {}", analysis.result.overall_score, analysis.result.risk_tier);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Profiles and adapter settings
pub mod config;

// Signal sources, adapters, and normalized results
pub mod signal;

// Commit-history ownership verification
pub mod ownership;

// Pure category scorers
pub mod scoring;

// Weighted aggregation into a trust result
pub mod aggregate;

// Human-facing risk report
pub mod report;

// Deterministic result digests
pub mod fingerprint;

// End-to-end orchestration
pub mod analyzer;

// Tracing setup helper
pub mod telemetry;

pub use aggregate::{
    AnalysisContext, BreakdownRow, ConfidenceTier, RiskTier, TrustAggregator, TrustResult,
};
pub use analyzer::{Adapters, ProjectAnalysis, ProjectInputs, TrustAnalyzer};
pub use config::{AdapterConfig, AggregationProfile, AuthenticityPolicy};
pub use error::{AnalysisError, AnalysisResult, ConfigError, SignalError};
pub use ownership::{OwnershipVerdict, OwnershipVerifier};
pub use report::{InvestmentReadiness, RawEvidence, RiskReport};
pub use signal::{SignalCategory, SignalResult};
