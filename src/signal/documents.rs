//! Document evidence model
//!
//! Structural metrics extracted from a project's document bundle. Extraction
//! itself happens behind the [`BlobStore`] collaborator; the engine only sees
//! these metrics and never touches raw document bytes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// Structural class of a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Video,
    Spreadsheet,
}

/// Expected pitch-deck sections detected in a PDF.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SectionFlags {
    pub problem: bool,
    pub solution: bool,
    pub market: bool,
    pub team: bool,
    pub traction: bool,
    pub financials: bool,
}

impl SectionFlags {
    pub fn count(&self) -> u32 {
        [
            self.problem,
            self.solution,
            self.market,
            self.team,
            self.traction,
            self.financials,
        ]
        .iter()
        .filter(|&&present| present)
        .count() as u32
    }
}

/// Metrics for one document in the bundle. Fields that do not apply to the
/// document's kind are left at zero and ignored by the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetrics {
    pub identifier: String,
    pub kind: DocumentKind,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub sections: SectionFlags,
    #[serde(default)]
    pub file_size_bytes: u64,
    #[serde(default)]
    pub sheet_count: u32,
}

/// Source of extracted document metrics for a submission bundle.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn document_metrics(&self, bundle_id: &str) -> Result<Vec<DocumentMetrics>, SignalError>;
}

/// In-memory store for callers that extracted metrics upstream.
pub struct StaticDocumentSet {
    documents: Vec<DocumentMetrics>,
}

impl StaticDocumentSet {
    pub fn new(documents: Vec<DocumentMetrics>) -> Self {
        StaticDocumentSet { documents }
    }
}

#[async_trait]
impl BlobStore for StaticDocumentSet {
    async fn document_metrics(&self, _bundle_id: &str) -> Result<Vec<DocumentMetrics>, SignalError> {
        Ok(self.documents.clone())
    }
}
