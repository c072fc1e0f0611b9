use crate::annotator::{SpanAnnotator, TextSegment};
use crate::config::Config;
use crate::scorer::{RiskCategory, RiskScorer};
use serde::{Deserialize, Serialize};

/// Complete assessment for one email, in the shape consumers render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub risk_score: f64,
    pub risk_level: RiskCategory,
    pub issues: Vec<String>,
    pub summary: String,
    pub confidence: f64,
    pub highlighted_content: Vec<TextSegment>,
}

/// Composes the annotator and the scorer over the same configuration.
pub struct AnalysisEngine {
    annotator: SpanAnnotator,
    scorer: RiskScorer,
}

impl AnalysisEngine {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(AnalysisEngine {
            annotator: SpanAnnotator::new(&config)?,
            scorer: RiskScorer::new(&config)?,
        })
    }

    /// Assess one email. Total over all string inputs; callers are expected
    /// to reject empty sender or body before getting here.
    pub fn analyze(&self, sender: &str, body: &str) -> AnalysisResult {
        let outcome = self.scorer.score(sender, body);
        let highlighted_content = self.annotator.annotate(body);

        log::debug!(
            "Analysis complete: score={}, level={}, {} segments",
            outcome.risk_score,
            outcome.risk_level,
            highlighted_content.len()
        );

        AnalysisResult {
            risk_score: outcome.risk_score,
            risk_level: outcome.risk_level,
            issues: outcome.issues,
            summary: outcome.summary,
            confidence: outcome.confidence,
            highlighted_content,
        }
    }
}
