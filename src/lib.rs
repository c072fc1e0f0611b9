pub mod annotator;
pub mod config;
pub mod engine;
pub mod scorer;

pub use annotator::{RiskLevel, SpanAnnotator, TextSegment};
pub use config::Config;
pub use engine::{AnalysisEngine, AnalysisResult};
pub use scorer::{RiskCategory, RiskScorer, ScoreOutcome};
