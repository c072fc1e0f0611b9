use crate::config::Config;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Severity of an annotated span. Variants are declared in ascending order
/// so the derived `Ord` can be used directly for overlap resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
}

/// One contiguous slice of the analyzed text. Concatenating `text` across a
/// full annotation reproduces the input byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    pub text: String,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// Candidate span before overlap resolution. Offsets are byte positions and
// always fall on char boundaries because they come from the regex engine.
#[derive(Debug, Clone)]
struct Match {
    start: usize,
    end: usize,
    level: RiskLevel,
    reason: &'static str,
}

/// Scans body text against three tiers of patterns and partitions it into a
/// gapless sequence of risk-tagged segments.
pub struct SpanAnnotator {
    high_patterns: Vec<(Regex, &'static str)>,
    medium_patterns: Vec<(Regex, &'static str)>,
    keyword_patterns: Vec<Regex>,
}

impl SpanAnnotator {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let high_patterns = vec![
            (Regex::new(r"https?://[^\s]+")?, "Suspicious link"),
            (Regex::new(r"\b\w+@\w+\.\w+")?, "Email address in content"),
        ];

        let medium_patterns = vec![
            (Regex::new(r"\b[A-Z]{3,}\b")?, "Excessive capitalization"),
            (Regex::new(r"!!+")?, "Excessive punctuation"),
            (
                Regex::new(r"\$\d+(?:,\d{3})*(?:\.\d{2})?")?,
                "Money mentioned",
            ),
        ];

        let mut keyword_patterns = Vec::with_capacity(config.keywords.len());
        for keyword in &config.keywords {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
            keyword_patterns.push(Regex::new(&pattern)?);
        }

        Ok(SpanAnnotator {
            high_patterns,
            medium_patterns,
            keyword_patterns,
        })
    }

    /// Annotate `text`, returning an ordered, gapless segment sequence.
    /// Untagged stretches come back as `RiskLevel::None` segments with no
    /// reason; empty input yields a single empty segment.
    pub fn annotate(&self, text: &str) -> Vec<TextSegment> {
        let mut matches = self.collect_matches(text);

        // Stable by start offset; ties keep tier discovery order, so a
        // high-tier match beats a keyword starting at the same position.
        matches.sort_by_key(|m| m.start);

        let kept = resolve_overlaps(matches);

        let mut segments = Vec::new();
        let mut cursor = 0;
        for m in &kept {
            if m.start < cursor {
                // Survivor of the pairwise pass that lies inside the span
                // just emitted (e.g. a keyword inside a URL).
                log::debug!(
                    "Dropping {:?} match at {}..{} inside an emitted span",
                    m.level,
                    m.start,
                    m.end
                );
                continue;
            }
            if m.start > cursor {
                segments.push(TextSegment {
                    text: text[cursor..m.start].to_string(),
                    risk_level: RiskLevel::None,
                    reason: None,
                });
            }
            segments.push(TextSegment {
                text: text[m.start..m.end].to_string(),
                risk_level: m.level,
                reason: Some(m.reason.to_string()),
            });
            cursor = m.end;
        }

        if cursor < text.len() {
            segments.push(TextSegment {
                text: text[cursor..].to_string(),
                risk_level: RiskLevel::None,
                reason: None,
            });
        }

        if segments.is_empty() {
            segments.push(TextSegment {
                text: text.to_string(),
                risk_level: RiskLevel::None,
                reason: None,
            });
        }

        segments
    }

    fn collect_matches(&self, text: &str) -> Vec<Match> {
        let mut matches = Vec::new();

        for (regex, reason) in &self.high_patterns {
            for m in regex.find_iter(text) {
                matches.push(Match {
                    start: m.start(),
                    end: m.end(),
                    level: RiskLevel::High,
                    reason: *reason,
                });
            }
        }

        for (regex, reason) in &self.medium_patterns {
            for m in regex.find_iter(text) {
                matches.push(Match {
                    start: m.start(),
                    end: m.end(),
                    level: RiskLevel::Medium,
                    reason: *reason,
                });
            }
        }

        for regex in &self.keyword_patterns {
            for m in regex.find_iter(text) {
                matches.push(Match {
                    start: m.start(),
                    end: m.end(),
                    level: RiskLevel::Low,
                    reason: "Suspicious keyword",
                });
            }
        }

        log::debug!("Collected {} candidate matches", matches.len());
        matches
    }
}

// Adjacent-pairwise resolution over the start-sorted list: a match is dropped
// only when it overlaps the next one and the next one is strictly more
// severe. The last match always survives. This is not interval scheduling;
// a survivor can still start inside the span emitted before it, and the
// emission cursor in `annotate` skips those.
fn resolve_overlaps(matches: Vec<Match>) -> Vec<Match> {
    let mut kept = Vec::with_capacity(matches.len());
    for (i, m) in matches.iter().enumerate() {
        if let Some(next) = matches.get(i + 1) {
            if m.end > next.start && m.level < next.level {
                continue;
            }
        }
        kept.push(m.clone());
    }
    kept
}
