use crate::config::Config;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical rating derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskCategory {
    /// Map a clamped score onto its category. The thresholds partition
    /// [1, 5] at 1.5 / 2.5 / 3.5 / 4.5, upper bounds inclusive.
    pub fn from_score(score: f64) -> Self {
        if score <= 1.5 {
            RiskCategory::VeryLow
        } else if score <= 2.5 {
            RiskCategory::Low
        } else if score <= 3.5 {
            RiskCategory::Medium
        } else if score <= 4.5 {
            RiskCategory::High
        } else {
            RiskCategory::VeryHigh
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskCategory::VeryLow => "Very Low",
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
            RiskCategory::VeryHigh => "Very High",
        };
        write!(f, "{label}")
    }
}

/// Everything the scorer produces for one email.
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub risk_score: f64,
    pub risk_level: RiskCategory,
    pub issues: Vec<String>,
    pub summary: String,
    pub confidence: f64,
}

/// Aggregates keyword, sender, urgency and formatting heuristics into a
/// bounded score. The confidence jitter source is injectable so tests can
/// pin it down.
pub struct RiskScorer {
    keywords: Vec<String>,
    sender_prefixes: Vec<String>,
    caps_run: Regex,
    jitter: Box<dyn Fn() -> f64 + Send + Sync>,
}

impl RiskScorer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(RiskScorer {
            keywords: config.keywords.clone(),
            sender_prefixes: config.sender_prefixes.clone(),
            caps_run: Regex::new(r"[A-Z]{10,}")?,
            jitter: Box::new(|| rand::random::<f64>()),
        })
    }

    /// Replace the confidence jitter source. The closure must draw from
    /// [0, 1).
    pub fn with_jitter(mut self, jitter: Box<dyn Fn() -> f64 + Send + Sync>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn score(&self, sender: &str, body: &str) -> ScoreOutcome {
        let mut risk_score = 1.0_f64;
        let mut issues = Vec::new();

        let body_lower = body.to_lowercase();
        let sender_lower = sender.to_lowercase();

        // Distinct phrases present, counted in table order. Repeats of one
        // phrase contribute once.
        let found: Vec<&str> = self
            .keywords
            .iter()
            .filter(|keyword| body_lower.contains(keyword.as_str()))
            .map(|keyword| keyword.as_str())
            .collect();
        if !found.is_empty() {
            risk_score += (found.len() as f64 * 0.5).min(2.0);
            let listed: Vec<&str> = found.iter().take(3).copied().collect();
            issues.push(format!(
                "Contains suspicious phrases: {}",
                listed.join(", ")
            ));
        }

        // One bump regardless of how many prefixes match.
        if self
            .sender_prefixes
            .iter()
            .any(|prefix| sender_lower.contains(prefix.as_str()))
        {
            risk_score += 0.5;
            issues.push("Sender email contains suspicious pattern".to_string());
        }

        // Deliberately overlaps the phrase table: "urgent" counts there too.
        if body_lower.contains("urgent") || body_lower.contains("immediately") {
            risk_score += 1.0;
            issues.push("Creates false sense of urgency".to_string());
        }

        if body.contains("!!!") || self.caps_run.is_match(body) {
            risk_score += 0.5;
            issues.push("Poor formatting or excessive capitalization".to_string());
        }

        let risk_score = ((risk_score * 10.0).round() / 10.0).min(5.0);
        let risk_level = RiskCategory::from_score(risk_score);

        if issues.is_empty() {
            issues.push("No significant red flags detected".to_string());
        }

        let summary = if risk_score > 3.0 {
            "This email shows multiple indicators of a potential phishing attempt. Exercise extreme caution."
        } else if risk_score > 2.0 {
            "This email has some suspicious characteristics. Verify the sender before taking action."
        } else {
            "This email appears relatively safe, but always verify unexpected requests."
        }
        .to_string();

        let confidence = (85.0 + (self.jitter)() * 10.0).min(95.0);

        log::debug!("Scored sender={sender}: score={risk_score}, level={risk_level}");

        ScoreOutcome {
            risk_score,
            risk_level,
            issues,
            summary,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> RiskScorer {
        RiskScorer::new(&Config::default()).unwrap()
    }

    fn fixed_scorer(jitter: f64) -> RiskScorer {
        scorer().with_jitter(Box::new(move || jitter))
    }

    #[test]
    fn test_benign_email_scores_baseline() {
        let outcome = scorer().score(
            "alice@example.com",
            "Hi, the meeting moved to Tuesday. See you there.",
        );
        assert_eq!(outcome.risk_score, 1.0);
        assert_eq!(outcome.risk_level, RiskCategory::VeryLow);
        assert_eq!(
            outcome.issues,
            vec!["No significant red flags detected".to_string()]
        );
        assert_eq!(
            outcome.summary,
            "This email appears relatively safe, but always verify unexpected requests."
        );
    }

    #[test]
    fn test_high_risk_email_clamps_at_five() {
        let outcome = scorer().score(
            "security@paypal-alerts.com",
            "URGENT: Dear customer, your account is SUSPENDED!!! Click here immediately: http://evil.com",
        );
        // 1.0 base + 2.0 phrases (capped) + 0.5 sender + 1.0 urgency
        // + 0.5 formatting = 5.0
        assert_eq!(outcome.risk_score, 5.0);
        assert_eq!(outcome.risk_level, RiskCategory::VeryHigh);
        assert_eq!(outcome.issues.len(), 4);
        assert_eq!(
            outcome.issues[0],
            "Contains suspicious phrases: urgent, click here, suspended"
        );
        assert_eq!(outcome.issues[1], "Sender email contains suspicious pattern");
        assert_eq!(outcome.issues[2], "Creates false sense of urgency");
        assert_eq!(
            outcome.issues[3],
            "Poor formatting or excessive capitalization"
        );
        assert_eq!(
            outcome.summary,
            "This email shows multiple indicators of a potential phishing attempt. Exercise extreme caution."
        );
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(RiskCategory::from_score(1.0), RiskCategory::VeryLow);
        assert_eq!(RiskCategory::from_score(1.5), RiskCategory::VeryLow);
        assert_eq!(RiskCategory::from_score(1.6), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(2.5), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(2.6), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(3.5), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(3.6), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(4.5), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(4.6), RiskCategory::VeryHigh);
        assert_eq!(RiskCategory::from_score(5.0), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_phrase_contribution_is_capped() {
        // Six distinct phrases would add 3.0 uncapped; the cap holds it at
        // 2.0, and urgency adds its own 1.0 on top.
        let outcome = scorer().score(
            "alice@example.com",
            "urgent winner prize lottery bitcoin crypto",
        );
        assert_eq!(outcome.risk_score, 4.0);
        assert_eq!(outcome.risk_level, RiskCategory::High);
        assert_eq!(
            outcome.issues[0],
            "Contains suspicious phrases: urgent, winner, prize"
        );
    }

    #[test]
    fn test_repeated_phrase_counts_once() {
        let outcome = scorer().score("alice@example.com", "bitcoin bitcoin bitcoin");
        assert_eq!(outcome.risk_score, 1.5);
        assert_eq!(outcome.risk_level, RiskCategory::VeryLow);
        assert_eq!(outcome.issues[0], "Contains suspicious phrases: bitcoin");
    }

    #[test]
    fn test_phrase_match_is_substring_based() {
        // Unlike the annotator, the scorer has no word boundaries:
        // "cryptography" contains "crypto".
        let outcome = scorer().score("alice@example.com", "a cryptography textbook");
        assert_eq!(outcome.risk_score, 1.5);
        assert_eq!(outcome.issues[0], "Contains suspicious phrases: crypto");
    }

    #[test]
    fn test_suspicious_sender_prefix() {
        let outcome = scorer().score("noreply@totally-real-bank.com", "see attached agenda");
        assert_eq!(outcome.risk_score, 1.5);
        assert_eq!(
            outcome.issues,
            vec!["Sender email contains suspicious pattern".to_string()]
        );
    }

    #[test]
    fn test_sender_prefix_fires_once() {
        // Contains both "security@" and "verify@"; still a single +0.5.
        let outcome = scorer().score("security@verify@odd.example", "see attached agenda");
        assert_eq!(outcome.risk_score, 1.5);
        assert_eq!(outcome.issues.len(), 1);
    }

    #[test]
    fn test_urgency_keyword_double_counts() {
        // "urgent" lands in both the phrase table and the urgency check.
        let outcome = scorer().score("alice@example.com", "urgent");
        assert_eq!(outcome.risk_score, 2.5);
        assert_eq!(outcome.risk_level, RiskCategory::Low);
        assert_eq!(outcome.issues.len(), 2);
        assert_eq!(outcome.issues[1], "Creates false sense of urgency");
    }

    #[test]
    fn test_urgency_via_immediately() {
        let outcome = scorer().score("alice@example.com", "Please respond immediately.");
        assert_eq!(outcome.risk_score, 2.0);
        assert_eq!(outcome.risk_level, RiskCategory::Low);
        assert_eq!(
            outcome.issues,
            vec!["Creates false sense of urgency".to_string()]
        );
    }

    #[test]
    fn test_formatting_via_caps_run() {
        let outcome = scorer().score("alice@example.com", "ATTENTIONPLEASE read this");
        assert_eq!(outcome.risk_score, 1.5);
        assert_eq!(
            outcome.issues,
            vec!["Poor formatting or excessive capitalization".to_string()]
        );
    }

    #[test]
    fn test_formatting_needs_ten_caps_or_triple_bang() {
        let outcome = scorer().score("alice@example.com", "ABCDEFGHI!! ok");
        // Nine capitals and a double bang stay under both triggers.
        assert_eq!(outcome.risk_score, 1.0);
    }

    #[test]
    fn test_medium_summary_band() {
        // One phrase + urgency + formatting: 1.0 + 0.5 + 1.0 + 0.5 = 3.0.
        let outcome = scorer().score("alice@example.com", "wire transfer NOW immediately!!!");
        assert_eq!(outcome.risk_score, 3.0);
        assert_eq!(outcome.risk_level, RiskCategory::Medium);
        assert_eq!(
            outcome.summary,
            "This email has some suspicious characteristics. Verify the sender before taking action."
        );
    }

    #[test]
    fn test_empty_inputs_are_total() {
        let outcome = scorer().score("", "");
        assert_eq!(outcome.risk_score, 1.0);
        assert_eq!(outcome.risk_level, RiskCategory::VeryLow);
        assert_eq!(
            outcome.issues,
            vec!["No significant red flags detected".to_string()]
        );
    }

    #[test]
    fn test_confidence_bounds() {
        let outcome = fixed_scorer(0.0).score("alice@example.com", "hello");
        assert_eq!(outcome.confidence, 85.0);

        let outcome = fixed_scorer(1.0).score("alice@example.com", "hello");
        assert_eq!(outcome.confidence, 95.0);

        let outcome = fixed_scorer(0.5).score("alice@example.com", "hello");
        assert_eq!(outcome.confidence, 90.0);
    }

    #[test]
    fn test_score_is_deterministic_apart_from_confidence() {
        let scorer = scorer();
        let first = scorer.score("security@bank.example", "urgent wire transfer!!!");
        let second = scorer.score("security@bank.example", "urgent wire transfer!!!");
        assert_eq!(first.risk_score, second.risk_score);
        assert_eq!(first.risk_level, second.risk_level);
        assert_eq!(first.issues, second.issues);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(RiskCategory::VeryLow.to_string(), "Very Low");
        assert_eq!(RiskCategory::VeryHigh.to_string(), "Very High");
        assert_eq!(
            serde_json::to_value(RiskCategory::VeryHigh).unwrap(),
            "Very High"
        );
        assert_eq!(serde_json::to_value(RiskCategory::Medium).unwrap(), "Medium");
    }
}
