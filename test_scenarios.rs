use phishguard::annotator::RiskLevel;
use phishguard::{AnalysisEngine, AnalysisResult, Config, RiskCategory};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Running known-phishing and known-benign scenarios...");

    let config = Config::default();
    println!(
        "Loaded {} keywords and {} sender prefixes",
        config.keywords.len(),
        config.sender_prefixes.len()
    );

    let engine = AnalysisEngine::new(config)?;

    // The classic account-suspension phish: urgency, caps, bangs, a link
    // and a spoofed security sender.
    println!("\n=== Analyzing the account-suspension phish ===");
    let sender = "security@paypal-alerts.com";
    let body = "URGENT: Dear customer, your account is SUSPENDED!!! \
                Click here immediately: http://evil.com";
    println!("Sender: {}", sender);
    println!("Body: {}", body);

    let result = engine.analyze(sender, body);
    print_assessment(&result);

    if result.risk_level == RiskCategory::VeryHigh {
        println!("\n✅ SUCCESS: This email was rated Very High risk");
    } else {
        println!(
            "\n❌ MISSED: Expected Very High risk, got {}",
            result.risk_level
        );
    }

    let has_link_span = result
        .highlighted_content
        .iter()
        .any(|s| s.risk_level == RiskLevel::High && s.text == "http://evil.com");
    if has_link_span {
        println!("✅ SUCCESS: The link came back as a high-risk span");
    } else {
        println!("❌ MISSED: No high-risk span for the link");
    }

    // A routine work email from a plain address.
    println!("\n\n=== Analyzing a legitimate email ===");
    let legit_sender = "alice@example.com";
    let legit_body =
        "Hi team, attached are the meeting notes from Tuesday. Let me know if I missed anything.";
    println!("Sender: {}", legit_sender);
    println!("Body: {}", legit_body);

    let legit_result = engine.analyze(legit_sender, legit_body);
    print_assessment(&legit_result);

    if legit_result.risk_level == RiskCategory::VeryLow {
        println!("\n✅ GOOD: Legitimate email was rated Very Low risk");
    } else {
        println!(
            "\n⚠️  WARNING: Legitimate email was rated {} risk",
            legit_result.risk_level
        );
    }

    Ok(())
}

fn print_assessment(result: &AnalysisResult) {
    println!("\n=== Results ===");
    println!("Risk Score: {:.1} / 5.0", result.risk_score);
    println!("Risk Level: {}", result.risk_level);
    println!("Confidence: {:.1}%", result.confidence);
    println!("Issues: {:?}", result.issues);
    println!("Summary: {}", result.summary);
    println!("Segments:");
    for segment in &result.highlighted_content {
        match &segment.reason {
            Some(reason) => println!("  [{:?}] {:?} ({})", segment.risk_level, segment.text, reason),
            None => println!("  [{:?}] {:?}", segment.risk_level, segment.text),
        }
    }
}
