use clap::{Arg, Command};
use log::LevelFilter;
use phishguard::annotator::RiskLevel;
use phishguard::{AnalysisEngine, AnalysisResult, Config};
use std::process;

fn main() {
    let matches = Command::new("phishguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic phishing-risk assessment for email content")
        .long_about(
            "Scores an email's sender and body against keyword, sender, urgency and \
             formatting heuristics, and annotates the body with risk-tagged spans \
             showing which substrings triggered suspicion.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/phishguard.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity and pattern compilation")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sender")
                .short('s')
                .long("sender")
                .value_name("ADDR")
                .help("Sender email address to analyze")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("body")
                .short('b')
                .long("body")
                .value_name("TEXT")
                .help("Email body text to analyze")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("body-file")
                .long("body-file")
                .value_name("FILE")
                .help("Read the email body from a file instead of --body")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("email-file")
                .long("email-file")
                .value_name("FILE")
                .help("Analyze a raw email file (headers, blank line, body)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit the analysis result as pretty-printed JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with detailed match tracing")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logger based on verbose flag
    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config_path = matches.get_one::<String>("config").unwrap();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    let json_output = matches.get_flag("json");

    if matches.get_flag("test-config") {
        println!("🔍 Testing configuration...");
        println!();
        println!("Number of keywords: {}", config.keywords.len());
        println!("Number of sender prefixes: {}", config.sender_prefixes.len());
        match AnalysisEngine::new(config) {
            Ok(_) => {
                println!("All regex patterns compiled successfully.");
                println!("✅ Configuration validated");
            }
            Err(e) => {
                println!("❌ Configuration validation failed:");
                println!("Error: {e}");
                process::exit(1);
            }
        }
        return;
    }

    if let Some(email_file) = matches.get_one::<String>("email-file") {
        analyze_email_file(config, email_file, json_output);
        return;
    }

    let sender = match matches.get_one::<String>("sender") {
        Some(sender) => sender.clone(),
        None => {
            eprintln!("❌ --sender is required (or use --email-file)");
            process::exit(1);
        }
    };

    let body = if let Some(body) = matches.get_one::<String>("body") {
        body.clone()
    } else if let Some(body_file) = matches.get_one::<String>("body-file") {
        match std::fs::read_to_string(body_file) {
            Ok(body) => body,
            Err(e) => {
                eprintln!("❌ Error reading body file: {e}");
                process::exit(1);
            }
        }
    } else {
        eprintln!("❌ --body or --body-file is required (or use --email-file)");
        process::exit(1);
    };

    if sender.trim().is_empty() || body.trim().is_empty() {
        eprintln!("❌ Sender and body must not be empty");
        process::exit(1);
    }

    let engine = match AnalysisEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Error creating analysis engine: {e}");
            process::exit(1);
        }
    };

    let result = engine.analyze(&sender, &body);
    print_result(&sender, &result, json_output);
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path)
    } else {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Ok(Config::default())
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn analyze_email_file(config: Config, email_file: &str, json_output: bool) {
    let email_content = match std::fs::read_to_string(email_file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("❌ Error reading email file: {e}");
            process::exit(1);
        }
    };

    let (sender, subject, body) = parse_email(&email_content);

    if !json_output {
        println!("🧪 Analyzing email file: {}", email_file);
        println!();
        println!("📧 Email Details:");
        println!("   Sender: {}", sender);
        if let Some(subject) = &subject {
            println!("   Subject: {}", subject);
        }
        println!();
    }

    if body.trim().is_empty() {
        eprintln!("❌ Email file has an empty body");
        process::exit(1);
    }

    let engine = match AnalysisEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Error creating analysis engine: {e}");
            process::exit(1);
        }
    };

    let result = engine.analyze(&sender, &body);
    print_result(&sender, &result, json_output);
}

/// Split a raw email into sender, subject and body. The sender comes from
/// Return-Path when present, falling back to the From header's angle-bracket
/// address.
fn parse_email(email_content: &str) -> (String, Option<String>, String) {
    let mut sender = String::new();
    let mut subject = None;
    let mut body = String::new();
    let mut in_headers = true;

    for line in email_content.lines() {
        if in_headers {
            if line.trim().is_empty() {
                in_headers = false;
                continue;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                // Header continuation lines carry nothing we extract.
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();

                if key == "return-path" {
                    sender = value.trim_matches(['<', '>']).to_string();
                } else if key == "from" && sender.is_empty() {
                    // Extract email from "Name <email@domain.com>" format
                    if let Some(start) = value.rfind('<') {
                        if let Some(end) = value.rfind('>') {
                            if start < end {
                                sender = value[start + 1..end].to_string();
                            }
                        }
                    } else {
                        sender = value.clone();
                    }
                } else if key == "subject" {
                    subject = Some(value);
                }
            }
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }

    if sender.is_empty() {
        sender = "unknown@example.com".to_string();
    }

    (sender, subject, body)
}

fn print_result(sender: &str, result: &AnalysisResult, json_output: bool) {
    if json_output {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("❌ Error serializing result: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!("📊 Analysis Result");
    println!("   Sender: {}", sender);
    println!("   Risk Score: {:.1} / 5.0", result.risk_score);
    println!("   Risk Level: {}", result.risk_level);
    println!("   Confidence: {:.1}%", result.confidence);
    println!();

    println!("⚠️  Issues:");
    for issue in &result.issues {
        println!("     - {}", issue);
    }
    println!();

    println!("📝 Summary: {}", result.summary);
    println!();

    println!(
        "🔍 Highlighted Content ({} segments):",
        result.highlighted_content.len()
    );
    for segment in &result.highlighted_content {
        let marker = level_marker(segment.risk_level);
        match &segment.reason {
            Some(reason) => println!(
                "   {} {:?} ({})",
                marker,
                truncate_string(&segment.text, 60),
                reason
            ),
            None => println!("   {} {:?}", marker, truncate_string(&segment.text, 60)),
        }
    }
}

fn level_marker(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "🔴",
        RiskLevel::Medium => "🟠",
        RiskLevel::Low => "🟡",
        RiskLevel::None => "⚪",
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
