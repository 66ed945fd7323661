use anyhow::Result;
use colored::Colorize;
use newsdedup::config::Config;
use newsdedup::dedup::scenarios::{stripe_story, today_story, visa_plaid_story, yesterday_story};
use newsdedup::dedup::{DetectorConfig, DuplicateDetector};
use newsdedup::entity::{default_lexicon, extract_entities};
use newsdedup::similarity::similarity;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Runs the Capital One/Brex scenarios against the configured detector,
/// including the live embedder when OPENAI_API_KEY is set.
#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env();
    let detector = config.detector()?;

    section("HYBRID DEDUPLICATION SCENARIOS");
    println!("Today's and yesterday's stories cover the SAME acquisition with very different wording.");

    let entity_extraction = test_entity_extraction();
    let word_only_catches = test_word_similarity(config.history_threshold);
    let without_embeddings = DuplicateDetector::new(DetectorConfig {
        use_embeddings: false,
        ..config.detector
    })
    .with_lexicon(config.lexicon()?);
    let hybrid_detection = test_hybrid_detection(&detector, &without_embeddings).await;
    let false_positives = test_false_positive_prevention(&detector).await;

    section("SUMMARY");
    report("entity extraction", entity_extraction);
    report("word similarity alone catches the repeat", word_only_catches);
    report("hybrid detection", hybrid_detection);
    report("false positive prevention", false_positives);

    let key_result = !word_only_catches && hybrid_detection;
    report("hybrid catches the duplicate that word-only missed", key_result);

    let all_passed = entity_extraction && hybrid_detection && false_positives && key_result;
    if all_passed {
        println!("\n{}", "ALL SCENARIOS PASSED".bright_green().bold());
        Ok(())
    } else {
        println!("\n{}", "SOME SCENARIOS FAILED".bright_red().bold());
        process::exit(1);
    }
}

fn section(title: &str) {
    println!("\n{}", "═".repeat(60).bright_blue());
    println!("{}", title.bright_blue());
    println!("{}", "═".repeat(60).bright_blue());
}

fn report(name: &str, passed: bool) {
    let status = if passed {
        "PASS".bright_green()
    } else {
        "FAIL".bright_red()
    };
    println!("  {}: {}", status, name);
}

fn test_entity_extraction() -> bool {
    section("Entity extraction");
    let today = extract_entities(&today_story().text(), default_lexicon());
    let yesterday = extract_entities(&yesterday_story().text(), default_lexicon());

    println!("Today:     {:?} / {:?}", today.companies, today.events);
    println!("Yesterday: {:?} / {:?}", yesterday.companies, yesterday.events);

    let shared = today.shared_companies(&yesterday);
    shared.contains("capital one") && shared.contains("brex")
}

/// True when word overlap alone would have flagged the repeat
fn test_word_similarity(threshold: f64) -> bool {
    section("Word similarity");
    let sim = similarity(&today_story().text(), &yesterday_story().text());
    println!("Jaccard word similarity: {:.1}% (threshold {:.0}%)", sim * 100.0, threshold * 100.0);
    sim > threshold
}

/// Both detectors share the configured lexicon; only the embedding fallback differs
async fn test_hybrid_detection(detector: &DuplicateDetector, without_embeddings: &DuplicateDetector) -> bool {
    section("Hybrid detection");
    let today = today_story().text();
    let yesterday = yesterday_story().text();

    let (plain_duplicate, plain_record) = without_embeddings.is_duplicate(&today, &yesterday).await;
    println!("Without embeddings: duplicate={} ({})", plain_duplicate, plain_record.decision_reason);

    let (duplicate, record) = detector.is_duplicate(&today, &yesterday).await;
    println!("Configured detector: duplicate={} ({})", duplicate, record.decision_reason);
    println!("{}", serde_json::to_string_pretty(&record).unwrap_or_default().dimmed());

    plain_duplicate && duplicate
}

async fn test_false_positive_prevention(detector: &DuplicateDetector) -> bool {
    section("False positive prevention");
    let today = today_story().text();

    let (stripe, stripe_record) = detector.is_duplicate(&today, &stripe_story().text()).await;
    println!("vs Stripe stablecoin: duplicate={} ({})", stripe, stripe_record.decision_reason);

    let (visa, visa_record) = detector.is_duplicate(&today, &visa_plaid_story().text()).await;
    println!("vs Visa/Plaid partnership: duplicate={} ({})", visa, visa_record.decision_reason);

    !stripe && !visa
}
