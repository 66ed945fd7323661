use tracing::debug;

use super::lexicon::Lexicon;
use super::types::Extraction;
use super::TARGET_ENTITY;

/// Extract known companies and event categories from story text
///
/// Company names are matched as whole words against the lowercased text;
/// event categories are matched case-insensitively by their lexicon pattern.
/// This is pure set membership: no ranking, no scoring.
pub fn extract_entities(text: &str, lexicon: &Lexicon) -> Extraction {
    let lowered = text.to_lowercase();

    let mut extracted = Extraction::new();
    extracted
        .companies
        .extend(lexicon.match_companies(&lowered).map(str::to_string));
    extracted.events.extend(lexicon.match_events(&lowered));

    debug!(
        target: TARGET_ENTITY,
        "Extracted companies={:?} events={:?} from {} chars",
        extracted.companies,
        extracted.events,
        text.len()
    );

    extracted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::lexicon::{default_lexicon, LexiconTable};
    use crate::entity::types::EventType;
    use std::collections::BTreeMap;

    fn companies(extraction: &Extraction) -> Vec<&str> {
        extraction.companies.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_extracts_companies_case_insensitively() {
        let extracted = extract_entities(
            "CAPITAL ONE agrees to buy Brex in a cash and stock deal",
            default_lexicon(),
        );
        assert_eq!(companies(&extracted), vec!["brex", "capital one"]);
        assert!(extracted.events.contains(&EventType::Acquisition));
    }

    #[test]
    fn test_whole_word_matching_only() {
        // "visage" and "chased" must not produce visa/chase
        let extracted = extract_entities("A visage was chased through the market", default_lexicon());
        assert!(!extracted.companies.contains("visa"));
        assert!(!extracted.companies.contains("chase"));
    }

    #[test]
    fn test_dotted_company_names() {
        let extracted = extract_entities("Checkout.com partners with Bill.com", default_lexicon());
        assert!(extracted.companies.contains("checkout.com"));
        assert!(extracted.companies.contains("bill.com"));
        assert!(extracted.events.contains(&EventType::Partnership));
    }

    #[test]
    fn test_event_inflections() {
        let lexicon = default_lexicon();
        let cases = [
            ("Klarna is going public next month", EventType::Ipo),
            ("Klarna files for an initial public offering", EventType::Ipo),
            ("The two processors merged last year", EventType::Merger),
            ("Ramp raises a Series D", EventType::Funding),
            ("Revolut rolls out savings vaults", EventType::Launch),
            ("Adyen is expanding into Brazil", EventType::Expansion),
            ("Block fined by state regulators", EventType::Regulation),
            ("Visa teams up with Plaid", EventType::Partnership),
            ("Fiserv takes over a small processor", EventType::Acquisition),
        ];
        for (text, expected) in cases {
            let extracted = extract_entities(text, lexicon);
            assert!(
                extracted.events.contains(&expected),
                "expected {:?} in {:?}, got {:?}",
                expected,
                text,
                extracted.events
            );
        }
    }

    #[test]
    fn test_empty_text() {
        let extracted = extract_entities("", default_lexicon());
        assert!(extracted.is_empty());
    }

    #[test]
    fn test_custom_lexicon() {
        let mut events = BTreeMap::new();
        events.insert("launch".to_string(), r"\bships?\b".to_string());
        let lexicon = Lexicon::from_table(LexiconTable {
            companies: vec!["Wise".to_string()],
            events,
        })
        .unwrap();

        let extracted = extract_entities("Wise ships a new card; Stripe acquires a startup", &lexicon);
        assert_eq!(companies(&extracted), vec!["wise"]);
        assert_eq!(
            extracted.events.iter().copied().collect::<Vec<_>>(),
            vec![EventType::Launch]
        );
    }
}
