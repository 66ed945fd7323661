//! Reference stories for the Capital One/Brex repeat that word overlap alone missed.

use crate::story::Story;

/// Today's candidate: the acquisition, freshly reworded
pub fn today_story() -> Story {
    Story::new(
        "Capital One Acquires Brex for $5.15 Billion, Strengthening Fintech Position",
        "Capital One has agreed to acquire Brex, a corporate spend management platform, in a $5.15 billion cash and stock deal, expected to close in mid-2026. This acquisition strengthens Capital One's position in the fintech space, potentially challenging other corporate card and expense management providers while providing Brex with enhanced resources and reach. The integration challenges could arise, potentially slowing down innovation. This move aligns with the trend of fintech consolidation, indicating a possible wave of traditional banks acquiring innovative platforms.",
    )
}

pub fn yesterday_story() -> Story {
    Story::new(
        "Capital One Acquires Brex to Expand Business Payments and Embedded Finance Solutions",
        "Capital One has acquired Brex to enhance its business banking and payments capabilities, aiming to expand its reach in payables, receivables, and spend management. This acquisition positions Capital One as a formidable player in the business payments sector, impacting competitors and corporate clients. Expect increased M&A activity as competitors seek to bolster their capabilities in response to Capital One's strategic move.",
    )
}

pub fn stripe_story() -> Story {
    Story::new(
        "Stripe Launches New Stablecoin Settlement Feature",
        "Stripe has announced a new feature allowing merchants to settle transactions in stablecoins, reducing currency conversion fees and settlement times for international businesses.",
    )
}

pub fn visa_plaid_story() -> Story {
    Story::new(
        "Visa Partners with Plaid for Enhanced Open Banking Integration",
        "Visa has announced a strategic partnership with Plaid to improve open banking capabilities, enabling faster account verification and seamless payment experiences for consumers.",
    )
}

