//! Canned replies per intent — the caller-owned template layer.
//!
//! The classifier hands back a bare label; reply wording and the randomness
//! of picking among alternatives live on this side of the boundary so
//! prediction itself stays deterministic.

use rand::seq::IndexedRandom;

/// Label → canned reply alternatives, with a fallback for the unknown
/// intent and for labels nothing was written for.
pub struct ReplyBook {
    entries: Vec<(&'static str, Vec<&'static str>)>,
    fallback: &'static str,
}

impl Default for ReplyBook {
    fn default() -> Self {
        Self {
            entries: vec![
                (
                    "gear_suggestion",
                    vec![
                        "For wildlife trips we suggest a DSLR with a telephoto lens.",
                        "For weddings, go with a 35mm or 50mm prime.",
                        "Low light? Pick a fast prime and a body with good high-ISO handling.",
                    ],
                ),
                (
                    "rental_policy",
                    vec![
                        "You can rent gear for any duration between 1 and 30 days.",
                        "Rentals run from a single day up to a month; extensions are fine if you ask before the return date.",
                    ],
                ),
                (
                    "faq_damage",
                    vec![
                        "If gear is damaged, the customer is charged based on repair or replacement cost.",
                        "Damage is billed at the repair cost, or the replacement cost when repair isn't possible.",
                    ],
                ),
                (
                    "unrelated",
                    vec![
                        "I'm an assistant for camera gear rentals. Ask me about equipment, rentals, or trip advice!",
                    ],
                ),
            ],
            fallback: "Sorry, I didn't understand that.",
        }
    }
}

impl ReplyBook {
    /// Pick a reply for an intent: uniform-random among that label's
    /// alternatives, the fallback otherwise.
    pub fn pick(&self, intent: &str) -> &str {
        let Some((_, options)) = self.entries.iter().find(|(label, _)| *label == intent) else {
            return self.fallback;
        };
        options
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(self.fallback)
    }
}
