//! Bot pick evaluation.
//!
//! Every candidate in the offered pack gets a heuristic score made of card
//! quality, fit with the bot's colors, an early-pick bonus and a small random
//! jitter. The highest total wins.

use log::{debug, trace};
use rand::Rng;

use crate::card::{Card, PtValue};
use crate::color::ColorSet;
use crate::error::{DraftError, DraftResult};
use crate::rng::entropy_rng;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

const CREATURE_BONUS: f64 = 5.0;
const SPELL_BONUS: f64 = 4.0;
const VARIABLE_STATS_BONUS: f64 = 3.0;
const STAT_TOTAL_CAP: i32 = 8;
const COLORLESS_FIT_BONUS: f64 = 1.0;
const OFF_COLOR_PENALTY_CAP: f64 = 3.0;
const EARLY_PICK_BONUS: f64 = 2.0;
/// Jitter is drawn from `[0, MAX_JITTER)`.
pub const MAX_JITTER: f64 = 2.0;

/// Position of a pick within the draft. Both numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase"))]
pub struct PickContext {
    pub pack_number: u32,
    pub pick_number: u32,
}

impl PickContext {
    pub fn new(pack_number: u32, pick_number: u32) -> Self {
        Self {
            pack_number,
            pick_number,
        }
    }

    fn is_early(self) -> bool {
        self.pack_number == 1 && self.pick_number <= 3
    }

    /// Picks during which an uncommitted bot adopts its pick's colors.
    fn seeds_colors(self) -> bool {
        self.pack_number == 1 && self.pick_number <= 2
    }
}

/// The chosen card and the bot's colors after the pick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase"))]
pub struct PickResult {
    pub picked_card: Card,
    pub bot_colors: ColorSet,
}

/// Card quality independent of the bot: card type, stats and rarity.
pub fn base_score(card: &Card) -> f64 {
    let mut score = 0.0;

    if card.is_creature() {
        score += CREATURE_BONUS;
        let power = card.power.unwrap_or(PtValue::Fixed(0));
        let toughness = card.toughness.unwrap_or(PtValue::Fixed(0));
        score += match (power, toughness) {
            (PtValue::Fixed(p), PtValue::Fixed(t)) => {
                f64::from(p.saturating_add(t).min(STAT_TOTAL_CAP)) / 2.0
            }
            _ => VARIABLE_STATS_BONUS,
        };
    } else if card.is_instant_or_sorcery() {
        score += SPELL_BONUS;
    }

    score + f64::from(card.rarity.tier())
}

/// How well `card` fits a bot already committed to `bot_colors`.
/// Zero while the bot has no colors.
pub fn color_fit_score(card: &Card, bot_colors: ColorSet, pick_number: u32) -> f64 {
    if bot_colors.is_empty() {
        return 0.0;
    }

    let pick = f64::from(pick_number);
    let matching = card.colors.intersection(bot_colors).count();
    if matching > 0 {
        f64::from(matching) * (1.0 + pick / 5.0)
    } else if card.is_colorless() {
        COLORLESS_FIT_BONUS
    } else {
        -(pick / 3.0).min(OFF_COLOR_PENALTY_CAP)
    }
}

/// Deterministic part of a candidate's score (everything except jitter).
pub fn score_card(card: &Card, bot_colors: ColorSet, context: PickContext) -> f64 {
    let mut score = base_score(card) + color_fit_score(card, bot_colors, context.pick_number);
    if context.is_early() {
        score += EARLY_PICK_BONUS;
    }
    score
}

/// Chooses one card from `candidates` for a bot.
///
/// The returned colors are the picked card's colors when the bot had none and
/// this is one of the first two picks of pack one; otherwise `bot_colors` is
/// returned unchanged. Accumulating colors over later picks is the caller's job.
pub fn evaluate_pick<R: Rng + ?Sized>(
    candidates: &[Card],
    bot_colors: ColorSet,
    context: PickContext,
    rng: &mut R,
) -> DraftResult<PickResult> {
    let mut best: Option<(&Card, f64)> = None;
    for card in candidates {
        let score = score_card(card, bot_colors, context) + rng.random_range(0.0..MAX_JITTER);
        trace!("candidate {} ({}) scored {score:.2}", card.name, card.id);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((card, score)),
        }
    }

    let (picked, score) = best.ok_or(DraftError::NoCandidates)?;

    let colors = if bot_colors.is_empty() && context.seeds_colors() && !picked.colors.is_empty() {
        picked.colors
    } else {
        bot_colors
    };

    debug!(
        "p{}p{}: picked {} ({:.2}) from {} candidates, bot colors {} -> {}",
        context.pack_number,
        context.pick_number,
        picked.name,
        score,
        candidates.len(),
        bot_colors,
        colors
    );

    Ok(PickResult {
        picked_card: picked.clone(),
        bot_colors: colors,
    })
}

/// [`evaluate_pick`] with a fresh entropy-seeded generator.
pub fn evaluate_pick_from_entropy(
    candidates: &[Card],
    bot_colors: ColorSet,
    context: PickContext,
) -> DraftResult<PickResult> {
    evaluate_pick(candidates, bot_colors, context, &mut entropy_rng())
}
