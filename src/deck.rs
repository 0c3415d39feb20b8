//! Deck assembly from a finished draft pool.
//!
//! A bot's 45-card pool becomes a 40-card deck: two primary colors are chosen
//! from the non-land pips, the best-fitting spells are kept, non-basic lands
//! from the pool are played and fresh basics fill the rest of the mana base in
//! proportion to the selected spells' colors.
//!
//! Assembly is reproducible. Ties between equally scored spells are broken by
//! a generator seeded from the draft id, bot id and pool size.

use std::cmp::Reverse;

use log::{debug, warn};
use rand::Rng;
use rayon::prelude::*;

use crate::card::{Card, basic_land};
use crate::color::{Color, ColorCounts, ColorSet};
use crate::config::DeckRules;
use crate::error::{DraftError, DraftResult};
use crate::ids::BotId;
use crate::rng::deck_rng;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

const BASE_SPELL_SCORE: i32 = 50;
const COLORLESS_BONUS: i32 = 10;
const ON_COLOR_BONUS: i32 = 30;
const OFF_COLOR_PENALTY: i32 = 20;

/// A built deck and the rest of the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase"))]
pub struct Deck {
    #[cfg_attr(feature = "serialization", serde(rename = "nonLands"))]
    pub non_land_selections: Vec<Card>,
    /// Non-basic lands from the pool followed by synthesized basics.
    pub lands: Vec<Card>,
    pub full_deck: Vec<Card>,
    /// Unselected non-lands, then pool lands left out of the deck.
    pub sideboard: Vec<Card>,
    pub primary_colors: ColorSet,
}

impl Deck {
    pub fn basic_land_count(&self, color: Color) -> usize {
        let name = color.basic_land_name();
        self.lands
            .iter()
            .filter(|card| card.is_basic_land() && card.name == name)
            .count()
    }
}

/// Builds decks under a fixed set of [`DeckRules`].
#[derive(Debug, Clone, Default)]
pub struct DeckBuilder {
    rules: DeckRules,
}

impl DeckBuilder {
    pub fn new(rules: DeckRules) -> Self {
        Self { rules }
    }

    /// Builds a deck with the generator derived from `(draft_id, bot_id, pool size)`.
    pub fn build(&self, pool: &[Card], draft_id: &str, bot_id: &str) -> DraftResult<Deck> {
        let mut rng = deck_rng(draft_id, bot_id, pool.len());
        self.build_with_rng(pool, &mut rng)
    }

    /// Builds a deck breaking score ties with `rng`.
    ///
    /// Inconsistent rules are reported as `InvalidConfig` before the pool is
    /// looked at.
    pub fn build_with_rng<R: Rng + ?Sized>(&self, pool: &[Card], rng: &mut R) -> DraftResult<Deck> {
        let rules = &self.rules;
        rules.validate()?;
        if pool.len() != rules.pool_size {
            return Err(DraftError::InvalidPoolSize {
                expected: rules.pool_size,
                actual: pool.len(),
            });
        }

        let (lands, non_lands): (Vec<&Card>, Vec<&Card>) =
            pool.iter().partition(|card| card.is_land());
        let (pool_basics, non_basics): (Vec<&Card>, Vec<&Card>) =
            lands.into_iter().partition(|card| card.is_basic_land());

        let primary = self.primary_colors(pool, &non_lands);
        let primary_set: ColorSet = primary.iter().copied().collect();

        let target = self.spell_target(non_basics.len());
        let mut ranked: Vec<(i32, u64, &Card)> = non_lands
            .iter()
            .map(|&card| (spell_score(card, primary_set), rng.random::<u64>(), card))
            .collect();
        ranked.sort_by_key(|&(score, tie, _)| (Reverse(score), tie));

        let take = target.min(ranked.len());
        let selections: Vec<Card> = ranked[..take]
            .iter()
            .map(|&(_, _, card)| card.clone())
            .collect();
        let unselected = ranked[take..].iter().map(|&(_, _, card)| card.clone());

        let lands_needed = rules.deck_size.saturating_sub(selections.len());
        let played_non_basics = non_basics.len().min(lands_needed);
        let basics_needed = lands_needed - played_non_basics;

        let selected_pips: ColorCounts = selections.iter().map(|card| &card.colors).collect();
        let allocation = allocate_basics(basics_needed, &primary, &selected_pips);

        let mut deck_lands: Vec<Card> = non_basics[..played_non_basics]
            .iter()
            .map(|&card| card.clone())
            .collect();
        for (color, count) in &allocation {
            let slug = color.basic_land_name().to_lowercase();
            for n in 1..=*count {
                deck_lands.push(basic_land(*color, format!("basic-{slug}-{n}")));
            }
        }

        let mut full_deck = selections.clone();
        full_deck.extend(deck_lands.iter().cloned());

        let mut sideboard: Vec<Card> = unselected.collect();
        sideboard.extend(non_basics[played_non_basics..].iter().map(|&card| card.clone()));
        sideboard.extend(pool_basics.iter().map(|&card| card.clone()));

        debug!(
            "built deck: colors {}, {} spells, {} non-basic lands, basics {:?}, sideboard {}",
            primary_set,
            selections.len(),
            played_non_basics,
            allocation,
            sideboard.len()
        );

        Ok(Deck {
            non_land_selections: selections,
            lands: deck_lands,
            full_deck,
            sideboard,
            primary_colors: primary_set,
        })
    }

    /// Up to two colors ranked by non-land pips, falling back to the pool's
    /// most frequent color and then to the configured fallback.
    fn primary_colors(&self, pool: &[Card], non_lands: &[&Card]) -> Vec<Color> {
        let pips: ColorCounts = non_lands.iter().map(|card| &card.colors).collect();
        let primary: Vec<Color> = pips
            .ranked()
            .into_iter()
            .take(2)
            .map(|(color, _)| color)
            .collect();
        if !primary.is_empty() {
            return primary;
        }

        let whole_pool: ColorCounts = pool.iter().map(|card| &card.colors).collect();
        match whole_pool.ranked().first() {
            Some(&(color, _)) => vec![color],
            None => vec![self.rules.fallback_color],
        }
    }

    fn spell_target(&self, non_basic_lands: usize) -> usize {
        let rules = &self.rules;
        rules
            .deck_size
            .saturating_sub(rules.land_baseline)
            .saturating_sub(non_basic_lands)
            .clamp(rules.min_spells, rules.max_spells)
    }
}

/// Score of a non-land for a deck in `primary` colors.
pub fn spell_score(card: &Card, primary: ColorSet) -> i32 {
    let mut score = BASE_SPELL_SCORE;
    if card.is_colorless() {
        score += COLORLESS_BONUS;
    } else {
        let on = card.colors.intersection(primary).count() as i32;
        let off = card.colors.difference(primary).count() as i32;
        score += ON_COLOR_BONUS * on - OFF_COLOR_PENALTY * off;
    }
    score + curve_score(card.converted_cost())
}

fn curve_score(mana_value: u32) -> i32 {
    match mana_value {
        2..=4 => 10,
        1 | 5 => 5,
        0 => 0,
        _ => -5,
    }
}

/// Splits `basics` between the primary colors by their share of `pips`.
///
/// Every primary color with pips gets at least one basic while any remain;
/// the rounding shortfall goes to the color with the most pips.
fn allocate_basics(basics: usize, primary: &[Color], pips: &ColorCounts) -> Vec<(Color, usize)> {
    let total: u32 = primary.iter().map(|&color| pips.get(color)).sum();
    let mut allocation: Vec<(Color, usize)> = primary.iter().map(|&color| (color, 0)).collect();
    let mut allocated = 0;

    if total > 0 {
        for (color, count) in allocation.iter_mut() {
            let color_pips = pips.get(*color);
            if color_pips == 0 {
                continue;
            }
            let share = basics * color_pips as usize / total as usize;
            let n = share.max(1).min(basics - allocated);
            *count = n;
            allocated += n;
        }
    }

    if allocated < basics {
        let mut top = 0;
        for (i, &(color, _)) in allocation.iter().enumerate() {
            if pips.get(color) > pips.get(allocation[top].0) {
                top = i;
            }
        }
        if let Some((_, count)) = allocation.get_mut(top) {
            *count += basics - allocated;
        }
    }

    allocation.retain(|&(_, count)| count > 0);
    allocation
}

/// Builds a deck with the default rules.
pub fn build_deck(pool: &[Card], draft_id: &str, bot_id: &str) -> DraftResult<Deck> {
    DeckBuilder::default().build(pool, draft_id, bot_id)
}

/// One bot's finished pool, as submitted to [`build_decks_for_bots`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase"))]
pub struct BotPool {
    pub bot_id: BotId,
    #[cfg_attr(feature = "serialization", serde(default))]
    pub bot_name: String,
    pub pool: Vec<Card>,
}

/// Outcome for one bot in a batch build.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
#[cfg_attr(feature = "serialization", serde(untagged))]
pub enum BotDeckResult {
    #[cfg_attr(feature = "serialization", serde(rename_all = "camelCase"))]
    Built {
        bot_id: BotId,
        bot_name: String,
        #[cfg_attr(feature = "serialization", serde(flatten))]
        deck: Deck,
    },
    /// The pool could not be built; a truncated view of it is returned instead.
    #[cfg_attr(feature = "serialization", serde(rename_all = "camelCase"))]
    Failed {
        bot_id: BotId,
        bot_name: String,
        error: String,
        non_lands: Vec<Card>,
        full_deck: Vec<Card>,
    },
}

impl BotDeckResult {
    pub fn bot_id(&self) -> &BotId {
        match self {
            BotDeckResult::Built { bot_id, .. } | BotDeckResult::Failed { bot_id, .. } => bot_id,
        }
    }

    pub fn deck(&self) -> Option<&Deck> {
        match self {
            BotDeckResult::Built { deck, .. } => Some(deck),
            BotDeckResult::Failed { .. } => None,
        }
    }
}

impl DeckBuilder {
    /// Builds every bot's deck in parallel. Output order matches `bots`, and a
    /// failing bot never affects the others.
    pub fn build_for_bots(&self, draft_id: &str, bots: &[BotPool]) -> Vec<BotDeckResult> {
        bots.par_iter()
            .map(|bot| match self.build(&bot.pool, draft_id, bot.bot_id.as_str()) {
                Ok(deck) => BotDeckResult::Built {
                    bot_id: bot.bot_id.clone(),
                    bot_name: bot.bot_name.clone(),
                    deck,
                },
                Err(err) => {
                    warn!("deck build failed for bot {} ({}): {err}", bot.bot_name, bot.bot_id);
                    BotDeckResult::Failed {
                        bot_id: bot.bot_id.clone(),
                        bot_name: bot.bot_name.clone(),
                        error: err.to_string(),
                        non_lands: bot.pool.iter().take(self.rules.max_spells).cloned().collect(),
                        full_deck: bot.pool.iter().take(self.rules.deck_size).cloned().collect(),
                    }
                }
            })
            .collect()
    }
}

/// [`DeckBuilder::build_for_bots`] with the default rules.
pub fn build_decks_for_bots(draft_id: &str, bots: &[BotPool]) -> Vec<BotDeckResult> {
    DeckBuilder::default().build_for_bots(draft_id, bots)
}
