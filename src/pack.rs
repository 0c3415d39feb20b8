//! Pack generation.
//!
//! Packs are drawn without replacement from a catalog slice, either uniformly
//! or under a color-balance template (two mono-colored cards per color, then
//! filler). Generation is intentionally non-reproducible; callers that want a
//! fixed sequence inject their own generator.

use std::collections::HashSet;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::card::Card;
use crate::color::Color;
use crate::error::{DraftError, DraftResult};
use crate::rng::entropy_rng;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Default number of cards in a pack.
pub const DEFAULT_PACK_SIZE: usize = 15;
/// Mono-colored cards a color-balanced pack aims for, per color.
pub const CARDS_PER_COLOR: usize = 2;

/// Options for a single pack draw.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase", default))]
pub struct PackOptions {
    /// Requested number of cards.
    pub size: usize,
    /// When set, a short catalog yields a smaller pack instead of an error,
    /// provided at least this many cards are available.
    pub min_size: Option<usize>,
    pub color_balanced: bool,
    pub exclude_facedown: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_PACK_SIZE,
            min_size: None,
            color_balanced: false,
            exclude_facedown: true,
        }
    }
}

impl PackOptions {
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn color_balanced(mut self) -> Self {
        self.color_balanced = true;
        self
    }

    pub fn min_size(mut self, min_size: usize) -> Self {
        self.min_size = Some(min_size);
        self
    }
}

/// A generated pack plus sizing metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase"))]
pub struct GeneratedPack {
    pub pack: Vec<Card>,
    pub requested_size: usize,
    pub actual_size: usize,
    pub total_available: usize,
    /// True when the pack was shrunk to fit a short catalog.
    pub adjusted: bool,
}

/// Cards eligible for packs: facedown entries optionally removed, duplicate
/// identifiers collapsed to their first occurrence.
fn eligible_cards(catalog: &[Card], exclude_facedown: bool) -> Vec<&Card> {
    let mut seen = HashSet::new();
    let mut eligible = Vec::with_capacity(catalog.len());
    for card in catalog {
        if exclude_facedown && card.facedown {
            continue;
        }
        if seen.insert(&card.id) {
            eligible.push(card);
        }
    }
    eligible
}

/// Draws one pack from `catalog`.
pub fn generate_pack<R: Rng + ?Sized>(
    catalog: &[Card],
    options: &PackOptions,
    rng: &mut R,
) -> DraftResult<GeneratedPack> {
    let eligible = eligible_cards(catalog, options.exclude_facedown);
    let available = eligible.len();

    let target = if available >= options.size {
        options.size
    } else {
        match options.min_size {
            Some(min_size) if available >= min_size => {
                warn!(
                    "catalog short for a {}-card pack, shrinking to {}",
                    options.size, available
                );
                available
            }
            _ => {
                return Err(DraftError::InsufficientCards {
                    requested: options.size,
                    available,
                });
            }
        }
    };

    let pack = if options.color_balanced {
        color_balanced_pack(eligible, target, rng)
    } else {
        uniform_pack(eligible, target, rng)
    };

    debug!(
        "generated {} pack: {}/{} cards from {} available",
        if options.color_balanced { "color-balanced" } else { "uniform" },
        pack.len(),
        options.size,
        available
    );

    Ok(GeneratedPack {
        actual_size: pack.len(),
        pack,
        requested_size: options.size,
        total_available: available,
        adjusted: target < options.size,
    })
}

/// [`generate_pack`] with a fresh entropy-seeded generator.
pub fn generate_pack_from_entropy(
    catalog: &[Card],
    options: &PackOptions,
) -> DraftResult<GeneratedPack> {
    generate_pack(catalog, options, &mut entropy_rng())
}

fn uniform_pack<R: Rng + ?Sized>(mut eligible: Vec<&Card>, size: usize, rng: &mut R) -> Vec<Card> {
    eligible.shuffle(rng);
    eligible.into_iter().take(size).cloned().collect()
}

fn color_balanced_pack<R: Rng + ?Sized>(
    mut candidates: Vec<&Card>,
    size: usize,
    rng: &mut R,
) -> Vec<Card> {
    candidates.shuffle(rng);

    let mut taken = vec![false; candidates.len()];
    let mut pack: Vec<&Card> = Vec::with_capacity(size);

    for color in Color::ALL {
        let mut picked = 0;
        for (i, card) in candidates.iter().enumerate() {
            if pack.len() >= size || picked >= CARDS_PER_COLOR {
                break;
            }
            if !taken[i] && card.is_mono(color) {
                taken[i] = true;
                pack.push(*card);
                picked += 1;
            }
        }
        if picked < CARDS_PER_COLOR {
            debug!("only {picked} mono-{color} cards available for color-balanced pack");
        }
    }

    // Filler: multicolor, colorless or land, in fresh random order.
    let mut filler: Vec<usize> = (0..candidates.len())
        .filter(|&i| !taken[i])
        .filter(|&i| {
            let card = candidates[i];
            card.is_multicolor() || card.is_colorless() || card.is_land()
        })
        .collect();
    filler.shuffle(rng);
    for i in filler {
        if pack.len() >= size {
            break;
        }
        taken[i] = true;
        pack.push(candidates[i]);
    }

    // Anything left, when the catalog lacks filler.
    for (i, card) in candidates.iter().enumerate() {
        if pack.len() >= size {
            break;
        }
        if !taken[i] {
            taken[i] = true;
            pack.push(*card);
        }
    }

    pack.shuffle(rng);
    pack.into_iter().cloned().collect()
}

/// Draws `count` mutually disjoint packs of `pack_size` cards.
///
/// The eligible catalog is shuffled once and partitioned contiguously, so no
/// identifier appears in more than one pack.
pub fn generate_packs<R: Rng + ?Sized>(
    catalog: &[Card],
    count: usize,
    pack_size: usize,
    rng: &mut R,
) -> DraftResult<Vec<Vec<Card>>> {
    let mut eligible = eligible_cards(catalog, true);
    // An unrepresentable total is reported as the largest possible request.
    let required = count.checked_mul(pack_size).unwrap_or(usize::MAX);
    if eligible.len() < required {
        return Err(DraftError::InsufficientCards {
            requested: required,
            available: eligible.len(),
        });
    }

    if pack_size == 0 {
        return Ok(vec![Vec::new(); count]);
    }

    eligible.shuffle(rng);
    let packs: Vec<Vec<Card>> = eligible[..required]
        .chunks(pack_size)
        .map(|chunk| chunk.iter().map(|card| (*card).clone()).collect())
        .collect();

    debug!(
        "generated {} packs of {} from {} eligible cards",
        packs.len(),
        pack_size,
        eligible.len()
    );
    Ok(packs)
}

/// [`generate_packs`] with a fresh entropy-seeded generator.
pub fn generate_packs_from_entropy(
    catalog: &[Card],
    count: usize,
    pack_size: usize,
) -> DraftResult<Vec<Vec<Card>>> {
    generate_packs(catalog, count, pack_size, &mut entropy_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardBuilder;
    use crate::color::ColorSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mono(id: usize, color: Color) -> Card {
        CardBuilder::new(format!("m{id}"), format!("Mono {color} {id}"))
            .type_line("Creature — Soldier")
            .colors(ColorSet::from_color(color))
            .build()
    }

    fn artifact(id: usize) -> Card {
        CardBuilder::new(format!("a{id}"), format!("Relic {id}"))
            .type_line("Artifact")
            .build()
    }

    fn catalog(n: usize) -> Vec<Card> {
        (0..n).map(artifact).collect()
    }

    fn ids(cards: &[Card]) -> HashSet<String> {
        cards.iter().map(|c| c.id.0.clone()).collect()
    }

    #[test]
    fn test_uniform_pack_has_requested_size_and_unique_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let cards = catalog(40);
        let result = generate_pack(&cards, &PackOptions::default(), &mut rng).unwrap();
        assert_eq!(result.pack.len(), 15);
        assert_eq!(result.actual_size, 15);
        assert_eq!(result.total_available, 40);
        assert!(!result.adjusted);
        assert_eq!(ids(&result.pack).len(), 15);
    }

    #[test]
    fn test_short_catalog_fails_without_floor() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = generate_pack(&catalog(9), &PackOptions::default(), &mut rng).unwrap_err();
        assert_eq!(
            err,
            DraftError::InsufficientCards {
                requested: 15,
                available: 9
            }
        );
    }

    #[test]
    fn test_short_catalog_shrinks_with_floor() {
        let mut rng = StdRng::seed_from_u64(7);
        let options = PackOptions::default().min_size(8);
        let result = generate_pack(&catalog(9), &options, &mut rng).unwrap();
        assert_eq!(result.pack.len(), 9);
        assert_eq!(result.requested_size, 15);
        assert_eq!(result.total_available, 9);
        assert!(result.adjusted);

        let options = PackOptions::default().min_size(10);
        assert!(generate_pack(&catalog(9), &options, &mut rng).is_err());
    }

    #[test]
    fn test_facedown_and_duplicates_are_not_eligible() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cards = catalog(14);
        cards.push(artifact(3));
        cards.push(
            CardBuilder::new("back", "Back Face")
                .type_line("Creature")
                .facedown()
                .build(),
        );
        let err = generate_pack(&cards, &PackOptions::default(), &mut rng).unwrap_err();
        assert_eq!(
            err,
            DraftError::InsufficientCards {
                requested: 15,
                available: 14
            }
        );

        let options = PackOptions {
            exclude_facedown: false,
            ..PackOptions::default()
        };
        let result = generate_pack(&cards, &options, &mut rng).unwrap();
        assert_eq!(ids(&result.pack).len(), 15);
    }

    #[test]
    fn test_color_balanced_pack_covers_every_color() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut cards = Vec::new();
        let mut id = 0;
        for color in Color::ALL {
            for _ in 0..6 {
                cards.push(mono(id, color));
                id += 1;
            }
        }
        cards.extend((100..110).map(artifact));

        for _ in 0..20 {
            let options = PackOptions::default().color_balanced();
            let result = generate_pack(&cards, &options, &mut rng).unwrap();
            assert_eq!(result.pack.len(), 15);
            assert_eq!(ids(&result.pack).len(), 15);
            for color in Color::ALL {
                let n = result.pack.iter().filter(|c| c.is_mono(color)).count();
                assert!(n >= 2, "expected at least two {color} cards, got {n}");
            }
            // Filler comes from the colorless artifacts first.
            let filler = result.pack.iter().filter(|c| c.is_colorless()).count();
            assert_eq!(filler, 5);
        }
    }

    #[test]
    fn test_color_balanced_pack_degrades_when_color_missing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cards: Vec<Card> = (0..10).map(|i| mono(i, Color::Red)).collect();
        cards.push(mono(50, Color::Blue));
        cards.extend((0..2).map(artifact));

        let result =
            generate_pack(&cards, &PackOptions::default().color_balanced().min_size(1), &mut rng)
                .unwrap();
        assert_eq!(result.pack.len(), 13);
        assert_eq!(ids(&result.pack).len(), 13);
        assert_eq!(result.pack.iter().filter(|c| c.is_mono(Color::Blue)).count(), 1);
    }

    #[test]
    fn test_color_balanced_small_pack_never_overfills() {
        let mut rng = StdRng::seed_from_u64(5);
        let cards: Vec<Card> = (0..30).map(|i| mono(i, Color::ALL[i % 5])).collect();
        let result =
            generate_pack(&cards, &PackOptions::with_size(4).color_balanced(), &mut rng).unwrap();
        assert_eq!(result.pack.len(), 4);
    }

    #[test]
    fn test_batch_packs_are_disjoint() {
        let mut rng = StdRng::seed_from_u64(11);
        let cards = catalog(50);
        let packs = generate_packs(&cards, 3, 15, &mut rng).unwrap();
        assert_eq!(packs.len(), 3);
        let mut all = HashSet::new();
        for pack in &packs {
            assert_eq!(pack.len(), 15);
            for card in pack {
                assert!(all.insert(card.id.clone()), "duplicate {}", card.id);
            }
        }
    }

    #[test]
    fn test_batch_packs_report_shortfall() {
        let mut rng = StdRng::seed_from_u64(11);
        let err = generate_packs(&catalog(44), 3, 15, &mut rng).unwrap_err();
        assert_eq!(
            err,
            DraftError::InsufficientCards {
                requested: 45,
                available: 44
            }
        );
        assert!(generate_packs(&catalog(44), 0, 15, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_batch_packs_overflowing_request() {
        let mut rng = StdRng::seed_from_u64(12);
        let err = generate_packs(&catalog(44), usize::MAX, 15, &mut rng).unwrap_err();
        assert_eq!(
            err,
            DraftError::InsufficientCards {
                requested: usize::MAX,
                available: 44
            }
        );
    }
}
