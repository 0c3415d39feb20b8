//! Draft simulation and deck construction for a trading-card cube.
//!
//! The engine is a set of pure functions: packs are drawn from a catalog,
//! bots pick from packs one card at a time, and a finished 45-card pool is
//! assembled into a 40-card deck. Callers own all state between calls.

pub mod card;
pub mod color;
pub mod config;
pub mod deck;
pub mod error;
pub mod ids;
pub mod pack;
pub mod pick;
pub mod rng;


pub use card::{BASIC_LAND_NAMES, Card, CardBuilder, PtValue, Rarity, basic_land};
pub use color::{Color, ColorCounts, ColorSet};
pub use config::{DeckRules, DraftConfig};
pub use deck::{
    BotDeckResult, BotPool, Deck, DeckBuilder, build_deck, build_decks_for_bots, spell_score,
};
pub use error::{DraftError, DraftResult};
pub use ids::{BotId, CardId};
pub use pack::{
    GeneratedPack, PackOptions, generate_pack, generate_pack_from_entropy, generate_packs,
    generate_packs_from_entropy,
};
pub use pick::{
    PickContext, PickResult, base_score, color_fit_score, evaluate_pick,
    evaluate_pick_from_entropy, score_card,
};
