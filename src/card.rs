use std::fmt;

use crate::color::{Color, ColorSet};
use crate::ids::CardId;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Canonical names of the five basic lands, in WUBRG order.
pub const BASIC_LAND_NAMES: [&str; 5] = ["Plains", "Island", "Swamp", "Mountain", "Forest"];

/// Represents power or toughness values that may be variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtValue {
    /// Fixed numeric value (e.g., 4)
    Fixed(i32),
    /// Value determined by some characteristic (printed as *, *+1, ...)
    Variable,
}

impl PtValue {
    /// Parses a printed stat. Integers become `Fixed`; anything else that is
    /// not blank (including `*`) becomes `Variable`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match text.parse::<i32>() {
            Ok(n) => Some(PtValue::Fixed(n)),
            Err(_) => Some(PtValue::Variable),
        }
    }

    pub fn is_variable(self) -> bool {
        matches!(self, PtValue::Variable)
    }
}

impl fmt::Display for PtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PtValue::Fixed(n) => write!(f, "{n}"),
            PtValue::Variable => write!(f, "*"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    /// Lenient parse: unknown text falls back to Common.
    pub fn parse(text: &str) -> Self {
        let lower = text.trim().to_ascii_lowercase();
        if lower.starts_with("mythic") {
            Rarity::Mythic
        } else if lower == "rare" {
            Rarity::Rare
        } else if lower == "uncommon" {
            Rarity::Uncommon
        } else {
            Rarity::Common
        }
    }

    /// Scoring tier: 0 for Common up to 3 for Mythic.
    pub fn tier(self) -> u32 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Mythic => 3,
        }
    }
}

/// A catalog card record.
///
/// Records are read-only inputs to the engine: packs, picks and decks are
/// built from clones, never by editing a card in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "camelCase"))]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[cfg_attr(feature = "serialization", serde(rename = "type", default))]
    pub type_line: String,
    #[cfg_attr(feature = "serialization", serde(default))]
    pub colors: ColorSet,
    #[cfg_attr(
        feature = "serialization",
        serde(default, alias = "cmc", skip_serializing_if = "Option::is_none")
    )]
    pub mana_value: Option<u32>,
    /// Printed cost such as `{2}{R}{R}`; used when no explicit mana value is given.
    #[cfg_attr(
        feature = "serialization",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub mana_cost: Option<String>,
    #[cfg_attr(
        feature = "serialization",
        serde(
            default,
            with = "pt_serde",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub power: Option<PtValue>,
    #[cfg_attr(
        feature = "serialization",
        serde(
            default,
            with = "pt_serde",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub toughness: Option<PtValue>,
    #[cfg_attr(feature = "serialization", serde(default))]
    pub rarity: Rarity,
    /// Back faces and face-down cube entries; kept out of packs by default.
    #[cfg_attr(feature = "serialization", serde(default))]
    pub facedown: bool,
}

impl Card {
    /// Returns true if the type line mentions a land (any case).
    pub fn is_land(&self) -> bool {
        self.type_line.to_lowercase().contains("land")
    }

    /// Returns true for basic lands, recognised by type line or by name.
    pub fn is_basic_land(&self) -> bool {
        self.type_line.to_lowercase().contains("basic")
            || BASIC_LAND_NAMES.contains(&self.name.as_str())
    }

    pub fn is_multicolor(&self) -> bool {
        self.colors.count() > 1
    }

    pub fn is_colorless(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns true if this card's colors are exactly `color`.
    pub fn is_mono(&self, color: Color) -> bool {
        self.colors == ColorSet::from_color(color)
    }

    pub fn is_creature(&self) -> bool {
        self.type_line.contains("Creature")
    }

    pub fn is_instant_or_sorcery(&self) -> bool {
        self.type_line.contains("Instant") || self.type_line.contains("Sorcery")
    }

    /// Mana value, falling back to the printed cost and then to 0.
    pub fn converted_cost(&self) -> u32 {
        if let Some(value) = self.mana_value {
            return value;
        }
        self.mana_cost
            .as_deref()
            .map(mana_value_of_cost)
            .unwrap_or(0)
    }
}

/// Sums a printed cost like `{3}{W}{W}`. Generic numbers count at face value,
/// `X` counts 0, every other symbol (colored, hybrid, phyrexian) counts 1.
fn mana_value_of_cost(cost: &str) -> u32 {
    cost.split('{')
        .filter_map(|chunk| chunk.split('}').next())
        .filter(|symbol| !symbol.is_empty())
        .map(|symbol| {
            let head = symbol.split('/').next().unwrap_or(symbol);
            if let Ok(n) = head.parse::<u32>() {
                n
            } else if head.eq_ignore_ascii_case("x") {
                0
            } else {
                1
            }
        })
        .fold(0u32, u32::saturating_add)
}

#[cfg(feature = "serialization")]
mod pt_serde {
    use super::PtValue;
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &Option<PtValue>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(PtValue::Fixed(n)) => serializer.serialize_i32(*n),
            Some(PtValue::Variable) => serializer.serialize_str("*"),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts numbers, numeric strings, `*`-style strings and null.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PtValue>, D::Error> {
        struct PtVisitor;

        impl<'de> Visitor<'de> for PtVisitor {
            type Value = Option<PtValue>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a power/toughness number or string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Some(i32::try_from(v).map_or(PtValue::Variable, PtValue::Fixed)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Some(i32::try_from(v).map_or(PtValue::Variable, PtValue::Fixed)))
            }

            // Only whole numbers inside the i32 range stay fixed.
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                let whole = v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX);
                Ok(Some(if whole {
                    PtValue::Fixed(v as i32)
                } else {
                    PtValue::Variable
                }))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(PtValue::parse(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }
        }

        deserializer.deserialize_any(PtVisitor)
    }
}

#[cfg(feature = "serialization")]
impl<'de> Deserialize<'de> for Rarity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        Ok(text.as_deref().map(Rarity::parse).unwrap_or_default())
    }
}

/// Builder for constructing Card instances.
#[derive(Debug, Default, Clone)]
pub struct CardBuilder {
    id: CardId,
    name: String,
    type_line: String,
    colors: ColorSet,
    mana_value: Option<u32>,
    mana_cost: Option<String>,
    power: Option<PtValue>,
    toughness: Option<PtValue>,
    rarity: Rarity,
    facedown: bool,
}

impl CardBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = type_line.into();
        self
    }

    pub fn colors(mut self, colors: ColorSet) -> Self {
        self.colors = colors;
        self
    }

    pub fn mana_value(mut self, value: u32) -> Self {
        self.mana_value = Some(value);
        self
    }

    pub fn mana_cost(mut self, cost: impl Into<String>) -> Self {
        self.mana_cost = Some(cost.into());
        self
    }

    /// Sets fixed power and toughness.
    pub fn stats(mut self, power: i32, toughness: i32) -> Self {
        self.power = Some(PtValue::Fixed(power));
        self.toughness = Some(PtValue::Fixed(toughness));
        self
    }

    pub fn power_toughness(mut self, power: PtValue, toughness: PtValue) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn facedown(mut self) -> Self {
        self.facedown = true;
        self
    }

    pub fn build(self) -> Card {
        Card {
            id: self.id,
            name: self.name,
            type_line: self.type_line,
            colors: self.colors,
            mana_value: self.mana_value,
            mana_cost: self.mana_cost,
            power: self.power,
            toughness: self.toughness,
            rarity: self.rarity,
            facedown: self.facedown,
        }
    }
}

/// A freshly minted basic land for `color`; never taken from a pool.
pub fn basic_land(color: Color, id: impl Into<String>) -> Card {
    let name = color.basic_land_name();
    CardBuilder::new(id, name)
        .type_line(format!("Basic Land — {name}"))
        .mana_value(0)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lightning_bolt() -> Card {
        CardBuilder::new("c1", "Lightning Bolt")
            .type_line("Instant")
            .colors(ColorSet::RED)
            .mana_cost("{R}")
            .build()
    }

    fn serra_angel() -> Card {
        CardBuilder::new("c2", "Serra Angel")
            .type_line("Creature — Angel")
            .colors(ColorSet::WHITE)
            .mana_value(5)
            .stats(4, 4)
            .rarity(Rarity::Uncommon)
            .build()
    }

    #[test]
    fn test_spell_and_creature_predicates() {
        let bolt = lightning_bolt();
        assert!(bolt.is_instant_or_sorcery());
        assert!(!bolt.is_creature());
        assert!(bolt.is_mono(Color::Red));
        assert_eq!(bolt.converted_cost(), 1);

        let angel = serra_angel();
        assert!(angel.is_creature());
        assert!(!angel.is_land());
        assert_eq!(angel.converted_cost(), 5);
        assert_eq!(angel.power, Some(PtValue::Fixed(4)));
    }

    #[test]
    fn test_land_classification() {
        let forest = basic_land(Color::Green, "b1");
        assert!(forest.is_land());
        assert!(forest.is_basic_land());
        assert!(forest.is_colorless());
        assert_eq!(forest.name, "Forest");

        let dual = CardBuilder::new("l1", "Hallowed Fountain")
            .type_line("Land — Plains Island")
            .colors(ColorSet::WHITE.union(ColorSet::BLUE))
            .build();
        assert!(dual.is_land());
        assert!(!dual.is_basic_land());
        assert!(dual.is_multicolor());

        // Name alone is enough to count as basic.
        let named = CardBuilder::new("l2", "Island").type_line("LAND").build();
        assert!(named.is_land());
        assert!(named.is_basic_land());
    }

    #[test]
    fn test_pt_value_parse() {
        assert_eq!(PtValue::parse("3"), Some(PtValue::Fixed(3)));
        assert_eq!(PtValue::parse("-1"), Some(PtValue::Fixed(-1)));
        assert_eq!(PtValue::parse("*"), Some(PtValue::Variable));
        assert_eq!(PtValue::parse("1+*"), Some(PtValue::Variable));
        assert_eq!(PtValue::parse("  "), None);
    }

    #[test]
    fn test_rarity_parse() {
        assert_eq!(Rarity::parse("Mythic Rare"), Rarity::Mythic);
        assert_eq!(Rarity::parse("mythic"), Rarity::Mythic);
        assert_eq!(Rarity::parse("Rare"), Rarity::Rare);
        assert_eq!(Rarity::parse("Special"), Rarity::Common);
        assert_eq!(Rarity::Mythic.tier(), 3);
    }

    #[test]
    fn test_mana_value_of_cost() {
        assert_eq!(mana_value_of_cost("{2}{R}{R}"), 4);
        assert_eq!(mana_value_of_cost("{X}{G}"), 1);
        assert_eq!(mana_value_of_cost("{2/W}{W/U}"), 3);
        assert_eq!(mana_value_of_cost(""), 0);
        assert_eq!(mana_value_of_cost("{4000000000}{4000000000}"), u32::MAX);
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_card_from_catalog_json() {
        let json = r#"{
            "id": "65f0",
            "name": "Tarmogoyf",
            "type": "Creature — Lhurgoyf",
            "colors": ["G"],
            "manaCost": "{1}{G}",
            "power": "*",
            "toughness": "1+*",
            "rarity": "Mythic Rare",
            "text": "ignored"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, CardId::new("65f0"));
        assert_eq!(card.colors, ColorSet::GREEN);
        assert_eq!(card.power, Some(PtValue::Variable));
        assert_eq!(card.toughness, Some(PtValue::Variable));
        assert_eq!(card.rarity, Rarity::Mythic);
        assert_eq!(card.converted_cost(), 2);
        assert!(!card.facedown);
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_card_json_missing_fields_are_normalized() {
        let json = r#"{"id": "x", "name": "Mystery", "power": 2, "toughness": null, "rarity": null}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert!(card.is_colorless());
        assert_eq!(card.type_line, "");
        assert_eq!(card.power, Some(PtValue::Fixed(2)));
        assert_eq!(card.toughness, None);
        assert_eq!(card.rarity, Rarity::Common);
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_out_of_range_stats_become_variable() {
        let json = r#"[
            {"id": "a", "name": "Huge", "power": 4294967299, "toughness": -4294967299},
            {"id": "b", "name": "Half", "power": 2.5, "toughness": 3.0},
            {"id": "c", "name": "Edge", "power": 2147483647, "toughness": -2147483648}
        ]"#;
        let cards: Vec<Card> = serde_json::from_str(json).unwrap();
        assert_eq!(cards[0].power, Some(PtValue::Variable));
        assert_eq!(cards[0].toughness, Some(PtValue::Variable));
        assert_eq!(cards[1].power, Some(PtValue::Variable));
        assert_eq!(cards[1].toughness, Some(PtValue::Fixed(3)));
        assert_eq!(cards[2].power, Some(PtValue::Fixed(i32::MAX)));
        assert_eq!(cards[2].toughness, Some(PtValue::Fixed(i32::MIN)));
    }
}
