use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// All five colors in WUBRG order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// The single-letter symbol used in catalog records.
    pub const fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    /// Parses either a symbol ("R") or a color name ("Red"), ignoring case.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_symbol(c);
        }
        match text.to_ascii_lowercase().as_str() {
            "white" => Some(Color::White),
            "blue" => Some(Color::Blue),
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            _ => None,
        }
    }

    /// Name of the basic land that taps for this color.
    pub const fn basic_land_name(self) -> &'static str {
        match self {
            Color::White => "Plains",
            Color::Blue => "Island",
            Color::Black => "Swamp",
            Color::Red => "Mountain",
            Color::Green => "Forest",
        }
    }

    const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Blue => 1,
            Color::Black => 2,
            Color::Red => 3,
            Color::Green => 4,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A set of colors represented as bitflags for efficient operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub const COLORLESS: Self = Self(0);
    pub const WHITE: Self = Self(1 << 0);
    pub const BLUE: Self = Self(1 << 1);
    pub const BLACK: Self = Self(1 << 2);
    pub const RED: Self = Self(1 << 3);
    pub const GREEN: Self = Self(1 << 4);

    /// Creates a new empty ColorSet.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Creates a ColorSet from a single color.
    pub const fn from_color(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE,
            Color::Blue => Self::BLUE,
            Color::Black => Self::BLACK,
            Color::Red => Self::RED,
            Color::Green => Self::GREEN,
        }
    }

    /// Parses a compact symbol string such as "WU" or "rg".
    /// Characters that are not color symbols are skipped.
    pub fn from_symbols(symbols: &str) -> Self {
        symbols.chars().filter_map(Color::from_symbol).collect()
    }

    /// Returns true if this set contains no colors.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this set contains the given color.
    pub const fn contains(self, color: Color) -> bool {
        self.0 & Self::from_color(color).0 != 0
    }

    /// Returns true if this set contains all colors in the other set.
    pub const fn contains_all(self, other: ColorSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two color sets.
    pub const fn union(self, other: ColorSet) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the intersection of two color sets.
    pub const fn intersection(self, other: ColorSet) -> Self {
        Self(self.0 & other.0)
    }

    /// Colors in this set that are not in `other`.
    pub const fn difference(self, other: ColorSet) -> Self {
        Self(self.0 & !other.0)
    }

    /// Returns the number of colors in this set.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Adds a color to this set, returning the new set.
    pub const fn with(self, color: Color) -> Self {
        self.union(Self::from_color(color))
    }

    /// Iterates the contained colors in WUBRG order.
    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "C");
        }
        for color in self.iter() {
            write!(f, "{}", color.symbol())?;
        }
        Ok(())
    }
}

impl From<Color> for ColorSet {
    fn from(color: Color) -> Self {
        Self::from_color(color)
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ColorSet::COLORLESS, |set, color| set.with(color))
    }
}

/// Per-color tally, used for pip counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorCounts([u32; 5]);

impl ColorCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one pip for every color in `colors`.
    pub fn add(&mut self, colors: ColorSet) {
        for color in colors.iter() {
            self.0[color.index()] += 1;
        }
    }

    pub fn get(&self, color: Color) -> u32 {
        self.0[color.index()]
    }

    /// Colors with a nonzero count, most frequent first. Equal counts keep WUBRG order.
    pub fn ranked(&self) -> Vec<(Color, u32)> {
        let mut ranked: Vec<(Color, u32)> = Color::ALL
            .into_iter()
            .map(|c| (c, self.get(c)))
            .filter(|(_, n)| *n > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl<'a> FromIterator<&'a ColorSet> for ColorCounts {
    fn from_iter<T: IntoIterator<Item = &'a ColorSet>>(iter: T) -> Self {
        let mut counts = ColorCounts::new();
        for colors in iter {
            counts.add(*colors);
        }
        counts
    }
}

#[cfg(feature = "serialization")]
mod serde_impls {
    use super::{Color, ColorSet};
    use serde::de::{self, Deserializer, SeqAccess, Visitor};
    use serde::ser::{SerializeSeq, Serializer};
    use serde::{Deserialize, Serialize};
    use std::fmt;

    impl Serialize for Color {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_char(self.symbol())
        }
    }

    impl<'de> Deserialize<'de> for Color {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let text = String::deserialize(deserializer)?;
            Color::parse(&text)
                .ok_or_else(|| de::Error::custom(format!("unknown color: {text}")))
        }
    }

    /// Serialized as a list of symbols, e.g. `["W", "U"]`.
    impl Serialize for ColorSet {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.count() as usize))?;
            for color in self.iter() {
                seq.serialize_element(&color)?;
            }
            seq.end()
        }
    }

    /// Accepts a list of symbols or names, a compact string ("WU"), or null.
    /// Unknown entries are skipped rather than rejected.
    impl<'de> Deserialize<'de> for ColorSet {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct ColorSetVisitor;

            impl<'de> Visitor<'de> for ColorSetVisitor {
                type Value = ColorSet;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a list of color symbols")
                }

                fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ColorSet, A::Error> {
                    let mut set = ColorSet::COLORLESS;
                    while let Some(entry) = seq.next_element::<String>()? {
                        if let Some(color) = Color::parse(&entry) {
                            set = set.with(color);
                        }
                    }
                    Ok(set)
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<ColorSet, E> {
                    Ok(ColorSet::from_symbols(v))
                }

                fn visit_unit<E: de::Error>(self) -> Result<ColorSet, E> {
                    Ok(ColorSet::COLORLESS)
                }

                fn visit_none<E: de::Error>(self) -> Result<ColorSet, E> {
                    Ok(ColorSet::COLORLESS)
                }
            }

            deserializer.deserialize_any(ColorSetVisitor)
        }
    }
}
