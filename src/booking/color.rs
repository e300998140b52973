use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A light RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PastelColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PastelColor {
    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `FFRRGGBB`, the form spreadsheet fills take.
    pub fn to_argb(&self) -> String {
        format!("FF{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Random pastel generator with every channel drawn from `min..=max`.
pub struct ColorAssigner {
    rng: StdRng,
    min: u8,
    max: u8,
}

impl ColorAssigner {
    pub fn new(min: u8, max: u8, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        ColorAssigner { rng, min, max }
    }

    pub fn next_color(&mut self) -> PastelColor {
        PastelColor {
            r: self.rng.gen_range(self.min..=self.max),
            g: self.rng.gen_range(self.min..=self.max),
            b: self.rng.gen_range(self.min..=self.max),
        }
    }

    /// One color per distinct key, drawn in sorted key order.
    pub fn assign(&mut self, keys: &BTreeSet<String>) -> BookingPalette {
        let colors = keys
            .iter()
            .map(|key| (key.clone(), self.next_color()))
            .collect();
        BookingPalette { colors }
    }
}

/// Booking key to color mapping shared by every input file of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPalette {
    colors: BTreeMap<String, PastelColor>,
}

impl BookingPalette {
    pub fn color_for(&self, key: &str) -> Option<PastelColor> {
        self.colors.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PastelColor)> {
        self.colors.iter().map(|(key, color)| (key.as_str(), *color))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
