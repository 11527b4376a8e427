//! Deterministic display colors for category breakdown entries.
//!
//! Each category key hashes to a preferred slot of a fixed palette whose hues
//! are spaced with the golden-ratio increment. A single response never hands
//! out the same slot twice: a taken slot probes forward to the next free one.

use sha2::{Digest, Sha256};

use crate::constants::OTHER_CATEGORY_COLOR;

const PALETTE_SIZE: usize = 16;
const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;
const SATURATION: u32 = 70;
const LIGHTNESS: u32 = 60;

fn slot_hue(slot: usize) -> u32 {
    ((slot as f64 * GOLDEN_RATIO_CONJUGATE).fract() * 360.0).round() as u32 % 360
}

fn slot_color(slot: usize) -> String {
    format!("hsl({}, {}%, {}%)", slot_hue(slot), SATURATION, LIGHTNESS)
}

fn preferred_slot(key: &str) -> usize {
    let digest = Sha256::digest(key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % PALETTE_SIZE as u64) as usize
}

/// Hands out palette colors for one response.
#[derive(Debug, Default)]
pub struct CategoryColorAssigner {
    taken: [bool; PALETTE_SIZE],
}

impl CategoryColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, key: &str) -> String {
        let start = preferred_slot(key);
        let slot = (0..PALETTE_SIZE)
            .map(|offset| (start + offset) % PALETTE_SIZE)
            .find(|slot| !self.taken[*slot])
            .unwrap_or(start);
        self.taken[slot] = true;
        slot_color(slot)
    }

    /// The fixed neutral color of the "Other" bucket.
    pub fn other() -> &'static str {
        OTHER_CATEGORY_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palette_hues_are_distinct() {
        let hues: HashSet<u32> = (0..PALETTE_SIZE).map(slot_hue).collect();
        assert_eq!(hues.len(), PALETTE_SIZE);
    }

    #[test]
    fn same_key_gets_same_color_across_responses() {
        let first = CategoryColorAssigner::new().assign("cat-groceries");
        let second = CategoryColorAssigner::new().assign("cat-groceries");
        assert_eq!(first, second);
    }

    #[test]
    fn colors_within_a_response_never_repeat() {
        let mut assigner = CategoryColorAssigner::new();
        let colors: Vec<String> = (0..PALETTE_SIZE)
            .map(|i| assigner.assign(&format!("category-{i}")))
            .collect();
        let unique: HashSet<&String> = colors.iter().collect();
        assert_eq!(unique.len(), PALETTE_SIZE);
        assert!(!colors.iter().any(|c| c == CategoryColorAssigner::other()));
    }
}
