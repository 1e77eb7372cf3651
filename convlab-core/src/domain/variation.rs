//! Variation registry: stable display identity for each experiment arm.

use serde::{Deserialize, Serialize};

use super::dataset::RawVariation;

/// Palette cycled by display order when no palette is configured.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#8884d8", "#82ca9d", "#ffc658", "#ff7300", "#a4de6c", "#d0ed57",
];

/// A variation as the chart sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub id: String,
    pub name: String,
    /// Index into the palette.
    pub display_order: usize,
}

/// Ordered, id-unique list of variations.
///
/// Built once from the raw variation list. A repeated id does not add a new
/// entry: the later occurrence takes over the name and display order of the
/// entry created by the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationRegistry {
    variations: Vec<Variation>,
}

impl VariationRegistry {
    pub fn from_raw(raw: &[RawVariation]) -> Self {
        let mut variations: Vec<Variation> = Vec::with_capacity(raw.len());
        for (index, rv) in raw.iter().enumerate() {
            let id = rv.id_string();
            if let Some(existing) = variations.iter_mut().find(|v| v.id == id) {
                tracing::warn!(id = %id, index, "duplicate variation id, later entry overrides");
                existing.name = rv.name.clone();
                existing.display_order = index;
                continue;
            }
            variations.push(Variation {
                id,
                name: rv.name.clone(),
                display_order: index,
            });
        }
        Self { variations }
    }

    pub fn len(&self) -> usize {
        self.variations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variation> {
        self.variations.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.variations.iter().map(|v| v.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id == id)
    }

    /// Variation at a list position (used for numbered toggles).
    pub fn by_position(&self, position: usize) -> Option<&Variation> {
        self.variations.get(position)
    }

    /// Palette color for a variation, cycling when the palette is shorter
    /// than the variation list.
    pub fn color_for<'a>(&self, variation: &Variation, palette: &'a [String]) -> &'a str {
        if palette.is_empty() {
            return DEFAULT_PALETTE[variation.display_order % DEFAULT_PALETTE.len()];
        }
        &palette[variation.display_order % palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: Option<i64>, name: &str) -> RawVariation {
        RawVariation {
            id,
            name: name.to_string(),
        }
    }

    fn palette() -> Vec<String> {
        DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn absent_id_becomes_zero() {
        let registry = VariationRegistry::from_raw(&[raw(None, "Original"), raw(Some(7), "B")]);
        assert_eq!(registry.ids(), vec!["0".to_string(), "7".to_string()]);
        assert_eq!(registry.get("0").unwrap().name, "Original");
    }

    #[test]
    fn colors_cycle_through_palette() {
        let raws: Vec<RawVariation> = (1..=8).map(|i| raw(Some(i), "v")).collect();
        let registry = VariationRegistry::from_raw(&raws);
        let palette = palette();

        let seventh = registry.by_position(6).unwrap();
        let first = registry.by_position(0).unwrap();
        assert_eq!(registry.color_for(seventh, &palette), registry.color_for(first, &palette));
        assert_eq!(registry.color_for(first, &palette), "#8884d8");
    }

    #[test]
    fn empty_palette_falls_back_to_default() {
        let registry = VariationRegistry::from_raw(&[raw(Some(1), "A"), raw(Some(2), "B")]);
        let second = registry.by_position(1).unwrap();
        assert_eq!(registry.color_for(second, &[]), "#82ca9d");
    }

    #[test]
    fn duplicate_id_overrides_without_crashing() {
        let registry = VariationRegistry::from_raw(&[
            raw(Some(1), "First"),
            raw(Some(2), "Other"),
            raw(Some(1), "Second"),
        ]);

        assert_eq!(registry.len(), 2);
        let dup = registry.get("1").unwrap();
        assert_eq!(dup.name, "Second");
        assert_eq!(dup.display_order, 2);
        // Position still follows the first occurrence.
        assert_eq!(registry.by_position(0).unwrap().id, "1");
    }
}
