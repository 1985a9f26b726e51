//! Outfit slots used to label suggestion lines.

use serde::{Deserialize, Serialize};

/// One of the five item categories an outfit is made of.
///
/// Slots only label output. Nothing forces the model to return one item per
/// slot; unlabeled items are assigned slots in [`OutfitSlot::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitSlot {
    Top,
    Bottom,
    Footwear,
    Outerwear,
    Accessory,
}

impl OutfitSlot {
    /// Canonical order, also used for positional assignment.
    pub const ALL: [OutfitSlot; 5] = [
        OutfitSlot::Top,
        OutfitSlot::Bottom,
        OutfitSlot::Footwear,
        OutfitSlot::Outerwear,
        OutfitSlot::Accessory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutfitSlot::Top => "top",
            OutfitSlot::Bottom => "bottom",
            OutfitSlot::Footwear => "footwear",
            OutfitSlot::Outerwear => "outerwear",
            OutfitSlot::Accessory => "accessory",
        }
    }

    /// Human label for message lines.
    pub fn label(&self) -> &'static str {
        match self {
            OutfitSlot::Top => "Top",
            OutfitSlot::Bottom => "Bottom",
            OutfitSlot::Footwear => "Footwear",
            OutfitSlot::Outerwear => "Outerwear",
            OutfitSlot::Accessory => "Accessory",
        }
    }

    /// Map a free-form category string from the model onto a slot.
    ///
    /// Matches on keywords, so "Oversized T-shirt" and "футболка" both land
    /// on [`OutfitSlot::Top`].
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }

        const KEYWORDS: &[(OutfitSlot, &[&str])] = &[
            (
                OutfitSlot::Outerwear,
                &[
                    "outer", "jacket", "coat", "blazer", "parka", "trench", "пальто", "куртк",
                    "пиджак", "верхн",
                ],
            ),
            (
                OutfitSlot::Footwear,
                &[
                    "foot", "shoe", "sneaker", "boot", "loafer", "sandal", "heel", "обув",
                    "кроссов", "туфл", "ботин", "кед",
                ],
            ),
            (
                OutfitSlot::Bottom,
                &[
                    "bottom", "pant", "trouser", "jean", "skirt", "short", "chino", "брюк",
                    "джинс", "юбк", "шорт", "низ",
                ],
            ),
            (
                OutfitSlot::Accessory,
                &[
                    "access", "bag", "belt", "hat", "cap", "scarf", "watch", "jewel", "sunglass",
                    "аксесс", "сумк", "ремен", "шапк", "шарф", "часы",
                ],
            ),
            (
                OutfitSlot::Top,
                &[
                    "top", "shirt", "tee", "blouse", "sweater", "hoodie", "knit", "polo",
                    "cardigan", "футболк", "рубаш", "блуз", "свитер", "худи", "верх",
                ],
            ),
        ];

        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| label.contains(w)))
            .map(|(slot, _)| *slot)
    }

    /// First slot in canonical order not present in `taken`.
    pub fn next_free(taken: &[OutfitSlot]) -> Option<OutfitSlot> {
        OutfitSlot::ALL.into_iter().find(|s| !taken.contains(s))
    }

    /// Slot for the next line: the proposed one if still free, else the
    /// first free slot, else the proposed one anyway (or Accessory).
    pub fn assign(proposed: Option<OutfitSlot>, taken: &[OutfitSlot]) -> OutfitSlot {
        match proposed {
            Some(slot) if !taken.contains(&slot) => slot,
            _ => Self::next_free(taken)
                .or(proposed)
                .unwrap_or(OutfitSlot::Accessory),
        }
    }
}

impl std::fmt::Display for OutfitSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
