//! Static outfit catalog.
//!
//! Answers `local` mode directly and supplies style-specific placeholders to
//! the fallback step. Loaded once at startup from JSON or the built-in table.
//!
//! File format:
//!
//! ```json
//! { "casual": [ { "name": "Linen shirt", "link": "https://..." } ] }
//! ```
//!
//! `url` is accepted in place of `link`.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::pipeline::extract::normalize_url;
use crate::pipeline::fallback::Placeholder;
use crate::types::slot::OutfitSlot;

/// One catalog line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(alias = "url")]
    pub link: String,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }

    /// Slot guessed from the item name.
    pub fn slot(&self) -> Option<OutfitSlot> {
        OutfitSlot::from_label(&self.name)
    }
}

/// Styles in insertion order, keyed by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    styles: IndexMap<String, Vec<CatalogItem>>,
    aliases: HashMap<String, String>,
}

impl Catalog {
    /// Built-in catalog: casual, party, office.
    pub fn builtin() -> Self {
        let mut styles = IndexMap::new();
        styles.insert(
            "casual".to_string(),
            vec![
                CatalogItem::new("T-shirt", "https://www.uniqlo.com/us/en/men/tops/t-shirts"),
                CatalogItem::new("Jeans", "https://www.zara.com/us/en/man-jeans-l659.html"),
                CatalogItem::new("Sneakers", "https://www.nike.com/w/mens-shoes-nik1zy7ok"),
            ],
        );
        styles.insert(
            "party".to_string(),
            vec![
                CatalogItem::new("Blazer", "https://www.zara.com/us/en/man-blazers-l608.html"),
                CatalogItem::new("Shirt", "https://www.asos.com/men/shirts/cat/?cid=3602"),
                CatalogItem::new("Trousers", "https://www.mango.com/us/en/c/men/pants_8ea8ad5a"),
                CatalogItem::new("Loafers", "https://www.cos.com/en-us/men/shoes.html"),
            ],
        );
        styles.insert(
            "office".to_string(),
            vec![
                CatalogItem::new("White shirt", "https://www.massimodutti.com/us/men/shirts-n1744"),
                CatalogItem::new("Classic trousers", "https://www.cos.com/en-us/men/trousers.html"),
                CatalogItem::new("Leather shoes", "https://www.massimodutti.com/us/men/shoes-n1774"),
            ],
        );

        let aliases = [("кэжуал", "casual"), ("вечеринка", "party"), ("офис", "office")]
            .into_iter()
            .map(|(alias, key)| (alias.to_string(), key.to_string()))
            .collect();

        Self { styles, aliases }
    }

    /// Parse the JSON file format.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: IndexMap<String, Vec<CatalogItem>> = serde_json::from_str(json)?;

        let mut styles = IndexMap::new();
        for (style, items) in raw {
            let key = style.trim().to_lowercase();
            if key.is_empty() {
                warn!("Skipping catalog style with empty name");
                continue;
            }
            styles.insert(key, items);
        }

        Ok(Self {
            styles,
            aliases: HashMap::new(),
        })
    }

    /// Load from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        info!(path = %path.display(), styles = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Items for a style key (case-insensitive, aliases honored).
    pub fn get(&self, style: &str) -> Option<&[CatalogItem]> {
        let key = style.trim().to_lowercase();
        let key = self.aliases.get(&key).unwrap_or(&key);
        self.styles.get(key).map(|items| items.as_slice())
    }

    /// Style key named anywhere in a free-text query, if any.
    ///
    /// An exact match wins; otherwise the first style whose key appears as a
    /// whole word.
    pub fn style_in(&self, query: &str) -> Option<&str> {
        let lower = query.trim().to_lowercase();
        if let Some(key) = self.resolve(&lower) {
            return Some(key);
        }

        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.styles
            .keys()
            .map(String::as_str)
            .chain(self.aliases.keys().map(String::as_str))
            .find(|key| words.contains(key))
            .and_then(|key| self.resolve(key))
    }

    fn resolve(&self, key: &str) -> Option<&str> {
        let key = self.aliases.get(key).map(String::as_str).unwrap_or(key);
        self.styles.get_key_value(key).map(|(k, _)| k.as_str())
    }

    /// Style keys in catalog order.
    pub fn styles(&self) -> Vec<&str> {
        self.styles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Fallback placeholders for the style named in `query`.
    ///
    /// Items whose link doesn't parse are skipped.
    pub fn placeholders_for(&self, query: &str) -> Vec<Placeholder> {
        let Some(items) = self.style_in(query).and_then(|key| self.get(key)) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let url = normalize_url(&item.link)?;
                Some(Placeholder {
                    name: item.name.clone(),
                    url,
                    slot: item.slot(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_styles_in_order() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.styles(), vec!["casual", "party", "office"]);
        assert_eq!(catalog.get("Casual").map(|i| i.len()), Some(3));
    }

    #[test]
    fn test_aliases() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get("Офис").map(|i| i.len()), Some(3));
        assert_eq!(catalog.style_in("вечеринка"), Some("party"));
    }

    #[test]
    fn test_style_in_free_text() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.style_in("something casual for friday"), Some("casual"));
        assert_eq!(catalog.style_in("Office, but relaxed"), Some("office"));
        assert_eq!(catalog.style_in("officewear"), None);
        assert_eq!(catalog.style_in("beach"), None);
    }

    #[test]
    fn test_from_json_accepts_url_alias() {
        let json = r#"{"Sport": [{"name": "Running shoes", "url": "https://www.nike.com/t/x/AB1234-001"}]}"#;
        let catalog = Catalog::from_json_str(json).unwrap();

        let items = catalog.get("sport").unwrap();
        assert_eq!(items[0].link, "https://www.nike.com/t/x/AB1234-001");
        assert_eq!(items[0].slot(), Some(OutfitSlot::Footwear));
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Catalog::from_json_str("{\"x\": 1}").is_err());
    }

    #[test]
    fn test_placeholders_for_query() {
        let catalog = Catalog::builtin();
        let placeholders = catalog.placeholders_for("party tonight");

        assert_eq!(placeholders.len(), 4);
        assert_eq!(placeholders[0].name, "Blazer");
        assert_eq!(placeholders[0].slot, Some(OutfitSlot::Outerwear));
        assert!(catalog.placeholders_for("beach").is_empty());
    }
}
