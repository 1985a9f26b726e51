//! Reply text. Everything here is HTML parse mode, so user and model text
//! goes through [`escape_html`].

use outfit_finder::{Catalog, CatalogItem, OutfitSlot, Outcome, Suggestion, SuggestionSource};
use telegram::models::{InlineKeyboardButton, InlineKeyboardMarkup};

use super::commands::style_callback_data;

const STYLE_BUTTONS_PER_ROW: usize = 3;

/// Escape text for Telegram HTML, including quotes for attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn slot_emoji(slot: OutfitSlot) -> &'static str {
    match slot {
        OutfitSlot::Top => "👕",
        OutfitSlot::Bottom => "👖",
        OutfitSlot::Footwear => "👟",
        OutfitSlot::Outerwear => "🧥",
        OutfitSlot::Accessory => "👜",
    }
}

pub fn welcome_text() -> String {
    "👋 <b>Hi! I put outfits together.</b>\n\n\
     Describe a style, e.g. <i>smart casual for a summer wedding</i>, \
     and I'll send links to product pages that are live right now.\n\n\
     /styles shows ready-made styles, /help explains the rest."
        .to_string()
}

pub fn help_text() -> String {
    "<b>How it works</b>\n\n\
     1. Send a style description in your own words.\n\
     2. I search retailer sites and check every link before replying.\n\
     3. If too few links check out, the rest are marked as store suggestions.\n\n\
     <b>Commands</b>\n\
     /start - introduction\n\
     /styles - pick a ready-made style\n\
     /help - this message"
        .to_string()
}

pub fn unknown_command_text(name: &str) -> String {
    format!(
        "🤔 Unknown command /{}. Try /help.",
        escape_html(name)
    )
}

/// Header of the style picker, or a note that there are none.
pub fn styles_text(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "No ready-made styles yet. Just describe what you want.".to_string();
    }
    format!(
        "📋 <b>Ready-made styles:</b> {}\n\nTap one or describe your own.",
        escape_html(&catalog.styles().join(", "))
    )
}

/// One button per catalog style.
pub fn styles_keyboard(catalog: &Catalog) -> Option<InlineKeyboardMarkup> {
    if catalog.is_empty() {
        return None;
    }
    let buttons = catalog
        .styles()
        .into_iter()
        .map(|style| InlineKeyboardButton::callback(style, style_callback_data(style)))
        .collect();
    Some(InlineKeyboardMarkup::grid(buttons, STYLE_BUTTONS_PER_ROW))
}

/// Reply for a finder [`Outcome`].
pub fn format_outcome(query: &str, outcome: &Outcome) -> String {
    let suggestions = outcome.suggestions();
    if suggestions.is_empty() {
        return nothing_text(query);
    }

    let mut text = format!("✨ <b>Outfit for \"{}\"</b>\n\n", escape_html(query));
    for (i, suggestion) in suggestions.iter().enumerate() {
        text.push_str(&suggestion_line(i + 1, suggestion));
        text.push('\n');
    }

    if outcome.fallback_count() > 0 {
        text.push_str(
            "\n⚠️ Not every item could be confirmed as a live product page. \
             Lines marked 🏬 are store suggestions to browse instead.",
        );
    } else if outcome.is_degraded() {
        text.push_str(&format!(
            "\n⚠️ Only {} of the links could be confirmed right now.",
            outcome.validated_count()
        ));
    }

    text.trim_end().to_string()
}

fn suggestion_line(number: usize, suggestion: &Suggestion) -> String {
    let marker = match suggestion.source {
        SuggestionSource::Validated => "",
        SuggestionSource::Fallback => " 🏬",
    };
    let url = escape_html(&suggestion.url);
    format!(
        "{}. {} {} - {}{}\n<a href=\"{}\">{}</a>",
        number,
        slot_emoji(suggestion.slot),
        suggestion.slot.label(),
        escape_html(suggestion.display_name()),
        marker,
        url,
        url
    )
}

/// Reply for a catalog style in local mode.
pub fn format_catalog_outfit(style: &str, items: &[CatalogItem]) -> String {
    if items.is_empty() {
        return nothing_text(style);
    }

    let mut taken = Vec::new();
    let mut text = format!("✨ <b>Outfit for \"{}\"</b>\n\n", escape_html(style));
    for (i, item) in items.iter().enumerate() {
        let slot = OutfitSlot::assign(item.slot(), &taken);
        taken.push(slot);
        let url = escape_html(&item.link);
        text.push_str(&format!(
            "{}. {} {} - {}\n<a href=\"{}\">{}</a>\n",
            i + 1,
            slot_emoji(slot),
            slot.label(),
            escape_html(&item.name),
            url,
            url
        ));
    }
    text.trim_end().to_string()
}

/// Local mode: the query names no catalog style.
pub fn style_not_found_text(query: &str, catalog: &Catalog) -> String {
    format!(
        "❌ Style \"{}\" not found.\n\n📋 Available styles: {}\n\nUse /styles to pick one.",
        escape_html(query),
        escape_html(&catalog.styles().join(", "))
    )
}

pub fn nothing_text(query: &str) -> String {
    format!(
        "😔 Sorry, I couldn't find working links for \"{}\" right now. \
         Try rephrasing or ask again in a minute.",
        escape_html(query)
    )
}

pub fn error_text() -> String {
    "⚠️ Something went wrong. Please try again.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(url: &str, slot: OutfitSlot, source: SuggestionSource) -> Suggestion {
        Suggestion {
            slot,
            name: "Shirt <linen> & co".to_string(),
            url: url.to_string(),
            title: None,
            source,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > \"d\""), "a &lt; b &amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn test_validated_outcome_lines() {
        let outcome = Outcome::Validated {
            suggestions: vec![suggestion(
                "https://www.asos.com/x/prd/1?a=1&b=2",
                OutfitSlot::Top,
                SuggestionSource::Validated,
            )],
        };

        let text = format_outcome("linen <summer>", &outcome);
        assert!(text.contains("linen &lt;summer&gt;"));
        assert!(text.contains("1. 👕 Top - Shirt &lt;linen&gt; &amp; co"));
        assert!(text.contains("href=\"https://www.asos.com/x/prd/1?a=1&amp;b=2\""));
        assert!(!text.contains("⚠️"));
    }

    #[test]
    fn test_degraded_outcome_has_notice() {
        let outcome = Outcome::Degraded {
            validated: vec![suggestion(
                "https://www.asos.com/x/prd/1",
                OutfitSlot::Top,
                SuggestionSource::Validated,
            )],
            fallback: vec![suggestion(
                "https://www.zara.com/",
                OutfitSlot::Bottom,
                SuggestionSource::Fallback,
            )],
        };

        let text = format_outcome("x", &outcome);
        assert!(text.contains("2. 👖 Bottom"));
        assert!(text.contains("🏬"));
        assert!(text.contains("store suggestions"));
    }

    #[test]
    fn test_short_without_fallback_says_so() {
        let outcome = Outcome::Degraded {
            validated: vec![suggestion(
                "https://www.asos.com/x/prd/1",
                OutfitSlot::Top,
                SuggestionSource::Validated,
            )],
            fallback: Vec::new(),
        };
        assert!(format_outcome("x", &outcome).contains("Only 1 of the links"));
    }

    #[test]
    fn test_nothing_is_apology() {
        let text = format_outcome("black tie", &Outcome::Nothing);
        assert!(text.starts_with("😔 Sorry"));
        assert!(text.contains("black tie"));
    }

    #[test]
    fn test_styles_keyboard_uses_callback_data() {
        let keyboard = styles_keyboard(&Catalog::builtin()).unwrap();
        let first = &keyboard.inline_keyboard[0][0];
        assert_eq!(first.text, "casual");
        assert_eq!(first.callback_data.as_deref(), Some("style:casual"));
    }

    #[test]
    fn test_catalog_outfit_numbered() {
        let catalog = Catalog::builtin();
        let items = catalog.get("party").unwrap();
        let text = format_catalog_outfit("party", items);
        assert!(text.starts_with("✨ <b>Outfit for \"party\"</b>"));
        assert!(text.contains("1. "));
        assert!(text.contains(&format!("{}. ", items.len())));
    }
}
