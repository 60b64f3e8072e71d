// src/crawl/extract.rs
//! Block extraction: partition one branch page into date markers and
//! stream cards, threading a "current date" accumulator through the
//! document-order walk.

use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Direct children of the schedule container, in document order. Each one
/// is either a date-header block, a card container, or noise.
fn block_selector() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse("#all > .container > .row > div").unwrap())
}

fn date_header_selector() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse(".holodule.navbar-text").unwrap())
}

fn card_selector() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse("a.thumbnail").unwrap())
}

/// Extract a `month/day` pair from a localized short-date header such as
/// `"11/12 (水)"`. Returns `None` for unparseable text, in which case the
/// running date context is left unchanged.
pub fn parse_date_header(text: &str) -> Option<(u32, u32)> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d{1,2})/(\d{1,2})").unwrap());
    let caps = re.captures(text)?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    Some((month, day))
}

/// Walk the page's schedule blocks in document order and return every
/// discovered card paired with its date context.
///
/// Cards that appear before the first date marker are skipped: a card
/// with no known date cannot be dated. This is deliberate.
pub fn extract_cards(doc: &Html) -> Vec<(String, ElementRef<'_>)> {
    let mut current_date: Option<String> = None;
    let mut cards = Vec::new();

    for block in doc.select(block_selector()) {
        // A block holding a date header never holds cards; classify and
        // move on.
        if let Some(header) = block.select(date_header_selector()).next() {
            let text: String = header.text().collect();
            if let Some((month, day)) = parse_date_header(text.trim()) {
                current_date = Some(format!("{month}/{day}"));
            }
            continue;
        }

        let found: Vec<ElementRef<'_>> = block.select(card_selector()).collect();
        if found.is_empty() {
            continue;
        }
        let Some(date) = current_date.as_deref() else {
            continue;
        };
        for element in found {
            cards.push((date.to_string(), element));
        }
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(inner: &str) -> String {
        format!(
            r#"<html><body><div id="all"><div class="container"><div class="row">{inner}</div></div></div></body></html>"#
        )
    }

    fn date_block(text: &str) -> String {
        format!(r#"<div><div class="holodule navbar-text">{text}</div></div>"#)
    }

    fn card_block(href: &str) -> String {
        format!(r#"<div><a class="thumbnail" href="{href}"></a></div>"#)
    }

    #[test]
    fn date_header_parses_localized_short_date() {
        assert_eq!(parse_date_header("11/12 (水)"), Some((11, 12)));
        assert_eq!(parse_date_header("1/3"), Some((1, 3)));
        assert_eq!(parse_date_header("today"), None);
    }

    #[test]
    fn cards_inherit_the_running_date_context() {
        let html = page(&format!(
            "{}{}{}{}",
            date_block("11/12 (水)"),
            card_block("https://youtu.be/a"),
            date_block("11/13 (木)"),
            card_block("https://youtu.be/b"),
        ));
        let doc = Html::parse_document(&html);
        let cards = extract_cards(&doc);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].0, "11/12");
        assert_eq!(cards[1].0, "11/13");
    }

    #[test]
    fn cards_before_first_date_marker_are_skipped() {
        let html = page(&format!(
            "{}{}{}",
            card_block("https://youtu.be/orphan"),
            date_block("11/12 (水)"),
            card_block("https://youtu.be/dated"),
        ));
        let doc = Html::parse_document(&html);
        let cards = extract_cards(&doc);
        assert_eq!(cards.len(), 1);
        assert_eq!(
            cards[0].1.value().attr("href"),
            Some("https://youtu.be/dated")
        );
    }

    #[test]
    fn unparseable_date_marker_leaves_context_unchanged() {
        let html = page(&format!(
            "{}{}{}",
            date_block("11/12 (水)"),
            date_block("schedule"),
            card_block("https://youtu.be/a"),
        ));
        let doc = Html::parse_document(&html);
        let cards = extract_cards(&doc);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].0, "11/12");
    }

    #[test]
    fn noise_blocks_are_ignored() {
        let html = page(&format!(
            "{}<div><p>ad banner</p></div>{}",
            date_block("11/12 (水)"),
            card_block("https://youtu.be/a"),
        ));
        let doc = Html::parse_document(&html);
        assert_eq!(extract_cards(&doc).len(), 1);
    }

    #[test]
    fn multiple_cards_in_one_container() {
        let html = page(&format!(
            r#"{}<div><a class="thumbnail" href="u1"></a><a class="thumbnail" href="u2"></a></div>"#,
            date_block("11/12 (水)"),
        ));
        let doc = Html::parse_document(&html);
        assert_eq!(extract_cards(&doc).len(), 2);
    }
}
