// src/crawl/normalize.rs
//! Card normalization: turn one raw stream card plus its date context
//! into a `StreamRecord`, or discard it when required fields are absent.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::crawl::extract::parse_date_header;
use crate::crawl::types::StreamRecord;
use crate::talents::{TalentIndex, UNKNOWN_TALENT_ID};

/// The source site's home timezone, JST.
pub const HOME_OFFSET_SECS: i32 = 9 * 3600;

/// Thumbnail-size markers in YouTube image URLs, in preference order.
const THUMBNAIL_MARKERS: [&str; 3] = ["mqdefault", "hqdefault", "sddefault"];

pub fn home_offset() -> FixedOffset {
    // 9 * 3600 is always in range for east_opt.
    FixedOffset::east_opt(HOME_OFFSET_SECS).unwrap()
}

fn name_selector() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse(".name").unwrap())
}

fn datetime_selector() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse(".datetime").unwrap())
}

fn img_selector() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse("img").unwrap())
}

fn avatar_selector() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse(r#"img[style*="border-radius: 50%"]"#).unwrap())
}

/// Live detection is a visual heuristic: the source site's only signal
/// for "currently broadcasting" is a red solid border on the card. Kept
/// as a single predicate so a styling change upstream is a one-line fix.
pub fn is_live_style(style: &str) -> bool {
    let style = style.to_lowercase();
    style.contains("red") && style.contains("solid")
}

/// Extract `HH:MM` from the card's time text after collapsing all
/// whitespace (the site pads with newlines and indentation).
fn parse_time_text(text: &str) -> Option<(u32, u32)> {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    static RE_TIME: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    let re_time = RE_TIME.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap());

    let collapsed = re_ws.replace_all(text, "");
    let caps = re_time.captures(&collapsed)?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    Some((hour, minute))
}

/// Resolve `month/day` + `HH:MM` to an absolute start time in the home
/// timezone. The year comes from `now`, rolled forward across a
/// December -> January boundary and backward across the reverse.
/// Returns `None` for calendar-invalid combinations.
pub fn resolve_start_time(
    date_str: &str,
    hour: u32,
    minute: u32,
    now: DateTime<FixedOffset>,
) -> Option<DateTime<FixedOffset>> {
    let (month, day) = parse_date_header(date_str)?;
    let mut year = now.year();
    if month == 1 && now.month() == 12 {
        year += 1;
    }
    if month == 12 && now.month() == 1 {
        year -= 1;
    }
    home_offset()
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
}

fn collapse_name(text: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(text.trim(), " ").to_string()
}

fn select_thumbnail(imgs: &[ElementRef<'_>]) -> Option<String> {
    let mut thumbnail = None;
    for img in imgs {
        if let Some(src) = img.value().attr("src") {
            if THUMBNAIL_MARKERS.iter().any(|m| src.contains(m)) {
                thumbnail = Some(src.to_string());
            }
        }
    }
    // No sized thumbnail; the second image, when present, is the video
    // still on the production markup.
    thumbnail.or_else(|| {
        imgs.get(1)
            .and_then(|img| img.value().attr("src"))
            .map(|src| src.to_string())
    })
}

/// Normalize one raw card into a `StreamRecord`.
///
/// Cards missing a URL, a non-empty name, a recognizable `HH:MM` time, or
/// a calendar-valid date are discarded; extraction anomalies never abort
/// the run.
pub fn normalize_card(
    date_str: &str,
    card: ElementRef<'_>,
    branch_id: &str,
    index: &TalentIndex,
    now: DateTime<FixedOffset>,
) -> Option<StreamRecord> {
    let url = card.value().attr("href").unwrap_or_default();
    if url.is_empty() {
        return None;
    }

    let name_text: String = card
        .select(name_selector())
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();
    let name_text = name_text.trim().to_string();
    if name_text.is_empty() {
        tracing::debug!(branch = %branch_id, url = %url, "card without name text, discarded");
        return None;
    }

    let time_text: String = card
        .select(datetime_selector())
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();
    let Some((hour, minute)) = parse_time_text(&time_text) else {
        tracing::debug!(branch = %branch_id, url = %url, "card without HH:MM time, discarded");
        return None;
    };

    let start_time = resolve_start_time(date_str, hour, minute, now)?;

    let normalized_name = collapse_name(&name_text).to_lowercase();
    let (talent_id, talent_name, group_id) = match index.resolve(&normalized_name) {
        Some((talent, group_id)) => (
            talent.id.clone(),
            talent.name.clone(),
            group_id.to_string(),
        ),
        None => (
            UNKNOWN_TALENT_ID.to_string(),
            name_text.clone(),
            branch_id.to_string(),
        ),
    };

    let imgs: Vec<ElementRef<'_>> = card.select(img_selector()).collect();
    let thumbnail = select_thumbnail(&imgs);
    let icon = card
        .select(avatar_selector())
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.to_string());

    let style = card.value().attr("style").unwrap_or_default();

    Some(StreamRecord {
        talent_id,
        talent_name,
        group_id,
        start_time,
        url: url.to_string(),
        // The schedule cards carry no title text; the field is filled by
        // feed consumers that have richer metadata.
        title: None,
        thumbnail,
        icon,
        is_live: is_live_style(style),
    })
}
