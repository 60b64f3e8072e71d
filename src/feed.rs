// src/feed.rs
//! Feed-consumer helpers pinned by the viewer contract: the mapping from
//! a record's group id to the coarse filter groups, timeline grouping by
//! date, and the "active stream" pick used for scroll-to-now.

use chrono::{DateTime, Duration, FixedOffset};

use crate::crawl::types::StreamRecord;

/// Coarse top-level groups backing the viewer's filter toggles.
pub const TOP_LEVEL_GROUPS: [(&str, &str); 7] = [
    ("hololive", "Hololive"),
    ("hololive_english", "Hololive English"),
    ("hololive_indonesia", "Hololive Indonesia"),
    ("holostars", "Holostars"),
    ("holostars_english", "Holostars English"),
    ("dev_is", "DEV_IS"),
    ("official", "Official"),
];

/// Map a record's `group_id` (a branch id or a talent sub-group id) to
/// its top-level group. Unlisted ids fall back to the main JP group, the
/// same bucket the catch-all branch maps to.
pub fn top_level_group(group_id: &str) -> &'static str {
    match group_id {
        // Branch ids
        "hololive_jp" | "other" => "hololive",
        "hololive_en" => "hololive_english",
        "hololive_id" => "hololive_indonesia",
        "holostars_jp" => "holostars",
        "holostars_en" => "holostars_english",
        "dev_is" => "dev_is",
        "official" => "official",
        // Talent sub-groups
        "gen0" | "gen1" | "gen2" | "gamers" | "gen3" | "gen4" | "gen5" | "holoX" => "hololive",
        "en_myth" | "en_promise" | "en_advent" | "en_justice" => "hololive_english",
        "id_gen1" | "id_gen2" | "id_gen3" => "hololive_indonesia",
        "regloss" | "flow_glow" => "dev_is",
        _ => "hololive",
    }
}

/// Group records by the date portion of `start_time`, dates ascending,
/// records within a date ordered by `start_time` ascending.
pub fn timeline(streams: &[StreamRecord]) -> Vec<(String, Vec<&StreamRecord>)> {
    let mut grouped: Vec<(String, Vec<&StreamRecord>)> = Vec::new();
    for stream in streams {
        let key = stream.start_time.format("%Y-%m-%d").to_string();
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(stream),
            None => grouped.push((key, vec![stream])),
        }
    }
    grouped.sort_by(|a, b| a.0.cmp(&b.0));
    for (_, bucket) in &mut grouped {
        bucket.sort_by_key(|s| s.start_time);
    }
    grouped
}

/// The single "active" stream: the first live record, else the first
/// whose start time is not more than 15 minutes in the past, else the
/// first record in feed order.
pub fn pick_active<'a>(
    streams: &'a [StreamRecord],
    now: DateTime<FixedOffset>,
) -> Option<&'a StreamRecord> {
    if streams.is_empty() {
        return None;
    }
    if let Some(live) = streams.iter().find(|s| s.is_live) {
        return Some(live);
    }
    streams
        .iter()
        .find(|s| s.start_time > now - Duration::minutes(15))
        .or_else(|| streams.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::normalize::home_offset;
    use chrono::TimeZone;

    fn record(url: &str, hour: u32, minute: u32, is_live: bool) -> StreamRecord {
        StreamRecord {
            talent_id: "unknown".into(),
            talent_name: "Someone".into(),
            group_id: "hololive_jp".into(),
            start_time: home_offset()
                .with_ymd_and_hms(2025, 11, 12, hour, minute, 0)
                .unwrap(),
            url: url.into(),
            title: None,
            thumbnail: None,
            icon: None,
            is_live,
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        home_offset()
            .with_ymd_and_hms(2025, 11, 12, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn branch_and_subgroup_ids_both_map() {
        assert_eq!(top_level_group("hololive_jp"), "hololive");
        assert_eq!(top_level_group("other"), "hololive");
        assert_eq!(top_level_group("en_myth"), "hololive_english");
        assert_eq!(top_level_group("regloss"), "dev_is");
        assert_eq!(top_level_group("never-seen"), "hololive");
    }

    #[test]
    fn live_stream_wins_active_pick() {
        let streams = vec![
            record("a", 10, 0, false),
            record("b", 12, 0, true),
            record("c", 14, 0, false),
        ];
        assert_eq!(pick_active(&streams, at(9, 0)).unwrap().url, "b");
    }

    #[test]
    fn recent_or_upcoming_stream_is_active_when_nothing_live() {
        let streams = vec![record("a", 10, 0, false), record("b", 12, 0, false)];
        // 10:10 is within the 15-minute grace window of the 10:00 start.
        assert_eq!(pick_active(&streams, at(10, 10)).unwrap().url, "a");
        // By 10:20 the window has passed; the 12:00 stream is next.
        assert_eq!(pick_active(&streams, at(10, 20)).unwrap().url, "b");
    }

    #[test]
    fn everything_past_falls_back_to_first() {
        let streams = vec![record("a", 10, 0, false), record("b", 12, 0, false)];
        assert_eq!(pick_active(&streams, at(23, 0)).unwrap().url, "a");
        assert!(pick_active(&[], at(23, 0)).is_none());
    }

    #[test]
    fn timeline_groups_and_sorts_by_date_then_time() {
        let mut day2 = record("c", 9, 0, false);
        day2.start_time = home_offset()
            .with_ymd_and_hms(2025, 11, 13, 9, 0, 0)
            .unwrap();
        let streams = vec![record("b", 21, 0, false), day2, record("a", 8, 0, false)];

        let tl = timeline(&streams);
        assert_eq!(tl.len(), 2);
        assert_eq!(tl[0].0, "2025-11-12");
        assert_eq!(tl[0].1[0].url, "a");
        assert_eq!(tl[0].1[1].url, "b");
        assert_eq!(tl[1].0, "2025-11-13");
    }
}
