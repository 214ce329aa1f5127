use crate::config::HIGH_TIER_SUBSCRIBERS;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub video_id: String,
    pub channel_id: String,
}

/// A video that passed validation, including the minimum-duration filter.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub published_date: String, // YYYY-MM-DD
    pub view_count: u64,
    pub thumbnail_url: String,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub channel_id: String,
    pub channel_name: String,
    pub subscriber_count: u64,
}

impl ChannelRecord {
    pub fn tier(&self) -> Tier {
        Tier::from_subscribers(self.subscriber_count)
    }
}

/// Subscriber bucket. `High` sorts before `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Low,
}

impl Tier {
    pub fn from_subscribers(subscriber_count: u64) -> Self {
        if subscriber_count >= HIGH_TIER_SUBSCRIBERS {
            Tier::High
        } else {
            Tier::Low
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::High => write!(f, "high"),
            Tier::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelAggregate {
    pub genre: String,
    pub channel: ChannelRecord,
    pub tier: Tier,
    pub rolling_view_total: u64,
    pub representative: VideoRecord,
    pub valid_video_count: usize,
    pub long_form_video_count: usize,
}

/// One line of the snapshot table. Field order is the column order the
/// dashboard reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub genre: String,
    pub channel_id: String,
    pub channel_name: String,
    pub subscriber_count: u64,
    pub tier: Tier,
    pub rolling_view_total: u64,
    pub video_id: String,
    pub video_title: String,
    pub video_view_count: u64,
    pub published_date: String,
    pub thumbnail_url: String,
}

/// Snapshot header. The dashboard reads these English names and the
/// `high`/`low` tier labels; the older localized headers are not coming back.
pub const RANKING_COLUMNS: [&str; 11] = [
    "genre",
    "channel_id",
    "channel_name",
    "subscriber_count",
    "tier",
    "rolling_view_total",
    "video_id",
    "video_title",
    "video_view_count",
    "published_date",
    "thumbnail_url",
];

impl From<&ChannelAggregate> for RankingRow {
    fn from(agg: &ChannelAggregate) -> Self {
        RankingRow {
            genre: agg.genre.clone(),
            channel_id: agg.channel.channel_id.clone(),
            channel_name: agg.channel.channel_name.clone(),
            subscriber_count: agg.channel.subscriber_count,
            tier: agg.tier,
            rolling_view_total: agg.rolling_view_total,
            video_id: agg.representative.video_id.clone(),
            video_title: agg.representative.title.clone(),
            video_view_count: agg.representative.view_count,
            published_date: agg.representative.published_date.clone(),
            thumbnail_url: agg.representative.thumbnail_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: String,
    pub video_id: String,
    pub view_count: u64,
}

pub const HISTORY_COLUMNS: [&str; 3] = ["date", "video_id", "view_count"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundary_is_inclusive() {
        assert_eq!(Tier::from_subscribers(0), Tier::Low);
        assert_eq!(Tier::from_subscribers(49_999), Tier::Low);
        assert_eq!(Tier::from_subscribers(50_000), Tier::High);
        assert_eq!(Tier::from_subscribers(1_200_000), Tier::High);
    }

    #[test]
    fn tier_labels() {
        assert_eq!(Tier::High.to_string(), "high");
        assert_eq!(Tier::Low.to_string(), "low");
        assert!(Tier::High < Tier::Low);
    }

    #[test]
    fn snapshot_header_matches_row_fields() {
        let row = RankingRow {
            genre: "Gaming".to_string(),
            channel_id: "c1".to_string(),
            channel_name: "Alpha".to_string(),
            subscriber_count: 50_000,
            tier: Tier::High,
            rolling_view_total: 10,
            video_id: "v1".to_string(),
            video_title: "Title".to_string(),
            video_view_count: 5,
            published_date: "2024-03-20".to_string(),
            thumbnail_url: "https://i.ytimg.com/vi/v1/hqdefault.jpg".to_string(),
        };
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(&row).unwrap();
        let bytes = wtr.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let header = text.lines().next().unwrap();
        assert_eq!(header, RANKING_COLUMNS.join(","));
        assert_eq!(RANKING_COLUMNS[4], "tier");
        assert!(text.lines().nth(1).unwrap().starts_with("Gaming,c1,Alpha,50000,high,"));
    }
}
