use crate::config::TOP_N_PER_GROUP;
use crate::models::{ChannelAggregate, HistoryRow, RankingRow, Tier};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct Ranking {
    /// Top channels per (genre, tier), groups ordered by genre then tier.
    pub rows: Vec<RankingRow>,
    /// One entry per aggregated channel, cutoff or not.
    pub history: Vec<HistoryRow>,
}

pub fn build_ranking(aggregates: &[ChannelAggregate], run_date: &str) -> Ranking {
    let mut groups: BTreeMap<(&str, Tier), Vec<&ChannelAggregate>> = BTreeMap::new();
    for agg in aggregates {
        groups
            .entry((agg.genre.as_str(), agg.tier))
            .or_default()
            .push(agg);
    }

    let mut rows = Vec::new();
    for (_, mut group) in groups {
        // sort_by is stable: equal totals keep their aggregation order
        group.sort_by(|a, b| b.rolling_view_total.cmp(&a.rolling_view_total));
        group.truncate(TOP_N_PER_GROUP);
        rows.extend(group.into_iter().map(RankingRow::from));
    }

    let history = aggregates
        .iter()
        .map(|agg| HistoryRow {
            date: run_date.to_string(),
            video_id: agg.representative.video_id.clone(),
            view_count: agg.representative.view_count,
        })
        .collect();

    Ranking { rows, history }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelRecord, VideoRecord};

    fn aggregate(genre: &str, channel_id: &str, subscribers: u64, total: u64) -> ChannelAggregate {
        let channel = ChannelRecord {
            channel_id: channel_id.to_string(),
            channel_name: format!("Channel {channel_id}"),
            subscriber_count: subscribers,
        };
        ChannelAggregate {
            genre: genre.to_string(),
            tier: channel.tier(),
            channel,
            rolling_view_total: total,
            representative: VideoRecord {
                video_id: format!("{channel_id}-rep"),
                title: "Representative".to_string(),
                published_date: "2024-03-20".to_string(),
                view_count: total / 2,
                thumbnail_url: "https://i.ytimg.com/vi/x/hqdefault.jpg".to_string(),
                duration_secs: 600.0,
            },
            valid_video_count: 2,
            long_form_video_count: 2,
        }
    }

    fn channel_ids(rows: &[RankingRow]) -> Vec<&str> {
        rows.iter().map(|r| r.channel_id.as_str()).collect()
    }

    #[test]
    fn orders_by_rolling_total_within_group() {
        let aggs = vec![
            aggregate("Gaming", "small", 100, 500),
            aggregate("Gaming", "big", 100, 1000),
        ];
        let ranking = build_ranking(&aggs, "2024-03-31");
        assert_eq!(channel_ids(&ranking.rows), ["big", "small"]);
        assert_eq!(ranking.rows[0].rolling_view_total, 1000);
        assert_eq!(ranking.rows[0].tier, Tier::Low);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let aggs = vec![
            aggregate("Gaming", "a", 100, 700),
            aggregate("Gaming", "b", 100, 900),
            aggregate("Gaming", "c", 100, 700),
            aggregate("Gaming", "d", 100, 700),
        ];
        let ranking = build_ranking(&aggs, "2024-03-31");
        assert_eq!(channel_ids(&ranking.rows), ["b", "a", "c", "d"]);
    }

    #[test]
    fn groups_sorted_by_genre_then_tier() {
        let aggs = vec![
            aggregate("Music", "m-low", 10, 5),
            aggregate("Gaming", "g-low", 10, 5),
            aggregate("Music", "m-high", 60_000, 1),
            aggregate("Gaming", "g-high", 50_000, 1),
        ];
        let ranking = build_ranking(&aggs, "2024-03-31");
        assert_eq!(
            channel_ids(&ranking.rows),
            ["g-high", "g-low", "m-high", "m-low"]
        );
    }

    #[test]
    fn each_group_truncated_but_history_keeps_everyone() {
        let mut aggs: Vec<ChannelAggregate> = (0..25)
            .map(|i| aggregate("Gaming", &format!("low{i}"), 10, i as u64))
            .collect();
        aggs.extend((0..3).map(|i| aggregate("Gaming", &format!("high{i}"), 80_000, i as u64)));

        let ranking = build_ranking(&aggs, "2024-03-31");

        let low: Vec<&RankingRow> = ranking.rows.iter().filter(|r| r.tier == Tier::Low).collect();
        assert_eq!(low.len(), TOP_N_PER_GROUP);
        assert_eq!(low[0].channel_id, "low24");
        assert_eq!(low[19].channel_id, "low5");
        assert!(low
            .windows(2)
            .all(|w| w[0].rolling_view_total >= w[1].rolling_view_total));
        assert_eq!(ranking.rows.len(), TOP_N_PER_GROUP + 3);

        assert_eq!(ranking.history.len(), 28);
        assert!(ranking.history.iter().all(|h| h.date == "2024-03-31"));
        assert_eq!(ranking.history[0].video_id, "low0-rep");
        assert_eq!(ranking.history[27].video_id, "high2-rep");
    }

    #[test]
    fn row_carries_representative_fields() {
        let ranking = build_ranking(&[aggregate("Gaming", "c1", 100, 40)], "2024-03-31");
        let row = &ranking.rows[0];
        assert_eq!(row.genre, "Gaming");
        assert_eq!(row.channel_name, "Channel c1");
        assert_eq!(row.video_id, "c1-rep");
        assert_eq!(row.video_view_count, 20);
        assert_eq!(row.published_date, "2024-03-20");
        assert_eq!(ranking.history[0].view_count, 20);
    }

    #[test]
    fn empty_input_empty_ranking() {
        let ranking = build_ranking(&[], "2024-03-31");
        assert!(ranking.rows.is_empty());
        assert!(ranking.history.is_empty());
    }
}
