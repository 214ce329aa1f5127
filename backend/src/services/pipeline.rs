use crate::config::{load_genre_keywords, GenreKeywords, Settings};
use crate::models::ChannelAggregate;
use crate::services::aggregator::{aggregate_channel, group_by_channel, ChannelVideos};
use crate::services::key_pool::KeyPool;
use crate::services::ranking::build_ranking;
use crate::services::search::search_keyword;
use crate::services::storage::{append_history, write_snapshot};
use crate::services::youtube_api::{VideoPlatform, YouTubeClient};
use crate::utils::run_date;
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub genres: usize,
    pub keywords_aborted: usize,
    pub channels_seen: usize,
    pub channels_ranked: usize,
    pub snapshot_rows: usize,
    pub history_rows: usize,
}

/// Searches every keyword of every genre and aggregates the channels found.
///
/// Runs strictly one call at a time. A genre's channels are aggregated before
/// the next genre is searched.
pub async fn collect_aggregates(
    api: &dyn VideoPlatform,
    pool: &mut KeyPool,
    genres: &GenreKeywords,
    now: DateTime<Utc>,
    summary: &mut RunSummary,
) -> Vec<ChannelAggregate> {
    let mut aggregates = Vec::new();

    for (genre, keywords) in genres {
        info!("Processing genre: {genre}");
        summary.genres += 1;

        let mut videos = ChannelVideos::new();
        for keyword in keywords.iter().filter(|k| !k.trim().is_empty()) {
            let result = search_keyword(api, pool, keyword, now).await;
            if result.aborted.is_some() {
                summary.keywords_aborted += 1;
            }
            group_by_channel(&mut videos, result.hits);
        }

        summary.channels_seen += videos.len();
        info!("Genre {genre}: {} channels to check", videos.len());

        for (channel_id, video_ids) in &videos {
            if let Some(agg) = aggregate_channel(api, pool, genre, channel_id, video_ids).await {
                aggregates.push(agg);
            }
        }
    }

    summary.channels_ranked = aggregates.len();
    aggregates
}

/// Full run against an already-built platform and pool: collect, rank, persist.
pub async fn run_with(
    api: &dyn VideoPlatform,
    pool: &mut KeyPool,
    genres: &GenreKeywords,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let aggregates = collect_aggregates(api, pool, genres, now, &mut summary).await;

    let ranking = build_ranking(&aggregates, &run_date(now));
    write_snapshot(&settings.snapshot_path(), &ranking.rows)?;
    append_history(&settings.history_path(), &ranking.history)?;

    summary.snapshot_rows = ranking.rows.len();
    summary.history_rows = ranking.history.len();
    Ok(summary)
}

/// Entry point for the invoker: reads keys and genres from the configured
/// paths, then runs against the live API.
pub async fn run(settings: &Settings) -> Result<RunSummary> {
    let mut pool = KeyPool::from_file(&settings.api_keys_path)?;
    let genres = load_genre_keywords(&settings.genre_keywords_path)?;
    let api = YouTubeClient::new(&settings.api_base);

    let summary = run_with(&api, &mut pool, &genres, settings, Utc::now()).await?;
    info!(
        "Update finished: {} genres, {} channels seen, {} ranked, {} snapshot rows, {} history rows, {} keywords aborted",
        summary.genres,
        summary.channels_seen,
        summary.channels_ranked,
        summary.snapshot_rows,
        summary.history_rows,
        summary.keywords_aborted
    );
    Ok(summary)
}
