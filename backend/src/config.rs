use crate::error::StartupError;
use env_logger::Builder;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Videos shorter than this (in seconds) never reach the channel aggregation.
pub const MIN_DURATION_SECS: f64 = 300.0;
/// Share of long-form videos a channel needs to stay in the ranking.
pub const LONG_FORM_RATIO: f64 = 0.6;
/// Channels at or above this subscriber count land in the "high" tier.
pub const HIGH_TIER_SUBSCRIBERS: u64 = 50_000;
pub const TOP_N_PER_GROUP: usize = 20;
pub const SEARCH_WINDOW_DAYS: i64 = 30;
/// Largest `maxResults` accepted by the search endpoint.
pub const SEARCH_PAGE_SIZE: u32 = 50;

pub const SNAPSHOT_FILE: &str = "channel_video_data.csv";
pub const HISTORY_FILE: &str = "video_history.csv";

lazy_static! {
    pub static ref API_KEYS_PATH: String =
        env::var("API_KEYS_PATH").unwrap_or_else(|_| "api_keys.txt".to_string());
    pub static ref GENRE_KEYWORDS_PATH: String =
        env::var("GENRE_KEYWORDS_PATH").unwrap_or_else(|_| "genre_keywords.json".to_string());
    pub static ref DATA_DIR: String = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    pub static ref YOUTUBE_API_BASE: String = env::var("YOUTUBE_API_BASE")
        .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".to_string());
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting channel ranking update...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

/// Genre name -> search keywords, in processing order.
pub type GenreKeywords = IndexMap<String, Vec<String>>;

pub fn default_genre_keywords() -> GenreKeywords {
    let mut genres = GenreKeywords::new();
    genres.insert(
        "Gaming".to_string(),
        vec![
            "gameplay".to_string(),
            "game stream".to_string(),
            "game walkthrough".to_string(),
        ],
    );
    genres
}

/// Reads the genre mapping from a JSON object file. A missing file falls back to
/// the built-in mapping; anything else that goes wrong is a startup error.
pub fn load_genre_keywords(path: &Path) -> Result<GenreKeywords, StartupError> {
    let genres = match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<GenreKeywords>(&raw).map_err(|source| {
            StartupError::InvalidGenreMapping {
                path: path.to_path_buf(),
                reason: source.to_string(),
            }
        })?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(
                "No genre mapping at {}, using built-in genres",
                path.display()
            );
            default_genre_keywords()
        }
        Err(source) => {
            return Err(StartupError::GenreMappingUnreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    validate_genre_keywords(&genres).map_err(|reason| StartupError::InvalidGenreMapping {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(genres)
}

fn validate_genre_keywords(genres: &GenreKeywords) -> Result<(), String> {
    if genres.is_empty() {
        return Err("no genres configured".to_string());
    }
    for (genre, keywords) in genres {
        if keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(format!("genre '{genre}' has no keywords"));
        }
    }
    Ok(())
}

/// Everything one pipeline run needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_keys_path: PathBuf,
    pub genre_keywords_path: PathBuf,
    pub data_dir: PathBuf,
    pub api_base: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            api_keys_path: PathBuf::from(&*API_KEYS_PATH),
            genre_keywords_path: PathBuf::from(&*GENRE_KEYWORDS_PATH),
            data_dir: PathBuf::from(&*DATA_DIR),
            api_base: YOUTUBE_API_BASE.clone(),
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }
}
