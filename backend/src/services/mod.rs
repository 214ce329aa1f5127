pub mod aggregator;
pub mod details;
pub mod key_pool;
pub mod pipeline;
pub mod ranking;
pub mod search;
pub mod storage;
pub mod youtube_api;

#[cfg(test)]
pub mod testing;
