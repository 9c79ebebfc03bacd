pub mod aggregator;
pub mod analyzer;
pub mod result_table;
pub mod scoring;
pub mod suggestion_service;
pub mod trends_service;
pub mod video_service;
pub mod youtube_api;
pub mod youtube_scraper;
