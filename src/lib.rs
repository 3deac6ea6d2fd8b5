pub mod app;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod ebird;
pub mod error;
pub mod normalize;
pub mod output;
pub mod snapshot;
