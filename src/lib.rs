pub mod cache;
pub mod config;
pub mod dedup;
pub mod entity;
pub mod environment;
pub mod history;
pub mod logging;
pub mod rss;
pub mod similarity;
pub mod story;
pub mod vector;

pub const TARGET_WEB_REQUEST: &str = "web_request";
