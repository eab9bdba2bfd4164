pub mod feed;
pub mod institutions;
pub mod migration;
pub mod ranking;
pub mod scoring;
pub mod units;
