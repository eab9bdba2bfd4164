pub mod leaderboard;
pub mod lift;
pub mod user;
