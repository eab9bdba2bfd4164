pub mod institutions;
pub mod leaderboard;
pub mod lifts;
pub mod users;
