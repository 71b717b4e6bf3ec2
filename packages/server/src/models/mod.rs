pub mod auth;
pub mod bot;
pub mod event;
pub mod leaderboard;
pub mod shared;
