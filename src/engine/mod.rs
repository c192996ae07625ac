pub mod api;
pub mod config;
pub mod credential;
pub mod error;
pub mod reconcile;
pub mod refresh;
pub mod resolve;
pub mod snapshot;
pub mod subscription;
pub mod timefmt;
pub mod usage;
