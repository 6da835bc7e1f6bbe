pub mod competition;
pub mod config;
pub mod error;
pub mod innings;
pub mod locks;
pub mod matches;
pub mod profile;
pub mod raw;
pub mod registry;
pub mod scorecard;
pub mod service;
pub mod source;
pub mod store;

pub use error::{Result, StatsError};
pub use service::CricketStats;
