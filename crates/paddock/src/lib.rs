//! `paddock` - league data, admin writes and the public dashboard
//!
//! This library stores championships, teams, tracks and events in a local
//! document store, validates admin writes, and loads the data the standings
//! dashboard is computed from. The computations themselves live in
//! `paddock-core`.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod admin;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod storage;
pub mod store;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardData};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{Storage, StorageStats};
pub use store::LeagueStore;
