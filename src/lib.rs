//! memopad library root.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod memo;
pub mod web;

pub use cli::Commands;
pub use config::{load_settings, Settings};
pub use error::{Error, Result};
pub use memo::{Memo, MemoStore};
pub use web::run_server;
