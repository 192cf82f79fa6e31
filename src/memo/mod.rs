//! Memo storage - a single SQLite table behind [`MemoStore`].

pub mod store;
pub mod types;

pub use store::MemoStore;
pub use types::{now_timestamp, sort_for_listing, validate_title, Memo};
