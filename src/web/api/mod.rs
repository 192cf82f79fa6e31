//! API endpoints module.

pub mod memos;

pub use memos::{create_memo, delete_memo, get_memo, list_memos, update_memo};
