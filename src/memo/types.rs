//! Memo entity and the input rules shared by the front-ends.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A persisted memo.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Memo {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub date: Option<String>,
}

impl Memo {
    /// Title for display, with a placeholder for blank titles.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(untitled)"
        } else {
            &self.title
        }
    }

    /// Date for display, with a placeholder when none was stored.
    pub fn display_date(&self) -> &str {
        self.date.as_deref().unwrap_or("(no date)")
    }
}

/// Order memos the way the list screen shows them: highest id first.
///
/// Rows written by older builds may carry time-only dates (`14:03:22`), so
/// the stored `date` text is not a reliable recency key for display.
pub fn sort_for_listing(memos: &mut [Memo]) {
    memos.sort_by(|a, b| b.id.cmp(&a.id));
}

/// Current UTC time as a fixed-width ISO-8601 string (`2026-10-19T08:15:30.123Z`).
///
/// Fixed width keeps `ORDER BY date` chronological.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reject titles that are empty after trimming.
pub fn validate_title(title: &str) -> Result<(), Error> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title must not be empty".to_string()));
    }
    Ok(())
}
