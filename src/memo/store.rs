//! SQLite-backed memo store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Error;

use super::types::{now_timestamp, Memo};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS memos (
        id INTEGER PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        content TEXT,
        date TEXT
    );
"#;

/// Persistence façade over the `memos` table.
///
/// Owns one connection for its whole lifetime. The mutex is held for a single
/// statement at a time; rusqlite connections are not `Sync`.
#[derive(Debug)]
pub struct MemoStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

/// Log a failed statement and turn it into a store error.
fn sqlite_err(op: &'static str) -> impl Fn(rusqlite::Error) -> Error {
    move |e| {
        tracing::error!("sqlite {} failed: {}", op, e);
        Error::Store(format!("sqlite {}: {}", op, e))
    }
}

fn row_to_memo(row: &Row<'_>) -> rusqlite::Result<Memo> {
    Ok(Memo {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        date: row.get(3)?,
    })
}

impl MemoStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(sqlite_err("open"))?;
        tracing::debug!("Opened memo database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().map_err(sqlite_err("open"))?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// File backing this store, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.conn
            .lock()
            .map_err(|_| Error::Store("connection lock poisoned".to_string()))
    }

    /// Create the `memos` table if it does not exist yet.
    pub fn initialize(&self) -> Result<(), Error> {
        self.conn()?
            .execute_batch(CREATE_TABLE_SQL)
            .map_err(sqlite_err("init"))?;
        tracing::debug!("memos table ready");
        Ok(())
    }

    /// Insert a memo stamped with the current time. Returns the new id.
    pub fn add(&self, title: &str, content: &str) -> Result<i64, Error> {
        self.insert(title, content, &now_timestamp())
    }

    fn insert(&self, title: &str, content: &str, date: &str) -> Result<i64, Error> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO memos (title, content, date) VALUES (?1, ?2, ?3)",
            params![title, content, date],
        )
        .map_err(sqlite_err("insert memo"))?;
        let id = conn.last_insert_rowid();
        tracing::debug!("Inserted memo {}", id);
        Ok(id)
    }

    /// All memos, newest `date` first.
    pub fn list(&self) -> Result<Vec<Memo>, Error> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, title, content, date FROM memos ORDER BY date DESC, id DESC")
            .map_err(sqlite_err("prepare list"))?;
        let memos = stmt
            .query_map([], row_to_memo)
            .map_err(sqlite_err("list memos"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sqlite_err("read memo row"))?;
        Ok(memos)
    }

    /// Fetch one memo; a missing id is `None`, not an error.
    pub fn get_by_id(&self, id: i64) -> Result<Option<Memo>, Error> {
        self.conn()?
            .query_row(
                "SELECT id, title, content, date FROM memos WHERE id = ?1",
                params![id],
                row_to_memo,
            )
            .optional()
            .map_err(sqlite_err("get memo"))
    }

    /// Save from the edit screen.
    ///
    /// A present, non-zero id overwrites title and content of that row and
    /// returns the same id. An absent or zero id inserts a new memo instead.
    pub fn update(&self, id: Option<i64>, title: &str, content: &str) -> Result<i64, Error> {
        let Some(id) = id.filter(|id| *id != 0) else {
            return self.add(title, content);
        };

        let changed = self
            .conn()?
            .execute(
                "UPDATE memos SET title = ?1, content = ?2 WHERE id = ?3",
                params![title, content, id],
            )
            .map_err(sqlite_err("update memo"))?;

        if changed == 0 {
            return Err(Error::NotFound(format!("memo {}", id)));
        }
        tracing::debug!("Updated memo {}", id);
        Ok(id)
    }

    /// Delete one memo. Returns whether a row was removed.
    pub fn delete_by_id(&self, id: i64) -> Result<bool, Error> {
        let removed = self
            .conn()?
            .execute("DELETE FROM memos WHERE id = ?1", params![id])
            .map_err(sqlite_err("delete memo"))?;
        tracing::debug!("Delete memo {}: {} row(s)", id, removed);
        Ok(removed > 0)
    }

    /// Number of stored memos.
    pub fn count(&self) -> Result<usize, Error> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM memos", [], |row| row.get(0))
            .map_err(sqlite_err("count memos"))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> MemoStore {
        let store = MemoStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    #[test]
    fn initialize_is_idempotent() {
        let store = store();
        store.add("kept", "across init").unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn groceries_round_trip() {
        let store = store();
        let id = store.add("Groceries", "Milk, eggs").unwrap();
        assert_eq!(id, 1);

        let memo = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(memo.id, 1);
        assert_eq!(memo.title, "Groceries");
        assert_eq!(memo.content.as_deref(), Some("Milk, eggs"));
        let date = memo.date.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&date).is_ok());

        assert!(store.delete_by_id(id).unwrap());
        assert!(store.get_by_id(id).unwrap().is_none());
    }

    #[test]
    fn empty_fields_are_stored_as_given() {
        let store = store();
        let id = store.add("", "").unwrap();
        let memo = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(memo.title, "");
        assert_eq!(memo.content.as_deref(), Some(""));
    }

    #[test]
    fn list_empty_table() {
        assert!(store().list().unwrap().is_empty());
    }

    #[test]
    fn list_orders_by_date_descending() {
        let store = store();
        store.insert("middle", "", "2025-03-01T09:00:00.000Z").unwrap();
        store.insert("newest", "", "2025-11-20T18:30:00.000Z").unwrap();
        store.insert("oldest", "", "2024-12-31T23:59:59.999Z").unwrap();

        let titles: Vec<String> = store.list().unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn list_returns_every_added_memo() {
        let store = store();
        for i in 0..5 {
            store.add(&format!("memo {}", i), "body").unwrap();
        }
        let memos = store.list().unwrap();
        assert_eq!(memos.len(), 5);
        for pair in memos.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn get_missing_id_is_none() {
        let store = store();
        store.add("only", "one").unwrap();
        assert!(store.get_by_id(42).unwrap().is_none());
        assert!(store.get_by_id(0).unwrap().is_none());
    }

    #[test]
    fn update_existing_keeps_id_and_date() {
        let store = store();
        let id = store.add("draft", "first").unwrap();
        let before = store.get_by_id(id).unwrap().unwrap();

        assert_eq!(store.update(Some(id), "A", "B").unwrap(), id);

        let after = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(after.id, id);
        assert_eq!(after.title, "A");
        assert_eq!(after.content.as_deref(), Some("B"));
        assert_eq!(after.date, before.date);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn update_returns_its_own_id_after_later_inserts() {
        let store = store();
        let first = store.add("first", "").unwrap();
        let second = store.add("second", "").unwrap();
        assert_ne!(first, second);
        assert_eq!(store.update(Some(first), "first!", "").unwrap(), first);
    }

    #[test]
    fn update_without_id_inserts() {
        let store = store();
        let existing = store.add("existing", "").unwrap();

        let created = store.update(Some(0), "A", "B").unwrap();
        assert_ne!(created, existing);
        let memo = store.get_by_id(created).unwrap().unwrap();
        assert_eq!(memo.title, "A");
        assert_eq!(memo.date.as_deref().map(str::len), Some(24));

        let also_created = store.update(None, "C", "D").unwrap();
        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.get_by_id(also_created).unwrap().unwrap().title, "C");
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let store = store();
        let err = store.update(Some(99), "A", "B").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn delete_reports_whether_a_row_was_removed() {
        let store = store();
        let keep = store.add("keep", "").unwrap();
        let drop = store.add("drop", "").unwrap();

        assert!(store.delete_by_id(drop).unwrap());
        assert!(!store.delete_by_id(drop).unwrap());
        assert!(!store.delete_by_id(1234).unwrap());

        let ids: Vec<i64> = store.list().unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn operations_before_initialize_fail() {
        let store = MemoStore::open_in_memory().unwrap();
        assert!(matches!(store.list(), Err(Error::Store(_))));
        assert!(matches!(store.add("t", "c"), Err(Error::Store(_))));
    }

    #[test]
    fn initialize_on_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memo_db.db");
        std::fs::write(&path, vec![0x42u8; 4096]).unwrap();

        let store = MemoStore::open(&path).unwrap();
        let err = store.initialize().unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("memo_db.db");

        let id = {
            let store = MemoStore::open(&path).unwrap();
            store.initialize().unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
            store.add("persisted", "on disk").unwrap()
        };

        let store = MemoStore::open(&path).unwrap();
        store.initialize().unwrap();
        let memo = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(memo.title, "persisted");
    }

    #[test]
    fn reads_rows_written_without_content_or_date() {
        let store = store();
        store
            .conn()
            .unwrap()
            .execute("INSERT INTO memos (title) VALUES ('legacy')", [])
            .unwrap();

        let memo = store.list().unwrap().pop().unwrap();
        assert_eq!(memo.title, "legacy");
        assert!(memo.content.is_none());
        assert!(memo.date.is_none());
    }
}
