use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A finalized answer for one question. Created exactly once per question,
/// immutable afterwards. `time_remaining_ms` is 0 when the clock ran out.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub question_id: String,
    pub content: String,
    pub submitted_at: DateTime<Local>,
    pub time_remaining_ms: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("answer log directory could not be created: {0}")]
    Io(#[from] std::io::Error),
    #[error("answer log operation failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Append-only log of finalized answers.
///
/// A failed append is reported to the caller but never rolls back session
/// progress; the in-memory record list stays the source of truth.
pub trait AnswerStore {
    fn append(&mut self, record: &AnswerRecord) -> Result<(), StoreError>;
    /// Every record written so far, in write order.
    fn all(&self) -> Result<Vec<AnswerRecord>, StoreError>;
}

/// SQLite-backed answer log; one row per finalized answer, tagged with the
/// interview id the store was opened for.
#[derive(Debug)]
pub struct AnswerDb {
    conn: Connection,
    interview_id: String,
}

impl AnswerDb {
    /// Open (or create) the log at the default state-directory location.
    pub fn open_default(interview_id: &str) -> Result<Self, StoreError> {
        let path =
            AppDirs::answer_log_path().unwrap_or_else(|| PathBuf::from("hirebot_answers.db"));
        Self::open(path, interview_id)
    }

    /// Open (or create) the log at an explicit path. Opening is idempotent:
    /// the schema is created only if missing and existing rows are kept.
    pub fn open<P: AsRef<Path>>(path: P, interview_id: &str) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(AnswerDb {
            conn,
            interview_id: interview_id.to_string(),
        })
    }

    /// Read-only style handle for report/export surfaces that never append.
    pub fn open_for_review<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open(path, "")
    }

    pub fn open_in_memory(interview_id: &str) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(AnswerDb {
            conn,
            interview_id: interview_id.to_string(),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS answers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                interview_id TEXT NOT NULL,
                question_id TEXT NOT NULL,
                content TEXT NOT NULL,
                submitted_at TEXT NOT NULL,
                time_remaining_ms INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_answers_interview ON answers(interview_id)",
            [],
        )?;

        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<AnswerRecord> {
        let submitted_at_str: String = row.get(2)?;
        let submitted_at = DateTime::parse_from_rfc3339(&submitted_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    2,
                    "submitted_at".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?
            .with_timezone(&Local);

        Ok(AnswerRecord {
            question_id: row.get(0)?,
            content: row.get(1)?,
            submitted_at,
            time_remaining_ms: row.get(3)?,
        })
    }

    /// Records for one interview, in write order.
    pub fn for_interview(&self, interview_id: &str) -> Result<Vec<AnswerRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT question_id, content, submitted_at, time_remaining_ms
            FROM answers
            WHERE interview_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([interview_id], Self::row_to_record)?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Every record with the interview it belongs to, in write order.
    /// Feeds the report and CSV export surfaces.
    pub fn rows(&self) -> Result<Vec<(String, AnswerRecord)>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT question_id, content, submitted_at, time_remaining_ms, interview_id
            FROM answers
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let record = Self::row_to_record(row)?;
            let interview_id: String = row.get(4)?;
            Ok((interview_id, record))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn interview_id(&self) -> &str {
        &self.interview_id
    }
}

impl AnswerStore for AnswerDb {
    fn append(&mut self, record: &AnswerRecord) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO answers (interview_id, question_id, content, submitted_at, time_remaining_ms)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                self.interview_id,
                record.question_id,
                record.content,
                record.submitted_at.to_rfc3339(),
                record.time_remaining_ms,
            ],
        )?;

        Ok(())
    }

    fn all(&self) -> Result<Vec<AnswerRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT question_id, content, submitted_at, time_remaining_ms
            FROM answers
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([], Self::row_to_record)?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }
}

/// In-memory answer log for ephemeral runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<AnswerRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnswerStore for MemoryStore {
    fn append(&mut self, record: &AnswerRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn all(&self) -> Result<Vec<AnswerRecord>, StoreError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question_id: &str, remaining: u64) -> AnswerRecord {
        AnswerRecord {
            question_id: question_id.to_string(),
            content: format!("answer for {question_id}"),
            submitted_at: Local::now(),
            time_remaining_ms: remaining,
        }
    }

    #[test]
    fn test_append_and_read_back_in_write_order() {
        let mut db = AnswerDb::open_in_memory("int-1").unwrap();

        db.append(&record("q2", 5_000)).unwrap();
        db.append(&record("q1", 0)).unwrap();

        let all = db.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].question_id, "q2");
        assert_eq!(all[1].question_id, "q1");
        assert_eq!(all[1].time_remaining_ms, 0);
    }

    #[test]
    fn test_timestamps_survive_round_trip() {
        let mut db = AnswerDb::open_in_memory("int-1").unwrap();
        let rec = record("q1", 1_234);
        db.append(&rec).unwrap();

        let all = db.all().unwrap();
        assert_eq!(
            all[0].submitted_at.to_rfc3339(),
            rec.submitted_at.to_rfc3339()
        );
    }

    #[test]
    fn test_for_interview_filters_by_id() {
        let mut db = AnswerDb::open_in_memory("int-a").unwrap();
        db.append(&record("q1", 100)).unwrap();

        assert_eq!(db.for_interview("int-a").unwrap().len(), 1);
        assert!(db.for_interview("int-b").unwrap().is_empty());
    }

    #[test]
    fn test_rows_carry_interview_id() {
        let mut db = AnswerDb::open_in_memory("int-a").unwrap();
        db.append(&record("q1", 100)).unwrap();

        let rows = db.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "int-a");
        assert_eq!(rows[0].1.question_id, "q1");
    }

    #[test]
    fn test_memory_store_keeps_write_order() {
        let mut store = MemoryStore::new();
        store.append(&record("q1", 10)).unwrap();
        store.append(&record("q2", 0)).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all[0].question_id, "q1");
        assert_eq!(all[1].question_id, "q2");
    }
}
