use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{DrugInteractionRecord, InteractionSeverity};

use super::knowledge::{InteractionKnowledgeBase, KnowledgeBaseError};

const MIGRATIONS: &[(i64, &str)] = &[
    (
        1,
        "CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at TEXT NOT NULL DEFAULT (datetime('now'))
         );
         CREATE TABLE IF NOT EXISTS drug_interactions (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             drug_a TEXT NOT NULL,
             drug_b TEXT NOT NULL,
             severity TEXT NOT NULL DEFAULT 'moderate',
             description TEXT NOT NULL,
             mechanism TEXT,
             clinical_management TEXT
         );
         CREATE INDEX IF NOT EXISTS idx_drug_interactions_pair
             ON drug_interactions (LOWER(drug_a), LOWER(drug_b));
         INSERT OR IGNORE INTO schema_version (version) VALUES (1);",
    ),
    (
        2,
        "UPDATE drug_interactions SET drug_a = TRIM(drug_a), drug_b = TRIM(drug_b);
         INSERT OR IGNORE INTO schema_version (version) VALUES (2);",
    ),
];

/// Interaction knowledge base backed by a SQLite table.
pub struct SqliteInteractionStore {
    conn: Mutex<Connection>,
}

impl SqliteInteractionStore {
    pub fn open(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let conn = Connection::open(path)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store (for tests and one-shot CLI runs).
    pub fn open_in_memory() -> Result<Self, KnowledgeBaseError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn insert(&self, record: &DrugInteractionRecord) -> Result<(), KnowledgeBaseError> {
        let conn = self.conn.lock().map_err(|_| KnowledgeBaseError::LockFailed)?;
        insert_record(&conn, record)?;
        Ok(())
    }

    /// Bulk import in one transaction. With `replace`, existing rows are
    /// deleted first. Returns the number of rows inserted.
    pub fn import(
        &self,
        records: &[DrugInteractionRecord],
        replace: bool,
    ) -> Result<usize, KnowledgeBaseError> {
        let mut conn = self.conn.lock().map_err(|_| KnowledgeBaseError::LockFailed)?;
        let tx = conn.transaction()?;
        if replace {
            tx.execute("DELETE FROM drug_interactions", [])?;
        }
        for record in records {
            insert_record(&tx, record)?;
        }
        tx.commit()?;

        tracing::info!(imported = records.len(), replace, "Imported drug interactions");
        Ok(records.len())
    }

    pub fn count(&self) -> Result<usize, KnowledgeBaseError> {
        let conn = self.conn.lock().map_err(|_| KnowledgeBaseError::LockFailed)?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM drug_interactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl InteractionKnowledgeBase for SqliteInteractionStore {
    fn find(
        &self,
        drug_a: &str,
        drug_b: &str,
    ) -> Result<Option<DrugInteractionRecord>, KnowledgeBaseError> {
        let conn = self.conn.lock().map_err(|_| KnowledgeBaseError::LockFailed)?;
        let row = conn
            .query_row(
                "SELECT drug_a, drug_b, severity, description, mechanism, clinical_management
                 FROM drug_interactions
                 WHERE (LOWER(drug_a) = LOWER(?1) AND LOWER(drug_b) = LOWER(?2))
                    OR (LOWER(drug_a) = LOWER(?2) AND LOWER(drug_b) = LOWER(?1))
                 ORDER BY id
                 LIMIT 1",
                params![drug_a.trim(), drug_b.trim()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(
            |(drug_a, drug_b, severity, description, mechanism, clinical_management)| {
                DrugInteractionRecord {
                    drug_a,
                    drug_b,
                    severity: InteractionSeverity::normalize(Some(&severity)),
                    description,
                    mechanism,
                    clinical_management,
                }
            },
        ))
    }
}

fn run_migrations(conn: &Connection) -> Result<(), KnowledgeBaseError> {
    let current_version = get_current_version(conn);

    for (version, sql) in MIGRATIONS {
        if *version > current_version {
            tracing::info!("Running interaction store migration v{version}");
            conn.execute_batch(sql).map_err(|e| {
                KnowledgeBaseError::Unavailable(format!("migration v{version} failed: {e}"))
            })?;
        }
    }

    Ok(())
}

/// 0 when the schema does not exist yet.
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

fn insert_record(conn: &Connection, record: &DrugInteractionRecord) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO drug_interactions
             (drug_a, drug_b, severity, description, mechanism, clinical_management)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.drug_a.trim(),
            record.drug_b.trim(),
            record.severity.as_str(),
            record.description,
            record.mechanism,
            record.clinical_management,
        ],
    )
}
