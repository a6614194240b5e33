//! services/app/src/adapters/store.rs
//!
//! This module contains the durable-store adapter, the concrete implementation
//! of the `RecordStore` port from the core crate. It keeps all three record
//! collections in one local SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use studydesk_core::domain::{Course, Document, DocumentKind, Note, Quiz, QuizQuestion};
use studydesk_core::ports::{PortError, PortResult, RecordStore};
use uuid::Uuid;

/// The value written to `PRAGMA user_version` once the collections exist.
/// There is a single fixed version and no migration logic; initialization
/// is a no-op when the version is already current.
const SCHEMA_VERSION: i32 = 1;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A local storage adapter that implements the `RecordStore` port.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database at `path`, creating the file, the three
    /// collections, and the two secondary indexes if absent. Safe to call
    /// on every launch.
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), sqlx::Error> {
        let version: i32 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                course TEXT NOT NULL,
                kind TEXT NOT NULL,
                data BLOB NOT NULL,
                added_at TEXT NOT NULL,
                page_count INTEGER
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                document_id TEXT NOT NULL,
                page_number INTEGER NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS notes_by_document ON notes (document_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS quizzes (
                id TEXT PRIMARY KEY,
                document_id TEXT NOT NULL,
                questions TEXT NOT NULL,
                score REAL,
                completed_at TEXT,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS quizzes_by_document ON quizzes (document_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

fn storage_err(err: sqlx::Error) -> PortError {
    PortError::Storage(err.to_string())
}

fn parse_id(raw: &str) -> PortResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| PortError::Storage(format!("bad record id '{}': {}", raw, e)))
}

fn parse_timestamp(raw: &str) -> PortResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| PortError::Storage(format!("bad timestamp '{}': {}", raw, e)))
}

#[derive(sqlx::FromRow)]
struct DocumentRecord {
    id: String,
    name: String,
    course: String,
    kind: String,
    data: Vec<u8>,
    added_at: String,
    page_count: Option<i64>,
}

impl DocumentRecord {
    fn into_domain(self) -> PortResult<Document> {
        Ok(Document {
            id: parse_id(&self.id)?,
            name: self.name,
            course: self.course.parse::<Course>().map_err(PortError::Storage)?,
            kind: self.kind.parse::<DocumentKind>().map_err(PortError::Storage)?,
            data: self.data,
            added_at: parse_timestamp(&self.added_at)?,
            page_count: self.page_count.map(|n| n as u32),
        })
    }
}

#[derive(sqlx::FromRow)]
struct NoteRecord {
    id: String,
    document_id: String,
    page_number: i64,
    content: String,
    created_at: String,
}

impl NoteRecord {
    fn into_domain(self) -> PortResult<Note> {
        Ok(Note {
            id: parse_id(&self.id)?,
            document_id: parse_id(&self.document_id)?,
            page_number: self.page_number as u32,
            content: self.content,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct QuizRecord {
    id: String,
    document_id: String,
    questions: String,
    score: Option<f64>,
    completed_at: Option<String>,
    created_at: String,
}

impl QuizRecord {
    fn into_domain(self) -> PortResult<Quiz> {
        let questions: Vec<QuizQuestion> = serde_json::from_str(&self.questions)
            .map_err(|e| PortError::Storage(format!("bad question payload: {}", e)))?;
        Ok(Quiz {
            id: parse_id(&self.id)?,
            document_id: parse_id(&self.document_id)?,
            questions,
            score: self.score.map(|s| s as f32),
            completed_at: self
                .completed_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

//=========================================================================================
// `RecordStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecordStore for SqliteStore {
    async fn put_document(&self, document: &Document) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO documents (id, name, course, kind, data, added_at, page_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (id) DO UPDATE SET
                 name = excluded.name,
                 course = excluded.course,
                 kind = excluded.kind,
                 data = excluded.data,
                 added_at = excluded.added_at,
                 page_count = excluded.page_count",
        )
        .bind(document.id.to_string())
        .bind(document.name.as_str())
        .bind(document.course.as_str())
        .bind(document.kind.as_str())
        .bind(document.data.as_slice())
        .bind(document.added_at.to_rfc3339())
        .bind(document.page_count.map(|n| n as i64))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn get_all_documents(&self) -> PortResult<Vec<Document>> {
        let records: Vec<DocumentRecord> = sqlx::query_as(
            "SELECT id, name, course, kind, data, added_at, page_count FROM documents",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(DocumentRecord::into_domain).collect()
    }

    async fn delete_document(&self, id: Uuid) -> PortResult<()> {
        sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn put_note(&self, note: &Note) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO notes (id, document_id, page_number, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                 document_id = excluded.document_id,
                 page_number = excluded.page_number,
                 content = excluded.content,
                 created_at = excluded.created_at",
        )
        .bind(note.id.to_string())
        .bind(note.document_id.to_string())
        .bind(note.page_number as i64)
        .bind(note.content.as_str())
        .bind(note.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn get_all_notes(&self) -> PortResult<Vec<Note>> {
        let records: Vec<NoteRecord> =
            sqlx::query_as("SELECT id, document_id, page_number, content, created_at FROM notes")
                .fetch_all(&self.pool)
                .await
                .map_err(storage_err)?;
        records.into_iter().map(NoteRecord::into_domain).collect()
    }

    async fn delete_note(&self, id: Uuid) -> PortResult<()> {
        sqlx::query("DELETE FROM notes WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn notes_for_document(&self, document_id: Uuid) -> PortResult<Vec<Note>> {
        let records: Vec<NoteRecord> = sqlx::query_as(
            "SELECT id, document_id, page_number, content, created_at
             FROM notes WHERE document_id = ?1",
        )
        .bind(document_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(NoteRecord::into_domain).collect()
    }

    async fn put_quiz(&self, quiz: &Quiz) -> PortResult<()> {
        let questions = serde_json::to_string(&quiz.questions)
            .map_err(|e| PortError::Storage(format!("unencodable question payload: {}", e)))?;
        sqlx::query(
            "INSERT INTO quizzes (id, document_id, questions, score, completed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (id) DO UPDATE SET
                 document_id = excluded.document_id,
                 questions = excluded.questions,
                 score = excluded.score,
                 completed_at = excluded.completed_at,
                 created_at = excluded.created_at",
        )
        .bind(quiz.id.to_string())
        .bind(quiz.document_id.to_string())
        .bind(questions)
        .bind(quiz.score.map(|s| s as f64))
        .bind(quiz.completed_at.map(|t| t.to_rfc3339()))
        .bind(quiz.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn get_all_quizzes(&self) -> PortResult<Vec<Quiz>> {
        let records: Vec<QuizRecord> = sqlx::query_as(
            "SELECT id, document_id, questions, score, completed_at, created_at FROM quizzes",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(QuizRecord::into_domain).collect()
    }

    async fn delete_quiz(&self, id: Uuid) -> PortResult<()> {
        sqlx::query("DELETE FROM quizzes WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn quizzes_for_document(&self, document_id: Uuid) -> PortResult<Vec<Quiz>> {
        let records: Vec<QuizRecord> = sqlx::query_as(
            "SELECT id, document_id, questions, score, completed_at, created_at
             FROM quizzes WHERE document_id = ?1",
        )
        .bind(document_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(QuizRecord::into_domain).collect()
    }
}
