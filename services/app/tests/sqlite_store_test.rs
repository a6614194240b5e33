//! Round-trip and schema tests for the SQLite record store.

use app_lib::adapters::store::SqliteStore;
use chrono::{TimeZone, Utc};
use studydesk_core::domain::{Course, Document, DocumentKind, Note, Quiz, QuizQuestion};
use studydesk_core::new_record_id;
use studydesk_core::ports::RecordStore;
use tempfile::TempDir;

async fn open_store(dir: &TempDir) -> SqliteStore {
    SqliteStore::open(&dir.path().join("studydesk.db"))
        .await
        .expect("store should open")
}

fn sample_document() -> Document {
    Document {
        id: new_record_id(),
        name: "blood-cells.pdf".to_string(),
        course: Course::Hematology,
        data: vec![0x25, 0x50, 0x44, 0x46, 0x2d],
        kind: DocumentKind::Pdf,
        added_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        page_count: Some(42),
    }
}

fn sample_note(document_id: uuid::Uuid) -> Note {
    Note {
        id: new_record_id(),
        document_id,
        page_number: 7,
        content: "spherocytes on this smear".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
    }
}

fn sample_quiz(document_id: uuid::Uuid) -> Quiz {
    Quiz {
        id: new_record_id(),
        document_id,
        questions: vec![QuizQuestion {
            id: 1,
            question: "Which anticoagulant is used for a CBC tube?".to_string(),
            options: vec![
                "Heparin".to_string(),
                "EDTA".to_string(),
                "Citrate".to_string(),
                "Oxalate".to_string(),
            ],
            correct_answer: 1,
            explanation: "EDTA preserves cell morphology.".to_string(),
        }],
        score: Some(80.0),
        completed_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap()),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn document_round_trip_preserves_every_field() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let doc = sample_document();

    store.put_document(&doc).await.unwrap();
    let loaded = store.get_all_documents().await.unwrap();
    assert_eq!(loaded, vec![doc]);
}

#[tokio::test]
async fn note_round_trip_preserves_every_field() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let note = sample_note(new_record_id());

    store.put_note(&note).await.unwrap();
    let loaded = store.get_all_notes().await.unwrap();
    assert_eq!(loaded, vec![note]);
}

#[tokio::test]
async fn quiz_round_trip_preserves_every_field() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let quiz = sample_quiz(new_record_id());

    store.put_quiz(&quiz).await.unwrap();
    let loaded = store.get_all_quizzes().await.unwrap();
    assert_eq!(loaded, vec![quiz]);
}

#[tokio::test]
async fn put_is_insert_or_replace() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let mut doc = sample_document();

    store.put_document(&doc).await.unwrap();
    doc.name = "renamed.pdf".to_string();
    doc.page_count = None;
    store.put_document(&doc).await.unwrap();

    let loaded = store.get_all_documents().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "renamed.pdf");
    assert_eq!(loaded[0].page_count, None);
}

#[tokio::test]
async fn delete_of_a_missing_key_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.delete_document(new_record_id()).await.unwrap();
    store.delete_note(new_record_id()).await.unwrap();
    store.delete_quiz(new_record_id()).await.unwrap();
    assert!(store.get_all_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn secondary_index_queries_filter_by_document() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let doc_a = new_record_id();
    let doc_b = new_record_id();

    store.put_note(&sample_note(doc_a)).await.unwrap();
    store.put_note(&sample_note(doc_a)).await.unwrap();
    store.put_note(&sample_note(doc_b)).await.unwrap();
    store.put_quiz(&sample_quiz(doc_b)).await.unwrap();

    assert_eq!(store.notes_for_document(doc_a).await.unwrap().len(), 2);
    assert_eq!(store.notes_for_document(doc_b).await.unwrap().len(), 1);
    assert!(store.quizzes_for_document(doc_a).await.unwrap().is_empty());
    assert_eq!(store.quizzes_for_document(doc_b).await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_collections_read_back_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    assert!(store.get_all_documents().await.unwrap().is_empty());
    assert!(store.get_all_notes().await.unwrap().is_empty());
    assert!(store.get_all_quizzes().await.unwrap().is_empty());
}

#[tokio::test]
async fn reopening_the_database_is_idempotent_and_keeps_data() {
    let dir = TempDir::new().unwrap();
    let doc = sample_document();
    {
        let store = open_store(&dir).await;
        store.put_document(&doc).await.unwrap();
    }
    // Second launch runs schema initialization again over the same file.
    let store = open_store(&dir).await;
    let loaded = store.get_all_documents().await.unwrap();
    assert_eq!(loaded, vec![doc]);
}
