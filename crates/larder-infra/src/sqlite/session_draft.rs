//! SQLite implementation of `SessionDraftStore`.
//!
//! Persists autosaved sessions in the `session_drafts` table using INSERT OR
//! REPLACE for upsert semantics. The recipe name and step are read out of
//! `state_json` for listing, without deserializing the whole snapshot.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use larder_core::repository::session_draft::{SessionDraft, SessionDraftStore, SessionDraftSummary};
use larder_types::error::RepositoryError;

use crate::sqlite::pool::DatabasePool;

/// SQLite-backed session autosave.
pub struct SqliteSessionDraftStore {
    pool: DatabasePool,
}

impl SqliteSessionDraftStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_session_id(s: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid session_id: {e}")))
}

/// Follow `path` through a JSON document and return the string found there,
/// or an empty string.
fn extract_json_string(json: &str, path: &[&str]) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
        return String::new();
    };
    path.iter()
        .try_fold(&value, |node, key| node.get(key))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_default()
}

fn row_to_draft(row: &SqliteRow) -> Result<SessionDraft, RepositoryError> {
    let sid: String = row.try_get("session_id").map_err(query_err)?;
    let state_json: String = row.try_get("state_json").map_err(query_err)?;
    let schema_version: i64 = row.try_get("schema_version").map_err(query_err)?;
    let created_at: String = row.try_get("created_at").map_err(query_err)?;
    let updated_at: String = row.try_get("updated_at").map_err(query_err)?;

    Ok(SessionDraft {
        session_id: parse_session_id(&sid)?,
        state_json,
        schema_version: schema_version as u32,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

// ---------------------------------------------------------------------------
// SessionDraftStore implementation
// ---------------------------------------------------------------------------

impl SessionDraftStore for SqliteSessionDraftStore {
    async fn save_draft(&self, draft: SessionDraft) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT OR REPLACE INTO session_drafts (session_id, state_json, schema_version, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(draft.session_id.to_string())
        .bind(&draft.state_json)
        .bind(draft.schema_version as i64)
        .bind(format_datetime(&draft.created_at))
        .bind(format_datetime(&draft.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        tracing::debug!(session_id = %draft.session_id, "session autosaved");
        Ok(())
    }

    async fn load_draft(&self, session_id: &Uuid) -> Result<Option<SessionDraft>, RepositoryError> {
        let row = sqlx::query(
            "SELECT session_id, state_json, schema_version, created_at, updated_at FROM session_drafts WHERE session_id = ?",
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?;

        row.as_ref().map(row_to_draft).transpose()
    }

    async fn list_drafts(&self) -> Result<Vec<SessionDraftSummary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id, state_json, updated_at FROM session_drafts ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let sid: String = row.try_get("session_id").map_err(query_err)?;
            let state_json: String = row.try_get("state_json").map_err(query_err)?;
            let updated_at: String = row.try_get("updated_at").map_err(query_err)?;

            summaries.push(SessionDraftSummary {
                session_id: parse_session_id(&sid)?,
                recipe_name: extract_json_string(&state_json, &["draft", "name"]),
                step: extract_json_string(&state_json, &["step"]),
                updated_at: parse_datetime(&updated_at)?,
            });
        }

        Ok(summaries)
    }

    async fn delete_draft(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM session_drafts WHERE session_id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::authoring::session::SessionSnapshot;
    use larder_types::authoring::AuthoringStep;
    use larder_types::recipe::RecipeDraft;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_draft(session_id: Uuid, name: &str, step: AuthoringStep) -> SessionDraft {
        let snapshot = SessionSnapshot {
            session_id,
            step,
            draft: RecipeDraft {
                name: name.to_string(),
                ..Default::default()
            },
            contexts: Vec::new(),
            updated_at: Utc::now(),
        };
        snapshot.to_session_draft(Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let store = SqliteSessionDraftStore::new(test_pool().await);

        let id = Uuid::now_v7();
        let draft = make_draft(id, "Tomato Soup", AuthoringStep::BasicDetails);
        store.save_draft(draft.clone()).await.unwrap();

        let loaded = store.load_draft(&id).await.unwrap().unwrap();
        assert_eq!(loaded.session_id, id);
        assert_eq!(loaded.state_json, draft.state_json);
        assert_eq!(loaded.schema_version, 1);

        let snapshot = SessionSnapshot::from_session_draft(&loaded).unwrap();
        assert_eq!(snapshot.draft.name, "Tomato Soup");
    }

    #[tokio::test]
    async fn test_save_upserts() {
        let store = SqliteSessionDraftStore::new(test_pool().await);

        let id = Uuid::now_v7();
        store
            .save_draft(make_draft(id, "Soup", AuthoringStep::BasicDetails))
            .await
            .unwrap();
        let second = make_draft(id, "Soup", AuthoringStep::ServingBreakdown);
        store.save_draft(second.clone()).await.unwrap();

        let loaded = store.load_draft(&id).await.unwrap().unwrap();
        assert_eq!(loaded.state_json, second.state_json);
        assert_eq!(store.list_drafts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_nonexistent_returns_none() {
        let store = SqliteSessionDraftStore::new(test_pool().await);
        assert!(store.load_draft(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_drafts_most_recent_first() {
        let store = SqliteSessionDraftStore::new(test_pool().await);

        let id1 = Uuid::now_v7();
        let id2 = Uuid::now_v7();
        store
            .save_draft(make_draft(id1, "Soup", AuthoringStep::BasicDetails))
            .await
            .unwrap();
        // Small delay to ensure different updated_at timestamps
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        store
            .save_draft(make_draft(id2, "Stew", AuthoringStep::IngredientSelection))
            .await
            .unwrap();

        let summaries = store.list_drafts().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].session_id, id2);
        assert_eq!(summaries[0].recipe_name, "Stew");
        assert_eq!(summaries[0].step, "ingredient_selection");
        assert_eq!(summaries[1].recipe_name, "Soup");
        assert_eq!(summaries[1].step, "basic_details");
    }

    #[tokio::test]
    async fn test_delete_draft() {
        let store = SqliteSessionDraftStore::new(test_pool().await);

        let id = Uuid::now_v7();
        store
            .save_draft(make_draft(id, "Temp", AuthoringStep::BasicDetails))
            .await
            .unwrap();
        store.delete_draft(&id).await.unwrap();
        assert!(store.load_draft(&id).await.unwrap().is_none());

        // Deleting again is a no-op
        store.delete_draft(&id).await.unwrap();
    }

    #[test]
    fn test_extract_json_string() {
        let json = r#"{"step":"basic_details","draft":{"name":"Soup"}}"#;
        assert_eq!(extract_json_string(json, &["draft", "name"]), "Soup");
        assert_eq!(extract_json_string(json, &["draft", "author"]), "");
        assert_eq!(extract_json_string("not json", &["step"]), "");
    }
}
