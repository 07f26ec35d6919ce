//! SQLite-backed persistence.
//!
//! Two core tables: `tokens` (one OAuth pair per tenant, replaced
//! wholesale) and `oauth_states` (one-time CSRF values with a 10-minute
//! TTL, swept opportunistically on every consumption attempt). The
//! exercise subsystem adds `dictionary` and `learning_log`.
//!
//! Migrations run at construction with `CREATE TABLE IF NOT EXISTS`;
//! timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use thiserror::Error;
use uuid::Uuid;

/// Safety margin subtracted from the provider-reported token lifetime.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// One-time OAuth states older than this are never accepted.
const STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Db(#[from] sqlx::Error),
}

type Result<T> = std::result::Result<T, StoreError>;

/// A tenant's stored token pair.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub company_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    /// Margin-adjusted expiry; see [`TOKEN_EXPIRY_MARGIN_SECS`].
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// A saved dictionary word (exercise subsystem).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DictionaryWord {
    #[serde(default)]
    pub id: i64,
    pub german: String,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub russian: String,
    #[serde(default)]
    pub word_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A learning log entry (exercise subsystem).
#[derive(Debug, Clone, serde::Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub content: String,
    pub created_at: String,
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a store with the given connection URL and run migrations.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::with_pool(pool).await
    }

    /// In-memory store (for testing). A single connection, because each
    /// in-memory SQLite connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tokens (
                company_id INTEGER PRIMARY KEY,
                access_token TEXT NOT NULL,
                refresh_token TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS oauth_states (
                state TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dictionary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                german TEXT NOT NULL,
                english TEXT NOT NULL DEFAULT '',
                russian TEXT NOT NULL DEFAULT '',
                word_type TEXT NOT NULL DEFAULT 'other',
                category TEXT NOT NULL DEFAULT 'vocabulary',
                explanation TEXT NOT NULL DEFAULT '',
                examples TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS learning_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the underlying connection pool (health checks).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Upsert the tenant's token pair. Stored expiry is the provider
    /// lifetime minus the safety margin.
    pub async fn save_token(
        &self,
        company_id: i64,
        access_token: &str,
        refresh_token: &str,
        expires_in_seconds: i64,
    ) -> Result<()> {
        let expires_at =
            Utc::now() + Duration::seconds(expires_in_seconds - TOKEN_EXPIRY_MARGIN_SECS);

        sqlx::query(
            r#"
            INSERT INTO tokens (company_id, access_token, refresh_token, expires_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(company_id) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(company_id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Point lookup of a tenant's token pair.
    pub async fn load_token(&self, company_id: i64) -> Result<Option<StoredToken>> {
        let row = sqlx::query(
            "SELECT company_id, access_token, refresh_token, expires_at FROM tokens WHERE company_id = ?",
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StoredToken {
            company_id: row.get("company_id"),
            access_token: row.get("access_token"),
            refresh_token: row.get("refresh_token"),
            expires_at: row
                .get::<String, _>("expires_at")
                .parse()
                .unwrap_or_else(|_| Utc::now() - Duration::seconds(1)),
        }))
    }

    // =========================================================================
    // One-time OAuth states
    // =========================================================================

    /// Generate and record a random, URL-safe CSRF state token.
    pub async fn issue_state(&self) -> Result<String> {
        let state = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

        sqlx::query("INSERT INTO oauth_states (state, created_at) VALUES (?, ?)")
            .bind(&state)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(state)
    }

    /// One-time consumption: sweep expired rows, then atomically delete
    /// the matching row. True iff the state existed and was fresh. A
    /// single DELETE makes concurrent callback delivery at-most-once.
    pub async fn consume_state(&self, state: &str) -> Result<bool> {
        let cutoff = Utc::now() - Duration::minutes(STATE_TTL_MINUTES);

        sqlx::query("DELETE FROM oauth_states WHERE created_at < ?")
            .bind(cutoff.to_rfc3339())
            .execute(&self.pool)
            .await?;

        let deleted = sqlx::query("DELETE FROM oauth_states WHERE state = ?")
            .bind(state)
            .execute(&self.pool)
            .await?;

        Ok(deleted.rows_affected() == 1)
    }

    // =========================================================================
    // Dictionary (exercise subsystem)
    // =========================================================================

    pub async fn list_words(&self) -> Result<Vec<DictionaryWord>> {
        let rows = sqlx::query(
            "SELECT id, german, english, russian, word_type, category, explanation, examples
             FROM dictionary ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DictionaryWord {
                id: row.get("id"),
                german: row.get("german"),
                english: row.get("english"),
                russian: row.get("russian"),
                word_type: row.get("word_type"),
                category: row.get("category"),
                explanation: row.get("explanation"),
                examples: serde_json::from_str(row.get::<String, _>("examples").as_str())
                    .unwrap_or_default(),
            })
            .collect())
    }

    pub async fn add_word(&self, word: &DictionaryWord) -> Result<i64> {
        let examples = serde_json::to_string(&word.examples).unwrap_or_else(|_| "[]".into());
        let result = sqlx::query(
            r#"
            INSERT INTO dictionary
                (german, english, russian, word_type, category, explanation, examples, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&word.german)
        .bind(&word.english)
        .bind(&word.russian)
        .bind(&word.word_type)
        .bind(&word.category)
        .bind(&word.explanation)
        .bind(examples)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Full-row update. True iff the word existed.
    pub async fn update_word(&self, id: i64, word: &DictionaryWord) -> Result<bool> {
        let examples = serde_json::to_string(&word.examples).unwrap_or_else(|_| "[]".into());
        let updated = sqlx::query(
            r#"
            UPDATE dictionary SET
                german = ?, english = ?, russian = ?, word_type = ?,
                category = ?, explanation = ?, examples = ?
            WHERE id = ?
            "#,
        )
        .bind(&word.german)
        .bind(&word.english)
        .bind(&word.russian)
        .bind(&word.word_type)
        .bind(&word.category)
        .bind(&word.explanation)
        .bind(examples)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(updated.rows_affected() == 1)
    }

    /// Merge a client-side dictionary: insert words whose German form is
    /// not yet stored, leave existing rows untouched. Returns how many
    /// were added.
    pub async fn sync_words(&self, words: &[DictionaryWord]) -> Result<u64> {
        let mut added = 0;
        for word in words {
            if word.german.trim().is_empty() {
                continue;
            }
            let examples =
                serde_json::to_string(&word.examples).unwrap_or_else(|_| "[]".into());
            let result = sqlx::query(
                r#"
                INSERT INTO dictionary
                    (german, english, russian, word_type, category, explanation, examples, created_at)
                SELECT ?, ?, ?, ?, ?, ?, ?, ?
                WHERE NOT EXISTS (SELECT 1 FROM dictionary WHERE german = ?)
                "#,
            )
            .bind(&word.german)
            .bind(&word.english)
            .bind(&word.russian)
            .bind(&word.word_type)
            .bind(&word.category)
            .bind(&word.explanation)
            .bind(examples)
            .bind(Utc::now().to_rfc3339())
            .bind(&word.german)
            .execute(&self.pool)
            .await?;
            added += result.rows_affected();
        }
        Ok(added)
    }

    /// True iff a row was deleted.
    pub async fn delete_word(&self, id: i64) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM dictionary WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected() == 1)
    }

    // =========================================================================
    // Learning log (exercise subsystem)
    // =========================================================================

    pub async fn add_log_entry(&self, content: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO learning_log (content, created_at) VALUES (?, ?)")
            .bind(content)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn list_log(&self, limit: i64) -> Result<Vec<LogEntry>> {
        let rows = sqlx::query(
            "SELECT id, content, created_at FROM learning_log ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LogEntry {
                id: row.get("id"),
                content: row.get("content"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    pub async fn clear_log(&self) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM learning_log")
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_load_token_roundtrip() {
        let store = Store::in_memory().await.unwrap();

        store.save_token(42, "access", "refresh", 3600).await.unwrap();
        let token = store.load_token(42).await.unwrap().unwrap();

        assert_eq!(token.access_token, "access");
        assert_eq!(token.refresh_token, "refresh");
        assert!(!token.is_expired());
        // Margin applied: real expiry is under the raw lifetime.
        assert!(token.expires_at < Utc::now() + Duration::seconds(3600));

        assert!(store.load_token(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn token_upsert_replaces_wholesale() {
        let store = Store::in_memory().await.unwrap();

        store.save_token(42, "old", "old-r", 3600).await.unwrap();
        store.save_token(42, "new", "new-r", 3600).await.unwrap();

        let token = store.load_token(42).await.unwrap().unwrap();
        assert_eq!(token.access_token, "new");
        assert_eq!(token.refresh_token, "new-r");
    }

    #[tokio::test]
    async fn short_lifetime_token_is_already_expired() {
        let store = Store::in_memory().await.unwrap();
        // Lifetime below the safety margin.
        store.save_token(1, "a", "r", 30).await.unwrap();
        assert!(store.load_token(1).await.unwrap().unwrap().is_expired());
    }

    #[tokio::test]
    async fn state_is_consumed_exactly_once() {
        let store = Store::in_memory().await.unwrap();

        let state = store.issue_state().await.unwrap();
        assert!(store.consume_state(&state).await.unwrap());
        assert!(!store.consume_state(&state).await.unwrap());
        assert!(!store.consume_state("never-issued").await.unwrap());
    }

    #[tokio::test]
    async fn expired_state_is_rejected_and_swept() {
        let store = Store::in_memory().await.unwrap();

        let state = store.issue_state().await.unwrap();
        // Backdate past the TTL.
        let old = (Utc::now() - Duration::minutes(STATE_TTL_MINUTES + 1)).to_rfc3339();
        sqlx::query("UPDATE oauth_states SET created_at = ?")
            .bind(old)
            .execute(store.pool())
            .await
            .unwrap();

        assert!(!store.consume_state(&state).await.unwrap());
    }

    #[tokio::test]
    async fn issued_states_are_url_safe_and_distinct() {
        let store = Store::in_memory().await.unwrap();
        let a = store.issue_state().await.unwrap();
        let b = store.issue_state().await.unwrap();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    fn word(german: &str, english: &str) -> DictionaryWord {
        DictionaryWord {
            id: 0,
            german: german.into(),
            english: english.into(),
            russian: String::new(),
            word_type: "verb".into(),
            category: "vocabulary".into(),
            explanation: String::new(),
            examples: vec![],
        }
    }

    #[tokio::test]
    async fn dictionary_crud() {
        let store = Store::in_memory().await.unwrap();

        let id = store
            .add_word(&DictionaryWord {
                id: 0,
                german: "gehen".into(),
                english: "to go".into(),
                russian: "идти".into(),
                word_type: "verb".into(),
                category: "vocabulary".into(),
                explanation: String::new(),
                examples: vec!["Ich gehe nach Hause. – I go home.".into()],
            })
            .await
            .unwrap();

        let words = store.list_words().await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].german, "gehen");
        assert_eq!(words[0].examples.len(), 1);

        assert!(store.delete_word(id).await.unwrap());
        assert!(!store.delete_word(id).await.unwrap());
    }

    #[tokio::test]
    async fn update_word_replaces_the_row() {
        let store = Store::in_memory().await.unwrap();
        let id = store.add_word(&word("alt", "old")).await.unwrap();

        let mut changed = word("neu", "new");
        changed.examples = vec!["Das ist neu. - That is new.".into()];
        assert!(store.update_word(id, &changed).await.unwrap());

        let words = store.list_words().await.unwrap();
        assert_eq!(words[0].german, "neu");
        assert_eq!(words[0].examples.len(), 1);

        assert!(!store.update_word(9999, &changed).await.unwrap());
    }

    #[tokio::test]
    async fn sync_merges_only_unknown_german_forms() {
        let store = Store::in_memory().await.unwrap();
        store.add_word(&word("gehen", "to go")).await.unwrap();

        let added = store
            .sync_words(&[
                word("gehen", "to walk"),
                word("laufen", "to run"),
                word("  ", "blank"),
            ])
            .await
            .unwrap();
        assert_eq!(added, 1);

        let words = store.list_words().await.unwrap();
        assert_eq!(words.len(), 2);
        // The existing entry is left untouched.
        let gehen = words.iter().find(|w| w.german == "gehen").unwrap();
        assert_eq!(gehen.english, "to go");
    }

    #[tokio::test]
    async fn learning_log_roundtrip() {
        let store = Store::in_memory().await.unwrap();
        store.add_log_entry("first").await.unwrap();
        store.add_log_entry("second").await.unwrap();

        let entries = store.list_log(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "second");

        assert_eq!(store.clear_log().await.unwrap(), 2);
        assert!(store.list_log(10).await.unwrap().is_empty());
    }
}
