use anyhow::Result;
use shared::{LifestyleStats, MoodEntry, User};
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:mindease.db";

/// DbConnection manages the SQLite store behind the API
///
/// Two collections: `users` (keyed by unique email) and `moods`. The UNIQUE
/// constraint on email is what guarantees concurrent logins can never create
/// two records for the same address.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database, honoring MINDEASE_DATABASE_URL
    pub async fn init() -> Result<Self> {
        let url =
            std::env::var("MINDEASE_DATABASE_URL").unwrap_or_else(|_| DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                bio TEXT,
                avatar TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS moods (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                mood TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                icon TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                lifestyle TEXT,
                user_email TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a user unless one with the same email already exists
    ///
    /// Returns true if the row was inserted. Losing the race to another
    /// insert is not an error; the caller re-reads by email either way.
    pub async fn try_insert_user(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, bio, avatar)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(email) DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.bio)
        .bind(&user.avatar)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Look up a user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, bio, avatar FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| row_to_user(&r)))
    }

    /// Full-replace update of name/bio/avatar, keyed by email
    ///
    /// Returns false if no user with that email exists.
    pub async fn update_user_by_email(&self, user: &User) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET name = ?, bio = ?, avatar = ? WHERE email = ?")
            .bind(&user.name)
            .bind(&user.bio)
            .bind(&user.avatar)
            .bind(&user.email)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all mood entries, newest first
    pub async fn list_moods(&self) -> Result<Vec<MoodEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, mood, note, icon, tags, lifestyle, user_email
            FROM moods
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        rows.iter().map(row_to_mood).collect()
    }

    /// Store a new mood entry (the caller assigns the id)
    pub async fn insert_mood(&self, entry: &MoodEntry) -> Result<()> {
        let tags = serde_json::to_string(&entry.tags)?;
        let lifestyle = entry
            .lifestyle
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO moods (id, date, mood, note, icon, tags, lifestyle, user_email)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.date)
        .bind(&entry.mood)
        .bind(&entry.note)
        .bind(&entry.icon)
        .bind(tags)
        .bind(lifestyle)
        .bind(&entry.user_email)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        bio: row.get("bio"),
        avatar: row.get("avatar"),
    }
}

fn row_to_mood(row: &sqlx::sqlite::SqliteRow) -> Result<MoodEntry> {
    let tags: String = row.get("tags");
    let lifestyle: Option<String> = row.get("lifestyle");
    let lifestyle: Option<LifestyleStats> = lifestyle
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;

    Ok(MoodEntry {
        id: row.get("id"),
        date: row.get("date"),
        mood: row.get("mood"),
        note: row.get("note"),
        icon: row.get("icon"),
        tags: serde_json::from_str(&tags)?,
        lifestyle,
        user_email: row.get("user_email"),
    })
}
