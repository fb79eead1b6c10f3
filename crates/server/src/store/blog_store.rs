//! SQLite-backed blog store

use bloglist_core::validation::ValidBlog;
use bloglist_core::{BlogRecord, BlogUpdate};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;

type BlogRow = (String, String, Option<String>, String, i64, String);

const SELECT_BLOG: &str = "SELECT id, title, author, url, likes, user_id FROM blogs";

fn blog_from_row((id, title, author, url, likes, user): BlogRow) -> BlogRecord {
    BlogRecord {
        id,
        title,
        author,
        url,
        // the column carries a CHECK (likes >= 0)
        likes: u64::try_from(likes).unwrap_or_default(),
        user,
    }
}

fn likes_column(likes: u64) -> i64 {
    i64::try_from(likes).unwrap_or(i64::MAX)
}

pub struct BlogStore {
    pool: SqlitePool,
}

impl BlogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All blogs in insertion order
    pub async fn list(&self) -> Result<Vec<BlogRecord>> {
        let rows: Vec<BlogRow> = sqlx::query_as(&format!("{SELECT_BLOG} ORDER BY seq"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(blog_from_row).collect())
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<BlogRecord>> {
        let rows: Vec<BlogRow> =
            sqlx::query_as(&format!("{SELECT_BLOG} WHERE user_id = ? ORDER BY seq"))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(blog_from_row).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<BlogRecord>> {
        let row: Option<BlogRow> = sqlx::query_as(&format!("{SELECT_BLOG} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(blog_from_row))
    }

    pub async fn create(&self, blog: ValidBlog, owner_id: &str) -> Result<BlogRecord> {
        let record = BlogRecord {
            id: Uuid::new_v4().to_string(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user: owner_id.to_string(),
        };

        sqlx::query(
            "INSERT INTO blogs (id, title, author, url, likes, user_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(&record.author)
        .bind(&record.url)
        .bind(likes_column(record.likes))
        .bind(&record.user)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("[Store] Created blog {} for user {}", record.id, owner_id);

        Ok(record)
    }

    /// Replace the fields present in `update`. Expects a validated update.
    ///
    /// Absent fields keep their stored value, so a concurrent `like` is never
    /// overwritten by an update that did not mention `likes`.
    pub async fn update(&self, id: &str, update: BlogUpdate) -> Result<Option<BlogRecord>> {
        // Some(None) clears the author
        let author = update
            .author
            .map(|author| Some(author).filter(|a| !a.trim().is_empty()));
        let likes = update.likes.map(|likes| likes.max(0));

        let result = sqlx::query(
            "UPDATE blogs SET title = COALESCE(?, title), url = COALESCE(?, url), \
             author = CASE WHEN ? THEN ? ELSE author END, likes = COALESCE(?, likes) \
             WHERE id = ?",
        )
        .bind(update.title)
        .bind(update.url)
        .bind(author.is_some())
        .bind(author.flatten())
        .bind(likes)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Add one like. Returns the updated record.
    pub async fn like(&self, id: &str) -> Result<Option<BlogRecord>> {
        let result = sqlx::query("UPDATE blogs SET likes = likes + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Returns false when no blog had this id.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("[Store] Deleted blog {}", id);
        }
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connect;
    use tempfile::TempDir;

    async fn store_with_owner() -> (BlogStore, SqlitePool) {
        let pool = connect("sqlite::memory:").await.unwrap();
        insert_owner(&pool).await;
        (BlogStore::new(pool.clone()), pool)
    }

    async fn insert_owner(pool: &SqlitePool) {
        sqlx::query(
            "INSERT INTO users (id, username, name, password_hash, created_at) VALUES ('owner', 'root', 'root', 'x', '2024-01-01T00:00:00Z')",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn valid(title: &str, likes: u64) -> ValidBlog {
        ValidBlog {
            title: title.to_string(),
            author: Some("Karina".to_string()),
            url: format!("{title}.com"),
            likes,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_in_insertion_order() {
        let (store, _pool) = store_with_owner().await;

        store.create(valid("first", 1), "owner").await.unwrap();
        store.create(valid("second", 2), "owner").await.unwrap();
        store.create(valid("third", 3), "owner").await.unwrap();

        let titles: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let (store, _pool) = store_with_owner().await;
        let blog = store.create(valid("post", 1), "owner").await.unwrap();

        let updated = store
            .update(
                &blog.id,
                BlogUpdate {
                    likes: Some(20),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.likes, 20);
        assert_eq!(updated.title, "post");

        let fetched = store.get(&blog.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_title_updates_keep_interleaved_likes() {
        let (store, _pool) = store_with_owner().await;
        let blog = store.create(valid("post", 0), "owner").await.unwrap();

        let likes = async {
            for _ in 0..20 {
                store.like(&blog.id).await.unwrap();
            }
        };
        let renames = async {
            for n in 0..20 {
                let update = BlogUpdate {
                    title: Some(format!("post {n}")),
                    ..Default::default()
                };
                store.update(&blog.id, update).await.unwrap();
            }
        };
        tokio::join!(likes, renames);

        let fetched = store.get(&blog.id).await.unwrap().unwrap();
        assert_eq!(fetched.likes, 20);
        assert_eq!(fetched.title, "post 19");
    }

    #[tokio::test]
    async fn test_update_clears_blank_author_and_misses_unknown_id() {
        let (store, _pool) = store_with_owner().await;
        let blog = store.create(valid("post", 3), "owner").await.unwrap();

        let update = BlogUpdate {
            author: Some("  ".to_string()),
            ..Default::default()
        };
        let updated = store.update(&blog.id, update).await.unwrap().unwrap();
        assert_eq!(updated.author, None);
        assert_eq!(updated.likes, 3);

        assert!(store
            .update("missing", BlogUpdate::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_like_and_delete() {
        let (store, _pool) = store_with_owner().await;
        let blog = store.create(valid("post", 0), "owner").await.unwrap();

        let liked = store.like(&blog.id).await.unwrap().unwrap();
        assert_eq!(liked.likes, 1);

        assert!(store.delete(&blog.id).await.unwrap());
        assert!(!store.delete(&blog.id).await.unwrap());
        assert!(store.get(&blog.id).await.unwrap().is_none());
        assert!(store.like(&blog.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_stores_are_isolated() {
        let (first, _a) = store_with_owner().await;
        let (second, _b) = store_with_owner().await;

        first.create(valid("only-here", 0), "owner").await.unwrap();

        assert_eq!(first.list().await.unwrap().len(), 1);
        assert!(second.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", temp_dir.path().join("blogs.sqlite").display());

        {
            let pool = connect(&url).await.unwrap();
            insert_owner(&pool).await;
            BlogStore::new(pool.clone())
                .create(valid("persisted", 5), "owner")
                .await
                .unwrap();
            pool.close().await;
        }

        let store = BlogStore::new(connect(&url).await.unwrap());
        let blogs = store.list_by_user("owner").await.unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].likes, 5);
    }
}
