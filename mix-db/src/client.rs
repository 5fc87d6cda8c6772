use crate::record::{GroupRecord, NameRecord, PostRecord, UserRecord};
use mix_common::model::{
    Id,
    group::{Group, GroupMarker},
    post::{Post, PostMarker},
    user::{User, UserMarker},
};
use sqlx::{PgPool, postgres::PgPoolOptions, query, query_as, query_scalar};
use std::collections::HashMap;
use thiserror::Error;
use time::{PrimitiveDateTime, UtcDateTime};

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug)]
pub struct DbClient {
    pool: PgPool,
}

fn as_primitive(datetime: UtcDateTime) -> PrimitiveDateTime {
    PrimitiveDateTime::new(datetime.date(), datetime.time())
}

fn as_db_ids<Marker>(ids: &[Id<Marker>]) -> Vec<i64> {
    ids.iter().map(|id| id.get().cast_signed()).collect()
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects eagerly so a bad database configuration fails at startup
    /// rather than on the first request.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect(url).await?;
        Ok(Self::new(pool))
    }

    pub async fn fetch_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>> {
        let record = query_as::<_, UserRecord>(
            "
            SELECT user_id, username, joined_groups, interests, blocked
            FROM users
            WHERE user_id = $1
            ",
        )
        .bind(user_id.get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    pub async fn fetch_group(&self, group_id: Id<GroupMarker>) -> Result<Option<Group>> {
        let record = query_as::<_, GroupRecord>(
            "
            SELECT group_id, group_name, private, interests, banned
            FROM groups
            WHERE group_id = $1
            ",
        )
        .bind(group_id.get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Group::from))
    }

    pub async fn user_exists(&self, user_id: Id<UserMarker>) -> Result<bool> {
        let exists = query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
            .bind(user_id.get().cast_signed())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn group_exists(&self, group_id: Id<GroupMarker>) -> Result<bool> {
        let exists =
            query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM groups WHERE group_id = $1)")
                .bind(group_id.get().cast_signed())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Posts in one group no older than `since`, newest first.
    pub async fn group_posts_since(
        &self,
        group_id: Id<GroupMarker>,
        since: UtcDateTime,
    ) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT post_id, media_url, created_at, poster_id, group_id,
                   caption, edited, comments, likes, dislikes, views
            FROM posts
            WHERE group_id = $1 AND created_at >= $2
            ORDER BY created_at DESC
            ",
        )
        .bind(group_id.get().cast_signed())
        .bind(as_primitive(since))
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Post::from).collect())
    }

    pub async fn latest_group_post(&self, group_id: Id<GroupMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            SELECT post_id, media_url, created_at, poster_id, group_id,
                   caption, edited, comments, likes, dislikes, views
            FROM posts
            WHERE group_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(group_id.get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Post::from))
    }

    /// Groups whose declared interest set contains `tag`.
    pub async fn groups_with_interest(&self, tag: &str) -> Result<Vec<Id<GroupMarker>>> {
        let ids = query_scalar::<_, i64>(
            "SELECT group_id FROM groups WHERE jsonb_exists(interests -> 'interests', $1)",
        )
        .bind(tag)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|id| id.cast_unsigned().into()).collect())
    }

    /// Every post in the system, newest first. The global catch-all
    /// source; ranking happens in the feed engine.
    pub async fn all_posts(&self) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT post_id, media_url, created_at, poster_id, group_id,
                   caption, edited, comments, likes, dislikes, views
            FROM posts
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Post::from).collect())
    }

    pub async fn posts_by_author(&self, author: Id<UserMarker>) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT post_id, media_url, created_at, poster_id, group_id,
                   caption, edited, comments, likes, dislikes, views
            FROM posts
            WHERE poster_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(author.get().cast_signed())
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Post::from).collect())
    }

    pub async fn posts_by_group(&self, group_id: Id<GroupMarker>) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT post_id, media_url, created_at, poster_id, group_id,
                   caption, edited, comments, likes, dislikes, views
            FROM posts
            WHERE group_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(group_id.get().cast_signed())
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Post::from).collect())
    }

    /// Batched display-name lookup for the page renderer.
    pub async fn fetch_usernames(
        &self,
        ids: &[Id<UserMarker>],
    ) -> Result<HashMap<Id<UserMarker>, String>> {
        let records = query_as::<_, NameRecord>(
            "SELECT user_id AS id, username AS name FROM users WHERE user_id = ANY($1)",
        )
        .bind(as_db_ids(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|record| (record.id.cast_unsigned().into(), record.name))
            .collect())
    }

    pub async fn fetch_group_names(
        &self,
        ids: &[Id<GroupMarker>],
    ) -> Result<HashMap<Id<GroupMarker>, String>> {
        let records = query_as::<_, NameRecord>(
            "SELECT group_id AS id, group_name AS name FROM groups WHERE group_id = ANY($1)",
        )
        .bind(as_db_ids(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|record| (record.id.cast_unsigned().into(), record.name))
            .collect())
    }

    /// Fire-and-forget view bump; committed independently of the rest of
    /// the request, never rolled back.
    pub async fn increment_views(&self, post_id: Id<PostMarker>) -> Result<()> {
        query("UPDATE posts SET views = views + 1 WHERE post_id = $1")
            .bind(post_id.get().cast_signed())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
