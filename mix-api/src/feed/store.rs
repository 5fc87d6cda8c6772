use mix_common::model::{
    Id,
    group::{Group, GroupMarker},
    post::{Post, PostMarker},
    user::{User, UserMarker},
};
use mix_db::client::{DbClient, DbError};
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;
use time::UtcDateTime;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
}

/// The datastore reads and the single view-count write the feed engine
/// needs. `DbClient` is the production implementation; tests run the
/// engine against an in-memory store. Every call commits independently;
/// there is no transaction spanning collection and rendering.
pub trait FeedStore {
    fn fetch_user(
        &self,
        id: Id<UserMarker>,
    ) -> impl Future<Output = Result<Option<User>>> + Send;

    fn fetch_group(
        &self,
        id: Id<GroupMarker>,
    ) -> impl Future<Output = Result<Option<Group>>> + Send;

    /// Posts in one group no older than `since`, newest first.
    fn group_posts_since(
        &self,
        group: Id<GroupMarker>,
        since: UtcDateTime,
    ) -> impl Future<Output = Result<Vec<Post>>> + Send;

    fn latest_group_post(
        &self,
        group: Id<GroupMarker>,
    ) -> impl Future<Output = Result<Option<Post>>> + Send;

    fn groups_with_interest(
        &self,
        tag: &str,
    ) -> impl Future<Output = Result<Vec<Id<GroupMarker>>>> + Send;

    /// Every post in the system, newest first.
    fn all_posts(&self) -> impl Future<Output = Result<Vec<Post>>> + Send;

    fn posts_by_author(
        &self,
        author: Id<UserMarker>,
    ) -> impl Future<Output = Result<Vec<Post>>> + Send;

    fn posts_by_group(
        &self,
        group: Id<GroupMarker>,
    ) -> impl Future<Output = Result<Vec<Post>>> + Send;

    fn fetch_usernames(
        &self,
        ids: &[Id<UserMarker>],
    ) -> impl Future<Output = Result<HashMap<Id<UserMarker>, String>>> + Send;

    fn fetch_group_names(
        &self,
        ids: &[Id<GroupMarker>],
    ) -> impl Future<Output = Result<HashMap<Id<GroupMarker>, String>>> + Send;

    /// Bumps a post's view counter by one. Never rolled back.
    fn increment_views(&self, post: Id<PostMarker>) -> impl Future<Output = Result<()>> + Send;
}

impl FeedStore for DbClient {
    async fn fetch_user(&self, id: Id<UserMarker>) -> Result<Option<User>> {
        Ok(DbClient::fetch_user(self, id).await?)
    }

    async fn fetch_group(&self, id: Id<GroupMarker>) -> Result<Option<Group>> {
        Ok(DbClient::fetch_group(self, id).await?)
    }

    async fn group_posts_since(
        &self,
        group: Id<GroupMarker>,
        since: UtcDateTime,
    ) -> Result<Vec<Post>> {
        Ok(DbClient::group_posts_since(self, group, since).await?)
    }

    async fn latest_group_post(&self, group: Id<GroupMarker>) -> Result<Option<Post>> {
        Ok(DbClient::latest_group_post(self, group).await?)
    }

    async fn groups_with_interest(&self, tag: &str) -> Result<Vec<Id<GroupMarker>>> {
        Ok(DbClient::groups_with_interest(self, tag).await?)
    }

    async fn all_posts(&self) -> Result<Vec<Post>> {
        Ok(DbClient::all_posts(self).await?)
    }

    async fn posts_by_author(&self, author: Id<UserMarker>) -> Result<Vec<Post>> {
        Ok(DbClient::posts_by_author(self, author).await?)
    }

    async fn posts_by_group(&self, group: Id<GroupMarker>) -> Result<Vec<Post>> {
        Ok(DbClient::posts_by_group(self, group).await?)
    }

    async fn fetch_usernames(
        &self,
        ids: &[Id<UserMarker>],
    ) -> Result<HashMap<Id<UserMarker>, String>> {
        Ok(DbClient::fetch_usernames(self, ids).await?)
    }

    async fn fetch_group_names(
        &self,
        ids: &[Id<GroupMarker>],
    ) -> Result<HashMap<Id<GroupMarker>, String>> {
        Ok(DbClient::fetch_group_names(self, ids).await?)
    }

    async fn increment_views(&self, post: Id<PostMarker>) -> Result<()> {
        Ok(DbClient::increment_views(self, post).await?)
    }
}
