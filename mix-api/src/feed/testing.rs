//! In-memory `FeedStore` and fake signers for engine tests.

use crate::feed::store::{FeedStore, Result};
use crate::storage::{SignUrlError, UrlSigner};
use mix_common::model::{
    Id,
    group::{Group, GroupMarker},
    post::{LikesPayload, Post, PostMarker},
    user::{User, UserMarker},
};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;
use time::UtcDateTime;

/// Deterministic stand-in for the database: reads iterate in id order,
/// posts sort newest first with insertion order breaking ties, exactly
/// like the store queries the engine expects.
#[derive(Default)]
pub(crate) struct MemoryStore {
    users: BTreeMap<Id<UserMarker>, User>,
    groups: BTreeMap<Id<GroupMarker>, Group>,
    posts: Vec<Post>,
    views: Mutex<HashMap<Id<PostMarker>, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.insert(group.id, group);
    }

    pub fn add_post(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn view_count(&self, post: Id<PostMarker>) -> i64 {
        self.views.lock().unwrap().get(&post).copied().unwrap_or(0)
    }

    fn sorted_posts(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.iter().filter(|post| keep(post)).cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

impl FeedStore for MemoryStore {
    async fn fetch_user(&self, id: Id<UserMarker>) -> Result<Option<User>> {
        Ok(self.users.get(&id).cloned())
    }

    async fn fetch_group(&self, id: Id<GroupMarker>) -> Result<Option<Group>> {
        Ok(self.groups.get(&id).cloned())
    }

    async fn group_posts_since(
        &self,
        group: Id<GroupMarker>,
        since: UtcDateTime,
    ) -> Result<Vec<Post>> {
        Ok(self.sorted_posts(|post| post.group == group && post.created_at >= since))
    }

    async fn latest_group_post(&self, group: Id<GroupMarker>) -> Result<Option<Post>> {
        Ok(self
            .sorted_posts(|post| post.group == group)
            .into_iter()
            .next())
    }

    async fn groups_with_interest(&self, tag: &str) -> Result<Vec<Id<GroupMarker>>> {
        Ok(self
            .groups
            .values()
            .filter(|group| group.has_interest(tag))
            .map(|group| group.id)
            .collect())
    }

    async fn all_posts(&self) -> Result<Vec<Post>> {
        Ok(self.sorted_posts(|_| true))
    }

    async fn posts_by_author(&self, author: Id<UserMarker>) -> Result<Vec<Post>> {
        Ok(self.sorted_posts(|post| post.author == author))
    }

    async fn posts_by_group(&self, group: Id<GroupMarker>) -> Result<Vec<Post>> {
        Ok(self.sorted_posts(|post| post.group == group))
    }

    async fn fetch_usernames(
        &self,
        ids: &[Id<UserMarker>],
    ) -> Result<HashMap<Id<UserMarker>, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|user| (*id, user.username.clone())))
            .collect())
    }

    async fn fetch_group_names(
        &self,
        ids: &[Id<GroupMarker>],
    ) -> Result<HashMap<Id<GroupMarker>, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.groups.get(id).map(|group| (*id, group.name.clone())))
            .collect())
    }

    async fn increment_views(&self, post: Id<PostMarker>) -> Result<()> {
        *self.views.lock().unwrap().entry(post).or_insert(0) += 1;
        Ok(())
    }
}

/// Signer that always succeeds with a recognizable URL.
pub(crate) struct StubSigner;

impl UrlSigner for StubSigner {
    async fn sign(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SignUrlError> {
        Ok(format!(
            "https://signed.test/{bucket}/{key}?expires={}",
            expires_in.as_secs()
        ))
    }
}

/// Signer that always fails, for the upstream-failure path.
pub(crate) struct FailingSigner;

impl UrlSigner for FailingSigner {
    async fn sign(
        &self,
        _bucket: &str,
        key: &str,
        _expires_in: Duration,
    ) -> Result<String, SignUrlError> {
        Err(SignUrlError::new(
            key,
            std::io::Error::other("presigning unavailable"),
        ))
    }
}

pub(crate) fn user(id: u64, username: &str) -> User {
    User {
        id: Id::new(id),
        username: username.to_owned(),
        joined_groups: Vec::new(),
        interests: Vec::new(),
        blocked: Vec::new(),
    }
}

pub(crate) fn group(id: u64, name: &str) -> Group {
    Group {
        id: Id::new(id),
        name: name.to_owned(),
        private: false,
        interests: Vec::new(),
        banned: Vec::new(),
    }
}

pub(crate) fn post(id: u64, author: u64, group: u64, hours_ago: i64) -> Post {
    Post {
        id: Id::new(id),
        media: None,
        created_at: UtcDateTime::now() - time::Duration::hours(hours_ago),
        author: Id::new(author),
        group: Id::new(group),
        caption: format!("post {id}"),
        edited: false,
        comments: None,
        likes: None,
        dislikes: None,
        views: 0,
    }
}

pub(crate) fn likes(count: u64) -> LikesPayload {
    LikesPayload {
        likes: (0..count).map(|n| json!({ "userID": n })).collect(),
    }
}
