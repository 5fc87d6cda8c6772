use mix_common::model::{
    Id,
    group::{BanEntry, Group, GroupMarker},
    post::{CommentsPayload, DislikesPayload, LikesPayload, Post},
    user::{User, UserMarker},
};
use serde::Deserialize;
use sqlx::types::Json;
use time::PrimitiveDateTime;

#[derive(Clone, Eq, PartialEq, Debug, sqlx::FromRow)]
pub(crate) struct UserRecord {
    pub user_id: i64,
    pub username: String,
    pub joined_groups: Option<Json<JoinedGroupsPayload>>,
    pub interests: Option<Json<InterestsPayload>>,
    pub blocked: Option<Json<Vec<Id<UserMarker>>>>,
}

#[derive(Clone, Eq, PartialEq, Debug, sqlx::FromRow)]
pub(crate) struct GroupRecord {
    pub group_id: i64,
    pub group_name: String,
    pub private: bool,
    pub interests: Option<Json<InterestsPayload>>,
    pub banned: Option<Json<BannedPayload>>,
}

#[derive(Clone, Eq, PartialEq, Debug, sqlx::FromRow)]
pub(crate) struct PostRecord {
    pub post_id: i64,
    pub media_url: Option<String>,
    pub created_at: PrimitiveDateTime,
    pub poster_id: i64,
    pub group_id: i64,
    pub caption: String,
    pub edited: bool,
    pub comments: Option<Json<CommentsPayload>>,
    pub likes: Option<Json<LikesPayload>>,
    pub dislikes: Option<Json<DislikesPayload>>,
    pub views: i64,
}

#[derive(Clone, Eq, PartialEq, Debug, sqlx::FromRow)]
pub(crate) struct NameRecord {
    pub id: i64,
    pub name: String,
}

// The set-valued columns keep the wrapper-object shape the writers
// store, e.g. {"groups": [...]}. A NULL column means the empty set.

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
pub(crate) struct JoinedGroupsPayload {
    pub groups: Vec<Id<GroupMarker>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
pub(crate) struct InterestsPayload {
    pub interests: Vec<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
pub(crate) struct BannedPayload {
    pub banned: Vec<BanEntry>,
}

impl From<UserRecord> for User {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.user_id.cast_unsigned().into(),
            username: value.username,
            joined_groups: value
                .joined_groups
                .map(|payload| payload.0.groups)
                .unwrap_or_default(),
            interests: value
                .interests
                .map(|payload| payload.0.interests)
                .unwrap_or_default(),
            blocked: value.blocked.map(|list| list.0).unwrap_or_default(),
        }
    }
}

impl From<GroupRecord> for Group {
    fn from(value: GroupRecord) -> Self {
        Self {
            id: value.group_id.cast_unsigned().into(),
            name: value.group_name,
            private: value.private,
            interests: value
                .interests
                .map(|payload| payload.0.interests)
                .unwrap_or_default(),
            banned: value.banned.map(|payload| payload.0.banned).unwrap_or_default(),
        }
    }
}

impl From<PostRecord> for Post {
    fn from(value: PostRecord) -> Self {
        Self {
            id: value.post_id.cast_unsigned().into(),
            media: value.media_url,
            created_at: value.created_at.as_utc(),
            author: value.poster_id.cast_unsigned().into(),
            group: value.group_id.cast_unsigned().into(),
            caption: value.caption,
            edited: value.edited,
            comments: value.comments.map(|payload| payload.0),
            likes: value.likes.map(|payload| payload.0),
            dislikes: value.dislikes.map(|payload| payload.0),
            views: value.views,
        }
    }
}
