use crate::model::Id;
use crate::model::group::GroupMarker;
use crate::model::user::UserMarker;
use serde::{Deserialize, Serialize};
use time::UtcDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A stored post. Everything except the view counter is read-only to
/// the feed engine; the counter is bumped once per rendered post.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Post {
    pub id: Id<PostMarker>,
    /// Storage reference: an `s3://` object path, a direct URL, or absent.
    pub media: Option<String>,
    pub created_at: UtcDateTime,
    pub author: Id<UserMarker>,
    pub group: Id<GroupMarker>,
    pub caption: String,
    pub edited: bool,
    pub comments: Option<CommentsPayload>,
    pub likes: Option<LikesPayload>,
    pub dislikes: Option<DislikesPayload>,
    pub views: i64,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct CommentsPayload {
    pub comments: Vec<Comment>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Comment {
    pub text: String,
    pub username: String,
}

/// Like entries reference a user plus whatever metadata the writer
/// attached; entries pass through to the output verbatim, so they are
/// kept as raw JSON values here.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct LikesPayload {
    pub likes: Vec<serde_json::Value>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct DislikesPayload {
    pub dislikes: Vec<serde_json::Value>,
}

impl Post {
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.likes.as_ref().map_or(0, |payload| payload.likes.len())
    }

    #[must_use]
    pub fn dislike_count(&self) -> usize {
        self.dislikes
            .as_ref()
            .map_or(0, |payload| payload.dislikes.len())
    }

    /// Engagement score used to rank the global catch-all source: the
    /// like count when there are no dislikes, otherwise the ratio.
    /// Absent payloads count as zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn engagement_score(&self) -> f64 {
        let likes = self.like_count() as f64;
        match self.dislike_count() {
            0 => likes,
            dislikes => likes / dislikes as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::utc_datetime;

    fn post_with_votes(likes: Option<usize>, dislikes: Option<usize>) -> Post {
        let entry = |id: usize| json!({ "userID": id as u64 });
        Post {
            id: Id::new(1),
            media: None,
            created_at: utc_datetime!(2025-06-01 12:00),
            author: Id::new(2),
            group: Id::new(3),
            caption: String::new(),
            edited: false,
            comments: None,
            likes: likes.map(|n| LikesPayload {
                likes: (0..n).map(entry).collect(),
            }),
            dislikes: dislikes.map(|n| DislikesPayload {
                dislikes: (0..n).map(entry).collect(),
            }),
            views: 0,
        }
    }

    #[test]
    fn score_is_like_count_without_dislikes() {
        assert_eq!(post_with_votes(Some(5), None).engagement_score(), 5.0);
        assert_eq!(post_with_votes(Some(5), Some(0)).engagement_score(), 5.0);
    }

    #[test]
    fn score_is_ratio_with_dislikes() {
        assert_eq!(post_with_votes(Some(6), Some(4)).engagement_score(), 1.5);
        assert_eq!(post_with_votes(Some(1), Some(2)).engagement_score(), 0.5);
    }

    #[test]
    fn absent_payloads_score_zero() {
        assert_eq!(post_with_votes(None, None).engagement_score(), 0.0);
        assert_eq!(post_with_votes(None, Some(3)).engagement_score(), 0.0);
    }

    #[test]
    fn comments_payload_round_trips_stored_shape() {
        let payload: CommentsPayload = serde_json::from_value(json!({
            "comments": [{ "text": "nice", "username": "ana" }]
        }))
        .unwrap();
        assert_eq!(payload.comments.len(), 1);
        assert_eq!(payload.comments[0].text, "nice");
        assert_eq!(payload.comments[0].username, "ana");
    }
}
