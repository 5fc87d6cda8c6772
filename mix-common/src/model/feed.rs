use crate::model::Id;
use crate::model::group::GroupMarker;
use crate::model::post::{Comment, PostMarker};
use crate::model::user::UserMarker;
use serde::Serialize;

/// One page of a rendered feed, as sent to clients.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct FeedPage {
    #[serde(rename = "numPages")]
    pub num_pages: u32,
    pub posts: Vec<PostView>,
}

/// The shaped output record for one post. Field names follow the
/// established client wire contract, so they stay camel/legacy-cased
/// rather than following Rust naming.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct PostView {
    #[serde(rename = "ID")]
    pub id: Id<PostMarker>,
    /// Resolved access link: a signed URL, a direct URL passed through,
    /// or null when the post has no media.
    pub s3_url: Option<String>,
    /// Creation time, RFC 3339.
    pub timestamp: String,
    #[serde(rename = "posterID")]
    pub poster_id: Id<UserMarker>,
    /// Author display name; null when the user record has no name.
    pub username: Option<String>,
    #[serde(rename = "groupID")]
    pub group_id: Id<GroupMarker>,
    #[serde(rename = "groupName")]
    pub group_name: Option<String>,
    pub caption: String,
    pub edited: bool,
    /// Null when the post has no comments, else text and author name
    /// per comment. No other comment metadata is surfaced.
    pub comments: Option<Vec<CommentView>>,
    /// Null when absent, else the stored dislike entries verbatim.
    pub dislikes: Option<Vec<serde_json::Value>>,
    pub views: i64,
    /// Null when absent, else the stored like entries. The stored likes
    /// payload is `{"likes": [...]}`; merging its fields into this record
    /// is exactly this one key.
    pub likes: Option<Vec<serde_json::Value>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct CommentView {
    pub text: String,
    pub username: String,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            text: comment.text,
            username: comment.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_payloads_serialize_as_null_fields() {
        let view = PostView {
            id: Id::new(10),
            s3_url: None,
            timestamp: "2025-06-01T12:00:00Z".to_owned(),
            poster_id: Id::new(2),
            username: None,
            group_id: Id::new(3),
            group_name: Some("gardening".to_owned()),
            caption: "hello".to_owned(),
            edited: false,
            comments: None,
            dislikes: None,
            views: 4,
            likes: None,
        };

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["ID"], json!(10));
        assert_eq!(value["s3_url"], json!(null));
        assert_eq!(value["username"], json!(null));
        assert_eq!(value["comments"], json!(null));
        assert_eq!(value["dislikes"], json!(null));
        assert_eq!(value["likes"], json!(null));
        assert_eq!(value["groupName"], json!("gardening"));
    }

    #[test]
    fn present_likes_surface_as_top_level_list() {
        let view = PostView {
            id: Id::new(10),
            s3_url: Some("https://example.com/a.jpg".to_owned()),
            timestamp: "2025-06-01T12:00:00Z".to_owned(),
            poster_id: Id::new(2),
            username: Some("ana".to_owned()),
            group_id: Id::new(3),
            group_name: None,
            caption: String::new(),
            edited: true,
            comments: Some(vec![CommentView {
                text: "nice".to_owned(),
                username: "bo".to_owned(),
            }]),
            dislikes: Some(vec![json!({ "userID": 9 })]),
            views: 0,
            likes: Some(vec![json!({ "userID": 4 })]),
        };

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["likes"], json!([{ "userID": 4 }]));
        assert_eq!(value["dislikes"], json!([{ "userID": 9 }]));
        assert_eq!(value["comments"], json!([{ "text": "nice", "username": "bo" }]));
    }
}
