//! Page selection, view counting, and output shaping.

use crate::feed::store::FeedStore;
use crate::feed::{FeedError, visibility};
use crate::storage::{SIGNED_URL_TTL, StorageRef, UrlSigner};
use mix_common::model::feed::{CommentView, FeedPage, PostView};
use mix_common::model::post::Post;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub(crate) const PAGE_SIZE: usize = 10;

/// Renders one page of an already ranked sequence.
///
/// The page number is zero-indexed here; `num_pages` in the output is the
/// 1-indexed count. A page at or past `num_pages` is out of range, so the
/// last page always succeeds and the first page past it always fails.
/// View counters are bumped for every post in the slice before any
/// exclusion or failure, and are never reverted.
pub(crate) async fn render_page<S: FeedStore, G: UrlSigner>(
    store: &S,
    signer: &G,
    ranked: Vec<Post>,
    page: u32,
) -> Result<FeedPage, FeedError> {
    let total = ranked.len();
    let num_pages = u32::try_from(total.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX);
    if page >= num_pages {
        return Err(FeedError::NoResults);
    }

    let start = page as usize * PAGE_SIZE;
    let slice = &ranked[start..total.min(start + PAGE_SIZE)];

    let mut author_ids: Vec<_> = slice.iter().map(|post| post.author).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let mut group_ids: Vec<_> = slice.iter().map(|post| post.group).collect();
    group_ids.sort_unstable();
    group_ids.dedup();

    let usernames = store.fetch_usernames(&author_ids).await?;
    let group_names = store.fetch_group_names(&group_ids).await?;

    let mut posts = Vec::with_capacity(slice.len());
    for post in slice {
        store.increment_views(post.id).await?;

        if !visibility::passes_ban_gate(store, post).await? {
            continue;
        }

        let s3_url = resolve_media(signer, post.media.as_deref()).await?;
        posts.push(shape_post(
            post,
            s3_url,
            usernames.get(&post.author).cloned(),
            group_names.get(&post.group).cloned(),
        )?);
    }

    if posts.is_empty() {
        return Err(FeedError::NoResults);
    }

    Ok(FeedPage { num_pages, posts })
}

async fn resolve_media<G: UrlSigner>(
    signer: &G,
    media: Option<&str>,
) -> Result<Option<String>, FeedError> {
    match StorageRef::classify(media) {
        StorageRef::Absent => Ok(None),
        StorageRef::Direct(url) => Ok(Some(url)),
        StorageRef::Object { bucket, key } => {
            Ok(Some(signer.sign(&bucket, &key, SIGNED_URL_TTL).await?))
        }
    }
}

fn shape_post(
    post: &Post,
    s3_url: Option<String>,
    username: Option<String>,
    group_name: Option<String>,
) -> Result<PostView, FeedError> {
    let timestamp = OffsetDateTime::from(post.created_at).format(&Rfc3339)?;

    // An empty comment list shapes to null, like a missing payload.
    let comments = post.comments.as_ref().and_then(|payload| {
        (!payload.comments.is_empty()).then(|| {
            payload
                .comments
                .iter()
                .cloned()
                .map(CommentView::from)
                .collect()
        })
    });

    Ok(PostView {
        id: post.id,
        s3_url,
        timestamp,
        poster_id: post.author,
        username,
        group_id: post.group,
        group_name,
        caption: post.caption.clone(),
        edited: post.edited,
        comments,
        dislikes: post.dislikes.as_ref().map(|payload| payload.dislikes.clone()),
        views: post.views,
        likes: post.likes.as_ref().map(|payload| payload.likes.clone()),
    })
}
