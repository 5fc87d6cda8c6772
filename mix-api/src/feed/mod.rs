//! Feed assembly: candidate collection, merging, and page rendering.
//!
//! The personal feed blends three sources in fixed priority order:
//! posts from the viewer's joined groups, the newest post of each
//! public group matching the viewer's interests, and a global catch-all
//! ranked by engagement. Source priority is authoritative over score;
//! there is no re-sort after merging.

pub(crate) mod collect;
pub(crate) mod page;
pub(crate) mod store;
pub(crate) mod visibility;

#[cfg(test)]
mod testing;

use crate::storage::{SignUrlError, UrlSigner};
use mix_common::model::{
    Id,
    feed::FeedPage,
    group::GroupMarker,
    post::{Post, PostMarker},
    user::{User, UserMarker},
};
use std::collections::HashSet;
use store::{FeedStore, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Could not find user with id {0}")]
    ViewerNotFound(Id<UserMarker>),
    #[error("There are no posts on this page. Please try a lower page number")]
    NoResults,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Unable to make a signed storage URL: {0}")]
    Sign(#[from] SignUrlError),
    #[error("Failed to format post timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Target of the restricted listing: all posts by one author, or all
/// posts in one group. Only the ban gate applies on this path.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ListingTarget {
    User(Id<UserMarker>),
    Group(Id<GroupMarker>),
}

/// Assembles and renders one page of the viewer's personalized feed.
/// `page` is zero-indexed.
pub async fn personal_feed<S: FeedStore, G: UrlSigner>(
    store: &S,
    signer: &G,
    viewer_id: Id<UserMarker>,
    page: u32,
) -> Result<FeedPage, FeedError> {
    let viewer = store
        .fetch_user(viewer_id)
        .await?
        .ok_or(FeedError::ViewerNotFound(viewer_id))?;

    let ranked = assemble(store, &viewer).await?;
    page::render_page(store, signer, ranked, page).await
}

/// Renders one page of all posts by a single author or group, newest
/// first. Blocking and privacy checks are intentionally not applied.
pub async fn target_listing<S: FeedStore, G: UrlSigner>(
    store: &S,
    signer: &G,
    target: ListingTarget,
    page: u32,
) -> Result<FeedPage, FeedError> {
    let posts = match target {
        ListingTarget::User(author) => store.posts_by_author(author).await?,
        ListingTarget::Group(group) => store.posts_by_group(group).await?,
    };

    page::render_page(store, signer, posts, page).await
}

/// The single-pass merge: accumulate joined-group posts, append the
/// interest picks, then fill from the score-ranked global source,
/// testing membership against everything accumulated so far.
async fn assemble<S: FeedStore>(store: &S, viewer: &User) -> Result<Vec<Post>, StoreError> {
    let mut feed = collect::joined_group_posts(store, viewer).await?;
    let mut seen: HashSet<Id<PostMarker>> = feed.iter().map(|post| post.id).collect();

    let recommended = collect::interest_posts(store, viewer, &seen).await?;
    seen.extend(recommended.iter().map(|post| post.id));
    feed.extend(recommended);

    for post in collect::ranked_global_posts(store).await? {
        if seen.contains(&post.id) {
            continue;
        }
        if !visibility::is_visible(store, viewer, &post).await? {
            continue;
        }
        seen.insert(post.id);
        feed.push(post);
    }

    Ok(feed)
}
