//! The per-post visibility gate.
//!
//! Collection vets posts with these checks, and rendering re-applies the
//! existence and ban checks: the view is not transactionally consistent
//! with collection, so the gap between check and use is tolerated rather
//! than eliminated.

use crate::feed::store::{FeedStore, Result};
use mix_common::model::{group::Group, post::Post, user::User};

/// Existence, ban, and mutual non-block checks, cheapest first. Returns
/// the resolved group on pass so callers can apply their privacy rule.
async fn clear_group<S: FeedStore>(
    store: &S,
    viewer: &User,
    post: &Post,
) -> Result<Option<Group>> {
    let Some(group) = store.fetch_group(post.group).await? else {
        return Ok(None);
    };
    if group.has_banned(post.author) {
        return Ok(None);
    }
    let Some(author) = store.fetch_user(post.author).await? else {
        return Ok(None);
    };
    if viewer.blocks(author.id) || author.blocks(viewer.id) {
        return Ok(None);
    }

    Ok(Some(group))
}

/// The full gate: existence, ban, mutual non-block, and privacy. The
/// privacy check is waived for groups the viewer has joined.
pub(crate) async fn is_visible<S: FeedStore>(
    store: &S,
    viewer: &User,
    post: &Post,
) -> Result<bool> {
    match clear_group(store, viewer, post).await? {
        Some(group) => Ok(viewer.is_member_of(group.id) || !group.private),
        None => Ok(false),
    }
}

/// Gate variant for the interest-matched source: private groups are
/// excluded outright, membership notwithstanding.
pub(crate) async fn is_visible_public_only<S: FeedStore>(
    store: &S,
    viewer: &User,
    post: &Post,
) -> Result<bool> {
    match clear_group(store, viewer, post).await? {
        Some(group) => Ok(!group.private),
        None => Ok(false),
    }
}

/// The ban gate alone: the post's group must still resolve and must not
/// have banned the author. Used by the render-time re-check and by the
/// restricted listing, which intentionally skips the viewer-centric
/// checks.
pub(crate) async fn passes_ban_gate<S: FeedStore>(store: &S, post: &Post) -> Result<bool> {
    let Some(group) = store.fetch_group(post.group).await? else {
        return Ok(false);
    };

    Ok(!group.has_banned(post.author))
}
