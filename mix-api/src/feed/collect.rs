//! The three candidate sources of the personal feed.

use crate::feed::store::{FeedStore, Result};
use crate::feed::visibility;
use mix_common::model::{Id, post::{Post, PostMarker}, user::User};
use std::collections::HashSet;
use time::{Duration, UtcDateTime};

/// Recency window for the joined-group source.
pub(crate) const JOINED_WINDOW: Duration = Duration::days(3);

/// Posts from every group the viewer has joined, within the recency
/// window, newest first. The privacy check is implicitly satisfied by
/// membership; the rest of the gate applies.
pub(crate) async fn joined_group_posts<S: FeedStore>(
    store: &S,
    viewer: &User,
) -> Result<Vec<Post>> {
    let since = UtcDateTime::now() - JOINED_WINDOW;

    let mut posts = Vec::new();
    for &group_id in &viewer.joined_groups {
        for post in store.group_posts_since(group_id, since).await? {
            if visibility::is_visible(store, viewer, &post).await? {
                posts.push(post);
            }
        }
    }

    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(posts)
}

/// The single most recent post of each public group matching one of the
/// viewer's interests, newest first. Candidates already picked by the
/// joined-group pass (or by an earlier interest) are skipped.
pub(crate) async fn interest_posts<S: FeedStore>(
    store: &S,
    viewer: &User,
    already_selected: &HashSet<Id<PostMarker>>,
) -> Result<Vec<Post>> {
    let mut picked_ids = HashSet::new();
    let mut picked = Vec::new();

    for interest in &viewer.interests {
        for group_id in store.groups_with_interest(interest).await? {
            let Some(post) = store.latest_group_post(group_id).await? else {
                continue;
            };
            if already_selected.contains(&post.id) || picked_ids.contains(&post.id) {
                continue;
            }
            if !visibility::is_visible_public_only(store, viewer, &post).await? {
                continue;
            }

            picked_ids.insert(post.id);
            picked.push(post);
        }
    }

    picked.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(picked)
}

/// The global catch-all, ranked by engagement score, highest first. The
/// sort is stable, so equally scored posts keep the store's newest-first
/// order.
pub(crate) async fn ranked_global_posts<S: FeedStore>(store: &S) -> Result<Vec<Post>> {
    let mut posts = store.all_posts().await?;
    posts.sort_by(|a, b| b.engagement_score().total_cmp(&a.engagement_score()));
    Ok(posts)
}
