use crate::feed::{self, ListingTarget};
use crate::server::json::Json;
use crate::server::{PageQuery, Result, ServerError, ServerRouter};
use crate::storage::S3UrlSigner;
use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
};
use axum_extra::routing::{RouterExt, TypedPath};
use mix_common::model::{Id, feed::FeedPage};
use mix_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    Router::new().typed_get(get_target_posts)
}

/// Which id the restricted listing is keyed by. Anything other than
/// `user` or `group` in the path is a bad request.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TargetKind {
    User,
    Group,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::User => f.write_str("user"),
            TargetKind::Group => f.write_str("group"),
        }
    }
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{kind}/{id}", rejection(ServerError))]
struct ListingPath {
    kind: TargetKind,
    id: u64,
}

async fn get_target_posts(
    ListingPath { kind, id }: ListingPath,
    query: Result<Query<PageQuery>, QueryRejection>,
    State(db): State<Arc<DbClient>>,
    State(signer): State<Arc<S3UrlSigner>>,
) -> Result<Json<FeedPage>> {
    let Query(query) = query?;
    let page = query.zero_indexed()?;

    let target = match kind {
        TargetKind::User => ListingTarget::User(Id::new(id)),
        TargetKind::Group => ListingTarget::Group(Id::new(id)),
    };
    let listing = feed::target_listing(&*db, &*signer, target, page).await?;

    Ok(Json(listing))
}
