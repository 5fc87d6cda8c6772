use crate::feed;
use crate::server::json::Json;
use crate::server::{PageQuery, Result, ServerError, ServerRouter};
use crate::storage::S3UrlSigner;
use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
};
use axum_extra::routing::{RouterExt, TypedPath};
use mix_common::model::{Id, feed::FeedPage, user::UserMarker};
use mix_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    Router::new().typed_get(get_feed)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/feed/{viewer_id}", rejection(ServerError))]
struct FeedPath {
    viewer_id: Id<UserMarker>,
}

async fn get_feed(
    FeedPath { viewer_id }: FeedPath,
    query: Result<Query<PageQuery>, QueryRejection>,
    State(db): State<Arc<DbClient>>,
    State(signer): State<Arc<S3UrlSigner>>,
) -> Result<Json<FeedPage>> {
    let Query(query) = query?;
    let page = query.zero_indexed()?;

    let feed = feed::personal_feed(&*db, &*signer, viewer_id, page).await?;

    Ok(Json(feed))
}
