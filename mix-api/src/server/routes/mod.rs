use crate::server::{ServerRouter, feed, posts};
use axum::Router;

pub fn routes() -> ServerRouter {
    Router::new().merge(feed::routes()).merge(posts::routes())
}
