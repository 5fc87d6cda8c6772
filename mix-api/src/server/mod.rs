use crate::feed::FeedError;
use crate::storage::S3UrlSigner;
use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use json::Json;
use mix_db::client::DbClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

mod feed;
mod json;
mod posts;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db: Arc<DbClient>,
    pub signer: Arc<S3UrlSigner>,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Bad request: incorrect parameters: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Bad request: incorrect parameters: {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("Bad request: page must be a positive integer")]
    NonPositivePage,
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// 1-indexed page number taken from the query string.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
pub(crate) struct PageQuery {
    page: u32,
}

impl PageQuery {
    /// The engine counts pages from zero; page numbers below one are
    /// rejected at the boundary.
    pub(crate) fn zero_indexed(self) -> Result<u32> {
        self.page.checked_sub(1).ok_or(ServerError::NonPositivePage)
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_) => StatusCode::NOT_FOUND,
            ServerError::PathRejection(_)
            | ServerError::QueryRejection(_)
            | ServerError::NonPositivePage
            | ServerError::JsonRejection(_) => StatusCode::BAD_REQUEST,
            ServerError::JsonResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Feed(err) => match err {
                FeedError::ViewerNotFound(_) => StatusCode::NOT_FOUND,
                FeedError::NoResults => StatusCode::BAD_REQUEST,
                FeedError::Sign(_) => StatusCode::FORBIDDEN,
                FeedError::Store(_) | FeedError::Timestamp(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(error_response)).into_response()
    }
}
