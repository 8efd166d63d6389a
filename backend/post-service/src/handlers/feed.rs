/// Feed handlers - cursor-paginated listings
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ApiResponse, PostPage};
use crate::services::FeedReader;

/// Cursor and limit arrive as free-form strings; anything unusable falls
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQueryParams {
    pub cursor: Option<String>,
    pub limit: Option<String>,
}

impl FeedQueryParams {
    fn cursor(&self) -> Option<i64> {
        self.cursor.as_deref().and_then(|c| c.parse().ok())
    }

    fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|l| l.parse().ok())
    }
}

/// Global feed, newest first.
pub async fn list_posts(
    feed: web::Data<FeedReader>,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse> {
    let page = feed.page(query.cursor(), query.limit()).await?;
    Ok(page_response(page))
}

/// One owner's feed, newest first.
pub async fn list_posts_by_owner(
    feed: web::Data<FeedReader>,
    owner_id: web::Path<Uuid>,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse> {
    let page = feed
        .page_for_owner(*owner_id, query.cursor(), query.limit())
        .await?;
    Ok(page_response(page))
}

fn page_response(page: PostPage) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new("success", page))
}
