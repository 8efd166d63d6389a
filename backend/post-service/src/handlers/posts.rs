/// Post handlers - HTTP endpoints for post mutations and lookup
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::CallerId;
use crate::models::{ApiResponse, Post};
use crate::services::{ImagePayload, PostService};

/// Create a new post from a multipart form: a required `body` text field
/// and an optional `image` file field.
pub async fn create_post(
    service: web::Data<PostService>,
    caller: CallerId,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut body: Option<String> = None;
    let mut image: Option<ImagePayload> = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::Validation(format!("invalid multipart form: {e}")))?;

        match field.name().unwrap_or("") {
            "body" => {
                let mut buf = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk
                        .map_err(|e| AppError::Validation(format!("body read failed: {e}")))?;
                    buf.extend_from_slice(&chunk);
                }
                body = Some(
                    String::from_utf8(buf)
                        .map_err(|_| AppError::Validation("post body must be UTF-8".into()))?,
                );
            }
            "image" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        AppError::Validation("image field is missing a filename".into())
                    })?;

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk
                        .map_err(|e| AppError::Validation(format!("image read failed: {e}")))?;
                    bytes.extend_from_slice(&chunk);
                }
                image = Some(ImagePayload { bytes, filename });
            }
            _ => {
                // Drain and ignore unknown fields.
                while let Some(chunk) = field.next().await {
                    chunk.map_err(|e| AppError::Validation(format!("multipart error: {e}")))?;
                }
            }
        }
    }

    let body = body.ok_or_else(|| AppError::Validation("post body is required".into()))?;

    let post = service.create_post(caller.0, &body, image).await?;

    Ok(HttpResponse::Created().json(ApiResponse::new("post created", PostData { post })))
}

#[derive(Debug, serde::Serialize)]
struct PostData {
    post: Post,
}

/// Typed empty payload for mutations that return nothing.
#[derive(Debug, serde::Serialize)]
struct EmptyData {}

/// Get a single live post by id.
pub async fn get_post(
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.get_post(*post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("success", PostData { post })))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub body: String,
}

/// Update a post's body (owner only).
pub async fn update_post(
    service: web::Data<PostService>,
    caller: CallerId,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    service.update_body(caller.0, *post_id, &req.body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("post updated", EmptyData {})))
}

/// Soft-delete a post (owner only). Terminal.
pub async fn delete_post(
    service: web::Data<PostService>,
    caller: CallerId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_post(caller.0, *post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("post deleted", EmptyData {})))
}
