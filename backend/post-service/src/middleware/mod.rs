/// Request-context utilities for post-service
///
/// Token verification lives upstream (gateway/auth layer); by the time a
/// request reaches this service the caller identity arrives as a trusted
/// `X-User-Id` header. The extractor here surfaces it to handlers.
pub mod permissions;

pub use permissions::check_post_ownership;

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::error::AppError;

/// Trusted caller identity for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub Uuid);

impl FromRequest for CallerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let caller = req
            .headers()
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .map(CallerId)
            .ok_or_else(|| AppError::Unauthorized("missing caller identity".into()));

        ready(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn extracts_caller_from_header() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header(("X-User-Id", id.to_string()))
            .to_http_request();

        let caller = CallerId::extract(&req).await.unwrap();
        assert_eq!(caller, CallerId(id));
    }

    #[actix_web::test]
    async fn rejects_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert!(CallerId::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn rejects_malformed_header() {
        let req = TestRequest::default()
            .insert_header(("X-User-Id", "not-a-uuid"))
            .to_http_request();
        assert!(CallerId::extract(&req).await.is_err());
    }
}
