//! Caller Identity
//!
//! Authentication happens upstream. The identity provider in front of the
//! API forwards the signed-in user as two headers:
//!
//! - `x-user-id`: provider user id
//! - `x-user-email`: the user's email
//!
//! Handlers that act on behalf of a user take a [`CurrentUser`]; a request
//! without both headers is rejected with `401`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::error::ApiError;
use crate::widgets::chat::UserIdentity;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Extractor for the signed-in user
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", name)))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let uid = header(parts, USER_ID_HEADER)?;
        let email = header(parts, USER_EMAIL_HEADER)?;
        Ok(CurrentUser(UserIdentity::new(uid, email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<CurrentUser, ApiError> {
        let (mut parts, _) = request.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_headers_present() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user1")
            .header(USER_EMAIL_HEADER, "john@example.com")
            .body(())
            .unwrap();

        let CurrentUser(user) = extract(request).await.unwrap();
        assert_eq!(user.uid, "user1");
        assert_eq!(user.email, "john@example.com");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user1")
            .body(())
            .unwrap();

        assert!(matches!(
            extract(request).await,
            Err(ApiError::Unauthorized(_))
        ));
    }
}
