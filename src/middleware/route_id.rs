use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::ClimbwallError;

/// Numeric `{id}` path segment. Anything that is not an integer is an unknown route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteId(pub i64);

impl<S> FromRequestParts<S> for RouteId
where
    S: Send + Sync,
{
    type Rejection = ClimbwallError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                tracing::debug!(path = %parts.uri.path(), %rejection, "non-numeric route id");
                Err(ClimbwallError::MalformedRouteId(
                    parts.uri.path().rsplit('/').next().unwrap_or_default().to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn show(RouteId(id): RouteId) -> String {
        id.to_string()
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found() {
        let app = Router::new().route("/routes/{id}", get(show));

        let ok = app
            .clone()
            .oneshot(Request::get("/routes/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let bad = app
            .oneshot(Request::get("/routes/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(bad.status(), StatusCode::NOT_FOUND);
    }
}
