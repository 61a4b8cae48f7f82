use axum::{
    Form,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::service::assets::ImageUpload;
use crate::types::forms::RouteForm;

const IMAGE_FIELD: &str = "image";

/// Admin route form: text fields plus the optional `image` file.
///
/// Accepts `multipart/form-data` (the form with a file input) and plain urlencoded bodies.
#[derive(Debug, Clone, Default)]
pub struct RouteSubmission {
    pub form: RouteForm,
    pub image: Option<ImageUpload>,
}

impl<S> FromRequest<S> for RouteSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(form) = Form::<RouteForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self { form, image: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut submission = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                submission.image = Some(ImageUpload { file_name, bytes });
            } else {
                let value = field.text().await.map_err(IntoResponse::into_response)?;
                submission.form.set(&name, value);
            }
        }
        Ok(submission)
    }
}
