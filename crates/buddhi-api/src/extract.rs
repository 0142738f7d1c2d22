//! Question submission extractor.
//!
//! Accepts either `multipart/form-data` (fields `question` and optional
//! `file`) or `application/x-www-form-urlencoded` (field `question`).

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use serde::Deserialize;

use buddhi_core::types::Upload;

use crate::error::ApiError;

/// A question plus the optional file uploaded with it.
#[derive(Debug)]
pub struct QuestionSubmission {
    pub question: String,
    pub upload: Option<Upload>,
}

#[derive(Debug, Deserialize)]
struct QuestionForm {
    question: Option<String>,
}

fn missing_question() -> ApiError {
    ApiError::BadRequest("Missing required field 'question'".to_string())
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

impl<S> FromRequest<S> for QuestionSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let Form(form) = Form::<QuestionForm>::from_request(req, state)
            .await
            .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
        let question = form.question.ok_or_else(missing_question)?;
        Ok(Self {
            question,
            upload: None,
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<QuestionSubmission, ApiError> {
    let mut question = None;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("question") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
                question = Some(text);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
                // Browsers send an empty, unnamed part when no file is chosen.
                if filename.is_some() || !bytes.is_empty() {
                    tracing::debug!(
                        filename = filename.as_deref().unwrap_or("<none>"),
                        size = bytes.len(),
                        "Received upload"
                    );
                    upload = Some(Upload::new(filename, bytes.to_vec()));
                }
            }
            other => {
                tracing::debug!(field = other.unwrap_or("<unnamed>"), "Ignoring form field");
            }
        }
    }

    Ok(QuestionSubmission {
        question: question.ok_or_else(missing_question)?,
        upload,
    })
}
