use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use crate::api::error::ApiError;

const URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// Form fields taken from the query string and from a url-encoded or
/// multipart body. Body values win over query values; file parts are skipped.
///
/// Unlike `axum::Form`, this reads a body on GET and a query on DELETE,
/// so clients may send the fields either way on every route.
#[derive(Debug, Clone)]
pub struct FormParams<T>(pub T);

enum FormBody {
    UrlEncoded,
    Multipart,
    Ignored,
}

impl FormBody {
    fn of(req: &Request) -> Self {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with(URLENCODED) {
            Self::UrlEncoded
        } else if content_type.starts_with(MULTIPART) {
            Self::Multipart
        } else {
            Self::Ignored
        }
    }
}

impl<T, S> FromRequest<S> for FormParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        fields.extend(parse_pairs(req.uri().query().unwrap_or_default().as_bytes())?);

        match FormBody::of(&req) {
            FormBody::UrlEncoded => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                fields.extend(parse_pairs(&body)?);
            }
            FormBody::Multipart => fields.extend(multipart_fields(req, state).await?),
            FormBody::Ignored => {}
        }

        let encoded =
            serde_urlencoded::to_string(&fields).map_err(|e| ApiError::internal(e.to_string()))?;
        serde_urlencoded::from_str(&encoded)
            .map(FormParams)
            .map_err(|e| ApiError::bad_request(format!("Invalid form data: {e}")))
    }
}

fn parse_pairs(input: &[u8]) -> Result<Vec<(String, String)>, ApiError> {
    serde_urlencoded::from_bytes(input)
        .map_err(|e| ApiError::bad_request(format!("Invalid form data: {e}")))
}

async fn multipart_fields<S>(req: Request, state: &S) -> Result<Vec<(String, String)>, ApiError>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?;

    let mut fields = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        fields.push((name, value));
    }

    Ok(fields)
}
