//! Request handlers, one module per route group.

pub mod challenges;
pub mod comments;
pub mod follows;
pub mod posts;
pub mod submissions;

use std::collections::HashMap;

use axum::extract::multipart::Multipart;
use bytes::Bytes;
use serde::Deserialize;

use domains::Page;

use crate::error::ApiError;

/// `?page=&limit=` query parameters shared by every paginated route.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PageParams> for Page {
    fn from(params: PageParams) -> Self {
        Page::new(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(Page::DEFAULT_LIMIT),
        )
    }
}

/// The decoded parts of a multipart upload: text fields by name, plus the
/// file field's bytes and content type when present.
pub(crate) struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<(Bytes, String)>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Drains a multipart body. `file_field` names the one field treated as a
/// file upload; everything else is read as text.
pub(crate) async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<UploadForm, ApiError> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("malformed multipart body".into()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("malformed multipart body".into()))?;
            file = Some((data, content_type));
        } else {
            let value = field
                .text()
                .await
                .map_err(|_| ApiError::BadRequest("malformed multipart body".into()))?;
            fields.insert(name, value);
        }
    }

    Ok(UploadForm { fields, file })
}
